use crate::settings::LogCfg;
use tracing_subscriber::EnvFilter;

pub fn init(cfg: &LogCfg) {
    let filter = EnvFilter::try_new(&cfg.level).unwrap_or_else(|_| EnvFilter::new("info"));

    // a subscriber may already be installed (tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();

    tracing::info!("logging configured at level: {}", cfg.level);
}
