use llm_form::{
    error::{Error, Result},
    llm::LLM,
    logging, routes,
    settings::{Credentials, Settings},
    state::AppState,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::new()?;
    logging::init(&settings.log);
    tracing::info!("{:?}", settings);

    let credentials = Credentials::load(&settings.credentials_path)?;

    let llm_cfg = settings.llm.clone();
    let llm = tokio::task::spawn_blocking(move || LLM::new(&llm_cfg, &credentials))
        .await
        .map_err(|e| Error::ModelLoad(e.to_string()))??;

    let state = AppState::new(Arc::new(llm), settings.llm.generation.clone())?;
    let routes = routes::create_routes(state, &settings.server.static_dir);

    let address = settings.server.address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("listening on {}", address);

    axum::serve(listener, routes)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("shutting down gracefully");
}
