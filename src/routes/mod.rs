mod routes_api;
mod routes_web;

use crate::error::{Error, Result};
use crate::llm::predict;
use crate::middleware::cors::create_cors;
use crate::state::AppState;
use axum::{Extension, Router};
use tower_http::{services::ServeDir, trace::TraceLayer};

pub fn create_routes(state: AppState, static_dir: &str) -> Router {
    let cors = create_cors();
    Router::new()
        .merge(routes_web::web())
        .merge(routes_api::api())
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Runs the prompt through the model on the blocking pool so the runtime
/// keeps serving other requests meanwhile.
async fn generate(state: &AppState, prompt: String) -> Result<String> {
    let generator = state.generator.clone();
    let params = state.params.clone();
    tokio::task::spawn_blocking(move || predict::complete(generator.as_ref(), &prompt, &params))
        .await
        .map_err(|e| {
            tracing::error!("generation task failed: {}", e);
            Error::Generation(format!("generation task failed: {e}"))
        })?
}
