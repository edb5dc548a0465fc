use super::generate;
use crate::error::{Error, Result};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

const LOADED: &str = "Loaded";

pub fn api() -> Router {
    Router::new()
        .route("/check", get(check))
        .route("/api/generate", post(chat))
}

#[derive(Debug, Serialize)]
pub struct CheckStatus {
    model_id: String,
    tokenizer_status: &'static str,
    model_status: &'static str,
}

/// Reports what was loaded at startup; the model is not probed.
pub async fn check(Extension(state): Extension<AppState>) -> Json<CheckStatus> {
    Json(CheckStatus {
        model_id: state.generator.model_id().to_string(),
        tokenizer_status: LOADED,
        model_status: LOADED,
    })
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct Chat {
    #[validate(length(max = 8192))]
    text: String,
}

pub async fn chat(
    Extension(state): Extension<AppState>,
    Json(params): Json<Chat>,
) -> Result<Json<Chat>> {
    params
        .validate()
        .map_err(|e| Error::Generation(e.to_string()))?;
    let text = generate(&state, params.text).await?;
    Ok(Json(Chat { text }))
}
