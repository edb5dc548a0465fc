use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("model load error: {0}")]
    ModelLoad(String),
    #[error("generation error: {0}")]
    Generation(String),
    #[error("tokenizer error: {0}")]
    Tokenizer(String),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("tensor error: {0}")]
    TensorError(#[from] candle_core::error::Error),
    #[error("hub error: {0}")]
    HubError(#[from] hf_hub::api::sync::ApiError),
    #[error("json error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("template error: {0}")]
    TemplateError(#[from] minijinja::Error),
}

impl From<config::ConfigError> for Error {
    fn from(e: config::ConfigError) -> Self {
        Error::Configuration(e.to_string())
    }
}

impl Error {
    pub fn tokenizer(e: impl std::fmt::Display) -> Self {
        Error::Tokenizer(e.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Error::Generation(_) | Error::Tokenizer(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

pub type Result<T> = core::result::Result<T, Error>;
