use super::generate;
use crate::error::{Error, Result};
use crate::llm::predict::Generation;
use crate::state::AppState;
use crate::view::{IndexContext, RequestInfo};
use axum::{
    extract::Form,
    http::{Method, Uri},
    response::Html,
    routing::get,
    Extension, Router,
};
use serde::Deserialize;
use validator::Validate;

pub fn web() -> Router {
    Router::new().route("/", get(index).post(submit))
}

#[derive(Debug, Deserialize, Validate)]
pub struct Submit {
    #[validate(length(max = 8192))]
    input_text: String,
}

fn request_info(method: &Method, uri: &Uri) -> RequestInfo {
    RequestInfo {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
}

pub async fn index(
    Extension(state): Extension<AppState>,
    method: Method,
    uri: Uri,
) -> Result<Html<String>> {
    let ctx = IndexContext::empty(request_info(&method, &uri));
    Ok(Html(state.view.render_index(&ctx)?))
}

pub async fn submit(
    Extension(state): Extension<AppState>,
    method: Method,
    uri: Uri,
    Form(form): Form<Submit>,
) -> Result<Html<String>> {
    let result = match form.validate() {
        Ok(()) => generate(&state, form.input_text.clone()).await,
        Err(e) => Err(Error::Generation(e.to_string())),
    };
    let result = Generation::from(result);
    let ctx = IndexContext::with_result(request_info(&method, &uri), &form.input_text, &result);
    Ok(Html(state.view.render_index(&ctx)?))
}
