use crate::error::Result;
use crate::llm::{generation::GenerationParams, TextGenerator};
use crate::view::View;
use std::sync::Arc;

/// Everything a handler needs, cloned into each request.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<dyn TextGenerator>,
    pub view: Arc<View>,
    pub params: Arc<GenerationParams>,
}

impl AppState {
    pub fn new(generator: Arc<dyn TextGenerator>, params: GenerationParams) -> Result<Self> {
        Ok(Self {
            generator,
            view: Arc::new(View::new()?),
            params: Arc::new(params),
        })
    }
}
