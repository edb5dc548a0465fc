use crate::error::Result;
use crate::llm::predict::Generation;
use minijinja::Environment;
use serde::Serialize;

const INDEX: &str = "index.html";

#[derive(Debug, Clone, Serialize)]
pub struct RequestInfo {
    pub method: String,
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct IndexContext<'a> {
    pub request: RequestInfo,
    pub input_text: Option<&'a str>,
    pub response: Option<&'a str>,
    pub is_error: bool,
}

impl<'a> IndexContext<'a> {
    pub fn empty(request: RequestInfo) -> Self {
        Self {
            request,
            input_text: None,
            response: None,
            is_error: false,
        }
    }

    pub fn with_result(request: RequestInfo, input_text: &'a str, result: &'a Generation) -> Self {
        Self {
            request,
            input_text: Some(input_text),
            response: Some(result.text()),
            is_error: result.is_error(),
        }
    }
}

pub struct View {
    env: Environment<'static>,
}

impl View {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template(INDEX, include_str!("../templates/index.html"))?;
        Ok(Self { env })
    }

    pub fn render_index(&self, ctx: &IndexContext<'_>) -> Result<String> {
        Ok(self.env.get_template(INDEX)?.render(ctx)?)
    }
}
