pub mod error;
pub mod llm;
pub mod logging;
pub mod middleware;
pub mod routes;
pub mod settings;
pub mod state;
pub mod utility;
pub mod view;
