mod client;
mod ollama;
mod types;

pub use client::*;
pub use ollama::OllamaClient;
pub use types::*;
