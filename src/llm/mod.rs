mod client;
mod types;

pub use client::{GeminiClient, LlmClient};
#[cfg(test)]
pub use client::MockLlmClient;
pub use types::*;
