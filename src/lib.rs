pub mod config;
pub mod error;
pub mod llm;
pub mod oracle;
pub mod server;

pub use error::{Error, Result};
