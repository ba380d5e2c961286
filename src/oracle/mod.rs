pub mod prompt;
mod service;
mod types;
pub mod validate;

pub use service::Oracle;
pub use types::{ChatRequest, HistoryPart, HistoryTurn, ImageReadingRequest};
