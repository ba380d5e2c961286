use super::{
    prompt,
    types::{ChatRequest, ImageReadingRequest},
    validate,
};
use crate::{Result, llm::LlmClient};
use std::sync::Arc;
use tracing::{debug, info};

/// Validates a request, builds its prompt and makes exactly one upstream call.
#[derive(Clone)]
pub struct Oracle {
    llm_client: Arc<dyn LlmClient>,
}

impl Oracle {
    pub fn new(llm_client: Arc<dyn LlmClient>) -> Self {
        Self { llm_client }
    }

    pub async fn read_image(&self, request: ImageReadingRequest) -> Result<String> {
        let image = validate::image_payload(request.image_data.as_deref())?;

        info!(
            mime_type = %image.mime_type,
            payload_len = image.data.len(),
            "Reading coffee cup image"
        );

        let prompt = prompt::image_reading(image);
        self.llm_client.generate(&prompt).await
    }

    pub async fn chat(&self, request: ChatRequest) -> Result<String> {
        let chat = validate::chat_request(request)?;
        let casual = prompt::is_casual(&chat.message);

        info!(
            message_len = chat.message.chars().count(),
            history_turns = chat.history.len(),
            casual,
            "Answering chat message"
        );

        let prompt = prompt::chat(chat);
        debug!(
            max_output_tokens = prompt.params.max_output_tokens,
            "Chat prompt assembled"
        );

        self.llm_client.generate(&prompt).await
    }
}
