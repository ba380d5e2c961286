use async_trait::async_trait;
use fortune_teller::{
    Error, Result,
    llm::{GenerationPrompt, LlmClient},
};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub enum MockFailure {
    Upstream { status: Option<u16>, message: String },
    Empty,
}

/// Mock LLM client that records every prompt it receives
#[derive(Debug, Clone)]
pub struct MockLlmClient {
    pub responses: Arc<Mutex<Vec<String>>>,
    pub prompts: Arc<Mutex<Vec<GenerationPrompt>>>,
    pub failure: Option<MockFailure>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            failure: None,
        }
    }

    pub fn with_responses(self, responses: Vec<&str>) -> Self {
        *self.responses.lock().unwrap() = responses.into_iter().map(str::to_string).collect();
        self
    }

    pub fn with_upstream_error(mut self, status: Option<u16>, message: &str) -> Self {
        self.failure = Some(MockFailure::Upstream {
            status,
            message: message.to_string(),
        });
        self
    }

    pub fn with_empty_response(mut self) -> Self {
        self.failure = Some(MockFailure::Empty);
        self
    }

    pub fn get_prompts(&self) -> Vec<GenerationPrompt> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn generate(&self, prompt: &GenerationPrompt) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.clone());

        match &self.failure {
            Some(MockFailure::Upstream { status, message }) => {
                return Err(Error::upstream(*status, message.clone()));
            }
            Some(MockFailure::Empty) => return Err(Error::EmptyResponse),
            None => {}
        }

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(Error::internal("No more mock responses available"));
        }

        Ok(responses.remove(0))
    }
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}
