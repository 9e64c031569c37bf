// ABOUTME: Stub text generation provider for integration tests
// ABOUTME: Replies with canned text or a canned error and records every request it receives

use std::sync::Mutex;

use async_trait::async_trait;
use flowstate::errors::AppError;
use flowstate::llm::{ChatRequest, ChatResponse, LlmCapabilities, LlmProvider};

enum Reply {
    Text(String),
    Failure(AppError),
}

/// Provider returning a fixed reply
pub struct StubLlmProvider {
    reply: Reply,
    capabilities: LlmCapabilities,
    requests: Mutex<Vec<ChatRequest>>,
}

impl StubLlmProvider {
    /// Reply with `text` to every request
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Reply::Text(text.to_owned()),
            capabilities: LlmCapabilities::JSON_MODE | LlmCapabilities::SYSTEM_MESSAGES,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Fail every request with `error`
    pub fn failing(error: AppError) -> Self {
        Self {
            reply: Reply::Failure(error),
            capabilities: LlmCapabilities::JSON_MODE | LlmCapabilities::SYSTEM_MESSAGES,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Advertise different capabilities
    pub fn with_capabilities(mut self, capabilities: LlmCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests received so far
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmProvider for StubLlmProvider {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn display_name(&self) -> &'static str {
        "Stub Provider"
    }

    fn capabilities(&self) -> LlmCapabilities {
        self.capabilities
    }

    fn default_model(&self) -> &str {
        "stub-model"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.reply {
            Reply::Text(text) => Ok(ChatResponse {
                content: text.clone(),
                model: request.model.clone().unwrap_or_else(|| "stub-model".to_owned()),
                usage: None,
                finish_reason: Some("STOP".to_owned()),
            }),
            Reply::Failure(error) => Err(AppError::new(error.code, error.message.clone())),
        }
    }
}
