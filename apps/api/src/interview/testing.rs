//! Scripted `TextGenerator` for exercising the chain without a network.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm_client::{LlmError, Model, TextGenerator};

/// Replays queued responses in order, then falls back to a fixed reply (if any).
/// Every prompt it receives is recorded.
pub struct ScriptedGenerator {
    configured: AtomicBool,
    script: Mutex<VecDeque<Result<String, String>>>,
    fallback: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(script: impl IntoIterator<Item = Result<String, String>>) -> Self {
        Self {
            configured: AtomicBool::new(true),
            script: Mutex::new(script.into_iter().collect()),
            fallback: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Answers every call with `reply`.
    pub fn repeating(reply: &str) -> Self {
        Self {
            fallback: Some(reply.to_string()),
            ..Self::new([])
        }
    }

    pub fn unconfigured() -> Self {
        let generator = Self::new([]);
        generator.set_configured(false);
        generator
    }

    /// Simulates the credential being removed (or restored) between actions.
    pub fn set_configured(&self, configured: bool) {
        self.configured.store(configured, Ordering::SeqCst);
    }

    /// Makes the next call fail, ahead of anything already queued.
    pub fn fail_next(&self, message: &str) {
        self.script
            .lock()
            .unwrap()
            .push_front(Err(message.to_string()));
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    fn is_configured(&self) -> bool {
        self.configured.load(Ordering::SeqCst)
    }

    async fn generate(&self, prompt: &str, _model: Model) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(LlmError::Api {
                status: 500,
                message,
            }),
            None => self.fallback.clone().ok_or(LlmError::EmptyContent),
        }
    }
}
