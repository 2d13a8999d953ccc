//! Scripted `CompletionClient` for tests that must not touch the network.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use super::{CompletionClient, LlmError};

/// What the scripted client answers with.
#[derive(Clone)]
pub enum Reply {
    Text(String),
    Status(u16, &'static str),
    Empty,
}

pub struct ScriptedClient {
    reply: Reply,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
    keys: Mutex<Vec<String>>,
    /// When set, `complete` waits for a permit before answering.
    gate: Option<Arc<Notify>>,
}

impl ScriptedClient {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
            keys: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Answers with a well-formed two-document completion.
    pub fn well_formed(resume: &str, cover_letter: &str) -> Self {
        Self::new(Reply::Text(format!(
            "---RESUME---\n{resume}\n---COVER_LETTER---\n{cover_letter}"
        )))
    }

    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }

    pub fn last_key(&self) -> Option<String> {
        self.keys.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, prompt: &str, api_key: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.keys.lock().unwrap().push(api_key.to_string());

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Status(status, message) => Err(LlmError::Api {
                status: *status,
                message: message.to_string(),
            }),
            Reply::Empty => Err(LlmError::EmptyContent),
        }
    }
}
