#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use tokio::sync::Notify;
use tokio::time::Duration;
use umigame::{
    Completion, CompletionClient, CompletionError, ConversationMessage, Delivery, DeliveryError,
    MemoryTranscriptStore, QuizRoundEngine,
};

/// Replays queued completions in order and records every request.
#[derive(Default)]
pub struct ScriptedCompletion {
    replies: Mutex<VecDeque<Option<Completion>>>,
    requests: Mutex<Vec<Vec<ConversationMessage>>>,
    delay: Option<Duration>,
}

impl ScriptedCompletion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn reply(self, text: &str) -> Self {
        self.push(Some(Completion::from_text(text)));
        self
    }

    pub fn reply_empty(self) -> Self {
        self.push(Some(Completion::default()));
        self
    }

    /// The next call fails as if the API were unreachable.
    pub fn fail(self) -> Self {
        self.push(None);
        self
    }

    pub fn push(&self, reply: Option<Completion>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn requests(&self) -> Vec<Vec<ConversationMessage>> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletion {
    async fn create_completion(
        &self,
        messages: &[ConversationMessage],
    ) -> Result<Completion, CompletionError> {
        self.requests.lock().unwrap().push(messages.to_vec());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.replies.lock().unwrap().pop_front();
        match next {
            Some(Some(completion)) => Ok(completion),
            Some(None) => Err(CompletionError::Timeout),
            None => Ok(Completion::from_text("はい")),
        }
    }
}

/// Holds any call whose last message contains "wait" until released.
#[derive(Default)]
pub struct GatedCompletion {
    pub gate: Notify,
}

#[async_trait]
impl CompletionClient for GatedCompletion {
    async fn create_completion(
        &self,
        messages: &[ConversationMessage],
    ) -> Result<Completion, CompletionError> {
        let held = messages
            .last()
            .is_some_and(|message| message.content.contains("wait"));
        if held {
            self.gate.notified().await;
        }
        Ok(Completion::from_text("いいえ"))
    }
}

/// Records everything the bot sends.
#[derive(Default)]
pub struct RecordingDelivery {
    pub responses: Mutex<Vec<String>>,
    pub follow_ups: Mutex<Vec<String>>,
}

impl RecordingDelivery {
    pub fn responses(&self) -> Vec<String> {
        self.responses.lock().unwrap().clone()
    }

    pub fn follow_ups(&self) -> Vec<String> {
        self.follow_ups.lock().unwrap().clone()
    }
}

#[async_trait]
impl Delivery for RecordingDelivery {
    async fn respond(&self, content: &str) -> Result<(), DeliveryError> {
        self.responses.lock().unwrap().push(content.to_string());
        Ok(())
    }

    async fn follow_up(&self, content: &str) -> Result<(), DeliveryError> {
        self.follow_ups.lock().unwrap().push(content.to_string());
        Ok(())
    }
}

pub fn engine_with(
    store: &Arc<MemoryTranscriptStore>,
    completion: &Arc<ScriptedCompletion>,
) -> QuizRoundEngine {
    QuizRoundEngine::new(store.clone(), completion.clone())
}
