// src/completion.rs
use crate::error::CompletionError;
use crate::message::{ConversationMessage, Role};
use crate::settings::Settings;

use async_openai::{
    Client,
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
};
use async_trait::async_trait;
use tokio::time::{Duration, timeout};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Result of one completion call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    pub choices: Vec<ConversationMessage>,
}

impl Completion {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            choices: vec![ConversationMessage::assistant(text)],
        }
    }

    /// Content of the first choice. No choices, or a blank first choice, is a failure.
    pub fn first_content(&self) -> Result<&str, CompletionError> {
        let choice = self.choices.first().ok_or(CompletionError::EmptyChoices)?;
        if choice.content.trim().is_empty() {
            return Err(CompletionError::EmptyContent);
        }
        Ok(&choice.content)
    }
}

/// The language-model completion capability.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn create_completion(
        &self,
        messages: &[ConversationMessage],
    ) -> Result<Completion, CompletionError>;
}

pub struct OpenAiCompletion {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    timeout: Duration,
}

impl OpenAiCompletion {
    pub fn new(api_key: &str, model: impl Into<String>, temperature: f32) -> Self {
        let openai_config = OpenAIConfig::new().with_api_key(api_key);
        Self {
            client: Client::with_config(openai_config),
            model: model.into(),
            temperature,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, CompletionError> {
        let api_key = settings
            .openai_api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(CompletionError::MissingApiKey)?;
        Ok(Self::new(api_key, settings.model.clone(), settings.temperature)
            .with_timeout(Duration::from_secs(settings.request_timeout_secs)))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn to_request_message(
    message: &ConversationMessage,
) -> Result<ChatCompletionRequestMessage, OpenAIError> {
    let content = message.content.clone();
    Ok(match message.role {
        Role::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        Role::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        Role::User => ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()?
            .into(),
    })
}

#[async_trait]
impl CompletionClient for OpenAiCompletion {
    async fn create_completion(
        &self,
        messages: &[ConversationMessage],
    ) -> Result<Completion, CompletionError> {
        let request_messages = messages
            .iter()
            .map(to_request_message)
            .collect::<Result<Vec<_>, _>>()?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(self.model.as_str())
            .messages(request_messages)
            .temperature(self.temperature)
            .build()?;

        log::info!(
            "Sending {} messages to OpenAI chat completions ({})",
            messages.len(),
            self.model
        );
        let response = match timeout(self.timeout, self.client.chat().create(request)).await {
            Ok(res) => res?,
            Err(_) => return Err(CompletionError::Timeout),
        };

        let choices = response
            .choices
            .into_iter()
            .map(|choice| ConversationMessage::assistant(choice.message.content.unwrap_or_default()))
            .collect();

        Ok(Completion { choices })
    }
}
