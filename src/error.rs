use thiserror::Error;

// Top-level error of a quiz operation. "No active round" is a reply, not an error.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("Transcript store error: {0}")]
    Store(#[from] StoreError),

    #[error("Completion error: {0}")]
    Completion(#[from] CompletionError),

    #[error("The {0} must not be blank")]
    BlankInput(&'static str),
}

// Errors of the named-blob store holding one transcript per scope.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read transcript '{key}': {source}")]
    Read {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write transcript '{key}': {source}")]
    Write {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to delete transcript '{key}': {source}")]
    Delete {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid scope key: {0:?}")]
    InvalidKey(String),
}

impl StoreError {
    pub fn key(&self) -> &str {
        match self {
            StoreError::Read { key, .. }
            | StoreError::Write { key, .. }
            | StoreError::Delete { key, .. }
            | StoreError::InvalidKey(key) => key,
        }
    }
}

// Errors from the language-model completion call.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("OpenAI API error: {0}")]
    OpenAI(#[from] async_openai::error::OpenAIError),

    #[error("Completion returned no choices")]
    EmptyChoices,

    #[error("Completion choice has no content")]
    EmptyContent,

    #[error("No OpenAI API key configured")]
    MissingApiKey,

    #[error("Completion request timed out")]
    Timeout,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

// Errors from the chat-platform delivery capability.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
