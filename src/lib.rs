pub mod bot;
pub mod commands;
pub mod completion;
pub mod console;
pub mod conversation;
pub mod engine;
pub mod error;
pub mod judgment;
pub mod locks;
pub mod logging;
pub mod message;
pub mod prompts;
pub mod settings;
pub mod store;
pub mod transcript;

// Re-export commonly used items for easier access
pub use bot::{Delivery, QuizBot};
pub use commands::{Command, CommandTable};
pub use completion::{Completion, CompletionClient, OpenAiCompletion};
pub use conversation::{ConversationBuilder, MarkerConversationBuilder};
pub use engine::{QuizRoundEngine, Reply, RoundOutcome};
pub use error::{CompletionError, DeliveryError, QuizError, SettingsError, StoreError};
pub use judgment::Judgment;
pub use message::{ConversationMessage, Role};
pub use prompts::PromptSet;
pub use settings::Settings;
pub use store::{FileTranscriptStore, MemoryTranscriptStore, TranscriptStore};
pub use transcript::{Transcript, Turn, TurnKind};
