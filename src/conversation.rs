// src/conversation.rs
use crate::message::{ConversationMessage, Role};
use crate::prompts::{ANSWER_MARKER, QUESTION_MARKER};
use crate::transcript::Transcript;

/// Turns a decoded transcript into the message list for one model call.
pub trait ConversationBuilder: Send + Sync {
    /// `utterance` is appended verbatim as the final `user` message; callers
    /// embed any marker prefix themselves.
    fn build(
        &self,
        system_prompt: &str,
        transcript: &Transcript,
        utterance: &str,
    ) -> Vec<ConversationMessage>;
}

/// Infers roles from line prefixes: a line starting with a player marker opens
/// a `user` message, anything else belongs to the model.
///
/// A model response that itself begins with a marker is read back as a player
/// line. The transcript format has no way to tell the two apart.
#[derive(Debug, Clone)]
pub struct MarkerConversationBuilder {
    markers: Vec<String>,
}

impl Default for MarkerConversationBuilder {
    fn default() -> Self {
        Self::new([QUESTION_MARKER, ANSWER_MARKER])
    }
}

impl MarkerConversationBuilder {
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            markers: markers.into_iter().map(Into::into).collect(),
        }
    }

    fn is_player_line(&self, line: &str) -> bool {
        self.markers.iter().any(|marker| line.starts_with(marker.as_str()))
    }

    /// Reconstructs the dialogue after the puzzle line.
    pub fn dialogue(&self, lines: &[String]) -> Vec<ConversationMessage> {
        let mut messages = Vec::new();
        let mut role = Role::User;
        let mut buffer = String::new();

        for raw in lines {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            // Markers end in a space, so match before trimming the tail.
            if self.is_player_line(raw.trim_start()) {
                if !buffer.is_empty() {
                    messages.push(ConversationMessage::new(role, std::mem::take(&mut buffer)));
                }
                role = Role::User;
                buffer.push_str(line);
            } else if role == Role::Assistant {
                if !buffer.is_empty() {
                    buffer.push('\n');
                }
                buffer.push_str(line);
            } else {
                if !buffer.is_empty() {
                    messages.push(ConversationMessage::new(role, std::mem::take(&mut buffer)));
                }
                role = Role::Assistant;
                buffer.push_str(line);
            }
        }

        if !buffer.is_empty() {
            messages.push(ConversationMessage::new(role, buffer));
        }

        messages
    }
}

impl ConversationBuilder for MarkerConversationBuilder {
    fn build(
        &self,
        system_prompt: &str,
        transcript: &Transcript,
        utterance: &str,
    ) -> Vec<ConversationMessage> {
        let mut messages = vec![ConversationMessage::system(system_prompt)];

        if let Some(puzzle) = transcript.puzzle() {
            messages.push(ConversationMessage::assistant(puzzle));
            messages.extend(self.dialogue(transcript.lines()));
        }

        messages.push(ConversationMessage::user(utterance));
        messages
    }
}
