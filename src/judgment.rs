// src/judgment.rs
use crate::prompts::NEGATIVE_VERDICT;

/// Outcome of one answer submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Judgment {
    pub is_correct: bool,
    pub raw_text: String,
}

impl Judgment {
    /// Any output that does not contain the negative verdict counts as a win,
    /// whether or not it also says "correct".
    pub fn classify(model_output: &str) -> Self {
        Self::classify_with(model_output, NEGATIVE_VERDICT)
    }

    pub fn classify_with(model_output: &str, negative_verdict: &str) -> Self {
        Judgment {
            is_correct: !model_output.contains(negative_verdict),
            raw_text: model_output.to_string(),
        }
    }
}
