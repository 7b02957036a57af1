// src/transcript.rs
// One turn per line, puzzle first. Player lines are told apart only by marker.

use crate::prompts::{ANSWER_MARKER, QUESTION_MARKER};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnKind {
    Puzzle,
    Question,
    Answer,
    Response,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub kind: TurnKind,
    pub text: String,
}

impl Turn {
    /// The puzzle statement always occupies a single line, so embedded line
    /// breaks are folded into spaces.
    pub fn puzzle(text: &str) -> Self {
        let folded = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            kind: TurnKind::Puzzle,
            text: folded,
        }
    }

    pub fn question(question: &str) -> Self {
        Self {
            kind: TurnKind::Question,
            text: format!("{QUESTION_MARKER}{}", single_line(question)),
        }
    }

    /// A submitted answer is a player line like a question, under its own marker.
    pub fn answer(answer: &str) -> Self {
        Self {
            kind: TurnKind::Answer,
            text: format!("{ANSWER_MARKER}{}", single_line(answer)),
        }
    }

    /// Raw model output; may span several lines.
    pub fn response(text: &str) -> Self {
        Self {
            kind: TurnKind::Response,
            text: text.to_string(),
        }
    }
}

fn single_line(text: &str) -> String {
    text.split(['\n', '\r'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Joins turn texts with a single newline.
pub fn encode(turns: &[Turn]) -> String {
    turns
        .iter()
        .map(|turn| turn.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Splits `text` into the puzzle line and the opaque lines that follow it.
pub fn decode(text: &str) -> Transcript {
    let mut lines = text
        .split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string);

    match lines.next() {
        Some(puzzle) => Transcript {
            puzzle: Some(puzzle),
            lines: lines.collect(),
        },
        None => Transcript::default(),
    }
}

/// A decoded transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    puzzle: Option<String>,
    lines: Vec<String>,
}

impl Transcript {
    pub fn new(puzzle: Turn) -> Self {
        let mut transcript = Self::default();
        transcript.push(puzzle);
        transcript
    }

    pub fn is_empty(&self) -> bool {
        self.puzzle.is_none()
    }

    pub fn puzzle(&self) -> Option<&str> {
        self.puzzle.as_deref()
    }

    /// Lines after the puzzle, in order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Every stored line, puzzle first.
    pub fn all_lines(&self) -> Vec<&str> {
        self.puzzle
            .iter()
            .chain(self.lines.iter())
            .map(String::as_str)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len() + usize::from(self.puzzle.is_some())
    }

    /// Appends a turn. Multi-line text becomes several lines, blank ones dropped.
    pub fn push(&mut self, turn: Turn) {
        for line in turn
            .text
            .split('\n')
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.trim().is_empty())
        {
            if self.puzzle.is_none() {
                self.puzzle = Some(line.to_string());
            } else {
                self.lines.push(line.to_string());
            }
        }
    }

    pub fn encode(&self) -> String {
        self.all_lines().join("\n")
    }
}
