// src/prompts.rs
use std::fs;
use std::path::Path;

// region:  --- Transcript tokens

/// Prefix of a transcript line holding a player question.
pub const QUESTION_MARKER: &str = "質問: ";

/// Prefix of a transcript line holding a submitted answer.
pub const ANSWER_MARKER: &str = "回答: ";

/// Substring of a judgment that marks the answer as wrong.
pub const NEGATIVE_VERDICT: &str = "不正解";

// endregion:  --- Transcript tokens

// region:  --- Fixed user lines

pub const INVENT_PUZZLE: &str = "新しいウミガメのスープクイズを考えてください。";

pub const GIVE_HINT: &str = "このクイズに関するヒントを教えてください。";

pub const SUMMARIZE: &str = "これまでのクイズの状況を要約してください。";

pub const REVEAL_SOLUTION: &str = "クイズを諦めます。正解を教えてください。";

// endregion:  --- Fixed user lines

// region:  --- System prompts

pub const PUZZLE_PREAMBLE: &str = r#"あなたはウミガメのスープクイズを出題するボットです。
日本語で短い問題文を一つだけ作成してください。
問題文は一行で、状況だけを述べ、真相は書かないでください。"#;

pub const QUESTION_PREAMBLE: &str = r#"あなたはウミガメのスープクイズの出題者です。
最初のメッセージが問題文です。プレイヤーの質問には「はい」「いいえ」「わからない/関係ない」のいずれかで答えてください。
質問が現在のクイズの解決に関連しない場合は「わからない/関係ない」と答えてください。
真相そのものは明かさないでください。"#;

pub const HINT_PREAMBLE: &str = r#"あなたはウミガメのスープクイズの出題者です。
これまでの質問と回答を踏まえ、真相に近づくための短いヒントを一つだけ出してください。
答えそのものは明かさないでください。"#;

pub const INFO_PREAMBLE: &str = r#"あなたはウミガメのスープクイズの進行役です。
問題文と、これまでに判明した事実を簡潔に箇条書きで要約してください。
まだ判明していない真相には触れないでください。"#;

pub const ANSWER_PREAMBLE: &str = r#"あなたはウミガメのスープクイズの出題者です。
プレイヤーの回答が真相と一致していれば「正解」と答え、真相を説明してください。
一致していなければ必ず「不正解」という言葉を含めて答え、真相は明かさないでください。"#;

pub const GIVEUP_PREAMBLE: &str = r#"あなたはウミガメのスープクイズの出題者です。
プレイヤーは降参しました。これまでのやりとりと矛盾しない真相を、分かりやすく説明してください。"#;

// endregion:  --- System prompts

/// System prompts, one per model-calling operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSet {
    pub puzzle: String,
    pub question: String,
    pub hint: String,
    pub info: String,
    pub answer: String,
    pub giveup: String,
}

impl Default for PromptSet {
    fn default() -> Self {
        Self {
            puzzle: PUZZLE_PREAMBLE.to_string(),
            question: QUESTION_PREAMBLE.to_string(),
            hint: HINT_PREAMBLE.to_string(),
            info: INFO_PREAMBLE.to_string(),
            answer: ANSWER_PREAMBLE.to_string(),
            giveup: GIVEUP_PREAMBLE.to_string(),
        }
    }
}

impl PromptSet {
    /// Reads prompt overrides from `dir`. A missing or unreadable file keeps
    /// the built-in prompt for that operation.
    pub fn load_from_dir(dir: &Path) -> Self {
        let read = |name: &str, fallback: &str| -> String {
            let path = dir.join(name);
            match fs::read_to_string(&path) {
                Ok(content) if !content.trim().is_empty() => {
                    log::debug!("Loaded prompt override: {}", path.display());
                    content
                }
                Ok(_) => fallback.to_string(),
                Err(e) => {
                    log::debug!("Using built-in prompt for {name}: {e}");
                    fallback.to_string()
                }
            }
        };

        Self {
            puzzle: read("umigame.txt", PUZZLE_PREAMBLE),
            question: read("onQuestion.txt", QUESTION_PREAMBLE),
            hint: read("onClue.txt", HINT_PREAMBLE),
            info: read("onInfo.txt", INFO_PREAMBLE),
            answer: read("onAnswer.txt", ANSWER_PREAMBLE),
            giveup: read("onGiveup.txt", GIVEUP_PREAMBLE),
        }
    }
}
