// src/commands.rs
use crate::engine::Reply;

use std::collections::HashMap;

pub const NO_ACTIVE_ROUND: &str =
    "現在クイズが存在しません。`/create` コマンドで新しいクイズを作成してください。";

pub const QUIT_FAILED: &str = "クイズの終了に失敗しました。";

pub const HELP_TEXT: &str = r#"**ウミガメのスープクイズボットの使い方**

以下のコマンドが利用可能です：

- **/create** - 新しいクイズを作成します。クイズが既に存在する場合は、現在のクイズを表示します。
- **/q [質問]** - クイズに関する質問をします。回答は「はい」「いいえ」「わからない/関係ない」のいずれかになります。
- **/answer [回答]** - クイズの答えを提出します。正解の場合はクイズが終了し、不正解の場合はクイズが続行されます。
- **/info** - 現在のクイズとこれまでの質問と回答の履歴を要約します。
- **/clue** - 現在のクイズに関するヒントを提供します。
- **/giveup** - クイズを諦めて正解を表示します。
- **/quit** - 現在のクイズを終了します。
- **/ping** - ボットが応答可能かどうかを確認します。
- **/help** - このヘルプメッセージを表示します。

クイズを始めるには、まず **/create** コマンドを使用してください。"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Ping,
    Help,
    Create,
    Ask,
    Answer,
    Info,
    Hint,
    GiveUp,
    Quit,
}

impl Command {
    /// Sent before the engine runs. Static commands answer directly instead.
    pub fn acknowledgement(&self) -> Option<&'static str> {
        match self {
            Command::Ping | Command::Help => None,
            Command::Create => Some("クイズを確認しています..."),
            Command::Ask => Some("質問を処理しています..."),
            Command::Answer => Some("回答を判定しています..."),
            Command::Info => Some("情報を取得しています..."),
            Command::Hint => Some("ヒントを考えています..."),
            Command::GiveUp => Some("クイズの答えを取得しています..."),
            Command::Quit => Some("クイズを終了しています..."),
        }
    }

    /// Guidance shown when a command that needs text was given none.
    pub fn usage(&self) -> Option<&'static str> {
        match self {
            Command::Ask => Some("質問を入力してください。例: `/q 男性は何を飲んでいましたか？`"),
            Command::Answer => Some(
                "回答を入力してください。例: `/answer 男性は亀のスープを飲んだことがあり、妻が亀のスープを作ったことを思い出して自殺した`",
            ),
            _ => None,
        }
    }
}

/// Command names mapped to commands. Built once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct CommandTable {
    commands: HashMap<String, Command>,
}

#[derive(Debug, Default)]
pub struct CommandTableBuilder {
    commands: Vec<(String, Command)>,
}

impl CommandTableBuilder {
    pub fn command(mut self, name: impl Into<String>, command: Command) -> Self {
        self.commands.push((name.into(), command));
        self
    }

    pub fn build(self) -> CommandTable {
        CommandTable {
            commands: self.commands.into_iter().collect(),
        }
    }
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::builder()
            .command("ping", Command::Ping)
            .command("help", Command::Help)
            .command("create", Command::Create)
            .command("q", Command::Ask)
            .command("answer", Command::Answer)
            .command("info", Command::Info)
            .command("clue", Command::Hint)
            .command("giveup", Command::GiveUp)
            .command("quit", Command::Quit)
            .build()
    }
}

impl CommandTable {
    pub fn builder() -> CommandTableBuilder {
        CommandTableBuilder::default()
    }

    pub fn lookup(&self, name: &str) -> Option<Command> {
        self.commands.get(name).copied()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Renders an engine reply for the chat.
pub fn format_reply(reply: &Reply) -> String {
    match reply {
        Reply::NoActiveRound => NO_ACTIVE_ROUND.to_string(),
        Reply::PuzzleCreated { puzzle } => {
            format!("**新しいウミガメのスープクイズ**\n\n{}", puzzle.trim())
        }
        Reply::PuzzleInProgress { puzzle } => format!(
            "**現在のウミガメのスープクイズ**\n\n{}\n\n現在のクイズを終了するには `/quit` コマンドを使用してください。",
            puzzle.trim()
        ),
        Reply::Answered { question, response } => {
            format!("**質問**: {question}\n\n**回答**: {}", response.trim())
        }
        Reply::Hint { hint } => format!("**ヒント**: {}", hint.trim()),
        Reply::Summary { summary } => format!("**クイズ情報**\n\n{}", summary.trim()),
        Reply::Judged { answer, judgment } => {
            format!("**回答**: {answer}\n\n**判定**: {}", judgment.raw_text.trim())
        }
        Reply::Solution { solution } => format!("**クイズの正解**\n\n{}", solution.trim()),
        Reply::RoundEnded => {
            "クイズを終了しました。新しいクイズを始めるには `/create` コマンドを使用してください。"
                .to_string()
        }
    }
}
