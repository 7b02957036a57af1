// src/console.rs
use crate::bot::{Delivery, QuizBot};
use crate::error::DeliveryError;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;

pub const EXIT_COMMAND: &str = "exit";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine<'a> {
    pub scope: Option<&'a str>,
    pub name: &'a str,
    pub argument: &'a str,
}

/// Parses `[#scope] /name [argument]`. Returns `None` for lines that are not commands.
pub fn parse_line(line: &str) -> Option<CommandLine<'_>> {
    let mut rest = line.trim();
    let mut scope = None;

    if let Some(stripped) = rest.strip_prefix('#') {
        let (name, tail) = stripped.split_once(char::is_whitespace)?;
        if name.is_empty() {
            return None;
        }
        scope = Some(name);
        rest = tail.trim_start();
    }

    let command = rest.strip_prefix('/')?;
    let (name, argument) = match command.split_once(char::is_whitespace) {
        Some((name, argument)) => (name, argument.trim()),
        None => (command, ""),
    };
    if name.is_empty() {
        return None;
    }

    Some(CommandLine {
        scope,
        name,
        argument,
    })
}

/// Writes replies to a terminal, tagged with the scope they belong to.
pub struct ConsoleDelivery<W> {
    scope: String,
    out: Mutex<W>,
}

impl<W> ConsoleDelivery<W> {
    pub fn new(scope: impl Into<String>, out: W) -> Self {
        Self {
            scope: scope.into(),
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl<W: AsyncWrite + Unpin + Send> ConsoleDelivery<W> {
    async fn write(&self, content: &str) -> Result<(), DeliveryError> {
        let mut out = self.out.lock().await;
        out.write_all(format!("[{}] {content}\n", self.scope).as_bytes())
            .await?;
        out.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> Delivery for ConsoleDelivery<W> {
    async fn respond(&self, content: &str) -> Result<(), DeliveryError> {
        self.write(content).await
    }

    async fn follow_up(&self, content: &str) -> Result<(), DeliveryError> {
        self.write(content).await
    }
}

/// Reads commands from stdin until EOF or `/exit`.
pub async fn run(bot: &QuizBot, default_scope: &str) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("Type /help for commands, /exit to leave.");

    while let Some(line) = lines.next_line().await? {
        let Some(parsed) = parse_line(&line) else {
            if !line.trim().is_empty() {
                println!("Commands start with '/'. Try /help.");
            }
            continue;
        };
        if parsed.name == EXIT_COMMAND {
            break;
        }

        let scope = parsed.scope.unwrap_or(default_scope);
        let delivery = ConsoleDelivery::new(scope, tokio::io::stdout());
        if let Err(e) = bot
            .handle(scope, parsed.name, parsed.argument, &delivery)
            .await
        {
            log::error!("Command /{} failed: {e}", parsed.name);
        }
    }

    log::info!("Console closed");
    Ok(())
}
