// src/bot.rs
use crate::commands::{Command, CommandTable, HELP_TEXT, QUIT_FAILED, format_reply};
use crate::engine::{QuizRoundEngine, RoundOutcome};
use crate::error::{DeliveryError, QuizError};

use async_trait::async_trait;
use std::sync::Arc;

/// The chat platform's reply channel for one incoming command.
#[async_trait]
pub trait Delivery: Send + Sync {
    /// Immediate acknowledgement of the command.
    async fn respond(&self, content: &str) -> Result<(), DeliveryError>;

    /// Result sent once the command has been processed.
    async fn follow_up(&self, content: &str) -> Result<(), DeliveryError>;
}

pub struct QuizBot {
    engine: Arc<QuizRoundEngine>,
    commands: CommandTable,
}

impl QuizBot {
    pub fn new(engine: Arc<QuizRoundEngine>, commands: CommandTable) -> Self {
        Self { engine, commands }
    }

    pub fn commands(&self) -> &CommandTable {
        &self.commands
    }

    /// Runs one command in `scope` and delivers its replies.
    ///
    /// Returns the engine outcome when the engine ran. Engine failures are
    /// returned after logging; apart from `/quit`, the player sees nothing
    /// beyond the acknowledgement in that case.
    pub async fn handle(
        &self,
        scope: &str,
        name: &str,
        argument: &str,
        delivery: &dyn Delivery,
    ) -> Result<Option<RoundOutcome>, QuizError> {
        let Some(command) = self.commands.lookup(name) else {
            log::debug!("No handler for command: {name}");
            send(delivery.respond(&format!("不明なコマンドです: `/{name}`"))).await;
            return Ok(None);
        };
        log::info!("Dispatching {command:?} in scope {scope}");

        let argument = argument.trim();
        match command {
            Command::Ping => {
                send(delivery.respond("はい!")).await;
                return Ok(None);
            }
            Command::Help => {
                send(delivery.respond(HELP_TEXT)).await;
                return Ok(None);
            }
            _ => {}
        }

        if let Some(usage) = command.usage().filter(|_| argument.is_empty()) {
            log::error!("No message provided for {command:?}");
            send(delivery.respond(usage)).await;
            return Ok(None);
        }

        if let Some(ack) = command.acknowledgement() {
            if let Err(e) = delivery.respond(ack).await {
                log::error!("Failed to respond to interaction: {e}");
                return Ok(None);
            }
        }

        let result = match command {
            Command::Create => self.engine.create(scope).await,
            Command::Ask => self.engine.ask(scope, argument).await,
            Command::Answer => self.engine.answer(scope, argument).await,
            Command::Info => self.engine.info(scope).await,
            Command::Hint => self.engine.hint(scope).await,
            Command::GiveUp => self.engine.give_up(scope).await,
            Command::Quit => self.engine.quit(scope).await,
            Command::Ping | Command::Help => return Ok(None),
        };

        match result {
            Ok(outcome) => {
                if let Some(failure) = &outcome.persistence_failure {
                    log::error!("Transcript for {scope} not updated: {failure}");
                }
                send(delivery.follow_up(&format_reply(&outcome.reply))).await;
                Ok(Some(outcome))
            }
            Err(e) => {
                log::error!("{command:?} failed in scope {scope}: {e}");
                if command == Command::Quit {
                    send(delivery.follow_up(QUIT_FAILED)).await;
                }
                Err(e)
            }
        }
    }
}

async fn send(delivery: impl std::future::Future<Output = Result<(), DeliveryError>>) {
    if let Err(e) = delivery.await {
        log::error!("Failed to send message: {e}");
    }
}
