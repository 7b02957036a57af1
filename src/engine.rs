// src/engine.rs
use crate::completion::CompletionClient;
use crate::conversation::{ConversationBuilder, MarkerConversationBuilder};
use crate::error::{QuizError, StoreError};
use crate::judgment::Judgment;
use crate::locks::ScopeLocks;
use crate::prompts::{GIVE_HINT, INVENT_PUZZLE, PromptSet, REVEAL_SOLUTION, SUMMARIZE};
use crate::store::TranscriptStore;
use crate::transcript::{Transcript, Turn, decode};

use std::sync::Arc;

/// What an operation produced for the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// No round exists in this scope.
    NoActiveRound,
    PuzzleCreated { puzzle: String },
    /// Create was called while a round was already running.
    PuzzleInProgress { puzzle: String },
    Answered { question: String, response: String },
    Hint { hint: String },
    Summary { summary: String },
    Judged { answer: String, judgment: Judgment },
    Solution { solution: String },
    RoundEnded,
}

#[derive(Debug)]
pub struct RoundOutcome {
    pub reply: Reply,
    /// Set when the reply was produced but the transcript could not be updated.
    pub persistence_failure: Option<StoreError>,
}

impl RoundOutcome {
    fn reply(reply: Reply) -> Self {
        Self {
            reply,
            persistence_failure: None,
        }
    }

    fn with_failure(reply: Reply, persistence_failure: Option<StoreError>) -> Self {
        Self {
            reply,
            persistence_failure,
        }
    }
}

// Each operation holds its scope's lock from the first read to the last write,
// model call included. A failed model call writes nothing.
pub struct QuizRoundEngine {
    store: Arc<dyn TranscriptStore>,
    completion: Arc<dyn CompletionClient>,
    builder: Arc<dyn ConversationBuilder>,
    prompts: PromptSet,
    locks: ScopeLocks,
}

impl QuizRoundEngine {
    pub fn new(store: Arc<dyn TranscriptStore>, completion: Arc<dyn CompletionClient>) -> Self {
        Self {
            store,
            completion,
            builder: Arc::new(MarkerConversationBuilder::default()),
            prompts: PromptSet::default(),
            locks: ScopeLocks::new(),
        }
    }

    pub fn with_prompts(mut self, prompts: PromptSet) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn with_conversation_builder(mut self, builder: Arc<dyn ConversationBuilder>) -> Self {
        self.builder = builder;
        self
    }

    pub async fn create(&self, scope: &str) -> Result<RoundOutcome, QuizError> {
        log::info!("Handling create for scope: {scope}");
        let _guard = self.locks.acquire(scope).await;

        if let Some(transcript) = self.load(scope).await? {
            let puzzle = transcript.puzzle().unwrap_or_default().to_string();
            log::info!("Round already running in {scope}, returning stored puzzle");
            return Ok(RoundOutcome::reply(Reply::PuzzleInProgress { puzzle }));
        }

        let output = self
            .complete(&self.prompts.puzzle, &Transcript::default(), INVENT_PUZZLE)
            .await?;
        let transcript = Transcript::new(Turn::puzzle(&output));

        // Nothing has been shown yet, so a failed write abandons the round.
        self.store.write(scope, &transcript.encode()).await?;
        log::info!("Saved new puzzle for scope: {scope}");

        let puzzle = transcript.puzzle().unwrap_or_default().to_string();
        Ok(RoundOutcome::reply(Reply::PuzzleCreated { puzzle }))
    }

    pub async fn ask(&self, scope: &str, question: &str) -> Result<RoundOutcome, QuizError> {
        log::info!("Handling question for scope {scope}: {question}");
        if question.trim().is_empty() {
            return Err(QuizError::BlankInput("question"));
        }
        let _guard = self.locks.acquire(scope).await;

        let Some(mut transcript) = self.load(scope).await? else {
            return Ok(RoundOutcome::reply(Reply::NoActiveRound));
        };

        let question_turn = Turn::question(question);
        let response = self
            .complete(&self.prompts.question, &transcript, &question_turn.text)
            .await?;

        transcript.push(question_turn);
        transcript.push(Turn::response(&response));
        let failure = self.persist(scope, &transcript).await;

        Ok(RoundOutcome::with_failure(
            Reply::Answered {
                question: question.to_string(),
                response,
            },
            failure,
        ))
    }

    pub async fn hint(&self, scope: &str) -> Result<RoundOutcome, QuizError> {
        log::info!("Handling hint for scope: {scope}");
        let _guard = self.locks.acquire(scope).await;

        let Some(mut transcript) = self.load(scope).await? else {
            return Ok(RoundOutcome::reply(Reply::NoActiveRound));
        };

        let hint = self
            .complete(&self.prompts.hint, &transcript, GIVE_HINT)
            .await?;

        transcript.push(Turn::response(&hint));
        let failure = self.persist(scope, &transcript).await;

        Ok(RoundOutcome::with_failure(Reply::Hint { hint }, failure))
    }

    pub async fn info(&self, scope: &str) -> Result<RoundOutcome, QuizError> {
        log::info!("Handling info for scope: {scope}");
        let _guard = self.locks.acquire(scope).await;

        let Some(mut transcript) = self.load(scope).await? else {
            return Ok(RoundOutcome::reply(Reply::NoActiveRound));
        };

        let summary = self
            .complete(&self.prompts.info, &transcript, SUMMARIZE)
            .await?;

        transcript.push(Turn::response(&summary));
        let failure = self.persist(scope, &transcript).await;

        Ok(RoundOutcome::with_failure(Reply::Summary { summary }, failure))
    }

    pub async fn answer(&self, scope: &str, answer: &str) -> Result<RoundOutcome, QuizError> {
        log::info!("Handling answer for scope {scope}: {answer}");
        if answer.trim().is_empty() {
            return Err(QuizError::BlankInput("answer"));
        }
        let _guard = self.locks.acquire(scope).await;

        let Some(mut transcript) = self.load(scope).await? else {
            return Ok(RoundOutcome::reply(Reply::NoActiveRound));
        };

        let answer_turn = Turn::answer(answer);
        let output = self
            .complete(&self.prompts.answer, &transcript, &answer_turn.text)
            .await?;
        let judgment = Judgment::classify(&output);
        log::info!("Answer judged correct: {}", judgment.is_correct);

        let failure = if judgment.is_correct {
            self.remove(scope).await
        } else {
            transcript.push(answer_turn);
            transcript.push(Turn::response(&output));
            self.persist(scope, &transcript).await
        };

        Ok(RoundOutcome::with_failure(
            Reply::Judged {
                answer: answer.to_string(),
                judgment,
            },
            failure,
        ))
    }

    pub async fn give_up(&self, scope: &str) -> Result<RoundOutcome, QuizError> {
        log::info!("Handling give up for scope: {scope}");
        let _guard = self.locks.acquire(scope).await;

        let Some(transcript) = self.load(scope).await? else {
            return Ok(RoundOutcome::reply(Reply::NoActiveRound));
        };

        let solution = self
            .complete(&self.prompts.giveup, &transcript, REVEAL_SOLUTION)
            .await?;
        let failure = self.remove(scope).await;

        Ok(RoundOutcome::with_failure(Reply::Solution { solution }, failure))
    }

    /// Ends the round without asking the model. A failed delete is an error
    /// here since there is no other reply to deliver.
    pub async fn quit(&self, scope: &str) -> Result<RoundOutcome, QuizError> {
        log::info!("Handling quit for scope: {scope}");
        let _guard = self.locks.acquire(scope).await;

        if self.load(scope).await?.is_none() {
            return Ok(RoundOutcome::reply(Reply::NoActiveRound));
        }

        self.store.delete(scope).await?;
        log::info!("Round in {scope} ended by quit");
        Ok(RoundOutcome::reply(Reply::RoundEnded))
    }

    /// Reads the scope's transcript. An absent or blank blob means no round.
    async fn load(&self, scope: &str) -> Result<Option<Transcript>, StoreError> {
        let Some(text) = self.store.read(scope).await? else {
            log::info!("No round found for scope: {scope}");
            return Ok(None);
        };
        let transcript = decode(&text);
        if transcript.is_empty() {
            log::info!("Empty transcript for scope: {scope}");
            return Ok(None);
        }
        Ok(Some(transcript))
    }

    async fn complete(
        &self,
        system_prompt: &str,
        transcript: &Transcript,
        utterance: &str,
    ) -> Result<String, QuizError> {
        let messages = self.builder.build(system_prompt, transcript, utterance);
        for (i, message) in messages.iter().enumerate() {
            log::debug!("Message {i} - Role: {}, Content: {}", message.role, message.content);
        }

        let completion = self
            .completion
            .create_completion(&messages)
            .await
            .inspect_err(|e| log::error!("Failed to create chat completion: {e}"))?;
        let content = completion
            .first_content()
            .inspect_err(|e| log::error!("Unusable completion: {e}"))?
            .to_string();

        log::info!("Received completion: {content}");
        Ok(content)
    }

    async fn persist(&self, scope: &str, transcript: &Transcript) -> Option<StoreError> {
        match self.store.write(scope, &transcript.encode()).await {
            Ok(()) => {
                log::info!("Updated transcript for scope: {scope}");
                None
            }
            Err(e) => {
                log::error!("Failed to update transcript, delivering reply anyway: {e}");
                Some(e)
            }
        }
    }

    async fn remove(&self, scope: &str) -> Option<StoreError> {
        match self.store.delete(scope).await {
            Ok(()) => {
                log::info!("Deleted transcript for scope: {scope}");
                None
            }
            Err(e) => {
                log::error!("Failed to delete transcript, delivering reply anyway: {e}");
                Some(e)
            }
        }
    }
}
