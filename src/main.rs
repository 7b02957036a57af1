use anyhow::Context;
use std::sync::Arc;
use umigame::{
    CommandTable, FileTranscriptStore, OpenAiCompletion, PromptSet, QuizBot, QuizRoundEngine,
    Settings, console, logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load_settings_from_file(&path)
            .with_context(|| format!("failed to load settings from {path}"))?,
        None => Settings::load().context("failed to load settings")?,
    }
    .with_env_overrides();

    if let Err(e) = logging::init(&settings.data_dir, settings.debug_mode) {
        eprintln!("Logging disabled: {e}");
    }
    log::info!("Starting umigame bot: {}", chrono::Local::now());

    let completion = OpenAiCompletion::from_settings(&settings)
        .context("set OPENAI_API_KEY or openai_api_key in the settings file")?;
    let prompts = match &settings.prompt_dir {
        Some(dir) => PromptSet::load_from_dir(dir),
        None => PromptSet::default(),
    };
    let store = FileTranscriptStore::new(settings.rounds_dir());
    log::info!("Storing rounds under {}", store.root().display());

    let engine = QuizRoundEngine::new(Arc::new(store), Arc::new(completion)).with_prompts(prompts);
    let bot = QuizBot::new(Arc::new(engine), CommandTable::default());
    log::info!("Registered commands: {}", bot.commands().names().join(", "));

    console::run(&bot, &settings.scope).await?;

    log::info!("Bot has been stopped");
    Ok(())
}
