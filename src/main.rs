//! Multi-turn prompts bot
//!
//! Console entry point

use anyhow::Context;
use tracing::info;

use multiturn_prompts_bot::{
    adapter::ConsoleAdapter,
    config::Settings,
    state::create_storage,
    utils::logging,
    PromptBot,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("failed to load configuration")?;
    settings.validate()?;

    // Initialize logging; the guard flushes the file writer on exit
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", multiturn_prompts_bot::info());

    let storage = create_storage(&settings).await?;
    let bot = PromptBot::new(storage, settings.bot.clone());

    let mut adapter = ConsoleAdapter::stdio();
    let processed = adapter.run(&bot).await?;

    info!(processed, "Bot has been shut down.");
    Ok(())
}
