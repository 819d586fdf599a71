//! ConvoBuddy - Main CLI Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use convobuddy::{
    cli::Args,
    config::Config,
    conversation::{CompletionOptions, ConversationManager},
    models::GeminiClient,
    repl::ReplSession,
    session::JsonFileStore,
};
use tracing_subscriber::EnvFilter;

fn init_tracing(args: &Args) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.verbosity().filter_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_manager(args: &Args) -> Result<ConversationManager> {
    let config = Config::load(args.config.clone()).context("Failed to load configuration")?;
    let mut session = config.session;
    args.apply_to(&mut session);

    let tokenizer = session
        .build_tokenizer()
        .context("Failed to initialize tokenizer")?;
    let generator = GeminiClient::with_config(
        &config.gemini.base_url,
        config.gemini.api_key(),
        config.gemini.timeout_secs,
    )
    .context("Failed to create Gemini client")?;
    let store = JsonFileStore::new(session.history_dir());

    let mut manager = ConversationManager::new(
        session,
        tokenizer,
        Box::new(generator),
        Box::new(store),
    )
    .context("Failed to start conversation session")?;

    if let Some(text) = &args.system_message {
        manager
            .set_custom_system_message(text)
            .context("Invalid --system-message")?;
    }

    Ok(manager)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load API key from .env if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args);

    let mut manager = build_manager(&args)?;

    if let Some(prompt) = &args.prompt {
        let reply = manager
            .chat_completion(prompt, CompletionOptions::default())
            .await;
        println!("{}", reply);

        let used = manager.total_tokens_used();
        eprintln!(
            "{}",
            format!(
                "[{}] {} / {} tokens, {} turns",
                manager.history_key(),
                used,
                manager.token_budget(),
                manager.history().len()
            )
            .dimmed()
        );
        return Ok(());
    }

    let line_history = dirs::home_dir().map(|home| home.join(".convobuddy_history"));
    let mut repl = match line_history {
        Some(path) => ReplSession::with_history(manager, path)?,
        None => ReplSession::new(manager)?,
    };

    repl.show_welcome(env!("CARGO_PKG_VERSION"));
    repl.run().await
}
