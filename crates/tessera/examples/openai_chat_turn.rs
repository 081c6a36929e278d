//! # One chat turn against OpenAI
//!
//! Runs the two-stage turn (intent rewrite, then answer) for a short
//! conversation and prints both completions.
//!
//! ```bash
//! export OPENAI_API_KEY=sk-…                 # mandatory
//! export OPENAI_BASE_URL=http://localhost:8080/v1   # optional
//! export TESSERA_SETTINGS=settings.json      # optional, see `settings_schema()`
//! RUST_LOG=info cargo run -p tessera --example openai_chat_turn
//! ```
use chrono::{Duration, Utc};
use tessera::{
    TesseraClient,
    model::OpenAiModel,
    openai::OpenAiAdapterBuilder,
    settings::PromptSettings,
    types::{fragments::ChatMessage, prompts::ChatTurn},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let settings = match std::env::var("TESSERA_SETTINGS") {
        Ok(path) => PromptSettings::from_path(path)?,
        Err(_) => PromptSettings::default(),
    };

    // 1. Build the backend from the environment (needs OPENAI_API_KEY).
    let backend = OpenAiAdapterBuilder::new_from_env().build()?;
    let client = TesseraClient::new(backend);

    // 2. A short conversation, oldest first.
    let now = Utc::now();
    let history = vec![
        ChatMessage::new(
            now - Duration::minutes(2),
            "alice",
            "I want a tiny app that tracks the plants on my balcony.",
        ),
        ChatMessage::new(now - Duration::minutes(1), "bot", "Which platform do you use most?"),
        ChatMessage::new(now, "alice", "My phone, but a web app is fine."),
    ];

    // 3. Rewrite the intent, then answer.
    let outcome = ChatTurn::new(&settings, OpenAiModel::Gpt4oMini, "alice")
        .with_history(&history)
        .run(&client)
        .await?;

    println!("Intent: {}", outcome.intent);
    println!("Reply:  {}", outcome.reply);
    println!(
        "Prompt used {} of {} tokens",
        outcome.response_prompt.total_estimated_tokens(),
        outcome.response_prompt.available_tokens()
    );

    Ok(())
}
