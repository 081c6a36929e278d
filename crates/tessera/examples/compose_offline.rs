//! # Compose without a model
//!
//! Builds both prompts of a chat turn from a small conversation and prints
//! them together with the per-role token accounting. No network access and
//! no API key needed.
//!
//! ```bash
//! RUST_LOG=tessera_prompt=debug cargo run -p tessera --example compose_offline
//! ```
//!
//! Shrink `completion_token_limit` below to watch older history and less
//! relevant memories fall out of the prompt.
use anyhow::Context;
use chrono::{Duration, TimeZone, Utc};
use tessera::{
    generic::FragmentRole,
    model::OpenAiModel,
    prompt::composer::ComposedPrompt,
    settings::PromptSettings,
    types::{
        fragments::{ChatMessage, RetrievedMemory},
        prompts::ChatTurn,
    },
};
use tracing_subscriber::EnvFilter;

fn report(title: &str, prompt: &ComposedPrompt) {
    println!("===== {title} =====");
    println!("{}", prompt.text());
    println!(
        "----- {} of {} tokens -----",
        prompt.total_estimated_tokens(),
        prompt.available_tokens()
    );
    for role in FragmentRole::VARIABLE {
        let usage = prompt.usage(role);
        println!(
            "{role}: {} of {} allocated, {} kept, {} dropped",
            usage.used, usage.allocated, usage.included, usage.dropped
        );
    }
    println!();
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let settings = PromptSettings {
        completion_token_limit: 1400,
        response_token_limit: 256,
        ..PromptSettings::default()
    };

    let start = Utc
        .with_ymd_and_hms(2023, 1, 1, 21, 0, 0)
        .single()
        .context("fixed start time is unambiguous")?;
    let lines = [
        ("alice", "Hi! I'd like to build an app for my book club."),
        ("bot", "Sounds fun. What should members be able to do?"),
        ("alice", "Vote on the next book and schedule meetings."),
        ("bot", "Web, mobile, or both?"),
        ("alice", "Web first. Can you draft the README?"),
    ];
    let history: Vec<ChatMessage> = lines
        .iter()
        .enumerate()
        .map(|(minute, (author, content))| {
            ChatMessage::new(start + Duration::minutes(minute as i64), *author, *content)
        })
        .collect();

    let memories = vec![
        RetrievedMemory::new("preference", "alice prefers TypeScript", 0.62),
        RetrievedMemory::new("club", "the book club has twelve members", 0.81),
        RetrievedMemory::new("pets", "alice has a cat named Miso", 0.12),
    ];

    let turn = ChatTurn::new(&settings, OpenAiModel::Gpt4oMini, "alice")
        .with_history(&history)
        .with_memories(&memories)
        .at(start + Duration::minutes(6));

    report("intent prompt", &turn.intent_prompt()?);
    report(
        "response prompt",
        &turn.response_prompt("alice wants a README for a web app where a book club votes on \
            books and schedules meetings")?,
    );

    Ok(())
}
