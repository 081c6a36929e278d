//! The two-stage chat turn of a copilot.
//!
//! 1. The model rewrites the user's last message into a self-contained
//!    intent, using the chat history as context.
//! 2. The rewritten intent, the most relevant memories and as much recent
//!    history as the budget allows are composed into the final prompt, which
//!    ends with the bot's timestamped speaker label.
//!
//! Both prompts go through [`PromptComposer`] with the budget described by
//! [`PromptSettings`], so neither can exceed the model's context window.
//!
//! ```rust,no_run
//! use tessera_core::{model::OpenAiModel, settings::PromptSettings, TextCompletionProvider};
//! use tessera_types::{fragments::ChatMessage, prompts::ChatTurn};
//!
//! async fn answer(provider: &impl TextCompletionProvider, history: &[ChatMessage]) {
//!     let settings = PromptSettings::default();
//!     let outcome = ChatTurn::new(&settings, OpenAiModel::Gpt4oMini, "alice")
//!         .with_history(history)
//!         .run(provider)
//!         .await;
//!
//!     if let Ok(outcome) = outcome {
//!         println!("{}", outcome.reply);
//!     }
//! }
//! ```
use chrono::{DateTime, Utc};
use tessera_core::{
    error::Result,
    generic::FragmentRole,
    model::Model,
    provider::{CompletionParameters, TextCompletionProvider},
    settings::{CompletionSettings, PromptSettings},
};
use tessera_prompt::{
    chain::FragmentChain,
    composer::{ComposedPrompt, PromptComposer},
    estimate::TokenEstimator,
};

use crate::fragments::{
    ChatHistoryFragment, ChatMessage, ContinuationFragment, MemoryFragment, RetrievedMemory,
    StaticFragment, SystemDescriptionFragment,
};

/// Result of a completed turn, with both prompts kept for inspection.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatTurnOutcome {
    /// The rewritten intent, trimmed.
    pub intent: String,
    /// The bot's answer, trimmed.
    pub reply: String,
    pub intent_prompt: ComposedPrompt,
    pub response_prompt: ComposedPrompt,
}

pub struct ChatTurn<'a> {
    settings: &'a PromptSettings,
    model: Model,
    audience: String,
    history: &'a [ChatMessage],
    memories: &'a [RetrievedMemory],
    now: Option<DateTime<Utc>>,
}

impl<'a> ChatTurn<'a> {
    /// `audience` is the name of the user the bot is talking to.
    pub fn new(
        settings: &'a PromptSettings,
        model: impl Into<Model>,
        audience: impl Into<String>,
    ) -> Self {
        Self {
            settings,
            model: model.into(),
            audience: audience.into(),
            history: &[],
            memories: &[],
            now: None,
        }
    }

    /// Chat messages, oldest first. The last one is the message to answer.
    pub fn with_history(mut self, history: &'a [ChatMessage]) -> Self {
        self.history = history;
        self
    }

    pub fn with_memories(mut self, memories: &'a [RetrievedMemory]) -> Self {
        self.memories = memories;
        self
    }

    /// Pin the timestamp used in the continuation lines.
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    /// Compose the prompt asking the model to rewrite the user's intent.
    ///
    /// # Errors
    ///
    /// Invalid settings or a budget too small for the fixed fragments.
    pub fn intent_prompt(&self) -> Result<ComposedPrompt> {
        self.intent_prompt_at(self.resolved_now())
    }

    /// Compose the final prompt around an already rewritten `intent`.
    ///
    /// # Errors
    ///
    /// Invalid settings or a budget too small for the fixed fragments.
    pub fn response_prompt(&self, intent: &str) -> Result<ComposedPrompt> {
        self.response_prompt_at(intent, self.resolved_now())
    }

    /// Run both stages against `provider`.
    ///
    /// # Errors
    ///
    /// Composition errors, or the provider's error unchanged. A failed intent
    /// stage never reaches the response stage.
    pub async fn run<P>(&self, provider: &P) -> Result<ChatTurnOutcome>
    where
        P: TextCompletionProvider + ?Sized,
    {
        let now = self.resolved_now();

        let intent_prompt = self.intent_prompt_at(now)?;
        let intent = self
            .complete(provider, &intent_prompt, self.settings.intent_settings())
            .await?;
        tracing::debug!(audience = %self.audience, intent = %intent, "rewrote user intent");

        let response_prompt = self.response_prompt_at(&intent, now)?;
        let reply = self
            .complete(provider, &response_prompt, self.settings.response_settings())
            .await?;
        tracing::info!(
            audience = %self.audience,
            prompt_tokens = response_prompt.total_estimated_tokens(),
            dropped = response_prompt.dropped_count(),
            "chat turn completed"
        );

        Ok(ChatTurnOutcome {
            intent,
            reply,
            intent_prompt,
            response_prompt,
        })
    }

    fn resolved_now(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now)
    }

    fn composer(&self) -> Result<PromptComposer> {
        let estimator = TokenEstimator::new(self.settings.token_estimate_factor)?;
        Ok(PromptComposer::new(estimator).render_reversed(FragmentRole::History))
    }

    fn description(&self) -> SystemDescriptionFragment<'_> {
        SystemDescriptionFragment::new(
            &self.settings.system_description,
            &self.settings.knowledge_cutoff,
        )
    }

    fn intent_prompt_at(&self, now: DateTime<Utc>) -> Result<ComposedPrompt> {
        let set = FragmentChain::new()
            .with(self.description())
            .with(StaticFragment::from(self.settings.system_intent.as_str()))
            .with(ChatHistoryFragment::new(self.history))
            .with(ContinuationFragment::intent(self.audience.as_str()).at(now))
            .build();

        self.composer()?.compose_set(&set, &self.settings.budget()?)
    }

    fn response_prompt_at(&self, intent: &str, now: DateTime<Utc>) -> Result<ComposedPrompt> {
        let mut set = FragmentChain::new()
            .with(self.description())
            .with(StaticFragment::from(self.settings.system_response.as_str()))
            .with(StaticFragment::new(intent, FragmentRole::Intent))
            .with(MemoryFragment::new(self.memories))
            .with(ChatHistoryFragment::new(self.history))
            .with(ContinuationFragment::response().at(now))
            .build();
        // History carries no priority, so only memories move.
        set.variable.sort_by_priority();

        self.composer()?.compose_set(&set, &self.settings.budget()?)
    }

    async fn complete<P>(
        &self,
        provider: &P,
        prompt: &ComposedPrompt,
        settings: CompletionSettings,
    ) -> Result<String>
    where
        P: TextCompletionProvider + ?Sized,
    {
        let params = CompletionParameters::new(prompt.text(), self.model.clone(), settings);
        let response = provider.complete(params).await?;
        Ok(response.text.trim().to_string())
    }
}
