use std::{future::Future, pin::Pin};

use crate::{
    error::Result, generic::GenericCompletionResponse, model::Model,
    settings::CompletionSettings,
};

/// A **backend** turns a finished prompt string into a network call to a
/// concrete provider (OpenAI, Azure OpenAI, a local server, …) and returns
/// the generated text.
///
/// The trait is intentionally minimal:
///
/// * **No prompt logic** – the prompt arrives fully composed and within
///   budget; the provider must not trim or reorder it.
/// * **One async-ish method** – `complete`, a single non-streaming
///   round-trip. Failures are returned as they are, never retried here.
///
/// The method returns a [`Pin<Box<dyn Future>>`] so we stay object-safe
/// without pulling in `async_trait`. Dropping the future cancels the call.
pub trait TextCompletionProvider: Send + Sync {
    fn complete<'p>(
        &'p self,
        params: CompletionParameters,
    ) -> Pin<Box<dyn Future<Output = Result<GenericCompletionResponse>> + Send + 'p>>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionParameters {
    pub prompt: String,
    pub model: Model,
    pub settings: CompletionSettings,
}

impl CompletionParameters {
    pub fn new(prompt: impl Into<String>, model: Model, settings: CompletionSettings) -> Self {
        Self {
            prompt: prompt.into(),
            model,
            settings,
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn model(&self) -> Model {
        self.model.clone()
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.settings.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.settings.max_tokens = max_tokens;
        self
    }
}
