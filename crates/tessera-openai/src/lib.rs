//! OpenAI back-end for the Tessera prompt composer.
//!
//! [`OpenAiAdapter`] implements [`tessera_core::TextCompletionProvider`] on
//! top of the `chat/completions` endpoint: the composed prompt is sent as a
//! single user message and the first choice comes back as plain text.
mod adapter;
mod model_map;
mod provider_impl_completion;

pub use adapter::{OpenAiAdapter, OpenAiAdapterBuilder};
pub mod api_v1;
mod client;
pub mod error;

pub use client::OpenAiClient;
