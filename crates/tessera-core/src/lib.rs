//! Provider-agnostic building blocks of the Tessera prompt composer.
//!
//! * [`generic`] – fragment roles, fragments and completion responses.
//! * [`budget`] – the validated token budget.
//! * [`settings`] – the configuration surface of a chat copilot.
//! * [`provider`] – the completion-invoker seam implemented by back-ends.
//! * [`client`] – a cheap-to-clone wrapper around one back-end.
pub mod budget;
pub mod client;
pub mod error;
pub mod generic;
pub mod model;
pub mod provider;
pub mod schema_util;
pub mod settings;
pub mod template;

pub use client::TesseraClient;
pub use provider::{CompletionParameters, TextCompletionProvider};
