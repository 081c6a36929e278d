//! # `tessera` – The umbrella crate
//!
//! This crate is a *one-stop import* that glues together the building-block
//! crates of the workspace:
//!
//! | Crate                 | What it provides                                                    |
//! |-----------------------|---------------------------------------------------------------------|
//! | **`tessera-core`**    | Fragments, budget, settings, provider trait, generic client, errors |
//! | **`tessera-prompt`**  | The budget-aware composer, fragment chains, skill registry          |
//! | **`tessera-types`**   | Ready-made fragments and the two-stage chat turn                    |
//! | **`tessera-openai`**  | HTTP invoker for OpenAI's `chat/completions` *(optional)*           |
//!
//! The `openai` feature is on by default. Disable default features to stay
//! provider-agnostic and bring your own [`TextCompletionProvider`].
//!
//! ```toml
//! [dependencies]
//! tessera = { version = "0.1", default-features = false }
//! ```
//!
//! ## Quick example
//!
//! ```rust
//! use tessera::{
//!     budget::PromptBudget,
//!     generic::{FragmentRole, PromptFragment},
//!     prompt::{chain::FragmentChain, composer::PromptComposer},
//! };
//!
//! let budget = PromptBudget::new(8192, 1024)?
//!     .with_weight(FragmentRole::Memory, 0.3)?
//!     .with_weight(FragmentRole::History, 0.3)?;
//!
//! let set = FragmentChain::new()
//!     .with(PromptFragment::new("You are a helpful copilot.", FragmentRole::System))
//!     .with(PromptFragment::new("alice likes tea", FragmentRole::Memory))
//!     .with(PromptFragment::new("bot:", FragmentRole::Continuation))
//!     .build();
//!
//! let prompt = PromptComposer::default().compose_set(&set, &budget)?;
//! assert_eq!(prompt.text(), "You are a helpful copilot.\nalice likes tea\nbot:");
//! # Ok::<(), tessera::error::TesseraError>(())
//! ```
#![doc(html_root_url = "https://docs.rs/tessera/latest")]

pub use tessera_core::*;
pub use tessera_prompt as prompt;
pub use tessera_types as types;

#[cfg(feature = "openai")]
pub use tessera_openai as openai;
