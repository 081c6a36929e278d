//! Generic fragment and response types used by the *tessera-core* crate.
//!
//! A prompt is never a free-form string inside this workspace. It is a list
//! of [`PromptFragment`]s, each tagged with a [`FragmentRole`] that decides
//! whether the fragment is mandatory or competes for a share of the token
//! budget, and where it lands in the rendered text.
//!
//! ## When to add more fields?
//!
//! Only if the data is needed by the composer itself. Retrieval metadata
//! (embeddings, message ids, …) belongs to the caller; fold it into
//! `priority` or the text before the fragment is built.
use std::fmt::Display;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Semantic category of a fragment.
///
/// The declaration order is the render order of a composed prompt, so the
/// derived `Ord` can be used directly to sort fragments.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum FragmentRole {
    /// Global instructions: persona, behaviour, knowledge cutoff.
    System,
    /// The user's last message rewritten into a self-contained intent.
    Intent,
    /// Snippets retrieved from long-term memory.
    Memory,
    /// Previous chat messages.
    History,
    /// Trailing marker that tells the model who speaks next.
    Continuation,
}

impl FragmentRole {
    /// Roles that compete for a weighted share of the budget.
    pub const VARIABLE: [FragmentRole; 2] = [FragmentRole::Memory, FragmentRole::History];

    /// Fixed fragments are always included in full.
    pub fn is_fixed(self) -> bool {
        !self.is_variable()
    }

    pub fn is_variable(self) -> bool {
        matches!(self, FragmentRole::Memory | FragmentRole::History)
    }
}

impl Display for FragmentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FragmentRole::System => write!(f, "system"),
            FragmentRole::Intent => write!(f, "intent"),
            FragmentRole::Memory => write!(f, "memory"),
            FragmentRole::History => write!(f, "history"),
            FragmentRole::Continuation => write!(f, "continuation"),
        }
    }
}

/// An atomic, pre-rendered piece of prompt text.
///
/// Fragments are immutable once handed to the composer: the fields are
/// private and the `with_*` setters consume `self`, so a fragment can only be
/// shaped while it is being built.
///
/// ```rust
/// use tessera_core::generic::{FragmentRole, PromptFragment};
///
/// let memory = PromptFragment::new("User prefers dark mode.", FragmentRole::Memory)
///     .with_priority(870)
///     .with_estimated_tokens(6);
///
/// assert_eq!(memory.estimated_tokens(), Some(6));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptFragment {
    text: String,
    role: FragmentRole,
    priority: i32,
    estimated_tokens: Option<usize>,
}

impl PromptFragment {
    pub fn new(text: impl Into<String>, role: FragmentRole) -> Self {
        Self {
            text: text.into(),
            role,
            priority: 0,
            estimated_tokens: None,
        }
    }

    /// Attach a caller-defined priority (higher is more relevant).
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Pin the token cost instead of letting the composer estimate it.
    pub fn with_estimated_tokens(mut self, tokens: usize) -> Self {
        self.estimated_tokens = Some(tokens);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn role(&self) -> FragmentRole {
        self.role
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Precomputed token cost, if any.
    pub fn estimated_tokens(&self) -> Option<usize> {
        self.estimated_tokens
    }
}

/// Token accounting reported by a completion provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenericUsageReport {
    pub prompt_tokens: i64,
    pub completion_tokens: i64,
    pub total_tokens: i64,
}

/// Generated text returned by a [`crate::provider::TextCompletionProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericCompletionResponse {
    pub text: String,
    pub usage: Option<GenericUsageReport>,
}
