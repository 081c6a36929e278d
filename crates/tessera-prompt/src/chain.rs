//! Simple **builder** that sorts values implementing
//! [`IntoFragments`](tessera_core::template::IntoFragments) into the two
//! inputs of the composer.
//!
//! ```text
//! ┌────────────────┐   IntoFragments   ┌──────────────────────────────┐
//! │ StaticFragment │ ─────────────────►│ fixed: Vec<PromptFragment>   │
//! ├────────────────┤                   ├──────────────────────────────┤
//! │ MemoryFragments│ ─────────────────►│ variable: Memory → [...]     │
//! ├────────────────┤                   │           History → [...]    │
//! │ …              │ ─────────────────►│                              │
//! └────────────────┘                   └──────────────────────────────┘
//!            ▲                                     │
//!            └────────── FragmentChain::build() ◄──┘
//! ```
//!
//! Routing happens by role: system, intent and continuation fragments are
//! fixed, memory and history fragments are variable. Within each bucket the
//! insertion order is kept, so feed variable fragments most-relevant first.
//!
//! ```rust
//! use tessera_core::generic::{FragmentRole, PromptFragment};
//! use tessera_prompt::chain::FragmentChain;
//!
//! let set = FragmentChain::new()
//!     .with(PromptFragment::new("You are a helpful bot.", FragmentRole::System))
//!     .with(PromptFragment::new("[10:00] alice: hi", FragmentRole::History))
//!     .with(PromptFragment::new("bot:", FragmentRole::Continuation))
//!     .build();
//!
//! assert_eq!(set.fixed.len(), 2);
//! assert_eq!(set.variable.get(FragmentRole::History).len(), 1);
//! ```
use std::collections::BTreeMap;

use tessera_core::{
    error::{Result, TesseraError},
    generic::{FragmentRole, PromptFragment},
    template::IntoFragments,
};

/// Variable-role fragments, each sequence ordered most-relevant first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableFragments(BTreeMap<FragmentRole, Vec<PromptFragment>>);

impl VariableFragments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `fragment` to the end of its role's sequence.
    ///
    /// # Errors
    ///
    /// [`TesseraError::InvalidRequest`] if the fragment has a fixed role.
    pub fn push(&mut self, fragment: PromptFragment) -> Result<()> {
        let role = fragment.role();
        if role.is_fixed() {
            return Err(TesseraError::InvalidRequest(format!(
                "`{role}` fragments are fixed and cannot compete for budget"
            )));
        }

        self.0.entry(role).or_default().push(fragment);
        Ok(())
    }

    /// Fragments supplied for `role`, in supply order.
    pub fn get(&self, role: FragmentRole) -> &[PromptFragment] {
        self.0.get(&role).map(Vec::as_slice).unwrap_or_default()
    }

    /// Stable sort of every role's sequence by descending priority.
    pub fn sort_by_priority(&mut self) {
        for fragments in self.0.values_mut() {
            fragments.sort_by_key(|fragment| std::cmp::Reverse(fragment.priority()));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }
}

/// The composer's input: mandatory fragments plus budgeted candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentSet {
    pub fixed: Vec<PromptFragment>,
    pub variable: VariableFragments,
}

/// Accumulates fragments and routes them by role.
///
/// The builder takes `self` by value so call-chains stay concise.
#[derive(Debug, Default)]
pub struct FragmentChain(FragmentSet);

impl FragmentChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the fragments produced by `with` to the chain.
    pub fn with(mut self, with: impl IntoFragments) -> Self {
        for fragment in with.into_fragments() {
            if fragment.role().is_fixed() {
                self.0.fixed.push(fragment);
            } else {
                self.0
                    .variable
                    .0
                    .entry(fragment.role())
                    .or_default()
                    .push(fragment);
            }
        }
        self
    }

    /// Consume the builder and return the routed fragments.
    pub fn build(self) -> FragmentSet {
        self.0
    }
}
