//! Retrieved memories as [`FragmentRole::Memory`] fragments, most relevant
//! first.
//!
//! Relevance is carried as the fragment priority (`relevance × 1000`,
//! rounded), so memories from several sources can be re-ranked together with
//! [`VariableFragments::sort_by_priority`].
//!
//! [`VariableFragments::sort_by_priority`]: tessera_prompt::chain::VariableFragments::sort_by_priority

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};
use tessera_core::{
    generic::{FragmentRole, PromptFragment},
    template::IntoFragments,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedMemory {
    pub label: String,
    pub details: String,
    /// Higher is more relevant. Usually a similarity in `[0, 1]`.
    pub relevance: f64,
}

impl RetrievedMemory {
    pub fn new(label: impl Into<String>, details: impl Into<String>, relevance: f64) -> Self {
        Self {
            label: label.into(),
            details: details.into(),
            relevance,
        }
    }

    fn to_fragment(&self) -> PromptFragment {
        PromptFragment::new(
            format!("[{}] {}", self.label.trim(), self.details.trim()),
            FragmentRole::Memory,
        )
        .with_priority((self.relevance * 1000.0).round() as i32)
    }
}

pub struct MemoryFragment<'a> {
    memories: &'a [RetrievedMemory],
}

impl<'a> MemoryFragment<'a> {
    pub fn new(memories: &'a [RetrievedMemory]) -> Self {
        Self { memories }
    }
}

impl IntoFragments for MemoryFragment<'_> {
    fn into_fragments(self) -> Vec<PromptFragment> {
        let mut ranked: Vec<PromptFragment> =
            self.memories.iter().map(RetrievedMemory::to_fragment).collect();
        // Stable: equal priority keeps retrieval order.
        ranked.sort_by_key(|fragment| Reverse(fragment.priority()));

        ranked
    }
}
