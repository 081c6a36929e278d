//! Conversion of domain values into prompt fragments.
//!
//! A chat turn usually mixes hand-written instructions, retrieved memories and
//! stored messages. Instead of formatting them into one string, each value
//! implements [`IntoFragments`] and yields role-tagged fragments that the
//! composer can budget individually.
//!
//! ```rust
//! use tessera_core::generic::{FragmentRole, PromptFragment};
//! use tessera_core::template::IntoFragments;
//!
//! struct Persona(&'static str);
//!
//! impl IntoFragments for Persona {
//!     fn into_fragments(self) -> Vec<PromptFragment> {
//!         vec![PromptFragment::new(self.0, FragmentRole::System)]
//!     }
//! }
//!
//! let fragments = Persona("You are a helpful bot.").into_fragments();
//! assert_eq!(fragments[0].role(), FragmentRole::System);
//! ```
use crate::generic::PromptFragment;

/// Converts a value into role-tagged prompt fragments.
pub trait IntoFragments {
    /// Consume `self` and return **all** fragments in relevance order.
    fn into_fragments(self) -> Vec<PromptFragment>;
}

/// A single fragment can be passed wherever fragments are expected.
impl IntoFragments for PromptFragment {
    fn into_fragments(self) -> Vec<PromptFragment> {
        vec![self]
    }
}

impl IntoFragments for Vec<PromptFragment> {
    fn into_fragments(self) -> Vec<PromptFragment> {
        self
    }
}

impl<T: IntoFragments> IntoFragments for Option<T> {
    fn into_fragments(self) -> Vec<PromptFragment> {
        self.map(IntoFragments::into_fragments).unwrap_or_default()
    }
}
