//! A minimal fragment that injects a *static* string into the prompt.
//!
//! Use this for pre-determined text (instructions, safety notices, a
//! rewritten intent) that is included verbatim.
//!
//! ```rust
//! use tessera_types::fragments::StaticFragment;
//! use tessera_core::{generic::FragmentRole, template::IntoFragments};
//!
//! let fragments = StaticFragment::new(
//!     "You are a multilingual proof-reading engine.",
//!     FragmentRole::System,
//! )
//! .into_fragments();
//!
//! assert_eq!(fragments[0].role(), FragmentRole::System);
//! ```
//!
//! The `From<&str>` impl defaults to [`FragmentRole::System`] since system
//! instructions are the most common static fragments. Blank text yields no
//! fragment at all.

use tessera_core::{
    generic::{FragmentRole, PromptFragment},
    template::IntoFragments,
};

/// A borrowed static string bundled with a fragment role.
pub struct StaticFragment<'a>((&'a str, FragmentRole));

impl<'a> From<&'a str> for StaticFragment<'a> {
    fn from(value: &'a str) -> Self {
        Self((value, FragmentRole::System))
    }
}

impl<'a> StaticFragment<'a> {
    /// Create a new fragment with explicit role.
    pub fn new(value: &'a str, role: FragmentRole) -> Self {
        Self((value, role))
    }
}

impl IntoFragments for StaticFragment<'_> {
    fn into_fragments(self) -> Vec<PromptFragment> {
        let (text, role) = self.0;
        let text = text.trim();
        if text.is_empty() {
            return vec![];
        }

        vec![PromptFragment::new(text, role)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_system() {
        let fragments = StaticFragment::from("  be brief \n").into_fragments();

        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].text(), "be brief");
        assert_eq!(fragments[0].role(), FragmentRole::System);
    }

    #[test]
    fn blank_text_yields_nothing() {
        assert!(
            StaticFragment::new("  ", FragmentRole::Intent)
                .into_fragments()
                .is_empty()
        );
    }
}
