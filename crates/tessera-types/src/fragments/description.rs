//! The system description of the copilot, followed by its knowledge cutoff.

use tessera_core::{
    generic::{FragmentRole, PromptFragment},
    template::IntoFragments,
};
use tessera_prompt::builder::PromptBuilder;

pub struct SystemDescriptionFragment<'a> {
    description: &'a str,
    knowledge_cutoff: &'a str,
}

impl<'a> SystemDescriptionFragment<'a> {
    pub fn new(description: &'a str, knowledge_cutoff: &'a str) -> Self {
        Self {
            description,
            knowledge_cutoff,
        }
    }
}

impl IntoFragments for SystemDescriptionFragment<'_> {
    fn into_fragments(self) -> Vec<PromptFragment> {
        let mut builder = PromptBuilder::new().add_line(self.description.trim());
        if !self.knowledge_cutoff.trim().is_empty() {
            builder = builder
                .add_blank_line()
                .add_key_value("Knowledge cutoff", self.knowledge_cutoff.trim());
        }

        vec![PromptFragment::new(builder.finalize(), FragmentRole::System)]
    }
}
