//! Chat history as [`FragmentRole::History`] fragments.
//!
//! Messages are supplied oldest first and emitted newest first, so the
//! composer keeps the most recent turns when the history allocation runs
//! out. Pair this with [`PromptComposer::render_reversed`] to print the kept
//! turns back in chronological order.
//!
//! [`PromptComposer::render_reversed`]: tessera_prompt::composer::PromptComposer::render_reversed

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tessera_core::{
    generic::{FragmentRole, PromptFragment},
    template::IntoFragments,
};
use tessera_prompt::builder::PromptBuilder;

use super::continuation::format_timestamp;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub timestamp: DateTime<Utc>,
    pub author: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(
        timestamp: DateTime<Utc>,
        author: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            author: author.into(),
            content: content.into(),
        }
    }

    /// `[Sunday, January 1, 2023 9:15 PM] alice: hello`
    pub fn render(&self) -> String {
        PromptBuilder::new()
            .add_stamped(
                format_timestamp(self.timestamp),
                &self.author,
                Some(self.content.trim()),
            )
            .finalize()
    }
}

pub struct ChatHistoryFragment<'a> {
    messages: &'a [ChatMessage],
}

impl<'a> ChatHistoryFragment<'a> {
    pub fn new(messages: &'a [ChatMessage]) -> Self {
        Self { messages }
    }
}

impl IntoFragments for ChatHistoryFragment<'_> {
    fn into_fragments(self) -> Vec<PromptFragment> {
        self.messages
            .iter()
            .rev()
            .map(|message| PromptFragment::new(message.render(), FragmentRole::History))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn emits_newest_first() {
        let messages = vec![
            ChatMessage::new(
                Utc.with_ymd_and_hms(2023, 1, 1, 21, 15, 0).unwrap(),
                "alice",
                "hi\n",
            ),
            ChatMessage::new(
                Utc.with_ymd_and_hms(2023, 1, 1, 21, 16, 0).unwrap(),
                "bot",
                "hello alice",
            ),
        ];

        let fragments = ChatHistoryFragment::new(&messages).into_fragments();
        let texts: Vec<_> = fragments.iter().map(PromptFragment::text).collect();

        assert_eq!(
            texts,
            vec![
                "[Sunday, January 1, 2023 9:16 PM] bot: hello alice",
                "[Sunday, January 1, 2023 9:15 PM] alice: hi",
            ]
        );
        assert!(
            fragments
                .iter()
                .all(|fragment| fragment.role() == FragmentRole::History)
        );
    }
}
