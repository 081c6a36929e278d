//! A small **prompt fragment** that ends the prompt with a timestamped
//! speaker label, so the model continues as that speaker.
//!
//! # What it adds
//!
//! ```text
//! SINGLE RESPONSE FROM BOT TO USER:
//! [Sunday, January 1, 2023 9:15 PM] bot:
//! ```
//!
//! # Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use tessera_core::template::IntoFragments;
//! use tessera_types::fragments::ContinuationFragment;
//!
//! let now = Utc.with_ymd_and_hms(2023, 1, 1, 21, 15, 0).unwrap();
//! let fragments = ContinuationFragment::response()
//!     .at(now)
//!     .into_fragments();
//!
//! assert_eq!(
//!     fragments[0].text(),
//!     "SINGLE RESPONSE FROM BOT TO USER:\n[Sunday, January 1, 2023 9:15 PM] bot:"
//! );
//! ```
//!
//! Without [`ContinuationFragment::at`] the current UTC time is used.

use chrono::{DateTime, Utc};
use tessera_core::{
    generic::{FragmentRole, PromptFragment},
    template::IntoFragments,
};
use tessera_prompt::builder::PromptBuilder;

pub const RESPONSE_HEADER: &str = "SINGLE RESPONSE FROM BOT TO USER:";
pub const INTENT_HEADER: &str = "REWRITTEN INTENT WITH EMBEDDED CONTEXT:";
pub const BOT_SPEAKER: &str = "bot";

/// `Sunday, January 1, 2023 9:15 PM`
pub const TIMESTAMP_FORMAT: &str = "%A, %B %-d, %Y %-I:%M %p";

pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

pub struct ContinuationFragment {
    header: String,
    speaker: String,
    now: Option<DateTime<Utc>>,
}

impl ContinuationFragment {
    pub fn new(header: impl Into<String>, speaker: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            speaker: speaker.into(),
            now: None,
        }
    }

    /// The bot answers the user.
    pub fn response() -> Self {
        Self::new(RESPONSE_HEADER, BOT_SPEAKER)
    }

    /// The model restates what `audience` meant.
    pub fn intent(audience: impl Into<String>) -> Self {
        Self::new(INTENT_HEADER, audience)
    }

    /// Pin the timestamp instead of reading the clock.
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }
}

impl IntoFragments for ContinuationFragment {
    fn into_fragments(self) -> Vec<PromptFragment> {
        let now = self.now.unwrap_or_else(Utc::now);

        let text = PromptBuilder::new()
            .add_line(&self.header)
            .add_stamped(format_timestamp(now), &self.speaker, None::<&str>)
            .finalize();

        vec![PromptFragment::new(text, FragmentRole::Continuation)]
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn intent_continuation_names_the_audience() {
        let now = Utc.with_ymd_and_hms(2023, 3, 14, 9, 5, 0).unwrap();

        let fragments = ContinuationFragment::intent("alice").at(now).into_fragments();

        assert_eq!(
            fragments[0].text(),
            "REWRITTEN INTENT WITH EMBEDDED CONTEXT:\n[Tuesday, March 14, 2023 9:05 AM] alice:"
        );
        assert_eq!(fragments[0].role(), FragmentRole::Continuation);
    }
}
