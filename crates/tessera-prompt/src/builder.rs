//! Builder-style helper for rendering the text of a single fragment.
//!
//! Fragments are joined with one newline by the composer, so a fragment's own
//! text must not end with one. `PromptBuilder` writes line by line and strips
//! the final line break in [`PromptBuilder::finalize`]:
//!
//! ```rust
//! use tessera_prompt::builder::PromptBuilder;
//!
//! let text = PromptBuilder::new()
//!     .add_line("SINGLE RESPONSE FROM BOT TO USER:")
//!     .add_stamped("Sunday, January 1, 2023 9:15 PM", "bot", None::<&str>)
//!     .finalize();
//!
//! assert_eq!(text, "SINGLE RESPONSE FROM BOT TO USER:\n[Sunday, January 1, 2023 9:15 PM] bot:");
//! ```
//!
//! Whitespace is emitted exactly as requested; there is no smart formatting.

use std::fmt::Display;

#[derive(Debug, Default)]
pub struct PromptBuilder {
    buffer: String,
}

impl PromptBuilder {
    /// Create a fresh, empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plain line of text and a trailing newline.
    pub fn add_line(mut self, line: impl Display) -> Self {
        self.buffer.push_str(&line.to_string());
        self.buffer.push('\n');
        self
    }

    /// `Key: value`
    pub fn add_key_value(self, key: impl Display, value: impl Display) -> Self {
        self.add_line(format_args!("{key}: {value}"))
    }

    /// `[stamp] speaker: text`, or `[stamp] speaker:` when there is no text
    /// yet (the model is expected to continue the line).
    pub fn add_stamped(
        self,
        stamp: impl Display,
        speaker: impl Display,
        text: Option<impl Display>,
    ) -> Self {
        match text {
            Some(text) => self.add_line(format_args!("[{stamp}] {speaker}: {text}")),
            None => self.add_line(format_args!("[{stamp}] {speaker}:")),
        }
    }

    /// Insert a single blank line.
    pub fn add_blank_line(mut self) -> Self {
        self.buffer.push('\n');
        self
    }

    /// Retrieve the accumulated text without its final line break.
    pub fn finalize(mut self) -> String {
        if self.buffer.ends_with('\n') {
            self.buffer.pop();
        }
        self.buffer
    }
}
