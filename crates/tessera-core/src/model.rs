//! Model identifiers used throughout the **tessera** workspace.
//!
//! Each provider crate maps the variants onto its own naming scheme, so
//! application code picks an enum variant instead of typing model strings.
//! [`Model::Custom`] covers anything else, including names read from
//! configuration at runtime.
//!
//! ```rust
//! use tessera_core::model::{Model, OpenAiModel};
//! assert_eq!(Model::from(OpenAiModel::Gpt4oMini),
//!            Model::OpenAi(OpenAiModel::Gpt4oMini));
//! ```
use std::borrow::Cow;

/// Universal identifier for an LLM model.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    /// Built-in OpenAI models (chat completion API).
    OpenAi(OpenAiModel),
    /// Provider specific model name passed through unchanged.
    Custom(Cow<'static, str>),
}

impl Model {
    pub fn custom(name: impl Into<Cow<'static, str>>) -> Self {
        Model::Custom(name.into())
    }
}

/// Models **officially** supported by the OpenAI back-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpenAiModel {
    Gpt4o,
    Gpt4oMini,
    Gpt4Turbo,
    Gpt35Turbo,
}

impl From<OpenAiModel> for Model {
    fn from(val: OpenAiModel) -> Self {
        Model::OpenAi(val)
    }
}
