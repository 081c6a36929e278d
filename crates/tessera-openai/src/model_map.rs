use std::borrow::Cow;

use tessera_core::model::{Model, OpenAiModel};

pub const GPT4_O: &str = "gpt-4o";
pub const GPT4_O_MINI: &str = "gpt-4o-mini";
pub const GPT4_TURBO: &str = "gpt-4-turbo";
pub const GPT35_TURBO: &str = "gpt-3.5-turbo";

pub(crate) fn map_model(model: &Model) -> Cow<'static, str> {
    match model {
        Model::Custom(custom) => custom.clone(),
        Model::OpenAi(OpenAiModel::Gpt4o) => GPT4_O.into(),
        Model::OpenAi(OpenAiModel::Gpt4oMini) => GPT4_O_MINI.into(),
        Model::OpenAi(OpenAiModel::Gpt4Turbo) => GPT4_TURBO.into(),
        Model::OpenAi(OpenAiModel::Gpt35Turbo) => GPT35_TURBO.into(),
    }
}
