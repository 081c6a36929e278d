use serde::{Deserialize, Serialize};
use tessera_core::{error::TesseraError, provider::CompletionParameters};

use crate::{impl_builder_methods, model_map::map_model};

use super::common;

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatCompletionMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
}

impl ChatCompletionRequest {
    pub fn new(model: String, messages: Vec<ChatCompletionMessage>) -> Self {
        Self {
            model,
            messages,
            temperature: None,
            top_p: None,
            presence_penalty: None,
            frequency_penalty: None,
            max_tokens: None,
            stop: None,
        }
    }
}

impl_builder_methods!(
    ChatCompletionRequest,
    temperature: f64,
    top_p: f64,
    presence_penalty: f64,
    frequency_penalty: f64,
    max_tokens: usize,
    stop: Vec<String>
);

/// The composed prompt travels as one user message.
impl TryFrom<CompletionParameters> for ChatCompletionRequest {
    type Error = TesseraError;

    fn try_from(value: CompletionParameters) -> Result<Self, Self::Error> {
        if value.prompt.trim().is_empty() {
            return Err(TesseraError::InvalidRequest("prompt is empty".into()));
        }
        if value.settings.max_tokens == 0 {
            return Err(TesseraError::InvalidRequest(
                "max_tokens must be at least 1".into(),
            ));
        }

        let model = map_model(&value.model);
        if model.trim().is_empty() {
            return Err(TesseraError::InvalidRequest("model name is empty".into()));
        }

        let settings = value.settings;
        let mut request =
            Self::new(model.into_owned(), vec![ChatCompletionMessage::user(value.prompt)])
                .temperature(settings.temperature)
                .top_p(settings.top_p)
                .presence_penalty(settings.presence_penalty)
                .frequency_penalty(settings.frequency_penalty)
                .max_tokens(settings.max_tokens);
        if !settings.stop.is_empty() {
            request = request.stop(settings.stop);
        }

        Ok(request)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ChatCompletionMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatCompletionMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatCompletionMessageForResponse {
    pub role: MessageRole,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub refusal: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionChoice {
    pub index: i64,
    pub message: ChatCompletionMessageForResponse,
    pub finish_reason: Option<FinishReason>,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: Option<String>,
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub model: String,
    pub choices: Vec<ChatCompletionChoice>,
    pub usage: Option<common::Usage>,
    pub system_fingerprint: Option<String>,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
    ToolCalls,
    #[serde(other)]
    Other,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tessera_core::{
        model::{Model, OpenAiModel},
        settings::CompletionSettings,
    };

    use super::*;

    fn settings(max_tokens: usize) -> CompletionSettings {
        CompletionSettings {
            temperature: 0.7,
            top_p: 1.0,
            presence_penalty: 0.5,
            frequency_penalty: 0.5,
            max_tokens,
            stop: vec![],
        }
    }

    #[test]
    fn serialises_the_sampling_settings() {
        let params = CompletionParameters::new(
            "[Mon] bot:",
            OpenAiModel::Gpt4oMini.into(),
            settings(1024),
        );

        let request = ChatCompletionRequest::try_from(params).unwrap();

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "model": "gpt-4o-mini",
                "messages": [{ "role": "user", "content": "[Mon] bot:" }],
                "temperature": 0.7,
                "top_p": 1.0,
                "presence_penalty": 0.5,
                "frequency_penalty": 0.5,
                "max_tokens": 1024
            })
        );
    }

    #[test]
    fn forwards_stop_sequences() {
        let settings = CompletionSettings {
            stop: vec!["\n\n".to_string(), "[done]".to_string()],
            ..settings(64)
        };
        let params = CompletionParameters::new("hi", Model::custom("local"), settings);

        let request = ChatCompletionRequest::try_from(params).unwrap();

        assert_eq!(
            serde_json::to_value(&request).unwrap()["stop"],
            json!(["\n\n", "[done]"])
        );
    }

    #[test]
    fn rejects_requests_that_cannot_produce_output() {
        let empty = CompletionParameters::new(" \n", Model::custom("local"), settings(16));
        let no_room = CompletionParameters::new("hi", Model::custom("local"), settings(0));
        let unnamed = CompletionParameters::new("hi", Model::custom(""), settings(16));

        for params in [empty, no_room, unnamed] {
            let err = ChatCompletionRequest::try_from(params).unwrap_err();
            assert!(matches!(err, TesseraError::InvalidRequest(_)));
        }
    }

    #[test]
    fn tolerates_unknown_finish_reasons() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 1,
            "model": "gpt-4o-mini",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": "hi" },
                "finish_reason": "something_new"
            }]
        }))
        .unwrap();

        assert_eq!(response.choices[0].finish_reason, Some(FinishReason::Other));
        assert!(response.usage.is_none());
    }
}
