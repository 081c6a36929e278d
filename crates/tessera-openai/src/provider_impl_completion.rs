use std::{future::Future, pin::Pin, sync::Arc};

use tessera_core::{
    error::Result,
    generic::GenericCompletionResponse,
    provider::{CompletionParameters, TextCompletionProvider},
};

use crate::{
    OpenAiAdapter,
    api_v1::{ChatCompletionRequest, FinishReason},
    client::OpenAiClient,
    error::OpenAiError,
};

impl TextCompletionProvider for OpenAiAdapter {
    fn complete<'p>(
        &'p self,
        params: CompletionParameters,
    ) -> Pin<Box<dyn Future<Output = Result<GenericCompletionResponse>> + Send + 'p>> {
        let client = Arc::clone(&self.client);

        Box::pin(async move { complete_text(&client, params).await })
    }
}

async fn complete_text(
    client: &OpenAiClient,
    params: CompletionParameters,
) -> Result<GenericCompletionResponse> {
    let request = ChatCompletionRequest::try_from(params)?;

    let mut response = client.chat_completion(&request).await?;
    let usage = response.usage.map(Into::into);

    if response.choices.is_empty() {
        return Err(OpenAiError::Format("response has no choices".into()).into());
    }
    let first_choice = response.choices.swap_remove(0);

    match first_choice.finish_reason {
        Some(FinishReason::ContentFilter) => {
            return Err(OpenAiError::Format(
                "completion was stopped by the content filter".into(),
            )
            .into());
        }
        Some(FinishReason::Length) => {
            tracing::warn!(
                model = %request.model,
                max_tokens = ?request.max_tokens,
                "completion hit the token limit"
            );
        }
        _ => {}
    }

    let text = first_choice
        .message
        .content
        .or(first_choice.message.refusal)
        .ok_or_else(|| OpenAiError::Format("choice has no content".into()))?;

    Ok(GenericCompletionResponse { text, usage })
}
