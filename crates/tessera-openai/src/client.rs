use std::{fmt, time::Duration};

use reqwest::Client as HttpClient;

use crate::{
    api_v1::{ChatCompletionRequest, ChatCompletionResponse},
    error::OpenAiError,
};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const ORGANIZATION_HEADER: &str = "OpenAI-Organization";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Minimal HTTP client for OpenAI’s *chat/completions* endpoint.
///
/// * Non-streaming only (one request ▶ one response).
/// * No retries: a failed call is reported once, as it happened.
/// * Shares a single `reqwest::Client`, so cloning `OpenAiClient` is cheap.
#[derive(Clone)]
pub struct OpenAiClient {
    api_key: String,
    organization: Option<String>,
    http: HttpClient,
    base: String,
}

impl fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("api_key", &"<redacted>")
            .field("organization", &self.organization)
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}

impl OpenAiClient {
    /// Build a client with a default `reqwest` client (60 s timeout, Rustls).
    ///
    /// # Errors
    ///
    /// [`OpenAiError::Http`] if the TLS backend cannot be initialised.
    pub fn new(api_key: impl Into<String>, base_url: Option<String>) -> Result<Self, OpenAiError> {
        let http = HttpClient::builder().timeout(DEFAULT_TIMEOUT).build()?;

        Ok(Self::with_http(api_key, http, base_url))
    }

    /// Build with a custom `reqwest::Client` in case the caller needs proxy
    /// settings, custom TLS, etc.
    pub fn with_http(
        api_key: impl Into<String>,
        http: HttpClient,
        base_url: Option<String>,
    ) -> Self {
        let base = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());

        Self {
            api_key: api_key.into(),
            organization: None,
            http,
            base: base.trim_end_matches('/').to_owned(),
        }
    }

    /// Bill requests to `organization` via the `OpenAI-Organization` header.
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    pub fn organization(&self) -> Option<&str> {
        self.organization.as_deref()
    }

    /// Perform a **non-streaming** chat completion.
    pub async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, OpenAiError> {
        let url = format!("{}/chat/completions", self.base);
        let prompt_chars: usize = request
            .messages
            .iter()
            .map(|message| message.content.chars().count())
            .sum();
        tracing::debug!(model = %request.model, %url, prompt_chars, "sending chat completion");

        let mut builder = self.http.post(url).bearer_auth(&self.api_key);
        if let Some(organization) = &self.organization {
            builder = builder.header(ORGANIZATION_HEADER, organization);
        }
        let resp = builder.json(request).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(%status, model = %request.model, "chat completion rejected");
            return Err(OpenAiError::Api { status, body });
        }

        let bytes = resp.bytes().await?;
        let parsed: ChatCompletionResponse = serde_json::from_slice(&bytes)?;
        Ok(parsed)
    }
}
