use std::{env, sync::Arc};

use tessera_core::error::{Result, TesseraError};

use crate::client::OpenAiClient;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";
pub const ORGANIZATION_VAR: &str = "OPENAI_ORG_ID";

/// Thin wrapper that wires the HTTP client [`OpenAiClient`] into a value that
/// implements [`tessera_core::TextCompletionProvider`].
///
/// The type exposes no behaviour of its own; plug it into a
/// [`tessera_core::TesseraClient`] or hand it straight to a chat turn.
#[derive(Debug, Clone)]
pub struct OpenAiAdapter {
    pub(crate) client: Arc<OpenAiClient>,
}

impl OpenAiAdapter {
    pub fn builder() -> OpenAiAdapterBuilder {
        OpenAiAdapterBuilder::new()
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    pub fn organization(&self) -> Option<&str> {
        self.client.organization()
    }
}

/// Builder for [`OpenAiAdapter`].
///
/// # Typical usage
///
/// ```rust,no_run
/// use tessera_openai::OpenAiAdapterBuilder;
///
/// let backend = OpenAiAdapterBuilder::new_from_env().build()?;
/// # Ok::<(), tessera_core::error::TesseraError>(())
/// ```
#[derive(Debug, Default)]
pub struct OpenAiAdapterBuilder {
    pub(crate) api_key: Option<String>,
    pub(crate) base_url: Option<String>,
    pub(crate) organization: Option<String>,
}

impl OpenAiAdapterBuilder {
    /// Create an *empty* builder. Remember to supply an API key manually.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `OPENAI_API_KEY` and, if set, `OPENAI_BASE_URL` and
    /// `OPENAI_ORG_ID`.
    ///
    /// Never fails; a missing key only surfaces during [`Self::build`].
    pub fn new_from_env() -> Self {
        Self {
            api_key: env::var(API_KEY_VAR).ok(),
            base_url: non_empty_var(BASE_URL_VAR),
            organization: non_empty_var(ORGANIZATION_VAR),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Point the adapter at an OpenAI compatible server, e.g. a proxy.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Send requests on behalf of an OpenAI organization.
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    /// Finalise the builder and return a ready-to-use adapter.
    ///
    /// # Errors
    ///
    /// * [`TesseraError::Invalid`] – if the API key is missing.
    /// * [`TesseraError::Backend`] – if the HTTP client cannot be built.
    pub fn build(self) -> Result<OpenAiAdapter> {
        let api_key = self
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                TesseraError::Invalid(format!("missing env variable: `{API_KEY_VAR}`"))
            })?;

        let mut client = OpenAiClient::new(api_key, self.base_url)?;
        if let Some(organization) = self.organization {
            client = client.with_organization(organization);
        }

        Ok(OpenAiAdapter {
            client: Arc::new(client),
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}
