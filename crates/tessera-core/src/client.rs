//! Generic, lightweight client that forwards composed prompts to a single
//! concrete [`TextCompletionProvider`].
//!
//! The client is **generic over the backend type `B`**, so no dynamic dispatch
//! shows up in user code, and it implements [`TextCompletionProvider`] itself
//! so anything written against the trait accepts a client as well.
//!
//! Any backend crate (e.g. `tessera-openai`) just implements the provider
//! trait and the same client works out of the box.
use std::{future::Future, pin::Pin, sync::Arc};

use crate::{
    error::Result,
    generic::GenericCompletionResponse,
    provider::{CompletionParameters, TextCompletionProvider},
};

/// A client bound to a single provider.
///
/// Cloning only bumps the reference count of the shared backend.
#[derive(Debug)]
pub struct TesseraClient<B> {
    backend: Arc<B>,
}

impl<B> Clone for TesseraClient<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<B> TesseraClient<B>
where
    B: TextCompletionProvider,
{
    /// Create a new client that delegates all calls to `backend`.
    pub fn new(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Access the underlying backend (e.g. to tweak provider-specific settings).
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: TextCompletionProvider> TextCompletionProvider for TesseraClient<B> {
    fn complete<'p>(
        &'p self,
        params: CompletionParameters,
    ) -> Pin<Box<dyn Future<Output = Result<GenericCompletionResponse>> + Send + 'p>> {
        let backend = Arc::clone(&self.backend);
        Box::pin(async move { backend.complete(params).await })
    }
}
