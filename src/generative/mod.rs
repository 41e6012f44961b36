//! Generative text collaborator.
//!
//! The [`GenerativeTextClient`] trait is the only seam between the
//! planning core and an external language model. A single client is built
//! at startup and injected wherever completions are needed.

pub mod openai;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;

use crate::config::GenerativeConfig;
use crate::{AppError, Result};

pub use openai::OpenAiClient;

/// Boxed future returned by [`GenerativeTextClient::complete`].
pub type CompletionFuture<'a> = Pin<Box<dyn Future<Output = Result<Value>> + Send + 'a>>;

/// A service that turns a prompt into a single JSON value.
pub trait GenerativeTextClient: Send + Sync {
    /// Complete `prompt`, returning the parsed JSON payload.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Generative` on transport failure, a non-success
    /// status, or a response that is not valid JSON.
    fn complete(&self, prompt: &str) -> CompletionFuture<'_>;
}

/// Client used when no API key is configured. Every call fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledClient;

impl GenerativeTextClient for DisabledClient {
    fn complete(&self, _prompt: &str) -> CompletionFuture<'_> {
        Box::pin(async move {
            Err(AppError::Generative(
                "generative client disabled: no api key configured".into(),
            ))
        })
    }
}

/// Build the process-wide client from configuration.
///
/// # Errors
///
/// Returns `AppError::Generative` if the HTTP client cannot be built.
pub fn from_config(config: &GenerativeConfig) -> Result<Arc<dyn GenerativeTextClient>> {
    match config.api_key {
        Some(ref key) => Ok(Arc::new(OpenAiClient::new(config, key.clone())?)),
        None => Ok(Arc::new(DisabledClient)),
    }
}
