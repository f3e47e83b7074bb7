use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Response contained no choices")]
    EmptyChoices,
}

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Opaque text-in, text-out capability backing every pipeline stage.
///
/// No contract on format: responses may be empty, fenced, truncated or not
/// structured at all. Only a failed call is an error.
#[async_trait]
pub trait TransformationService: Send + Sync {
    /// Submit a role instruction and task payload, returning the raw reply.
    async fn invoke(&self, instruction: &str, payload: &str) -> Result<String>;
}

#[async_trait]
impl<S: TransformationService + ?Sized> TransformationService for Arc<S> {
    async fn invoke(&self, instruction: &str, payload: &str) -> Result<String> {
        (**self).invoke(instruction, payload).await
    }
}

#[async_trait]
impl<S: TransformationService + ?Sized> TransformationService for Box<S> {
    async fn invoke(&self, instruction: &str, payload: &str) -> Result<String> {
        (**self).invoke(instruction, payload).await
    }
}
