//! Submission handler abstraction

use super::value::FormValues;
use anyhow::Result;
use async_trait::async_trait;
use std::future::Future;

/// Receives a validated snapshot; a failure becomes the form's top-level error
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionHandler: Send + Sync {
    async fn submit(&self, values: FormValues) -> Result<()>;
}

/// Adapter turning an async closure into a [`SubmissionHandler`]
pub struct FnHandler<F>(F);

pub fn handler_fn<F, Fut>(f: F) -> FnHandler<F>
where
    F: Fn(FormValues) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    FnHandler(f)
}

#[async_trait]
impl<F, Fut> SubmissionHandler for FnHandler<F>
where
    F: Fn(FormValues) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    async fn submit(&self, values: FormValues) -> Result<()> {
        (self.0)(values).await
    }
}
