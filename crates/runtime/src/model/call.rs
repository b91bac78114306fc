//! Deadline- and cancellation-aware model calls.

use super::{Backend, ModelError, ModelRequest, ModelResponse};
use crate::{GenerationError, Result};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Call `backend`, giving up after `limit` or as soon as `cancel` fires.
pub(crate) async fn call_model<B: Backend>(
    backend: &B,
    request: ModelRequest<'_>,
    limit: Duration,
    cancel: &CancellationToken,
) -> Result<ModelResponse> {
    if cancel.is_cancelled() {
        return Err(GenerationError::Cancelled);
    }

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(GenerationError::Cancelled),
        result = tokio::time::timeout(limit, backend.call(request)) => match result {
            Ok(response) => Ok(response?),
            Err(_) => Err(ModelError::Timeout(limit).into()),
        },
    }
}
