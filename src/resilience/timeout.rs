// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::errors::AnalysisError;

/// Race `operation` against a timer.
///
/// On timeout the operation future is dropped, which stops any async work at
/// its next await point, and a timeout error carrying `message` is returned.
pub async fn with_timeout<T, Fut>(
    operation: Fut,
    timeout: Duration,
    message: &str,
) -> Result<T, AnalysisError>
where
    Fut: Future<Output = Result<T, AnalysisError>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(_) => Err(AnalysisError::timeout(
            format!("{} timed out after {:?}", message, timeout),
            timeout,
        )),
    }
}

/// Like [`with_timeout`], but also cancels `cancel` when the deadline passes
/// so work the operation handed off elsewhere (spawned tasks, blocking
/// threads polling the token) stops too. If `cancel` fires first the
/// operation is abandoned with a non-recoverable timeout error.
pub async fn with_deadline<T, Fut>(
    operation: Fut,
    timeout: Duration,
    cancel: &CancellationToken,
    message: &str,
) -> Result<T, AnalysisError>
where
    Fut: Future<Output = Result<T, AnalysisError>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(AnalysisError::timeout(
            format!("{} cancelled", message),
            timeout,
        )
        .with_recoverable(false)
        .with_detail("reason", "cancelled")),
        result = with_timeout(operation, timeout, message) => {
            if matches!(&result, Err(e) if e.is_timeout()) {
                cancel.cancel();
            }
            result
        }
    }
}
