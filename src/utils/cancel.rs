//! Cancellation helpers for outbound provider calls.

use std::future::Future;

use tokio_util::sync::CancellationToken;

/// Drive `fut` to completion unless `cancel` fires first.
///
/// Returns `None` when the token was cancelled before the future resolved.
/// A token that is already cancelled wins over a ready future.
pub async fn with_cancellation<F, T>(cancel: Option<&CancellationToken>, fut: F) -> Option<T>
where
    F: Future<Output = T>,
{
    match cancel {
        Some(token) => tokio::select! {
            biased;
            _ = token.cancelled() => None,
            out = fut => Some(out),
        },
        None => Some(fut.await),
    }
}
