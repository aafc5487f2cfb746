use docview_core::{DocviewError, DocviewResult};
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Run `fut` unless `cancel` fires first; the future is dropped on cancellation.
pub async fn cancellable<F, T>(cancel: &CancellationToken, fut: F) -> DocviewResult<T>
where
    F: Future<Output = T>,
{
    if cancel.is_cancelled() {
        return Err(DocviewError::Cancelled);
    }

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(DocviewError::Cancelled),
        out = fut => Ok(out),
    }
}
