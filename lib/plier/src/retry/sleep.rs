//! Cancellable timed wait.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Wait for `duration`, or until `cancel` fires, whichever comes first.
///
/// An already cancelled token returns immediately. Cancellation is not an
/// error here: the wait simply ends early. Whichever branch loses is dropped,
/// which deregisters the timer or the cancellation waiter.
pub async fn sleep(duration: Duration, cancel: Option<&CancellationToken>) {
    let Some(token) = cancel else {
        tokio::time::sleep(duration).await;
        return;
    };

    if token.is_cancelled() {
        return;
    }

    tokio::select! {
        () = tokio::time::sleep(duration) => {}
        () = token.cancelled() => {}
    }
}
