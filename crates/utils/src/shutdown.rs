//! Process termination signals wired into a shared cancellation token

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Resolve once the OS asks the process to stop (Ctrl-C, or SIGTERM on unix)
pub async fn wait_for_termination() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}

/// Cancel `token` when a termination signal arrives.
///
/// The watcher exits quietly if the token is cancelled by someone else
/// first, e.g. a user `quit` command.
pub fn cancel_on_termination(token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            () = token.cancelled() => {}
            () = wait_for_termination() => {
                info!("termination signal received, stopping workers");
                token.cancel();
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_watcher_exits_when_token_cancelled_elsewhere() {
        let token = CancellationToken::new();
        let watcher = cancel_on_termination(token.clone());
        token.cancel();
        watcher.await.unwrap();
        assert!(token.is_cancelled());
    }
}
