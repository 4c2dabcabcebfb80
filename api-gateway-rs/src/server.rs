//! Listener loop with a bounded shutdown

use std::future::Future;
use std::io;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// How long connections may linger once the shutdown token is cancelled
pub const FORCE_CLOSE_WAIT: Duration = Duration::from_secs(1);

fn flatten(joined: Result<io::Result<()>, JoinError>) -> io::Result<()> {
    joined.map_err(|e| io::Error::new(io::ErrorKind::Other, format!("server task failed: {}", e)))?
}

/// Serve `app` until `signal` resolves, then drain.
///
/// Once `signal` fires no new connection is accepted and open requests get
/// `grace` to finish. After that `shutdown` is cancelled, which aborts every
/// running pipeline, and connections still open after [`FORCE_CLOSE_WAIT`]
/// are abandoned. Always returns within `grace + FORCE_CLOSE_WAIT` of the
/// signal, with `shutdown` cancelled.
pub async fn serve_with_grace<F>(
    listener: TcpListener,
    app: Router,
    signal: F,
    grace: Duration,
    shutdown: CancellationToken,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send,
{
    let stop_accepting = CancellationToken::new();
    let mut server = {
        let stop_accepting = stop_accepting.clone();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { stop_accepting.cancelled().await })
                .await
        })
    };

    tokio::select! {
        joined = &mut server => {
            shutdown.cancel();
            return flatten(joined);
        }
        _ = signal => {}
    }

    info!(grace_ms = grace.as_millis() as u64, "shutting down, draining in-flight requests");
    stop_accepting.cancel();

    if let Ok(joined) = tokio::time::timeout(grace, &mut server).await {
        shutdown.cancel();
        return flatten(joined);
    }

    warn!("grace period elapsed, cancelling remaining requests");
    shutdown.cancel();

    match tokio::time::timeout(FORCE_CLOSE_WAIT, &mut server).await {
        Ok(joined) => flatten(joined),
        Err(_) => {
            // Connection tasks left behind end with the runtime
            warn!("connections still open after cancellation, abandoning them");
            server.abort();
            Ok(())
        }
    }
}
