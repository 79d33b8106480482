// Server loop module
// Accepts connections until a shutdown signal arrives

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::{accept_connection, drain_timeout};
use super::signal::SignalHandler;
use crate::config::AppState;
use crate::logger;

/// Poll interval while waiting for in-flight connections after shutdown
const DRAIN_POLL: Duration = Duration::from_millis(50);

/// Run the accept loop on the current `LocalSet`
///
/// Returns once shutdown was requested and in-flight connections finished, or
/// the drain timeout elapsed, whichever comes first.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    signals: Arc<SignalHandler>,
) -> Result<(), Box<dyn std::error::Error>> {
    let active_connections = Arc::new(AtomicUsize::new(0));

    while !signals.is_shutdown_requested() {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = signals.shutdown.notified() => break,
        }
    }

    // Stop accepting before waiting on the stragglers
    drop(listener);
    drain_connections(&active_connections, drain_timeout(&state.config.performance)).await;
    Ok(())
}

async fn drain_connections(active: &AtomicUsize, limit: Duration) {
    let deadline = tokio::time::Instant::now() + limit;
    while active.load(Ordering::SeqCst) > 0 && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(DRAIN_POLL).await;
    }

    let remaining = active.load(Ordering::SeqCst);
    if remaining > 0 {
        logger::log_warning(&format!("Exiting with {remaining} connections still open"));
    }
}
