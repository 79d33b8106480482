// Connection handling module
// Accepts a single TCP connection and serves it with hyper

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

use crate::config::{AppState, PerformanceConfig};
use crate::handler;
use crate::logger;

/// Accept and process a connection, enforcing the connection limit.
///
/// Rejected connections are dropped right away.
pub fn accept_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
    conn_counter: &Arc<AtomicUsize>,
) {
    // Increment first, then check, so two accepts cannot both slip under the limit
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection rejected."
            ));
            drop(stream);
            return;
        }
    }

    logger::log_connection_accepted(&peer_addr);

    handle_connection(stream, peer_addr, Arc::clone(state), Arc::clone(conn_counter));
}

/// How long shutdown waits for in-flight connections
pub fn drain_timeout(perf: &PerformanceConfig) -> Duration {
    Duration::from_secs(perf.read_timeout.max(perf.write_timeout))
}

/// Serve one connection on the local task set.
///
/// The counter is decremented when the connection ends, whatever the outcome.
fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
    conn_counter: Arc<AtomicUsize>,
) {
    tokio::task::spawn_local(async move {
        let read_timeout = state.config.performance.read_timeout;

        match serve_io(stream, peer_addr, state).await {
            Ok(()) => {}
            Err(err) if err.is_timeout() => {
                logger::log_warning(&format!(
                    "Connection from {peer_addr} sent no complete request head within {read_timeout} seconds"
                ));
            }
            Err(err) => logger::log_connection_error(&err),
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}

/// Run the HTTP/1 protocol over `io` until the peer is done.
///
/// `read_timeout` bounds reading each request head; a slow upstream call
/// inside the handler is not cut short.
async fn serve_io<I>(io: I, peer_addr: SocketAddr, state: Arc<AppState>) -> Result<(), hyper::Error>
where
    I: AsyncRead + AsyncWrite + Unpin + 'static,
{
    let perf = &state.config.performance;
    let header_timeout = (perf.read_timeout > 0).then(|| Duration::from_secs(perf.read_timeout));

    let mut builder = http1::Builder::new();
    builder
        .timer(TokioTimer::new())
        .header_read_timeout(header_timeout)
        .keep_alive(perf.keep_alive_timeout > 0);

    builder
        .serve_connection(
            TokioIo::new(io),
            service_fn(move |req| handler::handle_request(req, Arc::clone(&state), peer_addr)),
        )
        .await
}
