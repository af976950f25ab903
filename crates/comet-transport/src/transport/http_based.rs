//! HTTP-based transport base.
//!
//! Concrete transports (long polling, server-sent events) specialize the
//! handshake via [`TransportStrategy`] and reuse the shared machinery here:
//! the send data path, the single-abort coordination, and the idempotent
//! terminal dispose.

use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{oneshot, watch};

use super::abort::AbortCoordinator;
use super::query;
use crate::connection::Connection;
use crate::error::{Result, TransportError};
use crate::http::{HttpClient, HttpRequest};

/// Single-use completion handed to a transport's handshake hook.
///
/// The hook resolves it once the transport is ready to carry messages, or
/// fails it with the handshake error. The first signal wins; later calls are
/// no-ops. Clonable so the hook can hand it to background tasks.
pub struct StartCompletion {
    tx: Arc<Mutex<Option<oneshot::Sender<Result<()>>>>>,
}

impl StartCompletion {
    fn new() -> (Self, oneshot::Receiver<Result<()>>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                tx: Arc::new(Mutex::new(Some(tx))),
            },
            rx,
        )
    }

    /// Signal a successful handshake.
    ///
    /// Returns `true` if this call delivered the signal, `false` if the
    /// completion had already fired or the waiter is gone.
    pub fn resolve(&self) -> bool {
        if let Some(tx) = self.tx.lock().take() {
            tx.send(Ok(())).is_ok()
        } else {
            false
        }
    }

    /// Signal a failed handshake with the reported error.
    pub fn fail(&self, error: TransportError) -> bool {
        if let Some(tx) = self.tx.lock().take() {
            tx.send(Err(error)).is_ok()
        } else {
            false
        }
    }

    /// Check whether the completion is still pending.
    pub fn is_pending(&self) -> bool {
        self.tx.lock().is_some()
    }
}

impl Clone for StartCompletion {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl std::fmt::Debug for StartCompletion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StartCompletion")
            .field("pending", &self.is_pending())
            .finish()
    }
}

/// Cancellation signal handed to a transport's handshake hook.
///
/// Resolves once the caller abandons the start wait, so the hook can tear
/// down whatever it set up (close streams, stop polling loops). It never
/// resolves when the handshake runs to completion. Clonable so the hook can
/// hand it to background tasks.
#[derive(Clone, Debug)]
pub struct StartCancellation {
    rx: watch::Receiver<bool>,
}

impl StartCancellation {
    fn new() -> (watch::Sender<bool>, Self) {
        let (tx, rx) = watch::channel(false);
        (tx, Self { rx })
    }

    /// Whether the start wait has been abandoned.
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Suspend until the start wait is abandoned.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            // The start wait finished without being cancelled.
            std::future::pending::<()>().await;
        }
    }
}

/// Transport-specific hooks a concrete transport supplies.
pub trait TransportStrategy: Send + Sync + 'static {
    /// Begin the transport-specific handshake.
    ///
    /// The hook must eventually resolve or fail `completion` unless the
    /// caller abandons the start wait first; `cancel` resolves in that case
    /// and the hook is responsible for its own cleanup.
    fn on_start(
        &self,
        connection: Arc<dyn Connection>,
        data: String,
        completion: StartCompletion,
        cancel: StartCancellation,
    );

    /// Called when the server acknowledged the abort request.
    fn on_abort(&self) {}
}

/// Shared base for HTTP transports.
///
/// Holds the injected HTTP client (shared, never owned), the transport name
/// used for request routing, and the abort coordination state. At most one
/// network abort request is ever issued per instance, no matter how many
/// callers invoke [`abort`](Self::abort) concurrently, and every caller is
/// released once the abort cycle finishes.
pub struct HttpTransport<S> {
    name: String,
    http: Arc<dyn HttpClient>,
    strategy: Arc<S>,
    abort: Arc<AbortCoordinator>,
}

impl<S: TransportStrategy> HttpTransport<S> {
    /// Create a transport over the given HTTP client.
    pub fn new(http: Arc<dyn HttpClient>, name: impl Into<String>, strategy: S) -> Self {
        Self {
            name: name.into(),
            http,
            strategy: Arc::new(strategy),
            abort: Arc::new(AbortCoordinator::new()),
        }
    }

    /// The transport name used in query strings.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The shared HTTP client this transport posts through.
    pub fn http_client(&self) -> &Arc<dyn HttpClient> {
        &self.http
    }

    /// Start the transport, delegating the handshake to the strategy.
    ///
    /// Suspends until the strategy resolves or fails the handshake, or until
    /// `cancel` completes. Cancellation abandons the wait with the benign
    /// [`TransportError::Cancelled`] marker and fires the
    /// [`StartCancellation`] handed to the hook, which owns its own cleanup.
    pub async fn start(
        &self,
        connection: Arc<dyn Connection>,
        data: &str,
        cancel: impl Future<Output = ()> + Send,
    ) -> Result<()> {
        let (completion, started) = StartCompletion::new();
        let (cancel_tx, cancellation) = StartCancellation::new();
        self.strategy
            .on_start(connection, data.to_owned(), completion, cancellation);

        tokio::select! {
            result = started => match result {
                Ok(outcome) => outcome,
                // The hook dropped its completion without signaling.
                Err(_) => Err(TransportError::Handshake(
                    "handshake ended without signaling completion".to_string(),
                )),
            },
            _ = cancel => {
                // Let the hook observe the abandonment and run its cleanup.
                let _ = cancel_tx.send(true);
                tracing::debug!(
                    target: "comet_transport::transport",
                    transport = %self.name,
                    "start wait cancelled"
                );
                Err(TransportError::Cancelled)
            }
        }
    }

    /// Post a message to the server and relay the response.
    ///
    /// A non-empty response body is delivered to `on_received` exactly once;
    /// an empty body delivers nothing. A cancelled request is swallowed
    /// silently. Any other failure is delivered to `on_error` rather than
    /// returned, since the original caller has already proceeded past the
    /// call.
    pub async fn send(&self, connection: Arc<dyn Connection>, data: &str) {
        let url = format!(
            "{}send{}",
            connection.url(),
            query::build(
                &self.name,
                &connection.connection_token(),
                &custom_query_fragment(&connection.query_string()),
            ),
        );

        let mut request = HttpRequest::new(url).body(query::encode_data_body(data));
        connection.prepare_request(&mut request);

        match self.http.post(request).await {
            Ok(response) => {
                if !response.body().is_empty() {
                    connection.on_received(response.text());
                }
            }
            Err(TransportError::Cancelled) => {
                tracing::debug!(
                    target: "comet_transport::transport",
                    transport = %self.name,
                    "send cancelled"
                );
            }
            Err(error) => {
                tracing::debug!(
                    target: "comet_transport::transport",
                    transport = %self.name,
                    error = %error,
                    "send failed"
                );
                connection.on_error(error);
            }
        }
    }

    /// Notify the server that the client is ending the session.
    ///
    /// Best effort: only the first caller issues the network request; every
    /// caller suspends until the abort cycle finishes, whether the response
    /// arrived, the request failed, or it was cancelled. Fails with
    /// [`TransportError::Disposed`] after [`dispose`](Self::dispose).
    pub async fn abort(&self, connection: Arc<dyn Connection>) -> Result<()> {
        if self.abort.try_begin()? {
            let url = format!(
                "{}abort{}",
                connection.url(),
                query::build(&self.name, &connection.connection_token(), ""),
            );
            // The custom query is appended separately from the canonical part.
            let custom = custom_query_fragment(&connection.query_string());
            let url = format!("{url}{custom}");

            let mut request = HttpRequest::new(url);
            connection.prepare_request(&mut request);

            let http = self.http.clone();
            let strategy = self.strategy.clone();
            let coordinator = self.abort.clone();
            let transport = self.name.clone();

            // Detached so that dropping this caller's future cannot leave
            // other waiters blocked on a completion that never comes.
            tokio::spawn(async move {
                match http.post(request).await {
                    Ok(_) => {
                        // The response content is unused; arrival alone means
                        // the server acknowledged the abort.
                        strategy.on_abort();
                        coordinator.complete();
                    }
                    Err(TransportError::Cancelled) => {
                        tracing::debug!(
                            target: "comet_transport::transport",
                            transport = %transport,
                            "abort request cancelled; forcing completion"
                        );
                        coordinator.complete();
                    }
                    Err(error) => {
                        tracing::debug!(
                            target: "comet_transport::transport",
                            transport = %transport,
                            error = %error,
                            "abort request failed; forcing completion"
                        );
                        coordinator.complete();
                    }
                }
            });
        }

        self.abort.released().await;
        Ok(())
    }

    /// Finish the abort cycle and release every waiter.
    ///
    /// Idempotent and safe from any thread; no-op after dispose.
    pub fn complete_abort(&self) {
        self.abort.complete();
    }

    /// Non-blocking abort poll.
    ///
    /// Returns `true` immediately after dispose, or once an abort has begun
    /// or finished (releasing the completion signal idempotently). Returns
    /// `false` only when no abort has started, letting a non-blocking caller
    /// distinguish "nothing to wait for" from "must wait".
    pub fn try_complete_abort(&self) -> bool {
        self.abort.try_complete()
    }

    /// Current abort lifecycle state, for diagnostics.
    pub fn abort_state(&self) -> super::AbortState {
        self.abort.state()
    }

    /// Terminal, idempotent teardown.
    ///
    /// Waits out an in-flight abort, then releases the completion signal's
    /// resources. Subsequent [`abort`](Self::abort) calls fail with
    /// [`TransportError::Disposed`]; a second dispose is a no-op.
    pub async fn dispose(&self) {
        if self.abort.dispose().await {
            tracing::debug!(
                target: "comet_transport::transport",
                transport = %self.name,
                "transport disposed"
            );
        }
    }
}

impl<S> std::fmt::Debug for HttpTransport<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("name", &self.name)
            .field("state", &self.abort.state())
            .finish()
    }
}

/// Prefix a non-empty custom query string with its separator.
fn custom_query_fragment(query_string: &str) -> String {
    if query_string.is_empty() {
        String::new()
    } else {
        format!("&{query_string}")
    }
}
