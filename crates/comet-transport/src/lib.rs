//! Shared base for HTTP transports in the Comet realtime-messaging client.
//!
//! Concrete transports (long polling, server-sent events, forever frame)
//! move messages for a persistent logical connection over plain HTTP. This
//! crate provides the machinery they all share:
//!
//! - **Start**: handshake delegation to a transport-specific hook, with a
//!   cancellable wait for the hook's success/error signal
//! - **Send**: builds the canonical send request, posts it, and relays the
//!   response body to the connection
//! - **Abort**: best-effort notification to the server that the client is
//!   ending the session — exactly one network request regardless of how many
//!   callers race, and every caller is released once the cycle finishes
//! - **Dispose**: terminal, idempotent teardown coordinated with abort
//!
//! # Collaborators
//!
//! The transport owns neither end of the conversation. The [`HttpClient`]
//! executes requests (inject [`ReqwestClient`] in production, a stub in
//! tests); the [`Connection`] supplies routing data, decorates outgoing
//! requests, and receives inbound messages and errors.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use comet_transport::{HttpTransport, ReqwestClient, TransportStrategy, StartCompletion};
//!
//! struct ServerSentEvents;
//!
//! impl TransportStrategy for ServerSentEvents {
//!     fn on_start(&self, connection: Arc<dyn comet_transport::Connection>,
//!                 data: String, completion: StartCompletion,
//!                 cancel: comet_transport::StartCancellation) {
//!         // open the event stream, then completion.resolve() / fail(..);
//!         // tear the stream down if cancel.cancelled() fires first
//!     }
//! }
//!
//! let http = Arc::new(ReqwestClient::new());
//! let transport = HttpTransport::new(http, "serverSentEvents", ServerSentEvents);
//!
//! // transport.start(connection, "", cancel).await?;
//! // transport.send(connection, "payload").await;
//! // transport.abort(connection).await?;
//! // transport.dispose().await;
//! ```

mod connection;
mod error;
pub mod http;
pub mod transport;

pub use connection::Connection;
pub use error::{Result, TransportError};

// Re-export commonly used types at the crate root
pub use http::{HttpClient, HttpRequest, HttpResponse, ReqwestClient, ReqwestClientBuilder};
pub use transport::{
    AbortState, HttpTransport, StartCancellation, StartCompletion, TransportStrategy, query,
};
