//! Connection collaborator contract.

use crate::error::TransportError;
use crate::http::HttpRequest;

/// The logical persistent session a transport moves messages for.
///
/// The connection is an external collaborator: it supplies the routing data
/// the transport needs to address requests (base URL, custom query string,
/// connection token), decorates outgoing requests before dispatch, and
/// receives inbound messages and asynchronous errors.
///
/// Sink methods may be invoked from the HTTP client's execution context, not
/// necessarily the thread that called into the transport.
pub trait Connection: Send + Sync {
    /// The base URL requests are addressed to, including a trailing slash.
    fn url(&self) -> String;

    /// The connection's own custom query string, without a leading separator.
    /// Empty when the connection has none.
    fn query_string(&self) -> String;

    /// The token identifying this logical session to the server.
    fn connection_token(&self) -> String;

    /// Decorate an outgoing request (headers, cookies) before dispatch.
    fn prepare_request(&self, _request: &mut HttpRequest) {}

    /// Deliver an inbound message.
    fn on_received(&self, message: String);

    /// Deliver an asynchronous transport error.
    fn on_error(&self, error: TransportError);
}
