//! Outgoing HTTP request type.

use std::time::Duration;

/// An outgoing POST request built by the transport.
///
/// The transport constructs the request, hands it to
/// [`Connection::prepare_request`](crate::Connection::prepare_request) so the
/// connection can decorate it (authentication headers, cookies, tracing
/// metadata), and then passes it to the [`HttpClient`](crate::HttpClient)
/// for execution.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// The request URL, query string included.
    pub url: String,
    /// Request headers.
    pub headers: http::HeaderMap,
    /// URL-encoded form body, if any. `None` sends an empty body.
    pub body: Option<String>,
    /// Per-request timeout override.
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// Create a new request for the given URL with no body.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: http::HeaderMap::new(),
            body: None,
            timeout: None,
        }
    }

    /// Set the URL-encoded form body.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Add a header to the request.
    ///
    /// Invalid header names or values are silently ignored.
    pub fn header(
        &mut self,
        name: impl TryInto<http::HeaderName>,
        value: impl TryInto<http::HeaderValue>,
    ) -> &mut Self {
        if let (Ok(name), Ok(value)) = (name.try_into(), value.try_into()) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Set a timeout for this specific request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
