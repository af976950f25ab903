//! HTTP response type.

use bytes::Bytes;

use crate::error::{Result, TransportError};

/// A fully-read HTTP response.
///
/// Unlike a streaming response this type owns its body, so stub
/// [`HttpClient`](crate::HttpClient) implementations in tests can construct
/// it directly.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: u16,
    headers: http::HeaderMap,
    body: Bytes,
}

impl HttpResponse {
    /// Create a response from its parts.
    pub fn new(status: u16, headers: http::HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Create a response with the given status and body and no headers.
    pub fn with_body(status: u16, body: impl Into<Bytes>) -> Self {
        Self::new(status, http::HeaderMap::new(), body)
    }

    /// Create an empty-bodied response with the given status.
    pub fn empty(status: u16) -> Self {
        Self::with_body(status, Bytes::new())
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Check if the response indicates success (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx response into [`TransportError::HttpStatus`].
    ///
    /// A non-empty body is carried along as the error message. Callers that
    /// want the body regardless of status should skip this and read it
    /// directly.
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            let message = if self.body.is_empty() {
                None
            } else {
                Some(self.text())
            };
            Err(TransportError::HttpStatus {
                status: self.status,
                message,
            })
        }
    }

    /// Get the response headers.
    pub fn headers(&self) -> &http::HeaderMap {
        &self.headers
    }

    /// Get a specific header value.
    pub fn header(&self, name: impl AsRef<str>) -> Option<&str> {
        self.headers
            .get(name.as_ref())
            .and_then(|v| v.to_str().ok())
    }

    /// Get the response body as raw bytes.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Get the response body as text, replacing invalid UTF-8 sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
