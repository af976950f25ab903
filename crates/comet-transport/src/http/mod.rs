//! HTTP collaborator types.
//!
//! The transport never talks to the network directly: it builds an
//! [`HttpRequest`], lets the connection decorate it, and hands it to an
//! injected [`HttpClient`]. Production code uses the [`ReqwestClient`]
//! implementation; tests substitute stubs that return canned
//! [`HttpResponse`]s.

mod client;
mod request;
mod response;

pub use client::{HttpClient, ReqwestClient, ReqwestClientBuilder, ReqwestClientConfig};
pub use request::HttpRequest;
pub use response::HttpResponse;
