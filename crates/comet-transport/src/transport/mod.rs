//! Transport base: send/abort/dispose coordination shared by the concrete
//! HTTP transports.

mod abort;
mod http_based;
pub mod query;

pub use abort::AbortState;
pub use http_based::{HttpTransport, StartCancellation, StartCompletion, TransportStrategy};
