//! REST transport for the directory ports.

mod http;

pub use http::HttpJobPortalClient;
