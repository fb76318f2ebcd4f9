//! Conditional Delivery Endpoint
//!
//! Serves the serialized artifact with a weak content fingerprint as `ETag`.
//! A request whose `If-None-Match` carries the current fingerprint gets a
//! 304 with an empty body; anything else gets the full body and
//! `Cache-Control: no-cache`. Failures become a 500 with a JSON error body.

pub mod api;
pub mod endpoint;
pub mod response;
pub mod server;
