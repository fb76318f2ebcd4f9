//! Public API for conditional delivery

pub use crate::delivery::endpoint::DeliveryEndpoint;
pub use crate::delivery::response::{DeliveryResponse, CACHE_CONTROL, CONTENT_TYPE, ETAG, NO_CACHE};
pub use crate::delivery::server::{normalize_base, router, serve, DevServerState};
