//! Public API for the update client

pub use crate::client::checker::{Subscription, UpdateChecker, UpdateResult};
pub use crate::client::error::{ClientError, ClientResult};
pub use crate::client::fetch::{Fetcher, HttpFetcher, DEFAULT_FETCH_TIMEOUT};
