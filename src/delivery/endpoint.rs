//! Conditional delivery of the version artifact

use super::response::DeliveryResponse;
use crate::cache::SnapshotCache;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// Serves the cached artifact with `If-None-Match` short-circuiting
#[derive(Debug, Clone)]
pub struct DeliveryEndpoint {
    cache: Arc<SnapshotCache>,
}

impl DeliveryEndpoint {
    pub fn new(cache: Arc<SnapshotCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Arc<SnapshotCache> {
        &self.cache
    }

    /// Answer one read request.
    ///
    /// Failures while producing the artifact, including panics, become a
    /// `Failed` response instead of escaping to the server.
    pub async fn handle(&self, if_none_match: Option<&str>) -> DeliveryResponse {
        let obtained = AssertUnwindSafe(self.cache.obtain()).catch_unwind().await;

        let artifact = match obtained {
            Ok(Ok(artifact)) => artifact,
            Ok(Err(e)) => {
                log::error!("version endpoint failed: {}", e);
                return DeliveryResponse::Failed {
                    message: e.to_string(),
                };
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                log::error!("version endpoint panicked: {}", message);
                return DeliveryResponse::Failed { message };
            }
        };

        let fingerprint = artifact.fingerprint().clone();
        if let Some(header) = if_none_match {
            if fingerprint.matches_header(header) {
                log::debug!("version artifact not modified ({})", fingerprint);
                return DeliveryResponse::NotModified { fingerprint };
            }
        }

        DeliveryResponse::Fresh {
            body: artifact.text().to_string(),
            fingerprint,
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "internal error".to_string()
    }
}
