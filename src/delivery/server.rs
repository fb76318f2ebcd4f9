//! Dev server exposing the delivery endpoint and the virtual module over HTTP

use super::endpoint::DeliveryEndpoint;
use super::response::DeliveryResponse;
use crate::emit::api::VirtualModule;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Path prefix under which the virtual module source is served
pub const MODULE_ROUTE_PREFIX: &str = "@id/";

/// Normalise a base path to start and end with `/`. Relative bases such
/// as `./` are served from the root.
pub fn normalize_base(base: &str) -> String {
    let segments: Vec<&str> = base
        .trim()
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect();
    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", segments.join("/"))
    }
}

/// Routing table of the dev server
#[derive(Debug, Clone)]
pub struct DevServerState {
    endpoint: DeliveryEndpoint,
    version_path: String,
    module: Option<(String, VirtualModule)>,
}

impl DevServerState {
    pub fn new(endpoint: DeliveryEndpoint, base: &str, filename: &str) -> Self {
        Self {
            endpoint,
            version_path: format!("{}{}", normalize_base(base), filename),
            module: None,
        }
    }

    /// Also serve the virtual module at `<base>@id/<module id>`
    pub fn with_module(mut self, base: &str, module: VirtualModule) -> Self {
        let path = format!("{}{}{}", normalize_base(base), MODULE_ROUTE_PREFIX, module.id());
        self.module = Some((path, module));
        self
    }

    pub fn version_path(&self) -> &str {
        &self.version_path
    }

    pub fn module_path(&self) -> Option<&str> {
        self.module.as_ref().map(|(path, _)| path.as_str())
    }
}

/// Build the router. Dispatch is done by exact path so that module ids
/// containing `:` need no route escaping.
pub fn router(state: DevServerState) -> Router {
    Router::new().fallback(dispatch).with_state(Arc::new(state))
}

/// Serve until Ctrl-C
pub async fn serve(listener: TcpListener, state: DevServerState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        log::info!("serving {} on http://{}", state.version_path(), addr);
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("could not listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("shutting down dev server");
}

async fn dispatch(
    State(state): State<Arc<DevServerState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let path = uri.path();

    if path == state.version_path {
        let if_none_match = headers
            .get(header::IF_NONE_MATCH)
            .and_then(|v| v.to_str().ok());
        let response = state.endpoint.handle(if_none_match).await;
        return into_http(&response);
    }

    if let Some((module_path, module)) = &state.module {
        if path == module_path {
            return match module.source().await {
                Ok(source) => (
                    [
                        (header::CONTENT_TYPE, "text/javascript; charset=utf-8"),
                        (header::CACHE_CONTROL, "no-cache"),
                    ],
                    source,
                )
                    .into_response(),
                Err(e) => {
                    log::error!("virtual module failed to load: {}", e);
                    into_http(&DeliveryResponse::Failed {
                        message: e.to_string(),
                    })
                }
            };
        }
    }

    StatusCode::NOT_FOUND.into_response()
}

fn into_http(response: &DeliveryResponse) -> Response {
    let status = StatusCode::from_u16(response.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let mut headers = HeaderMap::new();
    for (name, value) in response.headers() {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(&value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => log::warn!("dropping invalid response header {}", name),
        }
    }

    (status, headers, Body::from(response.body())).into_response()
}
