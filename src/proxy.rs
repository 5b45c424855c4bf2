//! Server-side forwarding route.
//!
//! Browser code builds a [`Client`](crate::Client) without an API key, so its
//! requests land on `/api/underdog/...` of the serving application. The route
//! returned by [`router`] forwards each request to the Underdog API with the
//! secret key attached:
//!
//! ```text
//! GET /api/underdog/v2/projects/1/nfts?page=2&network=devnet
//!   ──► GET https://devnet.underdogprotocol.com/v2/projects/1/nfts?page=2
//!       Authorization: Bearer <key>
//! ```
//!
//! The method and body are forwarded verbatim and the upstream status and
//! body are relayed back untouched. If the exchange itself fails the route
//! answers `400 {"error": "<message>"}`.
//!
//! # Example
//!
//! ```no_run
//! use underdog_sdk::{Network, proxy::{self, ProxyOptions}};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let app = proxy::router(ProxyOptions::new("my-api-key", Network::Mainnet))?;
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, RawQuery, State},
    http::{
        HeaderMap, HeaderValue, Method, StatusCode,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
    routing::any,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use url::{Url, form_urlencoded};

use crate::{
    Network, Result,
    client::{HttpRequest, PROXY_BASE_PATH, ReqwestTransport, Transport, authorization_header},
};

/// Query keys consumed by the route itself and never forwarded.
const RESERVED_QUERY_KEYS: [&str; 2] = ["underdog", "network"];

/// Server-side settings of the forwarding route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyOptions {
    pub api_key: String,
    pub network: Network,
    /// Send `Bearer <key>` rather than the raw key.
    #[serde(default = "default_bearer")]
    pub bearer: bool,
    /// Overrides the network endpoint.
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_bearer() -> bool {
    true
}

impl ProxyOptions {
    pub fn new(api_key: impl Into<String>, network: Network) -> Self {
        Self {
            api_key: api_key.into(),
            network,
            bearer: true,
            base_url: None,
        }
    }

    pub fn with_bearer(self, bearer: bool) -> Self {
        Self { bearer, ..self }
    }

    pub fn with_base_url(self, base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            ..self
        }
    }

    /// Upstream URL requests are forwarded to.
    pub fn target(&self) -> Result<Url> {
        let base_url = self
            .base_url
            .as_deref()
            .unwrap_or_else(|| self.network.api_url());
        let url = Url::parse(base_url)?;
        if url.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithoutBase.into());
        }
        Ok(url)
    }
}

struct Proxy {
    target: Url,
    authorization: HeaderValue,
    transport: Arc<dyn Transport>,
}

/// Route forwarding `/api/underdog/{*path}` with `reqwest`.
pub fn router(options: ProxyOptions) -> Result<Router> {
    router_with_transport(options, Arc::new(ReqwestTransport::new()?))
}

/// Route forwarding `/api/underdog/{*path}` over a custom [`Transport`].
///
/// Fails if the target URL does not parse or the API key is not a valid
/// header value.
pub fn router_with_transport(options: ProxyOptions, transport: Arc<dyn Transport>) -> Result<Router> {
    let proxy = Proxy {
        target: options.target()?,
        authorization: authorization_header(&options.api_key, options.bearer)?,
        transport,
    };
    log::debug!("forwarding {PROXY_BASE_PATH} to {}", proxy.target);

    Ok(Router::new()
        .route(&format!("{PROXY_BASE_PATH}/{{*underdog}}"), any(forward))
        .with_state(Arc::new(proxy)))
}

async fn forward(
    State(proxy): State<Arc<Proxy>>,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
    method: Method,
    body: Bytes,
) -> Response {
    let url = upstream_url(&proxy.target, &path, query.as_deref());

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, proxy.authorization.clone());

    let request = HttpRequest {
        method,
        url,
        headers,
        body: (!body.is_empty()).then(|| body.to_vec()),
    };
    let (method, url) = (request.method.clone(), request.url.clone());

    match proxy.transport.send(request).await {
        Ok(response) => {
            if response.status.is_success() {
                log::debug!("{method} {url} -> {}", response.status);
            } else {
                log::warn!("{method} {url} -> {}", response.status);
            }
            (
                response.status,
                [(CONTENT_TYPE, HeaderValue::from_static("application/json"))],
                response.body,
            )
                .into_response()
        }
        Err(err) => {
            log::error!("{method} {url} failed: {err}");
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": err.to_string() })),
            )
                .into_response()
        }
    }
}

/// Appends the non-empty segments of `path` to `target` and keeps every
/// query pair except the reserved ones, in order.
fn upstream_url(target: &Url, path: &str, query: Option<&str>) -> Url {
    let mut url = target.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments
            .pop_if_empty()
            .extend(path.split('/').filter(|segment| !segment.is_empty()));
    }

    let pairs = form_urlencoded::parse(query.unwrap_or_default().as_bytes())
        .filter(|(key, _)| !RESERVED_QUERY_KEYS.contains(&key.as_ref()));
    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    url.set_query((!query.is_empty()).then_some(query.as_str()));
    url
}
