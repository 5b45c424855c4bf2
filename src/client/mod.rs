//! Underdog API client.
//!
//! This module builds request paths, resolves the base URL and authorization
//! header from a [`ClientConfig`], and exposes one async method per endpoint on
//! [`Client`].
//!
//! # Modes
//!
//! - **Server mode**: an API key is configured. Requests go straight to the
//!   mainnet or devnet endpoint with an `Authorization` header.
//! - **Proxy mode**: no API key. Requests go to `/api/underdog` on
//!   [`ClientConfig::proxy_origin`], where [`crate::proxy`] injects the key.
//!
//! # Examples
//!
//! ```no_run
//! use underdog_sdk::client::{ClientConfig, Network, types::NftParams};
//!
//! # async fn example() -> underdog_sdk::Result<()> {
//! let client = underdog_sdk::Client::new(
//!     ClientConfig::default()
//!         .with_network(Network::Mainnet)
//!         .with_api_key("my-api-key"),
//! )?;
//!
//! let nft = client.get_nft(&NftParams::new(1, 5)).await?;
//! println!("{:?} owned by {:?}", nft.name(), nft.owner_address());
//! # Ok(())
//! # }
//! ```

pub mod http;
pub mod paths;
pub mod transport;
pub mod types;
mod utils;

use std::env;

use reqwest::header::HeaderValue;
use serde::{Deserialize, Serialize};
use url::Url;

pub use http::Client;
pub use paths::Paths;
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};

use crate::Result;

/// Mainnet API endpoint.
pub const MAINNET_API_URL: &str = "https://mainnet.underdogprotocol.com";

/// Devnet API endpoint.
pub const DEVNET_API_URL: &str = "https://devnet.underdogprotocol.com";

/// Base path of the forwarding route served by [`crate::proxy`].
pub const PROXY_BASE_PATH: &str = "/api/underdog";

/// Origin the proxy route is assumed to live on when none is configured.
pub const DEFAULT_PROXY_ORIGIN: &str = "http://localhost:3000";

/// Solana cluster the API operates on.
///
/// Parses case-insensitively from `mainnet` / `devnet`.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[display("mainnet")]
    Mainnet,
    #[default]
    #[display("devnet")]
    Devnet,
}

impl Network {
    /// Fixed API endpoint of this network.
    #[must_use]
    pub const fn api_url(&self) -> &'static str {
        match self {
            Network::Mainnet => MAINNET_API_URL,
            Network::Devnet => DEVNET_API_URL,
        }
    }
}

impl std::str::FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("mainnet") || s.eq_ignore_ascii_case("mainnet-beta") {
            Ok(Network::Mainnet)
        } else if s.eq_ignore_ascii_case("devnet") {
            Ok(Network::Devnet)
        } else {
            Err(format!("unknown network `{s}`, expected mainnet or devnet"))
        }
    }
}

/// API version prefix. Only `v2` is served.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum ApiVersion {
    #[default]
    #[display("v2")]
    V2,
}

/// Project path grammar. See [`paths`] for both shapes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathGrammar {
    /// `/v2/projects/{projectId}`
    #[default]
    Current,
    /// `/v2/projects/{c|t|n}/{projectId}`, spoken by older API deployments.
    TypeCoded,
}

/// Static client configuration, resolved once by [`Client::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
    /// Mainnet or devnet. Defaults to devnet.
    pub network: Option<Network>,
    /// Overrides the base URL derived from `network` and `api_key`.
    pub base_url: Option<String>,
    /// Without a key the client assumes the proxy route is set up.
    pub api_key: Option<String>,
    /// Send `Bearer <key>` rather than the raw key.
    pub bearer: bool,
    pub version: ApiVersion,
    pub grammar: PathGrammar,
    /// Origin a relative base URL is resolved against.
    pub proxy_origin: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            network: None,
            base_url: None,
            api_key: None,
            bearer: true,
            version: ApiVersion::V2,
            grammar: PathGrammar::Current,
            proxy_origin: None,
        }
    }
}

impl ClientConfig {
    /// Reads `UNDERDOG_API_KEY`, `UNDERDOG_NETWORK`, `UNDERDOG_BASE_URL` and
    /// `UNDERDOG_BEARER`. Unset or empty variables keep their defaults; an
    /// unknown network name falls back to devnet.
    pub fn from_env() -> Self {
        let var = |name: &str| env::var(name).ok().filter(|value| !value.is_empty());

        let network = var("UNDERDOG_NETWORK").and_then(|network| match network.parse() {
            Ok(network) => Some(network),
            Err(err) => {
                log::warn!("UNDERDOG_NETWORK: {err}");
                None
            }
        });

        Self {
            network,
            base_url: var("UNDERDOG_BASE_URL"),
            api_key: var("UNDERDOG_API_KEY"),
            bearer: var("UNDERDOG_BEARER")
                .is_none_or(|bearer| !matches!(bearer.as_str(), "0" | "false" | "no")),
            ..Self::default()
        }
    }

    pub fn with_network(self, network: Network) -> Self {
        Self {
            network: Some(network),
            ..self
        }
    }

    pub fn with_api_key(self, api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..self
        }
    }

    pub fn with_base_url(self, base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            ..self
        }
    }

    pub fn with_bearer(self, bearer: bool) -> Self {
        Self { bearer, ..self }
    }

    pub fn with_grammar(self, grammar: PathGrammar) -> Self {
        Self { grammar, ..self }
    }

    pub fn with_proxy_origin(self, proxy_origin: impl Into<String>) -> Self {
        Self {
            proxy_origin: Some(proxy_origin.into()),
            ..self
        }
    }

    /// Network after defaults.
    #[must_use]
    pub fn resolved_network(&self) -> Network {
        self.network.unwrap_or_default()
    }

    /// Base URL after defaults: explicit `base_url`, else the network endpoint
    /// when an API key is set, else [`PROXY_BASE_PATH`].
    #[must_use]
    pub fn resolved_base_url(&self) -> String {
        match (&self.base_url, &self.api_key) {
            (Some(base_url), _) => base_url.clone(),
            (None, Some(_)) => self.resolved_network().api_url().to_owned(),
            (None, None) => PROXY_BASE_PATH.to_owned(),
        }
    }

    /// Absolute URL requests are sent to. Relative bases are joined onto
    /// the proxy origin.
    pub fn endpoint(&self) -> Result<Url> {
        let base_url = self.resolved_base_url();
        match Url::parse(&base_url) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let origin: Url = self
                    .proxy_origin
                    .as_deref()
                    .unwrap_or(DEFAULT_PROXY_ORIGIN)
                    .parse()?;
                Ok(origin.join(&base_url)?)
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// `Authorization` value for an API key: `Bearer <key>` or the raw key.
#[must_use]
pub fn authorization(api_key: &str, bearer: bool) -> String {
    if bearer {
        format!("Bearer {api_key}")
    } else {
        api_key.to_owned()
    }
}

/// Builds a sensitive `Authorization` header value.
pub(crate) fn authorization_header(api_key: &str, bearer: bool) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(&authorization(api_key, bearer))?;
    value.set_sensitive(true);
    Ok(value)
}
