// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Asset resolution against the external balance service.
//!
//! Called once per login; the resulting asset list is embedded in the
//! capability token and never refreshed during the token's lifetime.
//!
//! Upstream failures (unreachable service, non-2xx status, malformed
//! payload) are distinct from a wallet legitimately holding zero assets.

use std::time::Duration;

use serde::Deserialize;

use crate::models::{AssetId, WalletAddress};

/// Outbound request timeout for the balance lookup.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from the balance service lookup.
#[derive(Debug, thiserror::Error)]
pub enum AssetResolverError {
    #[error("invalid balance service URL: {0}")]
    InvalidUrl(String),

    #[error("balance service request failed: {0}")]
    Request(String),

    #[error("balance service returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("balance service returned malformed payload: {0}")]
    MalformedPayload(String),
}

/// One balance row from the service. Only the asset long-name is used;
/// top-level assets carry no long-name and are skipped.
#[derive(Debug, Deserialize)]
struct BalanceEntry {
    #[serde(default)]
    asset_longname: Option<String>,
}

/// Balance service response page.
#[derive(Debug, Deserialize)]
struct BalancePage {
    data: Vec<BalanceEntry>,
}

/// Client for the external balance service.
///
/// Queries `GET {base_url}/api/balances/{address}` and extracts the held
/// asset identifiers.
#[derive(Clone)]
pub struct AssetResolver {
    /// Balance service base URL
    base_url: String,
    /// HTTP client
    client: reqwest::Client,
}

impl AssetResolver {
    /// Create a new resolver against the given balance service.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// The configured balance service base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the assets currently held by `address`, in upstream order.
    ///
    /// Entries without an asset long-name and empty names are dropped;
    /// duplicates are preserved as reported upstream.
    pub async fn resolve(&self, address: &WalletAddress) -> Result<Vec<AssetId>, AssetResolverError> {
        let url = self.balances_url(address)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AssetResolverError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AssetResolverError::Status(response.status()));
        }

        let page: BalancePage = response
            .json()
            .await
            .map_err(|e| AssetResolverError::MalformedPayload(e.to_string()))?;

        Ok(page
            .data
            .into_iter()
            .filter_map(|entry| entry.asset_longname)
            .filter(|name| !name.is_empty())
            .map(AssetId::from)
            .collect())
    }

    /// Build the balances endpoint URL for an address.
    fn balances_url(&self, address: &WalletAddress) -> Result<url::Url, AssetResolverError> {
        let mut base = self.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        url::Url::parse(&base)
            .and_then(|base| base.join(&format!("api/balances/{address}")))
            .map_err(|e| AssetResolverError::InvalidUrl(e.to_string()))
    }
}
