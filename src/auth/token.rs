// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Capability token issuing and validation.
//!
//! A capability token is an HS256 JWT embedding the authenticated address
//! and a snapshot of the assets its wallet held at login. The token is a
//! stateless bearer credential: nothing is stored server-side, and the
//! asset list is never re-checked against live holdings during validation.
//! Callers re-authenticate to refresh entitlements.
//!
//! The signing secret is process-wide configuration loaded once at startup
//! and injected here; rotating it invalidates every outstanding token.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::error::AuthError;
use crate::models::{AssetId, WalletAddress};

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Claims carried by a capability token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// The authenticated wallet address.
    pub address: String,
    /// Assets held by the wallet at issuance time, in upstream order.
    pub assets: Vec<String>,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp; absent when no TTL is configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// Issues and validates capability tokens with a process-wide secret.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Option<Duration>,
}

impl TokenService {
    /// Create a token service from the signing secret and optional lifetime.
    pub fn new(secret: &str, ttl: Option<Duration>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = CLOCK_SKEW_LEEWAY;
        if ttl.is_none() {
            // Without a configured TTL tokens carry no expiry claim.
            validation.validate_exp = false;
            validation.set_required_spec_claims::<&str>(&[]);
        }

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    /// Mint a token for `address` holding `assets`.
    pub fn issue(&self, address: &WalletAddress, assets: &[AssetId]) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            address: address.to_string(),
            assets: assets.iter().map(|asset| asset.to_string()).collect(),
            iat: now,
            exp: self.ttl.map(|ttl| now + ttl.as_secs() as i64),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InternalError(format!("Failed to encode token: {e}")))
    }

    /// Verify a token's signature and decode its claims.
    ///
    /// The embedded address and asset list are returned verbatim; no live
    /// re-check against the asset resolver happens here.
    pub fn validate(&self, token: &str) -> Result<TokenClaims, AuthError> {
        decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::MalformedToken,
            })
    }
}
