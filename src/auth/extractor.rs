// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for authenticated callers.
//!
//! Use the `Auth` extractor in handlers to require a valid capability token:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(ctx): Auth) -> impl IntoResponse {
//!     // ctx.address and ctx.assets come from the validated token
//! }
//! ```
//!
//! The gate requires two headers: `Authorization` carrying the capability
//! token and a companion `Address` header asserting the caller's identity.
//! The address embedded in the validated token must equal the asserted one;
//! a mismatch rejects the request. This stops a stolen token from being
//! replayed under a different claimed identity.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::error::AuthError;
use crate::models::{AssetId, WalletAddress};
use crate::state::AppState;

/// Companion header asserting the caller's wallet address.
pub const ADDRESS_HEADER: &str = "address";

/// Authenticated request context decoded from a capability token.
///
/// The asset list is the snapshot taken at login; handlers test resource
/// entitlements against it with [`AuthContext::holds`].
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// The authenticated wallet address.
    pub address: WalletAddress,
    /// Assets held at token issuance, in upstream order.
    pub assets: Vec<AssetId>,
}

impl AuthContext {
    /// Whether the caller's token entitles it to `asset`.
    pub fn holds(&self, asset: &AssetId) -> bool {
        self.assets.contains(asset)
    }
}

/// Extractor for authenticated callers.
///
/// Validates the capability token from the `Authorization` header against
/// the process-wide secret and cross-checks the `Address` header.
pub struct Auth(pub AuthContext);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // A context placed in extensions (middleware or tests) wins.
        if let Some(ctx) = parts.extensions.get::<AuthContext>().cloned() {
            return Ok(Auth(ctx));
        }

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingToken)?
            .to_str()
            .map_err(|_| AuthError::InvalidAuthHeader)?;

        // Some clients send the literal string "null" when no token is stored.
        if auth_header.is_empty() || auth_header == "null" {
            return Err(AuthError::MissingToken);
        }
        let token = auth_header.strip_prefix("Bearer ").unwrap_or(auth_header).trim();

        let claimed_address = parts
            .headers
            .get(ADDRESS_HEADER)
            .ok_or(AuthError::MissingAddressHeader)?
            .to_str()
            .map_err(|_| AuthError::MissingAddressHeader)?;

        let claims = state.sessions.validate(token)?;

        if claims.address != claimed_address {
            return Err(AuthError::AddressMismatch);
        }

        Ok(Auth(AuthContext {
            address: WalletAddress::from(claims.address),
            assets: claims.assets.into_iter().map(AssetId::from).collect(),
        }))
    }
}
