// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Wallet-signature authentication and asset-scoped authorization.
//!
//! ## Auth Flow
//!
//! 1. Client signs an arbitrary message with its wallet key
//! 2. Client calls `POST /api/validate-wallet` with `{address, signature, message}`
//! 3. Server:
//!    - Verifies the signed message against the claimed address ([`signature`])
//!    - Fetches the assets the wallet currently holds ([`assets`])
//!    - Mints an HS256 capability token embedding `{address, assets}` ([`token`])
//! 4. Client presents the token in `Authorization` plus an `Address` header
//!    on every protected request; the [`extractor::Auth`] gate validates the
//!    token, cross-checks the address, and exposes an [`AuthContext`]
//!
//! ## Security
//!
//! - The asset list inside a token is a snapshot taken at login; callers
//!   re-authenticate to refresh entitlements
//! - Tokens are stateless bearer credentials with no server-side revocation;
//!   rotating the signing secret invalidates all of them
//! - Clock skew tolerance is 60 seconds

pub mod assets;
pub mod error;
pub mod extractor;
pub mod signature;
pub mod token;

pub use assets::{AssetResolver, AssetResolverError};
pub use error::AuthError;
pub use extractor::{Auth, AuthContext, ADDRESS_HEADER};
pub use signature::{verify_signed_message, SignatureError};
pub use token::{TokenClaims, TokenService};
