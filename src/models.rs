// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! This module defines the request and response data structures used by
//! the REST API. All types derive `Serialize`, `Deserialize`, and `ToSchema`
//! for automatic JSON handling and OpenAPI documentation.
//!
//! ## Wallet Address Type
//!
//! The [`WalletAddress`] newtype wraps base58check-encoded wallet addresses.
//! It provides type safety and a format validity check.
//!
//! ## Model Categories
//!
//! - **Content**: asset-gated collections owned by a wallet
//! - **Posts / Comments**: entries inside a content collection (soft-deleted)
//! - **Media**: uploaded image metadata (blob bytes live in the object store)
//! - **Wallets**: registry of addresses that have logged in

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// =============================================================================
// Wallet Address Type
// =============================================================================

/// Base58check wallet address wrapper.
///
/// Provides type safety for wallet addresses throughout the API.
/// Format: base58check payload of 21 bytes (version byte + hash160).
///
/// # Example
///
/// ```rust,ignore
/// let addr = WalletAddress::from("1FBuCHMw5e5yTNKbf1eJq1bXZjoGaXeqwV");
/// assert!(addr.is_valid());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WalletAddress(pub String);

/// Version byte for pay-to-pubkey-hash addresses.
const VERSION_P2PKH: u8 = 0x00;
/// Version byte for pay-to-script-hash addresses.
const VERSION_P2SH: u8 = 0x05;

impl WalletAddress {
    /// Check that the address is well-formed base58check with a known
    /// version byte. The checksum is verified as part of decoding.
    pub fn is_valid(&self) -> bool {
        match bs58::decode(&self.0).with_check(None).into_vec() {
            Ok(payload) => {
                payload.len() == 21
                    && matches!(payload[0], VERSION_P2PKH | VERSION_P2SH)
            }
            Err(_) => false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for WalletAddress {
    fn from(value: String) -> Self {
        WalletAddress(value)
    }
}

impl From<&str> for WalletAddress {
    fn from(value: &str) -> Self {
        WalletAddress(value.to_string())
    }
}

impl From<WalletAddress> for String {
    fn from(value: WalletAddress) -> Self {
        value.0
    }
}

// =============================================================================
// Asset Identifier Type
// =============================================================================

/// Opaque on-chain asset identifier (asset long-name, e.g. `LLAMAS.test1`).
///
/// A wallet holds zero or more assets; each content collection is gated by
/// exactly one asset.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssetId(pub String);

impl AssetId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AssetId {
    fn from(value: String) -> Self {
        AssetId(value)
    }
}

impl From<&str> for AssetId {
    fn from(value: &str) -> Self {
        AssetId(value.to_string())
    }
}

// =============================================================================
// Content Models
// =============================================================================

/// An asset-gated content collection.
///
/// Reading or writing anything inside a collection requires the gating
/// `asset` to be present in the caller's capability token. The asset is
/// unique across all content records (first claim wins).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Content {
    /// Unique identifier for this collection.
    pub id: Uuid,
    /// The wallet that owns this collection.
    pub wallet_id: WalletAddress,
    /// The asset that gates access to this collection.
    pub asset: AssetId,
    /// Collection title.
    pub title: String,
    /// Collection description.
    pub description: String,
    /// Whether the collection is publicly listed.
    pub is_public: bool,
    /// When the collection was created.
    pub created_at: DateTime<Utc>,
}

/// Request to create a content collection.
///
/// Fields default to empty so that absent parameters surface as structured
/// validation errors rather than deserialization rejections.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateContentRequest {
    /// Collection title.
    #[serde(default)]
    pub title: String,
    /// Collection description.
    #[serde(default)]
    pub description: String,
    /// Whether the collection is publicly listed.
    #[serde(default)]
    pub is_public: bool,
    /// The asset that will gate the collection (must be held by the caller).
    #[serde(default)]
    pub asset: String,
}

/// Request to update a content collection.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateContentRequest {
    /// Updated title.
    #[serde(default)]
    pub title: String,
    /// Updated description.
    #[serde(default)]
    pub description: String,
    /// Updated visibility.
    #[serde(default)]
    pub is_public: bool,
}

// =============================================================================
// Post Models
// =============================================================================

/// A post inside a content collection.
///
/// Posts are soft-deleted: `is_deleted` is flipped and the row is retained.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Post {
    /// Unique identifier for this post.
    pub id: Uuid,
    /// The collection this post belongs to.
    pub content_id: Uuid,
    /// The wallet that authored the post.
    pub wallet_id: WalletAddress,
    /// Post title.
    pub title: String,
    /// Post body text.
    pub text: String,
    /// Whether the post shows up in the public feed.
    pub is_public: bool,
    /// Soft-delete flag.
    pub is_deleted: bool,
    /// When the post was created.
    pub created_at: DateTime<Utc>,
}

/// Request to create a post.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatePostRequest {
    /// The collection to post into.
    #[serde(default)]
    pub content_id: String,
    /// Post title.
    #[serde(default)]
    pub title: String,
    /// Post body text.
    #[serde(default)]
    pub text: String,
    /// Whether the post shows up in the public feed.
    #[serde(default)]
    pub is_public: bool,
}

/// Request to update a post.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdatePostRequest {
    /// Updated title.
    #[serde(default)]
    pub title: String,
    /// Updated body text.
    #[serde(default)]
    pub text: String,
}

/// A post together with its comments, returned by the single-post endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PostWithComments {
    #[serde(flatten)]
    pub post: Post,
    /// Comments on the post, oldest first.
    pub comments: Vec<Comment>,
}

// =============================================================================
// Comment Models
// =============================================================================

/// A comment on a post. Soft-deleted like posts.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Comment {
    /// Unique identifier for this comment.
    pub id: Uuid,
    /// The post this comment is attached to.
    pub post_id: Uuid,
    /// The wallet that authored the comment.
    pub wallet_id: WalletAddress,
    /// Comment text.
    pub comment: String,
    /// Soft-delete flag.
    pub is_deleted: bool,
    /// When the comment was created.
    pub created_at: DateTime<Utc>,
}

/// Request to create a comment.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateCommentRequest {
    /// The post to comment on.
    #[serde(default)]
    pub post_id: String,
    /// Comment text.
    #[serde(default)]
    pub comment: String,
}

// =============================================================================
// Media Models
// =============================================================================

/// Metadata for an uploaded media object.
///
/// The blob bytes themselves are held by the object store under the key
/// `images/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct MediaRecord {
    /// Unique identifier for this media object.
    pub id: Uuid,
    /// The wallet that uploaded the object.
    pub wallet_id: WalletAddress,
    /// What the object is used for (currently always `post`).
    pub usage: String,
    /// MIME content type of the stored bytes.
    pub content_type: String,
    /// Size of the stored bytes.
    pub size_bytes: u64,
    /// Whether the object is publicly fetchable.
    pub is_public: bool,
    /// Soft-delete flag.
    pub is_deleted: bool,
    /// When the object was uploaded.
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Wallet Registry Models
// =============================================================================

/// A wallet known to the service (recorded at login).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct WalletRecord {
    /// The wallet address.
    pub address: WalletAddress,
    /// First successful login.
    pub first_seen: DateTime<Utc>,
    /// Most recent successful login.
    pub last_login: DateTime<Utc>,
}

// =============================================================================
// Session Models
// =============================================================================

/// Login request carrying a signed-message ownership proof.
///
/// All fields are optional at the serde level so that missing parameters can
/// be reported with the structured `Missing params` error instead of a
/// deserialization rejection.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ValidateWalletRequest {
    /// The wallet address being proven.
    pub address: Option<String>,
    /// Base64 compact signature over `message`.
    pub signature: Option<String>,
    /// The message that was signed.
    pub message: Option<String>,
}

/// Successful login response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    /// Capability token to present in the `Authorization` header.
    pub token: String,
    /// The authenticated address (echo of the request).
    pub address: WalletAddress,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wallet_address_from_and_into_string() {
        let from_str: WalletAddress = "abc".into();
        assert_eq!(from_str.0, "abc");

        let from_string: WalletAddress = String::from("def").into();
        assert_eq!(from_string.0, "def");

        let to_string: String = WalletAddress("ghi".into()).into();
        assert_eq!(to_string, "ghi");
    }

    #[test]
    fn valid_mainnet_addresses_pass() {
        assert!(WalletAddress::from("1FBuCHMw5e5yTNKbf1eJq1bXZjoGaXeqwV").is_valid());
        assert!(WalletAddress::from("14GRxZmNCLHo5Uknr2XYnGA61Hh9uMULXV").is_valid());
    }

    #[test]
    fn invalid_addresses_fail() {
        // Not base58check at all
        assert!(!WalletAddress::from("Fake123").is_valid());
        // Empty
        assert!(!WalletAddress::from("").is_valid());
        // Valid base58 but corrupted checksum (last char flipped)
        assert!(!WalletAddress::from("1FBuCHMw5e5yTNKbf1eJq1bXZjoGaXeqwW").is_valid());
    }

    #[test]
    fn asset_id_display_round_trips() {
        let asset = AssetId::from("LLAMAS.test1");
        assert_eq!(asset.to_string(), "LLAMAS.test1");
        assert!(!asset.is_empty());
        assert!(AssetId::from("").is_empty());
    }
}
