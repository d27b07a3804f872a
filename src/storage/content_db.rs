// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded content database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `wallets`: address → serialized WalletRecord
//! - `content`: content_id → serialized Content
//! - `asset_index`: gating asset → content_id (uniqueness constraint)
//! - `posts`: post_id → serialized Post
//! - `comments`: comment_id → serialized Comment
//! - `media`: media_id → serialized MediaRecord
//!
//! The `asset_index` table is checked and written inside the same write
//! transaction that inserts a content row, so asset claims are
//! first-claim-wins even under concurrent creates.
//!
//! Posts, comments, and media are soft-deleted: rows are rewritten with
//! `is_deleted = true` and never removed.

use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use uuid::Uuid;

use crate::models::{
    AssetId, Comment, Content, MediaRecord, Post, UpdateContentRequest, WalletAddress,
    WalletRecord,
};

// =============================================================================
// Table Definitions
// =============================================================================

/// Wallet registry: address → serialized WalletRecord (JSON bytes).
const WALLETS: TableDefinition<&str, &[u8]> = TableDefinition::new("wallets");

/// Primary content table: content_id → serialized Content (JSON bytes).
const CONTENT: TableDefinition<&str, &[u8]> = TableDefinition::new("content");

/// Uniqueness index: gating asset → content_id.
const ASSET_INDEX: TableDefinition<&str, &str> = TableDefinition::new("asset_index");

/// Posts: post_id → serialized Post (JSON bytes).
const POSTS: TableDefinition<&str, &[u8]> = TableDefinition::new("posts");

/// Comments: comment_id → serialized Comment (JSON bytes).
const COMMENTS: TableDefinition<&str, &[u8]> = TableDefinition::new("comments");

/// Media metadata: media_id → serialized MediaRecord (JSON bytes).
const MEDIA: TableDefinition<&str, &[u8]> = TableDefinition::new("media");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("asset already claimed: {0}")]
    AssetClaimed(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// ContentDatabase
// =============================================================================

/// Embedded ACID database for wallets, content, posts, comments, and media
/// metadata.
pub struct ContentDatabase {
    db: Database,
}

impl ContentDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(WALLETS)?;
            let _ = write_txn.open_table(CONTENT)?;
            let _ = write_txn.open_table(ASSET_INDEX)?;
            let _ = write_txn.open_table(POSTS)?;
            let _ = write_txn.open_table(COMMENTS)?;
            let _ = write_txn.open_table(MEDIA)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    // =========================================================================
    // Wallet Registry
    // =========================================================================

    /// Record a successful login, inserting the wallet on first sight.
    pub fn record_login(&self, address: &WalletAddress) -> StoreResult<WalletRecord> {
        let now = chrono::Utc::now();
        let write_txn = self.db.begin_write()?;
        let record = {
            let mut table = write_txn.open_table(WALLETS)?;
            let existing: Option<WalletRecord> = match table.get(address.as_str())? {
                Some(guard) => Some(serde_json::from_slice(guard.value())?),
                None => None,
            };

            let record = match existing {
                Some(mut record) => {
                    record.last_login = now;
                    record
                }
                None => WalletRecord {
                    address: address.clone(),
                    first_seen: now,
                    last_login: now,
                },
            };

            let bytes = serde_json::to_vec(&record)?;
            table.insert(address.as_str(), bytes.as_slice())?;
            record
        };
        write_txn.commit()?;
        Ok(record)
    }

    /// All wallets that have ever logged in, ordered by address.
    pub fn wallets(&self) -> StoreResult<Vec<WalletRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(WALLETS)?;

        let mut records = Vec::new();
        for row in table.range::<&str>(..)? {
            let (_, value) = row?;
            records.push(serde_json::from_slice::<WalletRecord>(value.value())?);
        }
        Ok(records)
    }

    /// Look up a single wallet by address.
    pub fn wallet(&self, address: &WalletAddress) -> StoreResult<Option<WalletRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(WALLETS)?;
        match table.get(address.as_str())? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    // =========================================================================
    // Content
    // =========================================================================

    /// Insert a content record, claiming its gating asset.
    ///
    /// The asset-index check and both inserts happen inside one write
    /// transaction: the first creator wins, every later claim of the same
    /// asset fails with [`StoreError::AssetClaimed`].
    pub fn create_content(&self, content: &Content) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut index = write_txn.open_table(ASSET_INDEX)?;
            if index.get(content.asset.as_str())?.is_some() {
                return Err(StoreError::AssetClaimed(content.asset.to_string()));
            }

            let id = content.id.to_string();
            index.insert(content.asset.as_str(), id.as_str())?;

            let mut table = write_txn.open_table(CONTENT)?;
            let bytes = serde_json::to_vec(content)?;
            table.insert(id.as_str(), bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Look up a content record by id.
    pub fn content(&self, id: &Uuid) -> StoreResult<Option<Content>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CONTENT)?;
        match table.get(id.to_string().as_str())? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// All content records whose gating asset appears in `assets`.
    pub fn content_by_assets(&self, assets: &[AssetId]) -> StoreResult<Vec<Content>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CONTENT)?;

        let mut records = Vec::new();
        for row in table.range::<&str>(..)? {
            let (_, value) = row?;
            let content: Content = serde_json::from_slice(value.value())?;
            if assets.contains(&content.asset) {
                records.push(content);
            }
        }
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(records)
    }

    /// Update a content record, scoped to its owner.
    ///
    /// Returns `None` when no record with that id is owned by `owner`.
    pub fn update_content(
        &self,
        id: &Uuid,
        owner: &WalletAddress,
        update: &UpdateContentRequest,
    ) -> StoreResult<Option<Content>> {
        let write_txn = self.db.begin_write()?;
        let updated = {
            let mut table = write_txn.open_table(CONTENT)?;
            let key = id.to_string();
            let existing: Option<Content> = match table.get(key.as_str())? {
                Some(guard) => Some(serde_json::from_slice(guard.value())?),
                None => None,
            };

            match existing {
                Some(mut content) if &content.wallet_id == owner => {
                    content.title = update.title.clone();
                    content.description = update.description.clone();
                    content.is_public = update.is_public;

                    let bytes = serde_json::to_vec(&content)?;
                    table.insert(key.as_str(), bytes.as_slice())?;
                    Some(content)
                }
                _ => None,
            }
        };
        write_txn.commit()?;
        Ok(updated)
    }

    // =========================================================================
    // Posts
    // =========================================================================

    /// Insert a post.
    pub fn create_post(&self, post: &Post) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(POSTS)?;
            let key = post.id.to_string();
            let bytes = serde_json::to_vec(post)?;
            table.insert(key.as_str(), bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Look up a post by id. Soft-deleted posts are reported as absent.
    pub fn post(&self, id: &Uuid) -> StoreResult<Option<Post>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(POSTS)?;
        match table.get(id.to_string().as_str())? {
            Some(guard) => {
                let post: Post = serde_json::from_slice(guard.value())?;
                Ok((!post.is_deleted).then_some(post))
            }
            None => Ok(None),
        }
    }

    /// All live posts inside a collection, oldest first.
    pub fn posts_by_content(&self, content_id: &Uuid) -> StoreResult<Vec<Post>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(POSTS)?;

        let mut posts = Vec::new();
        for row in table.range::<&str>(..)? {
            let (_, value) = row?;
            let post: Post = serde_json::from_slice(value.value())?;
            if &post.content_id == content_id && !post.is_deleted {
                posts.push(post);
            }
        }
        posts.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(posts)
    }

    /// All live public posts, oldest first.
    pub fn public_posts(&self) -> StoreResult<Vec<Post>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(POSTS)?;

        let mut posts = Vec::new();
        for row in table.range::<&str>(..)? {
            let (_, value) = row?;
            let post: Post = serde_json::from_slice(value.value())?;
            if post.is_public && !post.is_deleted {
                posts.push(post);
            }
        }
        posts.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(posts)
    }

    /// Update a post's title and text, scoped to its owner.
    pub fn update_post(
        &self,
        id: &Uuid,
        owner: &WalletAddress,
        title: &str,
        text: &str,
    ) -> StoreResult<Option<Post>> {
        let write_txn = self.db.begin_write()?;
        let updated = {
            let mut table = write_txn.open_table(POSTS)?;
            let key = id.to_string();
            let existing: Option<Post> = match table.get(key.as_str())? {
                Some(guard) => Some(serde_json::from_slice(guard.value())?),
                None => None,
            };

            match existing {
                Some(mut post) if &post.wallet_id == owner && !post.is_deleted => {
                    post.title = title.to_string();
                    post.text = text.to_string();

                    let bytes = serde_json::to_vec(&post)?;
                    table.insert(key.as_str(), bytes.as_slice())?;
                    Some(post)
                }
                _ => None,
            }
        };
        write_txn.commit()?;
        Ok(updated)
    }

    /// Soft-delete a post, scoped to its owner. Returns whether a live post
    /// was deleted.
    pub fn soft_delete_post(&self, id: &Uuid, owner: &WalletAddress) -> StoreResult<bool> {
        let write_txn = self.db.begin_write()?;
        let deleted = {
            let mut table = write_txn.open_table(POSTS)?;
            let key = id.to_string();
            let existing: Option<Post> = match table.get(key.as_str())? {
                Some(guard) => Some(serde_json::from_slice(guard.value())?),
                None => None,
            };

            match existing {
                Some(mut post) if &post.wallet_id == owner && !post.is_deleted => {
                    post.is_deleted = true;
                    let bytes = serde_json::to_vec(&post)?;
                    table.insert(key.as_str(), bytes.as_slice())?;
                    true
                }
                _ => false,
            }
        };
        write_txn.commit()?;
        Ok(deleted)
    }

    // =========================================================================
    // Comments
    // =========================================================================

    /// Insert a comment.
    pub fn create_comment(&self, comment: &Comment) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(COMMENTS)?;
            let key = comment.id.to_string();
            let bytes = serde_json::to_vec(comment)?;
            table.insert(key.as_str(), bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// All live comments on a post, oldest first.
    pub fn comments_by_post(&self, post_id: &Uuid) -> StoreResult<Vec<Comment>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(COMMENTS)?;

        let mut comments = Vec::new();
        for row in table.range::<&str>(..)? {
            let (_, value) = row?;
            let comment: Comment = serde_json::from_slice(value.value())?;
            if &comment.post_id == post_id && !comment.is_deleted {
                comments.push(comment);
            }
        }
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(comments)
    }

    /// Soft-delete a comment, scoped to its owner. Returns whether a live
    /// comment was deleted.
    pub fn soft_delete_comment(&self, id: &Uuid, owner: &WalletAddress) -> StoreResult<bool> {
        let write_txn = self.db.begin_write()?;
        let deleted = {
            let mut table = write_txn.open_table(COMMENTS)?;
            let key = id.to_string();
            let existing: Option<Comment> = match table.get(key.as_str())? {
                Some(guard) => Some(serde_json::from_slice(guard.value())?),
                None => None,
            };

            match existing {
                Some(mut comment) if &comment.wallet_id == owner && !comment.is_deleted => {
                    comment.is_deleted = true;
                    let bytes = serde_json::to_vec(&comment)?;
                    table.insert(key.as_str(), bytes.as_slice())?;
                    true
                }
                _ => false,
            }
        };
        write_txn.commit()?;
        Ok(deleted)
    }

    // =========================================================================
    // Media
    // =========================================================================

    /// Insert a media metadata record.
    pub fn create_media(&self, record: &MediaRecord) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(MEDIA)?;
            let key = record.id.to_string();
            let bytes = serde_json::to_vec(record)?;
            table.insert(key.as_str(), bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Look up a media record by id. Soft-deleted records are absent.
    pub fn media(&self, id: &Uuid) -> StoreResult<Option<MediaRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(MEDIA)?;
        match table.get(id.to_string().as_str())? {
            Some(guard) => {
                let record: MediaRecord = serde_json::from_slice(guard.value())?;
                Ok((!record.is_deleted).then_some(record))
            }
            None => Ok(None),
        }
    }
}
