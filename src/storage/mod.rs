// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistence for the service, split in two:
//!
//! - [`ContentDatabase`]: an embedded redb database holding wallets,
//!   content, posts, comments, and media metadata. Asset-uniqueness for
//!   content is enforced here, inside the write transaction that creates
//!   the row.
//! - [`ObjectStore`]: an in-process blob store standing in for the external
//!   object-storage collaborator (media bytes under `images/{id}` keys).
//!
//! Posts and comments are soft-deleted and never physically removed.

pub mod content_db;
pub mod objects;

pub use content_db::{ContentDatabase, StoreError, StoreResult};
pub use objects::{ObjectStore, StoredObject};
