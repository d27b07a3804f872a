// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{AssetResolver, TokenService};
use crate::storage::{ContentDatabase, ObjectStore};

#[derive(Clone)]
pub struct AppState {
    /// Embedded content database.
    pub db: Arc<ContentDatabase>,
    /// Blob storage for media bytes.
    pub objects: Arc<ObjectStore>,
    /// Capability token issuer/validator (process-wide secret).
    pub sessions: Arc<TokenService>,
    /// Balance-service client for login-time asset resolution.
    pub resolver: Arc<AssetResolver>,
}

impl AppState {
    pub fn new(db: ContentDatabase, sessions: TokenService, resolver: AssetResolver) -> Self {
        Self {
            db: Arc::new(db),
            objects: Arc::new(ObjectStore::new()),
            sessions: Arc::new(sessions),
            resolver: Arc::new(resolver),
        }
    }
}
