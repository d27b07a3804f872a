// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-process object store.
//!
//! Stands in for the external object-storage collaborator (put/get/list by
//! key). Media handlers treat this as an opaque blob service; swapping in a
//! real bucket client only touches this module.

use std::collections::HashMap;

use tokio::sync::RwLock;

/// A stored blob and its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Keyed blob storage with put/get/list semantics.
#[derive(Default)]
pub struct ObjectStore {
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl ObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a blob under `key`, replacing any existing object.
    pub async fn put(&self, key: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) {
        let object = StoredObject {
            content_type: content_type.into(),
            bytes,
        };
        self.objects.write().await.insert(key.into(), object);
    }

    /// Fetch a blob by key.
    pub async fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects.read().await.get(key).cloned()
    }

    /// All stored keys, sorted.
    pub async fn list_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }
}
