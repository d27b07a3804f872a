// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Tokengate - Wallet-Authenticated Content Publishing Service
//!
//! This crate provides an asset-gated content backend: users prove ownership
//! of a wallet address with a signed message, receive a capability token
//! scoped to the assets that wallet holds, and publish content, posts,
//! comments, and media gated by asset ownership.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Signature verification, asset resolution, capability tokens
//! - `storage` - Embedded content database (redb) and blob store

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;
