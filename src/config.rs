// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration Constants
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATA_DIR` | Root directory for the embedded database | `./data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `3100` |
//! | `TOKEN_SECRET` | HS256 signing secret for capability tokens | Required for production |
//! | `TOKEN_TTL_SECS` | Capability token lifetime in seconds (unset = no expiry) | Unset |
//! | `BALANCE_API_URL` | Base URL of the asset balance service | `https://xchain.io` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

/// Environment variable name for the data directory path.
///
/// The embedded database file (`content.redb`) is created inside this
/// directory on first startup.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Default data directory when `DATA_DIR` is unset.
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Environment variable name for the capability-token signing secret.
///
/// The secret is loaded once at startup and injected into the token service.
/// Rotating it invalidates every previously issued token; there is no
/// graceful rollover.
pub const TOKEN_SECRET_ENV: &str = "TOKEN_SECRET";

/// Environment variable name for the capability-token lifetime in seconds.
///
/// When unset, issued tokens carry no expiry claim and remain valid until
/// the signing secret rotates.
pub const TOKEN_TTL_ENV: &str = "TOKEN_TTL_SECS";

/// Environment variable name for the balance service base URL.
pub const BALANCE_API_URL_ENV: &str = "BALANCE_API_URL";

/// Default balance service when `BALANCE_API_URL` is unset.
pub const DEFAULT_BALANCE_API_URL: &str = "https://xchain.io";
