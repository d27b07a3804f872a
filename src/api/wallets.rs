// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet registry endpoints.
//!
//! The registry is populated by successful logins; these endpoints expose it
//! to authenticated callers.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    auth::Auth,
    error::ApiError,
    models::{WalletAddress, WalletRecord},
    state::AppState,
};

/// List every wallet that has logged in.
#[utoipa::path(
    get,
    path = "/api/wallets",
    tag = "Wallets",
    responses(
        (status = 200, description = "Known wallets", body = [WalletRecord]),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_wallets(
    Auth(_ctx): Auth,
    State(state): State<AppState>,
) -> Result<Json<Vec<WalletRecord>>, ApiError> {
    Ok(Json(state.db.wallets()?))
}

/// Look up a single wallet by address.
#[utoipa::path(
    get,
    path = "/api/wallets/{address}",
    tag = "Wallets",
    params(("address" = String, Path, description = "Wallet address")),
    responses(
        (status = 200, description = "The wallet", body = WalletRecord),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Wallet not found")
    )
)]
pub async fn get_wallet(
    Auth(_ctx): Auth,
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<WalletRecord>, ApiError> {
    let record = state
        .db
        .wallet(&WalletAddress::from(address))?
        .ok_or_else(|| ApiError::not_found("Wallet not found"))?;
    Ok(Json(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AssetResolver, AuthContext, TokenService};
    use crate::storage::ContentDatabase;
    use axum::http::StatusCode;
    use tempfile::TempDir;

    const WALLET: &str = "1FBuCHMw5e5yTNKbf1eJq1bXZjoGaXeqwV";

    fn test_state() -> (AppState, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let db = ContentDatabase::open(&dir.path().join("content.redb")).expect("open db");
        let state = AppState::new(
            db,
            TokenService::new("test-secret", None),
            AssetResolver::new("http://127.0.0.1:9"),
        );
        (state, dir)
    }

    fn ctx() -> Auth {
        Auth(AuthContext {
            address: WalletAddress::from(WALLET),
            assets: vec![],
        })
    }

    #[tokio::test]
    async fn registry_lists_logged_in_wallets() {
        let (state, _dir) = test_state();
        state.db.record_login(&WalletAddress::from(WALLET)).unwrap();

        let Json(wallets) = list_wallets(ctx(), State(state.clone())).await.unwrap();
        assert_eq!(wallets.len(), 1);
        assert_eq!(wallets[0].address, WalletAddress::from(WALLET));

        let Json(wallet) = get_wallet(ctx(), State(state.clone()), Path(WALLET.into()))
            .await
            .unwrap();
        assert_eq!(wallet.address, WalletAddress::from(WALLET));

        let err = get_wallet(ctx(), State(state), Path("unknown".into()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
