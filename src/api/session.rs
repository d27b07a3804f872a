// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet login: signed-message verification and token issuance.

use axum::{extract::State, Json};

use crate::{
    auth::{signature::SignatureError, verify_signed_message},
    error::ApiError,
    models::{SessionResponse, ValidateWalletRequest, WalletAddress},
    state::AppState,
};

/// Authenticate a wallet by verifying a signed message.
///
/// On success the response carries a capability token embedding the address
/// and a snapshot of the assets the wallet holds right now. The snapshot is
/// not refreshed for the lifetime of the token; clients log in again to pick
/// up newly acquired assets.
#[utoipa::path(
    post,
    path = "/api/validate-wallet",
    tag = "Session",
    request_body = ValidateWalletRequest,
    responses(
        (status = 200, description = "Wallet authenticated", body = SessionResponse),
        (status = 401, description = "Missing params or invalid address"),
        (status = 404, description = "Signature does not match the message"),
        (status = 500, description = "Malformed signature or asset resolution failure")
    )
)]
pub async fn validate_wallet(
    State(state): State<AppState>,
    Json(request): Json<ValidateWalletRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let address = request.address.filter(|value| !value.is_empty());
    let signature = request.signature.filter(|value| !value.is_empty());
    let message = request.message.filter(|value| !value.is_empty());

    let (Some(address), Some(signature), Some(message)) = (address, signature, message) else {
        return Err(ApiError::unauthorized("Missing params"));
    };

    let address = WalletAddress::from(address);
    if !address.is_valid() {
        return Err(ApiError::unauthorized("Invalid address"));
    }

    match verify_signed_message(&address, &message, &signature) {
        Ok(true) => {}
        Ok(false) => return Err(ApiError::not_found("Invalid Message")),
        Err(SignatureError::Malformed(reason)) => {
            return Err(ApiError::internal(format!("Malformed signature: {reason}")));
        }
    }

    let assets = state.resolver.resolve(&address).await.map_err(|e| {
        tracing::error!(address = %address, "asset resolution failed: {e}");
        ApiError::internal(format!("Failed to resolve wallet assets: {e}"))
    })?;

    let token = state
        .sessions
        .issue(&address, &assets)
        .map_err(|e| ApiError::internal(format!("Failed to issue token: {e}")))?;

    state.db.record_login(&address)?;

    tracing::info!(address = %address, assets = assets.len(), "wallet authenticated");
    Ok(Json(SessionResponse { token, address }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AssetResolver, TokenService};
    use crate::storage::ContentDatabase;
    use axum::http::StatusCode;
    use axum::{routing::get, Router};
    use serde_json::json;
    use tempfile::TempDir;

    const ADDRESS: &str = "1FBuCHMw5e5yTNKbf1eJq1bXZjoGaXeqwV";
    const MESSAGE: &str = "The man who stole the world";
    const SIGNATURE: &str =
        "IHcdszz688dGiPOP82v3nMQ3UQu6pdMPOV4tQV9Ok3jcaQo5e49rkUtxcd51SY7opxjawcI955FmoPajtnCTDpQ=";

    async fn spawn_balance_service(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock balance service");
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn healthy_balance_service() -> String {
        spawn_balance_service(Router::new().route(
            "/api/balances/{address}",
            get(|| async {
                Json(json!({
                    "data": [
                        { "asset": "A1", "asset_longname": "LLAMAS.test1" },
                        { "asset": "A2", "asset_longname": "LLAMAS.test2" }
                    ]
                }))
            }),
        ))
        .await
    }

    fn test_state(balance_url: &str) -> (AppState, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let db = ContentDatabase::open(&dir.path().join("content.redb")).expect("open db");
        let state = AppState::new(
            db,
            TokenService::new("test-secret", None),
            AssetResolver::new(balance_url),
        );
        (state, dir)
    }

    fn login_request(address: &str, signature: &str, message: &str) -> ValidateWalletRequest {
        ValidateWalletRequest {
            address: Some(address.to_string()),
            signature: Some(signature.to_string()),
            message: Some(message.to_string()),
        }
    }

    #[tokio::test]
    async fn login_succeeds_and_embeds_snapshot() {
        let base = healthy_balance_service().await;
        let (state, _dir) = test_state(&base);

        let Json(response) = validate_wallet(
            State(state.clone()),
            Json(login_request(ADDRESS, SIGNATURE, MESSAGE)),
        )
        .await
        .expect("login succeeds");

        assert_eq!(response.address, WalletAddress::from(ADDRESS));

        let claims = state.sessions.validate(&response.token).unwrap();
        assert_eq!(claims.address, ADDRESS);
        assert_eq!(claims.assets, vec!["LLAMAS.test1", "LLAMAS.test2"]);

        // Login is recorded in the wallet registry.
        let wallet = state.db.wallet(&WalletAddress::from(ADDRESS)).unwrap();
        assert!(wallet.is_some());
    }

    #[tokio::test]
    async fn missing_param_is_unauthorized() {
        let base = healthy_balance_service().await;
        let (state, _dir) = test_state(&base);

        let request = ValidateWalletRequest {
            address: Some(ADDRESS.to_string()),
            signature: Some(SIGNATURE.to_string()),
            message: None,
        };

        let err = validate_wallet(State(state), Json(request)).await.unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.message, "Missing params");
    }

    #[tokio::test]
    async fn invalid_address_is_unauthorized() {
        let base = healthy_balance_service().await;
        let (state, _dir) = test_state(&base);

        let err = validate_wallet(
            State(state),
            Json(login_request("Fake123", SIGNATURE, MESSAGE)),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.message, "Invalid address");
    }

    #[tokio::test]
    async fn wrong_message_is_not_found() {
        let base = healthy_balance_service().await;
        let (state, _dir) = test_state(&base);

        let err = validate_wallet(
            State(state),
            Json(login_request(ADDRESS, SIGNATURE, "Incorrect Message")),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Invalid Message");
    }

    #[tokio::test]
    async fn malformed_signature_is_internal() {
        let base = healthy_balance_service().await;
        let (state, _dir) = test_state(&base);

        let err = validate_wallet(
            State(state),
            Json(login_request(ADDRESS, "Fake123", MESSAGE)),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn upstream_failure_is_internal() {
        let base = spawn_balance_service(Router::new().route(
            "/api/balances/{address}",
            get(|| async { (StatusCode::BAD_GATEWAY, "down") }),
        ))
        .await;
        let (state, _dir) = test_state(&base);

        let err = validate_wallet(
            State(state),
            Json(login_request(ADDRESS, SIGNATURE, MESSAGE)),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
