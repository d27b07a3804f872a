// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use crate::{
    auth::AuthContext,
    error::ApiError,
    models::{
        Comment, Content, CreateCommentRequest, CreateContentRequest, CreatePostRequest,
        MediaRecord, Post, PostWithComments, SessionResponse, UpdateContentRequest,
        UpdatePostRequest, ValidateWalletRequest, WalletAddress, WalletRecord,
    },
    state::AppState,
};

pub mod comments;
pub mod content;
pub mod health;
pub mod media;
pub mod posts;
pub mod public;
pub mod session;
pub mod wallets;

/// Request body ceiling; large enough for the 15 MiB media cap plus
/// multipart framing.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Parse a path or body identifier, mapping failure to a structured 400.
pub(crate) fn parse_uuid(value: &str, error: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(value).map_err(|_| ApiError::bad_request(error))
}

/// Load a collection and check the caller's entitlement to its gating asset.
pub(crate) fn guarded_content(
    state: &AppState,
    ctx: &AuthContext,
    content_id: &Uuid,
) -> Result<Content, ApiError> {
    let content = state
        .db
        .content(content_id)?
        .ok_or_else(|| ApiError::not_found("Content not found"))?;

    if !ctx.holds(&content.asset) {
        return Err(ApiError::unauthorized("Token not available in wallet"));
    }

    Ok(content)
}

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/validate-wallet", post(session::validate_wallet))
        .route("/wallets", get(wallets::list_wallets))
        .route("/wallets/{address}", get(wallets::get_wallet))
        .route(
            "/content",
            get(content::list_content).post(content::create_content),
        )
        .route(
            "/content/{content_id}",
            get(content::get_content).put(content::update_content),
        )
        .route("/posts", get(posts::list_posts).post(posts::create_post))
        .route(
            "/posts/{post_id}",
            get(posts::get_post)
                .put(posts::update_post)
                .delete(posts::delete_post),
        )
        .route(
            "/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route("/comments/{comment_id}", delete(comments::delete_comment))
        .route("/media", get(media::list_media).post(media::upload_media))
        .route("/media/{media_id}", get(media::get_media))
        .route("/public", get(public::public_posts))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state.clone());

    Router::new()
        .route("/health", get(health::health))
        .with_state(state)
        .nest("/api", api_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        session::validate_wallet,
        wallets::list_wallets,
        wallets::get_wallet,
        content::list_content,
        content::get_content,
        content::create_content,
        content::update_content,
        posts::list_posts,
        posts::get_post,
        posts::create_post,
        posts::update_post,
        posts::delete_post,
        comments::list_comments,
        comments::create_comment,
        comments::delete_comment,
        media::upload_media,
        media::list_media,
        media::get_media,
        public::public_posts,
        health::health
    ),
    components(
        schemas(
            WalletAddress,
            WalletRecord,
            Content,
            Post,
            PostWithComments,
            Comment,
            MediaRecord,
            SessionResponse,
            ValidateWalletRequest,
            CreateContentRequest,
            UpdateContentRequest,
            CreatePostRequest,
            UpdatePostRequest,
            CreateCommentRequest,
            health::ReadyResponse,
            health::HealthChecks
        )
    ),
    tags(
        (name = "Session", description = "Wallet login and token issuance"),
        (name = "Wallets", description = "Wallet registry"),
        (name = "Content", description = "Asset-gated content collections"),
        (name = "Posts", description = "Posts inside collections"),
        (name = "Comments", description = "Comments on posts"),
        (name = "Media", description = "Image upload and retrieval"),
        (name = "Public", description = "Unauthenticated feed"),
        (name = "Health", description = "Service health")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AssetResolver, TokenService};
    use crate::storage::ContentDatabase;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tempfile::TempDir;
    use tower::ServiceExt;

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

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let (state, _dir) = test_state();
        let app = router(state);
        // Ensure the router can be converted into a service without panicking.
        let _ = app.into_make_service();
    }

    #[tokio::test]
    async fn protected_route_rejects_anonymous_callers() {
        let (state, _dir) = test_state();
        let app = router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/content")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn public_routes_do_not_require_auth() {
        let (state, _dir) = test_state();
        let app = router(state);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/public")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn full_token_round_trip_through_router() {
        let (state, _dir) = test_state();
        let token = state
            .sessions
            .issue(
                &WalletAddress::from("1FBuCHMw5e5yTNKbf1eJq1bXZjoGaXeqwV"),
                &[],
            )
            .unwrap();
        let app = router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/content")
                    .header("Authorization", token)
                    .header("Address", "1FBuCHMw5e5yTNKbf1eJq1bXZjoGaXeqwV")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
