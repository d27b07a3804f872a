// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Comment endpoints.
//!
//! Comments attach to posts; entitlement is checked against the gating asset
//! of the collection the post belongs to.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    auth::Auth,
    error::ApiError,
    models::{Comment, CreateCommentRequest},
    state::AppState,
};

use super::{guarded_content, parse_uuid};

#[derive(Debug, Deserialize, IntoParams)]
pub struct CommentsQuery {
    /// The post to list comments from.
    pub post_id: Option<String>,
}

/// List the comments on a post.
#[utoipa::path(
    get,
    path = "/api/comments",
    tag = "Comments",
    params(CommentsQuery),
    responses(
        (status = 200, description = "Comments on the post", body = [Comment]),
        (status = 400, description = "Missing or malformed post_id"),
        (status = 401, description = "Token not available in wallet"),
        (status = 404, description = "Post not found")
    )
)]
pub async fn list_comments(
    Auth(ctx): Auth,
    State(state): State<AppState>,
    Query(query): Query<CommentsQuery>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let post_id = query
        .post_id
        .as_deref()
        .ok_or_else(|| ApiError::bad_request("Missing post_id"))?;
    let post_id = parse_uuid(post_id, "Post ID malformed")?;

    let post = state
        .db
        .post(&post_id)?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;
    guarded_content(&state, &ctx, &post.content_id)?;

    let comments = state.db.comments_by_post(&post_id)?;
    Ok(Json(comments))
}

/// Comment on a post.
#[utoipa::path(
    post,
    path = "/api/comments",
    tag = "Comments",
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment created", body = Comment),
        (status = 400, description = "Missing or malformed fields"),
        (status = 401, description = "Token not available in wallet"),
        (status = 404, description = "Post not found")
    )
)]
pub async fn create_comment(
    Auth(ctx): Auth,
    State(state): State<AppState>,
    Json(request): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let post_id = parse_uuid(&request.post_id, "Post ID malformed")?;

    let post = state
        .db
        .post(&post_id)?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    guarded_content(&state, &ctx, &post.content_id)?;

    if request.comment.is_empty() {
        return Err(ApiError::bad_request("No comment present"));
    }

    let comment = Comment {
        id: Uuid::new_v4(),
        post_id,
        wallet_id: ctx.address.clone(),
        comment: request.comment,
        is_deleted: false,
        created_at: chrono::Utc::now(),
    };

    state.db.create_comment(&comment)?;

    tracing::info!(address = %ctx.address, comment = %comment.id, "created comment");
    Ok((StatusCode::CREATED, Json(comment)))
}

/// Soft-delete a comment.
#[utoipa::path(
    delete,
    path = "/api/comments/{comment_id}",
    tag = "Comments",
    params(("comment_id" = String, Path, description = "Comment identifier")),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 400, description = "Comment ID malformed"),
        (status = 404, description = "Comment not found")
    )
)]
pub async fn delete_comment(
    Auth(ctx): Auth,
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let comment_id = parse_uuid(&comment_id, "Comment ID malformed")?;

    if !state.db.soft_delete_comment(&comment_id, &ctx.address)? {
        return Err(ApiError::not_found("Comment not found"));
    }

    tracing::info!(address = %ctx.address, comment = %comment_id, "deleted comment");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AssetResolver, AuthContext, TokenService};
    use crate::models::{AssetId, Content, Post, WalletAddress};
    use crate::storage::ContentDatabase;
    use tempfile::TempDir;

    const WALLET_1: &str = "14GRxZmNCLHo5Uknr2XYnGA61Hh9uMULXV";
    const WALLET_2: &str = "1FBuCHMw5e5yTNKbf1eJq1bXZjoGaXeqwV";

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

    fn ctx(address: &str, assets: &[&str]) -> Auth {
        Auth(AuthContext {
            address: WalletAddress::from(address),
            assets: assets.iter().map(|a| AssetId::from(*a)).collect(),
        })
    }

    fn seed_post(state: &AppState, asset: &str) -> Post {
        let content = Content {
            id: Uuid::new_v4(),
            wallet_id: WalletAddress::from(WALLET_1),
            asset: AssetId::from(asset),
            title: "Llama lore".into(),
            description: String::new(),
            is_public: false,
            created_at: chrono::Utc::now(),
        };
        state.db.create_content(&content).unwrap();

        let post = Post {
            id: Uuid::new_v4(),
            content_id: content.id,
            wallet_id: WalletAddress::from(WALLET_1),
            title: "First post".into(),
            text: "Hello".into(),
            is_public: false,
            is_deleted: false,
            created_at: chrono::Utc::now(),
        };
        state.db.create_post(&post).unwrap();
        post
    }

    #[tokio::test]
    async fn create_and_list_comments() {
        let (state, _dir) = test_state();
        let post = seed_post(&state, "LLAMAS.test1");

        let (status, Json(comment)) = create_comment(
            ctx(WALLET_2, &["LLAMAS.test1"]),
            State(state.clone()),
            Json(CreateCommentRequest {
                post_id: post.id.to_string(),
                comment: "Nice llamas".into(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(comment.wallet_id, WalletAddress::from(WALLET_2));

        let Json(comments) = list_comments(
            ctx(WALLET_1, &["LLAMAS.test1"]),
            State(state),
            Query(CommentsQuery {
                post_id: Some(post.id.to_string()),
            }),
        )
        .await
        .unwrap();
        assert_eq!(comments, vec![comment]);
    }

    #[tokio::test]
    async fn create_validates_input() {
        let (state, _dir) = test_state();
        let post = seed_post(&state, "LLAMAS.test1");

        let err = create_comment(
            ctx(WALLET_1, &["LLAMAS.test1"]),
            State(state.clone()),
            Json(CreateCommentRequest {
                post_id: "123".into(),
                comment: "text".into(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Post ID malformed");

        let err = create_comment(
            ctx(WALLET_1, &["LLAMAS.test1"]),
            State(state.clone()),
            Json(CreateCommentRequest {
                post_id: Uuid::new_v4().to_string(),
                comment: "text".into(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Post not found");

        let err = create_comment(
            ctx(WALLET_1, &["LLAMAS.test1"]),
            State(state.clone()),
            Json(CreateCommentRequest {
                post_id: post.id.to_string(),
                comment: String::new(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "No comment present");

        let err = create_comment(
            ctx(WALLET_2, &["LLAMAS.other"]),
            State(state),
            Json(CreateCommentRequest {
                post_id: post.id.to_string(),
                comment: "text".into(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.message, "Token not available in wallet");
    }

    #[tokio::test]
    async fn delete_is_owner_scoped() {
        let (state, _dir) = test_state();
        let post = seed_post(&state, "LLAMAS.test1");

        let (_, Json(comment)) = create_comment(
            ctx(WALLET_2, &["LLAMAS.test1"]),
            State(state.clone()),
            Json(CreateCommentRequest {
                post_id: post.id.to_string(),
                comment: "Nice llamas".into(),
            }),
        )
        .await
        .unwrap();

        // Not the author.
        let err = delete_comment(
            ctx(WALLET_1, &["LLAMAS.test1"]),
            State(state.clone()),
            Path(comment.id.to_string()),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        let status = delete_comment(
            ctx(WALLET_2, &["LLAMAS.test1"]),
            State(state.clone()),
            Path(comment.id.to_string()),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let Json(comments) = list_comments(
            ctx(WALLET_1, &["LLAMAS.test1"]),
            State(state),
            Query(CommentsQuery {
                post_id: Some(post.id.to_string()),
            }),
        )
        .await
        .unwrap();
        assert!(comments.is_empty());
    }
}
