// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Post endpoints.
//!
//! Posts live inside a content collection; every operation checks the
//! collection's gating asset against the caller's token snapshot before
//! touching the post, then scopes mutations to the post's owner.

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
    models::{CreatePostRequest, Post, PostWithComments, UpdatePostRequest},
    state::AppState,
};

use super::{guarded_content, parse_uuid};

#[derive(Debug, Deserialize, IntoParams)]
pub struct PostsQuery {
    /// The collection to list posts from.
    pub content_id: Option<String>,
}

/// List the posts inside a collection.
#[utoipa::path(
    get,
    path = "/api/posts",
    tag = "Posts",
    params(PostsQuery),
    responses(
        (status = 200, description = "Posts in the collection", body = [Post]),
        (status = 400, description = "Missing or malformed content_id"),
        (status = 401, description = "Token not available in wallet"),
        (status = 404, description = "Content not found")
    )
)]
pub async fn list_posts(
    Auth(ctx): Auth,
    State(state): State<AppState>,
    Query(query): Query<PostsQuery>,
) -> Result<Json<Vec<Post>>, ApiError> {
    let content_id = query
        .content_id
        .as_deref()
        .ok_or_else(|| ApiError::bad_request("Missing content_id"))?;
    let content_id = parse_uuid(content_id, "Content ID malformed")?;

    guarded_content(&state, &ctx, &content_id)?;

    let posts = state.db.posts_by_content(&content_id)?;
    Ok(Json(posts))
}

/// Fetch a single post together with its comments.
#[utoipa::path(
    get,
    path = "/api/posts/{post_id}",
    tag = "Posts",
    params(("post_id" = String, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "The post and its comments", body = PostWithComments),
        (status = 400, description = "Post ID malformed"),
        (status = 401, description = "Token not available in wallet"),
        (status = 404, description = "Post not found")
    )
)]
pub async fn get_post(
    Auth(ctx): Auth,
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Json<PostWithComments>, ApiError> {
    let post_id = parse_uuid(&post_id, "Post ID malformed")?;

    let post = state
        .db
        .post(&post_id)?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    guarded_content(&state, &ctx, &post.content_id)?;

    let comments = state.db.comments_by_post(&post_id)?;
    Ok(Json(PostWithComments { post, comments }))
}

/// Create a post inside a collection.
#[utoipa::path(
    post,
    path = "/api/posts",
    tag = "Posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = Post),
        (status = 400, description = "Missing or malformed fields"),
        (status = 401, description = "Token not available in wallet"),
        (status = 404, description = "Content not found")
    )
)]
pub async fn create_post(
    Auth(ctx): Auth,
    State(state): State<AppState>,
    Json(request): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    if request.content_id.is_empty() {
        return Err(ApiError::bad_request("Missing contentId or malformed"));
    }
    let content_id = parse_uuid(&request.content_id, "Missing contentId or malformed")?;

    if request.text.is_empty() {
        return Err(ApiError::bad_request("Missing content"));
    }
    if request.title.is_empty() {
        return Err(ApiError::bad_request("Missing title"));
    }

    guarded_content(&state, &ctx, &content_id)?;

    let post = Post {
        id: Uuid::new_v4(),
        content_id,
        wallet_id: ctx.address.clone(),
        title: request.title,
        text: request.text,
        is_public: request.is_public,
        is_deleted: false,
        created_at: chrono::Utc::now(),
    };

    state.db.create_post(&post)?;

    tracing::info!(address = %ctx.address, post = %post.id, "created post");
    Ok((StatusCode::CREATED, Json(post)))
}

/// Update a post's title and text.
#[utoipa::path(
    put,
    path = "/api/posts/{post_id}",
    tag = "Posts",
    params(("post_id" = String, Path, description = "Post identifier")),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Updated post", body = Post),
        (status = 400, description = "Missing or malformed fields"),
        (status = 401, description = "Token not available in wallet"),
        (status = 404, description = "Post not found")
    )
)]
pub async fn update_post(
    Auth(ctx): Auth,
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Json(request): Json<UpdatePostRequest>,
) -> Result<Json<Post>, ApiError> {
    let post_id = parse_uuid(&post_id, "Post ID malformed")?;

    if request.title.is_empty() {
        return Err(ApiError::bad_request("Missing title"));
    }
    if request.text.is_empty() {
        return Err(ApiError::bad_request("Missing content"));
    }

    let post = state
        .db
        .post(&post_id)?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;
    guarded_content(&state, &ctx, &post.content_id)?;

    let updated = state
        .db
        .update_post(&post_id, &ctx.address, &request.title, &request.text)?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    tracing::info!(address = %ctx.address, post = %post_id, "updated post");
    Ok(Json(updated))
}

/// Soft-delete a post.
#[utoipa::path(
    delete,
    path = "/api/posts/{post_id}",
    tag = "Posts",
    params(("post_id" = String, Path, description = "Post identifier")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 400, description = "Post ID malformed"),
        (status = 401, description = "Token not available in wallet"),
        (status = 404, description = "Post not found")
    )
)]
pub async fn delete_post(
    Auth(ctx): Auth,
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let post_id = parse_uuid(&post_id, "Post ID malformed")?;

    let post = state
        .db
        .post(&post_id)?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;
    guarded_content(&state, &ctx, &post.content_id)?;

    if !state.db.soft_delete_post(&post_id, &ctx.address)? {
        return Err(ApiError::not_found("Post not found"));
    }

    tracing::info!(address = %ctx.address, post = %post_id, "deleted post");
    Ok(StatusCode::NO_CONTENT)
}
