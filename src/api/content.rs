// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Content collection endpoints.
//!
//! Every handler runs behind the authorization gate; reads and writes on a
//! collection additionally require the collection's gating asset to be in
//! the caller's token snapshot.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    auth::Auth,
    error::ApiError,
    models::{AssetId, Content, CreateContentRequest, UpdateContentRequest},
    state::AppState,
};

use super::{guarded_content, parse_uuid};

/// List every collection the caller's token grants access to.
#[utoipa::path(
    get,
    path = "/api/content",
    tag = "Content",
    responses(
        (status = 200, description = "Accessible collections", body = [Content]),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_content(
    Auth(ctx): Auth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Content>>, ApiError> {
    let content = state.db.content_by_assets(&ctx.assets)?;
    tracing::info!(address = %ctx.address, "listing accessible content");
    Ok(Json(content))
}

/// Fetch a single collection.
#[utoipa::path(
    get,
    path = "/api/content/{content_id}",
    tag = "Content",
    params(("content_id" = String, Path, description = "Collection identifier")),
    responses(
        (status = 200, description = "The collection", body = Content),
        (status = 400, description = "Content ID malformed"),
        (status = 401, description = "Token not available in wallet"),
        (status = 404, description = "Content not found")
    )
)]
pub async fn get_content(
    Auth(ctx): Auth,
    State(state): State<AppState>,
    Path(content_id): Path<String>,
) -> Result<Json<Content>, ApiError> {
    let content_id = parse_uuid(&content_id, "Content ID malformed")?;

    let content = guarded_content(&state, &ctx, &content_id)?;

    tracing::info!(address = %ctx.address, content = %content_id, "fetching content");
    Ok(Json(content))
}

/// Create a collection, claiming its gating asset.
///
/// The asset must be in the caller's token snapshot, and no other collection
/// may already claim it (first claim wins, enforced inside the store's write
/// transaction).
#[utoipa::path(
    post,
    path = "/api/content",
    tag = "Content",
    request_body = CreateContentRequest,
    responses(
        (status = 201, description = "Collection created", body = Content),
        (status = 401, description = "Token not available in wallet"),
        (status = 409, description = "Token must be unique")
    )
)]
pub async fn create_content(
    Auth(ctx): Auth,
    State(state): State<AppState>,
    Json(request): Json<CreateContentRequest>,
) -> Result<(StatusCode, Json<Content>), ApiError> {
    let asset = AssetId::from(request.asset);
    if asset.is_empty() || !ctx.holds(&asset) {
        return Err(ApiError::unauthorized("Token not available in wallet"));
    }

    let content = Content {
        id: uuid::Uuid::new_v4(),
        wallet_id: ctx.address.clone(),
        asset,
        title: request.title,
        description: request.description,
        is_public: request.is_public,
        created_at: chrono::Utc::now(),
    };

    state.db.create_content(&content)?;

    tracing::info!(address = %ctx.address, content = %content.id, "created content");
    Ok((StatusCode::CREATED, Json(content)))
}

/// Update a collection's title, description, and visibility.
#[utoipa::path(
    put,
    path = "/api/content/{content_id}",
    tag = "Content",
    params(("content_id" = String, Path, description = "Collection identifier")),
    request_body = UpdateContentRequest,
    responses(
        (status = 200, description = "Updated collection", body = Content),
        (status = 400, description = "Content ID malformed or missing title"),
        (status = 401, description = "Token not available in wallet"),
        (status = 404, description = "Content not found")
    )
)]
pub async fn update_content(
    Auth(ctx): Auth,
    State(state): State<AppState>,
    Path(content_id): Path<String>,
    Json(request): Json<UpdateContentRequest>,
) -> Result<Json<Content>, ApiError> {
    let content_id = parse_uuid(&content_id, "Content ID malformed")?;

    if request.title.is_empty() {
        return Err(ApiError::bad_request("Missing title"));
    }

    guarded_content(&state, &ctx, &content_id)?;

    let updated = state
        .db
        .update_content(&content_id, &ctx.address, &request)?
        .ok_or_else(|| ApiError::not_found("Content not found"))?;

    tracing::info!(address = %ctx.address, content = %content_id, "updated content");
    Ok(Json(updated))
}
