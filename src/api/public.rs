// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Public, unauthenticated feed.

use axum::{extract::State, Json};

use crate::{error::ApiError, models::Post, state::AppState};

/// All public posts.
// TODO: paginate the feed once clients send cursor params.
#[utoipa::path(
    get,
    path = "/api/public",
    tag = "Public",
    responses((status = 200, description = "Public posts", body = [Post]))
)]
pub async fn public_posts(State(state): State<AppState>) -> Result<Json<Vec<Post>>, ApiError> {
    let posts = state.db.public_posts()?;
    Ok(Json(posts))
}
