// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Media upload and retrieval.
//!
//! Uploaded bytes are handed to the object store under `images/{id}`; only
//! the metadata record lives in the database. Uploads are capped at 15 MiB
//! and restricted to common image extensions.

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::{auth::Auth, error::ApiError, models::MediaRecord, state::AppState};

use super::parse_uuid;

/// Upload size cap (15 MiB).
const MAX_IMAGE_BYTES: usize = 15 * 1024 * 1024;

/// Accepted image file extensions (lowercased).
const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Map a file extension to the content type stored with the blob.
fn content_type_for(extension: &str) -> &'static str {
    match extension {
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "image/png",
    }
}

/// Upload an image as a multipart `file` field.
#[utoipa::path(
    post,
    path = "/api/media",
    tag = "Media",
    responses(
        (status = 201, description = "Media stored", body = MediaRecord),
        (status = 400, description = "Missing file, disallowed type, or too large"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn upload_media(
    Auth(ctx): Auth,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<MediaRecord>), ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let extension = file_name
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_lowercase();
        if file_name.is_empty() || !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(ApiError::bad_request(
                "Only jpg|jpeg|png|gif|webp file types are allowed",
            ));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {e}")))?;
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(ApiError::bad_request("No images larger than 15MB, please"));
        }

        let record = MediaRecord {
            id: Uuid::new_v4(),
            wallet_id: ctx.address.clone(),
            usage: "post".into(),
            content_type: content_type_for(&extension).into(),
            size_bytes: bytes.len() as u64,
            is_public: true,
            is_deleted: false,
            created_at: chrono::Utc::now(),
        };

        state.db.create_media(&record)?;
        state
            .objects
            .put(
                format!("images/{}", record.id),
                record.content_type.clone(),
                bytes.to_vec(),
            )
            .await;

        tracing::info!(address = %ctx.address, media = %record.id, size = record.size_bytes, "stored media");
        return Ok((StatusCode::CREATED, Json(record)));
    }

    Err(ApiError::bad_request("Missing file field"))
}

/// List stored media object keys.
#[utoipa::path(
    get,
    path = "/api/media",
    tag = "Media",
    responses(
        (status = 200, description = "Stored object keys", body = [String]),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_media(
    Auth(_ctx): Auth,
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.objects.list_keys().await))
}

/// Fetch a stored image by id.
#[utoipa::path(
    get,
    path = "/api/media/{media_id}",
    tag = "Media",
    params(("media_id" = String, Path, description = "Media identifier")),
    responses(
        (status = 200, description = "Image bytes"),
        (status = 400, description = "Media ID malformed"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Media not found")
    )
)]
pub async fn get_media(
    Auth(_ctx): Auth,
    State(state): State<AppState>,
    Path(media_id): Path<String>,
) -> Result<Response, ApiError> {
    let media_id = parse_uuid(&media_id, "Media ID malformed")?;

    let record = state
        .db
        .media(&media_id)?
        .ok_or_else(|| ApiError::not_found("Media not found"))?;

    let object = state
        .objects
        .get(&format!("images/{media_id}"))
        .await
        .ok_or_else(|| ApiError::not_found("Media not found"))?;

    Ok(([(header::CONTENT_TYPE, record.content_type)], object.bytes).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AssetResolver, AuthContext, TokenService};
    use crate::models::WalletAddress;
    use crate::storage::ContentDatabase;
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::Request;
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

    /// Build a Multipart extractor from a hand-crafted body.
    async fn multipart_with_file(file_name: &str, bytes: &[u8]) -> Multipart {
        let boundary = "test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        let request = Request::builder()
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        Multipart::from_request(request, &()).await.unwrap()
    }

    #[tokio::test]
    async fn upload_and_fetch_round_trip() {
        let (state, _dir) = test_state();
        let multipart = multipart_with_file("llama.png", b"fake image bytes").await;

        let (status, Json(record)) = upload_media(ctx(), State(state.clone()), multipart)
            .await
            .expect("upload succeeds");
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(record.content_type, "image/png");
        assert_eq!(record.size_bytes, 16);

        let keys = state.objects.list_keys().await;
        assert_eq!(keys, vec![format!("images/{}", record.id)]);

        let response = get_media(ctx(), State(state), Path(record.id.to_string()))
            .await
            .expect("fetch succeeds");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/png"
        );
    }

    #[tokio::test]
    async fn upload_rejects_disallowed_extension() {
        let (state, _dir) = test_state();
        let multipart = multipart_with_file("malware.exe", b"nope").await;

        let err = upload_media(ctx(), State(state), multipart)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn upload_rejects_oversized_file() {
        use axum::extract::DefaultBodyLimit;
        use axum::routing::post;
        use axum::Router;
        use tower::ServiceExt;

        let (state, _dir) = test_state();
        let token = state
            .sessions
            .issue(&WalletAddress::from(WALLET), &[])
            .unwrap();

        // Same body limit the production router carries.
        let app = Router::new()
            .route("/api/media", post(upload_media))
            .layer(DefaultBodyLimit::max(16 * 1024 * 1024))
            .with_state(state);

        let boundary = "test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            b"Content-Disposition: form-data; name=\"file\"; filename=\"big.png\"\r\n\r\n",
        );
        body.extend_from_slice(&vec![0u8; MAX_IMAGE_BYTES + 1]);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        let request = Request::builder()
            .method("POST")
            .uri("/api/media")
            .header("Authorization", token)
            .header("Address", WALLET)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["error"], "No images larger than 15MB, please");
    }

    #[tokio::test]
    async fn missing_media_is_not_found() {
        let (state, _dir) = test_state();

        let err = get_media(ctx(), State(state.clone()), Path("123".into()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let err = get_media(ctx(), State(state), Path(Uuid::new_v4().to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
