//! Frame route handlers: list/retrieve/rename, multipart upload, and
//! single or batch deletion.

use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use hf_core::FrameId;
use hf_db::models::Frame;

use crate::context::AppContext;
use crate::error::AppError;
use crate::frames::{self, Upload};

/// Multipart field carrying the uploaded files.
pub const PHOTOS_FIELD: &str = "photos";

/// Frame response.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct FrameResponse {
    pub id: FrameId,
    pub name: String,
    /// Public URL of the stored image, or `null` when there is none.
    pub photo: Option<String>,
}

impl FrameResponse {
    pub fn from_frame(frame: &Frame, base_url: &str) -> Self {
        Self {
            id: frame.id,
            name: frame.name.clone(),
            photo: frame.has_photo().then(|| media_url(base_url, &frame.photo)),
        }
    }
}

/// Join the media base URL and a storage-relative path.
pub fn media_url(base_url: &str, relative: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), relative)
}

/// Multipart form accepted by `POST /api/core/frames` (documentation only).
#[derive(utoipa::ToSchema)]
#[allow(dead_code)]
pub struct FrameUploadForm {
    /// Image file; repeat the field to upload several at once.
    #[schema(value_type = String, format = Binary)]
    photos: Vec<u8>,
}

/// Request body for renaming a frame.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateFrameRequest {
    pub name: String,
}

/// Request body for batch deletion.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct BatchDeleteRequest {
    #[serde(default)]
    pub ids: Vec<FrameId>,
}

/// Plain success message.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

fn to_responses(ctx: &AppContext, frames: &[Frame]) -> Vec<FrameResponse> {
    frames
        .iter()
        .map(|f| FrameResponse::from_frame(f, &ctx.config.media.base_url))
        .collect()
}

/// GET /api/core/frames
#[utoipa::path(
    get,
    path = "/api/core/frames",
    responses(
        (status = 200, description = "List all frames", body = Vec<FrameResponse>)
    )
)]
pub async fn list_frames(
    State(ctx): State<AppContext>,
) -> Result<Json<Vec<FrameResponse>>, AppError> {
    let frames = ctx.frames.list()?;
    Ok(Json(to_responses(&ctx, &frames)))
}

/// POST /api/core/frames
#[utoipa::path(
    post,
    path = "/api/core/frames",
    request_body(content = FrameUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "One frame created per uploaded file", body = Vec<FrameResponse>),
        (status = 400, description = "No photos provided, or a file is not an image")
    )
)]
pub async fn create_frames(
    State(ctx): State<AppContext>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<Vec<FrameResponse>>), AppError> {
    let mut uploads = Vec::new();

    // A request that is not multipart at all simply carries no photos.
    if let Ok(mut multipart) = multipart {
        while let Some(field) = multipart.next_field().await? {
            if field.name() != Some(PHOTOS_FIELD) {
                continue;
            }
            // An empty file input is sent as a part with an empty file name.
            let Some(file_name) = field
                .file_name()
                .filter(|name| !name.is_empty())
                .map(String::from)
            else {
                continue;
            };
            let data = field.bytes().await?;
            uploads.push(Upload { file_name, data });
        }
    }

    let created = frames::create_frames(&ctx, uploads).await?;
    Ok((StatusCode::CREATED, Json(to_responses(&ctx, &created))))
}

/// GET /api/core/frames/{id}
#[utoipa::path(
    get,
    path = "/api/core/frames/{id}",
    params(("id" = i64, Path, description = "Frame ID")),
    responses(
        (status = 200, description = "Frame details", body = FrameResponse),
        (status = 404, description = "Frame not found")
    )
)]
pub async fn get_frame(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<FrameResponse>, AppError> {
    let id = parse_frame_id(&id)?;
    let frame = ctx
        .frames
        .get(id)?
        .ok_or_else(|| hf_core::Error::not_found("frame", id))?;
    Ok(Json(FrameResponse::from_frame(&frame, &ctx.config.media.base_url)))
}

/// PUT/PATCH /api/core/frames/{id}
#[utoipa::path(
    patch,
    path = "/api/core/frames/{id}",
    params(("id" = i64, Path, description = "Frame ID")),
    request_body = UpdateFrameRequest,
    responses(
        (status = 200, description = "Frame renamed", body = FrameResponse),
        (status = 404, description = "Frame not found")
    )
)]
pub async fn update_frame(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateFrameRequest>, JsonRejection>,
) -> Result<Json<FrameResponse>, AppError> {
    let id = parse_frame_id(&id)?;
    let Json(payload) = payload?;
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(hf_core::Error::Validation("name is required".into()).into());
    }

    if !ctx.frames.rename(id, name)? {
        return Err(hf_core::Error::not_found("frame", id).into());
    }
    let frame = ctx
        .frames
        .get(id)?
        .ok_or_else(|| hf_core::Error::not_found("frame", id))?;
    Ok(Json(FrameResponse::from_frame(&frame, &ctx.config.media.base_url)))
}

/// DELETE /api/core/frames/{id}
#[utoipa::path(
    delete,
    path = "/api/core/frames/{id}",
    params(("id" = i64, Path, description = "Frame ID")),
    responses(
        (status = 204, description = "Frame and stored file deleted"),
        (status = 404, description = "Frame not found")
    )
)]
pub async fn delete_frame(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_frame_id(&id)?;
    frames::destroy_frame(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/core/frames/batch-delete
#[utoipa::path(
    post,
    path = "/api/core/frames/batch-delete",
    request_body = BatchDeleteRequest,
    responses(
        (status = 200, description = "Frames deleted", body = MessageResponse),
        (status = 400, description = "No frame IDs provided, or the body is not valid JSON")
    )
)]
pub async fn batch_delete(
    State(ctx): State<AppContext>,
    payload: Result<Json<BatchDeleteRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Json(payload) = payload?;
    let deleted = frames::batch_delete(&ctx, &payload.ids).await?;
    Ok(Json(MessageResponse {
        message: format!("Successfully deleted {deleted} frames"),
    }))
}

fn parse_frame_id(raw: &str) -> Result<FrameId, hf_core::Error> {
    raw.parse()
        .map_err(|_| hf_core::Error::not_found("frame", raw))
}
