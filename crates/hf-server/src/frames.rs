//! Frame lifecycle: multi-file upload, and deletion that removes the stored
//! file before the record.
//!
//! Deletion runs in two steps that are not atomic. Step one removes the file
//! (a missing file is fine), step two deletes the row. A crash between them
//! leaves a record whose file is gone; such a record still deletes cleanly
//! later.

use axum::body::Bytes;
use hf_core::{Error, FrameId, Result};
use hf_db::models::Frame;

use crate::context::AppContext;
use crate::storage::{base_name, split_extension};

pub const NO_PHOTOS: &str = "No photos provided";
pub const NO_FRAME_IDS: &str = "No frame IDs provided";
pub const INVALID_IMAGE: &str =
    "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";

/// One file received in the `photos` field of an upload.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub data: Bytes,
}

/// Display name for an uploaded file: its base name without the extension.
pub fn frame_name(file_name: &str) -> String {
    split_extension(base_name(file_name)).0.to_string()
}

/// Store each upload and create one frame per file, in request order.
///
/// Every upload is checked for an image signature before anything is
/// written, so a bad file rejects the whole request. Files are then stored
/// and inserted one by one; if an insert fails, the file written for it is
/// removed and the error returned, while frames created earlier in the same
/// request are kept.
pub async fn create_frames(ctx: &AppContext, uploads: Vec<Upload>) -> Result<Vec<Frame>> {
    if uploads.is_empty() {
        return Err(Error::BadRequest(NO_PHOTOS.into()));
    }

    for upload in &uploads {
        if image::guess_format(&upload.data).is_err() {
            tracing::debug!(file = %upload.file_name, "Rejected upload without image signature");
            return Err(Error::BadRequest(INVALID_IMAGE.into()));
        }
    }

    let mut created = Vec::with_capacity(uploads.len());
    for upload in uploads {
        let name = frame_name(&upload.file_name);
        let photo = ctx.storage.save(&upload.file_name, &upload.data).await?;

        match ctx.frames.create(&name, &photo) {
            Ok(frame) => created.push(frame),
            Err(e) => {
                if let Err(cleanup) = ctx.storage.remove(&photo).await {
                    tracing::warn!("Failed to remove {photo} after insert error: {cleanup}");
                }
                return Err(e);
            }
        }
    }

    tracing::info!(count = created.len(), "Created frames");
    Ok(created)
}

/// Remove a frame's stored file (if any is present), then its record.
///
/// Returns whether the record was still there to delete.
pub async fn delete_frame(ctx: &AppContext, frame: &Frame) -> Result<bool> {
    if frame.has_photo() {
        let removed = ctx.storage.remove(&frame.photo).await?;
        if !removed {
            tracing::debug!(frame_id = %frame.id, photo = %frame.photo, "Stored file already absent");
        }
    }
    ctx.frames.delete(frame.id)
}

/// Delete a single frame by id; unknown ids are a not-found error.
pub async fn destroy_frame(ctx: &AppContext, id: FrameId) -> Result<()> {
    let frame = ctx
        .frames
        .get(id)?
        .ok_or_else(|| Error::not_found("frame", id))?;

    if !delete_frame(ctx, &frame).await? {
        return Err(Error::not_found("frame", id));
    }

    tracing::info!(frame_id = %id, "Deleted frame");
    Ok(())
}

/// Delete every existing frame among `ids` and return how many were deleted.
///
/// Unknown ids are ignored. Deletion stops at the first error; frames
/// already processed stay deleted.
pub async fn batch_delete(ctx: &AppContext, ids: &[FrameId]) -> Result<usize> {
    if ids.is_empty() {
        return Err(Error::BadRequest(NO_FRAME_IDS.into()));
    }

    let frames = ctx.frames.list_by_ids(ids)?;
    let mut deleted = 0;
    for frame in &frames {
        if delete_frame(ctx, frame).await? {
            deleted += 1;
        }
    }

    tracing::info!(requested = ids.len(), deleted, "Batch deleted frames");
    Ok(deleted)
}
