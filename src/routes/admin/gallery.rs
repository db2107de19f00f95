use axum::extract::{Multipart, Path, State};
use axum::response::Redirect;

use super::menu::UploadedFile;
use super::{back_to_tab, Tab};
use crate::backend::Collection;
use crate::db::models::{NewGalleryImage, GALLERY_CATEGORIES};
use crate::error::AppResult;
use crate::extractors::CurrentAdmin;
use crate::state::AppState;
use crate::views::toast::{delete_notice_code, gallery_notice_query, notice_query};

pub const IMAGE_PREFIX: &str = "gallery";
pub const DEFAULT_CATEGORY: &str = "food";

/// Unknown or missing categories file under the default.
pub fn gallery_category(value: &str) -> &'static str {
    GALLERY_CATEGORIES
        .iter()
        .copied()
        .find(|c| *c == value.trim())
        .unwrap_or(DEFAULT_CATEGORY)
}

/// POST /admin/gallery: store every attached image under one category
pub async fn upload(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    mut multipart: Multipart,
) -> AppResult<Redirect> {
    let mut category = DEFAULT_CATEGORY;
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "images" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                if !filename.is_empty() && !bytes.is_empty() {
                    files.push(UploadedFile {
                        filename,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            "category" => category = gallery_category(&field.text().await?),
            _ => {}
        }
    }

    if files.is_empty() {
        return Ok(back_to_tab(Tab::Gallery, &notice_query("gallery-empty")));
    }

    let (mut ok, mut failed) = (0, 0);
    for file in &files {
        match store(&state, file, category).await {
            Ok(()) => ok += 1,
            Err(e) => {
                tracing::error!("Failed to upload {}: {}", file.filename, e);
                failed += 1;
            }
        }
    }
    tracing::info!("Gallery upload: {} stored, {} failed", ok, failed);

    Ok(back_to_tab(Tab::Gallery, &gallery_notice_query(ok, failed)))
}

/// Store the binary, then its record. A record failure removes the orphaned binary.
async fn store(state: &AppState, file: &UploadedFile, category: &str) -> AppResult<()> {
    let url = state
        .blobs
        .put(IMAGE_PREFIX, &file.filename, &file.bytes)
        .await?;

    let image = NewGalleryImage {
        url: url.clone(),
        name: file.filename.clone(),
        category: category.to_string(),
    };
    if let Err(e) = state.repo.create_gallery_image(&image).await {
        if let Err(cleanup) = state.blobs.delete(&url).await {
            tracing::warn!("Failed to remove orphaned blob {}: {}", url, cleanup);
        }
        return Err(e.into());
    }
    Ok(())
}

/// POST /admin/gallery/{id}/delete: remove the binary, then the record
pub async fn delete(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Path(id): Path<String>,
) -> AppResult<Redirect> {
    let ok = match remove(&state, &id).await {
        Ok(removed) => removed,
        Err(e) => {
            tracing::error!("Failed to delete gallery image {}: {}", id, e);
            false
        }
    };
    Ok(back_to_tab(
        Tab::Gallery,
        &notice_query(&delete_notice_code(Collection::Gallery, ok)),
    ))
}

async fn remove(state: &AppState, id: &str) -> AppResult<bool> {
    let Some(image) = state.repo.gallery_image(id).await? else {
        return Ok(false);
    };
    state.blobs.delete(&image.url).await?;
    Ok(state.repo.delete(Collection::Gallery, id).await?)
}
