use std::collections::HashMap;

use axum::extract::{Multipart, Path, State};
use axum::response::Redirect;

use super::{back_to_tab, Tab};
use crate::backend::Collection;
use crate::db::models::MenuDraft;
use crate::error::AppResult;
use crate::extractors::CurrentAdmin;
use crate::state::AppState;
use crate::views::toast::{delete_notice_code, notice_query};

pub const IMAGE_PREFIX: &str = "menu";

/// An uploaded file held in memory until the form has been fully read.
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Text fields and the optional image of a menu item form.
#[derive(Default)]
pub struct MenuForm {
    fields: HashMap<String, String>,
    image: Option<UploadedFile>,
}

impl MenuForm {
    pub async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = MenuForm::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            if name == "image" {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                // An untouched file input still sends an empty part.
                if !filename.is_empty() && !bytes.is_empty() {
                    form.image = Some(UploadedFile {
                        filename,
                        bytes: bytes.to_vec(),
                    });
                }
            } else {
                let value = field.text().await?;
                form.fields.insert(name, value);
            }
        }
        Ok(form)
    }

    fn text(&self, name: &str) -> &str {
        self.fields.get(name).map(|v| v.trim()).unwrap_or("")
    }

    /// Unchecked checkboxes are absent from the submission.
    fn checked(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// The item to store with `image` as its picture URL, or None when a
    /// required field is missing.
    pub fn draft(&self, image: String) -> Option<MenuDraft> {
        let name = self.text("name");
        let category = self.text("category");
        let price = self.text("price").parse::<f64>().ok()?;
        if name.is_empty() || category.is_empty() || !price.is_finite() || price < 0.0 {
            return None;
        }
        Some(MenuDraft {
            name: name.to_string(),
            description: self.text("description").to_string(),
            price,
            category: category.to_string(),
            image,
            is_veg: self.checked("is_veg"),
            is_available: self.checked("is_available"),
        })
    }
}

async fn store_image(state: &AppState, image: &UploadedFile) -> AppResult<String> {
    let url = state
        .blobs
        .put(IMAGE_PREFIX, &image.filename, &image.bytes)
        .await?;
    Ok(url)
}

fn back(code: &str) -> Redirect {
    back_to_tab(Tab::Menu, &notice_query(code))
}

/// POST /admin/menu: add an item, uploading its image first
pub async fn create(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    multipart: Multipart,
) -> AppResult<Redirect> {
    let form = MenuForm::read(multipart).await?;
    if form.draft(String::new()).is_none() {
        return Ok(back("missing-fields"));
    }

    let image = match &form.image {
        Some(file) => match store_image(&state, file).await {
            Ok(url) => url,
            Err(e) => {
                tracing::error!("Failed to store menu image: {}", e);
                return Ok(back("menu-failed"));
            }
        },
        None => String::new(),
    };

    let Some(draft) = form.draft(image) else {
        return Ok(back("missing-fields"));
    };
    match state.repo.create_menu_item(&draft).await {
        Ok(item) => {
            tracing::info!("Added menu item {} ({})", item.name, item.id);
            Ok(back("menu-added"))
        }
        Err(e) => {
            tracing::error!("Failed to add menu item: {}", e);
            Ok(back("menu-failed"))
        }
    }
}

/// POST /admin/menu/{id}: overwrite every field; the image is kept unless a new one is sent
pub async fn update(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<Redirect> {
    let form = MenuForm::read(multipart).await?;

    let existing = match state.repo.menu_item(&id).await {
        Ok(Some(item)) => item,
        Ok(None) => {
            tracing::warn!("Update for missing menu item {}", id);
            return Ok(back("menu-failed"));
        }
        Err(e) => {
            tracing::error!("Failed to load menu item {}: {}", id, e);
            return Ok(back("menu-failed"));
        }
    };
    if form.draft(existing.image.clone()).is_none() {
        return Ok(back("missing-fields"));
    }

    let image = match &form.image {
        Some(file) => match store_image(&state, file).await {
            Ok(url) => url,
            Err(e) => {
                tracing::error!("Failed to store menu image: {}", e);
                return Ok(back("menu-failed"));
            }
        },
        None => existing.image,
    };

    let Some(draft) = form.draft(image) else {
        return Ok(back("missing-fields"));
    };
    match state.repo.replace_menu_item(&id, &draft).await {
        Ok(true) => Ok(back("menu-updated")),
        Ok(false) => Ok(back("menu-failed")),
        Err(e) => {
            tracing::error!("Failed to update menu item {}: {}", id, e);
            Ok(back("menu-failed"))
        }
    }
}

/// POST /admin/menu/{id}/delete
pub async fn delete(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Path(id): Path<String>,
) -> AppResult<Redirect> {
    let ok = match state.repo.delete(Collection::Menu, &id).await {
        Ok(deleted) => deleted,
        Err(e) => {
            tracing::error!("Failed to delete menu item {}: {}", id, e);
            false
        }
    };
    Ok(back(&delete_notice_code(Collection::Menu, ok)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> MenuForm {
        MenuForm {
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            image: None,
        }
    }

    #[test]
    fn draft_reads_fields_and_checkboxes() {
        let form = form(&[
            ("name", " Masala Dosa "),
            ("description", "Crisp rice crepe"),
            ("price", "149"),
            ("category", "Mains"),
            ("is_veg", "on"),
        ]);
        let draft = form.draft("/uploads/menu/1_dosa.jpg".into()).unwrap();
        assert_eq!(draft.name, "Masala Dosa");
        assert_eq!(draft.price, 149.0);
        assert!(draft.is_veg);
        assert!(!draft.is_available);
        assert_eq!(draft.image, "/uploads/menu/1_dosa.jpg");
    }

    #[test]
    fn draft_requires_name_price_and_category() {
        assert!(form(&[("price", "10"), ("category", "Mains")])
            .draft(String::new())
            .is_none());
        assert!(form(&[("name", "Lassi"), ("price", "abc"), ("category", "Beverages")])
            .draft(String::new())
            .is_none());
        assert!(form(&[("name", "Lassi"), ("price", "60"), ("category", "  ")])
            .draft(String::new())
            .is_none());
        assert!(form(&[("name", "Lassi"), ("price", "60"), ("category", "Beverages")])
            .draft(String::new())
            .is_some());
    }
}
