use axum::extract::{Path, State};
use axum::response::Redirect;
use axum::Form;
use serde::Deserialize;

use super::{back_to_tab, Tab};
use crate::backend::Collection;
use crate::db::models::{InquiryStatus, OrderStatus, ReservationStatus, Status};
use crate::error::{AppError, AppResult};
use crate::extractors::CurrentAdmin;
use crate::state::AppState;
use crate::views::toast::{
    delete_notice_code, notice_query, status_failed_code, status_notice_query,
};

#[derive(Deserialize)]
pub struct StatusForm {
    #[serde(default)]
    pub status: String,
}

/// Collections whose records are managed through status and delete posts.
fn workflow_collection(path: &str) -> AppResult<Collection> {
    Collection::from_path(path)
        .filter(Collection::has_status)
        .ok_or(AppError::NotFound)
}

/// Whether `value` is a defined status of the collection's records.
pub fn is_defined_status(collection: Collection, value: &str) -> bool {
    match collection {
        Collection::Reservations => ReservationStatus::parse(value).is_some(),
        Collection::Orders => OrderStatus::parse(value).is_some(),
        Collection::Inquiries => InquiryStatus::parse(value).is_some(),
        Collection::Menu | Collection::Gallery => false,
    }
}

fn status_failed(collection: Collection) -> Redirect {
    back_to_tab(
        Tab::for_collection(collection),
        &notice_query(&status_failed_code(collection)),
    )
}

/// POST /admin/{collection}/{id}/status
pub async fn set_status(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Path((collection, id)): Path<(String, String)>,
    Form(form): Form<StatusForm>,
) -> AppResult<Redirect> {
    let collection = workflow_collection(&collection)?;
    let tab = Tab::for_collection(collection);

    if !is_defined_status(collection, &form.status) {
        tracing::warn!("Rejected status {:?} for {}/{}", form.status, collection, id);
        return Ok(status_failed(collection));
    }

    match state.repo.update_status(collection, &id, &form.status).await {
        Ok(true) => Ok(back_to_tab(tab, &status_notice_query(collection, &form.status))),
        Ok(false) => {
            tracing::warn!("Status update for missing record {}/{}", collection, id);
            Ok(status_failed(collection))
        }
        Err(e) => {
            tracing::error!("Failed to update {}/{}: {}", collection, id, e);
            Ok(status_failed(collection))
        }
    }
}

/// POST /admin/{collection}/{id}/delete
pub async fn delete(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Path((collection, id)): Path<(String, String)>,
) -> AppResult<Redirect> {
    let collection = workflow_collection(&collection)?;
    let tab = Tab::for_collection(collection);

    let ok = match state.repo.delete(collection, &id).await {
        Ok(deleted) => deleted,
        Err(e) => {
            tracing::error!("Failed to delete {}/{}: {}", collection, id, e);
            false
        }
    };
    Ok(back_to_tab(
        tab,
        &notice_query(&delete_notice_code(collection, ok)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_workflow_collections_accept_status_posts() {
        assert!(workflow_collection("orders").is_ok());
        assert!(workflow_collection("inquiries").is_ok());
        assert!(matches!(workflow_collection("menu"), Err(AppError::NotFound)));
        assert!(matches!(workflow_collection("users"), Err(AppError::NotFound)));
    }

    #[test]
    fn status_values_are_checked_per_collection() {
        assert!(is_defined_status(Collection::Orders, "preparing"));
        assert!(!is_defined_status(Collection::Reservations, "preparing"));
        assert!(is_defined_status(Collection::Inquiries, "replied"));
        assert!(!is_defined_status(Collection::Inquiries, ""));
    }
}
