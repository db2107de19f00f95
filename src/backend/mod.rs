//! Persistence backend: record collections, change feed and object storage.
//!
//! Every route talks to storage through [`RestaurantRepository`]. Writes are
//! single round trips with no transactions across records; the last writer
//! wins.

pub mod blobs;
pub mod live;
pub mod sqlite;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tokio::sync::broadcast;

use crate::db::models::{
    ContactInquiry, GalleryImage, MenuDraft, MenuItem, NewGalleryImage, NewInquiry, NewOrder,
    NewReservation, Order, Reservation,
};

pub use blobs::BlobStore;
pub use live::LiveFeed;
pub use sqlite::SqliteRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("SQL error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Collection {0} has no status field")]
    NoStatusField(Collection),
}

/// Named top-level grouping of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Menu,
    Reservations,
    Orders,
    Inquiries,
    Gallery,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Menu,
        Collection::Reservations,
        Collection::Orders,
        Collection::Inquiries,
        Collection::Gallery,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Collection::Menu => "menu",
            Collection::Reservations => "reservations",
            Collection::Orders => "orders",
            Collection::Inquiries => "inquiries",
            Collection::Gallery => "gallery",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.path() == path)
    }

    /// Whether records in this collection carry a workflow status.
    pub fn has_status(&self) -> bool {
        matches!(
            self,
            Collection::Reservations | Collection::Orders | Collection::Inquiries
        )
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Backend-generated record key.
pub fn new_key() -> String {
    uuid::Uuid::now_v7().to_string()
}

/// Current time as an RFC 3339 UTC string with millisecond precision.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[async_trait]
pub trait RestaurantRepository: Send + Sync {
    async fn menu_snapshot(&self) -> Result<Vec<MenuItem>, RepositoryError>;
    async fn menu_item(&self, id: &str) -> Result<Option<MenuItem>, RepositoryError>;
    async fn create_menu_item(&self, draft: &MenuDraft) -> Result<MenuItem, RepositoryError>;
    /// Overwrite every field of an existing item. Returns false when the key is unknown.
    async fn replace_menu_item(&self, id: &str, draft: &MenuDraft)
        -> Result<bool, RepositoryError>;

    async fn reservations_snapshot(&self) -> Result<Vec<Reservation>, RepositoryError>;
    async fn create_reservation(
        &self,
        reservation: &NewReservation,
    ) -> Result<Reservation, RepositoryError>;

    async fn orders_snapshot(&self) -> Result<Vec<Order>, RepositoryError>;
    async fn create_order(&self, order: &NewOrder) -> Result<Order, RepositoryError>;

    async fn inquiries_snapshot(&self) -> Result<Vec<ContactInquiry>, RepositoryError>;
    async fn create_inquiry(&self, inquiry: &NewInquiry)
        -> Result<ContactInquiry, RepositoryError>;

    async fn gallery_snapshot(&self) -> Result<Vec<GalleryImage>, RepositoryError>;
    async fn gallery_image(&self, id: &str) -> Result<Option<GalleryImage>, RepositoryError>;
    async fn create_gallery_image(
        &self,
        image: &NewGalleryImage,
    ) -> Result<GalleryImage, RepositoryError>;

    /// Single-field status write. Any value may replace any other.
    async fn update_status(
        &self,
        collection: Collection,
        id: &str,
        status: &str,
    ) -> Result<bool, RepositoryError>;

    /// Hard delete. Returns false when nothing was stored under the key.
    async fn delete(&self, collection: Collection, id: &str) -> Result<bool, RepositoryError>;

    async fn count(&self, collection: Collection) -> Result<i64, RepositoryError>;

    /// Receive the collection touched by every successful write.
    fn subscribe(&self) -> broadcast::Receiver<Collection>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_paths_round_trip() {
        for collection in Collection::ALL {
            assert_eq!(Collection::from_path(collection.path()), Some(collection));
        }
        assert_eq!(Collection::from_path("users"), None);
    }

    #[test]
    fn only_workflow_collections_have_status() {
        assert!(Collection::Orders.has_status());
        assert!(Collection::Inquiries.has_status());
        assert!(!Collection::Menu.has_status());
        assert!(!Collection::Gallery.has_status());
    }

    #[test]
    fn timestamp_is_rfc3339_millis_utc() {
        let ts = now_timestamp();
        assert!(ts.ends_with('Z'));
        assert_eq!(ts.len(), "2026-10-19T08:30:00.000Z".len());
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }

    #[test]
    fn keys_are_unique_uuids() {
        let a = new_key();
        let b = new_key();
        assert_ne!(a, b);
        assert!(uuid::Uuid::parse_str(&a).is_ok());
    }
}
