use serde::Deserialize;

use crate::db::models::{
    ContactInquiry, GalleryImage, MenuItem, Order, Reservation, Status, MENU_CATEGORIES,
};

/// Category chip that selects the whole menu.
pub const ALL_CATEGORIES: &str = "All";

/// Items of one category in their original order; "All" keeps everything.
pub fn filter_by_category<'a>(items: &'a [MenuItem], category: &str) -> Vec<&'a MenuItem> {
    if category == ALL_CATEGORIES {
        return items.iter().collect();
    }
    items.iter().filter(|item| item.category == category).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryChip {
    pub name: String,
    pub count: usize,
    pub selected: bool,
}

/// "All" followed by the standard menu categories, with item counts.
pub fn category_chips(items: &[MenuItem], selected: &str) -> Vec<CategoryChip> {
    std::iter::once(ALL_CATEGORIES)
        .chain(MENU_CATEGORIES.iter().copied())
        .map(|name| CategoryChip {
            name: name.to_string(),
            count: filter_by_category(items, name).len(),
            selected: name == selected,
        })
        .collect()
}

pub fn filter_gallery<'a>(images: &'a [GalleryImage], category: &str) -> Vec<&'a GalleryImage> {
    if category.is_empty() || category == "all" {
        return images.iter().collect();
    }
    images.iter().filter(|img| img.category == category).collect()
}

/// Query-string filters shared by the admin list panels.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListFilter {
    pub q: Option<String>,
    pub status: Option<String>,
    pub date: Option<String>,
}

impl ListFilter {
    pub fn search(&self) -> &str {
        self.q.as_deref().map(str::trim).unwrap_or("")
    }

    /// Selected status, "all" when unset.
    pub fn status(&self) -> &str {
        self.status
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or("all")
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref().filter(|d| !d.is_empty())
    }

    /// Encode back into a query string for live panel subscriptions.
    pub fn to_query(&self) -> String {
        let mut parts = Vec::new();
        if !self.search().is_empty() {
            parts.push(format!("q={}", urlencoding::encode(self.search())));
        }
        if self.status() != "all" {
            parts.push(format!("status={}", urlencoding::encode(self.status())));
        }
        if let Some(date) = self.date() {
            parts.push(format!("date={}", urlencoding::encode(date)));
        }
        parts.join("&")
    }
}

/// A record that the admin panels can search and filter by status.
pub trait Searchable {
    type Status: Status;

    fn status(&self) -> Self::Status;

    /// Fields searched by the free-text box.
    fn search_fields(&self) -> Vec<&str>;

    /// Reservation date, for the date filter.
    fn date(&self) -> Option<&str> {
        None
    }
}

impl Searchable for Reservation {
    type Status = crate::db::models::ReservationStatus;

    fn status(&self) -> Self::Status {
        self.status
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.email.as_str(), self.phone.as_str()]
    }

    fn date(&self) -> Option<&str> {
        Some(self.date.as_str())
    }
}

impl Searchable for Order {
    type Status = crate::db::models::OrderStatus;

    fn status(&self) -> Self::Status {
        self.status
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.customer_name.as_str(),
            self.customer_phone.as_str(),
            self.id.as_str(),
        ]
    }
}

impl Searchable for ContactInquiry {
    type Status = crate::db::models::InquiryStatus;

    fn status(&self) -> Self::Status {
        self.status
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.email.as_str(), self.message.as_str()]
    }
}

/// Records matching the search text (case-insensitive substring over the
/// searchable fields) and the status filter, plus the date filter when the
/// record has a date. Order is preserved.
pub fn apply<'a, T: Searchable>(records: &'a [T], filter: &ListFilter) -> Vec<&'a T> {
    let needle = filter.search().to_lowercase();
    let status = filter.status();
    let date = filter.date();

    records
        .iter()
        .filter(|r| {
            needle.is_empty()
                || r
                    .search_fields()
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
        })
        .filter(|r| status == "all" || r.status().as_str() == status)
        .filter(|r| match (date, r.date()) {
            (Some(wanted), Some(actual)) => wanted == actual,
            _ => true,
        })
        .collect()
}
