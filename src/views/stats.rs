use chrono::{DateTime, NaiveDate, Utc};

use crate::db::models::{
    ContactInquiry, GalleryImage, InquiryStatus, Order, OrderStatus, Reservation,
    ReservationStatus, GALLERY_CATEGORIES,
};

/// Current UTC date; "today" everywhere in the dashboard.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// UTC calendar date of an RFC 3339 timestamp.
fn utc_date(timestamp: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(timestamp)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).date_naive())
}

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderStats {
    pub today: usize,
    pub pending: usize,
    pub total: usize,
    pub revenue: f64,
}

impl OrderStats {
    pub fn revenue_display(&self) -> String {
        super::format::rupees_grouped(self.revenue)
    }
}

pub fn order_stats(orders: &[Order], today: NaiveDate) -> OrderStats {
    OrderStats {
        today: todays_orders(orders, today),
        pending: orders
            .iter()
            .filter(|o| o.status == OrderStatus::Pending)
            .count(),
        total: orders.len(),
        revenue: orders
            .iter()
            .filter(|o| o.status == OrderStatus::Delivered)
            .map(|o| o.total_amount)
            .sum(),
    }
}

/// Orders placed today that were not cancelled.
pub fn todays_orders(orders: &[Order], today: NaiveDate) -> usize {
    orders
        .iter()
        .filter(|o| utc_date(&o.created_at) == Some(today))
        .filter(|o| o.status != OrderStatus::Cancelled)
        .count()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservationStats {
    pub today: usize,
    pub upcoming: usize,
    pub total: usize,
}

pub fn reservation_stats(reservations: &[Reservation], today: NaiveDate) -> ReservationStats {
    let today = iso(today);
    let active = || {
        reservations
            .iter()
            .filter(|r| r.status != ReservationStatus::Cancelled)
    };
    ReservationStats {
        today: active().filter(|r| r.date == today).count(),
        upcoming: active().filter(|r| r.date.as_str() > today.as_str()).count(),
        total: reservations.len(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InquiryStats {
    pub unread: usize,
    pub total: usize,
    pub replied_today: usize,
}

pub fn unread_count(inquiries: &[ContactInquiry]) -> usize {
    inquiries
        .iter()
        .filter(|i| i.status == InquiryStatus::Unread)
        .count()
}

pub fn inquiry_stats(inquiries: &[ContactInquiry], today: NaiveDate) -> InquiryStats {
    InquiryStats {
        unread: unread_count(inquiries),
        total: inquiries.len(),
        replied_today: inquiries
            .iter()
            .filter(|i| i.status == InquiryStatus::Replied)
            .filter(|i| utc_date(&i.created_at) == Some(today))
            .count(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

pub fn gallery_counts(images: &[GalleryImage]) -> Vec<CategoryCount> {
    GALLERY_CATEGORIES
        .iter()
        .map(|category| CategoryCount {
            category: category.to_string(),
            count: images.iter().filter(|i| i.category == *category).count(),
        })
        .collect()
}

/// Headline numbers for the overview tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverviewStats {
    pub total_reservations: usize,
    pub menu_items: usize,
    pub new_messages: usize,
    pub orders_today: usize,
}

pub fn overview(
    reservations: &[Reservation],
    menu_items: usize,
    inquiries: &[ContactInquiry],
    orders: &[Order],
    today: NaiveDate,
) -> OverviewStats {
    OverviewStats {
        total_reservations: reservations.len(),
        menu_items,
        new_messages: unread_count(inquiries),
        orders_today: todays_orders(orders, today),
    }
}
