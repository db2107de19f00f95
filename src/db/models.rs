use serde::{Deserialize, Serialize};

use crate::views::format;

/// Workflow stage stored as a plain string column.
///
/// Writes accept any defined value regardless of the current one. Reads of a
/// string that is not a defined value fall back to `Default`.
pub trait Status: Copy + Default + PartialEq + Sized + 'static {
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;
    fn label(&self) -> &'static str;
    fn badge_class(&self) -> &'static str;

    fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.as_str() == value)
    }

    fn from_stored(value: &str) -> Self {
        Self::parse(value).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

impl Status for ReservationStatus {
    const ALL: &'static [Self] = &[Self::Pending, Self::Confirmed, Self::Cancelled];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Cancelled => "Cancelled",
        }
    }

    fn badge_class(&self) -> &'static str {
        match self {
            Self::Pending => "badge badge-secondary",
            Self::Confirmed => "badge badge-success",
            Self::Cancelled => "badge badge-destructive",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

impl Status for OrderStatus {
    const ALL: &'static [Self] = &[
        Self::Pending,
        Self::Confirmed,
        Self::Preparing,
        Self::Ready,
        Self::Delivered,
        Self::Cancelled,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Preparing => "Preparing",
            Self::Ready => "Ready",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }

    fn badge_class(&self) -> &'static str {
        match self {
            Self::Pending => "badge badge-secondary",
            Self::Cancelled => "badge badge-destructive",
            _ => "badge badge-default",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InquiryStatus {
    #[default]
    Unread,
    Read,
    Replied,
}

impl Status for InquiryStatus {
    const ALL: &'static [Self] = &[Self::Unread, Self::Read, Self::Replied];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Unread => "unread",
            Self::Read => "read",
            Self::Replied => "replied",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Unread => "Unread",
            Self::Read => "Read",
            Self::Replied => "Replied",
        }
    }

    fn badge_class(&self) -> &'static str {
        match self {
            Self::Unread => "badge badge-secondary",
            Self::Read => "badge badge-info",
            Self::Replied => "badge badge-success",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    #[default]
    Delivery,
    Pickup,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delivery => "delivery",
            Self::Pickup => "pickup",
        }
    }

    pub fn from_stored(value: &str) -> Self {
        match value {
            "pickup" => Self::Pickup,
            _ => Self::Delivery,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Delivery => "Delivery",
            Self::Pickup => "Pickup",
        }
    }
}

/// Quick status button shown next to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusAction {
    pub value: &'static str,
    pub label: &'static str,
    pub destructive: bool,
}

impl StatusAction {
    const fn to(value: &'static str, label: &'static str) -> Self {
        Self {
            value,
            label,
            destructive: false,
        }
    }
}

impl ReservationStatus {
    pub fn actions(&self) -> Vec<StatusAction> {
        match self {
            Self::Pending => vec![
                StatusAction::to("confirmed", "Confirm"),
                StatusAction {
                    destructive: true,
                    ..StatusAction::to("cancelled", "Cancel")
                },
            ],
            _ => vec![],
        }
    }
}

impl OrderStatus {
    /// The next step in the kitchen workflow, if any.
    pub fn actions(&self) -> Vec<StatusAction> {
        match self {
            Self::Pending => vec![StatusAction::to("confirmed", "Confirm")],
            Self::Confirmed => vec![StatusAction::to("preparing", "Start preparing")],
            Self::Preparing => vec![StatusAction::to("ready", "Mark ready")],
            Self::Ready => vec![StatusAction::to("delivered", "Mark delivered")],
            Self::Delivered | Self::Cancelled => vec![],
        }
    }
}

impl InquiryStatus {
    pub fn actions(&self) -> Vec<StatusAction> {
        let mut actions = Vec::new();
        if *self == Self::Unread {
            actions.push(StatusAction::to("read", "Mark read"));
        }
        if *self != Self::Replied {
            actions.push(StatusAction::to("replied", "Mark replied"));
        }
        actions
    }
}

pub const MENU_CATEGORIES: &[&str] = &[
    "Starters",
    "Mains",
    "Biryani",
    "Breads",
    "Desserts",
    "Beverages",
];

pub const GALLERY_CATEGORIES: &[&str] = &["food", "restaurant", "ambiance", "events", "staff", "other"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub image: String,
    pub is_veg: bool,
    pub is_available: bool,
}

impl MenuItem {
    pub fn price_display(&self) -> String {
        format::rupees(self.price)
    }

    pub fn has_image(&self) -> bool {
        !self.image.is_empty()
    }
}

/// Every field of a menu item except its key; writes overwrite all of them.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuDraft {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub image: String,
    pub is_veg: bool,
    pub is_available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date: String,
    pub time: String,
    pub guests: u32,
    pub special_request: Option<String>,
    pub status: ReservationStatus,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewReservation {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date: String,
    pub time: String,
    pub guests: u32,
    pub special_request: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub quantity: u32,
    pub price: f64,
}

impl OrderItem {
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub address: String,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub order_type: OrderType,
    pub status: OrderStatus,
    pub created_at: String,
    pub delivery_time: Option<String>,
    pub special_instructions: Option<String>,
}

impl Order {
    pub fn total_display(&self) -> String {
        format::rupees(self.total_amount)
    }

    pub fn created_display(&self) -> String {
        format::timestamp(&self.created_at)
    }

    /// Last eight characters of the key, as shown in the orders table. The
    /// leading characters of a time-ordered key repeat between nearby orders.
    pub fn short_id(&self) -> &str {
        self.id
            .len()
            .checked_sub(8)
            .and_then(|start| self.id.get(start..))
            .unwrap_or(&self.id)
    }

    pub fn items_summary(&self) -> String {
        self.items
            .iter()
            .map(|item| format!("{} x{}", item.name, item.quantity))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub address: String,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub order_type: OrderType,
    pub delivery_time: Option<String>,
    pub special_instructions: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInquiry {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub status: InquiryStatus,
    pub created_at: String,
}

impl ContactInquiry {
    pub fn created_display(&self) -> String {
        format::timestamp(&self.created_at)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewInquiry {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImage {
    pub id: String,
    pub url: String,
    pub name: String,
    pub category: String,
    pub uploaded_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewGalleryImage {
    pub url: String,
    pub name: String,
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: String,
    pub username: String,
    pub created_at: String,
}
