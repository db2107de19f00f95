use serde::Deserialize;

use crate::backend::Collection;

/// Notice carried in the query string of a post-redirect-get.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Notice {
    pub notice: Option<String>,
    /// Successful uploads in a gallery batch.
    pub ok: Option<usize>,
    /// Failed uploads in a gallery batch.
    pub failed: Option<usize>,
    /// New status value after a status change.
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub destructive: bool,
}

impl Toast {
    fn ok(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            destructive: false,
        }
    }

    fn error(description: impl Into<String>) -> Self {
        Self {
            title: "Error".into(),
            description: description.into(),
            destructive: true,
        }
    }

    pub fn variant(&self) -> &'static str {
        if self.destructive {
            "destructive"
        } else {
            "default"
        }
    }
}

/// Query string for a redirect carrying `code`.
pub fn notice_query(code: &str) -> String {
    format!("notice={}", code)
}

pub fn status_notice_query(collection: Collection, value: &str) -> String {
    format!("notice={}-status&value={}", singular(collection), value)
}

pub fn gallery_notice_query(ok: usize, failed: usize) -> String {
    format!("notice=gallery-uploaded&ok={}&failed={}", ok, failed)
}

fn singular(collection: Collection) -> &'static str {
    match collection {
        Collection::Menu => "menu",
        Collection::Reservations => "reservation",
        Collection::Orders => "order",
        Collection::Inquiries => "inquiry",
        Collection::Gallery => "gallery",
    }
}

/// Resolve a notice to the toast it shows. Unknown codes show nothing.
pub fn toast_for(notice: &Notice) -> Option<Toast> {
    let code = notice.notice.as_deref()?;
    let value = notice.value.as_deref().unwrap_or("updated");

    let toast = match code {
        "contact-sent" => Toast::ok(
            "Message Sent!",
            "Thank you for your inquiry. We'll get back to you soon.",
        ),
        "contact-failed" => Toast::error("Failed to send message. Please try again."),
        "reservation-sent" => Toast::ok(
            "Reservation Confirmed!",
            "Thank you for your reservation. We'll call you to confirm the details.",
        ),
        "reservation-failed" => Toast::error("Failed to submit reservation. Please try again."),
        "missing-fields" => Toast::error("Please fill in all required fields."),

        "logged-out" => Toast::ok(
            "Logged out successfully",
            "You have been signed out from the admin dashboard.",
        ),

        "menu-added" => Toast::ok("Menu item added!", "New menu item has been successfully added."),
        "menu-updated" => Toast::ok(
            "Menu item updated!",
            "The menu item has been successfully updated.",
        ),
        "menu-failed" => Toast::error("Failed to save menu item. Please try again."),
        "menu-deleted" => Toast::ok(
            "Menu item deleted!",
            "The menu item has been successfully deleted.",
        ),
        "menu-delete-failed" => Toast::error("Failed to delete menu item. Please try again."),

        "reservation-status" => {
            Toast::ok("Status updated!", format!("Reservation has been {}.", value))
        }
        "order-status" => Toast::ok("Status updated!", format!("Order status changed to {}.", value)),
        "inquiry-status" => Toast::ok("Status updated!", format!("Inquiry marked as {}.", value)),
        "reservation-status-failed" => Toast::error("Failed to update reservation status."),
        "order-status-failed" => Toast::error("Failed to update order status."),
        "inquiry-status-failed" => Toast::error("Failed to update inquiry status."),

        "reservation-deleted" => Toast::ok(
            "Reservation deleted!",
            "The reservation has been successfully deleted.",
        ),
        "order-deleted" => Toast::ok("Order deleted!", "The order has been successfully deleted."),
        "inquiry-deleted" => Toast::ok(
            "Inquiry deleted!",
            "The inquiry has been successfully deleted.",
        ),
        "reservation-delete-failed" => Toast::error("Failed to delete reservation."),
        "order-delete-failed" => Toast::error("Failed to delete order."),
        "inquiry-delete-failed" => Toast::error("Failed to delete inquiry."),

        "gallery-uploaded" => gallery_upload_toast(
            notice.ok.unwrap_or(0),
            notice.failed.unwrap_or(0),
        ),
        "gallery-empty" => Toast::error("Choose at least one image to upload."),
        "gallery-deleted" => Toast::ok("Image deleted!", "The image has been successfully deleted."),
        "gallery-delete-failed" => Toast::error("Failed to delete image. Please try again."),

        _ => return None,
    };
    Some(toast)
}

fn gallery_upload_toast(ok: usize, failed: usize) -> Toast {
    if ok > 0 {
        let description = if failed > 0 {
            format!("{} image(s) failed to upload.", failed)
        } else {
            "All images uploaded successfully.".to_string()
        };
        Toast::ok(format!("{} image(s) uploaded successfully!", ok), description)
    } else {
        Toast {
            title: "Some uploads failed".into(),
            description: format!("{} image(s) failed to upload. Please try again.", failed),
            destructive: true,
        }
    }
}

pub fn status_failed_code(collection: Collection) -> String {
    format!("{}-status-failed", singular(collection))
}

pub fn delete_notice_code(collection: Collection, ok: bool) -> String {
    let suffix = if ok { "deleted" } else { "delete-failed" };
    format!("{}-{}", singular(collection), suffix)
}
