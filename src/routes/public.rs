use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use serde::Deserialize;

use crate::db::models::{NewInquiry, NewOrder, NewReservation, OrderItem, OrderType};
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::views::toast::notice_query;

/// True when every required field has non-whitespace content.
fn all_present(fields: &[&str]) -> bool {
    fields.iter().all(|f| !f.trim().is_empty())
}

fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn back_to(anchor: &str, code: &str) -> Redirect {
    Redirect::to(&format!("/?{}#{}", notice_query(code), anchor))
}

// -- Contact --

#[derive(Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// POST /contact
pub async fn contact(State(state): State<AppState>, Form(form): Form<ContactForm>) -> Redirect {
    if !all_present(&[form.name.as_str(), form.email.as_str(), form.message.as_str()]) {
        return back_to("contact", "missing-fields");
    }

    let inquiry = NewInquiry {
        name: form.name.trim().to_string(),
        email: form.email.trim().to_string(),
        phone: optional(form.phone.as_deref()),
        message: form.message.trim().to_string(),
    };

    match state.repo.create_inquiry(&inquiry).await {
        Ok(created) => {
            tracing::info!("New inquiry {} from {}", created.id, created.email);
            back_to("contact", "contact-sent")
        }
        Err(e) => {
            tracing::error!("Failed to store inquiry: {}", e);
            back_to("contact", "contact-failed")
        }
    }
}

// -- Reservations --

#[derive(Deserialize)]
pub struct ReservationForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub guests: String,
    pub special_request: Option<String>,
}

impl ReservationForm {
    /// The reservation to store, or None when a required field is missing.
    pub fn validate(&self) -> Option<NewReservation> {
        if !all_present(&[
            self.name.as_str(),
            self.email.as_str(),
            self.phone.as_str(),
            self.date.as_str(),
            self.time.as_str(),
            self.guests.as_str(),
        ]) {
            return None;
        }
        let guests = self.guests.trim().parse::<u32>().ok().filter(|g| *g > 0)?;
        Some(NewReservation {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            date: self.date.trim().to_string(),
            time: self.time.trim().to_string(),
            guests,
            special_request: optional(self.special_request.as_deref()),
        })
    }
}

/// POST /reservations
pub async fn reserve(State(state): State<AppState>, Form(form): Form<ReservationForm>) -> Redirect {
    let Some(reservation) = form.validate() else {
        return back_to("reservation", "missing-fields");
    };

    match state.repo.create_reservation(&reservation).await {
        Ok(created) => {
            tracing::info!(
                "New reservation {} for {} on {} at {}",
                created.id,
                created.guests,
                created.date,
                created.time
            );
            back_to("reservation", "reservation-sent")
        }
        Err(e) => {
            tracing::error!("Failed to store reservation: {}", e);
            back_to("reservation", "reservation-failed")
        }
    }
}

// -- Orders --

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: String,
    pub customer_email: Option<String>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub total_amount: Option<f64>,
    pub order_type: Option<OrderType>,
    pub delivery_time: Option<String>,
    pub special_instructions: Option<String>,
}

impl OrderRequest {
    pub fn validate(self) -> Result<NewOrder, String> {
        if !all_present(&[
            self.customer_name.as_str(),
            self.customer_phone.as_str(),
            self.address.as_str(),
        ]) {
            return Err("customerName, customerPhone and address are required".into());
        }
        if self.items.is_empty() {
            return Err("An order needs at least one item".into());
        }
        if self
            .items
            .iter()
            .any(|item| item.name.trim().is_empty() || item.quantity == 0)
        {
            return Err("Every item needs a name and a quantity".into());
        }

        let total_amount = self
            .total_amount
            .unwrap_or_else(|| self.items.iter().map(OrderItem::line_total).sum());

        Ok(NewOrder {
            customer_name: self.customer_name.trim().to_string(),
            customer_phone: self.customer_phone.trim().to_string(),
            customer_email: optional(self.customer_email.as_deref()),
            address: self.address.trim().to_string(),
            items: self.items,
            total_amount,
            order_type: self.order_type.unwrap_or_default(),
            delivery_time: optional(self.delivery_time.as_deref()),
            special_instructions: optional(self.special_instructions.as_deref()),
        })
    }
}

/// POST /api/orders: JSON order intake
pub async fn place_order(
    State(state): State<AppState>,
    Json(request): Json<OrderRequest>,
) -> AppResult<Response> {
    let order = request.validate().map_err(AppError::BadRequest)?;
    let created = state.repo.create_order(&order).await?;
    tracing::info!(
        "New {} order {} ({})",
        created.order_type.as_str(),
        created.id,
        created.total_display()
    );
    Ok((StatusCode::CREATED, Json(created)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reservation_form() -> ReservationForm {
        ReservationForm {
            name: "Anita".into(),
            email: "anita@example.com".into(),
            phone: "98765".into(),
            date: "2026-10-24".into(),
            time: "7:30 PM".into(),
            guests: "4".into(),
            special_request: Some("  ".into()),
        }
    }

    #[test]
    fn complete_reservation_validates() {
        let reservation = reservation_form().validate().unwrap();
        assert_eq!(reservation.guests, 4);
        assert_eq!(reservation.special_request, None);
    }

    #[test]
    fn blank_required_field_fails_validation() {
        let mut form = reservation_form();
        form.phone = "   ".into();
        assert!(form.validate().is_none());

        let mut form = reservation_form();
        form.guests = "many".into();
        assert!(form.validate().is_none());
    }

    fn order_request(total: Option<f64>) -> OrderRequest {
        OrderRequest {
            customer_name: "Vikram".into(),
            customer_phone: "555".into(),
            customer_email: None,
            address: "Andheri".into(),
            items: vec![
                OrderItem { name: "Biryani".into(), quantity: 2, price: 299.0 },
                OrderItem { name: "Naan".into(), quantity: 1, price: 99.0 },
            ],
            total_amount: total,
            order_type: None,
            delivery_time: None,
            special_instructions: None,
        }
    }

    #[test]
    fn order_total_defaults_to_item_sum() {
        let order = order_request(None).validate().unwrap();
        assert_eq!(order.total_amount, 697.0);
        assert_eq!(order.order_type, OrderType::Delivery);

        let order = order_request(Some(650.0)).validate().unwrap();
        assert_eq!(order.total_amount, 650.0);
    }

    #[test]
    fn order_without_items_is_rejected() {
        let mut request = order_request(None);
        request.items.clear();
        assert!(request.validate().is_err());

        let mut request = order_request(None);
        request.address = String::new();
        assert!(request.validate().is_err());
    }
}
