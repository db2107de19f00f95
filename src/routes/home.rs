use askama::Template;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::Datelike;
use serde::Deserialize;

use crate::config::RestaurantConfig;
use crate::db::models::MenuItem;
use crate::state::AppState;
use crate::views::filters::{category_chips, filter_by_category, CategoryChip, ALL_CATEGORIES};
use crate::views::toast::{toast_for, Notice, Toast};

/// Reservation slots offered by the booking form.
pub const TIME_SLOTS: &[&str] = &[
    "11:00 AM", "11:30 AM", "12:00 PM", "12:30 PM", "1:00 PM", "1:30 PM", "2:00 PM", "2:30 PM",
    "6:00 PM", "6:30 PM", "7:00 PM", "7:30 PM", "8:00 PM", "8:30 PM", "9:00 PM", "9:30 PM",
];

pub const MAX_PARTY_SIZE: u32 = 10;

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub restaurant: RestaurantConfig,
    pub chips: Vec<CategoryChip>,
    pub items: Vec<MenuItem>,
    pub time_slots: Vec<&'static str>,
    pub party_sizes: Vec<u32>,
    pub toast: Option<Toast>,
    pub year: i32,
}

/// Wrapper to render askama templates as axum responses
pub struct Html<T: Template>(pub T);

impl<T: Template> IntoResponse for Html<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!("Template render error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
            }
        }
    }
}

#[derive(Deserialize, Default)]
pub struct HomeQuery {
    pub category: Option<String>,
}

/// GET /: the public site with the live menu preview
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<HomeQuery>,
    Query(notice): Query<Notice>,
) -> Response {
    let selected = query
        .category
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| ALL_CATEGORIES.to_string());

    // The site still renders when the menu can't be read.
    let available: Vec<MenuItem> = match state.repo.menu_snapshot().await {
        Ok(items) => items.into_iter().filter(|item| item.is_available).collect(),
        Err(e) => {
            tracing::error!("Failed to load menu: {}", e);
            Vec::new()
        }
    };

    let items = filter_by_category(&available, &selected)
        .into_iter()
        .cloned()
        .collect();

    Html(HomeTemplate {
        restaurant: state.config.restaurant.clone(),
        chips: category_chips(&available, &selected),
        items,
        time_slots: TIME_SLOTS.to_vec(),
        party_sizes: (1..=MAX_PARTY_SIZE).collect(),
        toast: toast_for(&notice),
        year: chrono::Utc::now().year(),
    })
    .into_response()
}
