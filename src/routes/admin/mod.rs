//! Admin dashboard: one page with a tab per collection, form posts for every
//! write, and a live SSE feed that re-renders the open panel.

pub mod gallery;
pub mod live;
pub mod menu;
pub mod panels;
pub mod records;

use askama::Template;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;

use crate::backend::Collection;
use crate::db::models::{
    InquiryStatus, OrderStatus, ReservationStatus, Status, GALLERY_CATEGORIES, MENU_CATEGORIES,
};
use crate::error::AppResult;
use crate::extractors::CurrentAdmin;
use crate::routes::home::Html;
use crate::state::AppState;
use crate::views::filters::ListFilter;
use crate::views::toast::{toast_for, Notice, Toast};

pub use panels::SelectOption;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Overview,
    Menu,
    Reservations,
    Orders,
    Messages,
    Gallery,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Overview,
        Tab::Menu,
        Tab::Reservations,
        Tab::Orders,
        Tab::Messages,
        Tab::Gallery,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Overview => "overview",
            Tab::Menu => "menu",
            Tab::Reservations => "reservations",
            Tab::Orders => "orders",
            Tab::Messages => "messages",
            Tab::Gallery => "gallery",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Menu => "Menu",
            Tab::Reservations => "Reservations",
            Tab::Orders => "Orders",
            Tab::Messages => "Messages",
            Tab::Gallery => "Gallery",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }

    /// Collections whose changes re-render this tab.
    pub fn watches(&self) -> &'static [Collection] {
        match self {
            Tab::Overview => &[
                Collection::Menu,
                Collection::Reservations,
                Collection::Orders,
                Collection::Inquiries,
            ],
            Tab::Menu => &[Collection::Menu],
            Tab::Reservations => &[Collection::Reservations],
            Tab::Orders => &[Collection::Orders],
            Tab::Messages => &[Collection::Inquiries],
            Tab::Gallery => &[Collection::Gallery],
        }
    }

    /// The tab that lists a collection.
    pub fn for_collection(collection: Collection) -> Self {
        match collection {
            Collection::Menu => Tab::Menu,
            Collection::Reservations => Tab::Reservations,
            Collection::Orders => Tab::Orders,
            Collection::Inquiries => Tab::Messages,
            Collection::Gallery => Tab::Gallery,
        }
    }

    fn status_options(&self, selected: &str) -> Vec<SelectOption> {
        let values: Vec<(&'static str, &'static str)> = match self {
            Tab::Reservations => statuses::<ReservationStatus>(),
            Tab::Orders => statuses::<OrderStatus>(),
            Tab::Messages => statuses::<InquiryStatus>(),
            _ => return Vec::new(),
        };
        std::iter::once(("all", "All statuses"))
            .chain(values)
            .map(|(value, label)| SelectOption::new(value, label, value == selected))
            .collect()
    }
}

fn statuses<S: Status>() -> Vec<(&'static str, &'static str)> {
    S::ALL.iter().map(|s| (s.as_str(), s.label())).collect()
}

/// Tab selection and per-tab filters, as carried in the dashboard query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PanelQuery {
    pub tab: Option<String>,
    pub q: Option<String>,
    pub status: Option<String>,
    pub date: Option<String>,
    pub category: Option<String>,
}

impl PanelQuery {
    pub fn tab(&self) -> Tab {
        self.tab.as_deref().and_then(Tab::parse).unwrap_or_default()
    }

    pub fn filter(&self) -> ListFilter {
        ListFilter {
            q: self.q.clone(),
            status: self.status.clone(),
            date: self.date.clone(),
        }
    }

    /// Gallery category filter; empty means every category.
    pub fn category(&self) -> &str {
        self.category.as_deref().unwrap_or("")
    }

    /// Query string for the live panel of `tab`, keeping the active filters.
    pub fn live_url(&self, tab: Tab) -> String {
        let mut query = self.filter().to_query();
        if tab == Tab::Gallery && !self.category().is_empty() {
            if !query.is_empty() {
                query.push('&');
            }
            query.push_str(&format!("category={}", urlencoding::encode(self.category())));
        }
        if query.is_empty() {
            format!("/admin/live/{}", tab.as_str())
        } else {
            format!("/admin/live/{}?{}", tab.as_str(), query)
        }
    }
}

/// Redirect back to a dashboard tab, showing a notice.
pub fn back_to_tab(tab: Tab, notice_query: &str) -> Redirect {
    Redirect::to(&format!("/admin?tab={}&{}", tab.as_str(), notice_query))
}

pub struct TabLink {
    pub value: &'static str,
    pub label: &'static str,
    pub active: bool,
}

#[derive(Template)]
#[template(path = "pages/admin_dashboard.html")]
pub struct DashboardTemplate {
    pub restaurant_name: String,
    pub username: String,
    pub tab: &'static str,
    pub tabs: Vec<TabLink>,
    pub toast: Option<Toast>,
    pub q: String,
    pub date: String,
    pub status_options: Vec<SelectOption>,
    pub menu_categories: Vec<SelectOption>,
    pub gallery_categories: Vec<SelectOption>,
    pub panel: String,
    pub live_url: String,
}

/// GET /admin?tab=…
pub async fn dashboard(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    Query(query): Query<PanelQuery>,
    Query(notice): Query<Notice>,
) -> AppResult<Response> {
    let tab = query.tab();
    let filter = query.filter();
    let panel = panels::render(&state, tab, &query).await?;

    Ok(Html(DashboardTemplate {
        restaurant_name: state.config.restaurant.name.clone(),
        username: admin.username,
        tab: tab.as_str(),
        tabs: Tab::ALL
            .iter()
            .map(|t| TabLink {
                value: t.as_str(),
                label: t.label(),
                active: *t == tab,
            })
            .collect(),
        toast: toast_for(&notice),
        q: filter.search().to_string(),
        date: filter.date().unwrap_or("").to_string(),
        status_options: tab.status_options(filter.status()),
        menu_categories: MENU_CATEGORIES
            .iter()
            .map(|c| SelectOption::new(c, c, false))
            .collect(),
        gallery_categories: GALLERY_CATEGORIES
            .iter()
            .map(|c| SelectOption::new(c, &capitalize(c), *c == "food"))
            .collect(),
        panel,
        live_url: query.live_url(tab),
    })
    .into_response())
}

pub(crate) fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin", get(dashboard))
        .route("/admin/menu", post(menu::create))
        .route("/admin/menu/{id}", post(menu::update))
        .route("/admin/menu/{id}/delete", post(menu::delete))
        .route("/admin/gallery", post(gallery::upload))
        .route("/admin/gallery/{id}/delete", post(gallery::delete))
        .route("/admin/{collection}/{id}/status", post(records::set_status))
        .route("/admin/{collection}/{id}/delete", post(records::delete))
        .route("/admin/live/{tab}", get(live::stream))
        .route("/admin/api/{collection}", get(live::snapshot))
}
