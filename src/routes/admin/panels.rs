//! Live regions of the dashboard tabs. Each renders from a fresh snapshot so
//! the same HTML serves the first page load and every SSE update.

use askama::Template;

use super::{capitalize, PanelQuery, Tab};
use crate::backend::Collection;
use crate::db::models::{
    ContactInquiry, GalleryImage, MenuItem, Order, Reservation, Status, StatusAction,
    MENU_CATEGORIES,
};
use crate::error::AppResult;
use crate::state::AppState;
use crate::views::filters::{self, filter_gallery, Searchable};
use crate::views::stats::{
    self, CategoryCount, InquiryStats, OrderStats, OverviewStats, ReservationStats,
};

/// Rows shown in the overview's recent lists.
const RECENT_LIMIT: usize = 5;

pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    pub fn new(value: &str, label: &str, selected: bool) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
            selected,
        }
    }
}

/// A record with its status badge and controls resolved for display.
pub struct Row<T> {
    pub record: T,
    pub status_label: &'static str,
    pub badge_class: &'static str,
    pub status_options: Vec<SelectOption>,
    pub actions: Vec<StatusAction>,
}

fn row<T, S: Status>(record: T, status: S, actions: Vec<StatusAction>) -> Row<T> {
    Row {
        status_options: S::ALL
            .iter()
            .map(|s| SelectOption::new(s.as_str(), s.label(), *s == status))
            .collect(),
        status_label: status.label(),
        badge_class: status.badge_class(),
        record,
        actions,
    }
}

fn reservation_row(r: Reservation) -> Row<Reservation> {
    let status = r.status;
    row(r, status, status.actions())
}

fn order_row(o: Order) -> Row<Order> {
    let status = o.status;
    row(o, status, status.actions())
}

fn inquiry_row(i: ContactInquiry) -> Row<ContactInquiry> {
    let status = i.status;
    row(i, status, status.actions())
}

fn filtered<T: Searchable + Clone>(records: &[T], query: &PanelQuery) -> Vec<T> {
    filters::apply(records, &query.filter())
        .into_iter()
        .cloned()
        .collect()
}

pub struct MenuRow {
    pub item: MenuItem,
    pub categories: Vec<SelectOption>,
}

#[derive(Template)]
#[template(path = "components/overview_panel.html")]
pub struct OverviewPanel {
    pub stats: OverviewStats,
    pub reservations: Vec<Row<Reservation>>,
    pub orders: Vec<Row<Order>>,
}

#[derive(Template)]
#[template(path = "components/menu_panel.html")]
pub struct MenuPanel {
    pub rows: Vec<MenuRow>,
}

#[derive(Template)]
#[template(path = "components/reservations_panel.html")]
pub struct ReservationsPanel {
    pub stats: ReservationStats,
    pub rows: Vec<Row<Reservation>>,
    pub filtered: bool,
}

#[derive(Template)]
#[template(path = "components/orders_panel.html")]
pub struct OrdersPanel {
    pub stats: OrderStats,
    pub revenue: String,
    pub rows: Vec<Row<Order>>,
    pub filtered: bool,
}

#[derive(Template)]
#[template(path = "components/inquiries_panel.html")]
pub struct InquiriesPanel {
    pub stats: InquiryStats,
    pub rows: Vec<Row<ContactInquiry>>,
    pub filtered: bool,
}

pub struct GalleryChip {
    pub value: String,
    pub label: String,
    pub count: usize,
    pub selected: bool,
}

#[derive(Template)]
#[template(path = "components/gallery_panel.html")]
pub struct GalleryPanel {
    pub chips: Vec<GalleryChip>,
    pub images: Vec<GalleryImage>,
}

/// Render the live region of `tab` from current snapshots.
pub async fn render(state: &AppState, tab: Tab, query: &PanelQuery) -> AppResult<String> {
    let repo = &state.repo;
    let today = stats::today();
    let is_filtered = !query.filter().to_query().is_empty();

    let html = match tab {
        Tab::Overview => {
            let reservations = repo.reservations_snapshot().await?;
            let orders = repo.orders_snapshot().await?;
            let inquiries = repo.inquiries_snapshot().await?;
            let menu_items = repo.count(Collection::Menu).await?;
            OverviewPanel {
                stats: stats::overview(
                    &reservations,
                    usize::try_from(menu_items).unwrap_or(0),
                    &inquiries,
                    &orders,
                    today,
                ),
                reservations: reservations
                    .into_iter()
                    .take(RECENT_LIMIT)
                    .map(reservation_row)
                    .collect(),
                orders: orders
                    .into_iter()
                    .take(RECENT_LIMIT)
                    .map(order_row)
                    .collect(),
            }
            .render()?
        }
        Tab::Menu => {
            let items = repo.menu_snapshot().await?;
            MenuPanel {
                rows: items
                    .into_iter()
                    .map(|item| MenuRow {
                        categories: category_options(&item.category),
                        item,
                    })
                    .collect(),
            }
            .render()?
        }
        Tab::Reservations => {
            let all = repo.reservations_snapshot().await?;
            ReservationsPanel {
                stats: stats::reservation_stats(&all, today),
                rows: filtered(&all, query)
                    .into_iter()
                    .map(reservation_row)
                    .collect(),
                filtered: is_filtered,
            }
            .render()?
        }
        Tab::Orders => {
            let all = repo.orders_snapshot().await?;
            let order_stats = stats::order_stats(&all, today);
            OrdersPanel {
                revenue: order_stats.revenue_display(),
                stats: order_stats,
                rows: filtered(&all, query).into_iter().map(order_row).collect(),
                filtered: is_filtered,
            }
            .render()?
        }
        Tab::Messages => {
            let all = repo.inquiries_snapshot().await?;
            InquiriesPanel {
                stats: stats::inquiry_stats(&all, today),
                rows: filtered(&all, query).into_iter().map(inquiry_row).collect(),
                filtered: is_filtered,
            }
            .render()?
        }
        Tab::Gallery => {
            let all = repo.gallery_snapshot().await?;
            let selected = query.category();
            GalleryPanel {
                chips: gallery_chips(&stats::gallery_counts(&all), all.len(), selected),
                images: filter_gallery(&all, selected).into_iter().cloned().collect(),
            }
            .render()?
        }
    };
    Ok(html)
}

/// Standard categories, plus the item's own when it is not one of them.
fn category_options(current: &str) -> Vec<SelectOption> {
    let mut options: Vec<SelectOption> = MENU_CATEGORIES
        .iter()
        .map(|c| SelectOption::new(c, c, *c == current))
        .collect();
    if !MENU_CATEGORIES.iter().any(|c| *c == current) {
        options.push(SelectOption::new(current, current, true));
    }
    options
}

fn gallery_chips(counts: &[CategoryCount], total: usize, selected: &str) -> Vec<GalleryChip> {
    let all = GalleryChip {
        value: "all".into(),
        label: "All".into(),
        count: total,
        selected: selected.is_empty() || selected == "all",
    };
    std::iter::once(all)
        .chain(counts.iter().map(|c| GalleryChip {
            value: c.category.clone(),
            label: capitalize(&c.category),
            count: c.count,
            selected: c.category == selected,
        }))
        .collect()
}
