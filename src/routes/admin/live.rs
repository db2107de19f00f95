use std::convert::Infallible;

use axum::extract::{Path, Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::stream::{self, Stream};
use tokio::sync::broadcast;

use super::{panels, PanelQuery, Tab};
use crate::backend::{live, Collection};
use crate::error::{AppError, AppResult};
use crate::extractors::{ApiAdmin, CurrentAdmin};
use crate::state::AppState;

struct Subscription {
    state: AppState,
    tab: Tab,
    query: PanelQuery,
    rx: broadcast::Receiver<Collection>,
    first: bool,
}

/// One `snapshot` event carrying a panel's HTML.
pub fn snapshot_event(html: &str) -> Event {
    // SSE data may not carry carriage returns; textarea input does.
    Event::default().event("snapshot").data(html.replace('\r', ""))
}

/// GET /admin/live/{tab}: SSE stream of re-rendered panel HTML
///
/// Sends the current panel straight away, then again after every write to a
/// collection the tab shows.
pub async fn stream(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Path(tab): Path<String>,
    Query(query): Query<PanelQuery>,
) -> AppResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let tab = Tab::parse(&tab).ok_or(AppError::NotFound)?;
    let rx = state.repo.subscribe();
    tracing::debug!("Live subscriber for {} tab", tab.as_str());

    let subscription = Subscription {
        state,
        tab,
        query,
        rx,
        first: true,
    };

    let stream = stream::unfold(subscription, |mut sub| async move {
        if !sub.first && !live::changed(&mut sub.rx, sub.tab.watches()).await {
            return None;
        }
        sub.first = false;

        match panels::render(&sub.state, sub.tab, &sub.query).await {
            Ok(html) => Some((Ok(snapshot_event(&html)), sub)),
            Err(e) => {
                tracing::error!("Live {} panel failed: {}", sub.tab.as_str(), e);
                None
            }
        }
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

/// GET /admin/api/{collection}: current snapshot as JSON
pub async fn snapshot(
    State(state): State<AppState>,
    _admin: ApiAdmin,
    Path(collection): Path<String>,
) -> AppResult<Response> {
    let collection = Collection::from_path(&collection).ok_or(AppError::NotFound)?;
    let repo = &state.repo;

    let response = match collection {
        Collection::Menu => Json(repo.menu_snapshot().await?).into_response(),
        Collection::Reservations => Json(repo.reservations_snapshot().await?).into_response(),
        Collection::Orders => Json(repo.orders_snapshot().await?).into_response(),
        Collection::Inquiries => Json(repo.inquiries_snapshot().await?).into_response(),
        Collection::Gallery => Json(repo.gallery_snapshot().await?).into_response(),
    };
    Ok(response)
}
