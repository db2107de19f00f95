use askama::Template;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;

use crate::auth::{password, session};
use crate::error::{AppError, AppResult};
use crate::extractors::{cookie_value, MaybeAdmin};
use crate::routes::home::Html;
use crate::state::AppState;
use crate::views::toast::{toast_for, Notice, Toast};

// -- Templates --

#[derive(Template)]
#[template(path = "pages/admin_setup.html")]
pub struct SetupTemplate {
    pub restaurant_name: String,
    pub username: String,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "pages/admin_login.html")]
pub struct LoginTemplate {
    pub restaurant_name: String,
    pub username: String,
    pub error: Option<String>,
    pub toast: Option<Toast>,
}

// -- Request types --

#[derive(Deserialize)]
pub struct SetupForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm: String,
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Set the session cookie and land on the dashboard.
fn signed_in(state: &AppState, token: &str) -> Response {
    let cookie = session::session_cookie(
        &state.config.auth.cookie_name,
        token,
        state.config.auth.session_hours,
    );
    (
        StatusCode::SEE_OTHER,
        [
            (header::LOCATION, "/admin".to_string()),
            (header::SET_COOKIE, cookie),
        ],
        "",
    )
        .into_response()
}

// -- Setup handlers --

/// GET /admin/setup: first-run form, only while no admin exists
pub async fn setup_page(State(state): State<AppState>) -> AppResult<Response> {
    if password::admin_count(&state.db)? > 0 {
        return Ok(Redirect::to("/admin/login").into_response());
    }

    Ok(Html(SetupTemplate {
        restaurant_name: state.config.restaurant.name.clone(),
        username: String::new(),
        error: None,
    })
    .into_response())
}

/// POST /admin/setup: create the first admin and sign them in
pub async fn setup_submit(
    State(state): State<AppState>,
    Form(form): Form<SetupForm>,
) -> AppResult<Response> {
    if password::admin_count(&state.db)? > 0 {
        return Ok(Redirect::to("/admin/login").into_response());
    }

    let rejected = |message: String| {
        (
            StatusCode::BAD_REQUEST,
            Html(SetupTemplate {
                restaurant_name: state.config.restaurant.name.clone(),
                username: form.username.clone(),
                error: Some(message),
            }),
        )
            .into_response()
    };

    if form.password != form.confirm {
        return Ok(rejected("Passwords do not match".into()));
    }

    let admin = match password::create_first_admin(&state.db, &form.username, &form.password) {
        Ok(Some(admin)) => admin,
        // Another setup won the race
        Ok(None) => return Ok(Redirect::to("/admin/login").into_response()),
        Err(AppError::BadRequest(message)) => return Ok(rejected(message)),
        Err(e) => return Err(e),
    };

    let token = session::create_session(&state.db, &admin.id, state.config.auth.session_hours)?;
    Ok(signed_in(&state, &token))
}

// -- Login handlers --

/// GET /admin/login
pub async fn login_page(
    State(state): State<AppState>,
    maybe_admin: MaybeAdmin,
    Query(notice): Query<Notice>,
) -> AppResult<Response> {
    if maybe_admin.0.is_some() {
        return Ok(Redirect::to("/admin").into_response());
    }
    if password::admin_count(&state.db)? == 0 {
        return Ok(Redirect::to("/admin/setup").into_response());
    }

    Ok(Html(LoginTemplate {
        restaurant_name: state.config.restaurant.name.clone(),
        username: String::new(),
        error: None,
        toast: toast_for(&notice),
    })
    .into_response())
}

/// POST /admin/login: verify the password and start a session
pub async fn login_submit(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    match password::verify_login(&state.db, &form.username, &form.password)? {
        Some(admin) => {
            let token =
                session::create_session(&state.db, &admin.id, state.config.auth.session_hours)?;
            tracing::info!("Admin {} signed in", admin.username);
            Ok(signed_in(&state, &token))
        }
        None => {
            tracing::warn!("Failed sign-in for {:?}", form.username.trim());
            Ok((
                StatusCode::UNAUTHORIZED,
                Html(LoginTemplate {
                    restaurant_name: state.config.restaurant.name.clone(),
                    username: form.username,
                    error: Some("Invalid username or password".into()),
                    toast: None,
                }),
            )
                .into_response())
        }
    }
}

/// POST /admin/logout: delete session and redirect
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Response> {
    let cookie_name = &state.config.auth.cookie_name;

    if let Some(token) = cookie_value(&headers, cookie_name) {
        if let Err(e) = session::delete_session(&state.db, token) {
            tracing::warn!("Failed to delete session on logout: {}", e);
        }
    }

    Ok((
        StatusCode::SEE_OTHER,
        [
            (
                header::LOCATION,
                "/admin/login?notice=logged-out".to_string(),
            ),
            (header::SET_COOKIE, session::clear_session_cookie(cookie_name)),
        ],
        "",
    )
        .into_response())
}
