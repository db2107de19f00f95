use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, HeaderMap};

use crate::auth::session;
use crate::db::models::AdminUser;
use crate::error::AppError;
use crate::state::AppState;

/// The signed-in admin.
/// Rejects with a redirect to the login page when there is no valid session.
#[derive(Debug, Clone)]
pub struct CurrentAdmin(pub AdminUser);

impl FromRequestParts<AppState> for CurrentAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = cookie_value(&parts.headers, &state.config.auth.cookie_name)
            .ok_or(AppError::LoginRequired)?;

        session::find_admin(&state.db, token)?
            .map(CurrentAdmin)
            .ok_or(AppError::LoginRequired)
    }
}

/// Optional admin extractor that yields None instead of redirecting.
pub struct MaybeAdmin(pub Option<AdminUser>);

impl FromRequestParts<AppState> for MaybeAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match CurrentAdmin::from_request_parts(parts, state).await {
            Ok(CurrentAdmin(admin)) => Ok(MaybeAdmin(Some(admin))),
            Err(AppError::LoginRequired) => Ok(MaybeAdmin(None)),
            Err(e) => Err(e),
        }
    }
}

/// The signed-in admin for JSON endpoints.
/// Rejects with 401 instead of redirecting, since the caller is a script.
pub struct ApiAdmin(pub AdminUser);

impl FromRequestParts<AppState> for ApiAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let MaybeAdmin(admin) = MaybeAdmin::from_request_parts(parts, state).await?;
        admin.map(ApiAdmin).ok_or(AppError::Unauthorized)
    }
}

pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|s| s.split(';'))
        .map(|s| s.trim())
        .find_map(|cookie| {
            let (key, val) = cookie.split_once('=')?;
            if key.trim() == name {
                Some(val.trim())
            } else {
                None
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn finds_named_cookie_among_several() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("theme=dark; spice_session=abc123"));
        headers.append(header::COOKIE, HeaderValue::from_static("other=1"));
        assert_eq!(cookie_value(&headers, "spice_session"), Some("abc123"));
        assert_eq!(cookie_value(&headers, "other"), Some("1"));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn cookie_name_must_match_exactly() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("spice_session_old=zzz"));
        assert_eq!(cookie_value(&headers, "spice_session"), None);
    }
}
