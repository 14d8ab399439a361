//! The `preferences` cookie over HTTP.

use axum::extract::Request;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tower_sessions::cookie::{Cookie, SameSite};

use notebook_api::preferences::PREFERENCES_COOKIE;
use notebook_api::Preferences;

/// Raw value of the preferences cookie sent with the request.
fn cookie_value(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == PREFERENCES_COOKIE)
        .map(|(_, value)| value)
}

fn current(headers: &HeaderMap) -> Preferences {
    cookie_value(headers)
        .map(Preferences::from_cookie)
        .unwrap_or_default()
}

fn set_cookie(preferences: Preferences) -> Option<HeaderValue> {
    let mut cookie = Cookie::new(PREFERENCES_COOKIE, preferences.to_cookie());
    cookie.set_path("/");
    cookie.set_same_site(SameSite::Lax);
    cookie.set_http_only(true);
    HeaderValue::from_str(&cookie.to_string()).ok()
}

fn sets_preferences(headers: &HeaderMap) -> bool {
    let prefix = format!("{PREFERENCES_COOKIE}=");
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.starts_with(&prefix))
}

/// Hand the default preferences to clients that have none.
pub async fn ensure_cookie(req: Request, next: Next) -> Response {
    let had_cookie = cookie_value(req.headers()).is_some();
    let mut response = next.run(req).await;

    if !had_cookie && !sets_preferences(response.headers()) {
        if let Some(value) = set_cookie(Preferences::default()) {
            response.headers_mut().append(SET_COOKIE, value);
        }
    }
    response
}

pub async fn show(headers: HeaderMap) -> Json<Preferences> {
    Json(current(&headers))
}

pub async fn toggle_dark_mode(headers: HeaderMap) -> Response {
    let preferences = current(&headers).toggle();
    let mut response = Json(preferences).into_response();
    if let Some(value) = set_cookie(preferences) {
        response.headers_mut().append(SET_COOKIE, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_value_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("id=abc; preferences=xyz; z=1"));
        assert_eq!(cookie_value(&headers), Some("xyz"));
    }

    #[test]
    fn test_cookie_value_missing() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("id=abc"));
        assert_eq!(cookie_value(&headers), None);
        assert_eq!(current(&headers), Preferences::default());
    }

    #[test]
    fn test_set_cookie_attributes() {
        let value = set_cookie(Preferences::default()).unwrap();
        let value = value.to_str().unwrap();
        assert!(value.contains("Path=/"));
        assert!(value.contains("HttpOnly"));
        assert!(value.contains("SameSite=Lax"));
    }
}
