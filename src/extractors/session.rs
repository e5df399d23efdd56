//! Require a logged-in session (cookie `admin_session`); otherwise redirect to the login page.

use crate::admin::Admin;
use crate::session::{Session, SESSION_COOKIE};
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::COOKIE, request::Parts, HeaderMap},
    response::Redirect,
};

/// Token from the `admin_session` cookie, if the request carries one.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extractor for the current admin session.
#[derive(Clone, Debug)]
pub struct AdminSession(pub Session);

#[async_trait]
impl FromRequestParts<Admin> for AdminSession {
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, admin: &Admin) -> Result<Self, Self::Rejection> {
        match session_token(&parts.headers).and_then(|token| admin.sessions().get(&token)) {
            Some(session) => Ok(AdminSession(session)),
            None => {
                tracing::debug!(path = %parts.uri.path(), "no session, redirecting to login");
                Err(Redirect::to(&admin.login_url()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn finds_the_session_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; admin_session=abc123; lang=en"));
        assert_eq!(session_token(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn missing_or_empty_cookie_is_none() {
        let mut headers = HeaderMap::new();
        assert!(session_token(&headers).is_none());
        headers.insert(COOKIE, HeaderValue::from_static("admin_session="));
        assert!(session_token(&headers).is_none());
        headers.insert(COOKIE, HeaderValue::from_static("other_admin_session=x"));
        assert!(session_token(&headers).is_none());
    }
}
