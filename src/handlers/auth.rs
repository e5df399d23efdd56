//! Login and logout.

use super::{page, Chrome};
use crate::admin::Admin;
use crate::error::AdminError;
use crate::extractors::session_token;
use crate::session::SESSION_COOKIE;
use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
struct LoginPage<'a> {
    #[serde(flatten)]
    chrome: Chrome,
    action: String,
    username: &'a str,
    error: Option<&'a str>,
}

fn cookie_path(admin: &Admin) -> &str {
    match admin.root_path() {
        "" => "/",
        root => root,
    }
}

fn login_page_html(admin: &Admin, username: &str, error: Option<&str>) -> Result<axum::response::Html<String>, AdminError> {
    page(
        admin,
        "login.html",
        LoginPage {
            chrome: Chrome::new(admin, false),
            action: admin.login_url(),
            username,
            error,
        },
    )
}

pub async fn login_page(State(admin): State<Admin>, headers: HeaderMap) -> Result<Response, AdminError> {
    if session_token(&headers).and_then(|t| admin.sessions().get(&t)).is_some() {
        return Ok(Redirect::to(&admin.index_url()).into_response());
    }
    Ok(login_page_html(&admin, "", None)?.into_response())
}

pub async fn login(State(admin): State<Admin>, Form(form): Form<LoginForm>) -> Result<Response, AdminError> {
    if !admin.check_credentials(&form.username, &form.password) {
        tracing::warn!(username = %form.username, "admin login failed");
        let html = login_page_html(&admin, &form.username, Some("Invalid username or password."))?;
        return Ok((StatusCode::UNAUTHORIZED, html).into_response());
    }
    let purged = admin.sessions().purge_expired();
    if purged > 0 {
        tracing::debug!(purged, "expired admin sessions dropped");
    }
    let session = admin.sessions().create(&form.username);
    tracing::info!(username = %session.username, "admin login");
    let max_age = (session.expires_at - session.created_at).num_seconds().max(0);
    let cookie = format!(
        "{}={}; Path={}; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        session.token,
        cookie_path(&admin),
        max_age
    );
    Ok(([(SET_COOKIE, cookie)], Redirect::to(&admin.index_url())).into_response())
}

pub async fn logout(State(admin): State<Admin>, headers: HeaderMap) -> Response {
    if let Some(session) = session_token(&headers).and_then(|t| admin.sessions().remove(&t)) {
        tracing::info!(username = %session.username, "admin logout");
    }
    let cookie = format!(
        "{}=; Path={}; HttpOnly; SameSite=Lax; Max-Age=0",
        SESSION_COOKIE,
        cookie_path(&admin)
    );
    ([(SET_COOKIE, cookie)], Redirect::to(&admin.login_url())).into_response()
}
