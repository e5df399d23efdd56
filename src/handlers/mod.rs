//! HTTP handlers for the admin pages: login/logout, index, and per-model CRUD.

pub mod auth;
pub mod index;
pub mod model;

use crate::admin::Admin;
use crate::error::AdminError;
use axum::response::Html;
use serde::Serialize;

/// Values every page's `base.html` reads.
#[derive(Serialize)]
pub(crate) struct Chrome {
    title: String,
    index_url: String,
    logout_url: Option<String>,
}

impl Chrome {
    pub(crate) fn new(admin: &Admin, logged_in: bool) -> Self {
        Chrome {
            title: admin.title().to_string(),
            index_url: admin.index_url(),
            logout_url: logged_in.then(|| admin.logout_url()),
        }
    }
}

pub(crate) fn page<S: Serialize>(admin: &Admin, template: &str, ctx: S) -> Result<Html<String>, AdminError> {
    Ok(Html(admin.templates().render(template, ctx)?))
}
