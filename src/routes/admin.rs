//! Admin routes, mounted with the configured root prefix already applied.
//! The host merges the result into its own router.

use crate::admin::Admin;
use crate::handlers::auth::{login, login_page, logout};
use crate::handlers::index::index;
use crate::handlers::model::{create, delete, edit_form, list, new_form, update};
use axum::{
    response::Redirect,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;

/// Largest accepted form body.
pub const MAX_FORM_BYTES: usize = 1024 * 1024;

pub fn admin_routes(admin: Admin) -> Router {
    let root = admin.root_path().to_string();
    let index_url = admin.index_url();
    let mut router = Router::new()
        .route(&format!("{}/", root), get(index))
        .route(&format!("{}/login/", root), get(login_page).post(login))
        .route(&format!("{}/logout/", root), get(logout).post(logout))
        .route(&format!("{}/model/:slug/", root), get(list))
        .route(&format!("{}/model/:slug/new/", root), get(new_form).post(create))
        .route(&format!("{}/model/:slug/edit/:id/", root), get(edit_form).post(update))
        .route(&format!("{}/model/:slug/delete/:id/", root), post(delete));
    if !root.is_empty() {
        router = router.route(&root, get(move || async move { Redirect::permanent(&index_url) }));
    }
    router
        .layer(ServiceBuilder::new().layer(RequestBodyLimitLayer::new(MAX_FORM_BYTES)))
        .with_state(admin)
}
