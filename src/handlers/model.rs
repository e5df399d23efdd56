//! Per-model pages: paginated list, create/edit forms, delete.

use super::{page, Chrome};
use crate::admin::Admin;
use crate::error::AdminError;
use crate::extractors::AdminSession;
use crate::model::Model;
use crate::service::{CrudService, FieldErrors, FormValidator, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

fn lookup(admin: &Admin, slug: &str) -> Result<Arc<Model>, AdminError> {
    admin
        .model(slug)
        .ok_or_else(|| AdminError::NotFound(format!("model '{}'", slug)))
}

fn row_not_found(model: &Model, id: i64) -> AdminError {
    AdminError::NotFound(format!("{} #{}", model.name(), id))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Serialize)]
struct RowView {
    cells: String,
    edit_url: String,
}

#[derive(Serialize)]
struct ListPage {
    #[serde(flatten)]
    chrome: Chrome,
    model_name: String,
    new_url: String,
    labels: Vec<String>,
    rows: Vec<RowView>,
    page: u32,
    pages: u32,
    total: i64,
    prev_url: Option<String>,
    next_url: Option<String>,
}

/// Requested page clamped to the pages that exist, with its row offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PageWindow {
    current: u32,
    pages: u32,
    offset: u64,
}

impl PageWindow {
    fn new(total: i64, requested: Option<u32>, per_page: u32) -> Self {
        let per_page = per_page.max(1);
        let rows = u64::try_from(total).unwrap_or(0);
        let pages = u32::try_from(rows.div_ceil(u64::from(per_page)))
            .unwrap_or(u32::MAX)
            .max(1);
        let current = requested.unwrap_or(1).clamp(1, pages);
        PageWindow {
            current,
            pages,
            offset: u64::from(current - 1) * u64::from(per_page),
        }
    }
}

pub async fn list(
    State(admin): State<Admin>,
    _session: AdminSession,
    Path(slug): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Html<String>, AdminError> {
    let model = lookup(&admin, &slug)?;
    let per_page = params.per_page.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let total = CrudService::count(admin.pool(), &model).await?;
    let PageWindow { current, pages, offset } = PageWindow::new(total, params.page, per_page);

    let rows = CrudService::list(admin.pool(), &model, Some(per_page), offset).await?;
    let mut views = Vec::with_capacity(rows.len());
    for row in rows {
        let mut cells = String::new();
        model.render_row(&mut cells, &row.cells)?;
        views.push(RowView {
            cells,
            edit_url: admin.model_url(&slug, &format!("/edit/{}/", row.id)),
        });
    }

    let list_url = admin.model_url(&slug, "/");
    let page_url = |n: u32| format!("{}?page={}&per_page={}", list_url, n, per_page);
    page(
        &admin,
        "list.html",
        ListPage {
            chrome: Chrome::new(&admin, true),
            model_name: model.name().to_string(),
            new_url: admin.model_url(&slug, "/new/"),
            labels: model.list_labels().into_iter().map(str::to_string).collect(),
            rows: views,
            page: current,
            pages,
            total,
            prev_url: (current > 1).then(|| page_url(current - 1)),
            next_url: (current < pages).then(|| page_url(current + 1)),
        },
    )
}

#[derive(Serialize)]
struct EditPage {
    #[serde(flatten)]
    chrome: Chrome,
    model_name: String,
    heading: String,
    list_url: String,
    action: String,
    form: String,
    delete_url: Option<String>,
}

/// Render the edit page; `id` is `None` in create mode.
fn edit_page(
    admin: &Admin,
    model: &Model,
    id: Option<i64>,
    values: &[Value],
    errors: &[Option<String>],
) -> Result<Html<String>, AdminError> {
    let slug = model.slug();
    let mut form = String::new();
    model.render_form(&mut form, values, errors)?;
    let (heading, action, delete_url) = match id {
        Some(id) => (
            format!("Edit {} #{}", model.name(), id),
            admin.model_url(slug, &format!("/edit/{}/", id)),
            Some(admin.model_url(slug, &format!("/delete/{}/", id))),
        ),
        None => (
            format!("New {}", model.name()),
            admin.model_url(slug, "/new/"),
            None,
        ),
    };
    page(
        admin,
        "edit.html",
        EditPage {
            chrome: Chrome::new(admin, true),
            model_name: model.name().to_string(),
            heading,
            list_url: admin.model_url(slug, "/"),
            action,
            form,
            delete_url,
        },
    )
}

fn invalid(admin: &Admin, model: &Model, id: Option<i64>, values: &[Value], errors: &FieldErrors) -> Result<Response, AdminError> {
    tracing::debug!(
        model = %model.slug(),
        failed = errors.iter().filter(|e| e.is_some()).count(),
        "form rejected"
    );
    let html = edit_page(admin, model, id, values, errors)?;
    Ok((StatusCode::UNPROCESSABLE_ENTITY, html).into_response())
}

pub async fn new_form(
    State(admin): State<Admin>,
    _session: AdminSession,
    Path(slug): Path<String>,
) -> Result<Html<String>, AdminError> {
    let model = lookup(&admin, &slug)?;
    edit_page(&admin, &model, None, &[], &[])
}

pub async fn create(
    State(admin): State<Admin>,
    _session: AdminSession,
    Path(slug): Path<String>,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Response, AdminError> {
    let model = lookup(&admin, &slug)?;
    let values = FormValidator::collect(&model, &form);
    let binds = match FormValidator::validate(&model, &values) {
        Ok(binds) => binds,
        Err(errors) => return invalid(&admin, &model, None, &values, &errors),
    };
    let id = CrudService::create(admin.pool(), &model, &binds).await?;
    tracing::info!(model = %slug, id, "row created");
    Ok(Redirect::to(&admin.model_url(&slug, "/")).into_response())
}

pub async fn edit_form(
    State(admin): State<Admin>,
    _session: AdminSession,
    Path((slug, id)): Path<(String, i64)>,
) -> Result<Html<String>, AdminError> {
    let model = lookup(&admin, &slug)?;
    let values = CrudService::read(admin.pool(), &model, id)
        .await?
        .ok_or_else(|| row_not_found(&model, id))?;
    edit_page(&admin, &model, Some(id), &values, &[])
}

pub async fn update(
    State(admin): State<Admin>,
    _session: AdminSession,
    Path((slug, id)): Path<(String, i64)>,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Response, AdminError> {
    let model = lookup(&admin, &slug)?;
    let values = FormValidator::collect(&model, &form);
    let binds = match FormValidator::validate(&model, &values) {
        Ok(binds) => binds,
        Err(errors) => return invalid(&admin, &model, Some(id), &values, &errors),
    };
    if !CrudService::update(admin.pool(), &model, id, &binds).await? {
        return Err(row_not_found(&model, id));
    }
    tracing::info!(model = %slug, id, "row updated");
    Ok(Redirect::to(&admin.model_url(&slug, "/")).into_response())
}

pub async fn delete(
    State(admin): State<Admin>,
    _session: AdminSession,
    Path((slug, id)): Path<(String, i64)>,
) -> Result<Redirect, AdminError> {
    let model = lookup(&admin, &slug)?;
    if !CrudService::delete(admin.pool(), &model, id).await? {
        return Err(row_not_found(&model, id));
    }
    tracing::info!(model = %slug, id, "row deleted");
    Ok(Redirect::to(&admin.model_url(&slug, "/")))
}
