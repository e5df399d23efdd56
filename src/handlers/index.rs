//! Index page: every group with links to its models.

use super::{page, Chrome};
use crate::admin::Admin;
use crate::error::AdminError;
use crate::extractors::AdminSession;
use axum::{extract::State, response::Html};
use serde::Serialize;

#[derive(Serialize)]
struct ModelLink {
    name: String,
    url: String,
}

#[derive(Serialize)]
struct GroupView {
    name: String,
    slug: String,
    models: Vec<ModelLink>,
}

#[derive(Serialize)]
struct IndexPage {
    #[serde(flatten)]
    chrome: Chrome,
    groups: Vec<GroupView>,
}

pub async fn index(State(admin): State<Admin>, _session: AdminSession) -> Result<Html<String>, AdminError> {
    let groups = admin
        .groups()
        .into_iter()
        .map(|g| GroupView {
            models: g
                .models
                .iter()
                .map(|m| ModelLink {
                    name: m.name().to_string(),
                    url: admin.model_url(m.slug(), "/"),
                })
                .collect(),
            name: g.name,
            slug: g.slug,
        })
        .collect();
    page(
        &admin,
        "index.html",
        IndexPage {
            chrome: Chrome::new(&admin, true),
            groups,
        },
    )
}
