//! Architect Admin: embeddable admin interface generated from annotated record types.
//!
//! Record types describe their attributes through [`AdminModel`] (usually via
//! `#[derive(AdminModel)]`), get registered into a [`ModelGroup`] of an [`Admin`],
//! and are then served as list/create/edit/delete pages backed by PostgreSQL.

extern crate self as architect_admin;

pub mod admin;
pub mod case;
pub mod error;
pub mod extractors;
pub mod field;
pub mod group;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod schema;
pub mod service;
pub mod session;
pub mod sql;
pub mod tag;
pub mod templates;

pub use admin::{Admin, AdminConfig, GroupSummary, NameTransform};
pub use error::{AdminError, ConfigError, FieldConfigError, RegistrationError, TagError};
pub use field::{AdminField, Field, FieldAttrs, FieldKind, RenderMode};
pub use group::ModelGroup;
pub use model::Model;
pub use schema::{AdminModel, Attribute, AttributeKind};
pub use service::CrudService;
pub use session::{Session, SessionStore};
pub use tag::{parse_tag, TagMap};

/// Derive [`AdminModel`] for a struct with named fields.
pub use architect_admin_derive::AdminModel;
