//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use std::path::PathBuf;
use thiserror::Error;

/// Syntax errors in a declarative `key=value,key` annotation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TagError {
    #[error("malformed annotation: empty token at position {position}")]
    EmptyToken { position: usize },
    #[error("malformed annotation: token '{token}' has an empty key")]
    EmptyKey { token: String },
    #[error("malformed annotation: token '{token}' has an empty value")]
    EmptyValue { token: String },
    #[error("malformed annotation: token '{token}' has more than one '='")]
    UnbalancedToken { token: String },
    #[error("malformed annotation: duplicate key '{key}'")]
    DuplicateKey { key: String },
}

/// A field variant rejected one of its options.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldConfigError {
    #[error("option '{option}': invalid value '{value}': {reason}")]
    InvalidOption {
        option: String,
        value: String,
        reason: String,
    },
    #[error("options '{lower}' and '{upper}' describe an empty range")]
    EmptyRange { lower: String, upper: String },
}

impl FieldConfigError {
    pub(crate) fn invalid(option: &str, value: &str, reason: impl Into<String>) -> Self {
        FieldConfigError::InvalidOption {
            option: option.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Registration of a record type failed. Carries the model and, where relevant, the attribute at fault.
#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("model {model}: attribute {attribute}: {source}")]
    MalformedAnnotation {
        model: String,
        attribute: String,
        #[source]
        source: TagError,
    },
    #[error("model {model}: attribute {attribute}: {source}")]
    FieldConfiguration {
        model: String,
        attribute: String,
        #[source]
        source: FieldConfigError,
    },
    #[error("model {model}: slug '{slug}' is already registered")]
    DuplicateSlug { model: String, slug: String },
    #[error("model {model}: display name produces an empty slug")]
    EmptySlug { model: String },
    #[error("model {model}: admin registry has been dropped")]
    RegistryDropped { model: String },
}

impl RegistrationError {
    pub fn model(&self) -> &str {
        match self {
            RegistrationError::MalformedAnnotation { model, .. }
            | RegistrationError::FieldConfiguration { model, .. }
            | RegistrationError::DuplicateSlug { model, .. }
            | RegistrationError::EmptySlug { model }
            | RegistrationError::RegistryDropped { model } => model,
        }
    }

    /// Attribute at fault, for annotation and configuration failures.
    pub fn attribute(&self) -> Option<&str> {
        match self {
            RegistrationError::MalformedAnnotation { attribute, .. }
            | RegistrationError::FieldConfiguration { attribute, .. } => Some(attribute),
            _ => None,
        }
    }
}

/// Setup prerequisites that are missing or broken.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("username and/or password is missing")]
    MissingCredentials,
    #[error("database url is missing")]
    MissingDatabaseUrl,
    #[error("invalid setting {key}: {reason}")]
    InvalidSetting { key: &'static str, reason: String },
    #[error("template {name}: {source}")]
    Template {
        name: String,
        #[source]
        source: minijinja::Error,
    },
    #[error("template directory {}: {source}", path.display())]
    TemplateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("storage: {0}")]
    Storage(#[from] sqlx::Error),
}

/// Request-level failures raised by the admin handlers.
#[derive(Error, Debug)]
pub enum AdminError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("storage: {0}")]
    Storage(#[from] sqlx::Error),
    #[error("template: {0}")]
    Template(#[from] minijinja::Error),
    #[error("render: {0}")]
    Render(#[from] std::fmt::Error),
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let status = match &self {
            AdminError::NotFound(_) => StatusCode::NOT_FOUND,
            AdminError::Storage(e) => {
                if let sqlx::Error::RowNotFound = e {
                    StatusCode::NOT_FOUND
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }
            AdminError::Template(_) | AdminError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "admin request failed");
        }
        let message = html_escape::encode_text(&self.to_string()).into_owned();
        let body = format!(
            "<!doctype html><title>{}</title><h1>{}</h1><p>{}</p>",
            status.as_u16(),
            status.canonical_reason().unwrap_or("error"),
            message
        );
        (status, Html(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn not_found_maps_to_404_with_escaped_message() {
        let res = AdminError::NotFound("model '<post>'".into()).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(body.contains("&lt;post&gt;"));
    }

    #[test]
    fn storage_and_render_failures_map_to_500_except_missing_rows() {
        assert_eq!(AdminError::from(sqlx::Error::RowNotFound).into_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AdminError::from(sqlx::Error::PoolTimedOut).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AdminError::from(std::fmt::Error).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
