//! Setup configuration: credentials, storage, mount path and naming policy.

use crate::case::to_snake_case;
use crate::error::ConfigError;
use crate::session::MAX_SESSION_TTL;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Maps record and attribute names to storage table and column names.
#[derive(Clone)]
pub struct NameTransform(Arc<dyn Fn(&str) -> String + Send + Sync>);

impl NameTransform {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        NameTransform(Arc::new(f))
    }

    /// `AuthorId` -> `author_id`.
    pub fn snake_case() -> Self {
        NameTransform::new(to_snake_case)
    }

    pub fn apply(&self, name: &str) -> String {
        (self.0)(name)
    }
}

impl fmt::Debug for NameTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NameTransform(..)")
    }
}

#[derive(Clone)]
pub struct AdminConfig {
    /// Mount path, e.g. `/admin`. Empty mounts at the site root.
    pub path: String,
    pub title: String,
    pub username: String,
    pub password: String,
    pub database_url: String,
    pub max_connections: u32,
    /// Directory whose `*.html` files override the bundled page templates.
    pub templates_dir: Option<PathBuf>,
    pub session_ttl: Duration,
    pub name_transform: Option<NameTransform>,
}

impl fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminConfig")
            .field("path", &self.path)
            .field("title", &self.title)
            .field("username", &self.username)
            .field("password", &"***")
            .field("max_connections", &self.max_connections)
            .field("templates_dir", &self.templates_dir)
            .field("session_ttl", &self.session_ttl)
            .field("name_transform", &self.name_transform)
            .finish_non_exhaustive()
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        AdminConfig {
            path: "/admin".into(),
            title: "Admin".into(),
            username: String::new(),
            password: String::new(),
            database_url: String::new(),
            max_connections: 5,
            templates_dir: None,
            session_ttl: Duration::from_secs(24 * 60 * 60),
            name_transform: None,
        }
    }
}

impl AdminConfig {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        database_url: impl Into<String>,
    ) -> Self {
        AdminConfig {
            username: username.into(),
            password: password.into(),
            database_url: database_url.into(),
            ..AdminConfig::default()
        }
    }

    /// Read `ADMIN_USERNAME`, `ADMIN_PASSWORD`, `DATABASE_URL`, `ADMIN_PATH`, `ADMIN_TITLE`,
    /// `ADMIN_TEMPLATES_DIR`, `ADMIN_SESSION_TTL_SECS` and `ADMIN_NAME_TRANSFORM` (`snake_case` or `none`).
    /// Missing credentials are reported by [`crate::Admin::setup`], not here.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AdminConfig::new(
            lookup("ADMIN_USERNAME").unwrap_or_default(),
            lookup("ADMIN_PASSWORD").unwrap_or_default(),
            lookup("DATABASE_URL").unwrap_or_else(|| "postgres://localhost/architect".into()),
        );
        if let Some(path) = lookup("ADMIN_PATH") {
            config.path = path;
        }
        if let Some(title) = lookup("ADMIN_TITLE") {
            config.title = title;
        }
        config.templates_dir = lookup("ADMIN_TEMPLATES_DIR").map(PathBuf::from);
        if let Some(raw) = lookup("ADMIN_SESSION_TTL_SECS") {
            let secs: u64 = raw.parse().map_err(|_| ConfigError::InvalidSetting {
                key: "ADMIN_SESSION_TTL_SECS",
                reason: format!("'{}' is not a number of seconds", raw),
            })?;
            if Duration::from_secs(secs) > MAX_SESSION_TTL {
                return Err(ConfigError::InvalidSetting {
                    key: "ADMIN_SESSION_TTL_SECS",
                    reason: format!("{} seconds exceeds the {} second limit", secs, MAX_SESSION_TTL.as_secs()),
                });
            }
            config.session_ttl = Duration::from_secs(secs);
        }
        config.name_transform = match lookup("ADMIN_NAME_TRANSFORM").as_deref() {
            None | Some("none") => None,
            Some("snake_case") => Some(NameTransform::snake_case()),
            Some(other) => {
                return Err(ConfigError::InvalidSetting {
                    key: "ADMIN_NAME_TRANSFORM",
                    reason: format!("unknown transform '{}' (expected snake_case or none)", other),
                })
            }
        };
        Ok(config)
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_templates_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.templates_dir = Some(dir.into());
        self
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    pub fn with_max_connections(mut self, n: u32) -> Self {
        self.max_connections = n;
        self
    }

    pub fn with_name_transform(mut self, transform: NameTransform) -> Self {
        self.name_transform = Some(transform);
        self
    }

    pub(crate) fn check_credentials_present(&self) -> Result<(), ConfigError> {
        if self.username.is_empty() || self.password.is_empty() {
            return Err(ConfigError::MissingCredentials);
        }
        Ok(())
    }

    /// Mount path without a trailing slash; always starts with `/` unless empty.
    pub fn root_path(&self) -> String {
        let trimmed = self.path.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else if trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{}", trimmed)
        }
    }
}
