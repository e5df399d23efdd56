//! Admin registry: the single shared object holding configuration, storage pool,
//! page templates, sessions, and every registered model and group.

mod config;

pub use config::{AdminConfig, NameTransform};

use crate::case::slugify;
use crate::error::{ConfigError, RegistrationError};
use crate::group::ModelGroup;
use crate::model::Model;
use crate::session::SessionStore;
use crate::templates::Templates;
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub(crate) fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) struct GroupEntry {
    pub(crate) name: String,
    pub(crate) slug: String,
    pub(crate) models: Vec<Arc<Model>>,
}

/// Snapshot of one group, in registration order.
#[derive(Clone, Debug)]
pub struct GroupSummary {
    pub name: String,
    pub slug: String,
    pub models: Vec<Arc<Model>>,
}

pub(crate) struct AdminInner {
    pub(crate) config: AdminConfig,
    pub(crate) root: String,
    pub(crate) pool: PgPool,
    pub(crate) templates: Templates,
    pub(crate) sessions: SessionStore,
    pub(crate) models: RwLock<HashMap<String, Arc<Model>>>,
    pub(crate) groups: RwLock<Vec<GroupEntry>>,
}

impl AdminInner {
    /// Publish `model` under its slug and list it in group `group_index`.
    /// Lock order: models, then groups.
    pub(crate) fn insert_model(
        &self,
        group_index: usize,
        model: Model,
        replace: bool,
    ) -> Result<Arc<Model>, RegistrationError> {
        let model = Arc::new(model);
        let slug = model.slug().to_string();
        let mut models = write(&self.models);
        if !replace && models.contains_key(&slug) {
            return Err(RegistrationError::DuplicateSlug {
                model: model.name().to_string(),
                slug,
            });
        }
        let previous = models.insert(slug.clone(), Arc::clone(&model));

        let mut groups = write(&self.groups);
        let mut placed = false;
        if previous.is_some() {
            for (i, group) in groups.iter_mut().enumerate() {
                match group.models.iter().position(|m| m.slug() == slug) {
                    Some(pos) if i == group_index => {
                        group.models[pos] = Arc::clone(&model);
                        placed = true;
                    }
                    Some(pos) => {
                        group.models.remove(pos);
                    }
                    None => {}
                }
            }
        }
        if !placed {
            if let Some(group) = groups.get_mut(group_index) {
                group.models.push(Arc::clone(&model));
            }
        }

        tracing::info!(
            slug = %slug,
            table = %model.table_name(),
            fields = model.fields().len(),
            replaced = previous.is_some(),
            "model registered"
        );
        Ok(model)
    }
}

/// Cheap to clone; every clone shares the same registry.
#[derive(Clone)]
pub struct Admin {
    inner: Arc<AdminInner>,
}

impl Admin {
    /// Validate credentials, load page templates and open a lazily connecting pool.
    pub fn setup(config: AdminConfig) -> Result<Admin, ConfigError> {
        config.check_credentials_present()?;
        if config.database_url.trim().is_empty() {
            return Err(ConfigError::MissingDatabaseUrl);
        }
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_lazy(&config.database_url)?;
        Self::with_pool(config, pool)
    }

    /// Like [`Admin::setup`] with a pool the host application already owns.
    pub fn with_pool(mut config: AdminConfig, pool: PgPool) -> Result<Admin, ConfigError> {
        config.check_credentials_present()?;
        if config.title.trim().is_empty() {
            config.title = AdminConfig::default().title;
        }
        let templates = Templates::load(config.templates_dir.as_deref())?;
        let root = config.root_path();
        let sessions = SessionStore::new(config.session_ttl);
        tracing::info!(path = %root, title = %config.title, "admin ready");
        Ok(Admin {
            inner: Arc::new(AdminInner {
                config,
                root,
                pool,
                templates,
                sessions,
                models: RwLock::new(HashMap::new()),
                groups: RwLock::new(Vec::new()),
            }),
        })
    }

    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    pub fn title(&self) -> &str {
        &self.inner.config.title
    }

    /// Mount path without trailing slash (empty when mounted at `/`).
    pub fn root_path(&self) -> &str {
        &self.inner.root
    }

    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.inner.sessions
    }

    pub(crate) fn templates(&self) -> &Templates {
        &self.inner.templates
    }

    /// Create a named group. Groups are listed on the index page in creation order.
    pub fn group(&self, name: &str) -> ModelGroup {
        let slug = slugify(name);
        let mut groups = write(&self.inner.groups);
        groups.push(GroupEntry {
            name: name.to_string(),
            slug: slug.clone(),
            models: Vec::new(),
        });
        ModelGroup::new(
            Arc::downgrade(&self.inner),
            groups.len() - 1,
            name.to_string(),
            slug,
        )
    }

    pub fn groups(&self) -> Vec<GroupSummary> {
        read(&self.inner.groups)
            .iter()
            .map(|g| GroupSummary {
                name: g.name.clone(),
                slug: g.slug.clone(),
                models: g.models.clone(),
            })
            .collect()
    }

    pub fn model(&self, slug: &str) -> Option<Arc<Model>> {
        read(&self.inner.models).get(slug).cloned()
    }

    /// Every registered model, ordered by slug.
    pub fn models(&self) -> Vec<Arc<Model>> {
        let mut models: Vec<Arc<Model>> = read(&self.inner.models).values().cloned().collect();
        models.sort_by(|a, b| a.slug().cmp(b.slug()));
        models
    }

    /// `{root}/model/{slug}{action}`, or `{root}/` when `slug` is not registered.
    pub fn model_url(&self, slug: &str, action: &str) -> String {
        if !read(&self.inner.models).contains_key(slug) {
            return self.index_url();
        }
        format!("{}/model/{}{}", self.inner.root, slug, action)
    }

    pub fn index_url(&self) -> String {
        format!("{}/", self.inner.root)
    }

    pub fn login_url(&self) -> String {
        format!("{}/login/", self.inner.root)
    }

    pub fn logout_url(&self) -> String {
        format!("{}/logout/", self.inner.root)
    }

    pub fn check_credentials(&self, username: &str, password: &str) -> bool {
        let config = &self.inner.config;
        config.username == username && config.password == password
    }

    /// Router serving the admin pages, to be nested under [`Admin::root_path`] or merged as is.
    pub fn router(&self) -> Router {
        crate::routes::admin_routes(self.clone())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::schema::{Attribute, AttributeKind, AdminModel};

    pub(crate) fn admin() -> Admin {
        Admin::setup(AdminConfig::new("admin", "secret", "postgres://localhost/admin_test")).unwrap()
    }

    pub(crate) struct Post;

    impl AdminModel for Post {
        fn attributes() -> Vec<Attribute> {
            vec![
                Attribute::new("Title", AttributeKind::Str, "list,required"),
                Attribute::new("Body", AttributeKind::Str, "textarea"),
            ]
        }
    }

    struct OtherPost;

    impl AdminModel for OtherPost {
        fn attributes() -> Vec<Attribute> {
            vec![Attribute::new("Heading", AttributeKind::Str, "")]
        }

        fn admin_name(&self) -> Option<String> {
            Some("Post".into())
        }
    }

    struct Tag;

    impl AdminModel for Tag {
        fn attributes() -> Vec<Attribute> {
            vec![Attribute::new("Name", AttributeKind::Str, "list")]
        }
    }

    #[tokio::test]
    async fn setup_requires_credentials() {
        let missing = Admin::setup(AdminConfig::new("admin", "", "postgres://localhost/x"));
        assert!(matches!(missing, Err(ConfigError::MissingCredentials)));
        let no_db = Admin::setup(AdminConfig::new("admin", "pw", " "));
        assert!(matches!(no_db, Err(ConfigError::MissingDatabaseUrl)));
    }

    #[tokio::test]
    async fn registered_models_are_found_by_slug() {
        let admin = admin();
        let blog = admin.group("Blog");
        blog.register_model(Post).unwrap();
        blog.register_model(Tag).unwrap();

        assert_eq!(admin.model("post").map(|m| m.name().to_string()).as_deref(), Some("Post"));
        assert!(admin.model("missing").is_none());
        let slugs: Vec<String> = admin.models().iter().map(|m| m.slug().to_string()).collect();
        assert_eq!(slugs, vec!["post", "tag"]);
    }

    #[tokio::test]
    async fn model_url_falls_back_to_the_root() {
        let admin = admin();
        admin.group("Blog").register_model(Post).unwrap();
        assert_eq!(admin.model_url("post", "/"), "/admin/model/post/");
        assert_eq!(admin.model_url("post", "/edit/3/"), "/admin/model/post/edit/3/");
        assert_eq!(admin.model_url("nope", "/"), "/admin/");
    }

    #[tokio::test]
    async fn groups_keep_creation_and_registration_order() {
        let admin = admin();
        let blog = admin.group("Blog Stuff");
        let meta = admin.group("Meta");
        meta.register_model(Tag).unwrap();
        blog.register_model(Post).unwrap();

        let groups = admin.groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].slug, "blog-stuff");
        assert_eq!(groups[0].models[0].slug(), "post");
        assert_eq!(groups[1].name, "Meta");
        assert_eq!(groups[1].models[0].slug(), "tag");
    }

    #[tokio::test]
    async fn duplicate_slug_is_rejected_and_replace_overrides() {
        let admin = admin();
        let blog = admin.group("Blog");
        let other = admin.group("Other");
        blog.register_model(Post).unwrap();
        blog.register_model(Tag).unwrap();

        let err = other.register_model(OtherPost).unwrap_err();
        assert!(matches!(err, RegistrationError::DuplicateSlug { ref slug, .. } if slug == "post"));
        assert_eq!(admin.model("post").unwrap().field_names(), vec!["Title", "Body"]);

        blog.replace_model(OtherPost).unwrap();
        assert_eq!(admin.model("post").unwrap().field_names(), vec!["Heading"]);
        let groups = admin.groups();
        let slugs: Vec<&str> = groups[0].models.iter().map(|m| m.slug()).collect();
        assert_eq!(slugs, vec!["post", "tag"]);
        assert_eq!(groups[0].models[0].field_names(), vec!["Heading"]);

        other.replace_model(Post).unwrap();
        let groups = admin.groups();
        assert_eq!(groups[0].models.len(), 1);
        assert_eq!(groups[1].models[0].field_names(), vec!["Title", "Body"]);
    }

    #[tokio::test]
    async fn credentials_are_compared_exactly() {
        let admin = admin();
        assert!(admin.check_credentials("admin", "secret"));
        assert!(!admin.check_credentials("admin", "Secret"));
        assert!(!admin.check_credentials("", ""));
    }

    #[tokio::test]
    async fn root_mount_produces_slash_urls() {
        let admin = Admin::setup(
            AdminConfig::new("admin", "secret", "postgres://localhost/x").with_path("/"),
        )
        .unwrap();
        assert_eq!(admin.root_path(), "");
        assert_eq!(admin.index_url(), "/");
        assert_eq!(admin.login_url(), "/login/");
    }
}
