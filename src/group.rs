//! Model groups: named sections of the index page that own registration.

use crate::admin::AdminInner;
use crate::error::RegistrationError;
use crate::model::Model;
use crate::schema::{type_display_name, AdminModel};
use std::sync::{Arc, Weak};

/// Handle returned by [`crate::Admin::group`]. Holds a weak back-reference,
/// so a group never keeps the registry alive.
#[derive(Clone, Debug)]
pub struct ModelGroup {
    admin: Weak<AdminInner>,
    index: usize,
    name: String,
    slug: String,
}

impl ModelGroup {
    pub(crate) fn new(admin: Weak<AdminInner>, index: usize, name: String, slug: String) -> Self {
        ModelGroup {
            admin,
            index,
            name,
            slug,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Derive a model from `instance`'s type and publish it under its slug.
    /// Fails on a slug already taken; nothing is published when any attribute fails.
    pub fn register_model<M: AdminModel>(&self, instance: M) -> Result<Arc<Model>, RegistrationError> {
        self.register(instance, false)
    }

    /// Like [`ModelGroup::register_model`], replacing any model already holding the slug.
    pub fn replace_model<M: AdminModel>(&self, instance: M) -> Result<Arc<Model>, RegistrationError> {
        self.register(instance, true)
    }

    fn register<M: AdminModel>(&self, instance: M, replace: bool) -> Result<Arc<Model>, RegistrationError> {
        let admin = self
            .admin
            .upgrade()
            .ok_or_else(|| RegistrationError::RegistryDropped {
                model: type_display_name::<M>().to_string(),
            })?;
        let model = Model::from_record(instance, admin.config.name_transform.as_ref())?;
        admin.insert_model(self.index, model, replace)
    }

    /// Models of this group in registration order; empty once the registry is gone.
    pub fn models(&self) -> Vec<Arc<Model>> {
        let Some(admin) = self.admin.upgrade() else {
            return Vec::new();
        };
        let groups = crate::admin::read(&admin.groups);
        groups
            .get(self.index)
            .map(|g| g.models.clone())
            .unwrap_or_default()
    }
}
