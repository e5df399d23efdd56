//! Registration pass: turns a record type's declared attributes into a [`Model`].

use super::Model;
use crate::admin::NameTransform;
use crate::case::slugify;
use crate::error::RegistrationError;
use crate::field::{AdminField, Field, FieldKind};
use crate::schema::{type_display_name, AdminModel};
use crate::tag::{parse_tag, SKIP};
use std::sync::Arc;

/// Suffix marking reference attributes as foreign-key columns.
pub const FOREIGN_KEY_SUFFIX: &str = "Id";

fn transformed(transform: Option<&NameTransform>, name: &str) -> String {
    match transform {
        Some(t) => t.apply(name),
        None => name.to_string(),
    }
}

impl Model {
    /// Derive the model for `instance`'s type. Runs once per type at startup.
    ///
    /// Any annotation or configuration failure aborts the whole model and names
    /// the attribute at fault; nothing is partially registered.
    pub fn from_record<M: AdminModel>(
        instance: M,
        transform: Option<&NameTransform>,
    ) -> Result<Model, RegistrationError> {
        let name = instance
            .admin_name()
            .unwrap_or_else(|| type_display_name::<M>().to_string());
        let table_name = match M::table_name() {
            Some(table) => table.to_string(),
            None => transformed(transform, &name),
        };
        let slug = slugify(&name);
        if slug.is_empty() {
            return Err(RegistrationError::EmptySlug { model: name });
        }

        let mut fields = Vec::new();
        for attr in M::attributes() {
            if attr.tag == SKIP {
                continue;
            }
            let options = parse_tag(attr.tag).map_err(|source| RegistrationError::MalformedAnnotation {
                model: name.clone(),
                attribute: attr.name.to_string(),
                source,
            })?;

            let field_name = if attr.kind.is_reference() {
                format!("{}{}", attr.name, FOREIGN_KEY_SUFFIX)
            } else {
                attr.name.to_string()
            };
            let column_name = transformed(transform, &field_name);

            let override_kind = options.get("Field");
            let kind = FieldKind::select(attr.kind, override_kind);
            if override_kind.is_none() && attr.kind.field_kind().is_none() {
                tracing::debug!(model = %name, attribute = attr.name, declared = ?attr.kind, "no dedicated field variant, using text");
            }

            let mut field = Field::new(kind, field_name.clone(), attr.kind);
            field
                .configure(&options)
                .map_err(|source| RegistrationError::FieldConfiguration {
                    model: name.clone(),
                    attribute: attr.name.to_string(),
                    source,
                })?;

            let attrs = field.attrs_mut();
            attrs.label = options
                .get("label")
                .map(str::to_string)
                .unwrap_or_else(|| field_name.clone());
            attrs.column_name = column_name;
            attrs.list = options.contains("list");
            fields.push(field);
        }

        Ok(Model::new(name, slug, table_name, fields, Arc::new(instance)))
    }
}
