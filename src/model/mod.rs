//! Registered model: the derived schema of one record type plus the projections
//! the list/edit handlers need.
//!
//! A model is built once by [`Model::from_record`] and never mutated afterwards,
//! so request handlers share it through `Arc<Model>` without locking.

mod register;

use crate::field::{AdminField, Field, RenderMode};
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

pub struct Model {
    name: String,
    slug: String,
    table_name: String,
    fields: Vec<Field>,
    /// Reflection anchor; never mutated.
    instance: Arc<dyn Any + Send + Sync>,
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("name", &self.name)
            .field("slug", &self.slug)
            .field("table_name", &self.table_name)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

impl Model {
    pub(crate) fn new(
        name: String,
        slug: String,
        table_name: String,
        fields: Vec<Field>,
        instance: Arc<dyn Any + Send + Sync>,
    ) -> Self {
        Model {
            name,
            slug,
            table_name,
            fields,
            instance,
        }
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Fields in source declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// The instance given at registration, if it is a `T`.
    pub fn instance<T: Any>(&self) -> Option<&T> {
        self.instance.downcast_ref::<T>()
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name()).collect()
    }

    /// Storage columns in field order, for SELECT/INSERT/UPDATE column lists.
    pub fn table_columns(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.column_name()).collect()
    }

    /// Fields shown in list views. Both list projections go through this filter so they stay index-aligned.
    pub fn list_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.is_list())
    }

    pub fn list_labels(&self) -> Vec<&str> {
        self.list_fields().map(|f| f.label()).collect()
    }

    pub fn list_table_columns(&self) -> Vec<&str> {
        self.list_fields().map(|f| f.column_name()).collect()
    }

    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name() == name)
    }

    pub fn field_by_column(&self, column: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.column_name() == column)
    }

    /// Render every field as a form control. `values` and `errors` are positional.
    /// When `values` does not have one entry per field, the form is rendered empty (create mode).
    pub fn render_form(
        &self,
        out: &mut dyn fmt::Write,
        values: &[Value],
        errors: &[Option<String>],
    ) -> fmt::Result {
        let has_data = values.len() == self.fields.len();
        for (i, field) in self.fields.iter().enumerate() {
            let value = if has_data { values.get(i) } else { None };
            let error = errors.get(i).and_then(|e| e.as_deref());
            field.render(out, value, error, RenderMode::Form)?;
        }
        Ok(())
    }

    /// Render the list-view cells of one row. `values` are aligned with [`Model::list_fields`];
    /// a mismatched row renders empty cells.
    pub fn render_row(&self, out: &mut dyn fmt::Write, values: &[Value]) -> fmt::Result {
        let list_fields: Vec<&Field> = self.list_fields().collect();
        let has_data = values.len() == list_fields.len();
        for (i, field) in list_fields.into_iter().enumerate() {
            let value = if has_data { values.get(i) } else { None };
            field.render(out, value, None, RenderMode::Cell)?;
        }
        Ok(())
    }
}
