//! CRUD execution against PostgreSQL for registered models.

use crate::error::AdminError;
use crate::model::Model;
use crate::sql::{count, delete, insert, select_by_id, select_list, update, PgBindValue, QueryBuf};
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{PgPool, Postgres, Row};

/// Rows per list page unless the request asks for another size.
pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const MAX_PAGE_SIZE: u32 = 500;

/// One list-view row: primary key plus cells aligned with the model's list fields.
#[derive(Clone, Debug, PartialEq)]
pub struct ListRow {
    pub id: i64,
    pub cells: Vec<Value>,
}

pub struct CrudService;

impl CrudService {
    pub async fn list(
        pool: &PgPool,
        model: &Model,
        limit: Option<u32>,
        offset: u64,
    ) -> Result<Vec<ListRow>, AdminError> {
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let q = select_list(model, limit, offset);
        let rows = Self::bound(&q).fetch_all(pool).await?;
        rows.iter()
            .map(|row| {
                let id: i64 = row.try_get(0)?;
                let cells = (1..row.len()).map(|i| cell_to_value(row, i)).collect();
                Ok(ListRow { id, cells })
            })
            .collect()
    }

    pub async fn count(pool: &PgPool, model: &Model) -> Result<i64, AdminError> {
        let q = count(model);
        let row = Self::bound(&q).fetch_one(pool).await?;
        Ok(row.try_get(0)?)
    }

    /// Every field value of one row, in field order. `None` when the id does not exist.
    pub async fn read(pool: &PgPool, model: &Model, id: i64) -> Result<Option<Vec<Value>>, AdminError> {
        let q = select_by_id(model, id);
        let row = Self::bound(&q).fetch_optional(pool).await?;
        Ok(row.map(|row| {
            (0..model.fields().len())
                .map(|i| cell_to_value(&row, i))
                .collect()
        }))
    }

    /// Insert one row from values aligned with the model's fields. Returns the new id.
    pub async fn create(pool: &PgPool, model: &Model, values: &[PgBindValue]) -> Result<i64, AdminError> {
        let q = insert(model, values);
        let row = Self::bound(&q).fetch_one(pool).await?;
        Ok(row.try_get(0)?)
    }

    /// Returns false when no row has this id.
    pub async fn update(
        pool: &PgPool,
        model: &Model,
        id: i64,
        values: &[PgBindValue],
    ) -> Result<bool, AdminError> {
        let q = update(model, id, values);
        let row = Self::bound(&q).fetch_optional(pool).await?;
        Ok(row.is_some())
    }

    /// Returns false when no row has this id.
    pub async fn delete(pool: &PgPool, model: &Model, id: i64) -> Result<bool, AdminError> {
        let q = delete(model, id);
        let row = Self::bound(&q).fetch_optional(pool).await?;
        Ok(row.is_some())
    }

    fn bound(q: &QueryBuf) -> Query<'_, Postgres, PgArguments> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        query
    }
}

/// Decode one cell into JSON, trying the column types admin tables use.
fn cell_to_value(row: &PgRow, idx: usize) -> Value {
    if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(idx) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i32>, _>(idx) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i16>, _>(idx) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<f64>, _>(idx) {
        if let Some(n) = serde_json::Number::from_f64(n) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(n)) = row.try_get::<Option<f32>, _>(idx) {
        if let Some(n) = serde_json::Number::from_f64(n as f64) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(b)) = row.try_get::<Option<bool>, _>(idx) {
        return Value::Bool(b);
    }
    if let Ok(Some(u)) = row.try_get::<Option<uuid::Uuid>, _>(idx) {
        return Value::String(u.to_string());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(idx) {
        return Value::String(d.to_rfc3339());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDateTime>, _>(idx) {
        return Value::String(d.format("%Y-%m-%dT%H:%M:%S%.f").to_string());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDate>, _>(idx) {
        return Value::String(d.format("%Y-%m-%d").to_string());
    }
    if let Ok(Some(s)) = row.try_get::<Option<String>, _>(idx) {
        return Value::String(s);
    }
    if let Ok(Some(j)) = row.try_get::<Option<Value>, _>(idx) {
        return j;
    }
    Value::Null
}
