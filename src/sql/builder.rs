//! Builds parameterized SELECT, INSERT, UPDATE, DELETE from a registered model.

use crate::model::Model;
use crate::sql::PgBindValue;

/// Primary key column every admin table is expected to carry (bigint).
pub const PK_COLUMN: &str = "id";

/// Quote identifier for PostgreSQL (safe: only from registered models).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn is_pk(column: &str) -> bool {
    column.eq_ignore_ascii_case(PK_COLUMN)
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<PgBindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: PgBindValue) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

/// Columns written on insert/update, paired with their values: the primary key is never written.
fn writable<'a>(model: &'a Model, values: &'a [PgBindValue]) -> impl Iterator<Item = (&'a str, &'a PgBindValue)> {
    model
        .fields()
        .iter()
        .map(|f| f.column_name())
        .zip(values)
        .filter(|(column, _)| !is_pk(column))
}

/// SELECT id and the list-view columns, ordered by id.
pub fn select_list(model: &Model, limit: u32, offset: u64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = vec![quoted(PK_COLUMN)];
    cols.extend(model.list_table_columns().iter().map(|c| quoted(c)));
    q.sql = format!(
        "SELECT {} FROM {} ORDER BY {} LIMIT {} OFFSET {}",
        cols.join(", "),
        quoted(model.table_name()),
        quoted(PK_COLUMN),
        limit,
        offset
    );
    q
}

/// SELECT every mapped column of one row, in field order.
pub fn select_by_id(model: &Model, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let cols: Vec<String> = model.table_columns().iter().map(|c| quoted(c)).collect();
    let n = q.push_param(PgBindValue::I64(Some(id)));
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ${}",
        if cols.is_empty() { quoted(PK_COLUMN) } else { cols.join(", ") },
        quoted(model.table_name()),
        quoted(PK_COLUMN),
        n
    );
    q
}

/// INSERT one row; `values` are positionally aligned with the model's fields. Returns the new id.
pub fn insert(model: &Model, values: &[PgBindValue]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for (column, value) in writable(model, values) {
        let n = q.push_param(value.clone());
        cols.push(quoted(column));
        placeholders.push(format!("${}", n));
    }
    let table = quoted(model.table_name());
    q.sql = if cols.is_empty() {
        format!("INSERT INTO {} DEFAULT VALUES RETURNING {}", table, quoted(PK_COLUMN))
    } else {
        format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            table,
            cols.join(", "),
            placeholders.join(", "),
            quoted(PK_COLUMN)
        )
    };
    q
}

/// UPDATE one row by id; `values` are positionally aligned with the model's fields.
pub fn update(model: &Model, id: i64, values: &[PgBindValue]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    for (column, value) in writable(model, values) {
        let n = q.push_param(value.clone());
        sets.push(format!("{} = ${}", quoted(column), n));
    }
    let table = quoted(model.table_name());
    let id_param = q.push_param(PgBindValue::I64(Some(id)));
    q.sql = if sets.is_empty() {
        format!("SELECT {} FROM {} WHERE {} = ${}", quoted(PK_COLUMN), table, quoted(PK_COLUMN), id_param)
    } else {
        format!(
            "UPDATE {} SET {} WHERE {} = ${} RETURNING {}",
            table,
            sets.join(", "),
            quoted(PK_COLUMN),
            id_param,
            quoted(PK_COLUMN)
        )
    };
    q
}

/// DELETE by id.
pub fn delete(model: &Model, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(PgBindValue::I64(Some(id)));
    q.sql = format!(
        "DELETE FROM {} WHERE {} = ${} RETURNING {}",
        quoted(model.table_name()),
        quoted(PK_COLUMN),
        n,
        quoted(PK_COLUMN)
    );
    q
}

/// SELECT count of rows, for list pagination.
pub fn count(model: &Model) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!("SELECT COUNT(*) FROM {}", quoted(model.table_name()));
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldKind;
    use crate::model::tests::model_with;
    use crate::schema::AttributeKind;

    fn post() -> Model {
        model_with(
            "posts",
            &[
                ("id", FieldKind::Integer, AttributeKind::Int, ""),
                ("title", FieldKind::Text, AttributeKind::Str, "list"),
                ("views", FieldKind::Integer, AttributeKind::Int, "list"),
                ("body", FieldKind::Text, AttributeKind::Str, ""),
            ],
        )
    }

    #[test]
    fn list_selects_id_then_list_columns() {
        let q = select_list(&post(), 50, 100);
        assert_eq!(
            q.sql,
            "SELECT \"id\", \"title\", \"views\" FROM \"posts\" ORDER BY \"id\" LIMIT 50 OFFSET 100"
        );
        assert!(q.params.is_empty());
    }

    #[test]
    fn read_selects_every_column_in_field_order() {
        let q = select_by_id(&post(), 7);
        assert_eq!(
            q.sql,
            "SELECT \"id\", \"title\", \"views\", \"body\" FROM \"posts\" WHERE \"id\" = $1"
        );
        assert_eq!(q.params, vec![PgBindValue::I64(Some(7))]);
    }

    #[test]
    fn insert_skips_the_primary_key() {
        let values = vec![
            PgBindValue::I64(None),
            PgBindValue::Text(Some("Hello".into())),
            PgBindValue::I64(Some(0)),
            PgBindValue::Text(None),
        ];
        let q = insert(&post(), &values);
        assert_eq!(
            q.sql,
            "INSERT INTO \"posts\" (\"title\", \"views\", \"body\") VALUES ($1, $2, $3) RETURNING \"id\""
        );
        assert_eq!(q.params, values[1..].to_vec());
    }

    #[test]
    fn update_binds_id_last() {
        let values = vec![
            PgBindValue::I64(Some(99)),
            PgBindValue::Text(Some("Hello".into())),
            PgBindValue::I64(Some(3)),
            PgBindValue::Text(Some("Body".into())),
        ];
        let q = update(&post(), 5, &values);
        assert_eq!(
            q.sql,
            "UPDATE \"posts\" SET \"title\" = $1, \"views\" = $2, \"body\" = $3 WHERE \"id\" = $4 RETURNING \"id\""
        );
        assert_eq!(q.params.last(), Some(&PgBindValue::I64(Some(5))));
    }

    #[test]
    fn identifiers_are_quoted() {
        let m = model_with("odd\"table", &[("na\"me", FieldKind::Text, AttributeKind::Str, "list")]);
        let q = delete(&m, 1);
        assert_eq!(
            q.sql,
            "DELETE FROM \"odd\"\"table\" WHERE \"id\" = $1 RETURNING \"id\""
        );
        let q = select_list(&m, 10, 0);
        assert!(q.sql.contains("\"na\"\"me\""));
    }
}
