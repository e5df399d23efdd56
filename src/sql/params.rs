//! Typed bind values produced by fields and bound by the CRUD service.

use chrono::NaiveDateTime;
use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::Database;

/// A value that can be bound to a PostgreSQL query. Nulls keep their column type so
/// the server never sees an untyped parameter.
#[derive(Clone, Debug, PartialEq)]
pub enum PgBindValue {
    Text(Option<String>),
    I64(Option<i64>),
    F64(Option<f64>),
    Bool(Option<bool>),
    Timestamp(Option<NaiveDateTime>),
}

impl PgBindValue {
    pub fn is_null(&self) -> bool {
        match self {
            PgBindValue::Text(v) => v.is_none(),
            PgBindValue::I64(v) => v.is_none(),
            PgBindValue::F64(v) => v.is_none(),
            PgBindValue::Bool(v) => v.is_none(),
            PgBindValue::Timestamp(v) => v.is_none(),
        }
    }
}

impl<'q> Encode<'q, Postgres> for PgBindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        match self {
            PgBindValue::Text(v) => <Option<String> as Encode<Postgres>>::encode_by_ref(v, buf),
            PgBindValue::I64(v) => <Option<i64> as Encode<Postgres>>::encode_by_ref(v, buf),
            PgBindValue::F64(v) => <Option<f64> as Encode<Postgres>>::encode_by_ref(v, buf),
            PgBindValue::Bool(v) => <Option<bool> as Encode<Postgres>>::encode_by_ref(v, buf),
            PgBindValue::Timestamp(v) => {
                <Option<NaiveDateTime> as Encode<Postgres>>::encode_by_ref(v, buf)
            }
        }
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        Some(match self {
            PgBindValue::Text(_) => <String as sqlx::Type<Postgres>>::type_info(),
            PgBindValue::I64(_) => <i64 as sqlx::Type<Postgres>>::type_info(),
            PgBindValue::F64(_) => <f64 as sqlx::Type<Postgres>>::type_info(),
            PgBindValue::Bool(_) => <bool as sqlx::Type<Postgres>>::type_info(),
            PgBindValue::Timestamp(_) => <NaiveDateTime as sqlx::Type<Postgres>>::type_info(),
        })
    }
}

impl sqlx::Type<Postgres> for PgBindValue {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("TEXT")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_the_column_type_even_for_nulls() {
        let null_int = PgBindValue::I64(None);
        assert!(null_int.is_null());
        assert_eq!(null_int.produces(), Some(<i64 as sqlx::Type<Postgres>>::type_info()));
        assert!(!PgBindValue::Text(Some("x".into())).is_null());
    }
}
