//! Form submission checks against the model's field rules.

use crate::model::Model;
use crate::sql::PgBindValue;
use serde_json::Value;
use std::collections::HashMap;

/// Per-field error messages, positionally aligned with the model's fields.
pub type FieldErrors = Vec<Option<String>>;

pub struct FormValidator;

impl FormValidator {
    /// Align submitted form pairs with the model's fields; absent inputs become null.
    pub fn collect(model: &Model, form: &HashMap<String, String>) -> Vec<Value> {
        model
            .fields()
            .iter()
            .map(|f| match form.get(f.name()) {
                Some(v) => Value::String(v.clone()),
                None => Value::Null,
            })
            .collect()
    }

    /// Validate every field and convert to bind values. On failure every field's error is reported, not just the first.
    pub fn validate(model: &Model, values: &[Value]) -> Result<Vec<PgBindValue>, FieldErrors> {
        let mut binds = Vec::with_capacity(values.len());
        let mut errors: FieldErrors = Vec::with_capacity(values.len());
        for (field, value) in model.fields().iter().zip(values) {
            let checked = field
                .validate_value(value)
                .and_then(|_| field.to_bind(value));
            match checked {
                Ok(bind) => {
                    binds.push(bind);
                    errors.push(None);
                }
                Err(e) => errors.push(Some(e)),
            }
        }
        if errors.iter().any(Option::is_some) {
            return Err(errors);
        }
        Ok(binds)
    }
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
                ("Title", FieldKind::Text, AttributeKind::Str, "required,maxlength=10"),
                ("Views", FieldKind::Integer, AttributeKind::Int, "min=0"),
                ("Link", FieldKind::Url, AttributeKind::Str, ""),
            ],
        )
    }

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn collect_aligns_with_fields() {
        let values = FormValidator::collect(&post(), &form(&[("Views", "3"), ("Title", "Hi"), ("Extra", "x")]));
        assert_eq!(values, vec![Value::from("Hi"), Value::from("3"), Value::Null]);
    }

    #[test]
    fn valid_submission_yields_typed_binds() {
        let m = post();
        let values = FormValidator::collect(&m, &form(&[("Title", "Hi"), ("Views", "3"), ("Link", "")]));
        let binds = FormValidator::validate(&m, &values).unwrap();
        assert_eq!(
            binds,
            vec![
                PgBindValue::Text(Some("Hi".into())),
                PgBindValue::I64(Some(3)),
                PgBindValue::Text(None),
            ]
        );
    }

    #[test]
    fn every_failing_field_is_reported() {
        let m = post();
        let values = FormValidator::collect(&m, &form(&[("Title", ""), ("Views", "-1"), ("Link", "https://ok.example")]));
        let errors = FormValidator::validate(&m, &values).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0].as_deref(), Some("Title is required"));
        assert!(errors[1].is_some());
        assert!(errors[2].is_none());
    }
}
