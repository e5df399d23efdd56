use super::html::{display_value, write_cell, write_form_field, write_input};
use super::{AdminField, FieldAttrs, RenderMode};
use crate::error::FieldConfigError;
use crate::tag::TagMap;
use serde_json::Value;
use std::fmt;

/// Whole numbers of any width. Options: `min=<i64>`, `max=<i64>`.
#[derive(Clone, Debug)]
pub struct IntegerField {
    attrs: FieldAttrs,
    min: Option<i64>,
    max: Option<i64>,
}

impl IntegerField {
    pub fn new(attrs: FieldAttrs) -> Self {
        IntegerField {
            attrs,
            min: None,
            max: None,
        }
    }

    pub fn bounds(&self) -> (Option<i64>, Option<i64>) {
        (self.min, self.max)
    }
}

impl AdminField for IntegerField {
    fn attrs(&self) -> &FieldAttrs {
        &self.attrs
    }

    fn attrs_mut(&mut self) -> &mut FieldAttrs {
        &mut self.attrs
    }

    fn configure(&mut self, options: &TagMap) -> Result<(), FieldConfigError> {
        self.min = options.get_parsed::<i64>("min")?;
        self.max = options.get_parsed::<i64>("max")?;
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(FieldConfigError::EmptyRange {
                    lower: format!("min={}", min),
                    upper: format!("max={}", max),
                });
            }
        }
        Ok(())
    }

    fn validate(&self, raw: &str) -> Result<(), String> {
        let n: i64 = raw
            .parse()
            .map_err(|_| format!("{} must be a whole number", self.attrs.label))?;
        check_range(&self.attrs.label, n, self.min, self.max)
    }

    fn render(
        &self,
        out: &mut dyn fmt::Write,
        value: Option<&Value>,
        error: Option<&str>,
        mode: RenderMode,
    ) -> fmt::Result {
        let text = display_value(value);
        match mode {
            RenderMode::Cell => write_cell(out, &text),
            RenderMode::Form => {
                let mut extra = vec![("step", "1".to_string())];
                push_bounds(&mut extra, self.min, self.max);
                write_form_field(out, &self.attrs, error, |out| {
                    write_input(out, &self.attrs, "number", &text, &extra)
                })
            }
        }
    }
}

/// Floating point numbers. Options: `min=<f64>`, `max=<f64>`, `step=<f64>`.
#[derive(Clone, Debug)]
pub struct FloatField {
    attrs: FieldAttrs,
    min: Option<f64>,
    max: Option<f64>,
    step: Option<f64>,
}

impl FloatField {
    pub fn new(attrs: FieldAttrs) -> Self {
        FloatField {
            attrs,
            min: None,
            max: None,
            step: None,
        }
    }

    pub fn bounds(&self) -> (Option<f64>, Option<f64>) {
        (self.min, self.max)
    }
}

fn parse_finite(options: &TagMap, key: &str) -> Result<Option<f64>, FieldConfigError> {
    match options.get_parsed::<f64>(key)? {
        Some(v) if !v.is_finite() => Err(FieldConfigError::invalid(key, &v.to_string(), "must be finite")),
        other => Ok(other),
    }
}

impl AdminField for FloatField {
    fn attrs(&self) -> &FieldAttrs {
        &self.attrs
    }

    fn attrs_mut(&mut self) -> &mut FieldAttrs {
        &mut self.attrs
    }

    fn configure(&mut self, options: &TagMap) -> Result<(), FieldConfigError> {
        self.min = parse_finite(options, "min")?;
        self.max = parse_finite(options, "max")?;
        self.step = parse_finite(options, "step")?;
        if let Some(step) = self.step {
            if step <= 0.0 {
                return Err(FieldConfigError::invalid("step", &step.to_string(), "must be positive"));
            }
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(FieldConfigError::EmptyRange {
                    lower: format!("min={}", min),
                    upper: format!("max={}", max),
                });
            }
        }
        Ok(())
    }

    fn validate(&self, raw: &str) -> Result<(), String> {
        let n: f64 = raw
            .parse()
            .ok()
            .filter(|n: &f64| n.is_finite())
            .ok_or_else(|| format!("{} must be a number", self.attrs.label))?;
        check_range(&self.attrs.label, n, self.min, self.max)
    }

    fn render(
        &self,
        out: &mut dyn fmt::Write,
        value: Option<&Value>,
        error: Option<&str>,
        mode: RenderMode,
    ) -> fmt::Result {
        let text = display_value(value);
        match mode {
            RenderMode::Cell => write_cell(out, &text),
            RenderMode::Form => {
                let step = self.step.map(|s| s.to_string()).unwrap_or_else(|| "any".into());
                let mut extra = vec![("step", step)];
                push_bounds(&mut extra, self.min, self.max);
                write_form_field(out, &self.attrs, error, |out| {
                    write_input(out, &self.attrs, "number", &text, &extra)
                })
            }
        }
    }
}

fn check_range<T>(label: &str, n: T, min: Option<T>, max: Option<T>) -> Result<(), String>
where
    T: PartialOrd + fmt::Display + Copy,
{
    if let Some(min) = min {
        if n < min {
            return Err(format!("{} must be at least {}", label, min));
        }
    }
    if let Some(max) = max {
        if n > max {
            return Err(format!("{} must be at most {}", label, max));
        }
    }
    Ok(())
}

fn push_bounds<T: fmt::Display>(extra: &mut Vec<(&str, String)>, min: Option<T>, max: Option<T>) {
    if let Some(min) = min {
        extra.push(("min", min.to_string()));
    }
    if let Some(max) = max {
        extra.push(("max", max.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::AttributeKind;
    use crate::tag::parse_tag;

    #[test]
    fn integer_bounds_are_enforced() {
        let mut f = IntegerField::new(FieldAttrs::new("Rating", AttributeKind::Int));
        f.configure(&parse_tag("min=1,max=5").unwrap()).unwrap();
        assert_eq!(f.bounds(), (Some(1), Some(5)));
        assert!(f.validate("3").is_ok());
        assert_eq!(f.validate("0"), Err("Rating must be at least 1".to_string()));
        assert_eq!(f.validate("6"), Err("Rating must be at most 5".to_string()));
        assert_eq!(f.validate("2.5"), Err("Rating must be a whole number".to_string()));
    }

    #[test]
    fn non_numeric_bound_is_rejected() {
        let mut f = IntegerField::new(FieldAttrs::new("Rating", AttributeKind::Int));
        let err = f.configure(&parse_tag("min=low").unwrap()).unwrap_err();
        assert!(matches!(err, FieldConfigError::InvalidOption { ref option, .. } if option == "min"));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let mut f = IntegerField::new(FieldAttrs::new("Rating", AttributeKind::Int));
        assert!(matches!(
            f.configure(&parse_tag("min=9,max=1").unwrap()),
            Err(FieldConfigError::EmptyRange { .. })
        ));
    }

    #[test]
    fn float_step_must_be_positive() {
        let mut f = FloatField::new(FieldAttrs::new("Price", AttributeKind::Float));
        assert!(f.configure(&parse_tag("step=0").unwrap()).is_err());
        assert!(f.configure(&parse_tag("step=NaN").unwrap()).is_err());
        f.configure(&parse_tag("step=0.5,min=0").unwrap()).unwrap();
        assert!(f.validate("-1").is_err());
        assert!(f.validate("1.25").is_ok());
        assert!(f.validate("inf").is_err());
    }

    #[test]
    fn form_control_carries_bounds() {
        let mut f = IntegerField::new(FieldAttrs::new("Rating", AttributeKind::Int));
        f.configure(&parse_tag("min=1,max=5").unwrap()).unwrap();
        let mut out = String::new();
        f.render(&mut out, Some(&serde_json::json!(4)), None, RenderMode::Form)
            .unwrap();
        assert!(out.contains("type=\"number\" id=\"field-Rating\" name=\"Rating\" value=\"4\" step=\"1\" min=\"1\" max=\"5\""));
    }
}
