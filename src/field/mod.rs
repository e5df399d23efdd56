//! Field abstraction: a closed set of variants sharing one contract.
//!
//! Every variant exposes its shared [`FieldAttrs`], a `configure` step fed by
//! the parsed annotation, a `validate` step for submitted values and a `render`
//! step writing either a list cell or a labelled form control. [`Field`] is the
//! tagged union the model stores; selection is [`FieldKind::select`].

mod html;
mod number;
mod text;
mod time;
mod url;

pub use number::{FloatField, IntegerField};
pub use text::TextField;
pub use time::TimeField;
pub use url::UrlField;

use crate::error::FieldConfigError;
use crate::schema::AttributeKind;
use crate::sql::PgBindValue;
use crate::tag::TagMap;
use serde_json::Value;
use std::fmt;

/// Variant tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Text,
    Integer,
    Float,
    Time,
    Url,
}

impl FieldKind {
    /// Pick the variant for an attribute. `Field=url` wins; any other override value,
    /// or none, defers to the declared kind. Unmatched kinds degrade to text.
    pub fn select(declared: AttributeKind, override_kind: Option<&str>) -> FieldKind {
        match override_kind {
            Some("url") => FieldKind::Url,
            _ => declared.field_kind().unwrap_or(FieldKind::Text),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Integer => "integer",
            FieldKind::Float => "float",
            FieldKind::Time => "time",
            FieldKind::Url => "url",
        }
    }
}

/// Where a field is being rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderMode {
    /// One `<td>` of a list view row.
    Cell,
    /// A labelled control of the edit/create form.
    Form,
}

/// Attributes shared by every variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldAttrs {
    /// Internal name; reference attributes carry an `Id` suffix.
    pub name: String,
    pub label: String,
    pub column_name: String,
    /// Shown in list views.
    pub list: bool,
    /// Primitive category of the source attribute.
    pub declared: AttributeKind,
    pub required: bool,
    pub readonly: bool,
    pub help: Option<String>,
}

impl FieldAttrs {
    pub fn new(name: impl Into<String>, declared: AttributeKind) -> Self {
        let name = name.into();
        FieldAttrs {
            label: name.clone(),
            column_name: name.clone(),
            name,
            list: false,
            declared,
            required: false,
            readonly: false,
            help: None,
        }
    }

    fn apply_common(&mut self, options: &TagMap) {
        self.required = options.contains("required");
        self.readonly = options.contains("readonly");
        self.help = options.get("help").map(str::to_string);
    }
}

/// Contract implemented by every variant.
pub trait AdminField {
    fn attrs(&self) -> &FieldAttrs;

    fn attrs_mut(&mut self) -> &mut FieldAttrs;

    /// Apply variant-specific options. Unknown keys are ignored.
    fn configure(&mut self, options: &TagMap) -> Result<(), FieldConfigError>;

    /// Check a submitted non-empty value; the error text is shown next to the control.
    fn validate(&self, raw: &str) -> Result<(), String>;

    fn render(
        &self,
        out: &mut dyn fmt::Write,
        value: Option<&Value>,
        error: Option<&str>,
        mode: RenderMode,
    ) -> fmt::Result;
}

#[derive(Clone, Debug)]
pub enum Field {
    Text(TextField),
    Integer(IntegerField),
    Float(FloatField),
    Time(TimeField),
    Url(UrlField),
}

impl Field {
    pub fn new(kind: FieldKind, name: impl Into<String>, declared: AttributeKind) -> Self {
        let attrs = FieldAttrs::new(name, declared);
        match kind {
            FieldKind::Text => Field::Text(TextField::new(attrs)),
            FieldKind::Integer => Field::Integer(IntegerField::new(attrs)),
            FieldKind::Float => Field::Float(FloatField::new(attrs)),
            FieldKind::Time => Field::Time(TimeField::new(attrs)),
            FieldKind::Url => Field::Url(UrlField::new(attrs)),
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Field::Text(_) => FieldKind::Text,
            Field::Integer(_) => FieldKind::Integer,
            Field::Float(_) => FieldKind::Float,
            Field::Time(_) => FieldKind::Time,
            Field::Url(_) => FieldKind::Url,
        }
    }

    fn inner(&self) -> &dyn AdminField {
        match self {
            Field::Text(f) => f,
            Field::Integer(f) => f,
            Field::Float(f) => f,
            Field::Time(f) => f,
            Field::Url(f) => f,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn AdminField {
        match self {
            Field::Text(f) => f,
            Field::Integer(f) => f,
            Field::Float(f) => f,
            Field::Time(f) => f,
            Field::Url(f) => f,
        }
    }

    pub fn name(&self) -> &str {
        &self.attrs().name
    }

    pub fn label(&self) -> &str {
        &self.attrs().label
    }

    pub fn column_name(&self) -> &str {
        &self.attrs().column_name
    }

    pub fn is_list(&self) -> bool {
        self.attrs().list
    }

    /// Validate a submitted value, enforcing `required` before the variant rules.
    pub fn validate_value(&self, value: &Value) -> Result<(), String> {
        match raw_text(value) {
            None if self.attrs().required => Err(format!("{} is required", self.label())),
            None => Ok(()),
            Some(raw) => self.validate(&self.submitted(value, raw)),
        }
    }

    /// Text inputs keep their surrounding whitespace; every other variant parses the trimmed text.
    fn submitted(&self, value: &Value, trimmed: String) -> String {
        match (self, value) {
            (Field::Text(_), Value::String(s)) => s.clone(),
            _ => trimmed,
        }
    }

    /// Convert a submitted value into a typed bind parameter for the field's column.
    pub fn to_bind(&self, value: &Value) -> Result<PgBindValue, String> {
        let Some(raw) = raw_text(value) else {
            return Ok(self.null_bind());
        };
        match self {
            Field::Integer(_) => parse_int(&raw).map(|n| PgBindValue::I64(Some(n))),
            Field::Float(_) => raw
                .parse::<f64>()
                .map(|n| PgBindValue::F64(Some(n)))
                .map_err(|_| format!("'{}' is not a number", raw)),
            Field::Time(f) => f
                .parse(&raw)
                .map(|t| PgBindValue::Timestamp(Some(t)))
                .ok_or_else(|| format!("'{}' does not match {}", raw, f.format())),
            Field::Text(_) | Field::Url(_) => match self.attrs().declared {
                AttributeKind::Bool => parse_bool(&raw).map(|b| PgBindValue::Bool(Some(b))),
                AttributeKind::Int | AttributeKind::Reference => {
                    parse_int(&raw).map(|n| PgBindValue::I64(Some(n)))
                }
                _ => Ok(PgBindValue::Text(Some(self.submitted(value, raw)))),
            },
        }
    }

    fn null_bind(&self) -> PgBindValue {
        match (self, self.attrs().declared) {
            (Field::Integer(_), _) => PgBindValue::I64(None),
            (Field::Float(_), _) => PgBindValue::F64(None),
            (Field::Time(_), _) => PgBindValue::Timestamp(None),
            (_, AttributeKind::Bool) => PgBindValue::Bool(None),
            (_, AttributeKind::Int | AttributeKind::Reference) => PgBindValue::I64(None),
            _ => PgBindValue::Text(None),
        }
    }
}

impl AdminField for Field {
    fn attrs(&self) -> &FieldAttrs {
        self.inner().attrs()
    }

    fn attrs_mut(&mut self) -> &mut FieldAttrs {
        self.inner_mut().attrs_mut()
    }

    fn configure(&mut self, options: &TagMap) -> Result<(), FieldConfigError> {
        self.attrs_mut().apply_common(options);
        self.inner_mut().configure(options)
    }

    fn validate(&self, raw: &str) -> Result<(), String> {
        self.inner().validate(raw)
    }

    fn render(
        &self,
        out: &mut dyn fmt::Write,
        value: Option<&Value>,
        error: Option<&str>,
        mode: RenderMode,
    ) -> fmt::Result {
        self.inner().render(out, value, error, mode)
    }
}

/// Trimmed textual form of a submitted value; `None` for null and blank strings.
pub(crate) fn raw_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

fn parse_int(raw: &str) -> Result<i64, String> {
    raw.parse::<i64>()
        .map_err(|_| format!("'{}' is not a whole number", raw))
}

fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(format!("'{}' is not true or false", raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::parse_tag;

    #[test]
    fn override_only_recognizes_url() {
        assert_eq!(FieldKind::select(AttributeKind::Str, Some("url")), FieldKind::Url);
        assert_eq!(FieldKind::select(AttributeKind::Int, Some("url")), FieldKind::Url);
        assert_eq!(FieldKind::select(AttributeKind::Int, Some("slider")), FieldKind::Integer);
        assert_eq!(FieldKind::select(AttributeKind::Struct, None), FieldKind::Time);
        assert_eq!(FieldKind::select(AttributeKind::Float, None), FieldKind::Float);
        assert_eq!(FieldKind::select(AttributeKind::Reference, None), FieldKind::Text);
        assert_eq!(FieldKind::select(AttributeKind::Other, Some("text")), FieldKind::Text);
    }

    #[test]
    fn configure_applies_common_options() {
        let mut field = Field::new(FieldKind::Text, "Title", AttributeKind::Str);
        let options = parse_tag("required,help=Shown on the front page,readonly").unwrap();
        field.configure(&options).unwrap();
        assert!(field.attrs().required);
        assert!(field.attrs().readonly);
        assert_eq!(field.attrs().help.as_deref(), Some("Shown on the front page"));
        assert_eq!(field.label(), "Title");
        assert_eq!(field.column_name(), "Title");
    }

    #[test]
    fn required_is_checked_before_variant_rules() {
        let mut field = Field::new(FieldKind::Integer, "Views", AttributeKind::Int);
        field.configure(&parse_tag("required").unwrap()).unwrap();
        assert_eq!(
            field.validate_value(&Value::String("  ".into())),
            Err("Views is required".to_string())
        );
        assert!(field.validate_value(&Value::String("12".into())).is_ok());
        assert!(field.validate_value(&Value::String("twelve".into())).is_err());
    }

    #[test]
    fn to_bind_follows_variant_and_declared_kind() {
        let int = Field::new(FieldKind::Integer, "Views", AttributeKind::Int);
        assert!(matches!(int.to_bind(&Value::String("7".into())), Ok(PgBindValue::I64(Some(7)))));
        assert!(matches!(int.to_bind(&Value::Null), Ok(PgBindValue::I64(None))));

        let author = Field::new(FieldKind::Text, "AuthorId", AttributeKind::Reference);
        assert!(matches!(author.to_bind(&Value::String("3".into())), Ok(PgBindValue::I64(Some(3)))));
        assert!(author.to_bind(&Value::String("three".into())).is_err());

        let flag = Field::new(FieldKind::Text, "Published", AttributeKind::Bool);
        assert!(matches!(flag.to_bind(&Value::String("on".into())), Ok(PgBindValue::Bool(Some(true)))));

        let title = Field::new(FieldKind::Text, "Title", AttributeKind::Str);
        assert!(matches!(title.to_bind(&Value::String(" Hi ".into())), Ok(PgBindValue::Text(Some(ref s))) if s == " Hi "));
    }

    #[test]
    fn text_whitespace_is_kept_but_blank_is_still_missing() {
        let mut body = Field::new(FieldKind::Text, "Body", AttributeKind::Str);
        body.configure(&parse_tag("required,textarea,maxlength=4").unwrap()).unwrap();
        assert_eq!(body.validate_value(&Value::String(" \n ".into())), Err("Body is required".to_string()));
        assert!(body.validate_value(&Value::String("  ab  ".into())).is_err());
        assert!(body.validate_value(&Value::String(" ab ".into())).is_ok());
        assert_eq!(
            body.to_bind(&Value::String("  indented\n".into())),
            Ok(PgBindValue::Text(Some("  indented\n".into())))
        );

        let views = Field::new(FieldKind::Integer, "Views", AttributeKind::Int);
        assert_eq!(views.to_bind(&Value::String(" 7 ".into())), Ok(PgBindValue::I64(Some(7))));
        let link = Field::new(FieldKind::Url, "Link", AttributeKind::Str);
        assert_eq!(
            link.to_bind(&Value::String(" https://a.example ".into())),
            Ok(PgBindValue::Text(Some("https://a.example".into())))
        );
    }
}
