use super::html::{display_value, write_cell, write_form_field, write_input};
use super::{AdminField, FieldAttrs, RenderMode};
use crate::error::FieldConfigError;
use crate::tag::TagMap;
use html_escape::{encode_double_quoted_attribute, encode_text};
use regex::Regex;
use serde_json::Value;
use std::fmt;

const SCHEME_PATTERN: &str = r"^[a-zA-Z][a-zA-Z0-9+.\-]*$";
const DEFAULT_SCHEMES: &[&str] = &["http", "https"];

/// Links. Option: `schemes=<a|b|...>` allow-list, default `http|https`.
#[derive(Clone, Debug)]
pub struct UrlField {
    attrs: FieldAttrs,
    schemes: Vec<String>,
}

impl UrlField {
    pub fn new(attrs: FieldAttrs) -> Self {
        UrlField {
            attrs,
            schemes: DEFAULT_SCHEMES.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn schemes(&self) -> &[String] {
        &self.schemes
    }

    /// True when `raw` has an allowed scheme followed by something.
    pub fn is_allowed(&self, raw: &str) -> bool {
        match raw.split_once(':') {
            Some((scheme, rest)) => {
                let rest = rest.trim_start_matches("//");
                !rest.is_empty() && self.schemes.iter().any(|s| s.eq_ignore_ascii_case(scheme))
            }
            None => false,
        }
    }
}

impl AdminField for UrlField {
    fn attrs(&self) -> &FieldAttrs {
        &self.attrs
    }

    fn attrs_mut(&mut self) -> &mut FieldAttrs {
        &mut self.attrs
    }

    fn configure(&mut self, options: &TagMap) -> Result<(), FieldConfigError> {
        let Some(raw) = options.get("schemes") else {
            return Ok(());
        };
        let re = Regex::new(SCHEME_PATTERN)
            .map_err(|e| FieldConfigError::invalid("schemes", raw, e.to_string()))?;
        let mut schemes = Vec::new();
        for scheme in raw.split('|').map(str::trim) {
            if !re.is_match(scheme) {
                return Err(FieldConfigError::invalid("schemes", raw, format!("'{}' is not a URI scheme", scheme)));
            }
            schemes.push(scheme.to_ascii_lowercase());
        }
        self.schemes = schemes;
        Ok(())
    }

    fn validate(&self, raw: &str) -> Result<(), String> {
        if self.is_allowed(raw) {
            Ok(())
        } else {
            Err(format!(
                "{} must be a link starting with {}",
                self.attrs.label,
                self.schemes.join(", ")
            ))
        }
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
            RenderMode::Cell if self.is_allowed(&text) => write!(
                out,
                "<td><a href=\"{}\" rel=\"noopener noreferrer\">{}</a></td>",
                encode_double_quoted_attribute(&text),
                encode_text(&text)
            ),
            RenderMode::Cell => write_cell(out, &text),
            RenderMode::Form => write_form_field(out, &self.attrs, error, |out| {
                write_input(out, &self.attrs, "url", &text, &[])
            }),
        }
    }
}
