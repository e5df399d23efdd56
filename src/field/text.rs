use super::html::{display_value, write_cell, write_form_field, write_input, write_textarea};
use super::{AdminField, FieldAttrs, RenderMode};
use crate::error::FieldConfigError;
use crate::tag::TagMap;
use serde_json::Value;
use std::fmt;

/// Free text. Options: `maxlength=<n>`, `placeholder=<text>`, `textarea`.
#[derive(Clone, Debug)]
pub struct TextField {
    attrs: FieldAttrs,
    max_length: Option<usize>,
    placeholder: Option<String>,
    textarea: bool,
}

impl TextField {
    pub fn new(attrs: FieldAttrs) -> Self {
        TextField {
            attrs,
            max_length: None,
            placeholder: None,
            textarea: false,
        }
    }

    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    pub fn is_textarea(&self) -> bool {
        self.textarea
    }
}

impl AdminField for TextField {
    fn attrs(&self) -> &FieldAttrs {
        &self.attrs
    }

    fn attrs_mut(&mut self) -> &mut FieldAttrs {
        &mut self.attrs
    }

    fn configure(&mut self, options: &TagMap) -> Result<(), FieldConfigError> {
        self.max_length = options.get_parsed::<usize>("maxlength")?;
        if self.max_length == Some(0) {
            return Err(FieldConfigError::invalid("maxlength", "0", "must be positive"));
        }
        self.placeholder = options.get("placeholder").map(str::to_string);
        self.textarea = options.contains("textarea");
        Ok(())
    }

    fn validate(&self, raw: &str) -> Result<(), String> {
        if let Some(max) = self.max_length {
            if raw.chars().count() > max {
                return Err(format!("{} must be at most {} characters", self.attrs.label, max));
            }
        }
        Ok(())
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
                let mut extra = Vec::new();
                if let Some(max) = self.max_length {
                    extra.push(("maxlength", max.to_string()));
                }
                if let Some(placeholder) = &self.placeholder {
                    extra.push(("placeholder", placeholder.clone()));
                }
                write_form_field(out, &self.attrs, error, |out| {
                    if self.textarea {
                        write_textarea(out, &self.attrs, &text, &extra)
                    } else {
                        write_input(out, &self.attrs, "text", &text, &extra)
                    }
                })
            }
        }
    }
}
