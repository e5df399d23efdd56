use super::html::{display_value, write_cell, write_form_field, write_input};
use super::{AdminField, FieldAttrs, RenderMode};
use crate::error::FieldConfigError;
use crate::tag::TagMap;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;
use std::fmt::{self, Write as _};

pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Date/time values, shown and accepted in a strftime format. Option: `format=<strftime>`.
#[derive(Clone, Debug)]
pub struct TimeField {
    attrs: FieldAttrs,
    format: String,
}

impl TimeField {
    pub fn new(attrs: FieldAttrs) -> Self {
        TimeField {
            attrs,
            format: DEFAULT_TIME_FORMAT.to_string(),
        }
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    /// Parse a submitted or stored value: the configured format first, then RFC 3339 and ISO dates.
    pub fn parse(&self, raw: &str) -> Option<NaiveDateTime> {
        let raw = raw.trim();
        NaiveDateTime::parse_from_str(raw, &self.format)
            .ok()
            .or_else(|| date_at_midnight(raw, &self.format))
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|d| d.naive_utc()))
            .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok())
            .or_else(|| date_at_midnight(raw, "%Y-%m-%d"))
    }

    fn display(&self, value: Option<&Value>) -> String {
        let text = display_value(value);
        match self.parse(&text).and_then(|t| format_naive(&t, &self.format)) {
            Some(shown) => shown,
            None => text,
        }
    }
}

/// `None` when the format needs data a naive date-time lacks, such as an offset.
fn format_naive(t: &NaiveDateTime, format: &str) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", t.format(format)).ok()?;
    Some(out)
}

fn date_at_midnight(raw: &str, format: &str) -> Option<NaiveDateTime> {
    NaiveDate::parse_from_str(raw, format)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

impl AdminField for TimeField {
    fn attrs(&self) -> &FieldAttrs {
        &self.attrs
    }

    fn attrs_mut(&mut self) -> &mut FieldAttrs {
        &mut self.attrs
    }

    fn configure(&mut self, options: &TagMap) -> Result<(), FieldConfigError> {
        if let Some(format) = options.get("format") {
            if StrftimeItems::new(format).any(|item| item == Item::Error) {
                return Err(FieldConfigError::invalid("format", format, "not a valid strftime format"));
            }
            let sample = NaiveDate::from_ymd_opt(2000, 1, 31)
                .and_then(|d| d.and_hms_opt(12, 30, 45))
                .unwrap_or_default();
            if format_naive(&sample, format).is_none() {
                return Err(FieldConfigError::invalid(
                    "format",
                    format,
                    "cannot format a date-time without a time zone",
                ));
            }
            self.format = format.to_string();
        }
        Ok(())
    }

    fn validate(&self, raw: &str) -> Result<(), String> {
        match self.parse(raw) {
            Some(_) => Ok(()),
            None => Err(format!("{} must look like {}", self.attrs.label, self.format)),
        }
    }

    fn render(
        &self,
        out: &mut dyn fmt::Write,
        value: Option<&Value>,
        error: Option<&str>,
        mode: RenderMode,
    ) -> fmt::Result {
        let text = self.display(value);
        match mode {
            RenderMode::Cell => write_cell(out, &text),
            RenderMode::Form => {
                let extra = [("placeholder", self.format.clone())];
                write_form_field(out, &self.attrs, error, |out| {
                    write_input(out, &self.attrs, "text", &text, &extra)
                })
            }
        }
    }
}
