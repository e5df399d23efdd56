//! Shared HTML writers for field rendering. All user content goes through `html_escape`.

use super::FieldAttrs;
use html_escape::{encode_double_quoted_attribute, encode_text};
use serde_json::Value;
use std::fmt;

/// Display text for a stored or submitted value. Null and absent are empty.
pub(crate) fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

pub(crate) fn write_cell(out: &mut dyn fmt::Write, text: &str) -> fmt::Result {
    write!(out, "<td>{}</td>", encode_text(text))
}

/// Wrap a control in the standard label / help / error block.
pub(crate) fn write_form_field<F>(
    out: &mut dyn fmt::Write,
    attrs: &FieldAttrs,
    error: Option<&str>,
    control: F,
) -> fmt::Result
where
    F: FnOnce(&mut dyn fmt::Write) -> fmt::Result,
{
    let error = error.filter(|e| !e.is_empty());
    let class = if error.is_some() { "field has-error" } else { "field" };
    write!(
        out,
        "<div class=\"{}\"><label for=\"field-{}\">{}</label>",
        class,
        encode_double_quoted_attribute(&attrs.name),
        encode_text(&attrs.label)
    )?;
    control(out)?;
    if let Some(help) = &attrs.help {
        write!(out, "<p class=\"help\">{}</p>", encode_text(help))?;
    }
    if let Some(error) = error {
        write!(out, "<p class=\"error\">{}</p>", encode_text(error))?;
    }
    out.write_str("</div>")
}

/// `<input>` with id, name, value, the given extra attributes and the shared flags.
pub(crate) fn write_input(
    out: &mut dyn fmt::Write,
    attrs: &FieldAttrs,
    input_type: &str,
    value: &str,
    extra: &[(&str, String)],
) -> fmt::Result {
    write!(
        out,
        "<input type=\"{}\" id=\"field-{}\" name=\"{}\" value=\"{}\"",
        input_type,
        encode_double_quoted_attribute(&attrs.name),
        encode_double_quoted_attribute(&attrs.name),
        encode_double_quoted_attribute(value)
    )?;
    write_extra(out, attrs, extra)?;
    out.write_str(">")
}

pub(crate) fn write_textarea(
    out: &mut dyn fmt::Write,
    attrs: &FieldAttrs,
    value: &str,
    extra: &[(&str, String)],
) -> fmt::Result {
    write!(
        out,
        "<textarea id=\"field-{}\" name=\"{}\"",
        encode_double_quoted_attribute(&attrs.name),
        encode_double_quoted_attribute(&attrs.name)
    )?;
    write_extra(out, attrs, extra)?;
    write!(out, ">{}</textarea>", encode_text(value))
}

fn write_extra(out: &mut dyn fmt::Write, attrs: &FieldAttrs, extra: &[(&str, String)]) -> fmt::Result {
    for (name, value) in extra {
        write!(out, " {}=\"{}\"", name, encode_double_quoted_attribute(value))?;
    }
    if attrs.required {
        out.write_str(" required")?;
    }
    if attrs.readonly {
        out.write_str(" readonly")?;
    }
    Ok(())
}
