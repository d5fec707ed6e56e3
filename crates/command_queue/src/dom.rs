//! Named factories for Dom commands. Each fixes the wire operation name and
//! shapes the argument the way the client method expects it.

use std::{fmt, str::FromStr};

use serde_json::{json, Value};
use shared::error::ValidationError;

use crate::command::Command;

/// How [`html_mode`] inserts content into the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HtmlMode {
    /// Replace the existing children.
    #[default]
    Html,
    Prepend,
    Append,
}

impl HtmlMode {
    pub fn as_str(self) -> &'static str {
        match self {
            HtmlMode::Html => "html",
            HtmlMode::Prepend => "prepend",
            HtmlMode::Append => "append",
        }
    }
}

impl FromStr for HtmlMode {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "html" => Ok(HtmlMode::Html),
            "prepend" => Ok(HtmlMode::Prepend),
            "append" => Ok(HtmlMode::Append),
            other => Err(ValidationError::InvalidHtmlMode(other.to_string())),
        }
    }
}

impl fmt::Display for HtmlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Replaces the children of `selector` with `content`.
pub fn html(selector: impl Into<String>, content: impl Into<String>) -> Command {
    insert(selector, content, HtmlMode::Html)
}

/// Like [`html`] with the insertion mode given by name; anything other than
/// `html`, `prepend` or `append` is rejected.
pub fn html_mode(
    selector: impl Into<String>,
    content: impl Into<String>,
    mode: &str,
) -> Result<Command, ValidationError> {
    Ok(insert(selector, content, mode.parse()?))
}

pub fn insert(selector: impl Into<String>, content: impl Into<String>, mode: HtmlMode) -> Command {
    Command::dom(selector, mode.as_str(), Value::String(content.into()))
}

pub fn append(selector: impl Into<String>, content: impl Into<String>) -> Command {
    insert(selector, content, HtmlMode::Append)
}

pub fn prepend(selector: impl Into<String>, content: impl Into<String>) -> Command {
    insert(selector, content, HtmlMode::Prepend)
}

/// Sets the text content; the client escapes it.
pub fn text(selector: impl Into<String>, text: impl Into<String>) -> Command {
    Command::dom(selector, "text", Value::String(text.into()))
}

pub fn replace_with(selector: impl Into<String>, content: impl Into<String>) -> Command {
    Command::dom(selector, "replaceWith", Value::String(content.into()))
}

pub fn add_class(
    selector: impl Into<String>,
    classes: &str,
) -> Result<Command, ValidationError> {
    Ok(Command::dom(selector, "addClass", class_list(classes)?))
}

pub fn remove_class(
    selector: impl Into<String>,
    classes: &str,
) -> Result<Command, ValidationError> {
    Ok(Command::dom(selector, "removeClass", class_list(classes)?))
}

pub fn toggle_class(
    selector: impl Into<String>,
    classes: &str,
) -> Result<Command, ValidationError> {
    Ok(Command::dom(selector, "toggleClass", class_list(classes)?))
}

/// Sets attribute `name`; wire form `{"f":"attr","a":[name, value]}`.
pub fn attrib(
    selector: impl Into<String>,
    name: &str,
    value: impl Into<Value>,
) -> Result<Command, ValidationError> {
    let name = token("attribute name", name)?;
    Ok(Command::dom(selector, "attr", json!([name, value.into()])))
}

pub fn remove_attrib(selector: impl Into<String>, name: &str) -> Result<Command, ValidationError> {
    let name = token("attribute name", name)?;
    Ok(Command::dom(selector, "removeAttr", Value::String(name)))
}

/// Sets one inline style property; wire form `{"f":"css","a":[property, value]}`.
pub fn css(
    selector: impl Into<String>,
    property: &str,
    value: impl Into<String>,
) -> Result<Command, ValidationError> {
    let property = token("css property", property)?;
    Ok(Command::dom(
        selector,
        "css",
        json!([property, value.into()]),
    ))
}

/// Sets the form value of the matched controls.
pub fn value(selector: impl Into<String>, value: impl Into<Value>) -> Command {
    Command::dom(selector, "val", value.into())
}

pub fn show(selector: impl Into<String>) -> Command {
    Command::dom(selector, "show", Value::Null)
}

pub fn hide(selector: impl Into<String>) -> Command {
    Command::dom(selector, "hide", Value::Null)
}

pub fn empty(selector: impl Into<String>) -> Command {
    Command::dom(selector, "empty", Value::Null)
}

pub fn remove(selector: impl Into<String>) -> Command {
    Command::dom(selector, "remove", Value::Null)
}

fn class_list(classes: &str) -> Result<Value, ValidationError> {
    let classes = classes.split_whitespace().collect::<Vec<_>>().join(" ");
    if classes.is_empty() {
        return Err(ValidationError::Empty {
            field: "class name",
        });
    }
    Ok(Value::String(classes))
}

fn token(field: &'static str, value: &str) -> Result<String, ValidationError> {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidToken {
            field,
            value: value.to_string(),
        });
    }
    Ok(value.to_string())
}
