//! Named factories for Act commands (global browser actions).

use serde_json::{json, Value};
use shared::error::ValidationError;

use crate::command::Command;

/// Modal alert. The payload stays a scalar string; the client reads it as
/// `[text]`.
pub fn alert(text: impl Into<String>) -> Command {
    Command::act("alert", Value::String(text.into()))
}

/// Writes `value` to the browser console.
pub fn console(value: impl Into<Value>) -> Command {
    Command::act("console", value.into())
}

pub fn dump(value: impl Into<Value>) -> Command {
    Command::act("dump", value.into())
}

pub fn log(value: impl Into<Value>) -> Command {
    Command::act("log", value.into())
}

/// Error notice rendered by the client into its message area; payload
/// `[messageText, numericId]`.
pub fn error(message: impl Into<String>, id: i64) -> Command {
    Command::act("error", json!([message.into(), id]))
}

/// Appends ready-made alert markup into the node selected by `selector`;
/// payload `[selector, html]`.
pub fn error_at(selector: &str, html: impl Into<String>) -> Result<Command, ValidationError> {
    let selector = non_empty("target selector", selector)?;
    Ok(Command::act("error", json!([selector, html.into()])))
}

/// Reloads the current page.
pub fn refresh() -> Command {
    Command::act("refresh", Value::Null)
}

pub fn refresh_to(url: &str) -> Result<Command, ValidationError> {
    let url = non_empty("url", url)?;
    Ok(Command::act("refresh", json!([url])))
}

pub fn href(url: &str) -> Result<Command, ValidationError> {
    let url = non_empty("url", url)?;
    Ok(Command::act("href", json!([url])))
}

pub fn load_script(url: &str) -> Result<Command, ValidationError> {
    let url = non_empty("url", url)?;
    Ok(Command::act("loadScript", json!([url])))
}

fn non_empty(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(value.to_string())
}
