//! Console commands standing in for effects that could not be shipped.

use serde_json::{json, Value};
use shared::{domain::FlashMessage, error::RenderError};

use crate::{act, command::Command, DomCommand};

pub(crate) fn missing_selector(command: &DomCommand) -> [Command; 2] {
    let name = command.debug_id().unwrap_or(command.operation_name());
    [
        act::console(format!(
            "dom command '{name}' has no selector and was not sent"
        )),
        act::console(json!({
            "debugId": command.debug_id(),
            "f": command.operation_name(),
            "a": command.args(),
        })),
    ]
}

pub(crate) fn render_failure(message: &FlashMessage, error: &RenderError) -> [Command; 2] {
    [
        act::console(format!("flash message could not be rendered: {error}")),
        act::console(serde_json::to_value(message).unwrap_or(Value::Null)),
    ]
}
