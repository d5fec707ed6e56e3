use shared::{domain::FlashMessage, error::RenderError};
use tracing::warn;

use crate::{command::Command, diagnostics, dom, queue::QueueSettings};

/// Session-scoped message store as seen by the queue: every call hands over
/// the pending messages and forgets them.
pub trait FlashSource {
    fn drain(&mut self) -> Vec<FlashMessage>;
}

impl FlashSource for Vec<FlashMessage> {
    fn drain(&mut self) -> Vec<FlashMessage> {
        std::mem::take(self)
    }
}

/// Translates drained flash messages into Dom commands on the message area.
/// A message that fails to render becomes a pair of console diagnostics.
pub fn flash_to_commands(messages: &[FlashMessage], settings: &QueueSettings) -> Vec<Command> {
    let target = settings.message_area_selector.as_str();
    let mut commands = Vec::with_capacity(messages.len());
    for message in messages {
        if message.is_clear() {
            commands.push(dom::html(target, ""));
            continue;
        }
        match render_alert(message, settings.fadeout_time_ms) {
            Ok(markup) => commands.push(dom::append(target, markup)),
            Err(error) => {
                warn!(%error, kind = ?message.kind, "flash message dropped");
                commands.extend(diagnostics::render_failure(message, &error));
            }
        }
    }
    commands
}

/// Bootstrap alert markup for one message. The fade-out class is only set
/// when the message asks for it and `fadeout_time_ms` is positive.
pub fn render_alert(message: &FlashMessage, fadeout_time_ms: u64) -> Result<String, RenderError> {
    let Some(severity) = message.kind.css_class() else {
        return Ok(String::new());
    };
    if message.text.trim().is_empty() {
        return Err(RenderError::EmptyText { kind: message.kind });
    }

    let fades = message.fadeout && fadeout_time_ms > 0;
    let mut classes = format!("alert {severity}");
    if message.dismissable {
        classes.push_str(" alert-dismissible");
    }
    if fades {
        classes.push_str(" fadeout");
    }

    let mut markup = format!(r#"<div class="{classes}" role="alert""#);
    if fades {
        markup.push_str(&format!(r#" data-fadeout="{fadeout_time_ms}""#));
    }
    markup.push('>');
    markup.push_str(&message.text);
    if message.dismissable {
        markup.push_str(
            r#"<button type="button" class="close" data-dismiss="alert" aria-label="Close"><span aria-hidden="true">&times;</span></button>"#,
        );
    }
    markup.push_str("</div>");
    Ok(markup)
}

#[cfg(test)]
#[path = "tests/flash_tests.rs"]
mod tests;
