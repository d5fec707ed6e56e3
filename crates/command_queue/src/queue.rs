use shared::{
    domain::DEFAULT_MESSAGE_AREA_SELECTOR,
    protocol::{DomGroups, WirePayload},
};
use tracing::{debug, error, warn};

use crate::{
    command::Command,
    diagnostics,
    flash::{flash_to_commands, FlashSource},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueSettings {
    pub message_area_selector: String,
    /// Fade-out delay for flash alerts; `0` disables fading.
    pub fadeout_time_ms: u64,
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            message_area_selector: DEFAULT_MESSAGE_AREA_SELECTOR.into(),
            fadeout_time_ms: 5000,
        }
    }
}

/// Commands emitted while serving one request.
///
/// Build one per request (or [`reset`](Self::reset) a pooled instance at the
/// request boundary) and call [`process`](Self::process) once, right before
/// the response is written.
#[derive(Debug, Default)]
pub struct CommandQueue {
    settings: QueueSettings,
    stack: Vec<Command>,
    processed: bool,
}

impl CommandQueue {
    pub fn new(settings: QueueSettings) -> Self {
        Self {
            settings,
            stack: Vec::new(),
            processed: false,
        }
    }

    pub fn settings(&self) -> &QueueSettings {
        &self.settings
    }

    /// Appends `command`. A Dom command without a selector is replaced by two
    /// console diagnostics so the rest of the response still goes out.
    pub fn add(&mut self, command: Command) {
        if let Command::Dom(dom) = &command {
            if dom.selector().trim().is_empty() {
                warn!(
                    op = dom.operation_name(),
                    debug_id = dom.debug_id().unwrap_or_default(),
                    "dom command without selector replaced by diagnostics"
                );
                self.stack.extend(diagnostics::missing_selector(dom));
                return;
            }
        }
        self.stack.push(command);
    }

    pub fn command_stack(&self) -> &[Command] {
        &self.stack
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn reset(&mut self) {
        self.stack.clear();
        self.processed = false;
    }

    /// Drains `flash`, appends the resulting commands, and groups everything
    /// queued so far. The queue is left empty.
    pub fn process_payload(&mut self, flash: &mut dyn FlashSource) -> WirePayload {
        if self.processed {
            warn!("command queue processed again without reset");
        }
        self.processed = true;

        let messages = flash.drain();
        for command in flash_to_commands(&messages, &self.settings) {
            self.add(command);
        }

        let commands = std::mem::take(&mut self.stack);
        let payload = group(&commands);
        debug!(
            commands = commands.len(),
            flash_messages = messages.len(),
            selectors = payload.dom.len(),
            actions = payload.act.len(),
            "command queue processed"
        );
        payload
    }

    /// JSON body for an ajax response. Never fails; an empty queue yields `{}`.
    pub fn process(&mut self, flash: &mut dyn FlashSource) -> String {
        let payload = self.process_payload(flash);
        payload.to_json().unwrap_or_else(|err| {
            error!(error = %err, "failed to encode command payload");
            "{}".to_string()
        })
    }

    /// Payload embedded in a full page as a JSON script block, for requests
    /// that are not ajax. Empty when nothing was queued.
    pub fn render_inline(&mut self, flash: &mut dyn FlashSource) -> String {
        let payload = self.process_payload(flash);
        if payload.is_empty() {
            return String::new();
        }
        match payload.to_json() {
            Ok(json) => format!(
                r#"<script type="application/json" id="ajax-commands">{}</script>"#,
                json.replace("</", r"<\/")
            ),
            Err(err) => {
                error!(error = %err, "failed to encode inline command payload");
                String::new()
            }
        }
    }
}

/// Buckets Dom commands per selector and keeps Act commands in one list,
/// preserving relative order inside each bucket.
pub fn group(commands: &[Command]) -> WirePayload {
    let mut dom = DomGroups::new();
    let mut act = Vec::new();
    for command in commands {
        match command {
            Command::Dom(cmd) => dom.push(cmd.selector(), command.to_wire_op()),
            Command::Act(_) => act.push(command.to_wire_op()),
        }
    }
    WirePayload { dom, act }
}

#[cfg(test)]
#[path = "tests/queue_tests.rs"]
mod tests;
