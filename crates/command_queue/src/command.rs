use serde_json::Value;
use shared::{domain::CommandKind, error::ValidationError, protocol::WireOp};

use crate::queue::CommandQueue;

/// A replayable client-side effect. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Dom(DomCommand),
    Act(ActCommand),
}

/// Effect applied to every node matched by `selector`.
#[derive(Debug, Clone, PartialEq)]
pub struct DomCommand {
    selector: String,
    op: String,
    args: Value,
    debug_id: Option<String>,
}

/// Global browser action without a DOM target.
#[derive(Debug, Clone, PartialEq)]
pub struct ActCommand {
    op: String,
    args: Value,
    debug_id: Option<String>,
}

impl DomCommand {
    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn operation_name(&self) -> &str {
        &self.op
    }

    pub fn args(&self) -> &Value {
        &self.args
    }

    pub fn debug_id(&self) -> Option<&str> {
        self.debug_id.as_deref()
    }
}

impl ActCommand {
    pub fn operation_name(&self) -> &str {
        &self.op
    }

    pub fn args(&self) -> &Value {
        &self.args
    }

    pub fn debug_id(&self) -> Option<&str> {
        self.debug_id.as_deref()
    }
}

impl Command {
    /// Generic construction for operations without a named factory.
    ///
    /// A Dom command may be built with an empty selector; the queue turns it
    /// into diagnostics instead of shipping it.
    pub fn new(
        kind: CommandKind,
        operation: &str,
        selector: Option<&str>,
        args: Value,
    ) -> Result<Self, ValidationError> {
        let operation = operation.trim();
        if operation.is_empty() {
            return Err(ValidationError::EmptyOperation);
        }
        match kind {
            CommandKind::Dom => Ok(Self::dom(selector.unwrap_or_default(), operation, args)),
            CommandKind::Act => {
                if selector.is_some_and(|s| !s.is_empty()) {
                    return Err(ValidationError::UnexpectedSelector(operation.to_string()));
                }
                Ok(Self::act(operation, args))
            }
        }
    }

    pub(crate) fn dom(selector: impl Into<String>, op: &str, args: Value) -> Self {
        Command::Dom(DomCommand {
            selector: selector.into(),
            op: op.to_string(),
            args,
            debug_id: None,
        })
    }

    pub(crate) fn act(op: &str, args: Value) -> Self {
        Command::Act(ActCommand {
            op: op.to_string(),
            args,
            debug_id: None,
        })
    }

    pub fn with_debug_id(mut self, id: impl Into<String>) -> Self {
        let id = Some(id.into());
        match &mut self {
            Command::Dom(dom) => dom.debug_id = id,
            Command::Act(act) => act.debug_id = id,
        }
        self
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Dom(_) => CommandKind::Dom,
            Command::Act(_) => CommandKind::Act,
        }
    }

    pub fn operation_name(&self) -> &str {
        match self {
            Command::Dom(dom) => dom.operation_name(),
            Command::Act(act) => act.operation_name(),
        }
    }

    /// `None` for Act commands.
    pub fn selector(&self) -> Option<&str> {
        match self {
            Command::Dom(dom) => Some(dom.selector()),
            Command::Act(_) => None,
        }
    }

    pub fn args(&self) -> &Value {
        match self {
            Command::Dom(dom) => dom.args(),
            Command::Act(act) => act.args(),
        }
    }

    pub fn debug_id(&self) -> Option<&str> {
        match self {
            Command::Dom(dom) => dom.debug_id(),
            Command::Act(act) => act.debug_id(),
        }
    }

    pub fn to_wire_op(&self) -> WireOp {
        WireOp::new(self.operation_name(), self.args().clone())
    }

    /// Appends a copy of this command to `queue`. Sending twice ships the
    /// effect twice.
    pub fn send(&self, queue: &mut CommandQueue) {
        queue.add(self.clone());
    }

    pub fn commit(&self, queue: &mut CommandQueue) {
        self.send(queue);
    }
}

#[cfg(test)]
#[path = "tests/command_tests.rs"]
mod tests;
