//! Request-scoped accumulation of client-side effects.
//!
//! Handlers build [`Command`] values (usually through the [`dom`] and [`act`]
//! factories), push them into the request's [`CommandQueue`], and the request
//! layer calls [`CommandQueue::process`] once to obtain the JSON body of the
//! ajax response.

pub mod act;
mod command;
mod diagnostics;
pub mod dom;
pub mod flash;
mod queue;

pub use command::{ActCommand, Command, DomCommand};
pub use flash::{flash_to_commands, render_alert, FlashSource};
pub use queue::{group, CommandQueue, QueueSettings};
pub use shared::{
    domain::{CommandKind, FlashKind, FlashMessage},
    error::{RenderError, ValidationError},
    protocol::{WireOp, WirePayload},
};
