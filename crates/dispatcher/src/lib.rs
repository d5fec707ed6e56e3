//! Client side of the ajax command protocol.
//!
//! [`dispatch`] walks one wire payload and applies it to a [`Host`] through
//! two closed operation tables ([`DomOp`], [`ActOp`]). Anything it does not
//! understand is logged and skipped. [`Document`] is an in-memory host used by
//! the tooling and the tests.

mod decode;
mod dispatch;
pub mod document;
pub mod error;
mod host;
pub mod ops;

pub use dispatch::{dispatch, dispatch_str, DispatchOptions, DispatchReport, Rejected};
pub use document::{Document, Effects, NodeId};
pub use error::{DispatchError, SelectorError};
pub use host::Host;
pub use ops::{ActOp, DomOp, ErrorNotice};
