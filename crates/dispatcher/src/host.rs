use serde_json::Value;

use crate::ops::DomOp;

/// The page a payload is applied to.
pub trait Host {
    /// Nodes matched by one selector, reused for every op of its group.
    type Selection;

    /// `None` when nothing matches or the selector cannot be understood.
    fn select(&mut self, selector: &str) -> Option<Self::Selection>;

    fn apply(&mut self, selection: &Self::Selection, op: &DomOp) -> anyhow::Result<()>;

    fn alert(&mut self, text: &str);

    fn log(&mut self, value: &Value);

    fn load_script(&mut self, url: &str);

    /// `None` reloads the current page.
    fn navigate(&mut self, url: Option<&str>);

    /// Re-attaches page behaviours to freshly inserted markup. Must be safe to
    /// run any number of times.
    fn enhance(&mut self);
}
