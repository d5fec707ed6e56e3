use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("unknown {kind} operation '{name}'")]
    UnknownOperation { kind: &'static str, name: String },
    #[error("operation '{op}' expects {expected}")]
    BadArgument { op: String, expected: &'static str },
    #[error("invalid payload: {0}")]
    Payload(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("unsupported selector syntax '{fragment}' in '{selector}'")]
    Unsupported { selector: String, fragment: String },
}
