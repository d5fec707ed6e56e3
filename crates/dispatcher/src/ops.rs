//! Allow-listed operation tables. A wire op is only ever executed after it
//! has been parsed into one of these enums.

use serde_json::Value;
use shared::protocol::WireOp;

use crate::error::DispatchError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomOp {
    Html(String),
    Append(String),
    Prepend(String),
    ReplaceWith(String),
    Text(String),
    AddClass(String),
    RemoveClass(String),
    ToggleClass(String),
    /// `value: None` removes the attribute.
    Attr {
        name: String,
        value: Option<String>,
    },
    RemoveAttr(String),
    Css {
        property: String,
        value: String,
    },
    Val(String),
    Show,
    Hide,
    Empty,
    Remove,
}

impl DomOp {
    pub fn parse(op: &WireOp) -> Result<Self, DispatchError> {
        let args = op.args_list();
        let parsed = match op.f.as_str() {
            "html" => DomOp::Html(text_arg(op, &args, "markup")?),
            "append" => DomOp::Append(text_arg(op, &args, "markup")?),
            "prepend" => DomOp::Prepend(text_arg(op, &args, "markup")?),
            "replaceWith" => DomOp::ReplaceWith(text_arg(op, &args, "markup")?),
            "text" => DomOp::Text(text_arg(op, &args, "text")?),
            "addClass" => DomOp::AddClass(text_arg(op, &args, "a class name")?),
            "removeClass" => DomOp::RemoveClass(text_arg(op, &args, "a class name")?),
            "toggleClass" => DomOp::ToggleClass(text_arg(op, &args, "a class name")?),
            "attr" | "attrib" => {
                let name = text_arg(op, &args, "[name, value]")?;
                let value = args.get(1).and_then(scalar_text);
                DomOp::Attr { name, value }
            }
            "removeAttr" => DomOp::RemoveAttr(text_arg(op, &args, "an attribute name")?),
            "css" => {
                let property = text_arg(op, &args, "[property, value]")?;
                let value = args
                    .get(1)
                    .and_then(scalar_text)
                    .ok_or_else(|| bad_argument(op, "[property, value]"))?;
                DomOp::Css { property, value }
            }
            "val" => DomOp::Val(text_arg(op, &args, "a value")?),
            "show" => DomOp::Show,
            "hide" => DomOp::Hide,
            "empty" => DomOp::Empty,
            "remove" => DomOp::Remove,
            other => {
                return Err(DispatchError::UnknownOperation {
                    kind: "dom",
                    name: other.to_string(),
                })
            }
        };
        Ok(parsed)
    }

    pub fn name(&self) -> &'static str {
        match self {
            DomOp::Html(_) => "html",
            DomOp::Append(_) => "append",
            DomOp::Prepend(_) => "prepend",
            DomOp::ReplaceWith(_) => "replaceWith",
            DomOp::Text(_) => "text",
            DomOp::AddClass(_) => "addClass",
            DomOp::RemoveClass(_) => "removeClass",
            DomOp::ToggleClass(_) => "toggleClass",
            DomOp::Attr { .. } => "attr",
            DomOp::RemoveAttr(_) => "removeAttr",
            DomOp::Css { .. } => "css",
            DomOp::Val(_) => "val",
            DomOp::Show => "show",
            DomOp::Hide => "hide",
            DomOp::Empty => "empty",
            DomOp::Remove => "remove",
        }
    }
}

/// Payload of an `error` action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorNotice {
    /// `[selector, html]`: ready-made markup for a specific node.
    Markup { target: String, html: String },
    /// `[text, id]`: plain message shown in the message area.
    Message { text: String, id: Option<i64> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActOp {
    Alert(String),
    Error(ErrorNotice),
    Log(Value),
    LoadScript(String),
    /// `None` reloads the current page.
    Navigate(Option<String>),
}

impl ActOp {
    pub fn parse(op: &WireOp) -> Result<Self, DispatchError> {
        let args = op.args_list();
        let parsed = match op.f.as_str() {
            "alert" => ActOp::Alert(text_arg(op, &args, "[text]")?),
            "error" => ActOp::Error(error_notice(op, &args)?),
            "console" | "dump" | "log" => ActOp::Log(op.a.clone()),
            "loadScript" => ActOp::LoadScript(url_arg(op, &args)?),
            "refresh" => ActOp::Navigate(args.first().and_then(scalar_text)),
            "href" => ActOp::Navigate(Some(url_arg(op, &args)?)),
            other => {
                return Err(DispatchError::UnknownOperation {
                    kind: "act",
                    name: other.to_string(),
                })
            }
        };
        Ok(parsed)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ActOp::Alert(_) => "alert",
            ActOp::Error(_) => "error",
            ActOp::Log(_) => "log",
            ActOp::LoadScript(_) => "loadScript",
            ActOp::Navigate(_) => "navigate",
        }
    }
}

fn error_notice(op: &WireOp, args: &[Value]) -> Result<ErrorNotice, DispatchError> {
    const EXPECTED: &str = "[selector, html] or [text, id]";
    let first = args
        .first()
        .and_then(scalar_text)
        .ok_or_else(|| bad_argument(op, EXPECTED))?;
    match args.get(1) {
        Some(Value::String(html)) => Ok(ErrorNotice::Markup {
            target: first,
            html: html.clone(),
        }),
        Some(Value::Number(id)) => Ok(ErrorNotice::Message {
            text: first,
            id: id.as_i64(),
        }),
        None | Some(Value::Null) => Ok(ErrorNotice::Message {
            text: first,
            id: None,
        }),
        Some(_) => Err(bad_argument(op, EXPECTED)),
    }
}

fn text_arg(op: &WireOp, args: &[Value], expected: &'static str) -> Result<String, DispatchError> {
    args.first()
        .and_then(scalar_text)
        .ok_or_else(|| bad_argument(op, expected))
}

fn url_arg(op: &WireOp, args: &[Value]) -> Result<String, DispatchError> {
    text_arg(op, args, "[url]").and_then(|url| {
        if url.trim().is_empty() {
            Err(bad_argument(op, "a non-empty url"))
        } else {
            Ok(url)
        }
    })
}

/// String form of a scalar, the way a browser would coerce it.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn bad_argument(op: &WireOp, expected: &'static str) -> DispatchError {
    DispatchError::BadArgument {
        op: op.f.clone(),
        expected,
    }
}

#[cfg(test)]
#[path = "tests/ops_tests.rs"]
mod tests;
