//! Entry-by-entry decoding of a response body. Groups and actions are first
//! read as raw JSON, so an entry the client cannot read only costs itself.

use std::fmt;

use serde::{
    de::{IgnoredAny, MapAccess, SeqAccess, Visitor},
    Deserialize, Deserializer,
};
use serde_json::Value;
use shared::protocol::{DomGroups, WireOp, WirePayload};

use crate::{dispatch::DispatchReport, error::DispatchError};

/// Top level of a body, one level deep. Selector order is kept as sent.
#[derive(Debug, Default)]
struct LooseBody {
    dom: LooseGroups,
    act: Value,
}

#[derive(Debug, Default)]
enum LooseGroups {
    #[default]
    Missing,
    Groups(Vec<(String, Value)>),
    /// `"dom"` was a scalar.
    Invalid,
}

/// Decodes `raw` into the readable part of the payload. Unreadable entries
/// are recorded on `report`; only a body that is not a JSON object fails.
pub(crate) fn decode(raw: &str, report: &mut DispatchReport) -> Result<WirePayload, DispatchError> {
    let body: LooseBody = serde_json::from_str(raw)?;
    let mut payload = WirePayload {
        dom: DomGroups::new(),
        act: Vec::new(),
    };

    match body.dom {
        LooseGroups::Missing => {}
        LooseGroups::Invalid => report.reject(None, "dom", "expected a map of selector to operations"),
        LooseGroups::Groups(groups) => {
            for (selector, ops) in groups {
                match ops {
                    Value::Array(ops) => {
                        for op in ops {
                            match wire_op(op) {
                                Ok(op) => payload.dom.push(&selector, op),
                                Err((name, err)) => report.reject(Some(&selector), &name, err),
                            }
                        }
                    }
                    Value::Null => {}
                    _ => report.reject(Some(&selector), "dom", "expected a list of operations"),
                }
            }
        }
    }

    match body.act {
        Value::Null => {}
        Value::Array(ops) => {
            for op in ops {
                match wire_op(op) {
                    Ok(op) => payload.act.push(op),
                    Err((name, err)) => report.reject(None, &name, err),
                }
            }
        }
        _ => report.reject(None, "act", "expected a list of actions"),
    }

    Ok(payload)
}

/// On failure returns the entry's `f` as far as it can be read.
fn wire_op(value: Value) -> Result<WireOp, (String, serde_json::Error)> {
    let name = match value.get("f") {
        Some(Value::String(name)) => name.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    };
    serde_json::from_value(value).map_err(|err| (name, err))
}

impl<'de> Deserialize<'de> for LooseBody {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(LooseBodyVisitor)
    }
}

struct LooseBodyVisitor;

impl<'de> Visitor<'de> for LooseBodyVisitor {
    type Value = LooseBody;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a JSON object")
    }

    fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Self::Value, M::Error> {
        let mut body = LooseBody::default();
        while let Some(key) = access.next_key::<String>()? {
            match key.as_str() {
                "dom" => body.dom = access.next_value()?,
                "act" => body.act = access.next_value()?,
                _ => {
                    access.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(body)
    }
}

impl<'de> Deserialize<'de> for LooseGroups {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(LooseGroupsVisitor)
    }
}

struct LooseGroupsVisitor;

impl<'de> Visitor<'de> for LooseGroupsVisitor {
    type Value = LooseGroups;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of selector to operation list")
    }

    fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Self::Value, M::Error> {
        let mut groups = Vec::new();
        while let Some(entry) = access.next_entry::<String, Value>()? {
            groups.push(entry);
        }
        Ok(LooseGroups::Groups(groups))
    }

    // `[]` is how some encoders write an empty map.
    fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut empty = true;
        while access.next_element::<IgnoredAny>()?.is_some() {
            empty = false;
        }
        Ok(if empty {
            LooseGroups::Missing
        } else {
            LooseGroups::Invalid
        })
    }

    fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
        Ok(LooseGroups::Missing)
    }

    fn visit_bool<E: serde::de::Error>(self, _: bool) -> Result<Self::Value, E> {
        Ok(LooseGroups::Invalid)
    }

    fn visit_i64<E: serde::de::Error>(self, _: i64) -> Result<Self::Value, E> {
        Ok(LooseGroups::Invalid)
    }

    fn visit_u64<E: serde::de::Error>(self, _: u64) -> Result<Self::Value, E> {
        Ok(LooseGroups::Invalid)
    }

    fn visit_f64<E: serde::de::Error>(self, _: f64) -> Result<Self::Value, E> {
        Ok(LooseGroups::Invalid)
    }

    fn visit_str<E: serde::de::Error>(self, _: &str) -> Result<Self::Value, E> {
        Ok(LooseGroups::Invalid)
    }
}
