use std::fmt;

use serde::{
    de::{MapAccess, SeqAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};
use serde_json::Value;

/// One operation on the wire: `{"f": <name>, "a": <argument>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireOp {
    pub f: String,
    #[serde(default)]
    pub a: Value,
}

impl WireOp {
    pub fn new(f: impl Into<String>, a: Value) -> Self {
        Self { f: f.into(), a }
    }

    /// Positional view of the argument. A scalar becomes a single-element
    /// list and `null` becomes an empty one.
    pub fn args_list(&self) -> Vec<Value> {
        match &self.a {
            Value::Array(items) => items.clone(),
            Value::Null => Vec::new(),
            other => vec![other.clone()],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DomGroup {
    pub selector: String,
    pub ops: Vec<WireOp>,
}

/// The `"dom"` object: selector → ordered op list, kept in first-seen
/// selector order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomGroups(Vec<DomGroup>);

impl DomGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, selector: &str, op: WireOp) {
        match self.0.iter_mut().find(|group| group.selector == selector) {
            Some(group) => group.ops.push(op),
            None => self.0.push(DomGroup {
                selector: selector.to_string(),
                ops: vec![op],
            }),
        }
    }

    pub fn get(&self, selector: &str) -> Option<&[WireOp]> {
        self.0
            .iter()
            .find(|group| group.selector == selector)
            .map(|group| group.ops.as_slice())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DomGroup> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a DomGroups {
    type Item = &'a DomGroup;
    type IntoIter = std::slice::Iter<'a, DomGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for DomGroups {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for group in &self.0 {
            map.serialize_entry(&group.selector, &group.ops)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DomGroups {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DomGroupsVisitor)
    }
}

struct DomGroupsVisitor;

impl<'de> Visitor<'de> for DomGroupsVisitor {
    type Value = DomGroups;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of selector to operation list")
    }

    fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Self::Value, M::Error> {
        let mut groups = DomGroups::new();
        while let Some((selector, ops)) = access.next_entry::<String, Vec<WireOp>>()? {
            for op in ops {
                groups.push(&selector, op);
            }
        }
        Ok(groups)
    }

    // Encoders that cannot tell an empty map from an empty list emit `[]`.
    fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        while access.next_element::<serde::de::IgnoredAny>()?.is_some() {}
        Ok(DomGroups::new())
    }

    fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
        Ok(DomGroups::new())
    }
}

/// Snapshot produced by a queue and consumed by the client dispatcher.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WirePayload {
    #[serde(default, skip_serializing_if = "DomGroups::is_empty")]
    pub dom: DomGroups,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub act: Vec<WireOp>,
}

impl WirePayload {
    pub fn is_empty(&self) -> bool {
        self.dom.is_empty() && self.act.is_empty()
    }

    pub fn op_count(&self) -> usize {
        self.dom.iter().map(|group| group.ops.len()).sum::<usize>() + self.act.len()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
