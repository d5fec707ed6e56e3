//! The CSS subset payload selectors use: type, `*`, `#id`, `.class`,
//! `[attr]`, `[attr=value]`, compounds of those, descendant and child
//! combinators, and comma-separated groups.

use super::{Document, NodeId};
use crate::error::SelectorError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList(Vec<Complex>);

#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    /// The combinator links each compound to the one before it; the first
    /// entry's combinator is unused.
    parts: Vec<(Combinator, Compound)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrMatch>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrMatch {
    name: String,
    value: Option<String>,
}

impl SelectorList {
    pub fn parse(selector: &str) -> Result<Self, SelectorError> {
        if selector.trim().is_empty() {
            return Err(SelectorError::Empty);
        }
        split_groups(selector)
            .into_iter()
            .map(|group| parse_complex(group, selector))
            .collect::<Result<Vec<_>, _>>()
            .map(SelectorList)
    }

    pub fn matches(&self, document: &Document, node: NodeId) -> bool {
        self.0.iter().any(|complex| complex.matches(document, node))
    }
}

impl Complex {
    fn matches(&self, document: &Document, node: NodeId) -> bool {
        self.matches_at(document, node, self.parts.len() - 1)
    }

    fn matches_at(&self, document: &Document, node: NodeId, index: usize) -> bool {
        let (combinator, compound) = &self.parts[index];
        if !compound.matches(document, node) {
            return false;
        }
        if index == 0 {
            return true;
        }
        match combinator {
            Combinator::Child => document
                .parent(node)
                .is_some_and(|parent| self.matches_at(document, parent, index - 1)),
            Combinator::Descendant => {
                let mut ancestor = document.parent(node);
                while let Some(current) = ancestor {
                    if self.matches_at(document, current, index - 1) {
                        return true;
                    }
                    ancestor = document.parent(current);
                }
                false
            }
        }
    }
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none() && self.id.is_none() && self.classes.is_empty() && self.attrs.is_empty()
    }

    fn matches(&self, document: &Document, node: NodeId) -> bool {
        let Some(tag) = document.tag_name(node) else {
            return false;
        };
        if self.tag.as_deref().is_some_and(|wanted| wanted != tag) {
            return false;
        }
        if let Some(id) = &self.id {
            if document.attr(node, "id") != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|class| document.has_class(node, class)) {
            return false;
        }
        self.attrs.iter().all(|attr| match &attr.value {
            None => document.attr(node, &attr.name).is_some(),
            Some(value) => document.attr(node, &attr.name) == Some(value.as_str()),
        })
    }
}

/// Splits on commas outside brackets and quotes.
fn split_groups(selector: &str) -> Vec<&str> {
    let mut groups = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (index, c) in selector.char_indices() {
        match (quote, c) {
            (Some(open), _) if c == open => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                groups.push(&selector[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    groups.push(&selector[start..]);
    groups
}

fn parse_complex(source: &str, whole: &str) -> Result<Complex, SelectorError> {
    let mut parts = Vec::new();
    let mut rest = source.trim();
    let mut combinator = Combinator::Descendant;

    if rest.is_empty() {
        return Err(unsupported(whole, ","));
    }
    while !rest.is_empty() {
        let (compound, after) = parse_compound(rest, whole)?;
        parts.push((combinator, compound));
        let after = after.trim_start();
        match after.strip_prefix('>') {
            Some(child) => {
                combinator = Combinator::Child;
                rest = child.trim_start();
                if rest.is_empty() {
                    return Err(unsupported(whole, ">"));
                }
            }
            None => {
                combinator = Combinator::Descendant;
                rest = after;
            }
        }
    }
    Ok(Complex { parts })
}

fn parse_compound<'a>(input: &'a str, whole: &str) -> Result<(Compound, &'a str), SelectorError> {
    let mut compound = Compound::default();
    let mut universal = false;
    let mut rest = input;

    if let Some(after) = rest.strip_prefix('*') {
        universal = true;
        rest = after;
    } else {
        let (tag, after) = split_ident(rest);
        if !tag.is_empty() {
            compound.tag = Some(tag.to_ascii_lowercase());
            rest = after;
        }
    }

    loop {
        match rest.chars().next() {
            Some('#') => {
                let (id, after) = split_ident(&rest[1..]);
                if id.is_empty() {
                    return Err(unsupported(whole, rest));
                }
                compound.id = Some(id.to_string());
                rest = after;
            }
            Some('.') => {
                let (class, after) = split_ident(&rest[1..]);
                if class.is_empty() {
                    return Err(unsupported(whole, rest));
                }
                compound.classes.push(class.to_string());
                rest = after;
            }
            Some('[') => {
                let Some(end) = rest.find(']') else {
                    return Err(unsupported(whole, rest));
                };
                compound.attrs.push(parse_attr(&rest[1..end], whole)?);
                rest = &rest[end + 1..];
            }
            Some(c) if c.is_whitespace() || c == '>' => break,
            None => break,
            Some(_) => return Err(unsupported(whole, rest)),
        }
    }

    if compound.is_empty() && !universal {
        return Err(unsupported(whole, input));
    }
    Ok((compound, rest))
}

fn parse_attr(inner: &str, whole: &str) -> Result<AttrMatch, SelectorError> {
    let (name, value) = match inner.split_once('=') {
        Some((name, value)) => {
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(value);
            (name.trim(), Some(value.to_string()))
        }
        None => (inner.trim(), None),
    };
    let (ident, leftover) = split_ident(name);
    if ident.is_empty() || !leftover.is_empty() {
        return Err(unsupported(whole, inner));
    }
    Ok(AttrMatch {
        name: ident.to_ascii_lowercase(),
        value,
    })
}

fn split_ident(input: &str) -> (&str, &str) {
    let end = input
        .find(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(input.len());
    input.split_at(end)
}

fn unsupported(selector: &str, fragment: &str) -> SelectorError {
    SelectorError::Unsupported {
        selector: selector.to_string(),
        fragment: fragment.to_string(),
    }
}
