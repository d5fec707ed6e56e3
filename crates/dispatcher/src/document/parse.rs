//! Lenient HTML fragment parser. Never fails: stray end tags are dropped and
//! unclosed elements are closed at the end of input.

use super::{is_void, Document, NodeId};

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

/// Parses `html` into `document` and returns the detached top-level nodes.
pub(super) fn parse_fragment(document: &mut Document, html: &str) -> Vec<NodeId> {
    let mut roots = Vec::new();
    let mut open: Vec<(NodeId, String)> = Vec::new();
    let mut rest = html;

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("<!--") {
            rest = after.find("-->").map_or("", |end| &after[end + 3..]);
        } else if rest.starts_with("<!") || rest.starts_with("<?") {
            rest = rest.find('>').map_or("", |end| &rest[end + 1..]);
        } else if let Some(after) = rest.strip_prefix("</") {
            let end = after.find('>').unwrap_or(after.len());
            let name = after[..end].trim().to_ascii_lowercase();
            if let Some(depth) = open.iter().rposition(|(_, tag)| *tag == name) {
                open.truncate(depth);
            }
            rest = after.get(end + 1..).unwrap_or("");
        } else if starts_element(rest) {
            let tag = read_tag(rest);
            let node = document.create_element(&tag.name, tag.attrs);
            place(document, &mut roots, &open, node);
            rest = tag.rest;

            if tag.self_closing || is_void(&tag.name) {
                continue;
            }
            if RAW_TEXT_ELEMENTS.contains(&tag.name.as_str()) {
                let end = find_ignore_case(rest, &format!("</{}", tag.name)).unwrap_or(rest.len());
                if end > 0 {
                    let text = document.create_text(&rest[..end]);
                    document.attach(node, text, None);
                }
                rest = &rest[end..];
                rest = rest.find('>').map_or("", |close| &rest[close + 1..]);
            } else {
                open.push((node, tag.name));
            }
        } else {
            let end = next_markup(rest);
            let text = document.create_text(&rest[..end]);
            place(document, &mut roots, &open, text);
            rest = &rest[end..];
        }
    }
    roots
}

struct Tag<'a> {
    name: String,
    attrs: Vec<(String, String)>,
    self_closing: bool,
    rest: &'a str,
}

fn read_tag(input: &str) -> Tag<'_> {
    let (name, mut rest) = split_while(&input[1..], |c| c.is_ascii_alphanumeric() || c == '-');
    let mut attrs: Vec<(String, String)> = Vec::new();
    let mut self_closing = false;

    loop {
        rest = rest.trim_start();
        if let Some(after) = rest.strip_prefix("/>") {
            self_closing = true;
            rest = after;
            break;
        }
        if let Some(after) = rest.strip_prefix('>') {
            rest = after;
            break;
        }
        if rest.is_empty() {
            break;
        }
        if let Some(after) = rest.strip_prefix('/') {
            rest = after;
            continue;
        }

        let (attr_name, after) =
            split_while(rest, |c| !c.is_whitespace() && c != '=' && c != '>' && c != '/');
        if attr_name.is_empty() {
            // Lone '=' or similar junk; step over one char.
            let mut chars = rest.chars();
            chars.next();
            rest = chars.as_str();
            continue;
        }
        rest = after.trim_start();

        let mut value = String::new();
        if let Some(after) = rest.strip_prefix('=') {
            let after = after.trim_start();
            match after.chars().next() {
                Some(quote @ ('"' | '\'')) => {
                    let body = &after[1..];
                    let end = body.find(quote).unwrap_or(body.len());
                    value = body[..end].to_string();
                    rest = body.get(end + 1..).unwrap_or("");
                }
                _ => {
                    let (raw, after) = split_while(after, |c| !c.is_whitespace() && c != '>');
                    value = raw.to_string();
                    rest = after;
                }
            }
        }

        let attr_name = attr_name.to_ascii_lowercase();
        if !attrs.iter().any(|(existing, _)| *existing == attr_name) {
            attrs.push((attr_name, value));
        }
    }

    Tag {
        name: name.to_ascii_lowercase(),
        attrs,
        self_closing,
        rest,
    }
}

fn place(document: &mut Document, roots: &mut Vec<NodeId>, open: &[(NodeId, String)], node: NodeId) {
    match open.last() {
        Some((parent, _)) => document.attach(*parent, node, None),
        None => roots.push(node),
    }
}

fn starts_element(input: &str) -> bool {
    let mut chars = input.chars();
    chars.next() == Some('<') && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
}

/// Length of the text run before the next tag, comment or end tag. Always
/// consumes at least the first char.
fn next_markup(input: &str) -> usize {
    input
        .char_indices()
        .skip(1)
        .find(|&(index, c)| {
            c == '<'
                && input[index + 1..]
                    .chars()
                    .next()
                    .is_some_and(|next| next.is_ascii_alphabetic() || next == '/' || next == '!')
        })
        .map_or(input.len(), |(index, _)| index)
}

fn split_while(input: &str, keep: impl Fn(char) -> bool) -> (&str, &str) {
    let end = input.find(|c: char| !keep(c)).unwrap_or(input.len());
    input.split_at(end)
}

fn find_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .to_ascii_lowercase()
        .find(&needle.to_ascii_lowercase())
}
