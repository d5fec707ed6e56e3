//! In-memory page used to replay payloads outside a browser.

mod enhance;
mod parse;
mod selector;

use serde_json::Value;
use tracing::{debug, warn};

use crate::{error::SelectorError, host::Host, ops::DomOp};

pub use enhance::FadeTimer;
pub use selector::SelectorList;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

pub(crate) fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
enum NodeData {
    Root,
    Element(Element),
    /// Serialized text, entities kept as written.
    Text(String),
}

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

/// Side effects the page was asked to perform.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Effects {
    pub alerts: Vec<String>,
    pub console: Vec<Value>,
    pub scripts: Vec<String>,
    /// `None` entries are reloads.
    pub navigations: Vec<Option<String>>,
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    effects: Effects,
    timers: Vec<FadeTimer>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                data: NodeData::Root,
            }],
            effects: Effects::default(),
            timers: Vec::new(),
        }
    }
}

impl Document {
    pub fn parse(html: &str) -> Self {
        let mut document = Self::default();
        let root = document.root();
        for node in parse::parse_fragment(&mut document, html) {
            document.attach(root, node, None);
        }
        document
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn effects(&self) -> &Effects {
        &self.effects
    }

    pub fn fade_timers(&self) -> &[FadeTimer] {
        &self.timers
    }

    /// Serialized page.
    pub fn to_html(&self) -> String {
        self.inner_html(self.root())
    }

    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for &child in &self.nodes[node.0].children {
            self.write_node(child, &mut out);
        }
        out
    }

    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_node(node, &mut out);
        out
    }

    /// Matching elements in document order. Detached nodes are never matched.
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        let list = SelectorList::parse(selector)?;
        let mut matches = Vec::new();
        self.walk(self.root(), &mut |id| {
            if list.matches(self, id) {
                matches.push(id);
            }
        });
        Ok(matches)
    }

    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|el| el.tag.as_str())
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)?
            .attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.attr(node, "class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// Concatenated text of the subtree, as serialized.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        let mut pending = vec![node];
        while let Some(id) = pending.pop() {
            match &self.nodes[id.0].data {
                NodeData::Text(text) => out.push_str(text),
                _ => pending.extend(self.nodes[id.0].children.iter().rev().copied()),
            }
        }
        out
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(el) = self.element_mut(node) else {
            return;
        };
        match el.attrs.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => el.attrs.push((name.to_string(), value.to_string())),
        }
    }

    pub fn remove_attr(&mut self, node: NodeId, name: &str) {
        if let Some(el) = self.element_mut(node) {
            el.attrs.retain(|(key, _)| key != name);
        }
    }

    pub fn add_class(&mut self, node: NodeId, classes: &str) {
        self.edit_classes(node, |list| {
            for class in classes.split_whitespace() {
                if !list.iter().any(|c| c == class) {
                    list.push(class.to_string());
                }
            }
        });
    }

    pub fn remove_class(&mut self, node: NodeId, classes: &str) {
        self.edit_classes(node, |list| {
            list.retain(|c| !classes.split_whitespace().any(|gone| gone == c));
        });
    }

    pub fn toggle_class(&mut self, node: NodeId, classes: &str) {
        self.edit_classes(node, |list| {
            for class in classes.split_whitespace() {
                match list.iter().position(|c| c == class) {
                    Some(index) => {
                        list.remove(index);
                    }
                    None => list.push(class.to_string()),
                }
            }
        });
    }

    pub fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        let mut declarations: Vec<(String, String)> = self
            .attr(node, "style")
            .unwrap_or_default()
            .split(';')
            .filter_map(|decl| {
                let (key, val) = decl.split_once(':')?;
                Some((key.trim().to_string(), val.trim().to_string()))
            })
            .filter(|(key, _)| !key.is_empty())
            .collect();
        declarations.retain(|(key, _)| key != property);
        if !value.is_empty() {
            declarations.push((property.to_string(), value.to_string()));
        }
        if declarations.is_empty() {
            self.remove_attr(node, "style");
        } else {
            let style = declarations
                .iter()
                .map(|(key, val)| format!("{key}: {val};"))
                .collect::<Vec<_>>()
                .join(" ");
            self.set_attr(node, "style", &style);
        }
    }

    pub fn set_html(&mut self, node: NodeId, html: &str) {
        self.clear_children(node);
        self.append_html(node, html);
    }

    pub fn append_html(&mut self, node: NodeId, html: &str) {
        for child in parse::parse_fragment(self, html) {
            self.attach(node, child, None);
        }
    }

    pub fn prepend_html(&mut self, node: NodeId, html: &str) {
        for (offset, child) in parse::parse_fragment(self, html).into_iter().enumerate() {
            self.attach(node, child, Some(offset));
        }
    }

    /// Inserts `html` right after `node` in its parent.
    pub fn insert_html_after(&mut self, node: NodeId, html: &str) {
        let Some(parent) = self.parent(node) else {
            return;
        };
        let Some(start) = self.child_index(parent, node) else {
            return;
        };
        for (offset, child) in parse::parse_fragment(self, html).into_iter().enumerate() {
            self.attach(parent, child, Some(start + 1 + offset));
        }
    }

    pub fn replace_with_html(&mut self, node: NodeId, html: &str) {
        self.insert_html_after(node, html);
        self.detach(node);
    }

    pub fn set_text(&mut self, node: NodeId, text: &str) {
        self.clear_children(node);
        if !text.is_empty() {
            let child = self.create(NodeData::Text(escape_text(text)));
            self.attach(node, child, None);
        }
    }

    pub fn clear_children(&mut self, node: NodeId) {
        let children = std::mem::take(&mut self.nodes[node.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
    }

    /// Unlinks `node` from its parent; the subtree stays addressable.
    pub fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.nodes[node.0].parent.take() else {
            return;
        };
        self.nodes[parent.0].children.retain(|&child| child != node);
    }

    fn apply_to(&mut self, node: NodeId, op: &DomOp) {
        match op {
            DomOp::Html(html) => self.set_html(node, html),
            DomOp::Append(html) => self.append_html(node, html),
            DomOp::Prepend(html) => self.prepend_html(node, html),
            DomOp::ReplaceWith(html) => self.replace_with_html(node, html),
            DomOp::Text(text) => self.set_text(node, text),
            DomOp::AddClass(classes) => self.add_class(node, classes),
            DomOp::RemoveClass(classes) => self.remove_class(node, classes),
            DomOp::ToggleClass(classes) => self.toggle_class(node, classes),
            DomOp::Attr {
                name,
                value: Some(value),
            } => self.set_attr(node, name, value),
            DomOp::Attr { name, value: None } | DomOp::RemoveAttr(name) => {
                self.remove_attr(node, name)
            }
            DomOp::Css { property, value } => self.set_style(node, property, value),
            DomOp::Val(value) => {
                if self.tag_name(node) == Some("textarea") {
                    self.set_text(node, value);
                } else {
                    self.set_attr(node, "value", value);
                }
            }
            DomOp::Show => self.set_style(node, "display", ""),
            DomOp::Hide => self.set_style(node, "display", "none"),
            DomOp::Empty => self.clear_children(node),
            DomOp::Remove => self.detach(node),
        }
    }

    pub(crate) fn create_element(&mut self, tag: &str, attrs: Vec<(String, String)>) -> NodeId {
        self.create(NodeData::Element(Element {
            tag: tag.to_string(),
            attrs,
        }))
    }

    pub(crate) fn create_text(&mut self, text: &str) -> NodeId {
        self.create(NodeData::Text(text.to_string()))
    }

    fn create(&mut self, data: NodeData) -> NodeId {
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            data,
        });
        NodeId(self.nodes.len() - 1)
    }

    /// Links a parentless `child` under `parent`, at `index` or at the end.
    pub(crate) fn attach(&mut self, parent: NodeId, child: NodeId, index: Option<usize>) {
        self.detach(child);
        let children = &mut self.nodes[parent.0].children;
        let index = index.unwrap_or(children.len()).min(children.len());
        children.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
    }

    fn child_index(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.nodes[parent.0].children.iter().position(|&c| c == child)
    }

    fn element(&self, node: NodeId) -> Option<&Element> {
        match &self.nodes.get(node.0)?.data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        match &mut self.nodes.get_mut(node.0)?.data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    fn edit_classes(&mut self, node: NodeId, edit: impl FnOnce(&mut Vec<String>)) {
        if self.element(node).is_none() {
            return;
        }
        let mut list: Vec<String> = self
            .attr(node, "class")
            .unwrap_or_default()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        edit(&mut list);
        if list.is_empty() {
            self.remove_attr(node, "class");
        } else {
            self.set_attr(node, "class", &list.join(" "));
        }
    }

    /// Pre-order walk over elements below `node`.
    fn walk(&self, node: NodeId, visit: &mut impl FnMut(NodeId)) {
        let mut pending: Vec<NodeId> = self.nodes[node.0].children.iter().rev().copied().collect();
        while let Some(id) = pending.pop() {
            if self.element(id).is_none() {
                continue;
            }
            visit(id);
            pending.extend(self.nodes[id.0].children.iter().rev().copied());
        }
    }

    fn write_node(&self, node: NodeId, out: &mut String) {
        enum Step {
            Open(NodeId),
            Close(NodeId),
        }

        let mut steps = vec![Step::Open(node)];
        while let Some(step) = steps.pop() {
            let id = match step {
                Step::Close(id) => {
                    if let Some(el) = self.element(id) {
                        out.push_str("</");
                        out.push_str(&el.tag);
                        out.push('>');
                    }
                    continue;
                }
                Step::Open(id) => id,
            };
            match &self.nodes[id.0].data {
                NodeData::Root => {}
                NodeData::Text(text) => {
                    out.push_str(text);
                    continue;
                }
                NodeData::Element(el) => {
                    out.push('<');
                    out.push_str(&el.tag);
                    for (name, value) in &el.attrs {
                        out.push(' ');
                        out.push_str(name);
                        out.push_str("=\"");
                        out.push_str(&value.replace('"', "&quot;"));
                        out.push('"');
                    }
                    out.push('>');
                    if is_void(&el.tag) {
                        continue;
                    }
                    steps.push(Step::Close(id));
                }
            }
            steps.extend(self.nodes[id.0].children.iter().rev().map(|&child| Step::Open(child)));
        }
    }
}

impl Host for Document {
    type Selection = Vec<NodeId>;

    fn select(&mut self, selector: &str) -> Option<Self::Selection> {
        match self.query_selector_all(selector) {
            Ok(nodes) if !nodes.is_empty() => Some(nodes),
            Ok(_) => None,
            Err(err) => {
                warn!(%selector, error = %err, "selector not understood");
                None
            }
        }
    }

    fn apply(&mut self, selection: &Self::Selection, op: &DomOp) -> anyhow::Result<()> {
        for &node in selection {
            self.apply_to(node, op);
        }
        Ok(())
    }

    fn alert(&mut self, text: &str) {
        self.effects.alerts.push(text.to_string());
    }

    fn log(&mut self, value: &Value) {
        debug!(%value, "console");
        self.effects.console.push(value.clone());
    }

    fn load_script(&mut self, url: &str) {
        self.effects.scripts.push(url.to_string());
    }

    fn navigate(&mut self, url: Option<&str>) {
        self.effects.navigations.push(url.map(str::to_string));
    }

    fn enhance(&mut self) {
        enhance::run(self);
    }
}

pub(crate) fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
#[path = "../tests/document_tests.rs"]
mod tests;
