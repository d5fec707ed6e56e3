//! Page behaviours re-attached after every payload. Each node records the
//! behaviours it already received in `data-enhanced`, so a pass over an
//! already enhanced page changes nothing.

use tracing::warn;

use super::{Document, NodeId};

const MARKER_ATTR: &str = "data-enhanced";
const DEFAULT_FADE_MS: u64 = 5000;

/// Pending fade-out of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FadeTimer {
    pub node: NodeId,
    pub delay_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Behaviour {
    DatePicker,
    Tooltip,
    MaxLength,
    FadeOut,
}

impl Behaviour {
    const ALL: [Behaviour; 4] = [
        Behaviour::DatePicker,
        Behaviour::Tooltip,
        Behaviour::MaxLength,
        Behaviour::FadeOut,
    ];

    fn name(self) -> &'static str {
        match self {
            Behaviour::DatePicker => "datepicker",
            Behaviour::Tooltip => "tooltip",
            Behaviour::MaxLength => "maxlength",
            Behaviour::FadeOut => "fadeout",
        }
    }

    fn selector(self) -> &'static str {
        match self {
            Behaviour::DatePicker => "input.datepicker, input[data-provide=datepicker]",
            Behaviour::Tooltip => "[data-toggle=tooltip]",
            Behaviour::MaxLength => "input[maxlength], textarea[maxlength]",
            Behaviour::FadeOut => ".fadeout",
        }
    }
}

pub(super) fn run(document: &mut Document) {
    for behaviour in Behaviour::ALL {
        let nodes = match document.query_selector_all(behaviour.selector()) {
            Ok(nodes) => nodes,
            Err(err) => {
                warn!(behaviour = behaviour.name(), error = %err, "enhancement selector rejected");
                continue;
            }
        };
        for node in nodes {
            if has_marker(document, node, behaviour) {
                continue;
            }
            attach(document, node, behaviour);
            add_marker(document, node, behaviour);
        }
    }
}

fn attach(document: &mut Document, node: NodeId, behaviour: Behaviour) {
    match behaviour {
        Behaviour::DatePicker => document.set_attr(node, "autocomplete", "off"),
        Behaviour::Tooltip => {
            if let Some(title) = document.attr(node, "title").map(str::to_string) {
                document.set_attr(node, "data-original-title", &title);
                document.remove_attr(node, "title");
            }
        }
        Behaviour::MaxLength => {
            let limit = document
                .attr(node, "maxlength")
                .and_then(|raw| raw.trim().parse::<usize>().ok())
                .unwrap_or(0);
            let used = if document.tag_name(node) == Some("textarea") {
                document.text_content(node).chars().count()
            } else {
                document.attr(node, "value").unwrap_or_default().chars().count()
            };
            let remaining = limit.saturating_sub(used);
            document.insert_html_after(
                node,
                &format!(r#"<span class="maxlength-counter">{remaining}</span>"#),
            );
        }
        Behaviour::FadeOut => {
            let delay_ms = document
                .attr(node, "data-fadeout")
                .and_then(|raw| raw.trim().parse::<u64>().ok())
                .filter(|delay| *delay > 0)
                .unwrap_or(DEFAULT_FADE_MS);
            document.timers.push(FadeTimer { node, delay_ms });
        }
    }
}

fn has_marker(document: &Document, node: NodeId, behaviour: Behaviour) -> bool {
    document
        .attr(node, MARKER_ATTR)
        .is_some_and(|marks| marks.split_whitespace().any(|m| m == behaviour.name()))
}

fn add_marker(document: &mut Document, node: NodeId, behaviour: Behaviour) {
    let marks = match document.attr(node, MARKER_ATTR) {
        Some(existing) if !existing.is_empty() => format!("{existing} {}", behaviour.name()),
        _ => behaviour.name().to_string(),
    };
    document.set_attr(node, MARKER_ATTR, &marks);
}
