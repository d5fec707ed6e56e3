use std::collections::HashSet;

use super::*;
use crate::Document;
use command_queue::{act, dom, CommandQueue, FlashKind, FlashMessage, QueueSettings};
use serde_json::{json, Value};

/// Host that records every call instead of touching a page.
#[derive(Default)]
struct Recorder {
    missing: HashSet<String>,
    failing_op: Option<&'static str>,
    calls: Vec<(String, DomOp)>,
    alerts: Vec<String>,
    logs: Vec<Value>,
    scripts: Vec<String>,
    navigations: Vec<Option<String>>,
    enhance_runs: usize,
}

impl Recorder {
    fn missing(selectors: &[&str]) -> Self {
        Self {
            missing: selectors.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    fn ops_for(&self, selector: &str) -> Vec<&'static str> {
        self.calls
            .iter()
            .filter(|(s, _)| s == selector)
            .map(|(_, op)| op.name())
            .collect()
    }
}

impl Host for Recorder {
    type Selection = String;

    fn select(&mut self, selector: &str) -> Option<String> {
        (!self.missing.contains(selector)).then(|| selector.to_string())
    }

    fn apply(&mut self, selection: &String, op: &DomOp) -> anyhow::Result<()> {
        if self.failing_op == Some(op.name()) {
            anyhow::bail!("{} blew up", op.name());
        }
        self.calls.push((selection.clone(), op.clone()));
        Ok(())
    }

    fn alert(&mut self, text: &str) {
        self.alerts.push(text.to_string());
    }

    fn log(&mut self, value: &Value) {
        self.logs.push(value.clone());
    }

    fn load_script(&mut self, url: &str) {
        self.scripts.push(url.to_string());
    }

    fn navigate(&mut self, url: Option<&str>) {
        self.navigations.push(url.map(str::to_string));
    }

    fn enhance(&mut self) {
        self.enhance_runs += 1;
    }
}

#[test]
fn processed_queue_replays_in_listed_order_per_selector() {
    let mut queue = CommandQueue::new(QueueSettings::default());
    queue.add(dom::add_class("#title", "active").expect("class"));
    queue.add(dom::text("#count", "3"));
    queue.add(dom::html("#title", "<b>Hi</b>"));
    queue.add(act::console("debug"));
    queue.add(dom::hide("#count"));
    queue.add(dom::css("#title", "color", "red").expect("css"));
    let mut flash = vec![FlashMessage::new(FlashKind::Success, "Saved")];
    let body = queue.process(&mut flash);

    let mut host = Recorder::default();
    let report = dispatch_str(&mut host, &body, &DispatchOptions::default());

    assert_eq!(host.ops_for("#title"), vec!["addClass", "html", "css"]);
    assert_eq!(host.ops_for("#count"), vec!["text", "hide"]);
    assert_eq!(host.ops_for("#messages"), vec!["append"]);
    assert_eq!(host.logs, vec![json!("debug")]);
    assert_eq!(report.applied, 7);
    assert!(report.rejected.is_empty());
    assert_eq!(host.enhance_runs, 1);
}

#[test]
fn unresolved_selector_skips_only_its_group() {
    let raw = r##"{"dom":{"#gone":[{"f":"show"},{"f":"hide"}],"#here":[{"f":"addClass","a":"on"}]},"act":[{"f":"alert","a":"still runs"}]}"##;
    let mut host = Recorder::missing(&["#gone"]);
    let report = dispatch_str(&mut host, raw, &DispatchOptions::default());

    assert_eq!(report.skipped_selectors, vec!["#gone".to_string()]);
    assert_eq!(host.ops_for("#here"), vec!["addClass"]);
    assert_eq!(host.alerts, vec!["still runs".to_string()]);
}

#[test]
fn unknown_operations_are_logged_and_ignored() {
    let raw = r##"{"dom":{"#a":[{"f":"fadeToggle","a":100},{"f":"show"}]},"act":[{"f":"vibrate","a":[200]},{"f":"log","a":1}]}"##;
    let mut host = Recorder::default();
    let report = dispatch_str(&mut host, raw, &DispatchOptions::default());

    assert_eq!(host.ops_for("#a"), vec!["show"]);
    assert_eq!(host.logs, vec![json!(1)]);
    let rejected: Vec<&str> = report.rejected.iter().map(|r| r.op.as_str()).collect();
    assert_eq!(rejected, vec!["fadeToggle", "vibrate"]);
}

#[test]
fn host_failure_leaves_earlier_and_later_ops_alone() {
    let raw = r##"{"dom":{"#a":[{"f":"show"},{"f":"empty"},{"f":"addClass","a":"x"}]}}"##;
    let mut host = Recorder {
        failing_op: Some("empty"),
        ..Recorder::default()
    };
    let report = dispatch_str(&mut host, raw, &DispatchOptions::default());

    assert_eq!(host.ops_for("#a"), vec!["show", "addClass"]);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.applied, 2);
}

#[test]
fn every_action_reaches_its_handler() {
    let raw = r##"{"act":[
        {"f":"alert","a":["Sure?"]},
        {"f":"dump","a":{"x":1}},
        {"f":"loadScript","a":["/js/app.js"]},
        {"f":"refresh"},
        {"f":"href","a":["/next"]}
    ]}"##;
    let mut host = Recorder::default();
    let report = dispatch_str(&mut host, raw, &DispatchOptions::default());

    assert_eq!(host.alerts, vec!["Sure?".to_string()]);
    assert_eq!(host.logs, vec![json!({"x": 1})]);
    assert_eq!(host.scripts, vec!["/js/app.js".to_string()]);
    assert_eq!(host.navigations, vec![None, Some("/next".to_string())]);
    assert_eq!(report.applied, 5);
}

#[test]
fn error_actions_append_into_their_target() {
    let raw = r##"{"act":[{"f":"error","a":["#form-errors","<p>bad</p>"]},{"f":"error","a":["Too <long>",4]}]}"##;
    let mut host = Recorder::default();
    dispatch_str(&mut host, raw, &DispatchOptions::default());

    assert_eq!(
        host.calls[0],
        ("#form-errors".to_string(), DomOp::Append("<p>bad</p>".into()))
    );
    let (target, op) = &host.calls[1];
    assert_eq!(target, "#messages");
    let DomOp::Append(markup) = op else {
        panic!("expected append");
    };
    assert!(markup.contains("alert-danger"));
    assert!(markup.contains(r#"data-error-id="4""#));
    assert!(markup.contains("Too &lt;long&gt;"));
}

#[test]
fn malformed_body_is_reported_without_touching_the_page() {
    let mut host = Recorder::default();
    let report = dispatch_str(&mut host, "<html>oops</html>", &DispatchOptions::default());
    assert!(report.payload_error.is_some());
    assert!(host.calls.is_empty());
    assert_eq!(host.enhance_runs, 0);
}

#[test]
fn enhancement_can_be_switched_off() {
    let mut host = Recorder::default();
    let options = DispatchOptions {
        enhance: false,
        ..DispatchOptions::default()
    };
    dispatch_str(&mut host, "{}", &options);
    assert_eq!(host.enhance_runs, 0);
}

#[test]
fn title_scenario_on_in_memory_page() {
    let mut queue = CommandQueue::default();
    dom::add_class("#title", "active")
        .expect("class")
        .send(&mut queue);
    dom::html("#title", "<b>Hi</b>").send(&mut queue);
    let body = queue.process(&mut Vec::<FlashMessage>::new());

    let mut page = Document::parse(r#"<h1 id="title"></h1>"#);
    let report = dispatch_str(&mut page, &body, &DispatchOptions::default());

    assert_eq!(report.applied, 2);
    assert_eq!(
        page.to_html(),
        r#"<h1 id="title" class="active"><b>Hi</b></h1>"#
    );
}

#[test]
fn overlapping_responses_apply_against_current_state() {
    let mut page = Document::parse(r#"<ul id="list"></ul>"#);
    let first = r##"{"dom":{"#list":[{"f":"append","a":"<li class=\"item\">a</li>"}]}}"##;
    let second = r##"{"dom":{".item":[{"f":"addClass","a":"seen"}]}}"##;

    dispatch_str(&mut page, first, &DispatchOptions::default());
    let report = dispatch_str(&mut page, second, &DispatchOptions::default());

    assert!(report.skipped_selectors.is_empty());
    assert_eq!(
        page.to_html(),
        r#"<ul id="list"><li class="item seen">a</li></ul>"#
    );
}

#[test]
fn op_without_name_only_costs_itself() {
    let raw = r##"{"dom":{"#ok":[{"f":"show"}],"#bad":[{"x":1}]},"act":[{"f":"alert","a":"hi"}]}"##;
    let mut host = Recorder::default();
    let report = dispatch_str(&mut host, raw, &DispatchOptions::default());

    assert!(report.payload_error.is_none());
    assert_eq!(host.ops_for("#ok"), vec!["show"]);
    assert_eq!(host.alerts, vec!["hi".to_string()]);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].selector.as_deref(), Some("#bad"));
    assert!(report.rejected[0].reason.contains("missing field"));
    assert_eq!(host.enhance_runs, 1);
}

#[test]
fn action_with_non_string_name_is_skipped() {
    let raw = r##"{"dom":{"#ok":[{"f":"show"}]},"act":[{"f":7},{"f":"alert","a":"hi"}]}"##;
    let mut host = Recorder::default();
    let report = dispatch_str(&mut host, raw, &DispatchOptions::default());

    assert!(report.payload_error.is_none());
    assert_eq!(host.ops_for("#ok"), vec!["show"]);
    assert_eq!(host.alerts, vec!["hi".to_string()]);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].selector, None);
    assert_eq!(report.rejected[0].op, "7");
}

#[test]
fn misshapen_group_and_action_lists_are_rejected_alone() {
    let raw = r##"{"dom":{"#a":"show","#b":[{"f":"hide"}]},"act":{"f":"alert"},"extra":1}"##;
    let mut host = Recorder::default();
    let report = dispatch_str(&mut host, raw, &DispatchOptions::default());

    assert!(report.payload_error.is_none());
    assert_eq!(host.ops_for("#b"), vec!["hide"]);
    let rejected: Vec<(Option<&str>, &str)> = report
        .rejected
        .iter()
        .map(|r| (r.selector.as_deref(), r.op.as_str()))
        .collect();
    assert_eq!(rejected, vec![(Some("#a"), "dom"), (None, "act")]);
}

#[test]
fn group_order_follows_the_body() {
    let raw = r##"{"dom":{"#z":[{"f":"show"}],"#a":[{"f":"hide"}],"#z":[{"f":"empty"}]}}"##;
    let mut host = Recorder::default();
    dispatch_str(&mut host, raw, &DispatchOptions::default());

    let order: Vec<(&str, &str)> = host
        .calls
        .iter()
        .map(|(selector, op)| (selector.as_str(), op.name()))
        .collect();
    assert_eq!(order, vec![("#z", "show"), ("#z", "empty"), ("#a", "hide")]);
}

#[test]
fn body_that_is_not_an_object_is_a_payload_error() {
    let mut host = Recorder::default();
    let report = dispatch_str(&mut host, r#"[{"f":"alert","a":"x"}]"#, &DispatchOptions::default());
    assert!(report.payload_error.is_some());
    assert!(host.alerts.is_empty());
    assert_eq!(host.enhance_runs, 0);
}

#[test]
fn deeply_nested_markup_does_not_exhaust_the_stack() {
    let mut page = Document::parse(r#"<div id="root"></div>"#);
    let payload = json!({ "dom": { "#root": [{ "f": "html", "a": "<div>".repeat(200_000) }] } });
    let report = dispatch_str(&mut page, &payload.to_string(), &DispatchOptions::default());

    assert_eq!(report.applied, 1);
    let html = page.to_html();
    assert_eq!(html.matches("</div>").count(), 200_001);
    assert!(page.text_content(page.root()).is_empty());
}
