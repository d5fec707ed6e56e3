use super::*;
use serde_json::json;

#[test]
fn empty_payload_serializes_to_empty_object() {
    assert_eq!(WirePayload::default().to_json().expect("json"), "{}");
}

#[test]
fn dom_groups_keep_first_seen_selector_order() {
    let mut dom = DomGroups::new();
    dom.push("#b", WireOp::new("show", json!(null)));
    dom.push("#a", WireOp::new("hide", json!(null)));
    dom.push("#b", WireOp::new("addClass", json!("x")));

    let payload = WirePayload {
        dom,
        act: Vec::new(),
    };
    assert_eq!(
        payload.to_json().expect("json"),
        r##"{"dom":{"#b":[{"f":"show","a":null},{"f":"addClass","a":"x"}],"#a":[{"f":"hide","a":null}]}}"##
    );
}

#[test]
fn parsing_preserves_selector_order_and_merges_duplicates() {
    let raw = r##"{"dom":{"#z":[{"f":"show"}],"#a":[{"f":"hide","a":1}],"#z":[{"f":"empty"}]}}"##;
    let payload = WirePayload::from_json(raw).expect("parse");

    let selectors: Vec<&str> = payload.dom.iter().map(|g| g.selector.as_str()).collect();
    assert_eq!(selectors, vec!["#z", "#a"]);
    let ops: Vec<&str> = payload
        .dom
        .get("#z")
        .expect("group")
        .iter()
        .map(|op| op.f.as_str())
        .collect();
    assert_eq!(ops, vec!["show", "empty"]);
    assert_eq!(payload.dom.get("#z").expect("group")[0].a, Value::Null);
}

#[test]
fn empty_list_or_null_dom_is_accepted() {
    let payload = WirePayload::from_json(r#"{"dom":[],"act":[{"f":"log","a":"x"}]}"#)
        .expect("parse list");
    assert!(payload.dom.is_empty());
    assert_eq!(payload.act.len(), 1);

    let payload = WirePayload::from_json(r#"{"dom":null}"#).expect("parse null");
    assert!(payload.is_empty());
}

#[test]
fn args_list_normalizes_scalars() {
    assert_eq!(WireOp::new("alert", json!("Saved!")).args_list(), vec![json!("Saved!")]);
    assert_eq!(
        WireOp::new("attr", json!(["title", "x"])).args_list(),
        vec![json!("title"), json!("x")]
    );
    assert!(WireOp::new("refresh", Value::Null).args_list().is_empty());
}

#[test]
fn op_count_sums_groups_and_actions() {
    let raw = r##"{"dom":{"#a":[{"f":"show"},{"f":"hide"}]},"act":[{"f":"alert","a":"x"}]}"##;
    assert_eq!(WirePayload::from_json(raw).expect("parse").op_count(), 3);
}
