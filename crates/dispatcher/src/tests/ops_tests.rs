use super::*;
use serde_json::json;

fn op(f: &str, a: Value) -> WireOp {
    WireOp::new(f, a)
}

#[test]
fn single_argument_ops_accept_scalar_or_wrapped_form() {
    assert_eq!(
        DomOp::parse(&op("addClass", json!("active"))).expect("scalar"),
        DomOp::AddClass("active".into())
    );
    assert_eq!(
        DomOp::parse(&op("addClass", json!(["active"]))).expect("wrapped"),
        DomOp::AddClass("active".into())
    );
}

#[test]
fn attr_takes_name_and_value_positionally() {
    assert_eq!(
        DomOp::parse(&op("attr", json!(["maxlength", 20]))).expect("attr"),
        DomOp::Attr {
            name: "maxlength".into(),
            value: Some("20".into())
        }
    );
    assert_eq!(
        DomOp::parse(&op("attrib", json!(["disabled", null]))).expect("alias"),
        DomOp::Attr {
            name: "disabled".into(),
            value: None
        }
    );
}

#[test]
fn css_requires_both_positions() {
    assert!(matches!(
        DomOp::parse(&op("css", json!(["color"]))),
        Err(DispatchError::BadArgument { .. })
    ));
}

#[test]
fn markup_ops_reject_structured_arguments() {
    assert!(DomOp::parse(&op("html", json!({"x": 1}))).is_err());
    assert!(DomOp::parse(&op("html", Value::Null)).is_err());
}

#[test]
fn unknown_names_are_reported_not_executed() {
    let err = DomOp::parse(&op("eval", json!("alert(1)"))).expect_err("unknown");
    assert!(matches!(
        err,
        DispatchError::UnknownOperation { kind: "dom", .. }
    ));
    assert!(ActOp::parse(&op("exec", json!(null))).is_err());
}

#[test]
fn alert_scalar_is_normalized() {
    assert_eq!(
        ActOp::parse(&op("alert", json!("Saved!"))).expect("alert"),
        ActOp::Alert("Saved!".into())
    );
    assert_eq!(
        ActOp::parse(&op("alert", json!(["Saved!"]))).expect("alert"),
        ActOp::Alert("Saved!".into())
    );
}

#[test]
fn error_payload_shapes_are_told_apart() {
    assert_eq!(
        ActOp::parse(&op("error", json!(["#errors", "<div>x</div>"]))).expect("markup"),
        ActOp::Error(ErrorNotice::Markup {
            target: "#errors".into(),
            html: "<div>x</div>".into()
        })
    );
    assert_eq!(
        ActOp::parse(&op("error", json!(["Name taken", 17]))).expect("message"),
        ActOp::Error(ErrorNotice::Message {
            text: "Name taken".into(),
            id: Some(17)
        })
    );
    assert!(ActOp::parse(&op("error", json!([]))).is_err());
}

#[test]
fn console_aliases_keep_the_raw_value() {
    for name in ["console", "dump", "log"] {
        assert_eq!(
            ActOp::parse(&op(name, json!({"k": [1, 2]}))).expect("log"),
            ActOp::Log(json!({"k": [1, 2]}))
        );
    }
}

#[test]
fn navigation_forms() {
    assert_eq!(
        ActOp::parse(&op("refresh", Value::Null)).expect("reload"),
        ActOp::Navigate(None)
    );
    assert_eq!(
        ActOp::parse(&op("href", json!(["/done"]))).expect("href"),
        ActOp::Navigate(Some("/done".into()))
    );
    assert_eq!(
        ActOp::parse(&op("refresh", json!("/list"))).expect("refresh to"),
        ActOp::Navigate(Some("/list".into()))
    );
    assert!(ActOp::parse(&op("href", json!([""]))).is_err());
    assert!(ActOp::parse(&op("loadScript", Value::Null)).is_err());
}
