use super::*;
use shared::domain::FlashKind;

#[test]
fn dismissable_alert_gets_close_button() {
    let message = FlashMessage::new(FlashKind::Warning, "Careful").dismissable();
    let markup = render_alert(&message, 5000).expect("render");
    assert!(markup.starts_with(r#"<div class="alert alert-warning alert-dismissible" role="alert">"#));
    assert!(markup.contains(r#"data-dismiss="alert""#));
    assert!(markup.ends_with("</button></div>"));
}

#[test]
fn fading_alert_records_delay() {
    let message = FlashMessage::new(FlashKind::Success, "Saved").fadeout();
    let markup = render_alert(&message, 2500).expect("render");
    assert_eq!(
        markup,
        r#"<div class="alert alert-success fadeout" role="alert" data-fadeout="2500">Saved</div>"#
    );
}

#[test]
fn error_kind_maps_to_danger_class() {
    let markup =
        render_alert(&FlashMessage::new(FlashKind::Error, "Nope"), 0).expect("render");
    assert!(markup.contains("alert-danger"));
}

#[test]
fn blank_text_is_a_render_error() {
    let err = render_alert(&FlashMessage::new(FlashKind::Info, ""), 0).expect_err("blank");
    assert_eq!(err, RenderError::EmptyText { kind: FlashKind::Info });
}

#[test]
fn translation_targets_configured_message_area() {
    let settings = QueueSettings {
        message_area_selector: "#flash".into(),
        fadeout_time_ms: 0,
    };
    let commands = flash_to_commands(
        &[
            FlashMessage::clear(),
            FlashMessage::new(FlashKind::Info, "Hello"),
        ],
        &settings,
    );
    assert_eq!(commands.len(), 2);
    assert!(commands.iter().all(|c| c.selector() == Some("#flash")));
    assert_eq!(commands[0].operation_name(), "html");
    assert_eq!(commands[1].operation_name(), "append");
}
