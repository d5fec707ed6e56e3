use super::{apply_env, apply_file, Settings};

use std::collections::HashMap;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn defaults_enable_fadeout_on_messages_area() {
    let settings = Settings::default();
    let queue = settings.queue_settings();
    assert_eq!(queue.message_area_selector, "#messages");
    assert!(queue.fadeout_time_ms > 0);
}

#[test]
fn file_values_override_defaults() {
    let mut settings = Settings::default();
    apply_file(
        &mut settings,
        r##"
bind_addr = "0.0.0.0:9000"
message_area_selector = "#flash"
fadeout_time_ms = 0
"##,
    );
    assert_eq!(settings.server_bind, "0.0.0.0:9000");
    assert_eq!(settings.message_area_selector, "#flash");
    assert_eq!(settings.fadeout_time_ms, 0);
}

#[test]
fn malformed_file_is_ignored() {
    let mut settings = Settings::default();
    apply_file(&mut settings, "bind_addr = ");
    assert_eq!(settings, Settings::default());
}

#[test]
fn negative_fadeout_in_file_keeps_previous_value() {
    let mut settings = Settings::default();
    apply_file(&mut settings, "fadeout_time_ms = -5");
    assert_eq!(settings.fadeout_time_ms, Settings::default().fadeout_time_ms);
}

#[test]
fn app_prefixed_env_wins_over_plain_names() {
    let mut settings = Settings::default();
    apply_env(
        &mut settings,
        env(&[
            ("SERVER_BIND", "127.0.0.1:1"),
            ("APP__BIND_ADDR", "127.0.0.1:2"),
            ("RUST_LOG", "debug"),
            ("APP__LOG_FILTER", "warn"),
        ]),
    );
    assert_eq!(settings.server_bind, "127.0.0.1:2");
    assert_eq!(settings.log_filter, "warn");
}

#[test]
fn unparsable_fadeout_env_is_ignored() {
    let mut settings = Settings::default();
    apply_env(&mut settings, env(&[("APP__FADEOUT_TIME_MS", "soon")]));
    assert_eq!(settings.fadeout_time_ms, 5000);

    apply_env(&mut settings, env(&[("APP__FADEOUT_TIME_MS", "250")]));
    assert_eq!(settings.fadeout_time_ms, 250);
}
