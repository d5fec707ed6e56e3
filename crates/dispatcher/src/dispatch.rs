use shared::{domain::DEFAULT_MESSAGE_AREA_SELECTOR, protocol::WirePayload};
use tracing::{debug, warn};

use crate::{
    decode,
    host::Host,
    ops::{ActOp, DomOp, ErrorNotice},
};

#[derive(Debug, Clone)]
pub struct DispatchOptions {
    /// Where `error` actions of the `[text, id]` form are rendered.
    pub message_area_selector: String,
    /// Run the page enhancement pass after the payload is applied.
    pub enhance: bool,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            message_area_selector: DEFAULT_MESSAGE_AREA_SELECTOR.into(),
            enhance: true,
        }
    }
}

/// An op that was parsed or applied unsuccessfully and skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected {
    pub selector: Option<String>,
    pub op: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub applied: usize,
    pub skipped_selectors: Vec<String>,
    pub rejected: Vec<Rejected>,
    pub payload_error: Option<String>,
}

impl DispatchReport {
    pub(crate) fn reject(&mut self, selector: Option<&str>, op: &str, reason: impl ToString) {
        let reason = reason.to_string();
        warn!(selector = selector.unwrap_or_default(), op, %reason, "command skipped");
        self.rejected.push(Rejected {
            selector: selector.map(str::to_string),
            op: op.to_string(),
            reason,
        });
    }
}

/// Parses `raw` and dispatches it. Entries that cannot be read are rejected
/// one by one; only a body that is not a JSON object leaves the page
/// untouched.
pub fn dispatch_str<H: Host>(host: &mut H, raw: &str, options: &DispatchOptions) -> DispatchReport {
    let mut report = DispatchReport::default();
    match decode::decode(raw, &mut report) {
        Ok(payload) => apply(host, &payload, options, report),
        Err(err) => {
            warn!(error = %err, "ajax response is not a command payload");
            report.payload_error = Some(err.to_string());
            report
        }
    }
}

/// Applies every Dom group, then every action, then the enhancement pass.
pub fn dispatch<H: Host>(
    host: &mut H,
    payload: &WirePayload,
    options: &DispatchOptions,
) -> DispatchReport {
    apply(host, payload, options, DispatchReport::default())
}

fn apply<H: Host>(
    host: &mut H,
    payload: &WirePayload,
    options: &DispatchOptions,
    mut report: DispatchReport,
) -> DispatchReport {
    for group in &payload.dom {
        let Some(selection) = host.select(&group.selector) else {
            warn!(selector = %group.selector, ops = group.ops.len(), "selector matched nothing");
            report.skipped_selectors.push(group.selector.clone());
            continue;
        };
        for op in &group.ops {
            let parsed = match DomOp::parse(op) {
                Ok(parsed) => parsed,
                Err(err) => {
                    report.reject(Some(&group.selector), &op.f, err);
                    continue;
                }
            };
            match host.apply(&selection, &parsed) {
                Ok(()) => report.applied += 1,
                Err(err) => report.reject(Some(&group.selector), &op.f, err),
            }
        }
    }

    for op in &payload.act {
        match ActOp::parse(op) {
            Ok(action) => run_action(host, action, options, &mut report),
            Err(err) => report.reject(None, &op.f, err),
        }
    }

    if options.enhance {
        host.enhance();
    }
    debug!(
        applied = report.applied,
        skipped = report.skipped_selectors.len(),
        rejected = report.rejected.len(),
        "payload dispatched"
    );
    report
}

fn run_action<H: Host>(
    host: &mut H,
    action: ActOp,
    options: &DispatchOptions,
    report: &mut DispatchReport,
) {
    match action {
        ActOp::Alert(text) => host.alert(&text),
        ActOp::Log(value) => host.log(&value),
        ActOp::LoadScript(url) => host.load_script(&url),
        ActOp::Navigate(url) => host.navigate(url.as_deref()),
        ActOp::Error(notice) => {
            let (target, html) = match notice {
                ErrorNotice::Markup { target, html } => (target, html),
                ErrorNotice::Message { text, id } => (
                    options.message_area_selector.clone(),
                    error_alert(&text, id),
                ),
            };
            let Some(selection) = host.select(&target) else {
                report.reject(Some(&target), "error", "target matched nothing");
                return;
            };
            if let Err(err) = host.apply(&selection, &DomOp::Append(html)) {
                report.reject(Some(&target), "error", err);
                return;
            }
        }
    }
    report.applied += 1;
}

fn error_alert(text: &str, id: Option<i64>) -> String {
    let id_attr = id
        .map(|id| format!(r#" data-error-id="{id}""#))
        .unwrap_or_default();
    format!(
        r#"<div class="alert alert-danger" role="alert"{id_attr}>{}</div>"#,
        crate::document::escape_text(text)
    )
}

#[cfg(test)]
#[path = "tests/dispatch_tests.rs"]
mod tests;
