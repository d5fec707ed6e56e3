//! Request-layer glue: deciding whether a request is ajax, finalizing the
//! request's command queue into a response, and the profile feature that
//! emits commands.

use axum::{
    http::{header, HeaderMap, HeaderValue},
    response::{Html, IntoResponse, Response},
};
use command_queue::{act, dom, CommandQueue, FlashSource};
use serde::Deserialize;
use shared::error::ValidationError;
use tracing::warn;
use uuid::Uuid;

pub(crate) const SESSION_HEADER: &str = "x-session-id";
const SESSION_COOKIE: &str = "session";
pub(crate) const ANONYMOUS_NAME: &str = "Anonymous";
const MAX_NAME_CHARS: usize = 60;

pub(crate) fn is_ajax(headers: &HeaderMap) -> bool {
    let requested_with = header_text(headers, "x-requested-with")
        .is_some_and(|v| v.eq_ignore_ascii_case("XMLHttpRequest"));
    let wants_json = header_text(headers, header::ACCEPT.as_str())
        .is_some_and(|v| v.contains("application/json"));
    requested_with || wants_json
}

fn header_text<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Session key from the `x-session-id` header or the `session` cookie.
pub(crate) fn session_id(headers: &HeaderMap) -> Option<String> {
    if let Some(id) = headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        return Some(id.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// The caller's flash-message session. A request that carries none gets a
/// fresh id, handed back as a cookie, so unidentified clients never share
/// pending messages.
#[derive(Debug, Clone)]
pub(crate) struct Session {
    pub(crate) id: String,
    issued: bool,
}

impl Session {
    pub(crate) fn from_headers(headers: &HeaderMap) -> Self {
        match session_id(headers) {
            Some(id) => Self { id, issued: false },
            None => Self {
                id: Uuid::new_v4().to_string(),
                issued: true,
            },
        }
    }

    /// Adds the `Set-Cookie` header when the id was issued by this request.
    pub(crate) fn attach(&self, mut response: Response) -> Response {
        if !self.issued {
            return response;
        }
        let cookie = format!("{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax", self.id);
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(err) => warn!(error = %err, "session cookie not set"),
        }
        response
    }
}

/// Processes the request's queue into the entire body of an ajax response.
pub(crate) fn ajax_response(queue: &mut CommandQueue, flash: &mut dyn FlashSource) -> Response {
    let body = queue.process(flash);
    (
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        )],
        body,
    )
        .into_response()
}

/// Full page for a non-ajax request; queued commands ride along inline.
pub(crate) fn page_response(
    queue: &mut CommandQueue,
    flash: &mut dyn FlashSource,
    name: &str,
) -> Response {
    let inline = queue.render_inline(flash);
    Html(render_profile_page(name, &inline)).into_response()
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProfileForm {
    #[serde(default)]
    pub(crate) name: String,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ProfileOutcome {
    Saved(String),
    Rejected,
}

/// Validates the form and queues the page updates for either outcome.
pub(crate) fn save_profile(
    queue: &mut CommandQueue,
    form: &ProfileForm,
) -> Result<ProfileOutcome, ValidationError> {
    let name = form.name.trim();
    let problem = if name.is_empty() {
        Some("Name is required.")
    } else if name.chars().count() > MAX_NAME_CHARS {
        Some("Name is too long.")
    } else {
        None
    };

    if let Some(problem) = problem {
        queue.add(dom::add_class("#profile-name-input", "is-invalid")?);
        queue.add(dom::empty("#profile-errors"));
        queue.add(act::error_at(
            "#profile-errors",
            format!(r#"<div class="alert alert-danger" role="alert">{problem}</div>"#),
        )?);
        return Ok(ProfileOutcome::Rejected);
    }

    queue.add(dom::remove_class("#profile-name-input", "is-invalid")?);
    queue.add(dom::empty("#profile-errors"));
    queue.add(dom::text("#profile-name", name));
    queue.add(act::alert("Saved!"));
    Ok(ProfileOutcome::Saved(name.to_string()))
}

pub(crate) fn render_profile_page(name: &str, inline_commands: &str) -> String {
    let name = name
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
    format!(
        r#"<!doctype html>
<html><head><meta charset="utf-8"><title>Profile</title></head>
<body>
<div id="messages"></div>
<h1 id="profile-name">{name}</h1>
<div id="profile-errors"></div>
<form id="profile-form" method="post" action="/profile"><input id="profile-name-input" name="name" maxlength="{MAX_NAME_CHARS}"><button type="submit">Save</button></form>
{inline_commands}
</body></html>"#
    )
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
