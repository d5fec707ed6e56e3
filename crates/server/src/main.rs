use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use shared::{
    domain::{FlashKind, FlashMessage},
    error::{ApiError, ErrorCode, ValidationError},
};
use tracing::{debug, error, info};

mod api;
mod app_state;
mod config;
mod flash_store;

use api::{
    ajax_response, is_ajax, page_response, save_profile, ProfileForm, ProfileOutcome, Session,
    ANONYMOUS_NAME,
};
use app_state::AppState;
use config::load_settings;
use flash_store::FlashStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = load_settings();
    tracing_subscriber::fmt()
        .with_env_filter(settings.log_filter.as_str())
        .init();

    let state = AppState {
        queue_settings: settings.queue_settings(),
        flash: FlashStore::default(),
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings
        .server_bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.server_bind))?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/profile", get(profile_page).post(http_save_profile))
        .route("/flash", post(http_push_flash))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn profile_page(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let session = Session::from_headers(&headers);
    let mut queue = state.request_queue();
    let mut flash = state.flash.session(&session.id);
    let response = if is_ajax(&headers) {
        ajax_response(&mut queue, &mut flash)
    } else {
        page_response(&mut queue, &mut flash, ANONYMOUS_NAME)
    };
    session.attach(response)
}

async fn http_save_profile(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<ProfileForm>,
) -> Result<Response, (StatusCode, Json<ApiError>)> {
    let session = Session::from_headers(&headers);
    let ajax = is_ajax(&headers);
    let mut queue = state.request_queue();

    let outcome = save_profile(&mut queue, &form).map_err(internal_error)?;
    let display_name = match outcome {
        ProfileOutcome::Saved(name) => {
            state.flash.push(
                &session.id,
                FlashMessage::new(FlashKind::Success, "Profile saved.")
                    .dismissable()
                    .fadeout(),
            );
            name
        }
        ProfileOutcome::Rejected => ANONYMOUS_NAME.to_string(),
    };
    debug!(session = %session.id, ajax, queued = queue.len(), "profile form handled");

    let mut flash = state.flash.session(&session.id);
    let response = if ajax {
        ajax_response(&mut queue, &mut flash)
    } else {
        page_response(&mut queue, &mut flash, &display_name)
    };
    Ok(session.attach(response))
}

async fn http_push_flash(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(message): Json<FlashMessage>,
) -> Result<Response, (StatusCode, Json<ApiError>)> {
    if !message.is_clear() && message.text.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiError::new(
                ErrorCode::Validation,
                "flash message text cannot be empty",
            )),
        ));
    }
    let session = Session::from_headers(&headers);
    state.flash.push(&session.id, message);
    debug!(
        session = %session.id,
        pending = state.flash.pending(&session.id),
        "flash message stored"
    );
    Ok(session.attach(StatusCode::NO_CONTENT.into_response()))
}

/// Command construction failed on server-side constants, which is a bug here
/// rather than bad client input.
fn internal_error(err: ValidationError) -> (StatusCode, Json<ApiError>) {
    error!(error = %err, "failed to build response commands");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiError::new(ErrorCode::Internal, err.to_string())),
    )
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
