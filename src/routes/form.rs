use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;
use tracing::{debug, warn};

use crate::app::AppState;
use crate::error::SubmitError;
use crate::form::{Alert, Field, FormInput};
use crate::models::Attachment;
use crate::routes::render;
use crate::views::FormPage;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(show_form))
        .route("/draft", post(save_draft))
        .route("/submit", post(submit))
        .route("/reset", post(reset))
        .route("/api/districts/{city}", get(districts))
}

async fn show_form(State(state): State<Arc<AppState>>) -> Response {
    let view = state.form.mount().await;
    render(StatusCode::OK, FormPage::new(&view))
}

async fn save_draft(State(state): State<Arc<AppState>>, multipart: Multipart) -> Response {
    let input = match read_form(multipart).await {
        Ok(input) => input,
        Err(response) => return response,
    };

    match state.form.edit(input).await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(err) => failure(&state, err),
    }
}

async fn submit(State(state): State<Arc<AppState>>, multipart: Multipart) -> Response {
    let input = match read_form(multipart).await {
        Ok(input) => input,
        Err(response) => return response,
    };

    match state.form.submit(input).await {
        Ok(_) => Redirect::to("/results").into_response(),
        Err(err) => failure(&state, err),
    }
}

async fn reset(State(state): State<Arc<AppState>>) -> Response {
    match state.form.reset() {
        Ok(()) => Redirect::to("/").into_response(),
        Err(err) => failure(&state, err),
    }
}

async fn districts(
    State(state): State<Arc<AppState>>,
    Path(city): Path<String>,
) -> Json<Vec<String>> {
    Json(state.form.districts(&city).await)
}

/// Re-render the form with a status matching the failure
fn failure(state: &AppState, err: SubmitError) -> Response {
    let status = match &err {
        SubmitError::Busy => StatusCode::CONFLICT,
        SubmitError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SubmitError::Estimate(_) | SubmitError::Upload(_) => StatusCode::BAD_GATEWAY,
    };
    debug!(%status, error = %err, "Returning to the form");

    let mut view = state.form.view();
    if matches!(err, SubmitError::Busy) {
        view.alert = Some(Alert {
            message: err.to_string(),
            results_available: false,
        });
    }
    render(status, FormPage::new(&view))
}

/// Collect a multipart form post.
///
/// Browsers send an empty `files` part when no file was chosen, that part
/// is skipped. Files that are not images are reported, not stored.
async fn read_form(mut multipart: Multipart) -> Result<FormInput, Response> {
    let mut input = FormInput::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => {
                warn!(error = %err, "Malformed form post");
                return Err(err.into_response());
            }
        };

        let name = field.name().unwrap_or_default().to_string();
        if name == Field::Photos.name() {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field.bytes().await.map_err(IntoResponse::into_response)?;

            if file_name.is_empty() && bytes.is_empty() {
                continue;
            }
            match Attachment::image(file_name, content_type, bytes.to_vec()) {
                Ok(photo) => input.files.push(photo),
                Err(err) => input.rejected_files.push(err),
            }
        } else {
            let value = field.text().await.map_err(IntoResponse::into_response)?;
            input.values.insert(name, value);
        }
    }

    debug!(fields = input.values.len(), photos = input.files.len(), "Form post read");
    Ok(input)
}
