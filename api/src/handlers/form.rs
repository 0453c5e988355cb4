//! Upload form handler

use axum::{extract::State, response::Html};

use crate::render::render_upload_form;
use crate::AppState;

/// GET /imageprocess
///
/// Serves the batch upload page.
pub async fn upload_form(State(state): State<AppState>) -> Html<String> {
    Html(render_upload_form(&state.processor.config().operations))
}
