//! Homepage.

use actix_web::{HttpResponse, http::StatusCode};
use serde_json::json;

use super::page;
use crate::middleware::auth::CurrentViewer;
use crate::middleware::error::AppResult;
use crate::templates;

/// GET /
pub async fn homepage(CurrentViewer(viewer): CurrentViewer) -> AppResult<HttpResponse> {
    page(StatusCode::OK, templates::HOME, "Home", &viewer, &json!({}))
}
