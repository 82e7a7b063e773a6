//! Pictures and sponsors pages. No policy: everything stored is shown.

use actix_web::{HttpResponse, http::StatusCode, web};

use super::page;
use crate::middleware::auth::CurrentViewer;
use crate::middleware::error::AppResult;
use crate::state::AppState;
use crate::templates;
use crate::views::{GalleryContext, GalleryItemView};

/// GET /pictures/
pub async fn pictures_page(
    state: web::Data<AppState>,
    CurrentViewer(viewer): CurrentViewer,
) -> AppResult<HttpResponse> {
    let pictures = state.pictures.list_all().await?;
    let context = GalleryContext {
        heading: "Pictures",
        items: pictures
            .iter()
            .map(|p| GalleryItemView::picture(p, &state.site.media_url))
            .collect(),
    };

    page(StatusCode::OK, templates::GALLERY, "Pictures", &viewer, &context)
}

/// GET /sponsors/
pub async fn sponsors_page(
    state: web::Data<AppState>,
    CurrentViewer(viewer): CurrentViewer,
) -> AppResult<HttpResponse> {
    let sponsors = state.sponsors.list_all().await?;
    let context = GalleryContext {
        heading: "Sponsors",
        items: sponsors
            .iter()
            .map(|s| GalleryItemView::sponsor(s, &state.site.media_url))
            .collect(),
    };

    page(StatusCode::OK, templates::GALLERY, "Sponsors", &viewer, &context)
}
