//! HTTP handlers and route configuration.

mod accounts;
mod blog;
mod galleries;
mod health;
mod home;

#[cfg(test)]
mod tests;

use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, http::header::ContentType, web};
use serde::Serialize;

use narrative_core::domain::Viewer;

use crate::middleware::error::AppResult;
use crate::templates;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home::homepage))
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/blog")
                .route("/", web::get().to(blog::post_list))
                // Registered before `/post/{id}/` so "new" is never read as an id.
                .service(
                    web::resource("/post/new/")
                        .route(web::get().to(blog::post_new_form))
                        .route(web::post().to(blog::post_new)),
                )
                .route("/post/{id}/", web::get().to(blog::post_detail))
                .service(
                    web::resource("/post/{id}/edit/")
                        .route(web::get().to(blog::post_edit_form))
                        .route(web::post().to(blog::post_edit)),
                ),
        )
        .route("/pictures/", web::get().to(galleries::pictures_page))
        .route("/sponsors/", web::get().to(galleries::sponsors_page))
        .service(
            web::scope("/accounts")
                .service(
                    web::resource("/login/")
                        .route(web::get().to(accounts::login_form))
                        .route(web::post().to(accounts::login)),
                )
                .service(
                    web::resource("/logout/")
                        .route(web::get().to(accounts::logout))
                        .route(web::post().to(accounts::logout)),
                ),
        );
}

/// Render a page into an HTML response with the given status.
fn page<C: Serialize>(
    status: StatusCode,
    template: &str,
    title: &str,
    viewer: &Viewer,
    context: &C,
) -> AppResult<HttpResponse> {
    let body = templates::render_page(template, title, viewer, context)?;

    Ok(HttpResponse::build(status)
        .content_type(ContentType::html())
        .body(body))
}

/// 302 to `location`.
fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}
