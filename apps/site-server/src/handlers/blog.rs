//! Blog pages: list, detail, create and edit.
//!
//! Every access denial comes back from the workflow as `NotFound`, so a hidden
//! post and a missing one produce the same 404 page.

use actix_web::{HttpResponse, http::StatusCode, web};
use uuid::Uuid;

use narrative_core::domain::Viewer;
use narrative_core::error::DomainError;
use narrative_core::form::{FieldErrors, PostForm};
use narrative_core::policy;

use super::{page, redirect};
use crate::middleware::auth::CurrentViewer;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::templates;
use crate::views::{PostDetailContext, PostEditContext, PostListContext, PostView, post_url};

const NEW_POST_ACTION: &str = "/blog/post/new/";

fn parse_post_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("Malformed post id {raw:?}")))
}

fn edit_action(id: Uuid) -> String {
    format!("/blog/post/{id}/edit/")
}

fn render_form(
    heading: &'static str,
    action: String,
    form: PostForm,
    errors: Option<&FieldErrors>,
    viewer: &Viewer,
) -> AppResult<HttpResponse> {
    let context = PostEditContext::new(heading, action, form, errors);
    page(StatusCode::OK, templates::POST_EDIT, heading, viewer, &context)
}

/// GET /blog/
pub async fn post_list(
    state: web::Data<AppState>,
    CurrentViewer(viewer): CurrentViewer,
) -> AppResult<HttpResponse> {
    let now = state.clock.now();
    let posts = state.posts.list(now).await?;

    let context = PostListContext {
        posts: posts.iter().map(|p| PostView::new(p, now)).collect(),
    };
    page(StatusCode::OK, templates::POST_LIST, "Blog", &viewer, &context)
}

/// GET /blog/post/{id}/
pub async fn post_detail(
    state: web::Data<AppState>,
    CurrentViewer(viewer): CurrentViewer,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_post_id(&path)?;
    let now = state.clock.now();
    let post = state.posts.detail(id, &viewer, now).await?;

    let context = PostDetailContext {
        post: PostView::new(&post, now),
        can_edit: policy::can_edit(&viewer),
    };
    page(StatusCode::OK, templates::POST_DETAIL, &post.title, &viewer, &context)
}

/// GET /blog/post/new/
pub async fn post_new_form(
    state: web::Data<AppState>,
    CurrentViewer(viewer): CurrentViewer,
) -> AppResult<HttpResponse> {
    let form = state.posts.new_form(&viewer)?;
    render_form("New post", NEW_POST_ACTION.to_string(), form, None, &viewer)
}

/// POST /blog/post/new/
///
/// An unreadable body is treated as an empty form, so anonymous callers still
/// get the 404 and members get the field errors.
pub async fn post_new(
    state: web::Data<AppState>,
    CurrentViewer(viewer): CurrentViewer,
    body: Option<web::Form<PostForm>>,
) -> AppResult<HttpResponse> {
    let form = body.map(web::Form::into_inner).unwrap_or_default();

    match state.posts.create(&viewer, &form, state.clock.now()).await {
        Ok(post) => Ok(redirect(&post_url(&post))),
        Err(DomainError::Validation(errors)) => render_form(
            "New post",
            NEW_POST_ACTION.to_string(),
            form,
            Some(&errors),
            &viewer,
        ),
        Err(e) => Err(e.into()),
    }
}

/// GET /blog/post/{id}/edit/
pub async fn post_edit_form(
    state: web::Data<AppState>,
    CurrentViewer(viewer): CurrentViewer,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_post_id(&path)?;
    let (post, form) = state.posts.edit_form(id, &viewer).await?;

    render_form("Edit post", edit_action(post.id), form, None, &viewer)
}

/// POST /blog/post/{id}/edit/
pub async fn post_edit(
    state: web::Data<AppState>,
    CurrentViewer(viewer): CurrentViewer,
    path: web::Path<String>,
    body: Option<web::Form<PostForm>>,
) -> AppResult<HttpResponse> {
    let id = parse_post_id(&path)?;
    let form = body.map(web::Form::into_inner).unwrap_or_default();

    match state.posts.edit(id, &viewer, &form, state.clock.now()).await {
        Ok(post) => Ok(redirect(&post_url(&post))),
        Err(DomainError::Validation(errors)) => {
            render_form("Edit post", edit_action(id), form, Some(&errors), &viewer)
        }
        Err(e) => Err(e.into()),
    }
}
