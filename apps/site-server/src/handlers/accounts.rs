//! Login and logout.

use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::{HttpResponse, http::StatusCode, web};

use narrative_core::domain::Viewer;
use narrative_shared::dto::{LoginForm, NextQuery};

use super::{page, redirect};
use crate::middleware::auth::{CurrentViewer, SESSION_COOKIE};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::templates;
use crate::views::LoginContext;

const DEFAULT_NEXT: &str = "/blog/";
const INVALID_LOGIN: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

/// Only same-site absolute paths are followed after login.
fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path) if is_local_path(path) => path,
        _ => DEFAULT_NEXT,
    }
}

/// Browsers read `\` as `/`, so `/\host` is as foreign as `//host`.
fn is_local_path(path: &str) -> bool {
    let mut chars = path.chars();
    chars.next() == Some('/')
        && !matches!(chars.next(), Some('/' | '\\'))
        && !path.chars().any(char::is_control)
}

fn render_login(
    status: StatusCode,
    viewer: &Viewer,
    context: LoginContext,
) -> AppResult<HttpResponse> {
    page(status, templates::LOGIN, "Log in", viewer, &context)
}

fn session_cookie(token: String, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::seconds(max_age_secs))
        .finish()
}

/// GET /accounts/login/
pub async fn login_form(
    CurrentViewer(viewer): CurrentViewer,
    query: Option<web::Query<NextQuery>>,
) -> AppResult<HttpResponse> {
    let next = query.and_then(|q| q.into_inner().next);

    render_login(
        StatusCode::OK,
        &viewer,
        LoginContext {
            username: String::new(),
            next: safe_next(next.as_deref()).to_string(),
            error: None,
        },
    )
}

/// POST /accounts/login/
pub async fn login(
    state: web::Data<AppState>,
    CurrentViewer(viewer): CurrentViewer,
    body: Option<web::Form<LoginForm>>,
) -> AppResult<HttpResponse> {
    let form = body.map(web::Form::into_inner).unwrap_or_default();
    let next = safe_next(form.next.as_deref()).to_string();

    let Some(user) = state
        .accounts
        .authenticate(&form.username, &form.password)
        .await?
    else {
        tracing::info!(username = %form.username, "Rejected login attempt");
        return render_login(
            StatusCode::OK,
            &viewer,
            LoginContext {
                username: form.username,
                next,
                error: Some(INVALID_LOGIN),
            },
        );
    };

    let token = state
        .tokens
        .generate_token(user.id, &user.username)
        .map_err(|e| AppError::Internal(format!("Failed to issue session token: {e}")))?;
    let cookie = session_cookie(
        token,
        state.tokens.expiration_seconds(),
        state.site.secure_cookies,
    );

    tracing::info!(user_id = %user.id, username = %user.username, "User logged in");

    let mut response = redirect(&next);
    response
        .add_cookie(&cookie)
        .map_err(|e| AppError::Internal(format!("Failed to set session cookie: {e}")))?;
    Ok(response)
}

/// GET or POST /accounts/logout/
pub async fn logout(CurrentViewer(viewer): CurrentViewer) -> AppResult<HttpResponse> {
    if let Some(username) = viewer.username() {
        tracing::info!(username = %username, "User logged out");
    }

    let cookie = Cookie::build(SESSION_COOKIE, "").path("/").finish();

    let mut response = redirect("/");
    response
        .add_removal_cookie(&cookie)
        .map_err(|e| AppError::Internal(format!("Failed to clear session cookie: {e}")))?;
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_next_rejects_foreign_targets() {
        assert_eq!(safe_next(Some("/blog/post/new/")), "/blog/post/new/");
        assert_eq!(safe_next(Some("//evil.example")), DEFAULT_NEXT);
        assert_eq!(safe_next(Some("https://evil.example/")), DEFAULT_NEXT);
        assert_eq!(safe_next(Some("/\\evil.example/")), DEFAULT_NEXT);
        assert_eq!(safe_next(Some("/blog/\r\nSet-Cookie:x")), DEFAULT_NEXT);
        assert_eq!(safe_next(Some("/")), "/");
        assert_eq!(safe_next(None), DEFAULT_NEXT);
    }
}
