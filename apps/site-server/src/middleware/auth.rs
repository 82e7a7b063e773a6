//! Session resolution: turns the session cookie (or a Bearer header) into a
//! [`Viewer`].

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use std::future::Future;
use std::pin::Pin;

use narrative_core::domain::Viewer;

use crate::middleware::error::AppError;
use crate::state::AppState;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "sessionid";

/// The viewer behind the current request.
///
/// Never rejects a request: a missing, expired or forged token, or one whose
/// account no longer exists, resolves to [`Viewer::Anonymous`], and the handlers
/// decide what an anonymous viewer may see.
/// ```ignore
/// async fn page(CurrentViewer(viewer): CurrentViewer) -> impl Responder {
///     format!("logged in: {}", viewer.is_authenticated())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentViewer(pub Viewer);

impl FromRequest for CurrentViewer {
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let token = session_token(req);

        Box::pin(async move {
            let Some(state) = state else {
                tracing::error!("AppState not found in app data");
                return Ok(CurrentViewer(Viewer::Anonymous));
            };
            let viewer = resolve_viewer(&state, token).await?;
            Ok(CurrentViewer(viewer))
        })
    }
}

async fn resolve_viewer(state: &AppState, token: Option<String>) -> Result<Viewer, AppError> {
    let Some(token) = token else {
        return Ok(Viewer::Anonymous);
    };

    let claims = match state.tokens.validate_token(&token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring invalid session token");
            return Ok(Viewer::Anonymous);
        }
    };

    match state.accounts.find_user(claims.user_id).await? {
        Some(user) => Ok(Viewer::authenticated(user.id, user.username)),
        None => {
            tracing::debug!(user_id = %claims.user_id, "Ignoring session for unknown account");
            Ok(Viewer::Anonymous)
        }
    }
}

/// Session cookie first, then `Authorization: Bearer <token>`.
fn session_token(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}
