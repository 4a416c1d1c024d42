use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::{
    pkg::{internal::auth::Session, server::state::AppState},
    prelude::Result,
};

pub const SESSION_COOKIE: &str = "_Host_jobboard_session";

/// The caller's session, if any. Inserted on every request that passes
/// through [`identify`]; handlers decide for themselves whether they need it.
#[derive(Debug, Clone, Default)]
pub struct SessionContext(pub Option<Arc<Session>>);

impl SessionContext {
    pub fn username(&self) -> Option<&str> {
        self.0.as_deref().map(|s| s.username.as_str())
    }
}

/// Bearer token first, then the session cookie.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    if bearer.is_some() {
        return bearer;
    }
    let jar = CookieJar::from_headers(headers);
    jar.get(SESSION_COOKIE)
        .filter(|c| !c.value().is_empty())
        .map(|c| c.value().to_string())
}

pub fn session_cookie(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, token
    ))
    .unwrap_or_else(|_| expired_session_cookie())
}

pub fn expired_session_cookie() -> HeaderValue {
    HeaderValue::from_static("_Host_jobboard_session=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax")
}

pub async fn identify(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let mut context = SessionContext::default();
    if let Some(token) = session_token(&headers) {
        match state.accounts.session(&token).await? {
            Some(session) => context = SessionContext(Some(Arc::new(session))),
            None => tracing::warn!("unknown session token, continuing anonymously"),
        }
    }
    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue, header::AUTHORIZATION, header::COOKIE};

    use super::session_token;

    #[test]
    fn bearer_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("_Host_jobboard_session=from-cookie"));
        assert_eq!(session_token(&headers).as_deref(), Some("from-cookie"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));
        assert_eq!(session_token(&headers).as_deref(), Some("from-header"));
    }

    #[test]
    fn empty_values_are_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        headers.insert(COOKIE, HeaderValue::from_static("_Host_jobboard_session="));
        assert_eq!(session_token(&headers), None);
    }
}
