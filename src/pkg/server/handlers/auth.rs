use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
};
use serde::Deserialize;
use serde_json::{Value, json};
use standard_error::{StandardError, Status};

use crate::{
    pkg::server::{
        middlewares::session::{SessionContext, expired_session_cookie, session_cookie},
        state::AppState,
    },
    prelude::Result,
};

#[derive(Debug, Default, Deserialize)]
pub struct CredentialsInput {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

fn credentials(payload: core::result::Result<Json<CredentialsInput>, JsonRejection>) -> Result<CredentialsInput> {
    payload.map(|Json(input)| input).map_err(|rejection| {
        tracing::warn!("rejected credentials body: {}", rejection.body_text());
        StandardError::new("ERR-AUTH-002").code(StatusCode::BAD_REQUEST)
    })
}

pub async fn signup(
    State(state): State<AppState>,
    payload: core::result::Result<Json<CredentialsInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>)> {
    let input = credentials(payload)?;
    let username = state
        .accounts
        .signup(&input.username, &input.password)
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "username": username }))))
}

pub async fn login(
    State(state): State<AppState>,
    payload: core::result::Result<Json<CredentialsInput>, JsonRejection>,
) -> Result<(HeaderMap, Json<Value>)> {
    let input = credentials(payload)?;
    let session = state
        .accounts
        .login(&input.username, &input.password)
        .await?
        .ok_or_else(|| StandardError::new("ERR-AUTH-001").code(StatusCode::UNAUTHORIZED))?;
    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, session_cookie(&session.token.to_string()));
    Ok((
        headers,
        Json(json!({ "username": session.username, "token": session.token })),
    ))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(context): Extension<SessionContext>,
) -> Result<(HeaderMap, Json<Value>)> {
    if let Some(session) = &context.0 {
        state.accounts.logout(session).await?;
    }
    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, expired_session_cookie());
    Ok((
        headers,
        Json(json!({ "message": "Logged out successfully." })),
    ))
}

pub async fn current(Extension(context): Extension<SessionContext>) -> Result<Json<Value>> {
    match context.username() {
        Some(username) => Ok(Json(json!({ "username": username }))),
        None => Err(StandardError::new("ERR-AUTH-003").code(StatusCode::UNAUTHORIZED)),
    }
}
