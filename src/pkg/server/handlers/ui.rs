use askama::Template;
use axum::{
    Extension, Form,
    extract::{Path, Query, State, rejection::FormRejection},
    http::{HeaderMap, HeaderValue, StatusCode, header::SET_COOKIE},
    response::Html,
};
use serde::Deserialize;
use standard_error::{Interpolate, StandardError, Status};

use crate::{
    pkg::{
        internal::board::{FilterOptions, JobFilter, SortKey, arrange},
        server::{
            handlers::{
                auth::CredentialsInput,
                jobs::{CreateJobInput, parse_id},
            },
            middlewares::session::{SessionContext, expired_session_cookie, session_cookie},
            state::AppState,
            uispec::{Board, Notice},
        },
    },
    prelude::Result,
};

/// An htmx response swapped into `#notice`.
type Fragment = (StatusCode, HeaderMap, Html<String>);

const LOGIN_TO_MANAGE: &str = "Please log in to manage job listings.";
const LOGIN_TO_APPLY: &str = "Please log in to apply for jobs.";
const JOB_NOT_FOUND: &str = "Job not found.";

#[derive(Debug, Default, Deserialize)]
pub struct BoardQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, rename = "type")]
    pub job_type: String,
    #[serde(default)]
    pub sort: String,
}

fn render(template: &impl Template) -> Result<Html<String>> {
    template.render().map(Html).map_err(|e| {
        StandardError::new("ERR-UI-001")
            .interpolate_err(e.to_string())
            .code(StatusCode::INTERNAL_SERVER_ERROR)
    })
}

fn notice(status: StatusCode, kind: &str, message: &str) -> Result<Fragment> {
    Ok((status, HeaderMap::new(), render(&Notice { kind, message })?))
}

fn redirect_to_board(mut headers: HeaderMap, message: &str) -> Result<Fragment> {
    headers.insert("hx-redirect", HeaderValue::from_static("/board"));
    Ok((
        StatusCode::OK,
        headers,
        render(&Notice {
            kind: "ok",
            message,
        })?,
    ))
}

pub async fn home() -> Result<&'static str> {
    Ok("Welcome to the Job Board API!")
}

/// Re-reads the whole collection and narrows it for display on every request.
pub async fn board(
    State(state): State<AppState>,
    Extension(context): Extension<SessionContext>,
    Query(query): Query<BoardQuery>,
) -> Result<Html<String>> {
    let filter = JobFilter {
        search: query.search.clone(),
        location: query.location.clone(),
        job_type: query.job_type.clone(),
    };
    let sort = SortKey::parse(&query.sort);
    let jobs = arrange(state.jobs.list_all().await?, &filter, sort);
    let options = FilterOptions::from_jobs(&jobs);
    tracing::debug!("rendering board with {} jobs", jobs.len());
    render(&Board {
        username: context.username(),
        jobs,
        options,
        search: &query.search,
        location: &query.location,
        job_type: &query.job_type,
        sort,
        sort_options: SortKey::ALL,
    })
}

pub async fn signup(
    State(state): State<AppState>,
    Form(input): Form<CredentialsInput>,
) -> Result<Fragment> {
    if input.username.is_empty() || input.password.is_empty() {
        return notice(
            StatusCode::OK,
            "error",
            "Please enter a valid username and password.",
        );
    }
    state
        .accounts
        .signup(&input.username, &input.password)
        .await?;
    notice(StatusCode::OK, "ok", "Signup successful! Please log in.")
}

pub async fn login(
    State(state): State<AppState>,
    Form(input): Form<CredentialsInput>,
) -> Result<Fragment> {
    match state
        .accounts
        .login(&input.username, &input.password)
        .await?
    {
        Some(session) => {
            let mut headers = HeaderMap::new();
            headers.insert(SET_COOKIE, session_cookie(&session.token.to_string()));
            redirect_to_board(headers, "Login successful!")
        }
        None => notice(
            StatusCode::OK,
            "error",
            "Invalid credentials. Please try again.",
        ),
    }
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(context): Extension<SessionContext>,
) -> Result<Fragment> {
    if let Some(session) = &context.0 {
        state.accounts.logout(session).await?;
    }
    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, expired_session_cookie());
    redirect_to_board(headers, "Logged out successfully.")
}

// The login checks below only hide board actions; the JSON API stays open.

pub async fn post_job(
    State(state): State<AppState>,
    Extension(context): Extension<SessionContext>,
    payload: core::result::Result<Form<CreateJobInput>, FormRejection>,
) -> Result<Fragment> {
    if context.0.is_none() {
        return notice(StatusCode::OK, "error", LOGIN_TO_MANAGE);
    }
    let Ok(Form(input)) = payload else {
        return notice(
            StatusCode::BAD_REQUEST,
            "error",
            "Salary and experience must be numbers.",
        );
    };
    let job = match input.check() {
        Ok(job) => job,
        Err(problem) => {
            return notice(StatusCode::BAD_REQUEST, "error", &problem.to_string());
        }
    };
    let job = state.jobs.insert(job).await?;
    tracing::info!("{:?} posted job {}", context.username(), job.id);
    redirect_to_board(HeaderMap::new(), "Job posted successfully!")
}

pub async fn delete_job(
    State(state): State<AppState>,
    Extension(context): Extension<SessionContext>,
    Path(id): Path<String>,
) -> Result<Fragment> {
    if context.0.is_none() {
        return notice(StatusCode::OK, "error", LOGIN_TO_MANAGE);
    }
    let deleted = match parse_id(&id) {
        Ok(id) => state.jobs.delete(id).await?,
        Err(_) => false,
    };
    if !deleted {
        return notice(StatusCode::NOT_FOUND, "error", JOB_NOT_FOUND);
    }
    tracing::info!("{:?} deleted job {}", context.username(), id);
    redirect_to_board(HeaderMap::new(), "Job deleted successfully!")
}

pub async fn apply(
    State(state): State<AppState>,
    Extension(context): Extension<SessionContext>,
    Path(id): Path<String>,
) -> Result<Fragment> {
    if context.0.is_none() {
        return notice(StatusCode::OK, "error", LOGIN_TO_APPLY);
    }
    let Ok(id) = parse_id(&id) else {
        return notice(StatusCode::NOT_FOUND, "error", JOB_NOT_FOUND);
    };
    let jobs = state.jobs.list_all().await?;
    match jobs.iter().find(|j| j.id == id) {
        Some(job) => notice(
            StatusCode::OK,
            "ok",
            &format!("Application submitted for {}. Best of luck!", job.title),
        ),
        None => notice(StatusCode::NOT_FOUND, "error", JOB_NOT_FOUND),
    }
}
