use std::fmt;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};
use standard_error::{Interpolate, StandardError, Status};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::{
    pkg::{
        internal::adaptors::jobs::spec::{JobEntry, JobPatch, NewJob},
        server::state::AppState,
    },
    prelude::Result,
};

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateJobInput {
    #[validate(required, length(min = 1))]
    pub title: Option<String>,
    #[validate(required, length(min = 1))]
    pub company: Option<String>,
    #[validate(required, length(min = 1))]
    pub location: Option<String>,
    #[serde(rename = "type")]
    #[validate(required, length(min = 1))]
    pub job_type: Option<String>,
    #[validate(required, range(min = 0.0))]
    pub salary: Option<f64>,
    #[validate(required, range(min = 0.0))]
    pub experience: Option<f64>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct PatchJobInput {
    #[validate(length(min = 1))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub company: Option<String>,
    #[validate(length(min = 1))]
    pub location: Option<String>,
    #[serde(rename = "type")]
    #[validate(length(min = 1))]
    pub job_type: Option<String>,
    #[validate(range(min = 0.0))]
    pub salary: Option<f64>,
    #[validate(range(min = 0.0))]
    pub experience: Option<f64>,
}

fn wire_name(field: &str) -> &str {
    if field == "job_type" { "type" } else { field }
}

/// Splits validation failures into absent/empty fields and out-of-range ones,
/// each sorted by wire name.
fn classify(errors: &ValidationErrors) -> (Vec<String>, Vec<String>) {
    let mut missing = Vec::new();
    let mut invalid = Vec::new();
    for (field, errs) in errors.field_errors() {
        let name = wire_name(&field).to_string();
        if errs.iter().any(|e| e.code == "required" || e.code == "length") {
            missing.push(name);
        } else {
            invalid.push(name);
        }
    }
    missing.sort();
    invalid.sort();
    (missing, invalid)
}

fn invalid_fields(fields: Vec<String>) -> StandardError {
    StandardError::new("ERR-JOB-002")
        .interpolate_err(fields.join(", "))
        .code(StatusCode::BAD_REQUEST)
}

/// Why a job form or body was refused, by wire field name.
#[derive(Debug, PartialEq)]
pub enum FieldProblem {
    Missing(Vec<String>),
    Invalid(Vec<String>),
}

impl fmt::Display for FieldProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldProblem::Missing(fields) => {
                write!(f, "Please fill in every job field (missing: {}).", fields.join(", "))
            }
            FieldProblem::Invalid(fields) => write!(
                f,
                "Salary and experience cannot be negative (invalid: {}).",
                fields.join(", ")
            ),
        }
    }
}

impl FieldProblem {
    fn into_error(self) -> StandardError {
        match self {
            FieldProblem::Missing(fields) => StandardError::new("ERR-JOB-001")
                .interpolate_err(fields.join(", "))
                .code(StatusCode::BAD_REQUEST),
            FieldProblem::Invalid(fields) => invalid_fields(fields),
        }
    }
}

/// Undecodable bodies (wrong types, broken JSON, wrong content type) are
/// reported like any other invalid field.
pub fn job_body<T>(payload: core::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        tracing::warn!("rejected job body: {}", rejection.body_text());
        StandardError::new("ERR-JOB-002")
            .interpolate_err(rejection.body_text())
            .code(StatusCode::BAD_REQUEST)
    })
}

pub fn not_found() -> StandardError {
    StandardError::new("ERR-JOB-404").code(StatusCode::NOT_FOUND)
}

/// Ids that are not UUIDs cannot name a record, so they are reported as not found.
pub fn parse_id(id: &str) -> Result<Uuid> {
    id.parse::<Uuid>().map_err(|_| not_found())
}

impl CreateJobInput {
    pub fn check(self) -> core::result::Result<NewJob, FieldProblem> {
        if let Err(errors) = self.validate() {
            let (missing, invalid) = classify(&errors);
            if !missing.is_empty() {
                return Err(FieldProblem::Missing(missing));
            }
            return Err(FieldProblem::Invalid(invalid));
        }
        match self {
            CreateJobInput {
                title: Some(title),
                company: Some(company),
                location: Some(location),
                job_type: Some(job_type),
                salary: Some(salary),
                experience: Some(experience),
            } => Ok(NewJob {
                title,
                company,
                location,
                job_type,
                salary,
                experience,
            }),
            _ => Err(FieldProblem::Missing(Vec::new())),
        }
    }

    pub fn into_new_job(self) -> Result<NewJob> {
        self.check().map_err(FieldProblem::into_error)
    }
}

impl PatchJobInput {
    pub fn into_patch(self) -> Result<JobPatch> {
        if let Err(errors) = self.validate() {
            let (mut missing, mut invalid) = classify(&errors);
            invalid.append(&mut missing);
            invalid.sort();
            return Err(invalid_fields(invalid));
        }
        Ok(JobPatch {
            title: self.title,
            company: self.company,
            location: self.location,
            job_type: self.job_type,
            salary: self.salary,
            experience: self.experience,
        })
    }
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<JobEntry>>> {
    let jobs = state.jobs.list_all().await?;
    tracing::debug!("listing {} jobs", jobs.len());
    Ok(Json(jobs))
}

pub async fn create(
    State(state): State<AppState>,
    payload: core::result::Result<Json<CreateJobInput>, JsonRejection>,
) -> Result<(StatusCode, Json<JobEntry>)> {
    let job = state.jobs.insert(job_body(payload)?.into_new_job()?).await?;
    tracing::info!("created job {} ({} at {})", job.id, &job.title, &job.company);
    Ok((StatusCode::CREATED, Json(job)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: core::result::Result<Json<PatchJobInput>, JsonRejection>,
) -> Result<Json<JobEntry>> {
    let id = parse_id(&id)?;
    let patch = job_body(payload)?.into_patch()?;
    let job = state.jobs.update(id, patch).await?.ok_or_else(not_found)?;
    tracing::info!("updated job {}", job.id);
    Ok(Json(job))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let id = parse_id(&id)?;
    if !state.jobs.delete(id).await? {
        tracing::warn!("delete of unknown job {}", id);
        return Err(not_found());
    }
    tracing::info!("deleted job {}", id);
    Ok(Json(json!({ "message": "Job deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Method, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use tracing_test::traced_test;

    use super::{CreateJobInput, FieldProblem};
    use crate::pkg::server::{router::build_routes, state::AppState};

    fn app() -> Router {
        build_routes(AppState::in_memory(4))
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn engineer() -> Value {
        json!({
            "title": "Engineer",
            "company": "Acme",
            "location": "Remote",
            "type": "Full-time",
            "salary": 90000,
            "experience": 3
        })
    }

    #[traced_test]
    #[tokio::test]
    async fn create_list_delete_round() {
        let app = app();

        let (status, created) = call(&app, Method::POST, "/jobs", Some(engineer())).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["_id"].as_str().unwrap().to_string();

        let (status, jobs) = call(&app, Method::GET, "/jobs", None).await;
        assert_eq!(status, StatusCode::OK);
        let listed = jobs
            .as_array()
            .unwrap()
            .iter()
            .find(|j| j["_id"] == json!(id))
            .unwrap();
        assert_eq!(listed["salary"].as_f64(), Some(90000.0));
        assert_eq!(listed["type"], json!("Full-time"));

        let (status, body) = call(&app, Method::DELETE, &format!("/jobs/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], json!("Job deleted successfully"));

        let (_, jobs) = call(&app, Method::GET, "/jobs", None).await;
        assert!(jobs.as_array().unwrap().iter().all(|j| j["_id"] != json!(id)));

        let (status, _) = call(&app, Method::DELETE, &format!("/jobs/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[traced_test]
    #[tokio::test]
    async fn every_create_gets_a_fresh_id() {
        let app = app();
        let (_, a) = call(&app, Method::POST, "/jobs", Some(engineer())).await;
        let (_, b) = call(&app, Method::POST, "/jobs", Some(engineer())).await;
        assert_ne!(a["_id"], b["_id"]);
        let (_, jobs) = call(&app, Method::GET, "/jobs", None).await;
        assert_eq!(jobs.as_array().unwrap().len(), 2);
    }

    #[traced_test]
    #[tokio::test]
    async fn missing_field_is_rejected_without_writing() {
        let app = app();
        let mut payload = engineer();
        payload.as_object_mut().unwrap().remove("company");

        let (status, _) = call(&app, Method::POST, "/jobs", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let mut payload = engineer();
        payload["title"] = json!("");
        let (status, _) = call(&app, Method::POST, "/jobs", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, jobs) = call(&app, Method::GET, "/jobs", None).await;
        assert!(jobs.as_array().unwrap().is_empty());
    }

    #[traced_test]
    #[tokio::test]
    async fn update_replaces_given_fields() {
        let app = app();
        let (_, created) = call(&app, Method::POST, "/jobs", Some(engineer())).await;
        let uri = format!("/jobs/{}", created["_id"].as_str().unwrap());

        let (status, updated) = call(&app, Method::PUT, &uri, Some(json!({"salary": 95000}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["salary"].as_f64(), Some(95000.0));
        assert_eq!(updated["title"], json!("Engineer"));

        let (status, _) = call(&app, Method::PUT, &uri, Some(json!({"title": ""}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(&app, Method::PUT, &uri, Some(json!({"experience": -1}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[traced_test]
    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let app = app();
        let missing = format!("/jobs/{}", uuid::Uuid::new_v4());
        let (status, _) = call(&app, Method::PUT, &missing, Some(json!({"title": "x"}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = call(&app, Method::DELETE, &missing, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = call(&app, Method::DELETE, "/jobs/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[traced_test]
    #[tokio::test]
    async fn root_and_probes_answer() {
        let app = app();
        let response = app
            .clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"Welcome to the Job Board API!");

        let (status, _) = call(&app, Method::GET, "/healthz", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[test]
    fn negative_salary_is_invalid_not_missing() {
        let input = CreateJobInput {
            title: Some("a".into()),
            company: Some("b".into()),
            location: Some("c".into()),
            job_type: Some("d".into()),
            salary: Some(-5.0),
            experience: Some(1.0),
        };
        assert_eq!(
            input.check().unwrap_err(),
            FieldProblem::Invalid(vec!["salary".to_string()])
        );
    }

    #[test]
    fn missing_fields_are_named_by_wire_name() {
        let input = CreateJobInput {
            title: Some("a".into()),
            company: Some(String::new()),
            location: Some("c".into()),
            salary: Some(-1.0),
            experience: Some(1.0),
            ..Default::default()
        };
        let problem = input.check().unwrap_err();
        assert_eq!(
            problem,
            FieldProblem::Missing(vec!["company".to_string(), "type".to_string()])
        );
        assert_eq!(
            problem.to_string(),
            "Please fill in every job field (missing: company, type)."
        );
    }

    async fn raw_post(app: &Router, body: &str, content_type: Option<&str>) -> StatusCode {
        let mut builder = Request::builder().method(Method::POST).uri("/jobs");
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        let request = builder.body(Body::from(body.to_string())).unwrap();
        app.clone().oneshot(request).await.unwrap().status()
    }

    #[traced_test]
    #[tokio::test]
    async fn undecodable_bodies_are_bad_requests() {
        let app = app();
        let mut payload = engineer();
        payload["salary"] = json!("90000");
        let (status, _) = call(&app, Method::POST, "/jobs", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let truncated = r#"{"title": "Engineer", "company""#;
        assert_eq!(
            raw_post(&app, truncated, Some("application/json")).await,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            raw_post(&app, &engineer().to_string(), None).await,
            StatusCode::BAD_REQUEST
        );

        let (created, _) = call(&app, Method::POST, "/jobs", Some(engineer())).await;
        assert_eq!(created, StatusCode::CREATED);
        let (_, jobs) = call(&app, Method::GET, "/jobs", None).await;
        let id = jobs[0]["_id"].as_str().unwrap().to_string();
        let (status, _) = call(
            &app,
            Method::PUT,
            &format!("/jobs/{}", id),
            Some(json!({"experience": "three"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, jobs) = call(&app, Method::GET, "/jobs", None).await;
        assert_eq!(jobs.as_array().unwrap().len(), 1);
        assert_eq!(jobs[0]["experience"].as_f64(), Some(3.0));
    }
}
