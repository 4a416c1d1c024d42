//! Persistence seam for jobs and accounts.
//!
//! Handlers only ever see [`JobStore`] and [`AccountStore`]; the PostgreSQL
//! implementation backs production and the in-memory one backs tests and
//! `JOB_STORE=memory` demos.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use axum::http::StatusCode;
use standard_error::{Interpolate, StandardError, Status};
use uuid::Uuid;

use crate::pkg::internal::adaptors::accounts::spec::{AccountEntry, SessionEntry};
use crate::pkg::internal::adaptors::jobs::spec::{JobEntry, JobPatch, NewJob};
use crate::prelude::Result;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait JobStore: Send + Sync {
    /// Every job, in insertion order.
    async fn list_all(&self) -> Result<Vec<JobEntry>>;

    async fn insert(&self, job: NewJob) -> Result<JobEntry>;

    /// `None` when no job has this id.
    async fn update(&self, id: Uuid, patch: JobPatch) -> Result<Option<JobEntry>>;

    /// `false` when no job has this id.
    async fn delete(&self, id: Uuid) -> Result<bool>;

    async fn ping(&self) -> Result<()>;
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Creates the account or replaces its password hash. Existing sessions
    /// for the username are revoked either way.
    async fn upsert_account(&self, username: &str, password_hash: &str) -> Result<AccountEntry>;

    async fn get_account(&self, username: &str) -> Result<Option<AccountEntry>>;

    async fn create_session(&self, username: &str) -> Result<SessionEntry>;

    async fn get_session(&self, token: Uuid) -> Result<Option<SessionEntry>>;

    async fn delete_session(&self, token: Uuid) -> Result<bool>;
}

pub fn store_error(code: &str, e: impl ToString) -> StandardError {
    StandardError::new(code)
        .interpolate_err(e.to_string())
        .code(StatusCode::INTERNAL_SERVER_ERROR)
}
