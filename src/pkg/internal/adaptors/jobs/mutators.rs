use sqlx::{PgConnection, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::pkg::internal::adaptors::jobs::spec::{JobEntry, JobPatch, NewJob};
use crate::pkg::internal::store::store_error;
use crate::prelude::Result;

const RETURNING: &str = " RETURNING id, title, company, location, type, salary, experience";

pub struct JobMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> JobMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        JobMutator { pool }
    }

    pub async fn create(&mut self, job: NewJob) -> Result<JobEntry> {
        let row = sqlx::query_as::<_, JobEntry>(&format!(
            r#"
            INSERT INTO jobs (id, title, company, location, type, salary, experience)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            {RETURNING}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.location)
        .bind(&job.job_type)
        .bind(job.salary)
        .bind(job.experience)
        .fetch_one(&mut *self.pool)
        .await
        .map_err(|e| store_error("ERR-DB-002", e))?;
        Ok(row)
    }

    pub async fn update(&mut self, id: Uuid, job: JobPatch) -> Result<Option<JobEntry>> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE jobs SET updated_at = CURRENT_TIMESTAMP");

        if let Some(title) = job.title {
            query.push(", title = ").push_bind(title);
        }
        if let Some(company) = job.company {
            query.push(", company = ").push_bind(company);
        }
        if let Some(location) = job.location {
            query.push(", location = ").push_bind(location);
        }
        if let Some(job_type) = job.job_type {
            query.push(", type = ").push_bind(job_type);
        }
        if let Some(salary) = job.salary {
            query.push(", salary = ").push_bind(salary);
        }
        if let Some(experience) = job.experience {
            query.push(", experience = ").push_bind(experience);
        }
        query.push(" WHERE id = ").push_bind(id).push(RETURNING);

        let row = query
            .build_query_as::<JobEntry>()
            .fetch_optional(&mut *self.pool)
            .await
            .map_err(|e| store_error("ERR-DB-003", e))?;
        Ok(row)
    }

    pub async fn delete(&mut self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&mut *self.pool)
            .await
            .map_err(|e| store_error("ERR-DB-004", e))?;

        Ok(result.rows_affected() > 0)
    }
}
