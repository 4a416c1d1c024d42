use sqlx::PgConnection;
use uuid::Uuid;

use crate::pkg::internal::adaptors::jobs::spec::JobEntry;
use crate::pkg::internal::store::store_error;
use crate::prelude::Result;

pub struct JobSelector<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> JobSelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        JobSelector { pool }
    }

    pub async fn get_by_id(&mut self, id: Uuid) -> Result<Option<JobEntry>> {
        let row = sqlx::query_as::<_, JobEntry>(
            "SELECT id, title, company, location, type, salary, experience
             FROM jobs WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.pool)
        .await
        .map_err(|e| store_error("ERR-DB-001", e))?;

        Ok(row)
    }

    pub async fn get_all(&mut self) -> Result<Vec<JobEntry>> {
        let rows = sqlx::query_as::<_, JobEntry>(
            "SELECT id, title, company, location, type, salary, experience
             FROM jobs ORDER BY seq ASC",
        )
        .fetch_all(&mut *self.pool)
        .await
        .map_err(|e| store_error("ERR-DB-001", e))?;

        Ok(rows)
    }
}
