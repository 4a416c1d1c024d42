use sqlx::PgConnection;
use uuid::Uuid;

use crate::pkg::internal::adaptors::accounts::spec::{AccountEntry, SessionEntry};
use crate::pkg::internal::store::store_error;
use crate::prelude::Result;

pub struct AccountMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> AccountMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        AccountMutator { pool }
    }

    pub async fn upsert(&mut self, username: &str, password_hash: &str) -> Result<AccountEntry> {
        let row = sqlx::query_as::<_, AccountEntry>(
            r#"
            INSERT INTO accounts (username, password_hash)
            VALUES ($1, $2)
            ON CONFLICT (username) DO UPDATE
            SET password_hash = $2
            RETURNING username, password_hash, created_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&mut *self.pool)
        .await
        .map_err(|e| store_error("ERR-DB-005", e))?;
        Ok(row)
    }

    pub async fn revoke_sessions(&mut self, username: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE username = $1")
            .bind(username)
            .execute(&mut *self.pool)
            .await
            .map_err(|e| store_error("ERR-DB-005", e))?;
        Ok(result.rows_affected())
    }

    pub async fn create_session(&mut self, username: &str) -> Result<SessionEntry> {
        let row = sqlx::query_as::<_, SessionEntry>(
            r#"
            INSERT INTO sessions (token, username)
            VALUES ($1, $2)
            RETURNING token, username, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .fetch_one(&mut *self.pool)
        .await
        .map_err(|e| store_error("ERR-DB-005", e))?;
        Ok(row)
    }

    pub async fn delete_session(&mut self, token: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(&mut *self.pool)
            .await
            .map_err(|e| store_error("ERR-DB-005", e))?;
        Ok(result.rows_affected() > 0)
    }
}
