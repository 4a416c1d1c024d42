use sqlx::PgConnection;
use uuid::Uuid;

use crate::pkg::internal::adaptors::accounts::spec::{AccountEntry, SessionEntry};
use crate::pkg::internal::store::store_error;
use crate::prelude::Result;

pub struct AccountSelector<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> AccountSelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        AccountSelector { pool }
    }

    pub async fn get_by_username(&mut self, username: &str) -> Result<Option<AccountEntry>> {
        let row = sqlx::query_as::<_, AccountEntry>(
            "SELECT username, password_hash, created_at FROM accounts WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&mut *self.pool)
        .await
        .map_err(|e| store_error("ERR-DB-005", e))?;
        Ok(row)
    }

    pub async fn get_session(&mut self, token: Uuid) -> Result<Option<SessionEntry>> {
        let row = sqlx::query_as::<_, SessionEntry>(
            "SELECT token, username, created_at FROM sessions WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&mut *self.pool)
        .await
        .map_err(|e| store_error("ERR-DB-005", e))?;
        Ok(row)
    }
}
