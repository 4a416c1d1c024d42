use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction, postgres::PgPoolOptions};
use standard_error::{Interpolate, StandardError};
use uuid::Uuid;

use super::{AccountStore, JobStore, store_error};
use crate::pkg::internal::adaptors::accounts::{
    mutators::AccountMutator,
    selectors::AccountSelector,
    spec::{AccountEntry, SessionEntry},
};
use crate::pkg::internal::adaptors::jobs::{
    mutators::JobMutator,
    selectors::JobSelector,
    spec::{JobEntry, JobPatch, NewJob},
};
use crate::prelude::Result;

pub trait GetTxn {
    fn begin_txn(&self) -> impl Future<Output = Result<Transaction<'static, Postgres>>> + Send;
}

impl GetTxn for PgPool {
    async fn begin_txn(&self) -> Result<Transaction<'static, Postgres>> {
        self.begin()
            .await
            .map_err(|e| store_error("ERR-DB-000", e))
    }
}

async fn commit(tx: Transaction<'static, Postgres>, code: &str) -> Result<()> {
    tx.commit().await.map_err(|e| store_error(code, e))
}

#[derive(Debug, Clone)]
pub struct PgStore {
    pub pool: Arc<PgPool>,
}

impl PgStore {
    /// Connects eagerly so an unreachable database fails startup instead of
    /// the first request.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| StandardError::new("ERR-DB-000").interpolate_err(e.to_string()))?;
        tracing::debug!("connected to db");
        Ok(PgStore {
            pool: Arc::new(pool),
        })
    }

    async fn conn(&self, code: &str) -> Result<sqlx::pool::PoolConnection<Postgres>> {
        self.pool.acquire().await.map_err(|e| store_error(code, e))
    }
}

#[async_trait]
impl JobStore for PgStore {
    async fn list_all(&self) -> Result<Vec<JobEntry>> {
        let mut conn = self.conn("ERR-DB-001").await?;
        JobSelector::new(&mut *conn).get_all().await
    }

    async fn insert(&self, job: NewJob) -> Result<JobEntry> {
        let mut tx = self.pool.begin_txn().await?;
        let row = JobMutator::new(&mut *tx).create(job).await?;
        commit(tx, "ERR-DB-002").await?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, patch: JobPatch) -> Result<Option<JobEntry>> {
        let mut tx = self.pool.begin_txn().await?;
        let row = if patch.is_empty() {
            JobSelector::new(&mut *tx).get_by_id(id).await?
        } else {
            JobMutator::new(&mut *tx).update(id, patch).await?
        };
        commit(tx, "ERR-DB-003").await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut tx = self.pool.begin_txn().await?;
        let deleted = JobMutator::new(&mut *tx).delete(id).await?;
        commit(tx, "ERR-DB-004").await?;
        Ok(deleted)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("select 1")
            .execute(&*self.pool)
            .await
            .map_err(|e| store_error("ERR-DB-000", e))?;
        Ok(())
    }
}

#[async_trait]
impl AccountStore for PgStore {
    async fn upsert_account(&self, username: &str, password_hash: &str) -> Result<AccountEntry> {
        let mut tx = self.pool.begin_txn().await?;
        let account = AccountMutator::new(&mut *tx)
            .upsert(username, password_hash)
            .await?;
        let revoked = AccountMutator::new(&mut *tx).revoke_sessions(username).await?;
        commit(tx, "ERR-DB-005").await?;
        if revoked > 0 {
            tracing::info!("revoked {} sessions for {}", revoked, username);
        }
        Ok(account)
    }

    async fn get_account(&self, username: &str) -> Result<Option<AccountEntry>> {
        let mut conn = self.conn("ERR-DB-005").await?;
        AccountSelector::new(&mut *conn).get_by_username(username).await
    }

    async fn create_session(&self, username: &str) -> Result<SessionEntry> {
        let mut tx = self.pool.begin_txn().await?;
        let session = AccountMutator::new(&mut *tx).create_session(username).await?;
        commit(tx, "ERR-DB-005").await?;
        Ok(session)
    }

    async fn get_session(&self, token: Uuid) -> Result<Option<SessionEntry>> {
        let mut conn = self.conn("ERR-DB-005").await?;
        AccountSelector::new(&mut *conn).get_session(token).await
    }

    async fn delete_session(&self, token: Uuid) -> Result<bool> {
        let mut conn = self.conn("ERR-DB-005").await?;
        AccountMutator::new(&mut *conn).delete_session(token).await
    }
}
