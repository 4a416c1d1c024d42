use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AccountStore, JobStore};
use crate::pkg::internal::adaptors::accounts::spec::{AccountEntry, SessionEntry};
use crate::pkg::internal::adaptors::jobs::spec::{JobEntry, JobPatch, NewJob};
use crate::prelude::Result;

/// Process-local store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    jobs: RwLock<Vec<JobEntry>>,
    accounts: RwLock<HashMap<String, AccountEntry>>,
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn list_all(&self) -> Result<Vec<JobEntry>> {
        Ok(self.jobs.read().await.clone())
    }

    async fn insert(&self, job: NewJob) -> Result<JobEntry> {
        let entry = JobEntry::from_new(Uuid::new_v4(), job);
        self.jobs.write().await.push(entry.clone());
        Ok(entry)
    }

    async fn update(&self, id: Uuid, patch: JobPatch) -> Result<Option<JobEntry>> {
        let mut jobs = self.jobs.write().await;
        Ok(jobs.iter_mut().find(|j| j.id == id).map(|job| {
            job.apply(patch);
            job.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut jobs = self.jobs.write().await;
        let before = jobs.len();
        jobs.retain(|j| j.id != id);
        Ok(jobs.len() < before)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn upsert_account(&self, username: &str, password_hash: &str) -> Result<AccountEntry> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .entry(username.to_string())
            .and_modify(|a| a.password_hash = password_hash.to_string())
            .or_insert_with(|| AccountEntry {
                username: username.to_string(),
                password_hash: password_hash.to_string(),
                created_at: Utc::now(),
            })
            .clone();
        self.sessions
            .write()
            .await
            .retain(|_, s| s.username != username);
        Ok(account)
    }

    async fn get_account(&self, username: &str) -> Result<Option<AccountEntry>> {
        Ok(self.accounts.read().await.get(username).cloned())
    }

    async fn create_session(&self, username: &str) -> Result<SessionEntry> {
        let session = SessionEntry {
            token: Uuid::new_v4(),
            username: username.to_string(),
            created_at: Utc::now(),
        };
        self.sessions
            .write()
            .await
            .insert(session.token, session.clone());
        Ok(session)
    }

    async fn get_session(&self, token: Uuid) -> Result<Option<SessionEntry>> {
        Ok(self.sessions.read().await.get(&token).cloned())
    }

    async fn delete_session(&self, token: Uuid) -> Result<bool> {
        Ok(self.sessions.write().await.remove(&token).is_some())
    }
}
