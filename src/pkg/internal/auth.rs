use std::sync::Arc;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use standard_error::{Interpolate, StandardError, Status};
use uuid::Uuid;

use crate::{pkg::internal::store::AccountStore, prelude::Result};

/// A logged-in user, as seen by handlers and templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    pub token: Uuid,
}

#[derive(Clone)]
pub struct Accounts {
    store: Arc<dyn AccountStore>,
    cost: u32,
}

async fn hash_password(password: &str, cost: u32) -> Result<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| hashing_error(e.to_string()))?
        .map_err(|e| hashing_error(e.to_string()))
}

async fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let password = password.to_string();
    let hash = hash.to_string();
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| hashing_error(e.to_string()))?
        .map_err(|e| hashing_error(e.to_string()))
}

fn hashing_error(e: String) -> StandardError {
    StandardError::new("ERR-AUTH-004")
        .interpolate_err(e)
        .code(StatusCode::INTERNAL_SERVER_ERROR)
}

impl Accounts {
    pub fn new(store: Arc<dyn AccountStore>, cost: u32) -> Self {
        Accounts { store, cost }
    }

    /// Registers `username`, replacing the password of an existing account.
    pub async fn signup(&self, username: &str, password: &str) -> Result<String> {
        if username.is_empty() || password.is_empty() {
            return Err(StandardError::new("ERR-AUTH-002").code(StatusCode::BAD_REQUEST));
        }
        let hash = hash_password(password, self.cost).await?;
        let account = self.store.upsert_account(username, &hash).await?;
        tracing::info!("account {} signed up", &account.username);
        Ok(account.username)
    }

    /// `None` when the account is unknown or the password does not match.
    pub async fn login(&self, username: &str, password: &str) -> Result<Option<Session>> {
        let Some(account) = self.store.get_account(username).await? else {
            tracing::warn!("login attempt for unknown account {}", username);
            return Ok(None);
        };
        if !verify_password(password, &account.password_hash).await? {
            tracing::warn!("wrong password for {}", username);
            return Ok(None);
        }
        let session = self.store.create_session(&account.username).await?;
        tracing::info!("{} logged in", &session.username);
        Ok(Some(Session {
            username: session.username,
            token: session.token,
        }))
    }

    pub async fn logout(&self, session: &Session) -> Result<()> {
        if self.store.delete_session(session.token).await? {
            tracing::info!("{} logged out", &session.username);
        }
        Ok(())
    }

    /// Resolves a raw token; malformed or unknown tokens yield `None`.
    pub async fn session(&self, token: &str) -> Result<Option<Session>> {
        let Ok(token) = token.parse::<Uuid>() else {
            return Ok(None);
        };
        Ok(self.store.get_session(token).await?.map(|s| Session {
            username: s.username,
            token: s.token,
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tracing_test::traced_test;

    use super::Accounts;
    use crate::{pkg::internal::store::MemoryStore, prelude::Result};

    fn accounts() -> Accounts {
        Accounts::new(Arc::new(MemoryStore::new()), 4)
    }

    #[traced_test]
    #[tokio::test]
    async fn login_requires_matching_password() -> Result<()> {
        let accounts = accounts();
        accounts.signup("alice", "s3cret").await?;
        assert!(accounts.login("alice", "wrong").await?.is_none());
        assert!(accounts.login("bob", "s3cret").await?.is_none());
        let session = accounts.login("alice", "s3cret").await?.unwrap();
        assert_eq!(session.username, "alice");
        Ok(())
    }

    #[traced_test]
    #[tokio::test]
    async fn signup_rejects_empty_fields() {
        let accounts = accounts();
        assert!(accounts.signup("", "pw").await.is_err());
        assert!(accounts.signup("alice", "").await.is_err());
    }

    #[traced_test]
    #[tokio::test]
    async fn signup_again_overwrites_password() -> Result<()> {
        let accounts = accounts();
        accounts.signup("alice", "first").await?;
        let old = accounts.login("alice", "first").await?.unwrap();
        accounts.signup("alice", "second").await?;
        assert!(accounts.login("alice", "first").await?.is_none());
        assert!(accounts.login("alice", "second").await?.is_some());
        assert!(accounts.session(&old.token.to_string()).await?.is_none());
        Ok(())
    }

    #[traced_test]
    #[tokio::test]
    async fn logout_invalidates_token() -> Result<()> {
        let accounts = accounts();
        accounts.signup("alice", "pw").await?;
        let session = accounts.login("alice", "pw").await?.unwrap();
        let token = session.token.to_string();
        assert_eq!(accounts.session(&token).await?, Some(session.clone()));
        accounts.logout(&session).await?;
        assert!(accounts.session(&token).await?.is_none());
        assert!(accounts.session("not-a-token").await?.is_none());
        Ok(())
    }
}
