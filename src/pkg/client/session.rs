use std::path::Path;

use serde::{Deserialize, Serialize};
use standard_error::{Interpolate, StandardError};

use crate::prelude::Result;

/// What the CLI remembers between invocations. Only the server-issued token
/// is kept, never the password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSession {
    pub username: String,
    pub token: String,
}

fn io_error(e: impl ToString) -> StandardError {
    StandardError::new("ERR-CLI-003").interpolate_err(e.to_string())
}

impl ClientSession {
    /// A missing or unreadable file means "not logged in".
    pub async fn load(path: impl AsRef<Path>) -> Option<ClientSession> {
        let raw = tokio::fs::read_to_string(path.as_ref()).await.ok()?;
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!("ignoring corrupt session file: {}", e);
                None
            }
        }
    }

    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let raw = serde_json::to_string(self).map_err(io_error)?;
        tokio::fs::write(path.as_ref(), raw).await.map_err(io_error)
    }

    pub async fn clear(path: impl AsRef<Path>) -> Result<()> {
        match tokio::fs::remove_file(path.as_ref()).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ClientSession;
    use crate::prelude::Result;

    #[tokio::test]
    async fn save_load_clear() -> Result<()> {
        let path = std::env::temp_dir().join(format!("jobboard-session-{}", uuid::Uuid::new_v4()));
        assert!(ClientSession::load(&path).await.is_none());

        let session = ClientSession {
            username: "alice".into(),
            token: "t".into(),
        };
        session.save(&path).await?;
        assert_eq!(ClientSession::load(&path).await, Some(session));

        ClientSession::clear(&path).await?;
        ClientSession::clear(&path).await?;
        assert!(ClientSession::load(&path).await.is_none());
        Ok(())
    }
}
