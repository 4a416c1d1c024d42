use std::sync::Arc;

use standard_error::{Interpolate, StandardError};

use crate::{
    conf::settings,
    pkg::internal::{
        auth::Accounts,
        store::{JobStore, MemoryStore, PgStore},
    },
    prelude::Result,
};

#[derive(Clone)]
pub struct AppState {
    pub jobs: Arc<dyn JobStore>,
    pub accounts: Accounts,
}

impl AppState {
    /// Builds state from settings. An unreachable database is an error here,
    /// so the process exits instead of serving failing requests.
    pub async fn new() -> Result<AppState> {
        match settings.job_store.as_str() {
            "memory" => {
                tracing::warn!("using in-memory job store, data is lost on restart");
                Ok(AppState::in_memory(settings.bcrypt_cost))
            }
            "postgres" => {
                let store = Arc::new(
                    PgStore::connect(
                        &settings.database_url,
                        settings.database_pool_max_connections,
                    )
                    .await?,
                );
                store.ping().await?;
                Ok(AppState {
                    jobs: store.clone(),
                    accounts: Accounts::new(store, settings.bcrypt_cost),
                })
            }
            other => Err(StandardError::new("ERR-DB-000")
                .interpolate_err(format!("unknown job store `{}`", other))),
        }
    }

    pub fn in_memory(bcrypt_cost: u32) -> AppState {
        let store = Arc::new(MemoryStore::new());
        AppState {
            jobs: store.clone(),
            accounts: Accounts::new(store, bcrypt_cost),
        }
    }
}
