use sqlx::migrate::Migrator;
use standard_error::{Interpolate, StandardError};

use crate::{
    conf::settings,
    pkg::internal::store::{PgStore, postgres::GetTxn},
    prelude::Result,
};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub async fn apply() -> Result<()> {
    let store = PgStore::connect(
        &settings.database_url,
        settings.database_pool_max_connections,
    )
    .await?;

    let mut tx = store.pool.begin_txn().await?;
    MIGRATOR
        .run(&mut *tx)
        .await
        .map_err(|e| StandardError::new("ERR-DB-000").interpolate_err(e.to_string()))?;

    tx.commit()
        .await
        .map_err(|e| StandardError::new("ERR-DB-000").interpolate_err(e.to_string()))?;

    println!("Migrations applied successfully");
    Ok(())
}
