//! Database module
//!
//! Embedded SurrealDB storage. Production uses the RocksDB backend under
//! the configured work directory; tests run against the in-memory engine.
//!
//! Schema is applied at startup. The unique indexes declared here are the
//! safety net behind the sequence allocator: a duplicate human-readable
//! code surfaces as a retryable conflict at persist time.

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

const NAMESPACE: &str = "jikoni";
const DATABASE: &str = "pos";

/// Schema definition, idempotent on restart
const SCHEMA: &str = r#"
    DEFINE INDEX IF NOT EXISTS uniq_order_number ON TABLE order FIELDS order_number UNIQUE;
    DEFINE INDEX IF NOT EXISTS uniq_menu_item_code ON TABLE menu_item FIELDS code UNIQUE;
    DEFINE INDEX IF NOT EXISTS uniq_customer_code ON TABLE customer FIELDS code UNIQUE;
    DEFINE INDEX IF NOT EXISTS uniq_customer_phone ON TABLE customer FIELDS phone UNIQUE;
"#;

/// Open the on-disk database and apply schema
pub async fn connect(db_path: &str) -> Result<Surreal<Db>, AppError> {
    let db = Surreal::new::<RocksDb>(db_path)
        .await
        .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
    init(&db).await?;
    tracing::info!("Database connection established ({db_path})");
    Ok(db)
}

/// Open an in-memory database (tests)
pub async fn connect_memory() -> Result<Surreal<Db>, AppError> {
    let db = Surreal::new::<Mem>(())
        .await
        .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;
    init(&db).await?;
    Ok(db)
}

async fn init(db: &Surreal<Db>) -> Result<(), AppError> {
    db.use_ns(NAMESPACE)
        .use_db(DATABASE)
        .await
        .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

    db.query(SCHEMA)
        .await
        .map_err(|e| AppError::database(format!("Failed to apply schema: {e}")))?;

    Ok(())
}
