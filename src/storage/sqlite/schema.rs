use sqlx::SqlitePool;

use crate::storage::StorageResult;

// ============================================================================
// Schema
// ============================================================================
//
// Idempotent: every statement is IF NOT EXISTS, so `migrate` runs on every
// start. Money is decimal text, timestamps are Unix milliseconds.
//
// ============================================================================

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS menu_items (
        id          TEXT PRIMARY KEY NOT NULL,
        tenant_id   TEXT NOT NULL,
        name        TEXT NOT NULL,
        description TEXT,
        price       TEXT NOT NULL,
        category    TEXT NOT NULL,
        portion     TEXT,
        image_url   TEXT,
        image_hint  TEXT
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_menu_items_tenant ON menu_items (tenant_id)",
    r#"
    CREATE TABLE IF NOT EXISTS orders (
        id            TEXT PRIMARY KEY NOT NULL,
        tenant_id     TEXT NOT NULL,
        order_type    TEXT NOT NULL,
        customer_json TEXT NOT NULL,
        items_json    TEXT NOT NULL,
        total_cost    TEXT NOT NULL,
        status        TEXT NOT NULL,
        created_at    INTEGER NOT NULL,
        updated_at    INTEGER NOT NULL,
        version       INTEGER NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_orders_tenant_created ON orders (tenant_id, created_at)",
];

pub async fn migrate(pool: &SqlitePool) -> StorageResult<()> {
    for statement in STATEMENTS {
        sqlx::query(*statement).execute(pool).await?;
    }
    tracing::debug!(statements = STATEMENTS.len(), "Database schema applied");
    Ok(())
}
