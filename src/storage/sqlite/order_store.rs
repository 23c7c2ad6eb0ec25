use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::order::{Order, OrderRecord};
use crate::domain::tenant::{OrderId, TenantId};
use crate::storage::{OrderStore, StorageError, StorageResult};

// ============================================================================
// SQLite Order Store
// ============================================================================
//
// Orders are written whole. Customer details and item snapshots live in JSON
// columns owned by the order row, with no link back to menu_items.
//
// ============================================================================

const COLUMNS: &str = "id, tenant_id, order_type, customer_json, items_json, total_cost, status, created_at, updated_at, version";

#[derive(Clone)]
pub struct SqliteOrderStore {
    pool: SqlitePool,
}

impl SqliteOrderStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    tenant_id: String,
    order_type: String,
    customer_json: String,
    items_json: String,
    total_cost: String,
    status: String,
    created_at: i64,
    updated_at: i64,
    version: i64,
}

fn corrupt(reason: impl Into<String>) -> StorageError {
    StorageError::corrupt("orders", reason)
}

fn from_millis(millis: i64) -> StorageResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis).ok_or_else(|| corrupt(format!("timestamp {millis} out of range")))
}

impl OrderRow {
    fn into_order(self) -> StorageResult<Order> {
        let id = Uuid::parse_str(&self.id).map_err(|e| corrupt(format!("id '{}': {e}", self.id)))?;
        let record = OrderRecord {
            id: OrderId(id),
            tenant_id: TenantId::parse(&self.tenant_id).ok_or_else(|| corrupt("blank tenant_id"))?,
            version: self.version,
            order_type: self.order_type.parse().map_err(corrupt)?,
            customer: serde_json::from_str(&self.customer_json)?,
            items: serde_json::from_str(&self.items_json)?,
            total_cost: Decimal::from_str(&self.total_cost)
                .map_err(|e| corrupt(format!("total_cost '{}': {e}", self.total_cost)))?,
            status: self.status.parse().map_err(corrupt)?,
            created_at: from_millis(self.created_at)?,
            updated_at: from_millis(self.updated_at)?,
        };

        Order::from_record(record).map_err(|reason| corrupt(format!("order {id}: {reason}")))
    }
}

#[async_trait]
impl OrderStore for SqliteOrderStore {
    async fn get(&self, order_id: OrderId) -> StorageResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(&format!("SELECT {COLUMNS} FROM orders WHERE id = ?"))
            .bind(order_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(OrderRow::into_order).transpose()
    }

    async fn list_by_tenant(&self, tenant: &TenantId) -> StorageResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {COLUMNS} FROM orders WHERE tenant_id = ? ORDER BY created_at DESC, id DESC"
        ))
        .bind(tenant.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(OrderRow::into_order).collect()
    }

    async fn upsert(&self, order: &Order) -> StorageResult<()> {
        let customer_json = serde_json::to_string(order.customer())?;
        let items_json = serde_json::to_string(order.items())?;

        let mut tx = self.pool.begin().await?;

        // A replace only lands on the stored version directly below ours and
        // never moves an order between tenants.
        let result = sqlx::query(
            "INSERT INTO orders (id, tenant_id, order_type, customer_json, items_json, total_cost, status, created_at, updated_at, version)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 order_type = excluded.order_type,
                 customer_json = excluded.customer_json,
                 items_json = excluded.items_json,
                 total_cost = excluded.total_cost,
                 status = excluded.status,
                 updated_at = excluded.updated_at,
                 version = excluded.version
             WHERE orders.version = excluded.version - 1
               AND orders.tenant_id = excluded.tenant_id",
        )
        .bind(order.id().to_string())
        .bind(order.tenant_id().as_str())
        .bind(order.order_type().as_str())
        .bind(customer_json)
        .bind(items_json)
        .bind(order.total_cost().to_string())
        .bind(order.status().as_str())
        .bind(order.created_at().timestamp_millis())
        .bind(order.updated_at().timestamp_millis())
        .bind(order.version())
        .execute(&mut *tx)
        .await;

        match result {
            Ok(done) if done.rows_affected() == 1 => {
                tx.commit().await?;
                tracing::debug!(order_id = %order.id(), version = order.version(), "Order row written");
                Ok(())
            }
            Ok(_) => {
                tx.rollback().await?;
                Err(StorageError::VersionConflict(order.id()))
            }
            Err(e) => {
                if let Err(rollback) = tx.rollback().await {
                    tracing::error!(order_id = %order.id(), error = %rollback, "Order rollback failed");
                }
                Err(e.into())
            }
        }
    }
}
