// ============================================================================
// Storage - Tenant-scoped Persistence Ports
// ============================================================================
//
// The domain talks to storage only through these traits. The tenant id is
// the first parameter of every tenant-scoped method; an id owned by another
// tenant behaves exactly like a missing one.
//
// ============================================================================

mod error;
pub mod sqlite;

use async_trait::async_trait;

use crate::domain::catalog::{MenuItem, MenuItemPatch, NewMenuItem};
use crate::domain::order::Order;
use crate::domain::tenant::{ItemId, OrderId, TenantId};

pub use error::{StorageError, StorageResult};

#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn get(&self, tenant: &TenantId, item_id: ItemId) -> StorageResult<Option<MenuItem>>;

    /// Ordered by `(category, name)` ascending, case-insensitive.
    async fn list(&self, tenant: &TenantId) -> StorageResult<Vec<MenuItem>>;

    async fn insert(&self, item: &MenuItem) -> StorageResult<()>;

    async fn update(
        &self,
        tenant: &TenantId,
        item_id: ItemId,
        patch: MenuItemPatch,
    ) -> StorageResult<Option<MenuItem>>;

    async fn delete(&self, tenant: &TenantId, item_id: ItemId) -> StorageResult<bool>;

    /// Atomically swap the tenant's whole catalog. On error nothing changed.
    async fn replace_all(
        &self,
        tenant: &TenantId,
        items: Vec<NewMenuItem>,
    ) -> StorageResult<Vec<MenuItem>>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Tenant-agnostic lookup; callers enforce ownership.
    async fn get(&self, order_id: OrderId) -> StorageResult<Option<Order>>;

    /// Newest first.
    async fn list_by_tenant(&self, tenant: &TenantId) -> StorageResult<Vec<Order>>;

    /// Insert a new order or replace an existing one with the next version.
    async fn upsert(&self, order: &Order) -> StorageResult<()>;
}
