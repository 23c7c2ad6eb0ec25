use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::domain::tenant::{ItemId, TenantId};
use crate::metrics::Metrics;
use crate::storage::CatalogStore;
use super::errors::CatalogError;
use super::validation::{validate_new_item, validate_patch, validate_row};
use super::value_objects::{BulkReplaceOutcome, MenuItem, MenuItemPatch, NewMenuItem, RawMenuRow, RowWarning};

// ============================================================================
// Catalog Service
// ============================================================================
//
// Orchestrates: Input → Validation → CatalogStore
//
// ============================================================================

/// Spreadsheet row number of the first data row (the header is row 1).
const FIRST_DATA_ROW: usize = 2;

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
    metrics: Arc<Metrics>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>, metrics: Arc<Metrics>) -> Self {
        Self { store, metrics }
    }

    pub async fn add_item(&self, tenant: &TenantId, data: NewMenuItem) -> Result<MenuItem, CatalogError> {
        let result = self.try_add(tenant, data).await;
        self.observe("add_item", tenant, &result);
        if let Ok(item) = &result {
            info!(tenant = %tenant, item_id = %item.id, name = %item.name, "Menu item added");
        }
        result
    }

    async fn try_add(&self, tenant: &TenantId, data: NewMenuItem) -> Result<MenuItem, CatalogError> {
        let item = MenuItem::from_new(tenant, validate_new_item(data)?);
        self.store.insert(&item).await?;
        Ok(item)
    }

    /// Apply a partial update. An empty patch returns the item unchanged.
    pub async fn update_item(
        &self,
        tenant: &TenantId,
        item_id: ItemId,
        patch: MenuItemPatch,
    ) -> Result<MenuItem, CatalogError> {
        let result = self.try_update(tenant, item_id, patch).await;
        self.observe("update_item", tenant, &result);
        if result.is_ok() {
            info!(tenant = %tenant, item_id = %item_id, "Menu item updated");
        }
        result
    }

    async fn try_update(
        &self,
        tenant: &TenantId,
        item_id: ItemId,
        patch: MenuItemPatch,
    ) -> Result<MenuItem, CatalogError> {
        if patch.is_empty() {
            return self.fetch(tenant, item_id).await;
        }
        let patch = validate_patch(patch)?;
        self.store
            .update(tenant, item_id, patch)
            .await?
            .ok_or(CatalogError::NotFound(item_id))
    }

    pub async fn delete_item(&self, tenant: &TenantId, item_id: ItemId) -> Result<(), CatalogError> {
        let result = match self.store.delete(tenant, item_id).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(CatalogError::NotFound(item_id)),
            Err(e) => Err(e.into()),
        };
        self.observe("delete_item", tenant, &result);
        if result.is_ok() {
            info!(tenant = %tenant, item_id = %item_id, "Menu item deleted");
        }
        result
    }

    pub async fn get_item(&self, tenant: &TenantId, item_id: ItemId) -> Result<MenuItem, CatalogError> {
        debug!(tenant = %tenant, item_id = %item_id, "Loading menu item");
        self.fetch(tenant, item_id).await
    }

    /// The tenant's menu, ordered by category then name.
    pub async fn list_items(&self, tenant: &TenantId) -> Result<Vec<MenuItem>, CatalogError> {
        let items = self.store.list(tenant).await?;
        debug!(tenant = %tenant, count = items.len(), "Listed menu items");
        Ok(items)
    }

    /// Replace the whole catalog with the valid rows of an import.
    ///
    /// Rows are validated independently. Invalid rows are skipped and
    /// reported as warnings; if none survive the catalog is left alone.
    pub async fn bulk_replace(
        &self,
        tenant: &TenantId,
        rows: Vec<RawMenuRow>,
    ) -> Result<BulkReplaceOutcome, CatalogError> {
        let result = self.try_bulk_replace(tenant, rows).await;
        self.observe("bulk_replace", tenant, &result);
        if let Ok(outcome) = &result {
            info!(
                tenant = %tenant,
                imported = outcome.items.len(),
                skipped = outcome.warnings.len(),
                "Menu catalog replaced"
            );
        }
        result
    }

    async fn try_bulk_replace(
        &self,
        tenant: &TenantId,
        rows: Vec<RawMenuRow>,
    ) -> Result<BulkReplaceOutcome, CatalogError> {
        if rows.is_empty() {
            return Err(CatalogError::EmptyImport);
        }

        let mut valid = Vec::with_capacity(rows.len());
        let mut warnings = Vec::new();
        for (index, row) in rows.iter().enumerate() {
            match validate_row(row) {
                Ok(item) => valid.push(item),
                Err(reasons) => warnings.push(RowWarning {
                    row: index + FIRST_DATA_ROW,
                    name: Some(row.name.trim())
                        .filter(|n| !n.is_empty())
                        .map(str::to_string),
                    reasons,
                }),
            }
        }
        self.metrics.record_import_rows(valid.len(), warnings.len());

        if valid.is_empty() {
            return Err(CatalogError::NoValidRows { warnings });
        }

        let items = self.store.replace_all(tenant, valid).await?;
        Ok(BulkReplaceOutcome { items, warnings })
    }

    async fn fetch(&self, tenant: &TenantId, item_id: ItemId) -> Result<MenuItem, CatalogError> {
        self.store
            .get(tenant, item_id)
            .await?
            .ok_or(CatalogError::NotFound(item_id))
    }

    fn observe<T>(&self, operation: &str, tenant: &TenantId, result: &Result<T, CatalogError>) {
        self.metrics.record_catalog_operation(operation, result.is_ok());
        if let Err(e) = result {
            let kind = e.kind();
            if kind.is_recoverable() {
                warn!(tenant = %tenant, operation, kind = %kind, error = %e, "Catalog operation rejected");
            } else {
                error!(tenant = %tenant, operation, error = %e, "Catalog operation failed");
            }
        }
    }
}
