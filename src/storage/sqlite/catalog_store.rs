use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::catalog::{MenuItem, MenuItemPatch, NewMenuItem};
use crate::domain::tenant::{ItemId, TenantId};
use crate::storage::{CatalogStore, StorageError, StorageResult};

// ============================================================================
// SQLite Catalog Store
// ============================================================================

const COLUMNS: &str =
    "id, tenant_id, name, description, price, category, portion, image_url, image_hint";

#[derive(Clone)]
pub struct SqliteCatalogStore {
    pool: SqlitePool,
}

impl SqliteCatalogStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MenuItemRow {
    id: String,
    tenant_id: String,
    name: String,
    description: Option<String>,
    price: String,
    category: String,
    portion: Option<String>,
    image_url: Option<String>,
    image_hint: Option<String>,
}

impl MenuItemRow {
    fn into_item(self) -> StorageResult<MenuItem> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| StorageError::corrupt("menu_items", format!("id '{}': {e}", self.id)))?;
        let tenant_id = TenantId::parse(&self.tenant_id)
            .ok_or_else(|| StorageError::corrupt("menu_items", "blank tenant_id"))?;
        let price = Decimal::from_str(&self.price)
            .map_err(|e| StorageError::corrupt("menu_items", format!("price '{}': {e}", self.price)))?;

        Ok(MenuItem {
            id: ItemId(id),
            tenant_id,
            name: self.name,
            description: self.description,
            price,
            category: self.category,
            portion: self.portion,
            image_url: self.image_url,
            image_hint: self.image_hint,
        })
    }
}

async fn insert_item(conn: &mut SqliteConnection, item: &MenuItem) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO menu_items (id, tenant_id, name, description, price, category, portion, image_url, image_hint)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(item.id.to_string())
    .bind(item.tenant_id.as_str())
    .bind(item.name.as_str())
    .bind(item.description.as_deref())
    .bind(item.price.to_string())
    .bind(item.category.as_str())
    .bind(item.portion.as_deref())
    .bind(item.image_url.as_deref())
    .bind(item.image_hint.as_deref())
    .execute(conn)
    .await?;
    Ok(())
}

async fn write_catalog(
    conn: &mut SqliteConnection,
    tenant: &TenantId,
    items: &[MenuItem],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM menu_items WHERE tenant_id = ?")
        .bind(tenant.as_str())
        .execute(&mut *conn)
        .await?;
    for item in items {
        insert_item(&mut *conn, item).await?;
    }
    Ok(())
}

#[async_trait]
impl CatalogStore for SqliteCatalogStore {
    async fn get(&self, tenant: &TenantId, item_id: ItemId) -> StorageResult<Option<MenuItem>> {
        let row = sqlx::query_as::<_, MenuItemRow>(&format!(
            "SELECT {COLUMNS} FROM menu_items WHERE id = ? AND tenant_id = ?"
        ))
        .bind(item_id.to_string())
        .bind(tenant.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(MenuItemRow::into_item).transpose()
    }

    async fn list(&self, tenant: &TenantId) -> StorageResult<Vec<MenuItem>> {
        let rows = sqlx::query_as::<_, MenuItemRow>(&format!(
            "SELECT {COLUMNS} FROM menu_items WHERE tenant_id = ?
             ORDER BY lower(category), lower(name), id"
        ))
        .bind(tenant.as_str())
        .fetch_all(&self.pool)
        .await?;

        // SQLite's lower() folds ASCII only.
        let mut items = rows
            .into_iter()
            .map(MenuItemRow::into_item)
            .collect::<StorageResult<Vec<_>>>()?;
        items.sort_by_cached_key(|item| (item.category.to_lowercase(), item.name.to_lowercase(), item.id));
        Ok(items)
    }

    async fn insert(&self, item: &MenuItem) -> StorageResult<()> {
        let mut conn = self.pool.acquire().await?;
        insert_item(&mut conn, item).await?;
        Ok(())
    }

    async fn update(
        &self,
        tenant: &TenantId,
        item_id: ItemId,
        patch: MenuItemPatch,
    ) -> StorageResult<Option<MenuItem>> {
        if patch.is_empty() {
            return self.get(tenant, item_id).await;
        }

        // Only present fields appear in the SET list; one statement, so the
        // read-back is the row as written.
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE menu_items SET ");
        let mut set = builder.separated(", ");
        if let Some(name) = patch.name {
            set.push("name = ").push_bind_unseparated(name);
        }
        if let Some(description) = patch.description {
            set.push("description = ").push_bind_unseparated(description);
        }
        if let Some(price) = patch.price {
            set.push("price = ").push_bind_unseparated(price.to_string());
        }
        if let Some(category) = patch.category {
            set.push("category = ").push_bind_unseparated(category);
        }
        if let Some(portion) = patch.portion {
            set.push("portion = ").push_bind_unseparated(portion);
        }
        if let Some(image_url) = patch.image_url {
            set.push("image_url = ").push_bind_unseparated(image_url);
        }
        if let Some(image_hint) = patch.image_hint {
            set.push("image_hint = ").push_bind_unseparated(image_hint);
        }
        builder
            .push(" WHERE id = ")
            .push_bind(item_id.to_string())
            .push(" AND tenant_id = ")
            .push_bind(tenant.as_str().to_string())
            .push(format!(" RETURNING {COLUMNS}"));

        let row = builder
            .build_query_as::<MenuItemRow>()
            .fetch_optional(&self.pool)
            .await?;

        row.map(MenuItemRow::into_item).transpose()
    }

    async fn delete(&self, tenant: &TenantId, item_id: ItemId) -> StorageResult<bool> {
        let result = sqlx::query("DELETE FROM menu_items WHERE id = ? AND tenant_id = ?")
            .bind(item_id.to_string())
            .bind(tenant.as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn replace_all(
        &self,
        tenant: &TenantId,
        items: Vec<NewMenuItem>,
    ) -> StorageResult<Vec<MenuItem>> {
        let items: Vec<MenuItem> = items
            .into_iter()
            .map(|data| MenuItem::from_new(tenant, data))
            .collect();

        let mut tx = self.pool.begin().await?;
        if let Err(e) = write_catalog(&mut tx, tenant, &items).await {
            if let Err(rollback) = tx.rollback().await {
                tracing::error!(tenant = %tenant, error = %rollback, "Catalog rollback failed");
            }
            tracing::error!(tenant = %tenant, error = %e, "Catalog replacement aborted");
            return Err(e.into());
        }
        tx.commit().await?;

        tracing::debug!(tenant = %tenant, count = items.len(), "Catalog rows replaced");
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sqlite::{connect, DbConfig};

    async fn store() -> SqliteCatalogStore {
        let pool = connect(&DbConfig::in_memory()).await.unwrap();
        SqliteCatalogStore::new(pool)
    }

    fn tenant(raw: &str) -> TenantId {
        TenantId::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get_round_trip() {
        let store = store().await;
        let owner = tenant("owner@dosa.test");
        let item = MenuItem::from_new(
            &owner,
            NewMenuItem::new("Masala Dosa", Decimal::new(899, 2), "Mains").with_portion("Plate"),
        );

        store.insert(&item).await.unwrap();

        assert_eq!(store.get(&owner, item.id).await.unwrap(), Some(item));
    }

    #[tokio::test]
    async fn test_list_orders_by_category_then_name_case_insensitive() {
        let store = store().await;
        let owner = tenant("owner@dosa.test");
        for (name, category) in [("samosa", "Starters"), ("Lassi", "drinks"), ("Chai", "Drinks")] {
            let item = MenuItem::from_new(&owner, NewMenuItem::new(name, Decimal::ONE, category));
            store.insert(&item).await.unwrap();
        }

        let names: Vec<String> = store
            .list(&owner)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Chai", "Lassi", "samosa"]);
    }

    #[tokio::test]
    async fn test_list_folds_case_beyond_ascii() {
        let store = store().await;
        let owner = tenant("owner@patisserie.test");
        for (name, category) in [("éclair", "Desserts"), ("Zucchini", "Desserts"), ("Élan", "desserts")] {
            let item = MenuItem::from_new(&owner, NewMenuItem::new(name, Decimal::ONE, category));
            store.insert(&item).await.unwrap();
        }

        let names: Vec<String> = store
            .list(&owner)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Zucchini", "éclair", "Élan"]);
    }

    #[tokio::test]
    async fn test_update_writes_only_present_fields() {
        let store = store().await;
        let owner = tenant("owner@dosa.test");
        let item = MenuItem::from_new(
            &owner,
            NewMenuItem::new("Idli", Decimal::new(450, 2), "Breakfast").with_description("Steamed"),
        );
        store.insert(&item).await.unwrap();

        let updated = store
            .update(
                &owner,
                item.id,
                MenuItemPatch {
                    price: Some(Decimal::new(500, 2)),
                    description: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.price, Decimal::from(5));
        assert_eq!(updated.description, None);
        assert_eq!(updated.name, "Idli");
        assert_eq!(updated.category, "Breakfast");
    }

    #[tokio::test]
    async fn test_foreign_tenant_sees_nothing() {
        let store = store().await;
        let owner = tenant("owner@dosa.test");
        let other = tenant("owner@pizza.test");
        let item = MenuItem::from_new(&owner, NewMenuItem::new("Vada", Decimal::ONE, "Snacks"));
        store.insert(&item).await.unwrap();

        assert_eq!(store.get(&other, item.id).await.unwrap(), None);
        let patch = MenuItemPatch {
            name: Some("Hijacked".to_string()),
            ..Default::default()
        };
        assert_eq!(store.update(&other, item.id, patch).await.unwrap(), None);
        assert!(!store.delete(&other, item.id).await.unwrap());
        assert_eq!(store.get(&owner, item.id).await.unwrap().unwrap().name, "Vada");
    }

    #[tokio::test]
    async fn test_replace_all_only_touches_the_given_tenant() {
        let store = store().await;
        let owner = tenant("owner@dosa.test");
        let other = tenant("owner@pizza.test");
        store
            .insert(&MenuItem::from_new(&other, NewMenuItem::new("Margherita", Decimal::TEN, "Pizza")))
            .await
            .unwrap();
        store
            .insert(&MenuItem::from_new(&owner, NewMenuItem::new("Old", Decimal::ONE, "Mains")))
            .await
            .unwrap();

        let replaced = store
            .replace_all(&owner, vec![NewMenuItem::new("Uttapam", Decimal::TWO, "Mains")])
            .await
            .unwrap();

        assert_eq!(replaced.len(), 1);
        assert!(replaced.iter().all(|i| i.tenant_id == owner));
        assert_eq!(store.list(&owner).await.unwrap(), replaced);
        assert_eq!(store.list(&other).await.unwrap().len(), 1);
    }
}
