use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::tenant::{ItemId, TenantId};
use super::errors::FieldError;

// ============================================================================
// Catalog Value Objects
// ============================================================================

/// A menu entry owned by exactly one tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: ItemId,
    pub tenant_id: TenantId,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category: String,
    pub portion: Option<String>,
    pub image_url: Option<String>,
    pub image_hint: Option<String>,
}

impl MenuItem {
    /// Materialize a validated item for `tenant` under a fresh id.
    pub fn from_new(tenant: &TenantId, data: NewMenuItem) -> Self {
        Self {
            id: ItemId::new(),
            tenant_id: tenant.clone(),
            name: data.name,
            description: data.description,
            price: data.price,
            category: data.category,
            portion: data.portion,
            image_url: data.image_url,
            image_hint: data.image_hint,
        }
    }
}

/// Input for creating an item. Carries no tenant: ownership always comes from
/// the caller's tenant argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMenuItem {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    pub category: String,
    #[serde(default)]
    pub portion: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_hint: Option<String>,
}

impl NewMenuItem {
    pub fn new(name: impl Into<String>, price: Decimal, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            price,
            category: category.into(),
            portion: None,
            image_url: None,
            image_hint: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_portion(mut self, portion: impl Into<String>) -> Self {
        self.portion = Some(portion.into());
        self
    }
}

/// Partial update. Outer `None` leaves a field untouched; for optional fields
/// `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuItemPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub portion: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub image_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub image_hint: Option<Option<String>>,
}

impl MenuItemPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.portion.is_none()
            && self.image_url.is_none()
            && self.image_hint.is_none()
    }
}

/// Distinguishes an explicit `null` (clear) from an absent key (untouched).
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// One row handed over by the spreadsheet-ingest collaborator. Every cell is
/// raw text; nothing upstream is trusted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMenuRow {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price_text: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub portion: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub image_hint: String,
}

impl RawMenuRow {
    pub fn new(
        name: impl Into<String>,
        price_text: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            price_text: price_text.into(),
            category: category.into(),
            ..Default::default()
        }
    }
}

/// A rejected import row. `row` is the spreadsheet row number, header included,
/// so the first data row is row 2.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowWarning {
    pub row: usize,
    pub name: Option<String>,
    pub reasons: Vec<FieldError>,
}

impl std::fmt::Display for RowWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Row {}", self.row)?;
        if let Some(name) = &self.name {
            write!(f, " (Item: {name})")?;
        }
        let reasons: Vec<String> = self.reasons.iter().map(|r| r.to_string()).collect();
        write!(f, ": {}", reasons.join("; "))
    }
}

/// Successful bulk replace: the new catalog plus the rows that were skipped.
#[derive(Debug, Clone, Serialize)]
pub struct BulkReplaceOutcome {
    pub items: Vec<MenuItem>,
    pub warnings: Vec<RowWarning>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_new_takes_caller_tenant_and_fresh_id() {
        let tenant = TenantId::parse("owner@bistro.test").unwrap();
        let data = NewMenuItem::new("Masala Chai", Decimal::new(350, 2), "Drinks").with_portion("Cup");

        let first = MenuItem::from_new(&tenant, data.clone());
        let second = MenuItem::from_new(&tenant, data);

        assert_eq!(first.tenant_id, tenant);
        assert_eq!(first.portion.as_deref(), Some("Cup"));
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_patch_deserialization_distinguishes_null_from_absent() {
        let patch: MenuItemPatch =
            serde_json::from_str(r#"{"description": null, "price": "5.00"}"#).unwrap();

        assert_eq!(patch.description, Some(None));
        assert_eq!(patch.portion, None);
        assert_eq!(patch.price, Some(Decimal::new(500, 2)));
        assert!(!patch.is_empty());
        assert!(MenuItemPatch::default().is_empty());
    }

    #[test]
    fn test_row_warning_display() {
        let warning = RowWarning {
            row: 3,
            name: Some("Tea".to_string()),
            reasons: vec![FieldError::EmptyCategory],
        };
        assert_eq!(warning.to_string(), "Row 3 (Item: Tea): Category is missing or blank");
    }
}
