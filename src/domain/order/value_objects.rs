use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::catalog::MenuItem;
use crate::domain::tenant::ItemId;

// ============================================================================
// Order Value Objects
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderType {
    Delivery,
    DineIn,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Delivery => "delivery",
            OrderType::DineIn => "dine-in",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "delivery" => Ok(OrderType::Delivery),
            "dine-in" => Ok(OrderType::DineIn),
            other => Err(format!("unknown order type '{other}'")),
        }
    }
}

/// Menu data frozen into an order at the moment the item was added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub item_id: ItemId,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category: String,
    pub portion: Option<String>,
    pub image_url: Option<String>,
    pub image_hint: Option<String>,
    pub quantity: u32,
}

impl OrderItem {
    pub fn snapshot(item: &MenuItem, quantity: u32) -> Self {
        Self {
            item_id: item.id,
            name: item.name.clone(),
            description: item.description.clone(),
            price: item.price,
            category: item.category.clone(),
            portion: item.portion.clone(),
            image_url: item.image_url.clone(),
            image_hint: item.image_hint.clone(),
            quantity,
        }
    }

    /// `None` when price times quantity does not fit in a `Decimal`.
    pub fn line_total(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}

/// A reference to a catalog item with the wanted quantity, before snapshotting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub item_id: ItemId,
    pub quantity: u32,
}

impl CartLine {
    pub fn new(item_id: ItemId, quantity: u32) -> Self {
        Self { item_id, quantity }
    }
}
