use serde::{Deserialize, Serialize};

use crate::domain::tenant::ItemId;
use super::value_objects::CartLine;

// ============================================================================
// Cart - Pre-submission Staging
// ============================================================================
//
// Purely in-memory. Nothing here touches storage; the lines only become an
// order through `OrderLifecycle::submit` or `OrderLifecycle::edit`.
//
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from loose lines, merging repeated items.
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut cart = Self::new();
        for line in lines {
            cart.add_item(line.item_id, line.quantity);
        }
        cart
    }

    /// Adding an item already in the cart raises its quantity.
    pub fn add_item(&mut self, item_id: ItemId, quantity: u32) {
        if quantity == 0 {
            return;
        }
        match self.lines.iter_mut().find(|l| l.item_id == item_id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.lines.push(CartLine::new(item_id, quantity)),
        }
    }

    /// Set an existing line's quantity. Zero or less removes the line.
    pub fn update_quantity(&mut self, item_id: ItemId, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(item_id);
            return;
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(line) = self.lines.iter_mut().find(|l| l.item_id == item_id) {
            line.quantity = quantity;
        }
    }

    pub fn remove_item(&mut self, item_id: ItemId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.item_id != item_id);
        self.lines.len() != before
    }

    pub fn quantity_of(&self, item_id: ItemId) -> u32 {
        self.lines
            .iter()
            .find(|l| l.item_id == item_id)
            .map(|l| l.quantity)
            .unwrap_or(0)
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<CartLine> {
        self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
