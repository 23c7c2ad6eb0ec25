use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashSet;

use crate::domain::tenant::{OrderId, TenantId};
use super::customer::CustomerDetails;
use super::errors::OrderError;
use super::status::OrderStatus;
use super::value_objects::{OrderItem, OrderType};

// ============================================================================
// Order Aggregate - Domain Logic
// ============================================================================
//
// Every way of producing an `Order` goes through `build`, which recomputes
// `total_cost` from the items. Fields are private so nothing can edit the
// total, the items, or the identity behind the aggregate's back.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    // Identity
    id: OrderId,
    tenant_id: TenantId,
    version: i64,

    // Current State
    order_type: OrderType,
    customer: CustomerDetails,
    items: Vec<OrderItem>,
    total_cost: Decimal,
    status: OrderStatus,

    // Audit Trail
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Column-for-column persisted form, used by storage to rebuild an `Order`.
#[derive(Debug, Clone)]
pub struct OrderRecord {
    pub id: OrderId,
    pub tenant_id: TenantId,
    pub version: i64,
    pub order_type: OrderType,
    pub customer: CustomerDetails,
    pub items: Vec<OrderItem>,
    pub total_cost: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Create a new pending order.
    pub fn place(
        tenant_id: TenantId,
        customer: CustomerDetails,
        items: Vec<OrderItem>,
        now: DateTime<Utc>,
    ) -> Result<Self, OrderError> {
        Self::build(
            OrderId::new(),
            tenant_id,
            1,
            customer,
            items,
            OrderStatus::Pending,
            now,
            now,
        )
    }

    /// Replace details and items, keeping identity, creation time and status.
    pub fn revise(
        &self,
        customer: CustomerDetails,
        items: Vec<OrderItem>,
        now: DateTime<Utc>,
    ) -> Result<Self, OrderError> {
        self.ensure_open()?;
        Self::build(
            self.id,
            self.tenant_id.clone(),
            self.version + 1,
            customer,
            items,
            self.status,
            self.created_at,
            now,
        )
    }

    /// Move to a new status. Items and total are carried over untouched.
    pub fn advance(&self, to: OrderStatus, now: DateTime<Utc>) -> Result<Self, OrderError> {
        let status = self.status.transition(to, self.order_type)?;
        Ok(Self {
            status,
            updated_at: now,
            version: self.version + 1,
            ..self.clone()
        })
    }

    /// Rebuild from storage, checking the persisted total against the items.
    pub fn from_record(record: OrderRecord) -> Result<Self, String> {
        if record.order_type != record.customer.order_type() {
            return Err(format!(
                "order type {} does not match customer details for {}",
                record.order_type,
                record.customer.order_type()
            ));
        }
        let stored_total = record.total_cost;
        let order = Self::build(
            record.id,
            record.tenant_id,
            record.version,
            record.customer,
            record.items,
            record.status,
            record.created_at,
            record.updated_at,
        )
        .map_err(|e| e.to_string())?;

        if order.total_cost != stored_total {
            return Err(format!(
                "stored total {} differs from item total {}",
                stored_total, order.total_cost
            ));
        }
        Ok(order)
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        id: OrderId,
        tenant_id: TenantId,
        version: i64,
        customer: CustomerDetails,
        items: Vec<OrderItem>,
        status: OrderStatus,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, OrderError> {
        validate_items(&items)?;
        let total_cost = total_of(&items)?;
        Ok(Self {
            id,
            tenant_id,
            version,
            order_type: customer.order_type(),
            customer,
            total_cost,
            items,
            status,
            created_at,
            updated_at,
        })
    }

    pub fn ensure_open(&self) -> Result<(), OrderError> {
        if self.status.is_terminal() {
            return Err(OrderError::Terminal(self.status));
        }
        Ok(())
    }

    pub fn is_owned_by(&self, tenant: &TenantId) -> bool {
        &self.tenant_id == tenant
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    pub fn customer(&self) -> &CustomerDetails {
        &self.customer
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn total_cost(&self) -> Decimal {
        self.total_cost
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

fn validate_items(items: &[OrderItem]) -> Result<(), OrderError> {
    if items.is_empty() {
        return Err(OrderError::EmptyItems);
    }

    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if item.quantity == 0 {
            return Err(OrderError::InvalidQuantity(item.item_id));
        }
        if !seen.insert(item.item_id) {
            return Err(OrderError::DuplicateItem(item.item_id));
        }
    }

    Ok(())
}

fn total_of(items: &[OrderItem]) -> Result<Decimal, OrderError> {
    items.iter().try_fold(Decimal::ZERO, |total, item| {
        item.line_total()
            .and_then(|line| total.checked_add(line))
            .ok_or(OrderError::TotalOverflow)
    })
}

// ============================================================================
// Unit Tests
// ============================================================================
