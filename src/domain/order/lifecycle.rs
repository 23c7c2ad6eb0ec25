use chrono::{DateTime, SubsecRound, Utc};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::domain::tenant::{OrderId, TenantId};
use crate::metrics::Metrics;
use crate::storage::{CatalogStore, OrderStore};
use super::aggregate::Order;
use super::cart::Cart;
use super::customer::{CustomerDetails, CustomerInput};
use super::errors::OrderError;
use super::status::OrderStatus;
use super::value_objects::{CartLine, OrderItem, OrderType};

// ============================================================================
// Order Lifecycle
// ============================================================================
//
// Orchestrates: Input → Catalog snapshot → Order aggregate → Order store
//
// Every cart line is re-read from the catalog by id and tenant right before
// it is frozen into the order, so client-held menu data is never trusted.
//
// ============================================================================

/// Changes requested by an edit. Absent fields keep the order's current value.
#[derive(Debug, Clone, Default)]
pub struct OrderRevision {
    pub order_type: Option<OrderType>,
    pub customer: Option<CustomerInput>,
    pub cart: Option<Vec<CartLine>>,
}

#[derive(Clone)]
pub struct OrderLifecycle {
    catalog: Arc<dyn CatalogStore>,
    orders: Arc<dyn OrderStore>,
    metrics: Arc<Metrics>,
}

impl OrderLifecycle {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        orders: Arc<dyn OrderStore>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            catalog,
            orders,
            metrics,
        }
    }

    /// Validate and persist a new pending order.
    pub async fn submit(
        &self,
        tenant: &TenantId,
        order_type: OrderType,
        customer: CustomerInput,
        lines: Vec<CartLine>,
    ) -> Result<Order, OrderError> {
        let result = self.try_submit(tenant, order_type, customer, lines).await;
        match &result {
            Ok(order) => {
                self.metrics.record_order_submitted(order_type.as_str());
                info!(
                    tenant = %tenant,
                    order_id = %order.id(),
                    order_type = %order_type,
                    items = order.items().len(),
                    total = %order.total_cost(),
                    "Order submitted"
                );
            }
            Err(e) => self.record_failure("submit", tenant, e),
        }
        result
    }

    async fn try_submit(
        &self,
        tenant: &TenantId,
        order_type: OrderType,
        customer: CustomerInput,
        lines: Vec<CartLine>,
    ) -> Result<Order, OrderError> {
        let customer = CustomerDetails::from_input(order_type, customer)?;
        let items = self.snapshot_lines(tenant, lines).await?;
        let order = Order::place(tenant.clone(), customer, items, now())?;
        self.orders.upsert(&order).await?;
        Ok(order)
    }

    /// Revise an open order in place. Status, id and creation time are kept.
    pub async fn edit(
        &self,
        tenant: &TenantId,
        order_id: OrderId,
        revision: OrderRevision,
    ) -> Result<Order, OrderError> {
        let result = self.try_edit(tenant, order_id, revision).await;
        match &result {
            Ok(order) => info!(
                tenant = %tenant,
                order_id = %order_id,
                version = order.version(),
                total = %order.total_cost(),
                "Order edited"
            ),
            Err(e) => self.record_failure("edit", tenant, e),
        }
        result
    }

    async fn try_edit(
        &self,
        tenant: &TenantId,
        order_id: OrderId,
        revision: OrderRevision,
    ) -> Result<Order, OrderError> {
        let current = self.load_owned(tenant, order_id).await?;
        current.ensure_open()?;

        let order_type = revision.order_type.unwrap_or(current.order_type());
        let customer_input = revision
            .customer
            .unwrap_or_else(|| current.customer().to_input());
        let customer = CustomerDetails::from_input(order_type, customer_input)?;

        let items = match revision.cart {
            Some(lines) => self.snapshot_lines(tenant, lines).await?,
            None => current.items().to_vec(),
        };

        let revised = current.revise(customer, items, now())?;
        self.orders.upsert(&revised).await?;
        Ok(revised)
    }

    /// Move an order to `status` if the transition table allows it.
    pub async fn transition_status(
        &self,
        tenant: &TenantId,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, OrderError> {
        let result = self.try_transition(tenant, order_id, status).await;
        match &result {
            Ok(_) => {
                self.metrics.record_status_transition(status.as_str());
                info!(tenant = %tenant, order_id = %order_id, status = %status, "Order status changed");
            }
            Err(e) => self.record_failure("transition_status", tenant, e),
        }
        result
    }

    async fn try_transition(
        &self,
        tenant: &TenantId,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, OrderError> {
        let current = self.load_owned(tenant, order_id).await?;
        let next = current.advance(status, now())?;
        self.orders.upsert(&next).await?;
        Ok(next)
    }

    pub async fn get_order(&self, tenant: &TenantId, order_id: OrderId) -> Result<Order, OrderError> {
        debug!(tenant = %tenant, order_id = %order_id, "Loading order");
        self.load_owned(tenant, order_id).await
    }

    /// Order history, newest first.
    pub async fn list_orders(&self, tenant: &TenantId) -> Result<Vec<Order>, OrderError> {
        let orders = self.orders.list_by_tenant(tenant).await?;
        debug!(tenant = %tenant, count = orders.len(), "Listed orders");
        Ok(orders)
    }

    async fn load_owned(&self, tenant: &TenantId, order_id: OrderId) -> Result<Order, OrderError> {
        match self.orders.get(order_id).await? {
            Some(order) if order.is_owned_by(tenant) => Ok(order),
            _ => Err(OrderError::NotFound(order_id)),
        }
    }

    /// Merge repeated lines, then freeze each one from the live catalog.
    async fn snapshot_lines(
        &self,
        tenant: &TenantId,
        lines: Vec<CartLine>,
    ) -> Result<Vec<OrderItem>, OrderError> {
        if lines.is_empty() {
            return Err(OrderError::EmptyItems);
        }
        if let Some(line) = lines.iter().find(|l| l.quantity == 0) {
            return Err(OrderError::InvalidQuantity(line.item_id));
        }

        let cart = Cart::from_lines(lines);
        let mut items = Vec::with_capacity(cart.lines().len());
        for line in cart.into_lines() {
            let menu_item = self
                .catalog
                .get(tenant, line.item_id)
                .await?
                .ok_or(OrderError::StaleCart(line.item_id))?;
            items.push(OrderItem::snapshot(&menu_item, line.quantity));
        }
        Ok(items)
    }

    fn record_failure(&self, operation: &str, tenant: &TenantId, e: &OrderError) {
        let kind = e.kind();
        self.metrics.record_order_failure(operation, kind.as_str());
        if kind.is_recoverable() {
            warn!(tenant = %tenant, operation, kind = %kind, error = %e, "Order operation rejected");
        } else {
            error!(tenant = %tenant, operation, error = %e, "Order operation failed");
        }
    }
}

/// Orders are persisted at millisecond precision.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}
