use chrono::{DateTime, FixedOffset, NaiveDate, Timelike, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::domain::order::{Order, OrderStatus, OrderType};
use crate::domain::tenant::{ItemId, TenantId};
use crate::error::ErrorKind;
use crate::metrics::Metrics;
use crate::storage::{OrderStore, StorageError};
use super::report::{AnalyticsReport, DailySales, HourlyOrders, ItemSales, OrderTypeCount, StatusCount};
use super::window::{AnalyticsQuery, TimeWindow};

// ============================================================================
// Analytics Aggregator
// ============================================================================
//
// Read-only. Reports are recomputed from the order store on every call; the
// KPI functions below are pure over a slice of orders.
//
// ============================================================================

const TOP_ITEMS: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error("{metric} is too large to represent")]
    Overflow { metric: &'static str },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AnalyticsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalyticsError::Overflow { .. } => ErrorKind::Conflict,
            AnalyticsError::Storage(e) => e.kind(),
        }
    }
}

#[derive(Clone)]
pub struct AnalyticsAggregator {
    orders: Arc<dyn OrderStore>,
    metrics: Arc<Metrics>,
    default_offset: FixedOffset,
}

impl AnalyticsAggregator {
    pub fn new(orders: Arc<dyn OrderStore>, metrics: Arc<Metrics>, default_offset: FixedOffset) -> Self {
        Self {
            orders,
            metrics,
            default_offset,
        }
    }

    /// A query for `window` ending now, in the configured offset.
    pub fn query(&self, window: TimeWindow) -> AnalyticsQuery {
        AnalyticsQuery::new(window, self.default_offset)
    }

    pub async fn report(&self, tenant: &TenantId, query: AnalyticsQuery) -> Result<AnalyticsReport, AnalyticsError> {
        let started = Instant::now();
        let history = self.orders.list_by_tenant(tenant).await?;
        let report = build_report(&history, &query)?;

        let elapsed = started.elapsed().as_secs_f64();
        self.metrics.record_analytics_report(query.window.as_str(), elapsed);
        debug!(
            tenant = %tenant,
            window = %query.window,
            orders = report.total_orders,
            revenue = %report.total_revenue,
            elapsed_ms = elapsed * 1000.0,
            "Analytics report computed"
        );
        Ok(report)
    }
}

/// Every KPI for `query`, given the tenant's full order history.
pub fn build_report(history: &[Order], query: &AnalyticsQuery) -> Result<AnalyticsReport, AnalyticsError> {
    let orders = in_window(history, query);

    Ok(AnalyticsReport {
        window: query.window,
        total_revenue: total_revenue(&orders)?,
        total_orders: orders.len(),
        average_order_value: average_order_value(&orders)?,
        new_customers: new_customers(history, query),
        sales_over_time: sales_over_time(&orders, query.offset)?,
        peak_hours: peak_hours(&orders, query.offset),
        top_selling_items: top_selling_items(&orders)?,
        order_type_distribution: order_type_distribution(&orders),
        status_distribution: status_distribution(&orders),
    })
}

pub fn in_window<'a>(history: &'a [Order], query: &AnalyticsQuery) -> Vec<&'a Order> {
    history
        .iter()
        .filter(|order| query.contains(order.created_at()))
        .collect()
}

fn checked_add(total: Decimal, amount: Decimal, metric: &'static str) -> Result<Decimal, AnalyticsError> {
    total.checked_add(amount).ok_or(AnalyticsError::Overflow { metric })
}

pub fn total_revenue(orders: &[&Order]) -> Result<Decimal, AnalyticsError> {
    orders
        .iter()
        .try_fold(Decimal::ZERO, |total, o| checked_add(total, o.total_cost(), "total revenue"))
}

/// Rounded half away from zero to cents; zero when there are no orders.
pub fn average_order_value(orders: &[&Order]) -> Result<Decimal, AnalyticsError> {
    if orders.is_empty() {
        return Ok(Decimal::ZERO);
    }
    Ok((total_revenue(orders)? / Decimal::from(orders.len()))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

/// Phones seen in the window whose first order ever also falls in the window.
pub fn new_customers(history: &[Order], query: &AnalyticsQuery) -> usize {
    let mut first_seen: HashMap<&str, DateTime<Utc>> = HashMap::new();
    for order in history {
        if let Some(phone) = customer_phone(order) {
            first_seen
                .entry(phone)
                .and_modify(|first| *first = (*first).min(order.created_at()))
                .or_insert(order.created_at());
        }
    }

    let active: std::collections::HashSet<&str> = history
        .iter()
        .filter(|order| query.contains(order.created_at()))
        .filter_map(customer_phone)
        .collect();

    active
        .into_iter()
        .filter(|phone| first_seen.get(phone).is_some_and(|first| query.contains(*first)))
        .count()
}

fn customer_phone(order: &Order) -> Option<&str> {
    order
        .customer()
        .phone()
        .map(str::trim)
        .filter(|p| !p.is_empty())
}

pub fn sales_over_time(orders: &[&Order], offset: FixedOffset) -> Result<Vec<DailySales>, AnalyticsError> {
    let mut by_day: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for order in orders {
        let day = order.created_at().with_timezone(&offset).date_naive();
        let revenue = by_day.entry(day).or_default();
        *revenue = checked_add(*revenue, order.total_cost(), "daily revenue")?;
    }
    Ok(by_day
        .into_iter()
        .map(|(date, revenue)| DailySales { date, revenue })
        .collect())
}

pub fn peak_hours(orders: &[&Order], offset: FixedOffset) -> Vec<HourlyOrders> {
    let mut by_hour: BTreeMap<u32, usize> = BTreeMap::new();
    for order in orders {
        *by_hour.entry(order.created_at().with_timezone(&offset).hour()).or_default() += 1;
    }
    by_hour
        .into_iter()
        .map(|(hour, orders)| HourlyOrders { hour, orders })
        .collect()
}

/// Top items by revenue, ties broken by name. Each item is labelled with the
/// name from its most recent snapshot.
pub fn top_selling_items(orders: &[&Order]) -> Result<Vec<ItemSales>, AnalyticsError> {
    struct Tally<'a> {
        name: &'a str,
        named_at: DateTime<Utc>,
        units: u64,
        revenue: Decimal,
    }

    let mut tallies: HashMap<ItemId, Tally> = HashMap::new();
    for order in orders {
        for item in order.items() {
            let tally = tallies.entry(item.item_id).or_insert(Tally {
                name: &item.name,
                named_at: order.created_at(),
                units: 0,
                revenue: Decimal::ZERO,
            });
            if order.created_at() > tally.named_at {
                tally.name = &item.name;
                tally.named_at = order.created_at();
            }
            tally.units += u64::from(item.quantity);
            let line = item
                .line_total()
                .ok_or(AnalyticsError::Overflow { metric: "item revenue" })?;
            tally.revenue = checked_add(tally.revenue, line, "item revenue")?;
        }
    }

    let mut ranked: Vec<ItemSales> = tallies
        .into_iter()
        .map(|(item_id, tally)| ItemSales {
            item_id,
            name: tally.name.to_string(),
            units_sold: tally.units,
            revenue: tally.revenue,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.revenue
            .cmp(&a.revenue)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.item_id.cmp(&b.item_id))
    });
    ranked.truncate(TOP_ITEMS);
    Ok(ranked)
}

pub fn order_type_distribution(orders: &[&Order]) -> Vec<OrderTypeCount> {
    let mut counts: BTreeMap<OrderType, usize> = BTreeMap::new();
    for order in orders {
        *counts.entry(order.order_type()).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(order_type, count)| OrderTypeCount { order_type, count })
        .collect()
}

pub fn status_distribution(orders: &[&Order]) -> Vec<StatusCount> {
    let mut counts: BTreeMap<OrderStatus, usize> = BTreeMap::new();
    for order in orders {
        *counts.entry(order.status()).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(status, count)| StatusCount { status, count })
        .collect()
}

// ============================================================================
// Unit Tests
// ============================================================================
