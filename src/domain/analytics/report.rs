use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::order::{OrderStatus, OrderType};
use crate::domain::tenant::ItemId;
use super::window::TimeWindow;

// ============================================================================
// Analytics Report Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    pub window: TimeWindow,
    pub total_revenue: Decimal,
    pub total_orders: usize,
    pub average_order_value: Decimal,
    pub new_customers: usize,
    pub sales_over_time: Vec<DailySales>,
    pub peak_hours: Vec<HourlyOrders>,
    pub top_selling_items: Vec<ItemSales>,
    pub order_type_distribution: Vec<OrderTypeCount>,
    pub status_distribution: Vec<StatusCount>,
}

/// Revenue for one tenant-local calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySales {
    pub date: NaiveDate,
    pub revenue: Decimal,
}

/// Orders placed during one tenant-local hour of the day (0-23).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourlyOrders {
    pub hour: u32,
    pub orders: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemSales {
    pub item_id: ItemId,
    pub name: String,
    pub units_sold: u64,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderTypeCount {
    pub order_type: OrderType,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: usize,
}
