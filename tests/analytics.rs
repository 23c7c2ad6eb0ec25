mod common;

use chrono::{Duration, FixedOffset, SubsecRound, Utc};
use common::{tenant, Harness};
use dineflow::domain::catalog::NewMenuItem;
use dineflow::domain::order::{CartLine, CustomerInput, OrderStatus, OrderType};
use dineflow::{AnalyticsQuery, TimeWindow};
use rust_decimal::Decimal;

#[tokio::test]
async fn test_report_reflects_stored_orders() {
    let h = Harness::in_memory().await;
    let owner = tenant("owner@pavbhaji.test");
    let rival = tenant("owner@ramen.test");
    let bhaji = h
        .catalog
        .add_item(&owner, NewMenuItem::new("Pav Bhaji", Decimal::from(120), "Street"))
        .await
        .unwrap();
    let vada = h
        .catalog
        .add_item(&owner, NewMenuItem::new("Vada Pav", Decimal::from(40), "Street"))
        .await
        .unwrap();
    let ramen = h
        .catalog
        .add_item(&rival, NewMenuItem::new("Shoyu", Decimal::from(500), "Noodles"))
        .await
        .unwrap();

    h.lifecycle
        .submit(
            &owner,
            OrderType::Delivery,
            CustomerInput::delivery("+15550150", "Tower E", "9"),
            vec![CartLine::new(bhaji.id, 2), CartLine::new(vada.id, 1)],
        )
        .await
        .unwrap();
    let dine_in = h
        .lifecycle
        .submit(&owner, OrderType::DineIn, CustomerInput::dine_in("6"), vec![CartLine::new(vada.id, 3)])
        .await
        .unwrap();
    h.lifecycle
        .transition_status(&owner, dine_in.id(), OrderStatus::Cancelled)
        .await
        .unwrap();
    h.lifecycle
        .submit(&rival, OrderType::DineIn, CustomerInput::dine_in("1"), vec![CartLine::new(ramen.id, 1)])
        .await
        .unwrap();

    let query = h.analytics.query(TimeWindow::Last7Days);
    let report = h.analytics.report(&owner, query).await.unwrap();

    assert_eq!(report.total_orders, 2);
    assert_eq!(report.total_revenue, Decimal::from(400));
    assert_eq!(report.average_order_value, Decimal::from(200));
    assert_eq!(report.new_customers, 1);
    assert_eq!(report.sales_over_time.iter().map(|d| d.revenue).sum::<Decimal>(), Decimal::from(400));
    assert_eq!(report.peak_hours.iter().map(|h| h.orders).sum::<usize>(), 2);
    assert_eq!(report.top_selling_items[0].name, "Pav Bhaji");
    assert_eq!(report.top_selling_items[1].units_sold, 4);
    assert_eq!(report.order_type_distribution.len(), 2);
    assert_eq!(report.status_distribution.len(), 2);

    let histogram = h.metrics.analytics_duration.with_label_values(&["last_7_days"]);
    assert_eq!(histogram.get_sample_count(), 1);
}

#[tokio::test]
async fn test_report_window_excludes_future_and_old_orders() {
    let h = Harness::in_memory().await;
    let owner = tenant("owner@pavbhaji.test");
    let bhaji = h
        .catalog
        .add_item(&owner, NewMenuItem::new("Pav Bhaji", Decimal::from(120), "Street"))
        .await
        .unwrap();
    h.lifecycle
        .submit(&owner, OrderType::DineIn, CustomerInput::dine_in("2"), vec![CartLine::new(bhaji.id, 1)])
        .await
        .unwrap();

    let utc = FixedOffset::east_opt(0).unwrap();
    let now = Utc::now().trunc_subsecs(3);

    let before_any = AnalyticsQuery::new(TimeWindow::AllTime, utc).at(now - Duration::days(1));
    let report = h.analytics.report(&owner, before_any).await.unwrap();
    assert_eq!(report.total_orders, 0);

    let month_later = AnalyticsQuery::new(TimeWindow::Last30Days, utc).at(now + Duration::days(31));
    let report = h.analytics.report(&owner, month_later).await.unwrap();
    assert_eq!(report.total_orders, 0);

    let all_time = AnalyticsQuery::new(TimeWindow::AllTime, utc).at(now + Duration::days(365));
    let report = h.analytics.report(&owner, all_time).await.unwrap();
    assert_eq!(report.total_orders, 1);
}
