mod common;

use common::{tenant, Harness};
use dineflow::domain::catalog::{CatalogError, FieldError, MenuItemPatch, NewMenuItem, RawMenuRow};
use dineflow::{ErrorKind, ItemId};
use futures_util::future::join_all;
use rust_decimal::Decimal;

#[tokio::test]
async fn test_add_item_with_zero_price_is_rejected() {
    let h = Harness::in_memory().await;
    let owner = tenant("owner@teahouse.test");

    let err = h
        .catalog
        .add_item(&owner, NewMenuItem::new("Tea", Decimal::ZERO, "Drinks"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(matches!(err, CatalogError::Validation(FieldError::NonPositivePrice(_))));
    assert!(h.catalog.list_items(&owner).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_add_item_trims_and_drops_blank_optionals() {
    let h = Harness::in_memory().await;
    let owner = tenant("owner@teahouse.test");

    let item = h
        .catalog
        .add_item(
            &owner,
            NewMenuItem::new("  Green Tea ", Decimal::new(250, 2), " Drinks ")
                .with_description("   ")
                .with_portion(" Pot "),
        )
        .await
        .unwrap();

    assert_eq!(item.name, "Green Tea");
    assert_eq!(item.category, "Drinks");
    assert_eq!(item.description, None);
    assert_eq!(item.portion.as_deref(), Some("Pot"));
    assert_eq!(h.catalog.get_item(&owner, item.id).await.unwrap(), item);
}

#[tokio::test]
async fn test_update_validates_only_present_fields() {
    let h = Harness::in_memory().await;
    let owner = tenant("owner@teahouse.test");
    let item = h
        .catalog
        .add_item(&owner, NewMenuItem::new("Oolong", Decimal::from(4), "Drinks"))
        .await
        .unwrap();

    let renamed = h
        .catalog
        .update_item(
            &owner,
            item.id,
            MenuItemPatch {
                name: Some(" Milk Oolong ".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Milk Oolong");
    assert_eq!(renamed.price, Decimal::from(4));

    let err = h
        .catalog
        .update_item(
            &owner,
            item.id,
            MenuItemPatch {
                category: Some("   ".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Validation(FieldError::EmptyCategory)));

    let unchanged = h
        .catalog
        .update_item(&owner, item.id, MenuItemPatch::default())
        .await
        .unwrap();
    assert_eq!(unchanged, renamed);
}

#[tokio::test]
async fn test_other_tenant_cannot_touch_item() {
    let h = Harness::in_memory().await;
    let owner = tenant("owner@teahouse.test");
    let intruder = tenant("owner@coffee.test");
    let item = h
        .catalog
        .add_item(&owner, NewMenuItem::new("Sencha", Decimal::from(5), "Drinks"))
        .await
        .unwrap();

    let get = h.catalog.get_item(&intruder, item.id).await.unwrap_err();
    let update = h
        .catalog
        .update_item(
            &intruder,
            item.id,
            MenuItemPatch {
                price: Some(Decimal::ONE),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    let delete = h.catalog.delete_item(&intruder, item.id).await.unwrap_err();

    for err in [&get, &update, &delete] {
        assert!(matches!(err, CatalogError::NotFound(id) if *id == item.id));
    }
    // Same message as for an id that never existed.
    let missing = h.catalog.get_item(&intruder, ItemId::new()).await.unwrap_err();
    assert_eq!(missing.kind(), get.kind());

    assert_eq!(h.catalog.get_item(&owner, item.id).await.unwrap().price, Decimal::from(5));
}

#[tokio::test]
async fn test_delete_item_then_not_found() {
    let h = Harness::in_memory().await;
    let owner = tenant("owner@teahouse.test");
    let item = h
        .catalog
        .add_item(&owner, NewMenuItem::new("Matcha", Decimal::from(6), "Drinks"))
        .await
        .unwrap();

    h.catalog.delete_item(&owner, item.id).await.unwrap();

    let err = h.catalog.delete_item(&owner, item.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_bulk_replace_keeps_valid_rows_and_warns_on_the_rest() {
    let h = Harness::in_memory().await;
    let owner = tenant("owner@teahouse.test");
    h.catalog
        .add_item(&owner, NewMenuItem::new("Old Item", Decimal::ONE, "Legacy"))
        .await
        .unwrap();

    let outcome = h
        .catalog
        .bulk_replace(
            &owner,
            vec![RawMenuRow::new("A", "10", "C"), RawMenuRow::new("", "10", "C")],
        )
        .await
        .unwrap();

    assert_eq!(outcome.items.len(), 1);
    assert_eq!(outcome.items[0].name, "A");
    assert_eq!(outcome.warnings.len(), 1);
    assert_eq!(outcome.warnings[0].row, 3);
    assert_eq!(outcome.warnings[0].reasons, vec![FieldError::EmptyName]);

    let menu = h.catalog.list_items(&owner).await.unwrap();
    assert_eq!(menu.len(), 1);
    assert_eq!(menu[0].name, "A");
}

#[tokio::test]
async fn test_bulk_replace_collects_every_reason_for_a_row() {
    let h = Harness::in_memory().await;
    let owner = tenant("owner@teahouse.test");

    let outcome = h
        .catalog
        .bulk_replace(
            &owner,
            vec![RawMenuRow::new("Chai", "free", ""), RawMenuRow::new("Lassi", "3.5", "Drinks")],
        )
        .await
        .unwrap();

    let warning = &outcome.warnings[0];
    assert_eq!(warning.row, 2);
    assert_eq!(warning.name.as_deref(), Some("Chai"));
    assert_eq!(
        warning.reasons,
        vec![
            FieldError::UnparseablePrice("free".to_string()),
            FieldError::EmptyCategory
        ]
    );
}

#[tokio::test]
async fn test_bulk_replace_without_valid_rows_leaves_catalog_alone() {
    let h = Harness::in_memory().await;
    let owner = tenant("owner@teahouse.test");
    let kept = h
        .catalog
        .add_item(&owner, NewMenuItem::new("Assam", Decimal::from(3), "Drinks"))
        .await
        .unwrap();

    let err = h
        .catalog
        .bulk_replace(&owner, vec![RawMenuRow::new("", "-1", "Drinks")])
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoValidRows);
    match err {
        CatalogError::NoValidRows { warnings } => assert_eq!(warnings.len(), 1),
        other => panic!("unexpected error: {other}"),
    }

    let empty = h.catalog.bulk_replace(&owner, vec![]).await.unwrap_err();
    assert!(matches!(empty, CatalogError::EmptyImport));

    assert_eq!(h.catalog.list_items(&owner).await.unwrap(), vec![kept]);
}

#[tokio::test]
async fn test_prices_above_the_maximum_are_rejected() {
    let h = Harness::in_memory().await;
    let owner = tenant("owner@goldleaf.test");

    let err = h
        .catalog
        .add_item(&owner, NewMenuItem::new("Gold Biryani", Decimal::MAX, "Luxury"))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Validation(FieldError::PriceTooLarge(_))));

    let outcome = h
        .catalog
        .bulk_replace(
            &owner,
            vec![
                RawMenuRow::new("Gold", "1e28", "Luxury"),
                RawMenuRow::new("Saffron Kheer", "450", "Desserts"),
            ],
        )
        .await
        .unwrap();
    assert_eq!(outcome.items.len(), 1);
    assert_eq!(outcome.items[0].name, "Saffron Kheer");
    assert_eq!(outcome.warnings[0].row, 2);
    assert!(matches!(outcome.warnings[0].reasons[..], [FieldError::PriceTooLarge(_)]));
}

#[tokio::test]
async fn test_bulk_replace_rolls_back_on_storage_fault() {
    let h = Harness::in_memory().await;
    let owner = tenant("owner@teahouse.test");
    let before = vec![
        h.catalog
            .add_item(&owner, NewMenuItem::new("Darjeeling", Decimal::from(4), "Drinks"))
            .await
            .unwrap(),
        h.catalog
            .add_item(&owner, NewMenuItem::new("Samosa", Decimal::from(2), "Snacks"))
            .await
            .unwrap(),
    ];
    h.poison_menu_item("Poison").await;

    let err = h
        .catalog
        .bulk_replace(
            &owner,
            vec![
                RawMenuRow::new("Fresh", "1", "Drinks"),
                RawMenuRow::new("Poison", "1", "Drinks"),
                RawMenuRow::new("Never", "1", "Drinks"),
            ],
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Storage);
    assert_eq!(h.catalog.list_items(&owner).await.unwrap(), before);
}

#[tokio::test]
async fn test_bulk_replace_does_not_affect_other_tenants() {
    let h = Harness::in_memory().await;
    let owner = tenant("owner@teahouse.test");
    let neighbour = tenant("owner@bakery.test");
    let croissant = h
        .catalog
        .add_item(&neighbour, NewMenuItem::new("Croissant", Decimal::from(3), "Pastry"))
        .await
        .unwrap();

    h.catalog
        .bulk_replace(&owner, vec![RawMenuRow::new("Chai", "2", "Drinks")])
        .await
        .unwrap();

    assert_eq!(h.catalog.list_items(&neighbour).await.unwrap(), vec![croissant]);
}

#[tokio::test]
async fn test_concurrent_bulk_replaces_never_interleave() {
    let dir = tempfile::tempdir().unwrap();
    let h = Harness::on_disk(dir.path()).await;
    let owner = tenant("owner@teahouse.test");
    let neighbour = tenant("owner@bakery.test");

    // Each import has a distinct size so a mix of two would be visible.
    let imports: Vec<Vec<RawMenuRow>> = (1..=6)
        .map(|n| {
            (0..n)
                .map(|i| RawMenuRow::new(format!("Batch {n} item {i}"), "1", "Drinks"))
                .collect()
        })
        .collect();

    let same_tenant = imports
        .iter()
        .map(|rows| h.catalog.bulk_replace(&owner, rows.clone()));
    let other_tenant = imports
        .iter()
        .map(|rows| h.catalog.bulk_replace(&neighbour, rows.clone()));
    let results = join_all(same_tenant.chain(other_tenant)).await;
    assert!(results.iter().all(|r| r.is_ok()));

    for t in [&owner, &neighbour] {
        let menu = h.catalog.list_items(t).await.unwrap();
        let batch = menu.len();
        assert!((1..=6).contains(&batch));
        let prefix = format!("Batch {batch} item ");
        assert!(menu.iter().all(|item| item.name.starts_with(&prefix)));
        assert!(menu.iter().all(|item| &item.tenant_id == t));
    }
}

#[tokio::test]
async fn test_catalog_metrics_count_outcomes() {
    let h = Harness::in_memory().await;
    let owner = tenant("owner@teahouse.test");

    h.catalog
        .add_item(&owner, NewMenuItem::new("Tea", Decimal::ONE, "Drinks"))
        .await
        .unwrap();
    let _ = h
        .catalog
        .add_item(&owner, NewMenuItem::new("Tea", Decimal::ZERO, "Drinks"))
        .await;

    let ops = &h.metrics.catalog_operations;
    assert_eq!(ops.with_label_values(&["add_item", "success"]).get(), 1);
    assert_eq!(ops.with_label_values(&["add_item", "failure"]).get(), 1);
}
