//! Stock status reads: the classified listing, alert counts, and reorder
//! threshold maintenance.

mod common;

use common::{engine, seed_product, stock_up, units};
use pantry_core::{
    AdjustmentRequest, MovementType, Page, SortOrder, StockFilter, StockSortField, StockStatus,
};

async fn deduct(engine: &pantry_engine::InventoryEngine, product: i64, qty: i64) {
    engine
        .adjust_stock(&AdjustmentRequest {
            product_id: product,
            location_id: None,
            movement_type: MovementType::Adjustment,
            quantity: units(-qty),
            reason: None,
            user_id: 1,
            expiry_date: None,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn listing_classifies_every_row() {
    let engine = engine().await;

    let healthy = seed_product(&engine, "Apples", 20).await;
    let low = seed_product(&engine, "Bananas", 20).await;
    let out = seed_product(&engine, "Cherries", 20).await;

    stock_up(&engine, healthy, 100).await;
    stock_up(&engine, low, 15).await;
    stock_up(&engine, out, 5).await;
    deduct(&engine, out, 5).await;

    let page = engine
        .stock_levels(&StockFilter::default(), Page::first())
        .await
        .unwrap();
    assert_eq!(page.total, 3);

    // Default sort: product name ascending.
    assert_eq!(page.items[0].product_name, "Apples");
    assert_eq!(page.items[0].status, StockStatus::InStock);
    assert_eq!(page.items[1].status, StockStatus::LowStock);
    assert_eq!(page.items[2].status, StockStatus::OutOfStock);
    assert_eq!(page.items[2].quantity, units(0));
}

#[tokio::test]
async fn alert_filters_and_counts_agree() {
    let engine = engine().await;

    let healthy = seed_product(&engine, "Flour", 20).await;
    let low = seed_product(&engine, "Sugar", 20).await;
    let out = seed_product(&engine, "Yeast", 20).await;

    stock_up(&engine, healthy, 100).await;
    stock_up(&engine, low, 10).await;
    stock_up(&engine, out, 3).await;
    deduct(&engine, out, 8).await; // -5: oversold

    let counts = engine.stock_alert_counts(None).await.unwrap();
    assert_eq!(counts.low_stock, 1);
    assert_eq!(counts.out_of_stock, 1);

    let low_page = engine
        .stock_levels(
            &StockFilter {
                low_stock_only: true,
                ..Default::default()
            },
            Page::first(),
        )
        .await
        .unwrap();
    assert_eq!(low_page.total, 1);
    assert_eq!(low_page.items[0].product_name, "Sugar");

    let out_page = engine
        .stock_levels(
            &StockFilter {
                out_of_stock_only: true,
                ..Default::default()
            },
            Page::first(),
        )
        .await
        .unwrap();
    assert_eq!(out_page.total, 1);
    assert_eq!(out_page.items[0].product_name, "Yeast");
    assert_eq!(out_page.items[0].quantity, units(-5));
}

#[tokio::test]
async fn search_and_sort() {
    let engine = engine().await;

    let a = seed_product(&engine, "Green Tea", 5).await;
    let b = seed_product(&engine, "Black Tea", 5).await;
    let c = seed_product(&engine, "Coffee", 5).await;

    stock_up(&engine, a, 30).await;
    stock_up(&engine, b, 80).await;
    stock_up(&engine, c, 50).await;

    let teas = engine
        .stock_levels(
            &StockFilter {
                search: Some("tea".to_string()),
                ..Default::default()
            },
            Page::first(),
        )
        .await
        .unwrap();
    assert_eq!(teas.total, 2);

    let by_qty = engine
        .stock_levels(
            &StockFilter {
                sort_by: StockSortField::Quantity,
                sort_order: SortOrder::Desc,
                ..Default::default()
            },
            Page::first(),
        )
        .await
        .unwrap();
    assert_eq!(by_qty.items[0].product_name, "Black Tea");
    assert_eq!(by_qty.items[2].product_name, "Green Tea");
}

#[tokio::test]
async fn reorder_threshold_reclassifies() {
    let engine = engine().await;
    let product = seed_product(&engine, "Olive Oil", 10).await;
    stock_up(&engine, product, 50).await;

    let snapshot = engine.stock_snapshot(product, None).await.unwrap().unwrap();
    assert_eq!(snapshot.status(), StockStatus::InStock);

    // Raising the threshold above on-hand flips the classification.
    engine
        .set_reorder_level(product, None, units(60))
        .await
        .unwrap();

    let snapshot = engine.stock_snapshot(product, None).await.unwrap().unwrap();
    assert_eq!(snapshot.reorder_level, units(60));
    assert_eq!(snapshot.status(), StockStatus::LowStock);

    let counts = engine.stock_alert_counts(None).await.unwrap();
    assert_eq!(counts.low_stock, 1);
}

#[tokio::test]
async fn threshold_can_be_set_before_any_movement() {
    let engine = engine().await;
    let product = seed_product(&engine, "Saffron", 2).await;

    // Explicit initialization at quantity zero.
    engine
        .set_reorder_level(product, None, units(4))
        .await
        .unwrap();

    let snapshot = engine.stock_snapshot(product, None).await.unwrap().unwrap();
    assert_eq!(snapshot.quantity, units(0));
    assert_eq!(snapshot.reorder_level, units(4));

    // First movement keeps the explicit threshold, not the product default.
    stock_up(&engine, product, 3).await;
    let snapshot = engine.stock_snapshot(product, None).await.unwrap().unwrap();
    assert_eq!(snapshot.reorder_level, units(4));
    assert_eq!(snapshot.status(), StockStatus::LowStock);
}

#[tokio::test]
async fn pagination_pages_through_the_listing() {
    let engine = engine().await;

    for i in 0..5 {
        let p = seed_product(&engine, &format!("Item {:02}", i), 5).await;
        stock_up(&engine, p, 10 + i).await;
    }

    let page1 = engine
        .stock_levels(
            &StockFilter::default(),
            Page {
                page: 1,
                page_size: 2,
            },
        )
        .await
        .unwrap();
    assert_eq!(page1.total, 5);
    assert_eq!(page1.items.len(), 2);
    assert_eq!(page1.items[0].product_name, "Item 00");

    let page3 = engine
        .stock_levels(
            &StockFilter::default(),
            Page {
                page: 3,
                page_size: 2,
            },
        )
        .await
        .unwrap();
    assert_eq!(page3.items.len(), 1);
    assert_eq!(page3.items[0].product_name, "Item 04");
}
