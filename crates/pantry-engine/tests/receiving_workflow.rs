//! Purchase receiving: partial receipts, the reject-not-clamp range rule,
//! and batch atomicity.

mod common;

use common::{engine, seed_product, units, MAIN_STORE};
use pantry_core::{MovementType, ReceiveGoodsRequest, ReceiveLine};
use pantry_engine::{ErrorCode, InventoryEngine};

const PO: i64 = 1;

async fn seed_order_line(engine: &InventoryEngine, product: i64, ordered_units: i64) -> i64 {
    engine
        .db()
        .purchases()
        .insert_item(PO, product, units(ordered_units))
        .await
        .expect("seed order line")
        .id
}

fn receipt(lines: Vec<ReceiveLine>) -> ReceiveGoodsRequest {
    ReceiveGoodsRequest {
        purchase_order_id: PO,
        lines,
        user_id: 1,
        location_id: None,
    }
}

fn line(item_id: i64, received_units: i64) -> ReceiveLine {
    ReceiveLine {
        item_id,
        received_quantity: units(received_units),
        expiry_date: None,
    }
}

#[tokio::test]
async fn partial_receipt_then_remainder() {
    let engine = engine().await;
    let product = seed_product(&engine, "Flour 10kg", 10).await;
    let item = seed_order_line(&engine, product, 50).await;

    // Supplier shorted the first delivery.
    let result = engine.receive_goods(&receipt(vec![line(item, 30)])).await.unwrap();
    assert!(!result.fully_received);
    assert_eq!(result.movements.len(), 1);
    assert_eq!(result.movements[0].movement_type, MovementType::Purchase);
    assert_eq!(result.movements[0].quantity, units(30));
    assert_eq!(result.movements[0].reference_id, Some(item));
    assert_eq!(result.items[0].received_quantity, units(30));
    assert_eq!(result.items[0].remaining(), units(20));

    let snapshot = engine.stock_snapshot(product, None).await.unwrap().unwrap();
    assert_eq!(snapshot.quantity, units(30));

    // The remainder arrives.
    let result = engine.receive_goods(&receipt(vec![line(item, 20)])).await.unwrap();
    assert!(result.fully_received);
    assert_eq!(result.items[0].received_quantity, units(50));

    let snapshot = engine.stock_snapshot(product, None).await.unwrap().unwrap();
    assert_eq!(snapshot.quantity, units(50));
}

#[tokio::test]
async fn over_receipt_rejected_not_clamped() {
    let engine = engine().await;
    let product = seed_product(&engine, "Oil 5L", 10).await;
    let item = seed_order_line(&engine, product, 50).await;

    let err = engine
        .receive_goods(&receipt(vec![line(item, 60)]))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    // Nothing persisted.
    let items = engine.db().purchases().items_for_order(PO).await.unwrap();
    assert_eq!(items[0].received_quantity, units(0));
    assert!(engine.stock_snapshot(product, None).await.unwrap().is_none());
}

#[tokio::test]
async fn remaining_shrinks_with_each_receipt() {
    let engine = engine().await;
    let product = seed_product(&engine, "Salt", 10).await;
    let item = seed_order_line(&engine, product, 50).await;

    engine.receive_goods(&receipt(vec![line(item, 30)])).await.unwrap();

    // 30 more would exceed the 20 remaining.
    let err = engine
        .receive_goods(&receipt(vec![line(item, 30)]))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    let items = engine.db().purchases().items_for_order(PO).await.unwrap();
    assert_eq!(items[0].received_quantity, units(30));
}

#[tokio::test]
async fn all_zero_receipt_rejected() {
    let engine = engine().await;
    let product = seed_product(&engine, "Pepper", 10).await;
    let item = seed_order_line(&engine, product, 50).await;

    let err = engine
        .receive_goods(&receipt(vec![line(item, 0)]))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
}

#[tokio::test]
async fn bad_line_rejects_the_whole_batch() {
    let engine = engine().await;
    let product_a = seed_product(&engine, "Beans", 10).await;
    let product_b = seed_product(&engine, "Lentils", 10).await;
    let item_a = seed_order_line(&engine, product_a, 50).await;
    let item_b = seed_order_line(&engine, product_b, 50).await;

    // Second line is out of range: the valid first line must not land.
    let err = engine
        .receive_goods(&receipt(vec![line(item_a, 10), line(item_b, 999)]))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    let items = engine.db().purchases().items_for_order(PO).await.unwrap();
    assert!(items.iter().all(|i| i.received_quantity == units(0)));
    assert!(engine.stock_snapshot(product_a, None).await.unwrap().is_none());
}

#[tokio::test]
async fn line_from_another_order_rejected() {
    let engine = engine().await;
    let product = seed_product(&engine, "Honey", 10).await;
    let item = seed_order_line(&engine, product, 50).await;

    let mut req = receipt(vec![line(item, 10)]);
    req.purchase_order_id = 2;

    let err = engine.receive_goods(&req).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
}

#[tokio::test]
async fn unknown_line_not_found() {
    let engine = engine().await;

    let err = engine
        .receive_goods(&receipt(vec![line(424242, 10)]))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn expiry_date_recorded_on_purchase_movement() {
    let engine = engine().await;
    let product = seed_product(&engine, "UHT Milk", 10).await;
    let item = seed_order_line(&engine, product, 24).await;

    let expiry = chrono::NaiveDate::from_ymd_opt(2027, 6, 1).unwrap();
    let result = engine
        .receive_goods(&receipt(vec![ReceiveLine {
            item_id: item,
            received_quantity: units(24),
            expiry_date: Some(expiry),
        }]))
        .await
        .unwrap();

    assert_eq!(result.movements[0].expiry_date, Some(expiry));

    let history = engine.movements_for_reference(item).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].expiry_date, Some(expiry));
    assert_eq!(history[0].location_id, MAIN_STORE);
}

#[tokio::test]
async fn multi_line_receipt_is_one_batch() {
    let engine = engine().await;
    let product_a = seed_product(&engine, "Pasta", 10).await;
    let product_b = seed_product(&engine, "Tomato Sauce", 10).await;
    let item_a = seed_order_line(&engine, product_a, 40).await;
    let item_b = seed_order_line(&engine, product_b, 60).await;

    let result = engine
        .receive_goods(&receipt(vec![line(item_a, 40), line(item_b, 60)]))
        .await
        .unwrap();

    assert!(result.fully_received);
    assert_eq!(result.movements.len(), 2);

    let a = engine.stock_snapshot(product_a, None).await.unwrap().unwrap();
    let b = engine.stock_snapshot(product_b, None).await.unwrap().unwrap();
    assert_eq!(a.quantity, units(40));
    assert_eq!(b.quantity, units(60));
}
