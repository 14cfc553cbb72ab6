//! Transfer workflow: the state machine, completion atomicity, and the
//! requested-vs-received discrepancy semantics.

mod common;

use common::{engine, engine_with, seed_location, seed_product, stock_up, units, MAIN_STORE};
use pantry_core::{
    Page, TransferDraft, TransferDraftItem, TransferFilter, TransferReceipt, TransferReceiptLine,
    TransferStatus,
};
use pantry_engine::{EngineConfig, ErrorCode, InventoryEngine};

fn draft(from: i64, to: i64, product: i64, qty: i64) -> TransferDraft {
    TransferDraft {
        from_location_id: from,
        to_location_id: to,
        items: vec![TransferDraftItem {
            product_id: product,
            quantity: units(qty),
            notes: None,
        }],
        notes: None,
        requested_by: 1,
    }
}

fn receipt(transfer_id: i64, lines: Vec<TransferReceiptLine>) -> TransferReceipt {
    TransferReceipt {
        transfer_id,
        lines,
        completed_by: 2,
    }
}

async fn sum_for(engine: &InventoryEngine, product: i64, location: i64) -> pantry_core::Quantity {
    engine
        .db()
        .movements()
        .sum_for(product, location)
        .await
        .unwrap()
}

#[tokio::test]
async fn create_moves_no_inventory() {
    let engine = engine().await;
    let warehouse = seed_location(&engine, "Warehouse").await;
    let product = seed_product(&engine, "Cereal", 10).await;
    stock_up(&engine, product, 100).await;

    let created = engine
        .create_transfer(&draft(MAIN_STORE, warehouse, product, 40))
        .await
        .unwrap();

    assert_eq!(created.transfer.status, TransferStatus::Pending);
    assert!(created.transfer.transfer_number.starts_with("TRF-"));
    assert_eq!(created.items.len(), 1);
    assert_eq!(created.items[0].received_quantity, units(0));

    // A reservation of intent only: both balances untouched.
    let source = engine.stock_snapshot(product, None).await.unwrap().unwrap();
    assert_eq!(source.quantity, units(100));
    assert!(engine
        .stock_snapshot(product, Some(warehouse))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn transfer_numbers_are_unique_within_a_day() {
    let engine = engine().await;
    let warehouse = seed_location(&engine, "Warehouse").await;
    let product = seed_product(&engine, "Rice", 10).await;
    stock_up(&engine, product, 100).await;

    // Back-to-back creation lands in the same millisecond easily; each
    // transfer still gets its own slot in the day's sequence.
    let mut numbers = Vec::new();
    for _ in 0..5 {
        let created = engine
            .create_transfer(&draft(MAIN_STORE, warehouse, product, 1))
            .await
            .unwrap();
        numbers.push(created.transfer.transfer_number);
    }

    let mut deduped = numbers.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), 5);

    // Sequential suffixes: -0001 through -0005.
    for (i, number) in numbers.iter().enumerate() {
        assert!(number.ends_with(&format!("-{:04}", i + 1)), "{}", number);
    }
}

#[tokio::test]
async fn same_location_rejected() {
    let engine = engine().await;
    let product = seed_product(&engine, "Juice", 10).await;

    let err = engine
        .create_transfer(&draft(MAIN_STORE, MAIN_STORE, product, 5))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
}

#[tokio::test]
async fn dispatch_then_complete_with_discrepancy() {
    let engine = engine().await;
    let warehouse = seed_location(&engine, "Warehouse").await;
    let product = seed_product(&engine, "Soap", 10).await;
    stock_up(&engine, product, 100).await;

    let created = engine
        .create_transfer(&draft(MAIN_STORE, warehouse, product, 40))
        .await
        .unwrap();
    let id = created.transfer.id;
    let item_id = created.items[0].id;

    let dispatched = engine.dispatch_transfer(id, 3).await.unwrap();
    assert_eq!(dispatched.status, TransferStatus::InTransit);
    assert_eq!(dispatched.approved_by, Some(3));
    assert!(dispatched.approved_at.is_some());

    // 5 units lost in transit: 40 left the source, 35 arrived.
    let completed = engine
        .complete_transfer(&receipt(
            id,
            vec![TransferReceiptLine {
                item_id,
                received_quantity: units(35),
            }],
        ))
        .await
        .unwrap();

    assert_eq!(completed.transfer.status, TransferStatus::Completed);
    assert_eq!(completed.transfer.completed_by, Some(2));
    assert_eq!(completed.items[0].received_quantity, units(35));

    let source = engine.stock_snapshot(product, None).await.unwrap().unwrap();
    let dest = engine
        .stock_snapshot(product, Some(warehouse))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(source.quantity, units(60));
    assert_eq!(dest.quantity, units(35));

    // Both legs on the audit trail, referencing the transfer.
    let legs = engine.movements_for_reference(id).await.unwrap();
    assert_eq!(legs.len(), 2);
    assert_eq!(legs[0].quantity, units(-40));
    assert_eq!(legs[0].location_id, MAIN_STORE);
    assert_eq!(legs[1].quantity, units(35));
    assert_eq!(legs[1].location_id, warehouse);

    // Ledger invariant holds at both locations.
    assert_eq!(sum_for(&engine, product, MAIN_STORE).await, units(60));
    assert_eq!(sum_for(&engine, product, warehouse).await, units(35));
}

#[tokio::test]
async fn complete_defaults_missing_lines_to_requested() {
    let engine = engine().await;
    let warehouse = seed_location(&engine, "Warehouse").await;
    let product = seed_product(&engine, "Tissues", 10).await;
    stock_up(&engine, product, 50).await;

    let created = engine
        .create_transfer(&draft(MAIN_STORE, warehouse, product, 20))
        .await
        .unwrap();

    // No receipt lines: everything arrived as requested.
    let completed = engine
        .complete_transfer(&receipt(created.transfer.id, vec![]))
        .await
        .unwrap();

    assert_eq!(completed.items[0].received_quantity, units(20));
    let dest = engine
        .stock_snapshot(product, Some(warehouse))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(dest.quantity, units(20));
}

#[tokio::test]
async fn pending_transfer_can_complete_without_dispatch() {
    let engine = engine().await;
    let warehouse = seed_location(&engine, "Warehouse").await;
    let product = seed_product(&engine, "Candles", 10).await;
    stock_up(&engine, product, 30).await;

    let created = engine
        .create_transfer(&draft(MAIN_STORE, warehouse, product, 10))
        .await
        .unwrap();

    // Dispatch is optional for same-day van runs.
    let completed = engine
        .complete_transfer(&receipt(created.transfer.id, vec![]))
        .await
        .unwrap();
    assert_eq!(completed.transfer.status, TransferStatus::Completed);
}

#[tokio::test]
async fn complete_twice_is_a_conflict() {
    let engine = engine().await;
    let warehouse = seed_location(&engine, "Warehouse").await;
    let product = seed_product(&engine, "Batteries", 10).await;
    stock_up(&engine, product, 50).await;

    let created = engine
        .create_transfer(&draft(MAIN_STORE, warehouse, product, 10))
        .await
        .unwrap();
    let id = created.transfer.id;

    engine.complete_transfer(&receipt(id, vec![])).await.unwrap();

    let err = engine.complete_transfer(&receipt(id, vec![])).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::Conflict);

    // The double-submit applied nothing extra.
    let source = engine.stock_snapshot(product, None).await.unwrap().unwrap();
    assert_eq!(source.quantity, units(40));
}

#[tokio::test]
async fn cancelled_transfer_cannot_complete() {
    let engine = engine().await;
    let warehouse = seed_location(&engine, "Warehouse").await;
    let product = seed_product(&engine, "Matches", 10).await;
    stock_up(&engine, product, 50).await;

    let created = engine
        .create_transfer(&draft(MAIN_STORE, warehouse, product, 10))
        .await
        .unwrap();
    let id = created.transfer.id;

    let cancelled = engine.cancel_transfer(id).await.unwrap();
    assert_eq!(cancelled.status, TransferStatus::Cancelled);

    // Cancellation reversed nothing because nothing had moved.
    let source = engine.stock_snapshot(product, None).await.unwrap().unwrap();
    assert_eq!(source.quantity, units(50));

    let err = engine.complete_transfer(&receipt(id, vec![])).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::Conflict);

    let err = engine.cancel_transfer(id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::Conflict);
}

#[tokio::test]
async fn dispatch_is_pending_only() {
    let engine = engine().await;
    let warehouse = seed_location(&engine, "Warehouse").await;
    let product = seed_product(&engine, "Chips", 10).await;
    stock_up(&engine, product, 50).await;

    let created = engine
        .create_transfer(&draft(MAIN_STORE, warehouse, product, 10))
        .await
        .unwrap();
    let id = created.transfer.id;

    engine.dispatch_transfer(id, 3).await.unwrap();

    let err = engine.dispatch_transfer(id, 3).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::Conflict);
}

#[tokio::test]
async fn received_above_requested_rejected() {
    let engine = engine().await;
    let warehouse = seed_location(&engine, "Warehouse").await;
    let product = seed_product(&engine, "Napkins", 10).await;
    stock_up(&engine, product, 100).await;

    let created = engine
        .create_transfer(&draft(MAIN_STORE, warehouse, product, 40))
        .await
        .unwrap();
    let item_id = created.items[0].id;

    let err = engine
        .complete_transfer(&receipt(
            created.transfer.id,
            vec![TransferReceiptLine {
                item_id,
                received_quantity: units(45),
            }],
        ))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    // Rejected before any write: still pending, balances untouched.
    let current = engine.get_transfer(created.transfer.id).await.unwrap();
    assert_eq!(current.transfer.status, TransferStatus::Pending);
    let source = engine.stock_snapshot(product, None).await.unwrap().unwrap();
    assert_eq!(source.quantity, units(100));
}

#[tokio::test]
async fn zero_received_item_moves_nothing_on_either_side() {
    let engine = engine().await;
    let warehouse = seed_location(&engine, "Warehouse").await;
    let glassware = seed_product(&engine, "Glassware", 10).await;
    let trays = seed_product(&engine, "Trays", 10).await;
    stock_up(&engine, glassware, 50).await;
    stock_up(&engine, trays, 50).await;

    let created = engine
        .create_transfer(&TransferDraft {
            from_location_id: MAIN_STORE,
            to_location_id: warehouse,
            items: vec![
                TransferDraftItem {
                    product_id: glassware,
                    quantity: units(10),
                    notes: None,
                },
                TransferDraftItem {
                    product_id: trays,
                    quantity: units(5),
                    notes: None,
                },
            ],
            notes: None,
            requested_by: 1,
        })
        .await
        .unwrap();
    let glassware_item = created.items[0].id;

    // The glassware box was entirely broken in transit; the trays arrived.
    let completed = engine
        .complete_transfer(&receipt(
            created.transfer.id,
            vec![TransferReceiptLine {
                item_id: glassware_item,
                received_quantity: units(0),
            }],
        ))
        .await
        .unwrap();

    assert_eq!(completed.items[0].received_quantity, units(0));
    assert_eq!(completed.items[1].received_quantity, units(5));

    // Two legs, both for the trays: the zero-received item moved nothing.
    let legs = engine
        .movements_for_reference(created.transfer.id)
        .await
        .unwrap();
    assert_eq!(legs.len(), 2);
    assert!(legs.iter().all(|m| m.product_id == trays));

    // The glassware never left the source and never reached the warehouse.
    let glassware_source = engine
        .stock_snapshot(glassware, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(glassware_source.quantity, units(50));
    assert!(engine
        .stock_snapshot(glassware, Some(warehouse))
        .await
        .unwrap()
        .is_none());
    let trays_dest = engine
        .stock_snapshot(trays, Some(warehouse))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(trays_dest.quantity, units(5));
}

#[tokio::test]
async fn all_zero_receipt_rejected() {
    let engine = engine().await;
    let warehouse = seed_location(&engine, "Warehouse").await;
    let product = seed_product(&engine, "Mugs", 10).await;
    stock_up(&engine, product, 50).await;

    let created = engine
        .create_transfer(&draft(MAIN_STORE, warehouse, product, 10))
        .await
        .unwrap();
    let item_id = created.items[0].id;

    // Nothing arrived at all: this is a cancellation, not a completion.
    let err = engine
        .complete_transfer(&receipt(
            created.transfer.id,
            vec![TransferReceiptLine {
                item_id,
                received_quantity: units(0),
            }],
        ))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    let current = engine.get_transfer(created.transfer.id).await.unwrap();
    assert_eq!(current.transfer.status, TransferStatus::Pending);
    let source = engine.stock_snapshot(product, None).await.unwrap().unwrap();
    assert_eq!(source.quantity, units(50));
}

#[tokio::test]
async fn completion_rolls_back_whole_batch_when_policy_blocks() {
    let engine = engine_with(EngineConfig::default().allow_negative_stock(false)).await;
    let warehouse = seed_location(&engine, "Warehouse").await;
    let product_a = seed_product(&engine, "Jam", 10).await;
    let product_b = seed_product(&engine, "Marmalade", 10).await;
    stock_up(&engine, product_a, 50).await;
    stock_up(&engine, product_b, 5).await;

    let created = engine
        .create_transfer(&TransferDraft {
            from_location_id: MAIN_STORE,
            to_location_id: warehouse,
            items: vec![
                TransferDraftItem {
                    product_id: product_a,
                    quantity: units(10),
                    notes: None,
                },
                // Would drive product B to -35 at the source.
                TransferDraftItem {
                    product_id: product_b,
                    quantity: units(40),
                    notes: None,
                },
            ],
            notes: None,
            requested_by: 1,
        })
        .await
        .unwrap();

    let err = engine
        .complete_transfer(&receipt(created.transfer.id, vec![]))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    // The whole completion rolled back: product A's leg did not survive,
    // and the transfer is still open.
    let a = engine.stock_snapshot(product_a, None).await.unwrap().unwrap();
    assert_eq!(a.quantity, units(50));
    let current = engine.get_transfer(created.transfer.id).await.unwrap();
    assert_eq!(current.transfer.status, TransferStatus::Pending);
    assert!(engine
        .movements_for_reference(created.transfer.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn listing_filters_by_status_and_location() {
    let engine = engine().await;
    let warehouse = seed_location(&engine, "Warehouse").await;
    let kiosk = seed_location(&engine, "Kiosk").await;
    let product = seed_product(&engine, "Bottled Water", 10).await;
    stock_up(&engine, product, 200).await;

    let t1 = engine
        .create_transfer(&draft(MAIN_STORE, warehouse, product, 10))
        .await
        .unwrap();
    engine
        .create_transfer(&draft(MAIN_STORE, kiosk, product, 10))
        .await
        .unwrap();
    engine
        .complete_transfer(&receipt(t1.transfer.id, vec![]))
        .await
        .unwrap();

    let pending = engine
        .list_transfers(
            &TransferFilter {
                status: Some(TransferStatus::Pending),
                location_id: None,
            },
            Page::first(),
        )
        .await
        .unwrap();
    assert_eq!(pending.total, 1);

    let via_warehouse = engine
        .list_transfers(
            &TransferFilter {
                status: None,
                location_id: Some(warehouse),
            },
            Page::first(),
        )
        .await
        .unwrap();
    assert_eq!(via_warehouse.total, 1);
    assert_eq!(via_warehouse.items[0].id, t1.transfer.id);
}
