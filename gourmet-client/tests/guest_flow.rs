// gourmet-client/tests/guest_flow.rs
// 访客点餐流程集成测试

mod common;

use common::{MockHttp, client, session_details_json};
use gourmet_client::cart::{CartStore, Dish};
use gourmet_client::checkout::{TableContext, TableParams};
use gourmet_client::models::OrderStatus;
use gourmet_client::progress::GuestStage;
use gourmet_client::storage::keys;
use gourmet_client::{KeyValueStore, MemoryStore};
use rust_decimal::Decimal;
use serde_json::json;
use shared::ErrorCode;
use shared::http::Method;
use std::time::Duration;

fn sample_cart(store: gourmet_client::SharedStore) -> CartStore {
    let mut cart = CartStore::load(store);
    let pho = Dish::new("m1", "Phở bò", Decimal::from(50_000));
    cart.add(&pho).unwrap();
    cart.add(&pho).unwrap();
    cart.add(&Dish::new("m2", "Cà phê sữa đá", Decimal::from(30_000)).with_category("drink"))
        .unwrap();
    cart
}

#[tokio::test]
async fn test_cart_totals() {
    let cart = sample_cart(MemoryStore::shared());
    assert_eq!(cart.item_count(), 2);
    assert_eq!(cart.total_quantity(), 3);
    assert_eq!(cart.total_price(), Decimal::from(130_000));
}

#[tokio::test]
async fn test_empty_cart_sends_nothing() {
    let mock = MockHttp::new();
    let client = client(&mock);
    client
        .store()
        .set(keys::CURRENT_TABLE_ID, "t7".into())
        .unwrap();
    let mut cart = CartStore::load(client.store().clone());

    let err = client.submit_order(&mut cart).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::OrderEmpty);
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_missing_table_sends_nothing() {
    let mock = MockHttp::new();
    let client = client(&mock);
    let mut cart = sample_cart(client.store().clone());

    let err = client.submit_order(&mut cart).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::TableNotSelected);
    assert_eq!(mock.call_count(), 0);
    assert_eq!(cart.total_quantity(), 3);
}

#[tokio::test]
async fn test_checkout_happy_path() {
    let mock = MockHttp::new();
    mock.ok(
        Method::POST,
        "api/guest/sessions",
        json!({"session_id": "s1", "table_id": "t7", "status": "active"}),
    );
    mock.ok(
        Method::POST,
        "api/guest/orders",
        json!({"order_id": "o1", "session_id": "s1", "status": "ordered",
               "total_items": 3, "total_amount": 130000.0}),
    );
    mock.ok(
        Method::GET,
        "api/guest/sessions/s1/details",
        session_details_json("s1", "7", 143_000.0),
    );
    let client = client(&mock);
    let store = client.store().clone();
    TableContext::resolve(
        store.as_ref(),
        &TableParams {
            branch_id: Some("b1".into()),
            table_id: Some("t7".into()),
            table_number: None,
        },
    )
    .unwrap();

    let mut cart = sample_cart(store.clone());
    cart.update_note(0, "ít hành").unwrap();

    let receipt = client.submit_order(&mut cart).await.unwrap();
    assert_eq!(receipt.session_id, "s1");
    assert_eq!(receipt.order_id, "o1");
    assert_eq!(receipt.table_number, "7");
    assert_eq!(receipt.total_amount, Decimal::from(130_000));
    assert!(cart.is_empty());

    assert_eq!(store.get(keys::CURRENT_SESSION_ID).as_deref(), Some("s1"));
    assert_eq!(store.get(keys::LAST_ORDER_ID).as_deref(), Some("o1"));
    assert_eq!(store.get(keys::CURRENT_TABLE_NUMBER).as_deref(), Some("7"));
    assert_eq!(GuestStage::load(store.as_ref()), GuestStage::Preparing);

    let session_calls = mock.calls_to(Method::POST, "api/guest/sessions");
    assert_eq!(session_calls[0].body.as_ref().unwrap()["table_id"], "t7");

    let order_calls = mock.calls_to(Method::POST, "api/guest/orders");
    let body = order_calls[0].body.as_ref().unwrap();
    assert_eq!(body["session_id"], "s1");
    assert_eq!(body["status"], "ordered");
    assert_eq!(body["items"][0]["quantity"], 2);
    assert_eq!(body["items"][0]["note"], "ít hành");
    assert_eq!(body["items"][1]["menu_item_id"], "m2");
}

#[tokio::test]
async fn test_failed_order_keeps_cart() {
    let mock = MockHttp::new();
    mock.ok(
        Method::POST,
        "api/guest/sessions",
        json!({"session_id": "s1", "table_id": "t7"}),
    );
    mock.status(Method::POST, "api/guest/orders", 500);
    let client = client(&mock);
    client
        .store()
        .set(keys::CURRENT_TABLE_ID, "t7".into())
        .unwrap();
    let mut cart = sample_cart(client.store().clone());

    assert!(client.submit_order(&mut cart).await.is_err());
    assert_eq!(cart.total_quantity(), 3);
    assert_eq!(client.store().get(keys::LAST_ORDER_ID), None);
}

#[tokio::test(start_paused = true)]
async fn test_track_order_until_done() {
    let mock = MockHttp::new();
    for status in ["cooking", "ready", "done"] {
        mock.ok(
            Method::GET,
            "api/guest/orders/o1/status",
            json!({"order_id": "o1", "status": status}),
        );
    }
    let client = client(&mock);

    let mut handle = client.track_order("o1");
    handle.finished().await;

    assert_eq!(handle.latest().map(|s| s.status), Some(OrderStatus::Done));
    assert_eq!(mock.calls_to(Method::GET, "api/guest/orders/o1/status").len(), 3);
    assert_eq!(
        GuestStage::load(client.store().as_ref()),
        GuestStage::Completed
    );
}

#[tokio::test(start_paused = true)]
async fn test_slow_old_status_does_not_overwrite_newer() {
    let mock = MockHttp::new();
    let path = "api/guest/orders/o1/status";
    // first poll answers after the second one
    mock.ok_after(
        Method::GET,
        path,
        Duration::from_secs(8),
        json!({"order_id": "o1", "status": "ordered"}),
    );
    mock.ok_after(
        Method::GET,
        path,
        Duration::from_secs(1),
        json!({"order_id": "o1", "status": "cooking"}),
    );
    let client = client(&mock);

    let handle = client.track_order("o1");
    tokio::time::sleep(Duration::from_millis(9_500)).await;

    assert_eq!(mock.calls_to(Method::GET, path).len(), 2);
    assert_eq!(handle.latest().map(|s| s.status), Some(OrderStatus::Cooking));
    assert_eq!(
        client.store().get(keys::ORDER_STATUS).as_deref(),
        Some("cooking")
    );
    handle.shutdown().await;
}
