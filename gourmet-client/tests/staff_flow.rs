// gourmet-client/tests/staff_flow.rs
// 厨房 / 服务员看板与收款集成测试

mod common;

use common::{MockHttp, client, order_json};
use gourmet_client::board::{KitchenBoard, StaffBoard, WaitSort};
use gourmet_client::models::{BillStatus, OrderStatus};
use gourmet_client::payment::StaffPayments;
use serde_json::json;
use shared::ErrorCode;
use shared::http::Method;

fn board_orders() -> serde_json::Value {
    json!([
        order_json("o1", "A", "ready", 5, "Phở"),
        order_json("o2", "B", "serving", 30, "Cơm tấm"),
        order_json("o3", "A", "serving", 10, "Trà đá"),
        order_json("o4", "C", "cooking", 12, "Bún chả"),
        order_json("o5", "D", "done", 1, "Chè"),
    ])
}

fn ack(order_id: &str) -> serde_json::Value {
    json!({"message": "Order status updated", "order_id": order_id})
}

#[tokio::test]
async fn test_staff_board_merges_and_serves_whole_session() {
    let mock = MockHttp::new();
    mock.ok(Method::GET, "api/orders", board_orders());
    mock.ok(Method::PUT, "api/orders/o1/status", ack("o1"));
    mock.ok(Method::PUT, "api/orders/o3/status", ack("o3"));
    let client = client(&mock);

    let mut board = StaffBoard::new(client.clone(), "b1");
    board.refresh().await.unwrap();

    // cooking never reaches the staff board
    let sessions: Vec<_> = board.cards().iter().map(|c| c.session_id.as_str()).collect();
    assert_eq!(sessions, vec!["A", "B", "D"]);
    let a = &board.cards()[0];
    assert_eq!(a.status, OrderStatus::Ready);
    assert_eq!(a.order_ids, vec!["o1", "o3"]);
    assert_eq!(a.items.len(), 2);

    let counts = board.counts();
    assert_eq!((counts.ready, counts.serving, counts.done), (1, 1, 1));
    assert_eq!(board.active().len(), 2);

    board.start_serving("A").await.unwrap();
    for id in ["o1", "o3"] {
        let calls = mock.calls_to(Method::PUT, &format!("api/orders/{id}/status"));
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].query,
            vec![("new_status".to_string(), "serving".to_string())]
        );
    }
    // refreshed after the fan-out
    assert_eq!(mock.calls_to(Method::GET, "api/orders").len(), 2);
}

#[tokio::test]
async fn test_serve_fails_if_any_update_fails() {
    let mock = MockHttp::new();
    mock.ok(Method::GET, "api/orders", board_orders());
    mock.ok(Method::PUT, "api/orders/o1/status", ack("o1"));
    mock.status(Method::PUT, "api/orders/o3/status", 500);
    let client = client(&mock);

    let mut board = StaffBoard::new(client, "b1");
    board.refresh().await.unwrap();
    assert!(board.complete_serving("A").await.is_err());
    // no refresh after a failed action
    assert_eq!(mock.calls_to(Method::GET, "api/orders").len(), 1);

    let err = board.start_serving("nope").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::SessionNotFound);
}

#[tokio::test]
async fn test_staff_board_search_and_sort() {
    let mock = MockHttp::new();
    mock.ok(Method::GET, "api/orders", board_orders());
    let client = client(&mock);

    let mut board = StaffBoard::new(client, "b1");
    board.refresh().await.unwrap();

    board.set_sort(WaitSort::Descending);
    let order: Vec<_> = board.visible().iter().map(|c| c.session_id.clone()).collect();
    assert_eq!(order, vec!["D", "A", "B"]);

    board.set_search("CƠM");
    let hits: Vec<_> = board.visible().iter().map(|c| c.session_id.clone()).collect();
    assert_eq!(hits, vec!["B"]);
}

#[tokio::test]
async fn test_kitchen_rejects_skipped_step() {
    let mock = MockHttp::new();
    mock.ok(Method::GET, "api/orders", board_orders());
    mock.ok(Method::PUT, "api/orders/o4/status", ack("o4"));
    let client = client(&mock);

    let mut board = KitchenBoard::new(client, "b1");
    board.refresh().await.unwrap();
    assert_eq!(board.columns().counts(), (0, 1, 1));

    let err = board.start_cooking("o4").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidStatusTransition);
    assert!(mock.calls_to(Method::PUT, "api/orders/o4/status").is_empty());

    board.finish_cooking("o4").await.unwrap();
    let calls = mock.calls_to(Method::PUT, "api/orders/o4/status");
    assert_eq!(calls[0].query[0].1, "ready");
}

fn bill(id: &str, status: &str) -> serde_json::Value {
    json!({
        "bill_id": id,
        "session_id": format!("s-{id}"),
        "order_id": format!("o-{id}"),
        "table_number": "4",
        "branch_name": "Quận 1",
        "order_time": "2025-03-01T12:00:00",
        "items": [],
        "subtotal": 100000.0,
        "vat": 10000.0,
        "total_amount": 110000.0,
        "payment_method": if status == "cash_pending" { "cash" } else { "bank_transfer" },
        "status": status
    })
}

#[tokio::test]
async fn test_staff_payment_queues() {
    let mock = MockHttp::new();
    mock.ok(Method::GET, "api/staff/cash-pending", json!([bill("c1", "cash_pending")]));
    mock.ok(
        Method::GET,
        "api/staff/qr-paid",
        json!([bill("q1", "paid"), bill("q2", "paid")]),
    );
    mock.ok(
        Method::PUT,
        "api/staff/cash-pending/c1/confirm",
        json!({"success": true, "bill_id": "c1", "bill_status": "paid", "table_number": "4"}),
    );
    let client = client(&mock);

    let mut payments = StaffPayments::new(client, "b1");
    payments.refresh().await.unwrap();
    assert_eq!(payments.cash_pending().len(), 1);
    assert_eq!(payments.qr_paid().len(), 2);
    assert_eq!(payments.cash_pending()[0].short_order_id(), "O-C1");

    let result = payments.confirm_cash("c1").await.unwrap();
    assert_eq!(result.bill_status, BillStatus::Paid);
    assert_eq!(
        mock.calls_to(Method::GET, "api/staff/cash-pending")[0].query,
        vec![("branch_id".to_string(), "b1".to_string())]
    );
    assert_eq!(mock.calls_to(Method::GET, "api/staff/qr-paid").len(), 2);
}
