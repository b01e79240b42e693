// gourmet-client/tests/payment_flow.rs
// 访客支付流程集成测试

mod common;

use common::{MockHttp, client, session_details_json};
use gourmet_client::models::{BillStatus, PaymentMethod};
use gourmet_client::payment::{PaymentConfirmation, PaymentFlow};
use gourmet_client::storage::keys;
use gourmet_client::{KeyValueStore, KeyValueStoreExt};
use rust_decimal::Decimal;
use serde_json::json;
use shared::ErrorCode;
use shared::http::Method;

const BILL_STATUS: &str = "api/guest/sessions/s1/bill/status";
const DETAILS: &str = "api/guest/sessions/s1/details";

fn scripted() -> MockHttp {
    let mock = MockHttp::new();
    mock.ok(Method::GET, DETAILS, session_details_json("s1", "7", 143_000.0));
    mock.ok(
        Method::PUT,
        BILL_STATUS,
        json!({"message": "Bill status updated", "bill_status": "paid"}),
    );
    mock
}

#[tokio::test]
async fn test_qr_payment_from_stored_session() {
    let mock = scripted();
    let client = client(&mock);
    client
        .store()
        .set(keys::CURRENT_SESSION_ID, "s1".into())
        .unwrap();

    let flow = PaymentFlow::load(client.clone(), None).await.unwrap();
    assert_eq!(flow.context().total, Decimal::from(143_000));
    assert_eq!(flow.context().bank.bank_code, "VCB");

    let qr = flow.qr(chrono::Utc::now()).unwrap();
    assert!(qr.image_url.contains("VCB-0123456789-compact2.png?amount=143000"));
    assert_eq!(qr.description, "DH A1B2C3D4 Ban7");

    let confirmation = flow.confirm_qr_paid().await.unwrap();
    assert_eq!(confirmation.payment_method, "qr");
    assert_eq!(confirmation.discount, Decimal::ZERO);

    let body = mock.calls_to(Method::PUT, BILL_STATUS)[0].body.clone().unwrap();
    assert_eq!(body, json!({"status": "paid", "payment_method": "bank_transfer"}));

    let stored: PaymentConfirmation = client
        .store()
        .get_json(keys::PAYMENT_CONFIRMATION)
        .unwrap();
    assert_eq!(stored.session_id, "s1");
    assert_eq!(stored.table_number.as_deref(), Some("7"));
    assert_eq!(stored.items.len(), 1);
}

#[tokio::test]
async fn test_cash_request() {
    let mock = scripted();
    let client = client(&mock);
    let flow = PaymentFlow::load(client, Some("s1")).await.unwrap();

    flow.pay(PaymentMethod::Cash).await.unwrap();
    let body = mock.calls_to(Method::PUT, BILL_STATUS)[0].body.clone().unwrap();
    assert_eq!(body, json!({"status": "cash_pending", "payment_method": "cash"}));
}

#[tokio::test]
async fn test_second_action_while_processing_is_rejected() {
    let mock = scripted();
    let client = client(&mock);
    let flow = PaymentFlow::load(client, Some("s1")).await.unwrap();

    let (qr, cash) = tokio::join!(flow.confirm_qr_paid(), flow.pay_cash());
    assert!(qr.is_ok());
    assert_eq!(cash.unwrap_err().code(), ErrorCode::PaymentInProgress);
    assert_eq!(mock.calls_to(Method::PUT, BILL_STATUS).len(), 1);
    assert!(!flow.is_processing());
}

#[tokio::test]
async fn test_momo_is_not_offered() {
    let mock = scripted();
    let client = client(&mock);
    let flow = PaymentFlow::load(client, Some("s1")).await.unwrap();

    let err = flow.pay(PaymentMethod::Momo).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::PaymentInvalidMethod);
    assert!(mock.calls_to(Method::PUT, BILL_STATUS).is_empty());
}

#[tokio::test]
async fn test_no_session_to_pay() {
    let mock = scripted();
    let client = client(&mock);
    let err = PaymentFlow::load(client, None).await.err().unwrap();
    assert_eq!(err.code(), ErrorCode::SessionNotFound);
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_wait_until_staff_settles() {
    let mock = MockHttp::new();
    let pending = session_details_json("s1", "7", 143_000.0);
    let mut paid = pending.clone();
    paid["bill"]["status"] = json!("verified");
    mock.ok(Method::GET, DETAILS, pending.clone());
    mock.ok(Method::GET, DETAILS, pending.clone());
    mock.ok(Method::GET, DETAILS, pending);
    mock.ok(Method::GET, DETAILS, paid);
    let client = client(&mock);

    let flow = PaymentFlow::load(client, Some("s1")).await.unwrap();
    assert_eq!(flow.wait_until_settled().await.unwrap(), BillStatus::Verified);
}

#[tokio::test(start_paused = true)]
async fn test_wait_gives_up_after_limit() {
    let mock = scripted();
    let client = client(&mock);
    let flow = PaymentFlow::load(client, Some("s1")).await.unwrap();

    let started = tokio::time::Instant::now();
    let err = flow.wait_until_settled().await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::PaymentQrExpired);
    assert!(started.elapsed() >= std::time::Duration::from_secs(300));
}
