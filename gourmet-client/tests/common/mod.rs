// gourmet-client/tests/common/mod.rs
// 测试用脚本化 HTTP 传输

#![allow(dead_code)]

use async_trait::async_trait;
use gourmet_client::http::error_for_status;
use gourmet_client::{
    ApiRequest, ClientConfig, ClientResult, GourmetClient, HttpClient, MemoryStore, SharedStore,
};
use serde_json::{Value, json};
use shared::http::{Method, StatusCode};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Status(u16, String),
    /// Answer only after the delay has passed
    Slow(Duration, Value),
}

#[derive(Default)]
struct Inner {
    routes: Mutex<HashMap<(Method, String), VecDeque<Reply>>>,
    calls: Mutex<Vec<ApiRequest>>,
    token: Mutex<Option<String>>,
}

/// In-memory transport answering from per-route queues.
///
/// The last reply of a queue is repeated, so refreshes after an action see
/// the same listing again. Unscripted routes answer 404.
#[derive(Clone, Default)]
pub struct MockHttp {
    inner: Arc<Inner>,
}

impl MockHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, method: Method, path: &str, reply: Reply) -> &Self {
        self.inner
            .routes
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
        self
    }

    pub fn ok(&self, method: Method, path: &str, body: Value) -> &Self {
        self.on(method, path, Reply::Json(body))
    }

    pub fn ok_after(&self, method: Method, path: &str, delay: Duration, body: Value) -> &Self {
        self.on(method, path, Reply::Slow(delay, body))
    }

    pub fn status(&self, method: Method, path: &str, status: u16) -> &Self {
        self.on(method, path, Reply::Status(status, format!("HTTP {status}")))
    }

    pub fn calls(&self) -> Vec<ApiRequest> {
        self.inner.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.inner.calls.lock().unwrap().len()
    }

    pub fn calls_to(&self, method: Method, path: &str) -> Vec<ApiRequest> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == method && c.path == path)
            .collect()
    }
}

#[async_trait]
impl HttpClient for MockHttp {
    async fn execute(&self, request: ApiRequest) -> ClientResult<Value> {
        self.inner.calls.lock().unwrap().push(request.clone());
        // Let concurrent callers interleave like real I/O would
        tokio::task::yield_now().await;

        let reply = {
            let mut routes = self.inner.routes.lock().unwrap();
            match routes.get_mut(&(request.method.clone(), request.path.clone())) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };
        match reply {
            Some(Reply::Json(body)) => Ok(body),
            Some(Reply::Slow(delay, body)) => {
                tokio::time::sleep(delay).await;
                Ok(body)
            }
            Some(Reply::Status(code, message)) => Err(error_for_status(
                StatusCode::from_u16(code).unwrap(),
                message,
            )),
            None => Err(error_for_status(
                StatusCode::NOT_FOUND,
                format!("no route for {} {}", request.method, request.path),
            )),
        }
    }

    fn set_token(&self, token: Option<String>) {
        *self.inner.token.lock().unwrap() = token;
    }

    fn token(&self) -> Option<String> {
        self.inner.token.lock().unwrap().clone()
    }
}

pub fn config() -> ClientConfig {
    ClientConfig::new("http://api.test")
        .with_ai_base_url("http://ai.test")
        .with_retry(3, Duration::from_millis(10))
        .with_poll_interval(Duration::from_secs(5))
}

pub fn client_with_store(mock: &MockHttp, store: SharedStore) -> Arc<GourmetClient<MockHttp>> {
    Arc::new(GourmetClient::with_transports(
        mock.clone(),
        mock.clone(),
        config(),
        store,
    ))
}

pub fn client(mock: &MockHttp) -> Arc<GourmetClient<MockHttp>> {
    client_with_store(mock, MemoryStore::shared())
}

pub fn token_response(role: &str, tenant_id: Option<&str>) -> Value {
    json!({
        "access_token": "tok-123",
        "token_type": "bearer",
        "expires_in": 3600,
        "user": {
            "user_id": "u1",
            "email": "chu@quan.vn",
            "full_name": "Nguyễn Chủ",
            "tenant_id": tenant_id,
            "role": role
        }
    })
}

/// Log in against the mock so tenant-scoped calls work
pub async fn login(client: &GourmetClient<MockHttp>, mock: &MockHttp, role: &str, tenant_id: Option<&str>) {
    mock.ok(Method::POST, "api/auth/login", token_response(role, tenant_id));
    client.login("chu@quan.vn", "secret").await.unwrap();
}

pub fn order_json(id: &str, session: &str, status: &str, minute: u32, item: &str) -> Value {
    json!({
        "order_id": id,
        "session_id": session,
        "table_id": format!("t-{session}"),
        "table_number": format!("{session}"),
        "branch_id": "b1",
        "branch_name": "Quận 1",
        "status": status,
        "order_time": format!("2025-03-01T12:{minute:02}:00"),
        "items": [{
            "order_item_id": format!("i-{id}"),
            "menu_item_id": format!("m-{item}"),
            "menu_item_name": item,
            "quantity": 1,
            "price": 45000.0,
            "note": null
        }]
    })
}

pub fn session_details_json(session_id: &str, table_number: &str, total: f64) -> Value {
    json!({
        "session_id": session_id,
        "table_id": "t7",
        "table_number": table_number,
        "order": {
            "order_id": "a1b2c3d4-0000",
            "session_id": session_id,
            "order_time": "2025-03-01T12:10:00",
            "status": "serving",
            "items": [
                {"order_item_id": "i1", "menu_item_id": "m1", "menu_item_name": "Phở",
                 "quantity": 2, "price": 50000.0, "note": null, "subtotal": 100000.0}
            ],
            "subtotal": 100000.0,
            "vat": 10000.0,
            "total": total,
            "all_orders": []
        },
        "bill": {
            "bill_id": "bill-1",
            "session_id": session_id,
            "total_amount": total,
            "payment_method": null,
            "status": "pending",
            "bank_code": null,
            "bank_account_number": null,
            "bank_account_name": null
        }
    })
}
