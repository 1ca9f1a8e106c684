#![allow(dead_code)]

use std::{
    str::FromStr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use bakery_kiosk::{
    backend::{
        BackendError, BackendResult, BakeryBackend, CakeSession, CreateOrderRequest, CreatedOrder,
        CustomCakeAck, LoginRequest, LoginResponse, SessionStatus, SessionStatusResponse,
    },
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    domain::{
        catalog::{Category, MenuItem, MenuItemStatus},
        design::{CakeDesign, DesignSubmission},
    },
    routes::create_app,
    services::auth_service::AuthSession,
    state::AppState,
    storage::{KeyValueStore, SqlKeyValueStore},
};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::Value;
use tokio::sync::Notify;
use tower::ServiceExt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    None,
    Unauthorized,
    Unavailable,
}

/// In-process stand-in for the bakery backend. A rejected token is cleared
/// from the session the same way the HTTP client does it.
pub struct FakeBackend {
    pub auth: Arc<AuthSession>,
    pub order_failure: Mutex<Failure>,
    pub submit_failure: Mutex<Failure>,
    /// When set, custom-cake submissions wait here before answering.
    pub submit_gate: Mutex<Option<Arc<Notify>>>,
    pub session: Mutex<SessionStatusResponse>,
    pub orders: Mutex<Vec<CreateOrderRequest>>,
    pub submissions: Mutex<Vec<DesignSubmission>>,
    pub completed_sessions: Mutex<Vec<(String, CakeDesign)>>,
    pub status_calls: AtomicUsize,
    pub cancelled: AtomicBool,
    pub cancelled_sessions: AtomicUsize,
}

impl FakeBackend {
    pub fn new(auth: Arc<AuthSession>) -> Self {
        Self {
            auth,
            order_failure: Mutex::new(Failure::None),
            submit_failure: Mutex::new(Failure::None),
            submit_gate: Mutex::new(None),
            session: Mutex::new(SessionStatusResponse {
                status: SessionStatus::Pending,
                customization: None,
            }),
            orders: Mutex::new(Vec::new()),
            submissions: Mutex::new(Vec::new()),
            completed_sessions: Mutex::new(Vec::new()),
            status_calls: AtomicUsize::new(0),
            cancelled: AtomicBool::new(false),
            cancelled_sessions: AtomicUsize::new(0),
        }
    }

    async fn check(&self, failure: Failure) -> BackendResult<()> {
        match failure {
            Failure::None => Ok(()),
            Failure::Unauthorized => {
                self.auth.clear().await;
                Err(BackendError::Unauthorized)
            }
            Failure::Unavailable => Err(BackendError::Status {
                status: 503,
                body: "maintenance".to_string(),
            }),
        }
    }
}

#[async_trait]
impl BakeryBackend for FakeBackend {
    async fn list_menu_items(&self) -> BackendResult<Vec<MenuItem>> {
        Ok(vec![
            menu_item(1, "Ube Roll", 2, "50", MenuItemStatus::Available, 10),
            menu_item(2, "Pandesal", 1, "70", MenuItemStatus::Available, 0),
            menu_item(3, "Mango Cake", 2, "450", MenuItemStatus::OutOfStock, 0),
        ])
    }

    async fn list_categories(&self) -> BackendResult<Vec<Category>> {
        Ok(vec![Category {
            id: 2,
            name: "Cakes".to_string(),
            description: None,
            image: None,
        }])
    }

    async fn create_order(&self, request: &CreateOrderRequest) -> BackendResult<CreatedOrder> {
        let failure = *self.order_failure.lock().unwrap();
        self.check(failure).await?;

        let mut orders = self.orders.lock().unwrap();
        orders.push(request.clone());
        Ok(CreatedOrder {
            order_id: orders.len() as i64,
            verification_code: "KSK-0001".to_string(),
            subtotal: Decimal::from(170),
            tax: Decimal::ZERO,
            total: Decimal::from(170),
            status: Some("pending".to_string()),
        })
    }

    async fn submit_custom_cake(
        &self,
        submission: &DesignSubmission,
    ) -> BackendResult<CustomCakeAck> {
        let gate = self.submit_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        let failure = *self.submit_failure.lock().unwrap();
        self.check(failure).await?;

        self.submissions.lock().unwrap().push(submission.clone());
        Ok(CustomCakeAck {
            request_id: "CC-42".to_string(),
            status: "pending_review".to_string(),
        })
    }

    async fn generate_session(&self) -> BackendResult<CakeSession> {
        Ok(CakeSession {
            session_token: "sess-abc".to_string(),
            qr_code_url: Some("https://bakery.test/qr/sess-abc".to_string()),
            expires_at: chrono::Utc::now() + chrono::Duration::minutes(30),
        })
    }

    async fn session_status(&self, _session_token: &str) -> BackendResult<SessionStatusResponse> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.session.lock().unwrap().clone())
    }

    async fn complete_session(
        &self,
        session_token: &str,
        design: &CakeDesign,
    ) -> BackendResult<SessionStatusResponse> {
        self.completed_sessions
            .lock()
            .unwrap()
            .push((session_token.to_string(), design.clone()));
        Ok(SessionStatusResponse {
            status: SessionStatus::Completed,
            customization: Some(design.clone()),
        })
    }

    async fn cancel_session(&self, _session_token: &str) -> BackendResult<()> {
        self.cancelled.store(true, Ordering::SeqCst);
        self.cancelled_sessions.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn login(&self, request: &LoginRequest) -> BackendResult<LoginResponse> {
        if request.password == "secret" {
            Ok(LoginResponse {
                token: "Bearer staff-token".to_string(),
            })
        } else {
            Err(BackendError::Unauthorized)
        }
    }
}

fn menu_item(
    id: i64,
    name: &str,
    category_id: i64,
    price: &str,
    status: MenuItemStatus,
    stock: i64,
) -> MenuItem {
    MenuItem {
        id,
        name: name.to_string(),
        description: None,
        category_id: Some(category_id),
        current_price: Decimal::from_str(price).unwrap(),
        status,
        is_infinite_stock: id == 2,
        stock_quantity: stock,
        image: None,
    }
}

pub struct TestApp {
    pub state: AppState,
    pub backend: Arc<FakeBackend>,
    pub storage: Arc<dyn KeyValueStore>,
}

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        backend_url: "http://backend.test".to_string(),
        backend_timeout: Duration::from_secs(1),
        session_poll_interval: Duration::from_millis(10),
        custom_cake_menu_item_id: 99,
        custom_cake_base_price: Decimal::from(500),
    }
}

pub async fn spawn_app() -> anyhow::Result<TestApp> {
    let config = test_config();
    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    let storage: Arc<dyn KeyValueStore> = Arc::new(SqlKeyValueStore::new(create_orm_conn(&pool)));
    let auth = Arc::new(AuthSession::new(storage.clone()));
    let backend = Arc::new(FakeBackend::new(auth.clone()));

    let state = AppState::new(pool, config, storage.clone(), auth, backend.clone());
    state.hydrate().await;

    Ok(TestApp {
        state,
        backend,
        storage,
    })
}

impl TestApp {
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = create_app(self.state.clone())
            .oneshot(request)
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PATCH, uri, Some(body)).await
    }
}

pub fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => Decimal::from_str(s).unwrap(),
        other => Decimal::from_str(&other.to_string()).unwrap(),
    }
}

pub fn cart_line(id: i64, name: &str, price: &str, quantity: u32) -> Value {
    serde_json::json!({
        "menu_item": { "id": id, "name": name, "base_price": price, "kind": "pastry" },
        "quantity": quantity,
    })
}
