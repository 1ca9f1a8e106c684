use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    backend::BakeryBackend,
    config::AppConfig,
    db::{DbPool, OrmConn, create_orm_conn},
    domain::wizard::DesignWizard,
    services::{auth_service::AuthSession, cart_store::CartStore, handoff_service::HandoffState},
    storage::KeyValueStore,
};

/// Everything a kiosk session needs, built once at startup and handed to
/// every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub config: Arc<AppConfig>,
    pub cart: Arc<CartStore>,
    pub wizard: Arc<Mutex<DesignWizard>>,
    pub handoff: Arc<Mutex<HandoffState>>,
    pub auth: Arc<AuthSession>,
    pub backend: Arc<dyn BakeryBackend>,
}

impl AppState {
    pub fn new(
        pool: DbPool,
        config: AppConfig,
        storage: Arc<dyn KeyValueStore>,
        auth: Arc<AuthSession>,
        backend: Arc<dyn BakeryBackend>,
    ) -> Self {
        let orm = create_orm_conn(&pool);
        Self {
            pool,
            orm,
            config: Arc::new(config),
            cart: Arc::new(CartStore::new(storage)),
            wizard: Arc::new(Mutex::new(DesignWizard::default())),
            handoff: Arc::new(Mutex::new(HandoffState::default())),
            auth,
            backend,
        }
    }

    /// Load persisted client state. Must finish before the router serves.
    pub async fn hydrate(&self) {
        self.auth.hydrate().await;
        self.cart.hydrate().await;
    }
}
