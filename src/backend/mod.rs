//! Client side of the bakery backend: catalog reads, order creation,
//! custom-cake requests, handoff sessions and login.

use async_trait::async_trait;

use crate::domain::design::{CakeDesign, DesignSubmission};

pub mod error;
pub mod http;
pub mod types;

pub use error::{BackendError, BackendResult};
pub use http::HttpBakeryBackend;
pub use types::*;

use crate::domain::catalog::{Category, MenuItem};

#[async_trait]
pub trait BakeryBackend: Send + Sync {
    async fn list_menu_items(&self) -> BackendResult<Vec<MenuItem>>;

    async fn list_categories(&self) -> BackendResult<Vec<Category>>;

    async fn create_order(&self, request: &CreateOrderRequest) -> BackendResult<CreatedOrder>;

    async fn submit_custom_cake(&self, submission: &DesignSubmission)
    -> BackendResult<CustomCakeAck>;

    async fn generate_session(&self) -> BackendResult<CakeSession>;

    async fn session_status(&self, session_token: &str) -> BackendResult<SessionStatusResponse>;

    async fn complete_session(
        &self,
        session_token: &str,
        design: &CakeDesign,
    ) -> BackendResult<SessionStatusResponse>;

    async fn cancel_session(&self, session_token: &str) -> BackendResult<()>;

    async fn login(&self, request: &LoginRequest) -> BackendResult<LoginResponse>;
}
