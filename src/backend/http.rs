//! reqwest implementation of [`BakeryBackend`].

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::{
    backend::{
        BackendError, BackendResult, BakeryBackend, CakeSession, CreateOrderRequest, CreatedOrder,
        CustomCakeAck, LoginRequest, LoginResponse, SessionStatusResponse,
    },
    domain::{
        catalog::{Category, MenuItem},
        design::{CakeDesign, DesignSubmission},
    },
    services::auth_service::AuthSession,
};

#[derive(Clone)]
pub struct HttpBakeryBackend {
    client: Client,
    base_url: String,
    auth: Arc<AuthSession>,
}

impl HttpBakeryBackend {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        auth: Arc<AuthSession>,
    ) -> BackendResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            auth,
        })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.auth.token().await {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> BackendResult<T> {
        let request = self.authorized(request).await;
        let response = request.send().await?;
        self.handle_response(response).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> BackendResult<T> {
        self.send(self.client.get(self.url(path))).await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> BackendResult<T> {
        self.send(self.client.post(self.url(path)).json(body)).await
    }

    /// Any 401 drops the stored token before the error reaches the caller,
    /// whichever request triggered it.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> BackendResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::UNAUTHORIZED => {
                    tracing::warn!("backend rejected credentials, clearing session");
                    self.auth.clear().await;
                    BackendError::Unauthorized
                }
                StatusCode::FORBIDDEN => BackendError::Forbidden(text),
                StatusCode::NOT_FOUND => BackendError::NotFound(text),
                StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                    BackendError::Validation(text)
                }
                _ => BackendError::Status {
                    status: status.as_u16(),
                    body: text,
                },
            });
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return serde_json::from_slice(b"null")
                .map_err(|e| BackendError::InvalidResponse(e.to_string()));
        }
        serde_json::from_slice(&bytes).map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl BakeryBackend for HttpBakeryBackend {
    async fn list_menu_items(&self) -> BackendResult<Vec<MenuItem>> {
        self.get("api/menu/items").await
    }

    async fn list_categories(&self) -> BackendResult<Vec<Category>> {
        self.get("api/menu/categories").await
    }

    async fn create_order(&self, request: &CreateOrderRequest) -> BackendResult<CreatedOrder> {
        self.post("api/orders", request).await
    }

    async fn submit_custom_cake(
        &self,
        submission: &DesignSubmission,
    ) -> BackendResult<CustomCakeAck> {
        self.post("api/custom-cakes/requests", submission).await
    }

    async fn generate_session(&self) -> BackendResult<CakeSession> {
        self.post("api/custom-cakes/sessions", &serde_json::json!({}))
            .await
    }

    async fn session_status(&self, session_token: &str) -> BackendResult<SessionStatusResponse> {
        self.get(&format!("api/custom-cakes/sessions/{session_token}"))
            .await
    }

    async fn complete_session(
        &self,
        session_token: &str,
        design: &CakeDesign,
    ) -> BackendResult<SessionStatusResponse> {
        self.post(
            &format!("api/custom-cakes/sessions/{session_token}/complete"),
            &serde_json::json!({ "customization": design }),
        )
        .await
    }

    async fn cancel_session(&self, session_token: &str) -> BackendResult<()> {
        let _: serde_json::Value = self
            .post(
                &format!("api/custom-cakes/sessions/{session_token}/cancel"),
                &serde_json::json!({}),
            )
            .await?;
        Ok(())
    }

    async fn login(&self, request: &LoginRequest) -> BackendResult<LoginResponse> {
        self.post("api/auth/login", request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::KeyValueStore;
    use crate::error::AppResult;

    struct NullStore;

    #[async_trait]
    impl KeyValueStore for NullStore {
        async fn get(&self, _key: &str) -> AppResult<Option<String>> {
            Ok(None)
        }
        async fn set(&self, _key: &str, _value: &str) -> AppResult<()> {
            Ok(())
        }
        async fn remove(&self, _key: &str) -> AppResult<()> {
            Ok(())
        }
    }

    #[test]
    fn joins_paths_without_double_slashes() {
        let auth = Arc::new(AuthSession::new(Arc::new(NullStore)));
        let backend =
            HttpBakeryBackend::new("http://bakery.local/", Duration::from_secs(1), auth).unwrap();
        assert_eq!(
            backend.url("/api/menu/items"),
            "http://bakery.local/api/menu/items"
        );
    }
}
