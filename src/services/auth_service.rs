use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    audit,
    backend::{LoginRequest, LoginResponse},
    error::AppResult,
    response::{ApiResponse, Meta},
    state::AppState,
    storage::KeyValueStore,
};

pub const AUTH_TOKEN_STORAGE_KEY: &str = "auth_token";

/// Bearer token for the bakery backend, mirrored into local storage so a
/// restarted kiosk keeps its session.
pub struct AuthSession {
    token: RwLock<Option<String>>,
    storage: Arc<dyn KeyValueStore>,
}

impl AuthSession {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            token: RwLock::new(None),
            storage,
        }
    }

    pub async fn hydrate(&self) {
        match self.storage.get(AUTH_TOKEN_STORAGE_KEY).await {
            Ok(stored) => *self.token.write().await = stored,
            Err(err) => tracing::warn!(error = %err, "failed to read stored auth token"),
        }
    }

    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub async fn store(&self, token: String) {
        if let Err(err) = self.storage.set(AUTH_TOKEN_STORAGE_KEY, &token).await {
            tracing::warn!(error = %err, "failed to persist auth token");
        }
        *self.token.write().await = Some(token);
    }

    pub async fn clear(&self) {
        *self.token.write().await = None;
        if let Err(err) = self.storage.remove(AUTH_TOKEN_STORAGE_KEY).await {
            tracing::warn!(error = %err, "failed to remove stored auth token");
        }
    }
}

/// Backends answer either with a bare token or with a `Bearer ` prefix.
fn bare_token(token: &str) -> String {
    token.trim_start_matches("Bearer ").trim().to_string()
}

pub async fn login(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let username = payload.username.clone();
    let resp = state.backend.login(&payload).await?;
    state.auth.store(bare_token(&resp.token)).await;

    audit::record(
        &state.pool,
        "staff_login",
        "auth",
        serde_json::json!({ "username": username }),
    )
    .await;

    Ok(ApiResponse::success("Logged in", resp, Some(Meta::empty())))
}

pub async fn logout(state: &AppState) -> AppResult<ApiResponse<serde_json::Value>> {
    state.auth.clear().await;
    audit::record(&state.pool, "staff_logout", "auth", serde_json::json!({})).await;

    Ok(ApiResponse::success(
        "Logged out",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_bearer_prefix() {
        assert_eq!(bare_token("Bearer abc.def"), "abc.def");
        assert_eq!(bare_token("abc.def"), "abc.def");
    }
}
