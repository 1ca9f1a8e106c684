use axum::extract::FromRequestParts;

use crate::{error::AppError, state::AppState};

/// Proof that the kiosk holds a backend session. Handlers that call
/// authenticated backend endpoints take this extractor so the UI gets a 401
/// (and redirects to login) before any request is attempted.
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub token: String,
}

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = state.auth.token().await.ok_or(AppError::Unauthorized)?;
        Ok(Authenticated { token })
    }
}
