use serde::Serialize;
use utoipa::ToSchema;

use crate::backend::{CakeSession, SessionStatus};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HandoffView {
    pub session: Option<CakeSession>,
    pub status: Option<SessionStatus>,
    pub polling: bool,
}
