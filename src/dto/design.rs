use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    cart::CartSummary,
    wizard::{DesignWizard, SubmissionTarget},
};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ResetDesignRequest {
    /// Present when this wizard completes a mobile handoff session.
    #[serde(default)]
    pub session_token: Option<String>,
}

impl ResetDesignRequest {
    pub fn target(self) -> SubmissionTarget {
        match self.session_token {
            Some(session_token) => SubmissionTarget::MobileSession { session_token },
            None => SubmissionTarget::Kiosk,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubmitDesignResponse {
    pub wizard: DesignWizard,
    /// Cart figures after a kiosk submission added the cake.
    pub cart: Option<CartSummary>,
}
