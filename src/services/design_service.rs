use crate::{
    audit,
    domain::{
        cart::CartLineItem,
        design::DesignPatch,
        wizard::{DesignWizard, PendingSubmission, SubmissionReceipt, SubmissionTarget},
    },
    dto::design::SubmitDesignResponse,
    error::AppResult,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn current(state: &AppState) -> AppResult<ApiResponse<DesignWizard>> {
    let wizard = state.wizard.lock().await.clone();
    Ok(ApiResponse::success("OK", wizard, Some(Meta::empty())))
}

pub async fn update_design(
    state: &AppState,
    patch: DesignPatch,
) -> AppResult<ApiResponse<DesignWizard>> {
    let mut wizard = state.wizard.lock().await;
    wizard.update_design(patch)?;
    Ok(ApiResponse::success("OK", wizard.clone(), None))
}

pub async fn next_step(state: &AppState) -> AppResult<ApiResponse<DesignWizard>> {
    let mut wizard = state.wizard.lock().await;
    let step = wizard.advance()?;
    tracing::debug!(?step, "wizard advanced");
    Ok(ApiResponse::success("OK", wizard.clone(), None))
}

pub async fn previous_step(state: &AppState) -> AppResult<ApiResponse<DesignWizard>> {
    let mut wizard = state.wizard.lock().await;
    wizard.back()?;
    Ok(ApiResponse::success("OK", wizard.clone(), None))
}

pub async fn reset(
    state: &AppState,
    target: SubmissionTarget,
) -> AppResult<ApiResponse<DesignWizard>> {
    let mut wizard = state.wizard.lock().await;
    wizard.reset(target);
    Ok(ApiResponse::success("New design", wizard.clone(), None))
}

/// Hand the finished design to the backend. The wizard lock is released while
/// the request is in flight; the wizard refuses edits and a second submission
/// until this one settles. If the wizard was reset meanwhile, the late result
/// leaves the new design alone.
pub async fn submit(state: &AppState) -> AppResult<ApiResponse<SubmitDesignResponse>> {
    let PendingSubmission {
        ticket,
        submission,
        target,
    } = state.wizard.lock().await.begin_submission()?;

    let outcome = match &target {
        SubmissionTarget::Kiosk => state
            .backend
            .submit_custom_cake(&submission)
            .await
            .map(|ack| SubmissionReceipt {
                reference: ack.request_id,
                status: ack.status,
            }),
        SubmissionTarget::MobileSession { session_token } => state
            .backend
            .complete_session(session_token, &submission.design)
            .await
            .map(|resp| SubmissionReceipt {
                reference: session_token.clone(),
                status: serde_json::to_value(resp.status)
                    .ok()
                    .and_then(|v| v.as_str().map(str::to_string))
                    .unwrap_or_else(|| "completed".to_string()),
            }),
    };

    let receipt = match outcome {
        Ok(receipt) => receipt,
        Err(err) => {
            tracing::warn!(error = %err, "custom cake submission failed");
            if !state
                .wizard
                .lock()
                .await
                .fail_submission(ticket, err.to_string())
            {
                tracing::debug!("wizard was reset during submission, failure not recorded");
            }
            return Err(err.into());
        }
    };

    audit::record(
        &state.pool,
        "custom_cake_submitted",
        "custom_cakes",
        serde_json::json!({ "reference": receipt.reference, "status": receipt.status }),
    )
    .await;

    let wizard = {
        let mut wizard = state.wizard.lock().await;
        if !wizard.complete_submission(ticket, receipt) {
            tracing::info!("wizard was reset during submission, keeping the new design");
        }
        wizard.clone()
    };

    // The backend holds the request either way, so the cake is sold even if
    // the wizard moved on.
    let cart = match target {
        SubmissionTarget::Kiosk => {
            let line =
                CartLineItem::custom_cake(state.config.custom_cake_item(), submission.design);
            Some(state.cart.add_item(line).await.summary())
        }
        SubmissionTarget::MobileSession { .. } => None,
    };

    Ok(ApiResponse::success(
        "Design submitted",
        SubmitDesignResponse { wizard, cart },
        Some(Meta::empty()),
    ))
}
