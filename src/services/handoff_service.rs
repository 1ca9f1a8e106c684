//! Kiosk-to-mobile custom cake handoff.
//!
//! The kiosk opens a backend session and shows its QR code; a phone edits the
//! design against the same token. The kiosk polls the session on a fixed
//! interval. Each tick fires its own request without waiting for the previous
//! one, so polls may overlap; the `finished` flag makes sure a completed
//! design reaches the cart exactly once.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use tokio::{task::JoinHandle, time::MissedTickBehavior};

use crate::{
    audit,
    backend::{BackendError, CakeSession, SessionStatus},
    domain::cart::CartLineItem,
    dto::handoff::HandoffView,
    error::AppResult,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Background poll loop for one session. Dropping it stops polling.
pub struct SessionPoller {
    handle: JoinHandle<()>,
    finished: Arc<AtomicBool>,
}

impl SessionPoller {
    pub fn spawn(state: AppState, session_token: String, interval: Duration) -> Self {
        let finished = Arc::new(AtomicBool::new(false));
        let flag = finished.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if flag.load(Ordering::Acquire) {
                    break;
                }
                let state = state.clone();
                let token = session_token.clone();
                let flag = flag.clone();
                tokio::spawn(async move { poll_once(&state, &token, &flag).await });
            }
            tracing::debug!(session = %session_token, "handoff polling stopped");
        });

        Self { handle, finished }
    }

    pub fn is_active(&self) -> bool {
        !self.finished.load(Ordering::Acquire) && !self.handle.is_finished()
    }
}

impl Drop for SessionPoller {
    fn drop(&mut self) {
        self.finished.store(true, Ordering::Release);
        self.handle.abort();
    }
}

#[derive(Default)]
pub struct HandoffState {
    session: Option<CakeSession>,
    status: Option<SessionStatus>,
    poller: Option<SessionPoller>,
}

impl HandoffState {
    fn view(&self) -> HandoffView {
        HandoffView {
            session: self.session.clone(),
            status: self.status,
            polling: self.poller.as_ref().is_some_and(SessionPoller::is_active),
        }
    }

    fn is_current(&self, session_token: &str) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.session_token == session_token)
    }
}

async fn poll_once(state: &AppState, session_token: &str, finished: &AtomicBool) {
    let resp = match state.backend.session_status(session_token).await {
        Ok(resp) => resp,
        Err(BackendError::Unauthorized) => {
            tracing::warn!(session = %session_token, "handoff polling lost authorization");
            finished.store(true, Ordering::Release);
            return;
        }
        Err(err) => {
            tracing::warn!(error = %err, session = %session_token, "handoff poll failed");
            return;
        }
    };

    {
        let mut handoff = state.handoff.lock().await;
        // Overlapping polls can answer out of order; a terminal status sticks.
        let settled = handoff.status.is_some_and(SessionStatus::is_terminal);
        if handoff.is_current(session_token) && !settled {
            handoff.status = Some(resp.status);
        }
    }

    match resp.status {
        SessionStatus::Completed => {
            if finished
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
            {
                return;
            }
            match resp.customization {
                Some(design) => {
                    let line = CartLineItem::custom_cake(state.config.custom_cake_item(), design);
                    state.cart.add_item(line).await;
                    tracing::info!(session = %session_token, "handoff design added to cart");
                    audit::record(
                        &state.pool,
                        "handoff_completed",
                        "custom_cake_sessions",
                        serde_json::json!({ "session_token": session_token }),
                    )
                    .await;
                }
                None => {
                    tracing::warn!(session = %session_token, "completed session carried no design");
                }
            }
        }
        SessionStatus::Expired => {
            finished.store(true, Ordering::Release);
            tracing::info!(session = %session_token, "handoff session expired");
        }
        SessionStatus::Pending | SessionStatus::InProgress => {}
    }
}

pub async fn start_handoff(state: &AppState) -> AppResult<ApiResponse<HandoffView>> {
    let session = state.backend.generate_session().await?;

    let poller = SessionPoller::spawn(
        state.clone(),
        session.session_token.clone(),
        state.config.session_poll_interval,
    );

    audit::record(
        &state.pool,
        "handoff_started",
        "custom_cake_sessions",
        serde_json::json!({ "session_token": session.session_token }),
    )
    .await;

    let (previous, view) = {
        let mut handoff = state.handoff.lock().await;
        // Replacing the poller drops (and stops) any previous one.
        handoff.poller = Some(poller);
        handoff.status = Some(SessionStatus::Pending);
        let previous = handoff.session.replace(session);
        (previous, handoff.view())
    };

    if let Some(previous) = previous {
        // The new session is already live, so a failed cancel is only logged.
        match state.backend.cancel_session(&previous.session_token).await {
            Ok(()) => tracing::debug!(session = %previous.session_token, "previous handoff cancelled"),
            Err(err) => tracing::warn!(
                error = %err,
                session = %previous.session_token,
                "failed to cancel previous handoff session"
            ),
        }
    }

    Ok(ApiResponse::success(
        "Handoff started",
        view,
        Some(Meta::empty()),
    ))
}

pub async fn handoff_status(state: &AppState) -> AppResult<ApiResponse<HandoffView>> {
    let handoff = state.handoff.lock().await;
    Ok(ApiResponse::success("OK", handoff.view(), Some(Meta::empty())))
}

pub async fn cancel_handoff(state: &AppState) -> AppResult<ApiResponse<HandoffView>> {
    let session = {
        let mut handoff = state.handoff.lock().await;
        handoff.poller = None;
        handoff.session.take()
    };

    if let Some(session) = &session {
        state.backend.cancel_session(&session.session_token).await?;
        audit::record(
            &state.pool,
            "handoff_cancelled",
            "custom_cake_sessions",
            serde_json::json!({ "session_token": session.session_token }),
        )
        .await;
    }

    let mut handoff = state.handoff.lock().await;
    handoff.status = None;
    Ok(ApiResponse::success(
        "Handoff cancelled",
        handoff.view(),
        Some(Meta::empty()),
    ))
}
