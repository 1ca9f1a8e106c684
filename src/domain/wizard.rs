//! Step-gated custom cake wizard.
//!
//! Steps run strictly in order. Moving forward requires the current step's
//! fields; moving back is always allowed until the design is submitted.
//! `Submitted` is only reached after the backend acknowledges the design.
//!
//! The backend call runs without the wizard lock, so each submission carries
//! a [`SubmissionTicket`]. Only the ticket currently in flight may finish the
//! submission; a result arriving after a reset is ignored.

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;
use utoipa::ToSchema;

use crate::domain::design::{
    CakeDesign, DesignPatch, DesignSubmission, MAX_CAKE_TEXT_CHARS, MAX_CANDLES, MAX_LAYERS,
    MIN_LAYERS, is_hex_color,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    CustomerInfo,
    Layers,
    Flavor,
    Size,
    Frosting,
    Text,
    Review,
    Submitted,
}

impl WizardStep {
    pub fn next(self) -> Option<Self> {
        match self {
            WizardStep::CustomerInfo => Some(WizardStep::Layers),
            WizardStep::Layers => Some(WizardStep::Flavor),
            WizardStep::Flavor => Some(WizardStep::Size),
            WizardStep::Size => Some(WizardStep::Frosting),
            WizardStep::Frosting => Some(WizardStep::Text),
            WizardStep::Text => Some(WizardStep::Review),
            WizardStep::Review | WizardStep::Submitted => None,
        }
    }

    pub fn previous(self) -> Option<Self> {
        match self {
            WizardStep::CustomerInfo | WizardStep::Submitted => None,
            WizardStep::Layers => Some(WizardStep::CustomerInfo),
            WizardStep::Flavor => Some(WizardStep::Layers),
            WizardStep::Size => Some(WizardStep::Flavor),
            WizardStep::Frosting => Some(WizardStep::Size),
            WizardStep::Text => Some(WizardStep::Frosting),
            WizardStep::Review => Some(WizardStep::Text),
        }
    }

    /// Fields this step requires before the wizard may leave it.
    pub fn missing_fields(self, design: &CakeDesign) -> Vec<String> {
        let mut missing = Vec::new();
        match self {
            WizardStep::CustomerInfo => {
                if design.customer_name.trim().is_empty() {
                    missing.push("customer_name".to_string());
                }
                if design.customer_email.trim().is_empty() {
                    missing.push("customer_email".to_string());
                }
                if design.customer_phone.trim().is_empty() {
                    missing.push("customer_phone".to_string());
                }
            }
            WizardStep::Layers => {
                if !(MIN_LAYERS..=MAX_LAYERS).contains(&design.num_layers) {
                    missing.push("num_layers".to_string());
                }
            }
            WizardStep::Flavor => {
                for number in 1..=design.num_layers {
                    if design.layer(number).and_then(|l| l.flavor_id).is_none() {
                        missing.push(format!("layer_{number}_flavor_id"));
                    }
                }
            }
            WizardStep::Size => {
                for number in 1..=design.num_layers {
                    if design.layer(number).and_then(|l| l.size_id).is_none() {
                        missing.push(format!("layer_{number}_size_id"));
                    }
                }
            }
            WizardStep::Frosting => {
                if !is_hex_color(&design.frosting_color) {
                    missing.push("frosting_color".to_string());
                }
            }
            WizardStep::Text => {
                if design
                    .cake_text
                    .as_ref()
                    .is_some_and(|text| text.chars().count() > MAX_CAKE_TEXT_CHARS)
                {
                    missing.push("cake_text".to_string());
                }
                if design.candles_count > MAX_CANDLES {
                    missing.push("candles_count".to_string());
                }
            }
            WizardStep::Review | WizardStep::Submitted => {}
        }
        missing
    }
}

/// Where a finished design goes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubmissionTarget {
    /// Submitted as a custom-cake request and added to this kiosk's cart.
    #[default]
    Kiosk,
    /// Completes a handoff session opened by a kiosk QR code.
    MobileSession { session_token: String },
}

/// What the backend acknowledged for a submitted design.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SubmissionReceipt {
    pub reference: String,
    pub status: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("step {step:?} is incomplete: {}", .missing.join(", "))]
    StepIncomplete {
        step: WizardStep,
        missing: Vec<String>,
    },

    #[error("design can only be submitted from the review step")]
    NotAtReview,

    #[error("cannot move past the {0:?} step")]
    NoNextStep(WizardStep),

    #[error("design was already submitted")]
    AlreadySubmitted,

    #[error("design is being submitted")]
    SubmissionInFlight,
}

/// Identifies one submission attempt. Tickets are never reused within a
/// wizard, resets included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionTicket(u64);

/// Everything the service needs to run a submission outside the lock.
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    pub ticket: SubmissionTicket,
    pub submission: DesignSubmission,
    pub target: SubmissionTarget,
}

fn in_flight_flag<S: Serializer>(
    in_flight: &Option<SubmissionTicket>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_bool(in_flight.is_some())
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DesignWizard {
    step: WizardStep,
    design: CakeDesign,
    target: SubmissionTarget,
    last_error: Option<String>,
    receipt: Option<SubmissionReceipt>,
    #[serde(rename = "submitting", serialize_with = "in_flight_flag")]
    #[schema(value_type = bool)]
    in_flight: Option<SubmissionTicket>,
    #[serde(skip)]
    tickets_issued: u64,
}

impl Default for DesignWizard {
    fn default() -> Self {
        Self::new(SubmissionTarget::Kiosk)
    }
}

impl DesignWizard {
    pub fn new(target: SubmissionTarget) -> Self {
        Self {
            step: WizardStep::CustomerInfo,
            design: CakeDesign::default(),
            target,
            last_error: None,
            receipt: None,
            in_flight: None,
            tickets_issued: 0,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn design(&self) -> &CakeDesign {
        &self.design
    }

    pub fn target(&self) -> &SubmissionTarget {
        &self.target
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    fn ensure_editable(&self) -> Result<(), WizardError> {
        if self.step == WizardStep::Submitted {
            return Err(WizardError::AlreadySubmitted);
        }
        if self.in_flight.is_some() {
            return Err(WizardError::SubmissionInFlight);
        }
        Ok(())
    }

    pub fn receipt(&self) -> Option<&SubmissionReceipt> {
        self.receipt.as_ref()
    }

    pub fn update_design(&mut self, patch: DesignPatch) -> Result<(), WizardError> {
        self.ensure_editable()?;
        self.design.apply(patch);
        Ok(())
    }

    pub fn advance(&mut self) -> Result<WizardStep, WizardError> {
        if self.in_flight.is_some() {
            return Err(WizardError::SubmissionInFlight);
        }
        let next = self.step.next().ok_or(WizardError::NoNextStep(self.step))?;
        let missing = self.step.missing_fields(&self.design);
        if !missing.is_empty() {
            return Err(WizardError::StepIncomplete {
                step: self.step,
                missing,
            });
        }
        self.step = next;
        self.last_error = None;
        Ok(next)
    }

    pub fn back(&mut self) -> Result<WizardStep, WizardError> {
        self.ensure_editable()?;
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        Ok(self.step)
    }

    /// Snapshot the design for submission and mark it in flight. Every gate
    /// is re-checked, since the design may have been patched after its step
    /// was passed.
    pub fn begin_submission(&mut self) -> Result<PendingSubmission, WizardError> {
        match self.step {
            WizardStep::Review => {}
            WizardStep::Submitted => return Err(WizardError::AlreadySubmitted),
            _ => return Err(WizardError::NotAtReview),
        }
        if self.in_flight.is_some() {
            return Err(WizardError::SubmissionInFlight);
        }

        let mut step = WizardStep::CustomerInfo;
        while step != WizardStep::Review {
            let missing = step.missing_fields(&self.design);
            if !missing.is_empty() {
                return Err(WizardError::StepIncomplete { step, missing });
            }
            step = step.next().unwrap_or(WizardStep::Review);
        }

        self.tickets_issued += 1;
        let ticket = SubmissionTicket(self.tickets_issued);
        self.in_flight = Some(ticket);
        Ok(PendingSubmission {
            ticket,
            submission: DesignSubmission::from_design(&self.design),
            target: self.target.clone(),
        })
    }

    fn settle(&mut self, ticket: SubmissionTicket) -> bool {
        if self.in_flight != Some(ticket) {
            return false;
        }
        self.in_flight = None;
        true
    }

    /// Backend accepted the design: discard it and keep only the receipt.
    /// Returns `false` and changes nothing for a stale ticket.
    pub fn complete_submission(
        &mut self,
        ticket: SubmissionTicket,
        receipt: SubmissionReceipt,
    ) -> bool {
        if !self.settle(ticket) {
            return false;
        }
        self.step = WizardStep::Submitted;
        self.design = CakeDesign::default();
        self.last_error = None;
        self.receipt = Some(receipt);
        true
    }

    /// Backend rejected the design: it stays on review, untouched. Returns
    /// `false` and changes nothing for a stale ticket.
    pub fn fail_submission(&mut self, ticket: SubmissionTicket, error: impl Into<String>) -> bool {
        if !self.settle(ticket) {
            return false;
        }
        self.last_error = Some(error.into());
        true
    }

    /// Start over. A submission still in flight becomes stale.
    pub fn reset(&mut self, target: SubmissionTarget) {
        let tickets_issued = self.tickets_issued;
        *self = Self::new(target);
        self.tickets_issued = tickets_issued;
    }
}
