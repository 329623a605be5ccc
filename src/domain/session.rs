use serde::{Deserialize, Serialize};

/// How a payment attempt ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionOutcome {
    /// Paid and recorded.
    Enrolled {
        enrollment_id: String,
        course_id: String,
    },
    /// The gateway rejected the payment.
    PaymentFailed { code: String, description: String },
    /// Money moved but the records were not written. Needs manual follow-up.
    ReconciliationFailed { payment_id: String },
    /// The widget was closed without a terminal event.
    Abandoned,
    /// Stopped before a session was opened (preconditions, SDK load, bad request).
    Aborted,
}

/// Lifecycle of the controller's single active attempt.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Idle,
    Loading,
    AwaitingGatewayResult,
    Reconciling,
    Done(SessionOutcome),
}

impl SessionPhase {
    /// True while an attempt is in flight and a new one must not start.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            SessionPhase::Loading | SessionPhase::AwaitingGatewayResult | SessionPhase::Reconciling
        )
    }
}

/// Snapshot of what the UI renders: progress plus the last error message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionState {
    pub phase: SessionPhase,
    pub error: Option<String>,
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        self.phase.is_active()
    }
}
