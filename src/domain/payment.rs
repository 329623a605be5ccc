use super::money::{Amount, Currency};
use super::user::UserContext;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

/// Optional billing details entered on the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// What the caller wants to pay for. Read-only once handed to the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub amount: Amount,
    #[serde(default)]
    pub currency: Currency,
    pub course_id: String,
    pub course_title: String,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub billing_info: Option<BillingInfo>,
}

impl PaymentRequest {
    pub fn new(
        amount: Amount,
        course_id: impl Into<String>,
        course_title: impl Into<String>,
    ) -> Self {
        Self {
            amount,
            currency: Currency::Inr,
            course_id: course_id.into(),
            course_title: course_title.into(),
            order_id: None,
            billing_info: None,
        }
    }

    pub fn with_order_id(mut self, order_id: impl Into<String>) -> Self {
        self.order_id = Some(order_id.into());
        self
    }

    pub fn with_billing_info(mut self, billing: BillingInfo) -> Self {
        self.billing_info = Some(billing);
        self
    }
}

/// Contact fields pre-filled in the checkout widget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prefill {
    pub name: String,
    pub email: String,
    pub contact: String,
}

impl Prefill {
    /// Billing info wins over the user profile; empty strings count as missing.
    pub fn resolve(billing: Option<&BillingInfo>, user: &UserContext) -> Self {
        fn pick(first: Option<&String>, second: Option<&String>) -> String {
            first
                .filter(|s| !s.is_empty())
                .or(second.filter(|s| !s.is_empty()))
                .cloned()
                .unwrap_or_default()
        }

        Self {
            name: pick(
                billing.and_then(|b| b.name.as_ref()),
                user.display_name.as_ref(),
            ),
            email: pick(billing.and_then(|b| b.email.as_ref()), user.email.as_ref()),
            contact: pick(
                billing.and_then(|b| b.phone.as_ref()),
                user.phone_number.as_ref(),
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub color: String,
}

/// The options handed to the checkout widget when a session is opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescriptor {
    pub key: String,
    /// Amount in minor units (paise).
    pub amount: i64,
    pub currency: Currency,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub order_id: String,
    pub prefill: Prefill,
    pub theme: Theme,
}

/// Data the gateway hands back after a captured payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayResponse {
    pub payment_id: String,
    pub order_id: String,
    pub signature: String,
}

/// Error payload of the gateway's `payment.failed` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayFailure {
    pub code: String,
    pub description: String,
}

/// The single terminal event of an opened checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PaymentOutcome {
    Success(GatewayResponse),
    Failure(GatewayFailure),
}

/// Creates the two ends of a session's terminal-event channel.
pub fn session_channel() -> (SessionTrigger, PendingOutcome) {
    let (tx, rx) = oneshot::channel();
    (SessionTrigger { tx }, PendingOutcome { rx })
}

/// Gateway-side handle used to fire the terminal event.
///
/// Every method consumes the trigger, so a session can never report both
/// success and failure.
#[derive(Debug)]
pub struct SessionTrigger {
    tx: oneshot::Sender<PaymentOutcome>,
}

impl SessionTrigger {
    /// Returns `false` if nobody is listening anymore.
    pub fn fire(self, outcome: PaymentOutcome) -> bool {
        self.tx.send(outcome).is_ok()
    }

    pub fn succeed(self, response: GatewayResponse) -> bool {
        self.fire(PaymentOutcome::Success(response))
    }

    pub fn fail(self, failure: GatewayFailure) -> bool {
        self.fire(PaymentOutcome::Failure(failure))
    }

    /// The user closed the widget without completing or failing the payment.
    pub fn dismiss(self) {}
}

/// Controller-side handle that resolves once the gateway fires.
#[derive(Debug)]
pub struct PendingOutcome {
    rx: oneshot::Receiver<PaymentOutcome>,
}

impl PendingOutcome {
    /// Waits for the terminal event. `None` means the session was abandoned.
    pub async fn wait(self) -> Option<PaymentOutcome> {
        self.rx.await.ok()
    }
}
