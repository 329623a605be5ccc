use super::reconciler::{EnrollmentReconciler, Reconciliation, build_records};
use crate::config::GatewayConfig;
use crate::domain::money::Currency;
use crate::domain::payment::{
    PaymentOutcome, PaymentRequest, PendingOutcome, Prefill, SessionDescriptor, Theme,
};
use crate::domain::ports::{
    CheckoutGateway, CheckoutGatewayBox, EnrollmentStoreBox, ScriptLoad, ScriptLoader,
    ScriptLoaderBox,
};
use crate::domain::session::{SessionOutcome, SessionPhase, SessionState};
use crate::domain::user::UserContext;
use crate::error::{CheckoutError, Result};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Invoked with `(enrollment_id, course_id)` once a payment is recorded.
pub type SuccessCallback = Arc<dyn Fn(&str, &str) + Send + Sync>;

/// Drives one payment attempt at a time from widget load to enrollment.
///
/// `is_loading` and `error` can be read synchronously at any point and
/// always reflect the latest transition. A new attempt is refused while
/// another one is still in flight.
pub struct PaymentController {
    config: GatewayConfig,
    user: Option<UserContext>,
    loader: ScriptLoaderBox,
    gateway: CheckoutGatewayBox,
    reconciler: Arc<EnrollmentReconciler>,
    on_success: Option<SuccessCallback>,
    state: SharedState,
}

impl PaymentController {
    pub fn new(
        config: GatewayConfig,
        loader: ScriptLoaderBox,
        gateway: CheckoutGatewayBox,
        store: EnrollmentStoreBox,
    ) -> Self {
        Self {
            config,
            user: None,
            loader,
            gateway,
            reconciler: Arc::new(EnrollmentReconciler::new(store)),
            on_success: None,
            state: SharedState::default(),
        }
    }

    pub fn with_user(mut self, user: Option<UserContext>) -> Self {
        self.user = user;
        self
    }

    pub fn with_success_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str, &str) + Send + Sync + 'static,
    {
        self.on_success = Some(Arc::new(callback));
        self
    }

    pub fn state(&self) -> SessionState {
        self.state.snapshot()
    }

    pub fn is_loading(&self) -> bool {
        self.state.snapshot().is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.state.snapshot().error
    }

    /// Starts a payment and reports only whether the checkout was opened.
    ///
    /// `true` does not mean the payment succeeded; use [`Self::initiate`] to
    /// wait for the final outcome.
    pub async fn initialize_payment(&self, details: PaymentRequest) -> bool {
        self.initiate(details).await.is_ok()
    }

    /// Loads the checkout SDK, opens a session and returns a handle to its
    /// eventual outcome.
    ///
    /// Terminal events are handled on a background task, so the handle may be
    /// dropped without losing the enrollment.
    pub async fn initiate(&self, details: PaymentRequest) -> Result<PaymentHandle> {
        let (user, key) = match self.preconditions() {
            Ok(found) => found,
            Err(e) => {
                warn!(course_id = %details.course_id, error = %e, "payment refused");
                return Err(self.state.refuse(e));
            }
        };

        if !self.state.try_begin() {
            warn!(course_id = %details.course_id, "payment already in progress");
            return Err(CheckoutError::SessionInProgress);
        }

        if let ScriptLoad::Failed(reason) = self.loader.load(&self.config.checkout_url).await {
            return Err(self.state.abort(CheckoutError::ScriptLoad(reason)));
        }

        let amount = details
            .amount
            .to_minor_units()
            .map_err(|e| self.state.abort(e))?;
        let descriptor = self.descriptor(key, &user, &details, amount);

        let pending = self
            .gateway
            .open_session(descriptor)
            .await
            .map_err(|e| {
                let e = match e {
                    CheckoutError::GatewayUnavailable(_) => e,
                    other => CheckoutError::GatewayUnavailable(other.to_string()),
                };
                self.state.abort(e)
            })?;

        self.state.set_phase(SessionPhase::AwaitingGatewayResult);
        info!(course_id = %details.course_id, amount, "checkout session opened");

        let settlement = Settlement {
            state: self.state.clone(),
            reconciler: self.reconciler.clone(),
            on_success: self.on_success.clone(),
            user,
            details,
        };
        Ok(PaymentHandle {
            join: tokio::spawn(settlement.run(pending)),
        })
    }

    fn preconditions(&self) -> Result<(UserContext, String)> {
        let user = self.user.clone().ok_or(CheckoutError::Unauthenticated)?;
        let key = self
            .config
            .key()
            .map(str::to_string)
            .ok_or(CheckoutError::MissingGatewayKey)?;
        Ok((user, key))
    }

    fn descriptor(
        &self,
        key: String,
        user: &UserContext,
        details: &PaymentRequest,
        amount: i64,
    ) -> SessionDescriptor {
        SessionDescriptor {
            key,
            amount,
            currency: Currency::Inr,
            name: self.config.merchant_name.clone(),
            description: format!("Enrollment for {}", details.course_title),
            image: self.config.image_url.clone(),
            order_id: details.order_id.clone().unwrap_or_default(),
            prefill: Prefill::resolve(details.billing_info.as_ref(), user),
            theme: Theme {
                color: self.config.theme_color.clone(),
            },
        }
    }
}

/// Handle to the final outcome of an opened checkout session.
#[derive(Debug)]
pub struct PaymentHandle {
    join: JoinHandle<SessionOutcome>,
}

impl PaymentHandle {
    pub async fn outcome(self) -> Result<SessionOutcome> {
        self.join
            .await
            .map_err(|e| CheckoutError::InternalError(format!("settlement task failed: {}", e)))
    }
}

/// Everything the background task needs once the session is open.
struct Settlement {
    state: SharedState,
    reconciler: Arc<EnrollmentReconciler>,
    on_success: Option<SuccessCallback>,
    user: UserContext,
    details: PaymentRequest,
}

impl Settlement {
    async fn run(self, pending: PendingOutcome) -> SessionOutcome {
        match pending.wait().await {
            Some(PaymentOutcome::Success(response)) => {
                self.state.set_phase(SessionPhase::Reconciling);
                let (enrollment, payment) = build_records(&self.user, &self.details, &response);

                match self.reconciler.reconcile(enrollment, payment).await {
                    Reconciliation::Recorded(receipt) => {
                        self.notify(&receipt.enrollment_id);
                        self.state.finish(
                            SessionOutcome::Enrolled {
                                enrollment_id: receipt.enrollment_id,
                                course_id: self.details.course_id.clone(),
                            },
                            None,
                        )
                    }
                    Reconciliation::Failed(_) => self.state.finish(
                        SessionOutcome::ReconciliationFailed {
                            payment_id: response.payment_id,
                        },
                        Some(CheckoutError::ReconciliationFailed),
                    ),
                }
            }
            Some(PaymentOutcome::Failure(failure)) => {
                error!(
                    course_id = %self.details.course_id,
                    code = %failure.code,
                    description = %failure.description,
                    "gateway reported payment failure"
                );
                self.state.finish(
                    SessionOutcome::PaymentFailed {
                        code: failure.code.clone(),
                        description: failure.description.clone(),
                    },
                    Some(CheckoutError::PaymentFailed {
                        code: failure.code,
                        description: failure.description,
                    }),
                )
            }
            None => {
                warn!(course_id = %self.details.course_id, "checkout closed without a result");
                self.state
                    .finish(SessionOutcome::Abandoned, Some(CheckoutError::PaymentAbandoned))
            }
        }
    }

    fn notify(&self, enrollment_id: &str) {
        let Some(callback) = &self.on_success else {
            return;
        };
        let course_id = self.details.course_id.as_str();
        if catch_unwind(AssertUnwindSafe(|| callback(enrollment_id, course_id))).is_err() {
            error!(%enrollment_id, %course_id, "success callback panicked");
        }
    }
}

/// Session state shared between the controller and its settlement task.
#[derive(Clone, Default)]
struct SharedState {
    inner: Arc<RwLock<SessionState>>,
}

impl SharedState {
    fn snapshot(&self) -> SessionState {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn update<T>(&self, f: impl FnOnce(&mut SessionState) -> T) -> T {
        let mut state = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut *state)
    }

    /// Moves to `Loading` and clears the previous error, unless an attempt is active.
    fn try_begin(&self) -> bool {
        self.update(|state| {
            if state.phase.is_active() {
                return false;
            }
            state.phase = SessionPhase::Loading;
            state.error = None;
            true
        })
    }

    fn set_phase(&self, phase: SessionPhase) {
        self.update(|state| state.phase = phase);
    }

    /// Records an error raised before any attempt started.
    fn refuse(&self, err: CheckoutError) -> CheckoutError {
        self.update(|state| {
            if !state.phase.is_active() {
                state.phase = SessionPhase::Done(SessionOutcome::Aborted);
            }
            state.error = Some(err.to_string());
        });
        err
    }

    /// Ends the current attempt before a session was opened.
    fn abort(&self, err: CheckoutError) -> CheckoutError {
        self.update(|state| {
            state.phase = SessionPhase::Done(SessionOutcome::Aborted);
            state.error = Some(err.to_string());
        });
        err
    }

    fn finish(&self, outcome: SessionOutcome, err: Option<CheckoutError>) -> SessionOutcome {
        self.update(|state| {
            state.phase = SessionPhase::Done(outcome.clone());
            if let Some(err) = err {
                state.error = Some(err.to_string());
            }
        });
        outcome
    }
}
