use crate::domain::enrollment::{EnrollmentReceipt, EnrollmentRecord, PaymentRecord, StoreResponse};
use crate::domain::payment::{
    PaymentOutcome, PendingOutcome, SessionDescriptor, SessionTrigger, session_channel,
};
use crate::domain::ports::{CheckoutGateway, EnrollmentStore, ResourceFetcher};
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Collections {
    enrollments: HashMap<String, EnrollmentRecord>,
    payments: HashMap<String, PaymentRecord>,
}

/// A thread-safe in-memory enrollment store.
///
/// Both collections sit behind a single `RwLock`, so an enrollment and its
/// payment become visible together or not at all. Payments are keyed by the
/// gateway payment id, which makes a replayed success callback a no-op.
#[derive(Default, Clone)]
pub struct InMemoryEnrollmentStore {
    collections: Arc<RwLock<Collections>>,
    failing: Arc<AtomicBool>,
}

impl InMemoryEnrollmentStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes fail, for exercising the reconciliation error path.
    pub fn failing() -> Self {
        let store = Self::default();
        store.set_failing(true);
        store
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn enrollment(&self, enrollment_id: &str) -> Option<EnrollmentRecord> {
        self.collections
            .read()
            .await
            .enrollments
            .get(enrollment_id)
            .cloned()
    }

    pub async fn payment(&self, payment_id: &str) -> Option<PaymentRecord> {
        self.collections
            .read()
            .await
            .payments
            .get(payment_id)
            .cloned()
    }

    /// Number of recorded enrollments.
    pub async fn len(&self) -> usize {
        self.collections.read().await.enrollments.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl EnrollmentStore for InMemoryEnrollmentStore {
    async fn create_enrollment_with_payment(
        &self,
        enrollment: EnrollmentRecord,
        payment: PaymentRecord,
    ) -> Result<StoreResponse> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CheckoutError::StoreError(
                "in-memory store is unavailable".to_string(),
            ));
        }

        let payment_id = payment.gateway_data.payment_id.clone();
        let mut collections = self.collections.write().await;
        if collections.payments.contains_key(&payment_id) {
            return Err(CheckoutError::DuplicatePayment(payment_id));
        }

        let enrollment_id = Uuid::new_v4().to_string();
        collections
            .enrollments
            .insert(enrollment_id.clone(), enrollment);
        collections.payments.insert(payment_id.clone(), payment);

        Ok(StoreResponse::recorded(EnrollmentReceipt {
            enrollment_id,
            payment_id,
            recorded_at: Utc::now(),
        }))
    }
}

#[derive(Default)]
struct GatewayInner {
    opened: Vec<SessionDescriptor>,
    triggers: VecDeque<SessionTrigger>,
    scripted: VecDeque<Option<PaymentOutcome>>,
    unavailable: bool,
}

/// A stand-in for the checkout widget.
///
/// Every opened session is recorded. Sessions resolve with the queued
/// outcomes in order; once the queue is empty, the session's trigger is kept
/// so the caller can fire the terminal event later.
#[derive(Default, Clone)]
pub struct InMemoryGateway {
    inner: Arc<Mutex<GatewayInner>>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outcome(outcome: PaymentOutcome) -> Self {
        let gateway = Self::default();
        gateway.push_outcome(outcome);
        gateway
    }

    pub fn push_outcome(&self, outcome: PaymentOutcome) {
        self.lock().scripted.push_back(Some(outcome));
    }

    /// The next session is closed by the user without a result.
    pub fn push_dismissal(&self) {
        self.lock().scripted.push_back(None);
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    /// Descriptors of every session opened so far.
    pub fn opened(&self) -> Vec<SessionDescriptor> {
        self.lock().opened.clone()
    }

    /// Takes the trigger of the oldest session still waiting for its event.
    pub fn take_trigger(&self) -> Option<SessionTrigger> {
        self.lock().triggers.pop_front()
    }

    fn lock(&self) -> MutexGuard<'_, GatewayInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl CheckoutGateway for InMemoryGateway {
    async fn open_session(&self, descriptor: SessionDescriptor) -> Result<PendingOutcome> {
        let mut inner = self.lock();
        if inner.unavailable {
            return Err(CheckoutError::GatewayUnavailable(
                "checkout widget is not available".to_string(),
            ));
        }
        inner.opened.push(descriptor);

        let (trigger, pending) = session_channel();
        match inner.scripted.pop_front() {
            Some(Some(outcome)) => {
                trigger.fire(outcome);
            }
            Some(None) => trigger.dismiss(),
            None => inner.triggers.push_back(trigger),
        }
        Ok(pending)
    }
}

/// A fetcher for environments where the SDK is bundled or deliberately absent.
#[derive(Clone)]
pub struct StaticFetcher {
    available: Arc<AtomicBool>,
    fetches: Arc<AtomicUsize>,
}

impl StaticFetcher {
    pub fn available() -> Self {
        Self {
            available: Arc::new(AtomicBool::new(true)),
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn unavailable() -> Self {
        let fetcher = Self::available();
        fetcher.set_available(false);
        fetcher
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResourceFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<()> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(CheckoutError::ScriptLoad(format!("{} is unreachable", url)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::enrollment::{
        EnrollmentStatus, GatewayData, PaymentStatus, PaymentSummary,
    };
    use crate::domain::money::{Amount, Currency};
    use crate::domain::payment::{GatewayFailure, Prefill, Theme};
    use rust_decimal_macros::dec;

    fn records(payment_id: &str) -> (EnrollmentRecord, PaymentRecord) {
        let amount = Amount::new(dec!(100.0)).unwrap();
        let enrollment = EnrollmentRecord {
            user_id: "u1".to_string(),
            course_id: "c1".to_string(),
            course_title: "Rust".to_string(),
            status: EnrollmentStatus::Success,
            payment_data: PaymentSummary {
                payment_id: payment_id.to_string(),
                amount,
            },
        };
        let payment = PaymentRecord {
            user_id: "u1".to_string(),
            course_id: "c1".to_string(),
            course_title: "Rust".to_string(),
            amount,
            currency: Currency::Inr,
            status: PaymentStatus::Captured,
            gateway_data: GatewayData {
                payment_id: payment_id.to_string(),
                order_id: String::new(),
                signature: "sig".to_string(),
            },
        };
        (enrollment, payment)
    }

    fn descriptor() -> SessionDescriptor {
        SessionDescriptor {
            key: "key".to_string(),
            amount: 100,
            currency: Currency::Inr,
            name: "Shop".to_string(),
            description: "Enrollment for Rust".to_string(),
            image: None,
            order_id: String::new(),
            prefill: Prefill::default(),
            theme: Theme {
                color: "#000000".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_in_memory_store_writes_both_records() {
        let store = InMemoryEnrollmentStore::new();
        let (enrollment, payment) = records("pay_1");

        let response = store
            .create_enrollment_with_payment(enrollment.clone(), payment.clone())
            .await
            .unwrap();
        assert!(response.success);

        let receipt = response.data.unwrap();
        assert_eq!(store.enrollment(&receipt.enrollment_id).await, Some(enrollment));
        assert_eq!(store.payment("pay_1").await, Some(payment));
        assert!(store.payment("pay_2").await.is_none());
    }

    #[tokio::test]
    async fn test_in_memory_store_failure_writes_nothing() {
        let store = InMemoryEnrollmentStore::failing();
        let (enrollment, payment) = records("pay_1");

        assert!(store
            .create_enrollment_with_payment(enrollment, payment)
            .await
            .is_err());
        assert!(store.is_empty().await);
        assert!(store.payment("pay_1").await.is_none());
    }

    #[tokio::test]
    async fn test_in_memory_store_rejects_duplicate_payment() {
        let store = InMemoryEnrollmentStore::new();
        let (e1, p1) = records("pay_1");
        let (e2, p2) = records("pay_1");

        store.create_enrollment_with_payment(e1, p1).await.unwrap();
        assert!(matches!(
            store.create_enrollment_with_payment(e2, p2).await,
            Err(CheckoutError::DuplicatePayment(id)) if id == "pay_1"
        ));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_gateway_scripted_outcomes() {
        let gateway = InMemoryGateway::with_outcome(PaymentOutcome::Failure(GatewayFailure {
            code: "X".to_string(),
            description: "Y".to_string(),
        }));
        gateway.push_dismissal();

        let first = gateway.open_session(descriptor()).await.unwrap();
        assert!(matches!(first.wait().await, Some(PaymentOutcome::Failure(_))));

        let second = gateway.open_session(descriptor()).await.unwrap();
        assert!(second.wait().await.is_none());

        let _third = gateway.open_session(descriptor()).await.unwrap();
        assert!(gateway.take_trigger().is_some());
        assert!(gateway.take_trigger().is_none());
        assert_eq!(gateway.opened().len(), 3);
    }

    #[tokio::test]
    async fn test_gateway_unavailable() {
        let gateway = InMemoryGateway::new();
        gateway.set_unavailable(true);
        assert!(gateway.open_session(descriptor()).await.is_err());
        assert!(gateway.opened().is_empty());
    }

    #[tokio::test]
    async fn test_static_fetcher_counts() {
        let fetcher = StaticFetcher::unavailable();
        assert!(fetcher.fetch("https://x").await.is_err());
        fetcher.set_available(true);
        assert!(fetcher.fetch("https://x").await.is_ok());
        assert_eq!(fetcher.fetch_count(), 2);
    }
}
