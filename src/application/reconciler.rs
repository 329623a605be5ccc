use crate::domain::enrollment::{
    EnrollmentReceipt, EnrollmentRecord, EnrollmentStatus, GatewayData, PaymentRecord,
    PaymentStatus, PaymentSummary,
};
use crate::domain::money::Currency;
use crate::domain::payment::{GatewayResponse, PaymentRequest};
use crate::domain::ports::{EnrollmentStore, EnrollmentStoreBox};
use crate::domain::user::UserContext;
use tracing::{error, info};

/// What happened when the records of a captured payment were written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    Recorded(EnrollmentReceipt),
    Failed(String),
}

/// Builds the enrollment and payment records for a captured payment.
pub fn build_records(
    user: &UserContext,
    details: &PaymentRequest,
    response: &GatewayResponse,
) -> (EnrollmentRecord, PaymentRecord) {
    let enrollment = EnrollmentRecord {
        user_id: user.uid.clone(),
        course_id: details.course_id.clone(),
        course_title: details.course_title.clone(),
        status: EnrollmentStatus::Success,
        payment_data: PaymentSummary {
            payment_id: response.payment_id.clone(),
            amount: details.amount,
        },
    };
    let payment = PaymentRecord {
        user_id: user.uid.clone(),
        course_id: details.course_id.clone(),
        course_title: details.course_title.clone(),
        amount: details.amount,
        currency: Currency::Inr,
        status: PaymentStatus::Captured,
        gateway_data: GatewayData {
            payment_id: response.payment_id.clone(),
            order_id: response.order_id.clone(),
            signature: response.signature.clone(),
        },
    };
    (enrollment, payment)
}

/// Records a successful payment in the enrollment store.
///
/// Never returns an error: every store failure is logged and folded into
/// `Reconciliation::Failed`.
pub struct EnrollmentReconciler {
    store: EnrollmentStoreBox,
}

impl EnrollmentReconciler {
    pub fn new(store: EnrollmentStoreBox) -> Self {
        Self { store }
    }

    pub async fn reconcile(
        &self,
        enrollment: EnrollmentRecord,
        payment: PaymentRecord,
    ) -> Reconciliation {
        let payment_id = payment.gateway_data.payment_id.clone();
        let course_id = enrollment.course_id.clone();

        // A panicking adapter must not leave the session half-settled.
        let store = self.store.clone();
        let write = tokio::spawn(async move {
            store
                .create_enrollment_with_payment(enrollment, payment)
                .await
        });

        match write.await {
            Ok(Ok(response)) => match (response.success, response.data) {
                (true, Some(receipt)) => {
                    info!(
                        %payment_id,
                        %course_id,
                        enrollment_id = %receipt.enrollment_id,
                        "enrollment recorded"
                    );
                    Reconciliation::Recorded(receipt)
                }
                (true, None) => {
                    error!(%payment_id, %course_id, "store reported success without a receipt");
                    Reconciliation::Failed("missing enrollment receipt".to_string())
                }
                (false, _) => {
                    error!(%payment_id, %course_id, "store rejected enrollment");
                    Reconciliation::Failed("store rejected the enrollment".to_string())
                }
            },
            Ok(Err(e)) => {
                error!(%payment_id, %course_id, error = %e, "enrollment store error");
                Reconciliation::Failed(e.to_string())
            }
            Err(e) => {
                error!(%payment_id, %course_id, error = %e, "enrollment store task failed");
                Reconciliation::Failed(format!("store task failed: {}", e))
            }
        }
    }
}
