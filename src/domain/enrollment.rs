use super::money::{Amount, Currency};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EnrollmentStatus {
    Success,
    Failure,
}

/// Status of the payment as reported by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Captured,
    Failed,
}

/// Payment summary embedded in an enrollment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    pub payment_id: String,
    pub amount: Amount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentRecord {
    pub user_id: String,
    pub course_id: String,
    pub course_title: String,
    pub status: EnrollmentStatus,
    pub payment_data: PaymentSummary,
}

/// Gateway identifiers kept with the payment for later verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayData {
    pub payment_id: String,
    pub order_id: String,
    pub signature: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub user_id: String,
    pub course_id: String,
    pub course_title: String,
    pub amount: Amount,
    pub currency: Currency,
    pub status: PaymentStatus,
    pub gateway_data: GatewayData,
}

/// Identifiers assigned by the store once both records are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentReceipt {
    pub enrollment_id: String,
    pub payment_id: String,
    pub recorded_at: DateTime<Utc>,
}

/// Combined answer of `create_enrollment_with_payment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreResponse {
    pub success: bool,
    pub data: Option<EnrollmentReceipt>,
}

impl StoreResponse {
    pub fn recorded(receipt: EnrollmentReceipt) -> Self {
        Self {
            success: true,
            data: Some(receipt),
        }
    }

    pub fn rejected() -> Self {
        Self {
            success: false,
            data: None,
        }
    }
}
