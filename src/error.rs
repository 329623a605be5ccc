use thiserror::Error;

/// Errors surfaced by the checkout flow.
///
/// The `Display` output of the user-facing variants is exactly what ends up in
/// the controller's `error` field, so the UI can render it verbatim.
#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("Authentication is required before starting a payment.")]
    Unauthenticated,
    #[error("Payment gateway key is not configured.")]
    MissingGatewayKey,
    #[error("A payment is already in progress.")]
    SessionInProgress,
    #[error("Checkout SDK failed to load. Check your internet connection.")]
    ScriptLoad(String),
    #[error("Invalid payment request: {0}")]
    InvalidRequest(String),
    #[error("Unable to open the checkout window: {0}")]
    GatewayUnavailable(String),
    #[error("Payment failed. Code: {code}. Reason: {description}")]
    PaymentFailed { code: String, description: String },
    #[error("Payment succeeded but enrollment recording failed. Contact support.")]
    ReconciliationFailed,
    #[error("Payment window was closed before the payment completed.")]
    PaymentAbandoned,
    #[error("Payment {0} has already been recorded")]
    DuplicatePayment(String),
    #[error("Enrollment store error: {0}")]
    StoreError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDBError(#[from] rocksdb::Error),
    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type Result<T> = std::result::Result<T, CheckoutError>;
