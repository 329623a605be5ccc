use coursepay::application::controller::PaymentController;
use coursepay::application::loader::CachedScriptLoader;
use coursepay::config::GatewayConfig;
use coursepay::domain::money::Amount;
use coursepay::domain::payment::{GatewayResponse, PaymentRequest};
use coursepay::domain::user::UserContext;
use coursepay::infrastructure::in_memory::{InMemoryEnrollmentStore, InMemoryGateway, StaticFetcher};
use rust_decimal::Decimal;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

#[allow(dead_code)]
pub fn request_file(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", json).unwrap();
    file
}

#[allow(dead_code)]
pub fn request(amount: Decimal) -> PaymentRequest {
    PaymentRequest::new(Amount::new(amount).unwrap(), "course-1", "Systems Programming")
}

#[allow(dead_code)]
pub fn response(payment_id: &str) -> GatewayResponse {
    GatewayResponse {
        payment_id: payment_id.to_string(),
        order_id: "order_1".to_string(),
        signature: "signature_1".to_string(),
    }
}

#[allow(dead_code)]
pub fn user() -> UserContext {
    UserContext::new("user-1")
        .with_display_name("Asha Rao")
        .with_email("asha@example.com")
        .with_phone_number("+919800000000")
}

#[allow(dead_code)]
pub fn controller(
    fetcher: &StaticFetcher,
    gateway: &InMemoryGateway,
    store: &InMemoryEnrollmentStore,
) -> PaymentController {
    PaymentController::new(
        GatewayConfig::new("rzp_test_key"),
        Arc::new(CachedScriptLoader::new(fetcher.clone())),
        Arc::new(gateway.clone()),
        Arc::new(store.clone()),
    )
    .with_user(Some(user()))
}
