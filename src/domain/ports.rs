use super::enrollment::{EnrollmentRecord, PaymentRecord, StoreResponse};
use super::payment::{PendingOutcome, SessionDescriptor};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Result of provisioning an external script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptLoad {
    Loaded,
    Failed(String),
}

impl ScriptLoad {
    pub fn is_loaded(&self) -> bool {
        matches!(self, ScriptLoad::Loaded)
    }
}

/// Fetches and evaluates a remote resource.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<()>;
}

/// Makes sure a script is present in the runtime before it is used.
#[async_trait]
pub trait ScriptLoader: Send + Sync {
    async fn load(&self, url: &str) -> ScriptLoad;

    async fn load_script(&self, url: &str) -> bool {
        self.load(url).await.is_loaded()
    }
}

/// The external checkout widget.
///
/// Opening a session returns immediately; the widget later resolves the
/// returned `PendingOutcome` at most once.
#[async_trait]
pub trait CheckoutGateway: Send + Sync {
    async fn open_session(&self, descriptor: SessionDescriptor) -> Result<PendingOutcome>;
}

/// The remote document store. Both records are written together or not at all.
#[async_trait]
pub trait EnrollmentStore: Send + Sync {
    async fn create_enrollment_with_payment(
        &self,
        enrollment: EnrollmentRecord,
        payment: PaymentRecord,
    ) -> Result<StoreResponse>;
}

pub type ScriptLoaderBox = Arc<dyn ScriptLoader>;
pub type CheckoutGatewayBox = Arc<dyn CheckoutGateway>;
pub type EnrollmentStoreBox = Arc<dyn EnrollmentStore>;
