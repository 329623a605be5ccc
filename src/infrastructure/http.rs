use crate::domain::ports::ResourceFetcher;
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Fetches the checkout bundle with a single HTTP(S) GET.
///
/// Any transport error or non-2xx status counts as a failed load.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| CheckoutError::InternalError(format!("HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ResourceFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<()> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CheckoutError::ScriptLoad(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CheckoutError::ScriptLoad(format!("{} returned {}", url, status)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| CheckoutError::ScriptLoad(e.to_string()))?;
        debug!(%url, bytes = body.len(), "checkout bundle fetched");
        Ok(())
    }
}
