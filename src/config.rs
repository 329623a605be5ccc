//! Gateway configuration, normally provided through the environment.

use std::env;

pub const DEFAULT_CHECKOUT_URL: &str = "https://checkout.razorpay.com/v1/checkout.js";
pub const DEFAULT_MERCHANT_NAME: &str = "JNTU-GV Certification";
pub const DEFAULT_THEME_COLOR: &str = "#004080";

pub const ENV_KEY_ID: &str = "GATEWAY_KEY_ID";
pub const ENV_CHECKOUT_URL: &str = "CHECKOUT_SCRIPT_URL";
pub const ENV_MERCHANT_NAME: &str = "MERCHANT_NAME";
pub const ENV_MERCHANT_IMAGE_URL: &str = "MERCHANT_IMAGE_URL";
pub const ENV_THEME_COLOR: &str = "CHECKOUT_THEME_COLOR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Publishable gateway key. Missing keys are reported when a payment starts.
    pub key_id: Option<String>,
    pub checkout_url: String,
    pub merchant_name: String,
    pub image_url: Option<String>,
    pub theme_color: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            key_id: None,
            checkout_url: DEFAULT_CHECKOUT_URL.to_string(),
            merchant_name: DEFAULT_MERCHANT_NAME.to_string(),
            image_url: None,
            theme_color: DEFAULT_THEME_COLOR.to_string(),
        }
    }
}

impl GatewayConfig {
    pub fn new(key_id: impl Into<String>) -> Self {
        Self::default().with_key_id(key_id)
    }

    /// Reads the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source. Blank values are ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            key_id: read(ENV_KEY_ID),
            checkout_url: read(ENV_CHECKOUT_URL).unwrap_or(defaults.checkout_url),
            merchant_name: read(ENV_MERCHANT_NAME).unwrap_or(defaults.merchant_name),
            image_url: read(ENV_MERCHANT_IMAGE_URL),
            theme_color: read(ENV_THEME_COLOR).unwrap_or(defaults.theme_color),
        }
    }

    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        let key_id = key_id.into();
        self.key_id = (!key_id.trim().is_empty()).then_some(key_id);
        self
    }

    pub fn with_checkout_url(mut self, url: impl Into<String>) -> Self {
        self.checkout_url = url.into();
        self
    }

    pub fn key(&self) -> Option<&str> {
        self.key_id.as_deref()
    }
}
