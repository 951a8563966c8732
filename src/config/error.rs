//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Request timeout must exceed the provider verify timeout")]
    RequestTimeoutTooShort,

    #[error("Invalid socket address: {0}")]
    InvalidSocketAddr(String),

    #[error("Invalid Paystack secret key format for {0}")]
    InvalidSecretKey(&'static str),

    #[error("Invalid Paystack public key format for {0}")]
    InvalidPublicKey(&'static str),

    #[error("Invalid Paystack API base URL")]
    InvalidApiBaseUrl,

    #[error("Test mode must be disabled in production")]
    TestModeInProduction,

    #[error("No supported currencies configured")]
    NoSupportedCurrencies,

    #[error("Return URL template must contain {{order_id}}")]
    MissingOrderIdPlaceholder,

    #[error("Invalid storefront URL: {0}")]
    InvalidStorefrontUrl(&'static str),
}
