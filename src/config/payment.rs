//! Payment configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Payment configuration (Paystack)
///
/// Two key pairs are kept side by side; `test_mode` picks the active one.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Gateway switched on in the storefront
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Use the test key pair
    #[serde(default = "default_test_mode")]
    pub test_mode: bool,

    /// Test secret key (sk_test_...)
    pub test_secret_key: Option<String>,

    /// Test public key (pk_test_...)
    pub test_public_key: Option<String>,

    /// Live secret key (sk_live_...)
    pub live_secret_key: Option<String>,

    /// Live public key (pk_live_...)
    pub live_public_key: Option<String>,

    /// Paystack API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Timeout for the transaction verify call, in seconds
    #[serde(default = "default_verify_timeout")]
    pub verify_timeout_secs: u64,

    /// Currencies the gateway accepts (comma-separated ISO codes)
    #[serde(default = "default_supported_currencies")]
    pub supported_currencies: String,

    /// The storefront's currency
    #[serde(default = "default_store_currency")]
    pub store_currency: String,

    /// Header carrying the webhook signature
    #[serde(default = "default_signature_header")]
    pub signature_header: String,
}

impl PaymentConfig {
    /// Secret key of the active mode
    pub fn active_secret_key(&self) -> Option<&str> {
        let key = if self.test_mode {
            &self.test_secret_key
        } else {
            &self.live_secret_key
        };
        key.as_deref().filter(|k| !k.is_empty())
    }

    /// Public key of the active mode
    pub fn active_public_key(&self) -> Option<&str> {
        let key = if self.test_mode {
            &self.test_public_key
        } else {
            &self.live_public_key
        };
        key.as_deref().filter(|k| !k.is_empty())
    }

    /// Supported currencies as a vector
    pub fn supported_currency_list(&self) -> Vec<String> {
        self.supported_currencies
            .split(',')
            .map(|s| s.trim().to_ascii_uppercase())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Check if the gateway accepts `currency`
    pub fn supports_currency(&self, currency: &str) -> bool {
        self.supported_currency_list()
            .iter()
            .any(|c| c.eq_ignore_ascii_case(currency))
    }

    /// Gateway can take payments: enabled, both active keys set, and the
    /// store currency supported
    pub fn is_available(&self) -> bool {
        self.enabled
            && self.active_secret_key().is_some()
            && self.active_public_key().is_some()
            && self.supports_currency(&self.store_currency)
    }

    /// Validate payment configuration
    pub fn validate(&self, is_production: bool) -> Result<(), ValidationError> {
        if is_production && self.test_mode {
            return Err(ValidationError::TestModeInProduction);
        }

        // Verify key prefixes for safety
        check_prefix(&self.test_secret_key, "sk_", ValidationError::InvalidSecretKey("test"))?;
        check_prefix(&self.live_secret_key, "sk_", ValidationError::InvalidSecretKey("live"))?;
        check_prefix(&self.test_public_key, "pk_", ValidationError::InvalidPublicKey("test"))?;
        check_prefix(&self.live_public_key, "pk_", ValidationError::InvalidPublicKey("live"))?;

        if self.enabled {
            if self.active_secret_key().is_none() {
                return Err(ValidationError::MissingRequired("PAYMENT__SECRET_KEY"));
            }
            if self.active_public_key().is_none() {
                return Err(ValidationError::MissingRequired("PAYMENT__PUBLIC_KEY"));
            }
        }

        if !self.api_base_url.starts_with("https://") && !self.api_base_url.starts_with("http://") {
            return Err(ValidationError::InvalidApiBaseUrl);
        }
        if self.verify_timeout_secs == 0 || self.verify_timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.supported_currency_list().is_empty() {
            return Err(ValidationError::NoSupportedCurrencies);
        }
        if self.signature_header.trim().is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__SIGNATURE_HEADER"));
        }

        Ok(())
    }
}

fn check_prefix(
    key: &Option<String>,
    prefix: &str,
    err: ValidationError,
) -> Result<(), ValidationError> {
    match key.as_deref() {
        Some(k) if !k.is_empty() && !k.starts_with(prefix) => Err(err),
        _ => Ok(()),
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            test_mode: default_test_mode(),
            test_secret_key: None,
            test_public_key: None,
            live_secret_key: None,
            live_public_key: None,
            api_base_url: default_api_base_url(),
            verify_timeout_secs: default_verify_timeout(),
            supported_currencies: default_supported_currencies(),
            store_currency: default_store_currency(),
            signature_header: default_signature_header(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_test_mode() -> bool {
    true
}

fn default_api_base_url() -> String {
    "https://api.paystack.co".to_string()
}

fn default_verify_timeout() -> u64 {
    60
}

fn default_supported_currencies() -> String {
    "NGN,USD,GBP".to_string()
}

fn default_store_currency() -> String {
    "NGN".to_string()
}

fn default_signature_header() -> String {
    "x-paystack-signature".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_keys() -> PaymentConfig {
        PaymentConfig {
            test_secret_key: Some("sk_test_xxx".to_string()),
            test_public_key: Some("pk_test_xxx".to_string()),
            ..Default::default()
        }
    }

    fn live_keys() -> PaymentConfig {
        PaymentConfig {
            test_mode: false,
            live_secret_key: Some("sk_live_xxx".to_string()),
            live_public_key: Some("pk_live_xxx".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_mode_selects_test_keys() {
        let config = PaymentConfig {
            live_secret_key: Some("sk_live_yyy".to_string()),
            ..test_keys()
        };
        assert_eq!(config.active_secret_key(), Some("sk_test_xxx"));
        assert_eq!(config.active_public_key(), Some("pk_test_xxx"));
    }

    #[test]
    fn live_mode_selects_live_keys() {
        let config = live_keys();
        assert_eq!(config.active_secret_key(), Some("sk_live_xxx"));
        assert_eq!(config.active_public_key(), Some("pk_live_xxx"));
    }

    #[test]
    fn empty_key_counts_as_missing() {
        let config = PaymentConfig {
            test_secret_key: Some(String::new()),
            ..test_keys()
        };
        assert_eq!(config.active_secret_key(), None);
        assert!(!config.is_available());
    }

    #[test]
    fn test_supported_currencies_parsing() {
        let config = PaymentConfig {
            supported_currencies: "ngn, USD ,,GBP".to_string(),
            ..Default::default()
        };
        assert_eq!(config.supported_currency_list(), vec!["NGN", "USD", "GBP"]);
        assert!(config.supports_currency("usd"));
        assert!(!config.supports_currency("EUR"));
    }

    #[test]
    fn test_availability() {
        assert!(test_keys().is_available());

        let disabled = PaymentConfig {
            enabled: false,
            ..test_keys()
        };
        assert!(!disabled.is_available());

        let missing_public = PaymentConfig {
            test_public_key: None,
            ..test_keys()
        };
        assert!(!missing_public.is_available());

        let unsupported = PaymentConfig {
            store_currency: "EUR".to_string(),
            ..test_keys()
        };
        assert!(!unsupported.is_available());
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(test_keys().validate(false).is_ok());
        assert!(live_keys().validate(true).is_ok());
    }

    #[test]
    fn test_validation_test_mode_in_production() {
        assert_eq!(
            test_keys().validate(true),
            Err(ValidationError::TestModeInProduction)
        );
    }

    #[test]
    fn test_validation_invalid_secret_key_prefix() {
        let config = PaymentConfig {
            test_secret_key: Some("pk_test_xxx".to_string()), // Wrong prefix
            ..test_keys()
        };
        assert_eq!(
            config.validate(false),
            Err(ValidationError::InvalidSecretKey("test"))
        );
    }

    #[test]
    fn test_validation_invalid_public_key_prefix() {
        let config = PaymentConfig {
            live_public_key: Some("sk_live_xxx".to_string()),
            ..live_keys()
        };
        assert_eq!(
            config.validate(true),
            Err(ValidationError::InvalidPublicKey("live"))
        );
    }

    #[test]
    fn test_validation_missing_keys_when_enabled() {
        assert!(PaymentConfig::default().validate(false).is_err());

        let disabled = PaymentConfig {
            enabled: false,
            ..Default::default()
        };
        assert!(disabled.validate(false).is_ok());
    }

    #[test]
    fn test_validation_invalid_timeout() {
        let config = PaymentConfig {
            verify_timeout_secs: 0,
            ..test_keys()
        };
        assert_eq!(config.validate(false), Err(ValidationError::InvalidTimeout));
    }
}
