//! Storefront configuration
//!
//! Where customers are sent once the redirect path has done its work.

use serde::Deserialize;

use crate::domain::foundation::OrderId;

use super::error::ValidationError;

const ORDER_ID_PLACEHOLDER: &str = "{order_id}";

/// Storefront URLs
#[derive(Debug, Clone, Deserialize)]
pub struct StorefrontConfig {
    /// Order-received page; `{order_id}` is replaced with the order id
    #[serde(default = "default_return_url_template")]
    pub return_url_template: String,

    /// Cart page, used when the order cannot be identified
    #[serde(default = "default_cart_url")]
    pub cart_url: String,
}

impl StorefrontConfig {
    /// Order-received URL for `order_id`
    pub fn return_url(&self, order_id: OrderId) -> String {
        self.return_url_template
            .replace(ORDER_ID_PLACEHOLDER, &order_id.to_string())
    }

    /// Validate storefront configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.return_url_template.contains(ORDER_ID_PLACEHOLDER) {
            return Err(ValidationError::MissingOrderIdPlaceholder);
        }
        if self.cart_url.trim().is_empty() {
            return Err(ValidationError::InvalidStorefrontUrl("cart_url"));
        }
        Ok(())
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            return_url_template: default_return_url_template(),
            cart_url: default_cart_url(),
        }
    }
}

fn default_return_url_template() -> String {
    "/checkout/order-received/{order_id}".to_string()
}

fn default_cart_url() -> String {
    "/cart".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn return_url_substitutes_order_id() {
        let config = StorefrontConfig {
            return_url_template: "https://shop.example/orders/{order_id}/received".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.return_url(OrderId::new(42).unwrap()),
            "https://shop.example/orders/42/received"
        );
    }

    #[test]
    fn defaults_are_valid() {
        assert!(StorefrontConfig::default().validate().is_ok());
    }

    #[test]
    fn template_without_placeholder_is_rejected() {
        let config = StorefrontConfig {
            return_url_template: "/thanks".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingOrderIdPlaceholder)
        );
    }

    #[test]
    fn empty_cart_url_is_rejected() {
        let config = StorefrontConfig {
            cart_url: " ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
