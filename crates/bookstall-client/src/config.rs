//! Client configuration.

use bookstall_commerce::cart::ShippingPolicy;
use bookstall_commerce::Money;
use serde::{Deserialize, Serialize};

/// Configuration for the cart client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    /// Interval between background polls of the cart resource, in
    /// seconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Shipping policy applied when pricing the cart.
    #[serde(default = "default_shipping_policy")]
    pub shipping: ShippingPolicy,
}

fn default_poll_interval() -> u64 {
    30
}

fn default_shipping_policy() -> ShippingPolicy {
    ShippingPolicy::new(Money::new(45_000), Money::new(15_000))
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            shipping: default_shipping_policy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config: ClientConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.poll_interval_secs, 30);
        assert_eq!(config.shipping.threshold_amount, Money::new(45_000));
        assert_eq!(config.shipping.fee_below_threshold, Money::new(15_000));
    }

    #[test]
    fn test_explicit_values_win() {
        let config: ClientConfig = serde_json::from_str(
            r#"{"poll_interval_secs": 5, "shipping": {"threshold_amount": 100, "fee_below_threshold": 10}}"#,
        )
        .unwrap();
        assert_eq!(config.poll_interval_secs, 5);
        assert_eq!(config.shipping.threshold_amount, Money::new(100));
    }
}
