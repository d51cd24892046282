//! Policy constants that change with GST filing rules

use bigdecimal::BigDecimal;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::str::FromStr;

use crate::types::BillingResult;

/// Billing policy configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BillingConfig {
    /// Unregistered inter-state invoices above this value are reported as B2CL
    #[serde(default = "default_b2cl_threshold")]
    pub b2cl_threshold: BigDecimal,
    /// GST rate used when no item rate and no company default exist
    #[serde(default = "default_fallback_gst_rate")]
    pub fallback_gst_rate: BigDecimal,
    /// Company state code assumed when settings carry none
    #[serde(default = "default_state_code")]
    pub default_state_code: String,
}

fn default_b2cl_threshold() -> BigDecimal {
    BigDecimal::from(250_000)
}

fn default_fallback_gst_rate() -> BigDecimal {
    BigDecimal::from(18)
}

fn default_state_code() -> String {
    "07".to_string()
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            b2cl_threshold: default_b2cl_threshold(),
            fallback_gst_rate: default_fallback_gst_rate(),
            default_state_code: default_state_code(),
        }
    }
}

impl BillingConfig {
    /// Load from an optional `billing` file and `BILLING__*` environment variables
    pub fn load() -> BillingResult<Self> {
        Self::load_from("billing")
    }

    /// Same layering as [`BillingConfig::load`] with an explicit file path
    /// (extension optional). A missing file is not an error.
    pub fn load_from(path: &str) -> BillingResult<Self> {
        let config = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("BILLING").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Parse a decimal setting, for callers overriding values programmatically
    pub fn with_b2cl_threshold(mut self, threshold: &str) -> BillingResult<Self> {
        self.b2cl_threshold = BigDecimal::from_str(threshold).map_err(|e| {
            crate::types::BillingError::Validation(format!("Invalid B2CL threshold: {}", e))
        })?;
        Ok(self)
    }

    /// Company state code, falling back to the configured default
    pub fn company_state_code<'a>(&'a self, settings_state_code: &'a str) -> &'a str {
        if settings_state_code.trim().is_empty() {
            &self.default_state_code
        } else {
            settings_state_code
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BillingConfig::default();
        assert_eq!(config.b2cl_threshold, BigDecimal::from(250000));
        assert_eq!(config.fallback_gst_rate, BigDecimal::from(18));
        assert_eq!(config.default_state_code, "07");
    }

    #[test]
    fn test_threshold_override() {
        let config = BillingConfig::default().with_b2cl_threshold("100000").unwrap();
        assert_eq!(config.b2cl_threshold, BigDecimal::from(100000));
        assert!(BillingConfig::default().with_b2cl_threshold("abc").is_err());
    }

    #[test]
    fn test_load_layers_file_then_environment() {
        let path = std::env::temp_dir().join(format!("billing-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            "b2cl_threshold = \"150000\"\nfallback_gst_rate = \"12\"\n",
        )
        .unwrap();

        let from_file = BillingConfig::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(from_file.b2cl_threshold, BigDecimal::from(150000));
        assert_eq!(from_file.fallback_gst_rate, BigDecimal::from(12));
        assert_eq!(from_file.default_state_code, "07");

        std::env::set_var("BILLING__B2CL_THRESHOLD", "100000");
        let layered = BillingConfig::load_from(path.to_str().unwrap());
        let from_env = BillingConfig::load();
        std::env::remove_var("BILLING__B2CL_THRESHOLD");
        std::fs::remove_file(&path).unwrap();

        let layered = layered.unwrap();
        assert_eq!(layered.b2cl_threshold, BigDecimal::from(100000));
        assert_eq!(layered.fallback_gst_rate, BigDecimal::from(12));
        assert_eq!(from_env.unwrap().b2cl_threshold, BigDecimal::from(100000));
    }

    #[test]
    fn test_company_state_code_fallback() {
        let config = BillingConfig::default();
        assert_eq!(config.company_state_code(""), "07");
        assert_eq!(config.company_state_code("27"), "27");
    }
}
