//! Configuration loading and representation.
//!
//! Every setting comes from the process environment and falls back to a default
//! when unset. Unparsable values are errors, never silently ignored.

use std::net::SocketAddr;
use std::str::FromStr;

use thiserror::Error;

use facturation_billing::BillingConfig;
use facturation_core::TaxRate;
use facturation_planning::EventCategory;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("inconsistent configuration: {0}")]
    Inconsistent(String),
}

/// Settings of the HTTP service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub billing: BillingConfig,
}

impl AppConfig {
    /// Read `BIND_ADDR` and the `BILLING_*` variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`AppConfig::from_env`] with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &'static str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bind_addr = match var("BIND_ADDR") {
            Some(v) => parse("BIND_ADDR", v)?,
            None => parse("BIND_ADDR", DEFAULT_BIND_ADDR.to_string())?,
        };

        let mut billing = BillingConfig::default();
        if let Some(v) = var("BILLING_TAX_RATE_BPS") {
            let bps: u32 = parse("BILLING_TAX_RATE_BPS", v.clone())?;
            if bps > 10_000 {
                return Err(ConfigError::Invalid {
                    name: "BILLING_TAX_RATE_BPS",
                    value: v,
                });
            }
            billing.tax_rate = TaxRate::from_basis_points(bps);
        }
        if let Some(v) = var("BILLING_MIN_YEAR") {
            billing.min_year = parse("BILLING_MIN_YEAR", v)?;
        }
        if let Some(v) = var("BILLING_MAX_YEAR") {
            billing.max_year = parse("BILLING_MAX_YEAR", v)?;
        }
        if let Some(v) = var("BILLING_PAYMENT_TERMS_DAYS") {
            billing.payment_terms_days = parse("BILLING_PAYMENT_TERMS_DAYS", v)?;
        }
        if let Some(v) = var("BILLING_REFERENCE_PREFIX") {
            if v.contains('-') {
                return Err(ConfigError::Invalid {
                    name: "BILLING_REFERENCE_PREFIX",
                    value: v,
                });
            }
            billing.reference_prefix = v;
        }
        if let Some(v) = var("BILLING_ELIGIBLE_CATEGORIES") {
            billing.eligible_categories = v
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(|s| {
                    s.parse::<EventCategory>().map_err(|_| ConfigError::Invalid {
                        name: "BILLING_ELIGIBLE_CATEGORIES",
                        value: s.trim().to_string(),
                    })
                })
                .collect::<Result<_, _>>()?;
        }

        if billing.min_year > billing.max_year {
            return Err(ConfigError::Inconsistent(format!(
                "BILLING_MIN_YEAR ({}) is after BILLING_MAX_YEAR ({})",
                billing.min_year, billing.max_year
            )));
        }
        if billing.eligible_categories.is_empty() {
            return Err(ConfigError::Inconsistent(
                "no billable event category configured".to_string(),
            ));
        }

        Ok(Self { bind_addr, billing })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            billing: BillingConfig::default(),
        }
    }
}

fn parse<T: FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value })
}
