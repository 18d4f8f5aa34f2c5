use serde::{Deserialize, Serialize};

pub const DEFAULT_FALLBACK_HOURLY_RATE: f64 = 100.0;

/// Revenue engine settings.
///
/// Example YAML:
/// ```yaml
/// revenue:
///   fallback_hourly_rate: 125
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RevenueConfig {
    /// Rate used to pre-fill assignments for associates without a configured rate
    #[serde(default = "default_fallback_rate")]
    pub fallback_hourly_rate: f64,
}

fn default_fallback_rate() -> f64 {
    DEFAULT_FALLBACK_HOURLY_RATE
}

impl Default for RevenueConfig {
    fn default() -> Self {
        Self {
            fallback_hourly_rate: DEFAULT_FALLBACK_HOURLY_RATE,
        }
    }
}

/// Validate revenue settings. Returns all validation errors at once.
pub fn validate_revenue_config(config: &RevenueConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    let rate = config.fallback_hourly_rate;
    if !rate.is_finite() || rate < 0.0 {
        errors.push(format!(
            "revenue.fallback_hourly_rate: must be non-negative, got {}",
            rate
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
