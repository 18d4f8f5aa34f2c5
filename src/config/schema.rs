use serde::{Deserialize, Serialize};

use crate::health::HealthConfig;
use crate::revenue::RevenueConfig;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Store file; defaults to ~/.config/consult-ops/store.json
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_file: Option<String>,

    /// Name recorded on health history entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acting_user: Option<String>,

    #[serde(default)]
    pub health: HealthConfig,

    #[serde(default)]
    pub revenue: RevenueConfig,
}
