pub mod config;
pub mod engine;
pub mod factors;
pub mod state;
pub mod validation;

pub use config::{HealthConfig, HealthWeights, ProjectScores};
pub use engine::{
    add_client_health_alert, add_client_health_note, refresh_client_health,
    remove_client_health_alert, update_client_health_override, update_client_health_override_at,
    HealthEngine, HealthRefresh, HealthSource,
};
pub use factors::{weighted_score, FactorKind, HealthFactor};
pub use state::{
    validate_override, ClientHealthState, HealthHistoryEntry, HealthScore, HealthTrend,
    TrendDirection,
};
pub use validation::validate_health_config;
