use super::config::HealthConfig;
use super::factors::FactorKind;

/// Allowed drift of the weight total from 1.0.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Validate health configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_health_config(config: &HealthConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    let weights = &config.weights;
    let named = [
        ("project_health", FactorKind::ProjectHealth),
        ("task_completion", FactorKind::TaskCompletion),
        ("milestone_progress", FactorKind::MilestoneProgress),
        ("financial_health", FactorKind::FinancialHealth),
        ("document_approval", FactorKind::DocumentApproval),
    ];
    for (name, kind) in named {
        let w = weights.weight(kind);
        if !w.is_finite() || !(0.0..=1.0).contains(&w) {
            errors.push(format!(
                "health.weights.{}: must be between 0 and 1, got {}",
                name, w
            ));
        }
    }

    let sum = weights.sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        errors.push(format!("health.weights: must sum to 1.0, got {:.4}", sum));
    }

    let scores = &config.project_scores;
    for (name, value) in [
        ("on_track", scores.on_track),
        ("at_risk", scores.at_risk),
        ("critical_risk", scores.critical_risk),
    ] {
        if !value.is_finite() || !(0.0..=100.0).contains(&value) {
            errors.push(format!(
                "health.project_scores.{}: must be between 0 and 100, got {}",
                name, value
            ));
        }
    }

    if config.trend_window == 0 {
        errors.push("health.trend_window: must be at least 1".to_string());
    }

    if !config.trend_threshold.is_finite() || config.trend_threshold < 0.0 {
        errors.push(format!(
            "health.trend_threshold: must be non-negative, got {}",
            config.trend_threshold
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
