use serde::{Deserialize, Serialize};

use super::factors::FactorKind;
use crate::store::ProjectHealth;

/// Health scoring configuration.
///
/// Every field is optional in YAML; omitted fields keep the defaults below.
///
/// Example YAML:
/// ```yaml
/// health:
///   weights:
///     project_health: 0.30
///     task_completion: 0.20
///     milestone_progress: 0.20
///     financial_health: 0.15
///     document_approval: 0.15
///   project_scores: { on_track: 100, at_risk: 60, critical_risk: 20 }
///   trend_window: 4
///   trend_threshold: 2.0
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct HealthConfig {
    /// Factor weights; must sum to 1.0
    #[serde(default)]
    pub weights: HealthWeights,

    /// Score assigned to each project health state
    #[serde(default)]
    pub project_scores: ProjectScores,

    /// Number of history entries in each trend window
    #[serde(default = "default_trend_window")]
    pub trend_window: usize,

    /// Minimum change in mean score, in points, that counts as a trend
    #[serde(default = "default_trend_threshold")]
    pub trend_threshold: f64,
}

fn default_trend_window() -> usize {
    4
}

fn default_trend_threshold() -> f64 {
    2.0
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            weights: HealthWeights::default(),
            project_scores: ProjectScores::default(),
            trend_window: default_trend_window(),
            trend_threshold: default_trend_threshold(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct HealthWeights {
    pub project_health: f64,
    pub task_completion: f64,
    pub milestone_progress: f64,
    pub financial_health: f64,
    pub document_approval: f64,
}

impl Default for HealthWeights {
    fn default() -> Self {
        Self {
            project_health: 0.30,
            task_completion: 0.20,
            milestone_progress: 0.20,
            financial_health: 0.15,
            document_approval: 0.15,
        }
    }
}

impl HealthWeights {
    pub fn weight(&self, kind: FactorKind) -> f64 {
        match kind {
            FactorKind::ProjectHealth => self.project_health,
            FactorKind::TaskCompletion => self.task_completion,
            FactorKind::MilestoneProgress => self.milestone_progress,
            FactorKind::FinancialHealth => self.financial_health,
            FactorKind::DocumentApproval => self.document_approval,
        }
    }

    pub fn sum(&self) -> f64 {
        FactorKind::ALL.iter().map(|k| self.weight(*k)).sum()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct ProjectScores {
    pub on_track: f64,
    pub at_risk: f64,
    pub critical_risk: f64,
}

impl Default for ProjectScores {
    fn default() -> Self {
        Self {
            on_track: 100.0,
            at_risk: 60.0,
            critical_risk: 20.0,
        }
    }
}

impl ProjectScores {
    pub fn score_for(&self, health: ProjectHealth) -> f64 {
        match health {
            ProjectHealth::OnTrack => self.on_track,
            ProjectHealth::AtRisk => self.at_risk,
            ProjectHealth::CriticalRisk => self.critical_risk,
        }
    }
}
