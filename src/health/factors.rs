use serde::{Deserialize, Serialize};
use std::fmt;

use super::config::ProjectScores;
use crate::store::{Document, DocumentStatus, Milestone, Project, ProjectHealth, Task, TaskStatus};

/// Score given to a factor that has no data to judge.
pub const NEUTRAL_SCORE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FactorKind {
    ProjectHealth,
    TaskCompletion,
    MilestoneProgress,
    FinancialHealth,
    DocumentApproval,
}

impl FactorKind {
    /// Fixed evaluation order.
    pub const ALL: [FactorKind; 5] = [
        FactorKind::ProjectHealth,
        FactorKind::TaskCompletion,
        FactorKind::MilestoneProgress,
        FactorKind::FinancialHealth,
        FactorKind::DocumentApproval,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FactorKind::ProjectHealth => "Project Health",
            FactorKind::TaskCompletion => "Task Completion",
            FactorKind::MilestoneProgress => "Milestone Progress",
            FactorKind::FinancialHealth => "Financial Health",
            FactorKind::DocumentApproval => "Document Approval",
        }
    }
}

impl fmt::Display for FactorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One weighted component of a client's health score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthFactor {
    pub factor: FactorKind,
    /// 0-100
    pub score: f64,
    /// 0-1
    pub weight: f64,
    pub description: String,
}

impl HealthFactor {
    pub fn contribution(&self) -> f64 {
        self.score * self.weight
    }
}

/// Mean mapped health of the active projects.
pub fn project_health_factor(
    projects: &[&Project],
    scores: &ProjectScores,
    weight: f64,
) -> HealthFactor {
    let active: Vec<_> = projects.iter().filter(|p| p.stage.is_active()).collect();

    let (score, description) = if active.is_empty() {
        (NEUTRAL_SCORE, "No active projects".to_string())
    } else {
        let total: f64 = active.iter().map(|p| scores.score_for(p.health)).sum();
        let on_track = active
            .iter()
            .filter(|p| p.health == ProjectHealth::OnTrack)
            .count();
        let critical = active
            .iter()
            .filter(|p| p.health == ProjectHealth::CriticalRisk)
            .count();

        let mut description = format!("{} of {} active projects on track", on_track, active.len());
        if critical > 0 {
            description.push_str(&format!(", {} critical", critical));
        }
        (total / active.len() as f64, description)
    };

    HealthFactor {
        factor: FactorKind::ProjectHealth,
        score: clamp_score(score),
        weight,
        description,
    }
}

/// Share of tasks marked done.
pub fn task_completion_factor(tasks: &[&Task], weight: f64) -> HealthFactor {
    let total = tasks.len();
    let done = tasks.iter().filter(|t| t.status == TaskStatus::Done).count();

    let (score, description) = if total == 0 {
        (NEUTRAL_SCORE, "No tasks yet".to_string())
    } else {
        (
            done as f64 / total as f64 * 100.0,
            format!("{} of {} tasks complete", done, total),
        )
    };

    HealthFactor {
        factor: FactorKind::TaskCompletion,
        score: clamp_score(score),
        weight,
        description,
    }
}

/// Mean milestone completion.
pub fn milestone_progress_factor(milestones: &[&Milestone], weight: f64) -> HealthFactor {
    let (score, description) = if milestones.is_empty() {
        (NEUTRAL_SCORE, "No milestones yet".to_string())
    } else {
        let total: f64 = milestones.iter().map(|m| clamp_score(m.completion)).sum();
        let mean = total / milestones.len() as f64;
        (
            mean,
            format!(
                "{} milestones, {:.0}% average completion",
                milestones.len(),
                mean
            ),
        )
    };

    HealthFactor {
        factor: FactorKind::MilestoneProgress,
        score: clamp_score(score),
        weight,
        description,
    }
}

/// Outstanding balance relative to total revenue; a lower ratio scores higher.
pub fn financial_health_factor(
    total_revenue: f64,
    outstanding_balance: f64,
    weight: f64,
) -> HealthFactor {
    let (score, description) = if !total_revenue.is_finite() || total_revenue <= 0.0 {
        (NEUTRAL_SCORE, "No revenue recorded yet".to_string())
    } else {
        let outstanding = if outstanding_balance.is_finite() {
            outstanding_balance.max(0.0)
        } else {
            0.0
        };
        let ratio = outstanding / total_revenue;
        (
            (1.0 - ratio) * 100.0,
            format!(
                "{:.0} outstanding of {:.0} revenue ({:.0}%)",
                outstanding,
                total_revenue,
                ratio * 100.0
            ),
        )
    };

    HealthFactor {
        factor: FactorKind::FinancialHealth,
        score: clamp_score(score),
        weight,
        description,
    }
}

/// Share of submitted documents that were approved.
pub fn document_approval_factor(documents: &[&Document], weight: f64) -> HealthFactor {
    let submitted = documents.iter().filter(|d| d.status.is_submitted()).count();
    let approved = documents
        .iter()
        .filter(|d| d.status == DocumentStatus::Approved)
        .count();

    let (score, description) = if submitted == 0 {
        (NEUTRAL_SCORE, "No documents submitted".to_string())
    } else {
        (
            approved as f64 / submitted as f64 * 100.0,
            format!(
                "{} of {} submitted documents approved",
                approved, submitted
            ),
        )
    };

    HealthFactor {
        factor: FactorKind::DocumentApproval,
        score: clamp_score(score),
        weight,
        description,
    }
}

/// Weighted sum of the factors, rounded and clamped to 0-100.
pub fn weighted_score(factors: &[HealthFactor]) -> u8 {
    let raw: f64 = factors.iter().map(HealthFactor::contribution).sum();
    if !raw.is_finite() {
        return 0;
    }
    raw.round().clamp(0.0, 100.0) as u8
}

fn clamp_score(score: f64) -> f64 {
    if score.is_finite() {
        score.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ProjectStage;

    fn project(health: ProjectHealth, stage: ProjectStage) -> Project {
        Project {
            id: "p".to_string(),
            name: "P".to_string(),
            client: "c1".to_string(),
            health,
            stage,
            assigned_associates: vec![],
        }
    }

    fn task(status: TaskStatus) -> Task {
        Task {
            id: "t".to_string(),
            project_id: "p".to_string(),
            title: String::new(),
            status,
        }
    }

    fn milestone(completion: f64) -> Milestone {
        Milestone {
            id: "m".to_string(),
            project_id: "p".to_string(),
            title: String::new(),
            completion,
        }
    }

    fn document(status: DocumentStatus) -> Document {
        Document {
            id: "d".to_string(),
            project_id: "p".to_string(),
            name: String::new(),
            status,
        }
    }

    #[test]
    fn test_project_health_average() {
        let on = project(ProjectHealth::OnTrack, ProjectStage::Execution);
        let risk = project(ProjectHealth::AtRisk, ProjectStage::Onboarding);
        let factor = project_health_factor(&[&on, &risk], &ProjectScores::default(), 0.3);
        assert_eq!(factor.score, 80.0);
        assert_eq!(factor.description, "1 of 2 active projects on track");
    }

    #[test]
    fn test_project_health_ignores_closed_projects() {
        let closed = project(ProjectHealth::CriticalRisk, ProjectStage::Closure);
        let learnings = project(ProjectHealth::AtRisk, ProjectStage::Learnings);
        let factor =
            project_health_factor(&[&closed, &learnings], &ProjectScores::default(), 0.3);
        assert_eq!(factor.score, NEUTRAL_SCORE);
        assert_eq!(factor.description, "No active projects");
    }

    #[test]
    fn test_project_health_mentions_critical() {
        let critical = project(ProjectHealth::CriticalRisk, ProjectStage::Execution);
        let factor = project_health_factor(&[&critical], &ProjectScores::default(), 0.3);
        assert_eq!(factor.score, 20.0);
        assert!(factor.description.ends_with("1 critical"));
    }

    #[test]
    fn test_task_completion() {
        let tasks = [
            task(TaskStatus::Done),
            task(TaskStatus::Done),
            task(TaskStatus::Review),
            task(TaskStatus::Todo),
        ];
        let refs: Vec<_> = tasks.iter().collect();
        let factor = task_completion_factor(&refs, 0.2);
        assert_eq!(factor.score, 50.0);
        assert_eq!(factor.description, "2 of 4 tasks complete");
    }

    #[test]
    fn test_task_completion_empty_is_neutral() {
        let factor = task_completion_factor(&[], 0.2);
        assert_eq!(factor.score, NEUTRAL_SCORE);
    }

    #[test]
    fn test_milestone_progress_clamps_values() {
        let ms = [milestone(50.0), milestone(150.0), milestone(-10.0)];
        let refs: Vec<_> = ms.iter().collect();
        let factor = milestone_progress_factor(&refs, 0.2);
        // 50 + 100 + 0
        assert!((factor.score - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_financial_health_ratio() {
        let factor = financial_health_factor(100_000.0, 25_000.0, 0.15);
        assert!((factor.score - 75.0).abs() < 1e-9);
        assert_eq!(factor.description, "25000 outstanding of 100000 revenue (25%)");
    }

    #[test]
    fn test_financial_health_no_revenue() {
        let factor = financial_health_factor(0.0, 5_000.0, 0.15);
        assert_eq!(factor.score, NEUTRAL_SCORE);
    }

    #[test]
    fn test_financial_health_floors_at_zero() {
        let factor = financial_health_factor(1_000.0, 4_000.0, 0.15);
        assert_eq!(factor.score, 0.0);
    }

    #[test]
    fn test_document_approval_skips_drafts() {
        let docs = [
            document(DocumentStatus::Approved),
            document(DocumentStatus::Rejected),
            document(DocumentStatus::Pending),
            document(DocumentStatus::Draft),
        ];
        let refs: Vec<_> = docs.iter().collect();
        let factor = document_approval_factor(&refs, 0.15);
        assert!((factor.score - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(factor.description, "1 of 3 submitted documents approved");
    }

    #[test]
    fn test_document_approval_only_drafts_is_neutral() {
        let draft = document(DocumentStatus::Draft);
        let factor = document_approval_factor(&[&draft], 0.15);
        assert_eq!(factor.score, NEUTRAL_SCORE);
    }

    #[test]
    fn test_weighted_score_rounds() {
        let factors = vec![
            HealthFactor {
                factor: FactorKind::ProjectHealth,
                score: 20.0,
                weight: 0.3,
                description: String::new(),
            },
            HealthFactor {
                factor: FactorKind::TaskCompletion,
                score: 100.0,
                weight: 0.7,
                description: String::new(),
            },
        ];
        assert_eq!(weighted_score(&factors), 76);
    }

    #[test]
    fn test_weighted_score_clamps() {
        let factors = vec![HealthFactor {
            factor: FactorKind::ProjectHealth,
            score: 100.0,
            weight: 3.0,
            description: String::new(),
        }];
        assert_eq!(weighted_score(&factors), 100);
    }
}
