use chrono::NaiveDate;
use serde::Serialize;

use super::config::RevenueConfig;
use super::cost::{calculate_assignment_total_cost, AssignmentCost};
use crate::error::{EngineError, EngineResult};
use crate::store::{
    AssignmentRepository, AssociateRepository, ProjectRepository, ProjectRevenue,
    RevenueRepository,
};

/// Project-level economics, derived on demand and never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectRevenueCalculation {
    pub revenue: f64,
    pub labor_cost: f64,
    pub overhead_cost: f64,
    pub total_cost: f64,
    pub gross_margin: f64,
    pub margin_percent: f64,
    pub assignment_count: usize,
}

/// One row of a project's cost breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentCostLine {
    pub assignment_id: String,
    pub associate_id: String,
    pub role: String,
    pub cost: AssignmentCost,
}

/// Position of a date within a project's contracted window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectTimeline {
    pub total_days: u32,
    pub elapsed_days: u32,
    pub remaining_days: u32,
    pub progress_percent: f64,
}

/// Margin as a percentage of revenue; zero revenue yields 0 rather than NaN.
pub fn margin_percent(revenue: f64, gross_margin: f64) -> f64 {
    if revenue == 0.0 {
        0.0
    } else {
        gross_margin / revenue * 100.0
    }
}

/// Timeline progress of a revenue window as of `as_of`.
pub fn timeline_for(record: &ProjectRevenue, as_of: NaiveDate) -> ProjectTimeline {
    let span = (record.end_date - record.start_date).num_days() + 1;
    let total_days = u32::try_from(span.max(0)).unwrap_or(u32::MAX);

    let elapsed = (as_of - record.start_date).num_days() + 1;
    let elapsed_days = u32::try_from(elapsed.clamp(0, i64::from(total_days))).unwrap_or(0);

    let progress_percent = if total_days == 0 {
        0.0
    } else {
        f64::from(elapsed_days) / f64::from(total_days) * 100.0
    };

    ProjectTimeline {
        total_days,
        elapsed_days,
        remaining_days: total_days - elapsed_days,
        progress_percent,
    }
}

/// Revenue and cost calculations over an injected store.
pub struct RevenueEngine<'a, S: ?Sized> {
    store: &'a S,
    config: &'a RevenueConfig,
}

impl<'a, S> RevenueEngine<'a, S>
where
    S: ProjectRepository + AssignmentRepository + AssociateRepository + RevenueRepository + ?Sized,
{
    pub fn new(store: &'a S, config: &'a RevenueConfig) -> Self {
        Self { store, config }
    }

    fn require_project(&self, project_id: &str) -> EngineResult<()> {
        match self.store.project(project_id) {
            Some(_) => Ok(()),
            None => Err(EngineError::not_found("project", project_id)),
        }
    }

    /// Cost of a stored assignment, looked up by id.
    pub fn assignment_cost(&self, assignment_id: &str) -> EngineResult<AssignmentCost> {
        let assignment = self
            .store
            .assignment(assignment_id)
            .ok_or_else(|| EngineError::not_found("assignment", assignment_id))?;
        calculate_assignment_total_cost(assignment)
    }

    /// Per-assignment costs for a project, in store order.
    pub fn get_assignment_costs(&self, project_id: &str) -> EngineResult<Vec<AssignmentCostLine>> {
        self.require_project(project_id)?;
        self.store
            .assignments_for_project(project_id)
            .into_iter()
            .map(|a| {
                Ok(AssignmentCostLine {
                    assignment_id: a.id.clone(),
                    associate_id: a.associate_id.clone(),
                    role: a.role.clone(),
                    cost: calculate_assignment_total_cost(a)?,
                })
            })
            .collect()
    }

    /// Aggregate revenue, cost and margin for a project.
    ///
    /// Returns `Ok(None)` when the project exists but has no revenue record.
    pub fn get_project_revenue_calculation(
        &self,
        project_id: &str,
    ) -> EngineResult<Option<ProjectRevenueCalculation>> {
        self.require_project(project_id)?;
        let Some(record) = self.store.project_revenue(project_id) else {
            tracing::debug!(project = %project_id, "no revenue record, project not tracked");
            return Ok(None);
        };

        let lines = self.get_assignment_costs(project_id)?;
        let labor_cost: f64 = lines.iter().map(|l| l.cost.labor_cost).sum();
        let overhead_cost: f64 = lines.iter().map(|l| l.cost.overhead_cost).sum();
        let total_cost: f64 = lines.iter().map(|l| l.cost.total_cost).sum();

        let revenue = record.revenue;
        let gross_margin = revenue - total_cost;

        let calc = ProjectRevenueCalculation {
            revenue,
            labor_cost,
            overhead_cost,
            total_cost,
            gross_margin,
            margin_percent: margin_percent(revenue, gross_margin),
            assignment_count: lines.len(),
        };
        tracing::debug!(
            project = %project_id,
            revenue = calc.revenue,
            total_cost = calc.total_cost,
            assignments = calc.assignment_count,
            "project revenue calculated"
        );
        Ok(Some(calc))
    }

    /// Timeline progress of the project's revenue window as of `as_of`.
    pub fn get_project_timeline(
        &self,
        project_id: &str,
        as_of: NaiveDate,
    ) -> EngineResult<Option<ProjectTimeline>> {
        self.require_project(project_id)?;
        Ok(self
            .store
            .project_revenue(project_id)
            .map(|record| timeline_for(record, as_of)))
    }

    /// Hourly rate used to pre-fill a new assignment for an associate.
    pub fn get_associate_default_rate(&self, associate_id: &str) -> EngineResult<f64> {
        let associate = self
            .store
            .associate(associate_id)
            .ok_or_else(|| EngineError::not_found("associate", associate_id))?;

        match associate.default_hourly_rate {
            Some(rate) => Ok(rate),
            None => {
                tracing::warn!(
                    associate = %associate_id,
                    fallback = self.config.fallback_hourly_rate,
                    "no default rate configured, using fallback"
                );
                Ok(self.config.fallback_hourly_rate)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{
        Assignment, Associate, Project, ProjectHealth, ProjectStage, RevenueStatus, Store,
    };

    const EPS: f64 = 1e-9;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn assignment(id: &str, project: &str) -> Assignment {
        Assignment {
            id: id.to_string(),
            project_id: project.to_string(),
            associate_id: "dana".to_string(),
            role: "Consultant".to_string(),
            hourly_rate: 100.0,
            hours_per_day: 8.0,
            start_date: date(2026, 1, 1),
            end_date: date(2026, 1, 10),
            initial_overhead_per_day: 200.0,
            final_overhead_per_day: 50.0,
            ramp_days: 5,
        }
    }

    fn revenue(project: &str, amount: f64) -> ProjectRevenue {
        ProjectRevenue {
            project_id: project.to_string(),
            revenue: amount,
            start_date: date(2026, 1, 1),
            end_date: date(2026, 1, 31),
            status: RevenueStatus::Active,
        }
    }

    fn sample_store() -> Store {
        let mut store = Store::new();
        store.projects.push(Project {
            id: "p1".to_string(),
            name: "Migration".to_string(),
            client: "c1".to_string(),
            health: ProjectHealth::OnTrack,
            stage: ProjectStage::Execution,
            assigned_associates: vec!["dana".to_string()],
        });
        store.associates.push(Associate {
            id: "dana".to_string(),
            name: "Dana".to_string(),
            default_hourly_rate: Some(175.0),
        });
        store.associates.push(Associate {
            id: "lee".to_string(),
            name: "Lee".to_string(),
            default_hourly_rate: None,
        });
        store
    }

    #[test]
    fn test_missing_revenue_record_returns_none() {
        let store = sample_store();
        let config = RevenueConfig::default();
        let engine = RevenueEngine::new(&store, &config);
        assert_eq!(engine.get_project_revenue_calculation("p1").unwrap(), None);
    }

    #[test]
    fn test_zero_assignments() {
        let mut store = sample_store();
        store.project_revenues.push(revenue("p1", 20_000.0));
        let config = RevenueConfig::default();
        let engine = RevenueEngine::new(&store, &config);

        let calc = engine.get_project_revenue_calculation("p1").unwrap().unwrap();
        assert_eq!(calc.labor_cost, 0.0);
        assert_eq!(calc.overhead_cost, 0.0);
        assert_eq!(calc.gross_margin, calc.revenue);
        assert_eq!(calc.assignment_count, 0);
        assert!((calc.margin_percent - 100.0).abs() < EPS);
    }

    #[test]
    fn test_aggregates_matching_assignments_only() {
        let mut store = sample_store();
        store.project_revenues.push(revenue("p1", 20_000.0));
        store.assignments.push(assignment("a1", "p1"));
        store.assignments.push(assignment("a2", "p1"));
        store.assignments.push(assignment("a3", "other"));
        let config = RevenueConfig::default();
        let engine = RevenueEngine::new(&store, &config);

        let calc = engine.get_project_revenue_calculation("p1").unwrap().unwrap();
        assert_eq!(calc.assignment_count, 2);
        assert!((calc.labor_cost - 16_000.0).abs() < EPS);
        assert!((calc.overhead_cost - 1_900.0).abs() < EPS);
        assert!((calc.total_cost - 17_900.0).abs() < EPS);
        assert!((calc.gross_margin - 2_100.0).abs() < EPS);
        assert!((calc.margin_percent - 10.5).abs() < EPS);
    }

    #[test]
    fn test_zero_revenue_margin_percent_is_zero() {
        let mut store = sample_store();
        store.project_revenues.push(revenue("p1", 0.0));
        store.assignments.push(assignment("a1", "p1"));
        let config = RevenueConfig::default();
        let engine = RevenueEngine::new(&store, &config);

        let calc = engine.get_project_revenue_calculation("p1").unwrap().unwrap();
        assert_eq!(calc.margin_percent, 0.0);
        assert!(calc.gross_margin < 0.0);
    }

    #[test]
    fn test_calculation_is_idempotent() {
        let mut store = sample_store();
        store.project_revenues.push(revenue("p1", 12_345.0));
        store.assignments.push(assignment("a1", "p1"));
        let config = RevenueConfig::default();
        let engine = RevenueEngine::new(&store, &config);

        let first = engine.get_project_revenue_calculation("p1").unwrap();
        let second = engine.get_project_revenue_calculation("p1").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_assignment_propagates() {
        let mut store = sample_store();
        store.project_revenues.push(revenue("p1", 10_000.0));
        let mut bad = assignment("a1", "p1");
        bad.hourly_rate = -20.0;
        store.assignments.push(bad);
        let config = RevenueConfig::default();
        let engine = RevenueEngine::new(&store, &config);

        let err = engine.get_project_revenue_calculation("p1").unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[test]
    fn test_assignment_cost_lookup() {
        let mut store = sample_store();
        store.assignments.push(assignment("a1", "p1"));
        let config = RevenueConfig::default();
        let engine = RevenueEngine::new(&store, &config);

        assert!((engine.assignment_cost("a1").unwrap().total_cost - 8950.0).abs() < EPS);
        assert!(matches!(
            engine.assignment_cost("zzz"),
            Err(EngineError::NotFound { entity: "assignment", .. })
        ));
    }

    #[test]
    fn test_associate_default_rate() {
        let store = sample_store();
        let config = RevenueConfig {
            fallback_hourly_rate: 90.0,
        };
        let engine = RevenueEngine::new(&store, &config);

        assert_eq!(engine.get_associate_default_rate("dana").unwrap(), 175.0);
        assert_eq!(engine.get_associate_default_rate("lee").unwrap(), 90.0);
        assert!(engine.get_associate_default_rate("nobody").is_err());
    }

    #[test]
    fn test_timeline_midway() {
        let record = revenue("p1", 1.0);
        let timeline = timeline_for(&record, date(2026, 1, 10));
        assert_eq!(timeline.total_days, 31);
        assert_eq!(timeline.elapsed_days, 10);
        assert_eq!(timeline.remaining_days, 21);
        assert!((timeline.progress_percent - 10.0 / 31.0 * 100.0).abs() < EPS);
    }

    #[test]
    fn test_timeline_clamps_outside_window() {
        let record = revenue("p1", 1.0);
        let before = timeline_for(&record, date(2025, 12, 1));
        assert_eq!(before.elapsed_days, 0);
        assert_eq!(before.progress_percent, 0.0);

        let after = timeline_for(&record, date(2026, 5, 1));
        assert_eq!(after.elapsed_days, 31);
        assert_eq!(after.remaining_days, 0);
        assert_eq!(after.progress_percent, 100.0);
    }

    #[test]
    fn test_timeline_untracked_project() {
        let store = sample_store();
        let config = RevenueConfig::default();
        let engine = RevenueEngine::new(&store, &config);
        assert!(engine
            .get_project_timeline("p1", date(2026, 1, 5))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_unknown_project_is_not_found() {
        let store = sample_store();
        let config = RevenueConfig::default();
        let engine = RevenueEngine::new(&store, &config);

        assert_eq!(
            engine.get_project_revenue_calculation("ghost"),
            Err(EngineError::not_found("project", "ghost"))
        );
        assert!(matches!(
            engine.get_assignment_costs("ghost"),
            Err(EngineError::NotFound { entity: "project", .. })
        ));
        assert!(matches!(
            engine.get_project_timeline("ghost", date(2026, 1, 5)),
            Err(EngineError::NotFound { entity: "project", .. })
        ));
    }
}
