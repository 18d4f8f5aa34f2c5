use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::health::ClientHealthState;

pub const STORE_VERSION: u32 = 1;

/// Delivery health reported on a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectHealth {
    OnTrack,
    AtRisk,
    CriticalRisk,
}

/// Engagement lifecycle stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStage {
    NewBusiness,
    Onboarding,
    #[default]
    Execution,
    Closure,
    Learnings,
}

impl ProjectStage {
    /// Closed-out engagements no longer count towards client health.
    pub fn is_active(self) -> bool {
        !matches!(self, ProjectStage::Closure | ProjectStage::Learnings)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub client: String,
    pub health: ProjectHealth,
    #[serde(default)]
    pub stage: ProjectStage,
    #[serde(default)]
    pub assigned_associates: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Review,
    Done,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub project_id: String,
    #[serde(default)]
    pub title: String,
    pub status: TaskStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: String,
    pub project_id: String,
    #[serde(default)]
    pub title: String,
    /// Percent complete, 0-100
    pub completion: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentStatus {
    Draft,
    Pending,
    Approved,
    Rejected,
}

impl DocumentStatus {
    /// Drafts have not entered the approval workflow yet.
    pub fn is_submitted(self) -> bool {
        !matches!(self, DocumentStatus::Draft)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub project_id: String,
    #[serde(default)]
    pub name: String,
    pub status: DocumentStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Associate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub default_hourly_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub total_revenue: f64,
    #[serde(default)]
    pub outstanding_balance: f64,
    #[serde(default)]
    pub health: ClientHealthState,
}

/// One consultant staffed to one project for an inclusive date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: String,
    pub project_id: String,
    pub associate_id: String,
    #[serde(default)]
    pub role: String,
    pub hourly_rate: f64,
    pub hours_per_day: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_overhead_per_day: f64,
    pub final_overhead_per_day: f64,
    /// Days over which overhead decays from initial to final
    #[serde(default)]
    pub ramp_days: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RevenueStatus {
    #[default]
    Active,
    Completed,
    OnHold,
}

/// Contract terms for a project with revenue tracking enabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRevenue {
    pub project_id: String,
    pub revenue: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub status: RevenueStatus,
}

/// Every collection the engines read from, persisted as one JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub version: u32,
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub associates: Vec<Associate>,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
    #[serde(default)]
    pub project_revenues: Vec<ProjectRevenue>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Create a new empty store at the current format version
    pub fn new() -> Self {
        Self {
            version: STORE_VERSION,
            clients: Vec::new(),
            projects: Vec::new(),
            tasks: Vec::new(),
            milestones: Vec::new(),
            documents: Vec::new(),
            associates: Vec::new(),
            assignments: Vec::new(),
            project_revenues: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_store_empty() {
        let store = Store::new();
        assert_eq!(store.version, STORE_VERSION);
        assert!(store.clients.is_empty());
        assert!(store.assignments.is_empty());
    }

    #[test]
    fn test_enum_wire_names() {
        let json = serde_json::to_string(&ProjectHealth::CriticalRisk).unwrap();
        assert_eq!(json, "\"critical-risk\"");
        let status: TaskStatus = serde_json::from_str("\"in-progress\"").unwrap();
        assert_eq!(status, TaskStatus::InProgress);
    }

    #[test]
    fn test_stage_activity() {
        assert!(ProjectStage::NewBusiness.is_active());
        assert!(ProjectStage::Execution.is_active());
        assert!(!ProjectStage::Closure.is_active());
        assert!(!ProjectStage::Learnings.is_active());
    }

    #[test]
    fn test_draft_is_not_submitted() {
        assert!(!DocumentStatus::Draft.is_submitted());
        assert!(DocumentStatus::Pending.is_submitted());
        assert!(DocumentStatus::Rejected.is_submitted());
    }

    #[test]
    fn test_negative_ramp_days_rejected() {
        let json = r#"{
            "id": "a1", "project_id": "p1", "associate_id": "x",
            "hourly_rate": 100, "hours_per_day": 8,
            "start_date": "2026-01-01", "end_date": "2026-01-02",
            "initial_overhead_per_day": 10, "final_overhead_per_day": 5,
            "ramp_days": -3
        }"#;
        assert!(serde_json::from_str::<Assignment>(json).is_err());
    }

    #[test]
    fn test_client_defaults_health_state() {
        let json = r#"{ "id": "c1", "name": "Acme" }"#;
        let client: Client = serde_json::from_str(json).unwrap();
        assert_eq!(client.total_revenue, 0.0);
        assert!(client.health.override_score.is_none());
        assert!(client.health.history.is_empty());
    }
}
