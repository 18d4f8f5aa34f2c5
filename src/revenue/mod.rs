pub mod config;
pub mod cost;
pub mod engine;

pub use config::{validate_revenue_config, RevenueConfig};
pub use cost::{
    calculate_assignment_total_cost, overhead_for_day, overhead_schedule, staffed_days,
    validate_assignment, AssignmentCost,
};
pub use engine::{
    margin_percent, timeline_for, AssignmentCostLine, ProjectRevenueCalculation,
    ProjectTimeline, RevenueEngine,
};
