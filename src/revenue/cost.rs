use serde::Serialize;

use crate::error::{EngineError, EngineResult};
use crate::store::Assignment;

/// Cost of one assignment over its whole staffing window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AssignmentCost {
    pub days: u32,
    pub labor_cost: f64,
    pub overhead_cost: f64,
    pub total_cost: f64,
}

/// Reject assignments whose rate terms cannot produce a meaningful cost.
///
/// Date order is not checked here: an end date before the start date simply
/// yields zero staffed days.
pub fn validate_assignment(assignment: &Assignment) -> EngineResult<()> {
    let checks = [
        ("hourly_rate", assignment.hourly_rate),
        ("initial_overhead_per_day", assignment.initial_overhead_per_day),
        ("final_overhead_per_day", assignment.final_overhead_per_day),
    ];
    for (field, value) in checks {
        if !value.is_finite() || value < 0.0 {
            return Err(EngineError::invalid(format!(
                "assignment '{}': {} must be a non-negative number, got {}",
                assignment.id, field, value
            )));
        }
    }

    if !assignment.hours_per_day.is_finite() || assignment.hours_per_day <= 0.0 {
        return Err(EngineError::invalid(format!(
            "assignment '{}': hours_per_day must be positive, got {}",
            assignment.id, assignment.hours_per_day
        )));
    }

    Ok(())
}

/// Inclusive number of staffed days; zero when the window is inverted.
pub fn staffed_days(assignment: &Assignment) -> u32 {
    let span = (assignment.end_date - assignment.start_date).num_days() + 1;
    if span <= 0 {
        0
    } else {
        u32::try_from(span).unwrap_or(u32::MAX)
    }
}

/// Overhead charged on day `day` (0-indexed from the assignment start).
///
/// Decays linearly from the initial to the final rate over `ramp_days`, then
/// holds at the final rate.
pub fn overhead_for_day(assignment: &Assignment, day: u32) -> f64 {
    let ramp = assignment.ramp_days;
    if ramp == 0 || day >= ramp {
        return assignment.final_overhead_per_day;
    }
    let initial = assignment.initial_overhead_per_day;
    let delta = assignment.final_overhead_per_day - initial;
    initial + delta * f64::from(day) / f64::from(ramp)
}

/// Per-day overhead for every staffed day, in day order.
pub fn overhead_schedule(assignment: &Assignment) -> Vec<f64> {
    (0..staffed_days(assignment))
        .map(|day| overhead_for_day(assignment, day))
        .collect()
}

/// Labor plus overhead for one assignment.
///
/// Overhead is accumulated day by day in order with no intermediate
/// rounding; that summation is the reference result, not a closed form.
pub fn calculate_assignment_total_cost(assignment: &Assignment) -> EngineResult<AssignmentCost> {
    validate_assignment(assignment)?;

    let days = staffed_days(assignment);
    if days == 0 {
        tracing::warn!(
            assignment = %assignment.id,
            start = %assignment.start_date,
            end = %assignment.end_date,
            "assignment window is inverted, costing zero days"
        );
    }

    let labor_cost = f64::from(days) * assignment.hours_per_day * assignment.hourly_rate;

    let mut overhead_cost = 0.0;
    for day in 0..days {
        overhead_cost += overhead_for_day(assignment, day);
    }

    let cost = AssignmentCost {
        days,
        labor_cost,
        overhead_cost,
        total_cost: labor_cost + overhead_cost,
    };
    tracing::debug!(
        assignment = %assignment.id,
        days = cost.days,
        labor = cost.labor_cost,
        overhead = cost.overhead_cost,
        "assignment cost calculated"
    );
    Ok(cost)
}
