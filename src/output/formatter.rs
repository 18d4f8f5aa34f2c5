use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::health::{HealthScore, HealthTrend, TrendDirection};
use crate::revenue::{AssignmentCost, AssignmentCostLine, ProjectRevenueCalculation, ProjectTimeline};
use crate::store::{Assignment, Client};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format an amount with thousands separators and two decimals ("-1,234.50")
pub fn format_currency(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if negative && cents > 0 {
        format!("-{}.{:02}", grouped, frac)
    } else {
        format!("{}.{:02}", grouped, frac)
    }
}

/// Format a percentage with one decimal ("12.5%")
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

fn colored_margin(margin: f64, text: String, use_colors: bool) -> String {
    if !use_colors {
        text
    } else if margin < 0.0 {
        text.red().to_string()
    } else {
        text.green().to_string()
    }
}

fn colored_score(score: u8, use_colors: bool) -> String {
    let text = score.to_string();
    if !use_colors {
        text
    } else if score >= 75 {
        text.green().bold().to_string()
    } else if score >= 50 {
        text.yellow().bold().to_string()
    } else {
        text.red().bold().to_string()
    }
}

/// Single assignment cost as a short block
pub fn format_assignment_cost(assignment: &Assignment, cost: &AssignmentCost) -> String {
    format!(
        "{} ({} on {})\n  Window: {} to {} ({} days)\n  Labor: {}\n  Overhead: {}\n  Total: {}",
        assignment.id,
        assignment.associate_id,
        assignment.project_id,
        assignment.start_date,
        assignment.end_date,
        cost.days,
        format_currency(cost.labor_cost),
        format_currency(cost.overhead_cost),
        format_currency(cost.total_cost)
    )
}

/// Project revenue summary
pub fn format_revenue_calculation(
    project_id: &str,
    calc: &ProjectRevenueCalculation,
    use_colors: bool,
) -> String {
    let title = format!("Project {}", project_id);
    let title = if use_colors {
        title.bold().to_string()
    } else {
        title
    };
    let margin = colored_margin(
        calc.gross_margin,
        format!(
            "{} ({})",
            format_currency(calc.gross_margin),
            format_percent(calc.margin_percent)
        ),
        use_colors,
    );

    format!(
        "{}\n  Revenue: {}\n  Labor cost: {}\n  Overhead cost: {}\n  Total cost: {}\n  Gross margin: {}\n  Assignments: {}",
        title,
        format_currency(calc.revenue),
        format_currency(calc.labor_cost),
        format_currency(calc.overhead_cost),
        format_currency(calc.total_cost),
        margin,
        calc.assignment_count
    )
}

/// One line per assignment: id, associate, role, days, total cost
/// No headers (minimal format)
pub fn format_cost_lines(lines: &[AssignmentCostLine]) -> String {
    if lines.is_empty() {
        return "  No assignments.".to_string();
    }

    let id_width = lines.iter().map(|l| l.assignment_id.len()).max().unwrap_or(0);
    let associate_width = lines.iter().map(|l| l.associate_id.len()).max().unwrap_or(0);

    lines
        .iter()
        .map(|l| {
            format!(
                "  {:<id_w$}  {:<as_w$}  {:>4}d  {:>14}  {}",
                l.assignment_id,
                l.associate_id,
                l.cost.days,
                format_currency(l.cost.total_cost),
                l.role,
                id_w = id_width,
                as_w = associate_width
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Timeline progress line ("Day 10 of 31 (32.3%), 21 remaining")
pub fn format_timeline(timeline: &ProjectTimeline) -> String {
    format!(
        "Day {} of {} ({}), {} remaining",
        timeline.elapsed_days,
        timeline.total_days,
        format_percent(timeline.progress_percent),
        timeline.remaining_days
    )
}

fn trend_arrow(direction: TrendDirection) -> &'static str {
    match direction {
        TrendDirection::Up => "↑",
        TrendDirection::Down => "↓",
        TrendDirection::Stable => "→",
    }
}

/// Trend summary ("up ↑ (+6.5 pts)")
pub fn format_trend(trend: &HealthTrend) -> String {
    match trend.change() {
        Some(change) => format!(
            "{} {} ({:+.1} pts)",
            trend.direction,
            trend_arrow(trend.direction),
            change
        ),
        None => format!("{} {} (not enough history)", trend.direction, trend_arrow(trend.direction)),
    }
}

/// Full client health report: scores, factor table, trend, alerts, notes
pub fn format_health_report(
    client: &Client,
    calculated: &HealthScore,
    trend: &HealthTrend,
    use_colors: bool,
) -> String {
    let mut out = Vec::new();

    let title = format!("{} ({})", client.name, client.id);
    out.push(if use_colors {
        title.bold().to_string()
    } else {
        title
    });

    let effective = client.health.effective_score(calculated.score);
    match client.health.override_score {
        Some(_) => out.push(format!(
            "  Health: {} (manual override, calculated {})",
            colored_score(effective, use_colors),
            calculated.score
        )),
        None => out.push(format!("  Health: {}", colored_score(effective, use_colors))),
    }
    out.push(format!("  Trend: {}", format_trend(trend)));

    out.push("  Factors:".to_string());
    let label_width = calculated
        .factors
        .iter()
        .map(|f| f.factor.label().len())
        .max()
        .unwrap_or(0);
    for factor in &calculated.factors {
        let line = format!(
            "    {:<w$}  {:>5.1} x {:.2}  {}",
            factor.factor.label(),
            factor.score,
            factor.weight,
            factor.description,
            w = label_width
        );
        out.push(if use_colors && factor.score < 50.0 {
            line.red().to_string()
        } else {
            line
        });
    }

    if !client.health.alerts.is_empty() {
        out.push("  Alerts:".to_string());
        for alert in &client.health.alerts {
            let line = format!("    ! {}", alert);
            out.push(if use_colors {
                line.yellow().to_string()
            } else {
                line
            });
        }
    }

    if !client.health.notes.is_empty() {
        out.push(format!("  Notes: {}", client.health.notes));
    }

    out.join("\n")
}
