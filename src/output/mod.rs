pub mod formatter;

pub use formatter::{
    format_assignment_cost, format_cost_lines, format_currency, format_health_report,
    format_percent, format_revenue_calculation, format_timeline, format_trend, should_use_colors,
};
