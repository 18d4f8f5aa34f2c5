use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use consult_ops::config::{self, Config};
use consult_ops::health::{self, HealthEngine};
use consult_ops::output;
use consult_ops::revenue::RevenueEngine;
use consult_ops::store::{
    self, Assignment, AssignmentRepository, ProjectRevenue, RevenueStatus, Store,
};
use consult_ops::EngineError;

const EXIT_SUCCESS: i32 = 0;
const EXIT_NOT_FOUND: i32 = 1;
const EXIT_INVALID: i32 = 2;
const EXIT_DATA: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Revenue, cost and margin for a project
    Revenue {
        project: String,
        /// Date used for timeline progress (defaults to today)
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Set or replace a project's revenue record
    SetRevenue {
        project: String,
        amount: f64,
        start: NaiveDate,
        end: NaiveDate,
        #[arg(long, value_enum, default_value_t = StatusArg::Active)]
        status: StatusArg,
    },
    /// Cost of a single assignment
    Cost { assignment: String },
    /// Default hourly rate for an associate
    Rate { associate: String },
    /// Manage assignments
    Assign {
        #[command(subcommand)]
        action: AssignAction,
    },
    /// Client health: score, factors, trend, alerts and notes
    Health { client: String },
    /// Set a manual health score (0-100) or `clear` it
    Override {
        client: String,
        value: String,
        #[arg(long)]
        note: Option<String>,
    },
    /// Replace a client's health notes
    Note { client: String, text: String },
    /// Add or remove a client alert
    Alert {
        #[command(subcommand)]
        action: AlertAction,
    },
    /// Interactive setup wizard that writes the config file
    Init {
        /// Where to write the config (defaults to ~/.config/consult-ops/config.yaml)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum AssignAction {
    /// Staff an associate to a project
    Add {
        project: String,
        associate: String,
        start: NaiveDate,
        end: NaiveDate,
        /// Hourly rate (defaults to the associate's default rate)
        #[arg(long)]
        rate: Option<f64>,
        #[arg(long, default_value_t = 8.0)]
        hours: f64,
        #[arg(long, default_value_t = 0.0)]
        initial_overhead: f64,
        /// Defaults to the initial overhead
        #[arg(long)]
        final_overhead: Option<f64>,
        #[arg(long, default_value_t = 0)]
        ramp_days: u32,
        #[arg(long, default_value = "")]
        role: String,
        /// Explicit id (generated when omitted)
        #[arg(long)]
        id: Option<String>,
    },
    /// Change fields of an existing assignment
    Update {
        id: String,
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
        #[arg(long)]
        rate: Option<f64>,
        #[arg(long)]
        hours: Option<f64>,
        #[arg(long)]
        initial_overhead: Option<f64>,
        #[arg(long)]
        final_overhead: Option<f64>,
        #[arg(long)]
        ramp_days: Option<u32>,
        #[arg(long)]
        role: Option<String>,
    },
    /// Delete an assignment
    Remove { id: String },
    /// List assignments with their costs
    List {
        #[arg(long)]
        project: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum AlertAction {
    Add { client: String, text: String },
    Remove { client: String, text: String },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StatusArg {
    Active,
    Completed,
    OnHold,
}

impl From<StatusArg> for RevenueStatus {
    fn from(s: StatusArg) -> Self {
        match s {
            StatusArg::Active => RevenueStatus::Active,
            StatusArg::Completed => RevenueStatus::Completed,
            StatusArg::OnHold => RevenueStatus::OnHold,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "consult-ops")]
#[command(about = "Engagement economics and client health for consulting teams", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/consult-ops/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to the data store (overrides `data_file` in config)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Name recorded on health history entries
    #[arg(long, global = true)]
    user: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = cli.config.map(PathBuf::from);

    // Init runs before config loading: it is how a config gets created
    if let Commands::Init { path } = cli.command {
        if let Err(e) = config::init::run_init_wizard(path.or(config_path)) {
            eprintln!("Init failed: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let config = match config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate config at startup
    if let Err(errors) = config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let data_path = match config::resolve_data_path(&config, cli.data) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Data file error: {:#}", e);
            std::process::exit(EXIT_DATA);
        }
    };

    let mut store = match store::load_store(&data_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Data file error: {:#}", e);
            std::process::exit(EXIT_DATA);
        }
    };

    let ctx = AppContext {
        config: &config,
        acting_user: config::resolve_acting_user(&config, cli.user),
        use_colors: !cli.no_color && output::should_use_colors(),
    };

    let modified = match run(cli.command, &ctx, &mut store) {
        Ok(modified) => modified,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(exit_code_for(&e));
        }
    };

    if modified {
        if let Err(e) = store::save_store(&data_path, &store) {
            eprintln!("Data file error: {:#}", e);
            std::process::exit(EXIT_DATA);
        }
    }

    std::process::exit(EXIT_SUCCESS);
}

/// Settings resolved once at startup and shared by every command.
struct AppContext<'a> {
    config: &'a Config,
    acting_user: String,
    use_colors: bool,
}

/// Map an error to a process exit code. Engine errors carry their own
/// category; anything else is an I/O problem with the data file.
fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<EngineError>() {
        Some(EngineError::NotFound { .. }) => EXIT_NOT_FOUND,
        Some(EngineError::InvalidInput(_)) | Some(EngineError::InvalidScore(_)) => EXIT_INVALID,
        None => EXIT_DATA,
    }
}

/// Run one command. Returns whether the store was modified and must be saved.
fn run(command: Commands, ctx: &AppContext, store: &mut Store) -> Result<bool> {
    match command {
        Commands::Revenue { project, as_of } => {
            let engine = RevenueEngine::new(&*store, &ctx.config.revenue);
            match engine.get_project_revenue_calculation(&project)? {
                Some(calc) => {
                    println!(
                        "{}",
                        output::format_revenue_calculation(&project, &calc, ctx.use_colors)
                    );
                    println!();
                    println!("{}", output::format_cost_lines(&engine.get_assignment_costs(&project)?));
                    let as_of = as_of.unwrap_or_else(|| chrono::Local::now().date_naive());
                    if let Some(timeline) = engine.get_project_timeline(&project, as_of)? {
                        println!();
                        println!("  Timeline: {}", output::format_timeline(&timeline));
                    }
                }
                None => println!("Project {} has no revenue record.", project),
            }
            Ok(false)
        }
        Commands::SetRevenue {
            project,
            amount,
            start,
            end,
            status,
        } => {
            store.set_project_revenue(ProjectRevenue {
                project_id: project.clone(),
                revenue: amount,
                start_date: start,
                end_date: end,
                status: status.into(),
            })?;
            println!(
                "Revenue for {} set to {}",
                project,
                output::format_currency(amount)
            );
            Ok(true)
        }
        Commands::Cost { assignment } => {
            let engine = RevenueEngine::new(&*store, &ctx.config.revenue);
            let cost = engine.assignment_cost(&assignment)?;
            if let Some(a) = store.assignment(&assignment) {
                println!("{}", output::format_assignment_cost(a, &cost));
            }
            Ok(false)
        }
        Commands::Rate { associate } => {
            let engine = RevenueEngine::new(&*store, &ctx.config.revenue);
            let rate = engine.get_associate_default_rate(&associate)?;
            println!("{}", output::format_currency(rate));
            Ok(false)
        }
        Commands::Assign { action } => run_assign(action, ctx, store),
        Commands::Health { client } => {
            let refresh = health::refresh_client_health(store, &ctx.config.health, &client)?;
            let trend = HealthEngine::new(&*store, &ctx.config.health).client_health_trend(&client)?;
            println!(
                "{}",
                output::format_health_report(
                    &refresh.client,
                    &refresh.calculated,
                    &trend,
                    ctx.use_colors
                )
            );
            Ok(refresh.changed)
        }
        Commands::Override {
            client,
            value,
            note,
        } => {
            let value = parse_override(&value)?;
            let updated = health::update_client_health_override(
                store,
                &ctx.config.health,
                &client,
                value,
                note,
                &ctx.acting_user,
            )?;
            match updated.health.override_score {
                Some(score) => println!("{}: health overridden to {}", updated.name, score),
                None => println!(
                    "{}: override cleared, health is {}",
                    updated.name,
                    updated.health.last_score.unwrap_or_default()
                ),
            }
            Ok(true)
        }
        Commands::Note { client, text } => {
            let updated = health::add_client_health_note(store, &client, &text)?;
            println!("{}: notes updated", updated.name);
            Ok(true)
        }
        Commands::Alert { action } => {
            let updated = match action {
                AlertAction::Add { client, text } => {
                    health::add_client_health_alert(store, &client, &text)?
                }
                AlertAction::Remove { client, text } => {
                    health::remove_client_health_alert(store, &client, &text)?
                }
            };
            println!("{}: {} alert(s)", updated.name, updated.health.alerts.len());
            Ok(true)
        }
        // Handled before the store is loaded
        Commands::Init { .. } => Ok(false),
    }
}

fn run_assign(action: AssignAction, ctx: &AppContext, store: &mut Store) -> Result<bool> {
    match action {
        AssignAction::Add {
            project,
            associate,
            start,
            end,
            rate,
            hours,
            initial_overhead,
            final_overhead,
            ramp_days,
            role,
            id,
        } => {
            let hourly_rate = match rate {
                Some(r) => r,
                None => RevenueEngine::new(&*store, &ctx.config.revenue)
                    .get_associate_default_rate(&associate)?,
            };
            let assignment = Assignment {
                id: id.unwrap_or_else(|| store.next_assignment_id()),
                project_id: project,
                associate_id: associate,
                role,
                hourly_rate,
                hours_per_day: hours,
                start_date: start,
                end_date: end,
                initial_overhead_per_day: initial_overhead,
                final_overhead_per_day: final_overhead.unwrap_or(initial_overhead),
                ramp_days,
            };
            let created = store.create_assignment(assignment)?;
            println!("Created {}", created.id);
            Ok(true)
        }
        AssignAction::Update {
            id,
            start,
            end,
            rate,
            hours,
            initial_overhead,
            final_overhead,
            ramp_days,
            role,
        } => {
            let mut assignment = store
                .assignment(&id)
                .cloned()
                .ok_or_else(|| EngineError::not_found("assignment", id.clone()))?;
            if let Some(v) = start {
                assignment.start_date = v;
            }
            if let Some(v) = end {
                assignment.end_date = v;
            }
            if let Some(v) = rate {
                assignment.hourly_rate = v;
            }
            if let Some(v) = hours {
                assignment.hours_per_day = v;
            }
            if let Some(v) = initial_overhead {
                assignment.initial_overhead_per_day = v;
            }
            if let Some(v) = final_overhead {
                assignment.final_overhead_per_day = v;
            }
            if let Some(v) = ramp_days {
                assignment.ramp_days = v;
            }
            if let Some(v) = role {
                assignment.role = v;
            }
            let updated = store.update_assignment(assignment)?;
            println!("Updated {}", updated.id);
            Ok(true)
        }
        AssignAction::Remove { id } => {
            let removed = store.delete_assignment(&id)?;
            println!("Removed {} ({} on {})", removed.id, removed.associate_id, removed.project_id);
            Ok(true)
        }
        AssignAction::List { project } => {
            let engine = RevenueEngine::new(&*store, &ctx.config.revenue);
            let project_ids: Vec<String> = match project {
                Some(p) => vec![p],
                None => store.projects.iter().map(|p| p.id.clone()).collect(),
            };
            for project_id in project_ids {
                let lines = engine.get_assignment_costs(&project_id)?;
                if lines.is_empty() {
                    continue;
                }
                println!("{}", project_id);
                println!("{}", output::format_cost_lines(&lines));
            }
            Ok(false)
        }
    }
}

/// Parse an override argument: `clear` or an integer score.
fn parse_override(raw: &str) -> Result<Option<i64>> {
    if raw.eq_ignore_ascii_case("clear") {
        return Ok(None);
    }
    let value = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| EngineError::invalid(format!("'{}' is not a score or 'clear'", raw)))?;
    Ok(Some(value))
}
