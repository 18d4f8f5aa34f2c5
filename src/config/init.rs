use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{get_config_path, Config};
use crate::health::{validate_health_config, HealthConfig, HealthWeights};
use crate::revenue::RevenueConfig;

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Parse a number within an inclusive range.
fn parse_bounded(input: &str, min: f64, max: f64) -> Result<f64, String> {
    match input.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= min && v <= max => Ok(v),
        Ok(v) => Err(format!("{} is outside {}..={}", v, min, max)),
        Err(_) => Err(format!("'{}' is not a number", input.trim())),
    }
}

/// Keep asking until the answer is a number within range.
fn prompt_number(message: &str, default: f64, min: f64, max: f64) -> Result<f64> {
    loop {
        let input = prompt_with_default(message, &default.to_string())?;
        match parse_bounded(&input, min, max) {
            Ok(v) => return Ok(v),
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    }
}

fn prompt_weights(defaults: &HealthWeights) -> Result<HealthWeights> {
    loop {
        let weights = HealthWeights {
            project_health: prompt_number("  Project health", defaults.project_health, 0.0, 1.0)?,
            task_completion: prompt_number("  Task completion", defaults.task_completion, 0.0, 1.0)?,
            milestone_progress: prompt_number(
                "  Milestone progress",
                defaults.milestone_progress,
                0.0,
                1.0,
            )?,
            financial_health: prompt_number(
                "  Financial health",
                defaults.financial_health,
                0.0,
                1.0,
            )?,
            document_approval: prompt_number(
                "  Document approval",
                defaults.document_approval,
                0.0,
                1.0,
            )?,
        };

        let candidate = HealthConfig {
            weights: weights.clone(),
            ..HealthConfig::default()
        };
        match validate_health_config(&candidate) {
            Ok(()) => return Ok(weights),
            Err(errors) => {
                for e in errors {
                    println!("  Invalid: {}", e);
                }
                println!("  Let's try the weights again.");
            }
        }
    }
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the suggested config file path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    println!("consult-ops configuration");
    println!("=========================");
    println!();

    // 1. Identity recorded on health history entries
    let user_default = std::env::var("USER").unwrap_or_else(|_| "ops-admin".to_string());
    let acting_user = prompt_with_default("Your name for the health audit log", &user_default)?;

    // 2. Revenue
    println!();
    println!("New assignments are pre-filled with the associate's default hourly rate.");
    println!("Associates without one fall back to this rate.");
    let fallback_hourly_rate = prompt_number(
        "Fallback hourly rate",
        RevenueConfig::default().fallback_hourly_rate,
        0.0,
        f64::MAX,
    )?;

    // 3. Health weights
    println!();
    println!("Client health blends five factors. Weights must add up to 1.0.");
    let defaults = HealthConfig::default();
    let weights = if prompt_yes_no(
        "Use default weights? (projects 0.30, tasks 0.20, milestones 0.20, financial 0.15, documents 0.15)",
        true,
    )? {
        defaults.weights.clone()
    } else {
        prompt_weights(&defaults.weights)?
    };

    // 4. Config path
    let default_config_path = match default_path {
        Some(p) => p,
        None => get_config_path()?,
    };
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    // 5. Write config
    let config = Config {
        data_file: None,
        acting_user: Some(acting_user),
        health: HealthConfig {
            weights,
            ..defaults
        },
        revenue: RevenueConfig {
            fallback_hourly_rate,
        },
    };

    let yaml = serde_saphyr::to_string(&config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(&config_path, &yaml)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Run `consult-ops health <client>` to get started.");

    Ok(())
}
