/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::PathBuf;
use std::process;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use regdesk::config::DeskConfig;
use regdesk::countdown::CountdownTicker;
use regdesk::delivery::EmailJsClient;
use regdesk::department::{Department, DepartmentPicker};
use regdesk::page::{PageView, RegistrationPage};
use regdesk::registration::{Requirement, SubmitError, Submitter};

// ── CLI argument definition ───────────────────────────────────────────────────

/// Registration desk for the weekly event.
///
/// Example:
///   regdesk --config regdesk.yaml submit \
///           --field name="Ada Lovelace" --field email=ada@example.org ...
#[derive(Debug, Parser)]
#[command(
    name = "regdesk",
    about = "Weekly event countdown and registration desk",
    long_about = None,
)]
struct Cli {
    /// Path to the YAML desk configuration file.
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show a live countdown to the next event.
    Countdown {
        /// Stop after this many ticks (runs until Ctrl-C when omitted).
        #[arg(short = 'n', long = "ticks")]
        ticks: Option<u64>,
    },

    /// Validate a registration and send it by email.
    Submit {
        /// Form field as key=value; repeat for each field.
        #[arg(short = 'f', long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,

        /// Department to join (see `regdesk departments`).
        #[arg(short = 'd', long = "department", requires = "department_reason")]
        department: Option<Department>,

        /// Why the visitor wants to join the department.
        #[arg(long = "department-reason")]
        department_reason: Option<String>,
    },

    /// List the departments a visitor can join.
    Departments,

    /// Print the configured form fields.
    Schema,
}

fn parse_field(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected key=value, got '{s}'"))
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    // Initialise structured logging.
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // ── Load configuration ────────────────────────────────────────────────────
    let mut config = match &cli.config {
        Some(path) => match DeskConfig::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load desk configuration: {:#}", e);
                process::exit(1);
            }
        },
        None => {
            warn!("No configuration file provided, using default desk settings");
            DeskConfig::default()
        }
    };
    config.email.apply_env();

    let result = match cli.command {
        Command::Countdown { ticks } => run_countdown(&config, ticks).await,
        Command::Submit {
            fields,
            department,
            department_reason,
        } => run_submit(config, fields, department, department_reason).await,
        Command::Departments => {
            for d in Department::ALL {
                println!("{d}");
            }
            Ok(())
        }
        Command::Schema => {
            print_schema(&config);
            Ok(())
        }
    };

    if let Err(e) = result {
        error!("{:#}", e);
        process::exit(1);
    }
}

// ── Subcommands ───────────────────────────────────────────────────────────────

async fn run_countdown(config: &DeskConfig, ticks: Option<u64>) -> Result<()> {
    info!(
        weekday = %config.event.weekday,
        time = %config.event.time,
        "Counting down to the next event"
    );

    let ticker = CountdownTicker::spawn(config.event, chrono::Local::now);
    let mut rx = ticker.subscribe();
    let mut shown = 0_u64;

    loop {
        tokio::select! {
            changed = rx.changed() => {
                changed.context("countdown ticker stopped unexpectedly")?;
                let remaining = *rx.borrow_and_update();
                println!(
                    "{:02} days  {:02} hours  {:02} minutes  {:02} seconds",
                    remaining.days, remaining.hours, remaining.minutes, remaining.seconds
                );
                shown += 1;
                if ticks.is_some_and(|limit| shown >= limit) {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    ticker.stop();
    Ok(())
}

async fn run_submit(
    config: DeskConfig,
    fields: Vec<(String, String)>,
    department: Option<Department>,
    department_reason: Option<String>,
) -> Result<()> {
    if !config.email.has_credentials() {
        warn!("EmailJS credentials are incomplete; delivery will be refused");
    }
    let client = EmailJsClient::new(config.email).context("Cannot build email client")?;
    let mut page = RegistrationPage::new(Submitter::new(config.form, client));

    for (name, value) in fields {
        if page.submitter().schema().field(&name).is_none() {
            warn!(field = %name, "Field is not part of the form and will not be sent");
        }
        page.set_field(name, value);
    }

    if let Some(department) = department {
        let mut picker = DepartmentPicker::new();
        picker.select(department);
        picker.set_reason(department_reason.unwrap_or_default());
        let choice = picker.confirm()?.clone();
        page.choose_department(&choice);
    }

    match page.submit().await {
        Ok(()) => {
            debug_assert_eq!(page.view(), PageView::Success);
            println!("Registration sent. See you at the event!");
            Ok(())
        }
        Err(SubmitError::Validation(e)) => {
            Err(anyhow!("please fill in all required fields: {}", e.missing.join(", ")))
        }
        Err(e) => Err(anyhow!(e).context("registration could not be sent, please try again")),
    }
}

fn print_schema(config: &DeskConfig) {
    for spec in config.form.fields() {
        let required = match &spec.requirement {
            Requirement::Always => "required".to_string(),
            Requirement::Optional => "optional".to_string(),
            Requirement::When { field, equals } => format!("required when {field} = {equals}"),
            Requirement::Custom(_) => "conditional".to_string(),
        };
        println!("{:<20} → {:<20} {}", spec.name, spec.param, required);
    }
}
