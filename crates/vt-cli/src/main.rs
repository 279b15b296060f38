use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use vt_cli::commands::{attendance, checkin, checkout, log, person, schedule, status};
use vt_cli::{Cli, Commands, Config, PersonAction, ScheduleAction};
use vt_core::{PersonId, SessionId, SystemClock};

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<(vt_store::Database, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = vt_store::Database::open(&config.database_path).context("failed to open database")?;
    Ok((db, config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let clock = SystemClock;
    let mut stdout = std::io::stdout();

    match &cli.command {
        Some(Commands::Log { person }) => {
            let (mut db, _config) = open_database(cli.config.as_deref())?;
            log::run(&mut stdout, &mut db, &clock, &PersonId::new(person.clone())?)?;
        }
        Some(Commands::CheckIn { person }) => {
            let (mut db, _config) = open_database(cli.config.as_deref())?;
            checkin::run(&mut stdout, &mut db, &clock, &PersonId::new(person.clone())?)?;
        }
        Some(Commands::CheckOut { person }) => {
            let (mut db, _config) = open_database(cli.config.as_deref())?;
            checkout::run(&mut stdout, &mut db, &clock, &PersonId::new(person.clone())?)?;
        }
        Some(Commands::Status { person, json }) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            status::run(
                &mut stdout,
                &db,
                &clock,
                &PersonId::new(person.clone())?,
                *json,
            )?;
        }
        Some(Commands::Attendance { active, date, json }) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            attendance::run(&mut stdout, &db, &clock, *active, *date, *json)?;
        }
        Some(Commands::Person { action }) => {
            let (mut db, _config) = open_database(cli.config.as_deref())?;
            match action {
                PersonAction::Add { id, name } => {
                    person::add(&mut stdout, &mut db, &PersonId::new(id.clone())?, name)?;
                }
                PersonAction::List => person::list(&mut stdout, &db)?,
            }
        }
        Some(Commands::Schedule { action }) => {
            let (mut db, _config) = open_database(cli.config.as_deref())?;
            match action {
                ScheduleAction::Add {
                    person,
                    session,
                    date,
                    start,
                    end,
                    label,
                    location,
                } => {
                    schedule::add(
                        &mut stdout,
                        &mut db,
                        &PersonId::new(person.clone())?,
                        &SessionId::new(session.clone())?,
                        *date,
                        start,
                        end.as_deref(),
                        label.as_deref(),
                        location.as_deref(),
                    )?;
                }
                ScheduleAction::Upcoming { person } => {
                    schedule::upcoming(&mut stdout, &db, &clock, &PersonId::new(person.clone())?)?;
                }
            }
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
