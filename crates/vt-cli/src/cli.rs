//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Volunteer attendance tracker.
///
/// Records session attendance and facility check-ins against a shared
/// attendance record store.
#[derive(Debug, Parser)]
#[command(name = "vt", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Log attendance: records eligible sessions, or toggles facility
    /// presence when nothing needs logging.
    Log {
        /// The volunteer's id.
        person: String,
    },

    /// Open a facility visit.
    CheckIn {
        /// The volunteer's id.
        person: String,
    },

    /// Close the current facility visit.
    CheckOut {
        /// The volunteer's id.
        person: String,
    },

    /// Show a volunteer's presence and today's schedule.
    Status {
        /// The volunteer's id.
        person: String,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Facility attendance report.
    Attendance {
        /// Only show visits that are still open.
        #[arg(long, conflicts_with = "date")]
        active: bool,

        /// Restrict to one calendar day (defaults to today).
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Manage volunteers.
    Person {
        #[command(subcommand)]
        action: PersonAction,
    },

    /// Manage scheduled sessions.
    Schedule {
        #[command(subcommand)]
        action: ScheduleAction,
    },
}

/// Volunteer directory actions.
#[derive(Debug, Subcommand)]
pub enum PersonAction {
    /// Register a volunteer, or rename an existing one.
    Add {
        /// The volunteer's id.
        id: String,

        /// The volunteer's full name.
        name: String,
    },

    /// List registered volunteers.
    List,
}

/// Schedule actions.
#[derive(Debug, Subcommand)]
pub enum ScheduleAction {
    /// Add a session to a volunteer's schedule.
    Add {
        /// The volunteer's id.
        person: String,

        /// The session's id.
        session: String,

        /// Session date (YYYY-MM-DD).
        #[arg(long)]
        date: NaiveDate,

        /// Start time, e.g. "14:00" or "2:00 PM".
        #[arg(long)]
        start: String,

        /// End time (optional).
        #[arg(long)]
        end: Option<String>,

        /// Display label for the session.
        #[arg(long)]
        label: Option<String>,

        /// Location of the session.
        #[arg(long)]
        location: Option<String>,
    },

    /// Show a volunteer's upcoming sessions.
    Upcoming {
        /// The volunteer's id.
        person: String,
    },
}
