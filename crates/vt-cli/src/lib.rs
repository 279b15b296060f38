//! Volunteer tracker CLI library.
//!
//! This crate provides the CLI interface for the volunteer tracker.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, PersonAction, ScheduleAction};
pub use config::Config;
