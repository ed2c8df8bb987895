//! `healthcard` command-line front end.
//!
//! Each subcommand builds a synchronizer or dashboard client over one
//! [`HttpTransport`](healthcard_sync::HttpTransport), runs a single cycle
//! (load and render, or mutate and reload) and prints the result.
//!
//! Usage:
//!   healthcard list allergy
//!   healthcard add vaccination -s vaccine_name=BCG -s vaccination_date=2024-01-10
//!   healthcard delete surgery 12 --yes
//!   healthcard doctor overview

pub mod args;
mod commands;
pub mod prompt;
pub mod render;

pub use args::{Args, Command, Module};
pub use commands::{Session, execute, field_value};
pub use prompt::TerminalPrompt;
