//! Command line interface for vehidiag
//!
//! - domains: list the loaded domains
//! - check: validate domains and print rule base reports
//! - diagnose: interactive session on stdin/stdout
//! - serve: HTTP front door

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command, DomainSource};
pub use commands::{
    check, check_definitions, diagnose, domains, print_result, run, run_command, run_diagnosis,
    serve, CheckEntry,
};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_envelope, write_response};
