//! CLI argument definitions using clap
//!
//! Commands:
//! - vehidiag domains [--domains-dir DIR] [--no-builtin]
//! - vehidiag check [--domains-dir DIR] [--no-builtin]
//! - vehidiag diagnose <DOMAIN> [--domains-dir DIR] [--json] [--verbose]
//! - vehidiag serve --config <PATH>

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// vehidiag - interactive vehicle fault diagnosis
#[derive(Parser, Debug)]
#[command(name = "vehidiag")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Where domains come from
#[derive(Args, Debug, Clone, Default)]
pub struct DomainSource {
    /// Directory of additional domain definitions (*.json)
    #[arg(long)]
    pub domains_dir: Option<PathBuf>,

    /// Do not load the built-in domains
    #[arg(long)]
    pub no_builtin: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List available domains
    Domains {
        #[command(flatten)]
        source: DomainSource,
    },

    /// Validate every domain and print its rule base report
    Check {
        #[command(flatten)]
        source: DomainSource,
    },

    /// Run an interactive diagnosis on stdin/stdout
    Diagnose {
        /// Domain id, e.g. brakes
        domain: String,

        #[command(flatten)]
        source: DomainSource,

        /// Print the result as a JSON envelope
        #[arg(long)]
        json: bool,

        /// Log every step to stderr
        #[arg(long)]
        verbose: bool,
    },

    /// Start the HTTP server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./vehidiag.json")]
        config: PathBuf,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_diagnose() {
        let cli = Cli::try_parse_from(["vehidiag", "diagnose", "brakes", "--json"]).unwrap();
        match cli.command {
            Command::Diagnose {
                domain,
                json,
                verbose,
                source,
            } => {
                assert_eq!(domain, "brakes");
                assert!(json);
                assert!(!verbose);
                assert!(source.domains_dir.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_check_with_dir() {
        let cli = Cli::try_parse_from([
            "vehidiag",
            "check",
            "--domains-dir",
            "/etc/vehidiag/domains",
            "--no-builtin",
        ])
        .unwrap();
        match cli.command {
            Command::Check { source } => {
                assert!(source.no_builtin);
                assert_eq!(
                    source.domains_dir,
                    Some(PathBuf::from("/etc/vehidiag/domains"))
                );
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_serve_default_config() {
        let cli = Cli::try_parse_from(["vehidiag", "serve"]).unwrap();
        match cli.command {
            Command::Serve { config, port } => {
                assert_eq!(config, PathBuf::from("./vehidiag.json"));
                assert_eq!(port, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
