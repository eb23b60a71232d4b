//! vehidiag CLI entry point
//!
//! All logic is delegated to the CLI module; this only maps errors to the
//! exit code.

use vehidiag::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
