//! CLI command implementations
//!
//! `domains`, `check` and `diagnose` load domains, do their work and exit.
//! `serve` boots the session manager and runs the HTTP front door until
//! interrupted.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use super::args::{Cli, Command, DomainSource};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{write_envelope, write_response};
use crate::domain::{builtin, Domain, DomainDefinition, DomainLoader, DomainRegistry, DomainReport};
use crate::http_server::HttpServer;
use crate::observability::{log_event, log_event_with_fields, Event, Logger, MetricsRegistry, Severity};
use crate::session::{
    DiagnosticResult, FileSessionArchive, MemorySessionArchive, SessionArchive, SessionManager,
    Step,
};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run a parsed command
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Domains { source } => domains(&source),
        Command::Check { source } => check(&source),
        Command::Diagnose {
            domain,
            source,
            json,
            verbose,
        } => diagnose(&domain, &source, json, verbose),
        Command::Serve { config, port } => serve(&config, port),
    }
}

fn load_registry(source: &DomainSource) -> CliResult<DomainRegistry> {
    let registry = DomainRegistry::load(!source.no_builtin, source.domains_dir.as_deref())?;
    if registry.is_empty() {
        return Err(CliError::domain_error("No domains loaded"));
    }
    Ok(registry)
}

// ==================
// domains
// ==================

/// List available domains
pub fn domains(source: &DomainSource) -> CliResult<()> {
    let registry = load_registry(source)?;
    write_response(&registry.summaries())
}

// ==================
// check
// ==================

/// Validation outcome of one domain definition
#[derive(Debug, Clone, Serialize)]
pub struct CheckEntry {
    pub id: String,
    pub origin: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<DomainReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckEntry {
    fn failed(id: String, origin: String, code: &'static str, error: String) -> Self {
        Self {
            id,
            origin,
            valid: false,
            report: None,
            code: Some(code),
            error: Some(error),
        }
    }
}

/// Validate every definition without stopping at the first failure.
pub fn check_definitions(source: &DomainSource) -> CliResult<Vec<CheckEntry>> {
    let mut candidates: Vec<(String, Result<DomainDefinition, CheckEntry>)> = Vec::new();

    if !source.no_builtin {
        for definition in builtin::all() {
            candidates.push(("builtin".to_string(), Ok(definition)));
        }
    }

    if let Some(dir) = source.domains_dir.as_deref() {
        let loader = DomainLoader::new(dir);
        for path in loader.definition_files()? {
            let origin = path.display().to_string();
            let parsed = DomainLoader::read_definition(&path).map_err(|e| {
                let id = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                CheckEntry::failed(id, origin.clone(), e.code(), e.to_string())
            });
            candidates.push((origin, parsed));
        }
    }

    let mut registry = DomainRegistry::new();
    let mut entries = Vec::with_capacity(candidates.len());

    for (origin, parsed) in candidates {
        let definition = match parsed {
            Ok(definition) => definition,
            Err(entry) => {
                entries.push(entry);
                continue;
            }
        };

        let id = definition.id.clone();
        let entry = match Domain::from_definition(definition).and_then(|d| registry.register(d)) {
            Ok(domain) => CheckEntry {
                id,
                origin,
                valid: true,
                report: Some(domain.report()),
                code: None,
                error: None,
            },
            Err(e) => CheckEntry::failed(id, origin, e.code(), e.to_string()),
        };
        entries.push(entry);
    }

    Ok(entries)
}

/// Validate domains and print their rule base reports
pub fn check(source: &DomainSource) -> CliResult<()> {
    let entries = check_definitions(source)?;
    write_response(&entries)?;

    let failed = entries.iter().filter(|e| !e.valid).count();
    if failed > 0 {
        return Err(CliError::domain_error(format!(
            "{} of {} domains failed validation",
            failed,
            entries.len()
        )));
    }
    Ok(())
}

// ==================
// diagnose
// ==================

/// Run an interactive diagnosis on stdin/stdout
pub fn diagnose(domain: &str, source: &DomainSource, json: bool, verbose: bool) -> CliResult<()> {
    Logger::set_min_severity(if verbose { Severity::Trace } else { Severity::Error });

    let registry = load_registry(source)?;
    let manager = SessionManager::in_memory(Arc::new(registry));

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut input = stdin.lock();
    let mut out = stdout.lock();

    let result = run_diagnosis(&manager, domain, &mut input, &mut out)?;
    if json {
        write_envelope(&mut out, &result)
    } else {
        print_result(&mut out, &result)
    }
}

/// Ask questions on `out` and read answers from `input` until a diagnosis
/// is reached. Invalid answers re-ask the same question.
pub fn run_diagnosis<R: BufRead, W: Write>(
    manager: &SessionManager,
    domain: &str,
    input: &mut R,
    out: &mut W,
) -> CliResult<DiagnosticResult> {
    let started = manager.start(domain)?;
    let session_id = started.session_id;
    let mut step = started.step;

    loop {
        let question = match step {
            Step::Diagnosis(result) => return Ok(result),
            Step::Question(question) => question,
        };

        let mut line = String::new();
        step = loop {
            write!(out, "{} [yes/no] ", question.text)?;
            out.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                return Err(CliError::io_error(
                    "Input ended before a diagnosis was reached",
                ));
            }

            match manager.submit(session_id, &line) {
                Ok(next) => break next,
                Err(e) if e.is_reject() => writeln!(out, "Please answer 'yes' or 'no'.")?,
                Err(e) => return Err(e.into()),
            }
        };
    }
}

/// Human-readable diagnosis
pub fn print_result<W: Write>(out: &mut W, result: &DiagnosticResult) -> CliResult<()> {
    writeln!(out)?;
    writeln!(out, "{}", result.message)?;
    writeln!(out)?;
    writeln!(out, "Most probable cause: {}", result.category_label)?;
    for (category, probability) in &result.category_probabilities {
        writeln!(out, "  {:<28} {:>6.1}%", category, probability * 100.0)?;
    }
    out.flush()?;
    Ok(())
}

// ==================
// serve
// ==================

/// Boot the session manager and serve HTTP until Ctrl-C
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    let mut config = Config::load(config_path)?;
    Logger::set_min_severity(config.min_severity()?);

    log_event(Event::BootStart);
    if let Some(port) = port {
        config.http.port = port;
    }
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("config", &config_path.display().to_string()),
            ("addr", &config.http.socket_addr()),
        ],
    );

    let registry = DomainRegistry::load(config.include_builtin, config.domains_dir.as_deref())?;
    if registry.is_empty() {
        return Err(CliError::domain_error("No domains loaded"));
    }

    let archive: Arc<dyn SessionArchive> = match &config.archive_path {
        Some(path) => Arc::new(FileSessionArchive::open(path).map_err(|e| {
            CliError::io_error(format!(
                "Failed to open session archive '{}': {}",
                path.display(),
                e
            ))
        })?),
        None => Arc::new(MemorySessionArchive::new()),
    };

    let manager = Arc::new(SessionManager::new(
        Arc::new(registry),
        archive,
        Arc::new(MetricsRegistry::new()),
    ));
    let domains = manager.registry().ids().join(",");
    log_event_with_fields(Event::BootComplete, &[("domains", &domains)]);

    let server = HttpServer::new(config.http.clone(), manager);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::serve_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::serve_failed(format!("HTTP server failed: {}", e)))
    })
}
