//! At-exit report for `compute_primes`
//!
//! Controlled by the `COMPUTE_REPORT` env var:
//! - Unset, empty or `0` → no report
//! - `1` → human-readable to stderr
//! - `json` → JSON to stderr
//! - `json:/path` → JSON to file

use std::io::Write;
use std::time::Duration;

pub const REPORT_ENV: &str = "COMPUTE_REPORT";

/// Output format
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportFormat {
    Human,
    Json,
}

/// Output destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportDestination {
    Stderr,
    File(String),
}

/// Parsed report configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub format: ReportFormat,
    pub destination: ReportDestination,
}

impl ReportConfig {
    pub fn from_env() -> Option<Self> {
        let val = std::env::var(REPORT_ENV).ok()?;
        Self::parse(&val)
    }

    pub fn parse(val: &str) -> Option<Self> {
        let (format, destination) = match val {
            "" | "0" => return None,
            "1" => (ReportFormat::Human, ReportDestination::Stderr),
            "json" => (ReportFormat::Json, ReportDestination::Stderr),
            s if s.starts_with("json:") => (
                ReportFormat::Json,
                ReportDestination::File(s[5..].to_string()),
            ),
            _ => {
                eprintln!("Warning: {}='{}' not recognized, ignoring", REPORT_ENV, val);
                return None;
            }
        };
        Some(ReportConfig {
            format,
            destination,
        })
    }
}

/// How a sieve run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Aborted,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Done => "done",
            Outcome::Aborted => "aborted",
        }
    }
}

/// Figures collected from one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportData {
    pub limit: usize,
    pub outcome: Outcome,
    /// Present only when the sieve completed
    pub prime_count: Option<usize>,
    pub elapsed: Duration,
}

pub fn format_human(data: &ReportData) -> String {
    let mut out = String::new();
    out.push_str("=== PRIMES REPORT ===\n");
    out.push_str(&format!("Wall clock:  {} ms\n", data.elapsed.as_millis()));
    out.push_str(&format!("Limit:       {}\n", data.limit));
    out.push_str(&format!("Outcome:     {}\n", data.outcome.as_str()));
    if let Some(count) = data.prime_count {
        out.push_str(&format!("Primes:      {}\n", count));
    }
    out.push_str("=====================\n");
    out
}

pub fn format_json(data: &ReportData) -> String {
    let mut map = serde_json::Map::new();
    map.insert(
        "wall_clock_ms".into(),
        serde_json::Value::Number((data.elapsed.as_millis() as u64).into()),
    );
    map.insert(
        "limit".into(),
        serde_json::Value::Number((data.limit as u64).into()),
    );
    map.insert(
        "outcome".into(),
        serde_json::Value::String(data.outcome.as_str().to_string()),
    );
    if let Some(count) = data.prime_count {
        map.insert(
            "prime_count".into(),
            serde_json::Value::Number((count as u64).into()),
        );
    }
    serde_json::to_string(&serde_json::Value::Object(map)).unwrap_or_else(|_| "{}".to_string())
}

/// Write the report to stderr or to the configured file
pub fn emit(config: &ReportConfig, data: &ReportData) {
    emit_to(config, data, &mut std::io::stderr());
}

/// Write the report, using `fallback` for the stderr destination and for a
/// file that cannot be created or written
pub fn emit_to<W: Write>(config: &ReportConfig, data: &ReportData, fallback: &mut W) {
    let output = match config.format {
        ReportFormat::Human => format_human(data),
        ReportFormat::Json => format_json(data) + "\n",
    };

    let path = match &config.destination {
        ReportDestination::Stderr => {
            let _ = fallback.write_all(output.as_bytes());
            return;
        }
        ReportDestination::File(path) => path,
    };

    let written = std::fs::File::create(path).and_then(|mut f| f.write_all(output.as_bytes()));
    if let Err(e) = written {
        tracing::warn!(path = %path, error = %e, "could not write report file");
        let _ = writeln!(fallback, "Warning: could not write report to {}: {}", path, e);
        let _ = fallback.write_all(output.as_bytes());
    }
}
