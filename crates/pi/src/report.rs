//! At-exit report for `compute_pi`
//!
//! Controlled by the `COMPUTE_REPORT` env var:
//! - Unset, empty or `0` → no report
//! - `1` → human-readable to stderr
//! - `json` → JSON to stderr
//! - `json:/path` → JSON to file
//!
//! The report never touches stdout, so the result line stays byte-exact.

use std::io::Write;
use std::time::Duration;

/// Environment variable selecting the report mode
pub const REPORT_ENV: &str = "COMPUTE_REPORT";

// =============================================================================
// Report Configuration
// =============================================================================

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
    /// Parse from the `COMPUTE_REPORT` environment variable
    pub fn from_env() -> Option<Self> {
        let val = std::env::var(REPORT_ENV).ok()?;
        Self::parse(&val)
    }

    /// Parse a `COMPUTE_REPORT` value
    pub fn parse(val: &str) -> Option<Self> {
        match val {
            "" | "0" => None,
            "1" => Some(ReportConfig {
                format: ReportFormat::Human,
                destination: ReportDestination::Stderr,
            }),
            "json" => Some(ReportConfig {
                format: ReportFormat::Json,
                destination: ReportDestination::Stderr,
            }),
            s if s.starts_with("json:") => Some(ReportConfig {
                format: ReportFormat::Json,
                destination: ReportDestination::File(s[5..].to_string()),
            }),
            _ => {
                eprintln!("Warning: {}='{}' not recognized, ignoring", REPORT_ENV, val);
                None
            }
        }
    }
}

// =============================================================================
// Report Data
// =============================================================================

/// Figures collected from one run
#[derive(Debug, Clone, PartialEq)]
pub struct ReportData {
    pub iterations: u64,
    pub value: f64,
    pub elapsed: Duration,
}

impl ReportData {
    /// Distance from `std::f64::consts::PI`
    pub fn abs_error(&self) -> f64 {
        (self.value - std::f64::consts::PI).abs()
    }
}

// =============================================================================
// Formatting
// =============================================================================

pub fn format_human(data: &ReportData) -> String {
    let mut out = String::new();
    out.push_str("=== PI REPORT ===\n");
    out.push_str(&format!("Wall clock:  {} ms\n", data.elapsed.as_millis()));
    out.push_str(&format!("Iterations:  {}\n", data.iterations));
    out.push_str(&format!("Value:       {:.15}\n", data.value));
    out.push_str(&format!("Abs error:   {:e}\n", data.abs_error()));
    out.push_str("=================\n");
    out
}

pub fn format_json(data: &ReportData) -> String {
    let obj = serde_json::json!({
        "wall_clock_ms": data.elapsed.as_millis() as u64,
        "iterations": data.iterations,
        "value": data.value,
        "abs_error": data.abs_error(),
    });
    serde_json::to_string(&obj).unwrap_or_else(|_| "{}".to_string())
}

// =============================================================================
// Emit
// =============================================================================

/// Write the report for `data` as described by `config`
pub fn emit(config: &ReportConfig, data: &ReportData) {
    emit_to(config, data, &mut std::io::stderr());
}

/// Like [`emit`], with `fallback` standing in for stderr.
///
/// A report file that cannot be created or written is logged and the report
/// goes to `fallback` instead.
pub fn emit_to<W: Write>(config: &ReportConfig, data: &ReportData, fallback: &mut W) {
    let mut output = match config.format {
        ReportFormat::Human => format_human(data),
        ReportFormat::Json => format_json(data),
    };
    if config.format == ReportFormat::Json {
        output.push('\n');
    }

    match &config.destination {
        ReportDestination::Stderr => {
            let _ = fallback.write_all(output.as_bytes());
        }
        ReportDestination::File(path) => {
            let written =
                std::fs::File::create(path).and_then(|mut f| f.write_all(output.as_bytes()));
            if let Err(e) = written {
                tracing::warn!(path = %path, error = %e, "could not write report file");
                let _ = writeln!(fallback, "Warning: could not write report to {}: {}", path, e);
                let _ = fallback.write_all(output.as_bytes());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn sample() -> ReportData {
        ReportData {
            iterations: 1_000,
            value: 3.140592653839794,
            elapsed: Duration::from_millis(7),
        }
    }

    #[test]
    fn test_parse_modes() {
        assert_eq!(ReportConfig::parse(""), None);
        assert_eq!(ReportConfig::parse("0"), None);
        assert_eq!(
            ReportConfig::parse("1"),
            Some(ReportConfig {
                format: ReportFormat::Human,
                destination: ReportDestination::Stderr,
            })
        );
        assert_eq!(
            ReportConfig::parse("json"),
            Some(ReportConfig {
                format: ReportFormat::Json,
                destination: ReportDestination::Stderr,
            })
        );
        assert_eq!(
            ReportConfig::parse("json:/tmp/pi.json"),
            Some(ReportConfig {
                format: ReportFormat::Json,
                destination: ReportDestination::File("/tmp/pi.json".to_string()),
            })
        );
        assert_eq!(ReportConfig::parse("yaml"), None);
    }

    #[test]
    #[serial]
    fn test_from_env() {
        let orig = std::env::var(REPORT_ENV).ok();

        // SAFETY: serialized with the other env-mutating tests
        unsafe {
            std::env::remove_var(REPORT_ENV);
        }
        assert_eq!(ReportConfig::from_env(), None);

        unsafe {
            std::env::set_var(REPORT_ENV, "json");
        }
        assert_eq!(
            ReportConfig::from_env().map(|c| c.format),
            Some(ReportFormat::Json)
        );

        // SAFETY: restoring environment to original state
        unsafe {
            match orig {
                Some(v) => std::env::set_var(REPORT_ENV, v),
                None => std::env::remove_var(REPORT_ENV),
            }
        }
    }

    #[test]
    fn test_format_human() {
        let out = format_human(&sample());
        assert!(out.starts_with("=== PI REPORT ===\n"));
        assert!(out.contains("Wall clock:  7 ms\n"));
        assert!(out.contains("Iterations:  1000\n"));
        assert!(out.contains("Value:       3.140592653839794\n"));
    }

    #[test]
    fn test_format_json() {
        let out = format_json(&sample());
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["iterations"], 1_000);
        assert_eq!(parsed["wall_clock_ms"], 7);
        let value = parsed["value"].as_f64().unwrap();
        assert!((value - 3.140592653839794).abs() < 1e-12);
        let err = parsed["abs_error"].as_f64().unwrap();
        assert!((err - 0.001).abs() < 1e-6);
    }

    #[test]
    fn test_emit_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let config = ReportConfig {
            format: ReportFormat::Json,
            destination: ReportDestination::File(path.to_string_lossy().into_owned()),
        };

        emit(&config, &sample());

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.ends_with('\n'));
        let parsed: serde_json::Value = serde_json::from_str(written.trim_end()).unwrap();
        assert_eq!(parsed["iterations"], 1_000);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_failed_write_falls_back() {
        let config = ReportConfig::parse("json:/dev/full").unwrap();
        let mut sink = Vec::new();

        emit_to(&config, &sample(), &mut sink);

        let out = String::from_utf8(sink).unwrap();
        let mut lines = out.lines();
        assert!(
            lines
                .next()
                .unwrap()
                .starts_with("Warning: could not write report to /dev/full")
        );
        let parsed: serde_json::Value = serde_json::from_str(lines.next().unwrap()).unwrap();
        assert_eq!(parsed["iterations"], 1_000);
    }

    #[test]
    fn test_human_report_to_fallback() {
        let config = ReportConfig::parse("1").unwrap();
        let mut sink = Vec::new();

        emit_to(&config, &sample(), &mut sink);

        assert!(String::from_utf8(sink).unwrap().starts_with("=== PI REPORT ===\n"));
    }
}
