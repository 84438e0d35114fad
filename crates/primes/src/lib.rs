//! Sieve of Eratosthenes
//!
//! Determines primality of every integer in `0..=limit` using a flat presence
//! array.
//!
//! # Lifecycle
//!
//! ```text
//!   Allocating ──ok──▶ Sieving ──▶ Done
//!       │
//!       └──alloc failure──▶ Aborted
//! ```
//!
//! The presence array is reserved fallibly, so an impossible or refused
//! allocation surfaces as [`SieveError::Allocation`] instead of aborting the
//! process. No sieving happens on that path.
//!
//! [`sieve`] hands the finished table back to the caller. [`compute_primes`]
//! computes the same table and drops it, reporting only whether it succeeded.

pub mod config;
pub mod report;

pub use config::{AllocFailurePolicy, ConfigError, PrimesConfig};

use report::{Outcome, ReportConfig, ReportData};
use std::io::Write;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Upper bound used by the `compute_primes` binary
pub const LIMIT: usize = 1_000_000;

/// Line printed after a successful run
pub const COMPLETION_MESSAGE: &str = "End Program";

/// The only way a sieve run can fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SieveError {
    /// The presence array of `requested` slots could not be allocated.
    ///
    /// `requested` saturates at `usize::MAX` when `limit + 1` overflows.
    Allocation { requested: usize },
}

impl std::fmt::Display for SieveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SieveError::Allocation { requested } => write!(
                f,
                "failed to allocate presence array of {} slots",
                requested
            ),
        }
    }
}

impl std::error::Error for SieveError {}

/// Primality flags for `0..=limit`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimeTable {
    flags: Vec<bool>,
}

impl PrimeTable {
    /// Largest value covered by the table
    pub fn limit(&self) -> usize {
        self.flags.len() - 1
    }

    /// Whether `n` is prime; false for anything past the limit
    pub fn is_prime(&self, n: usize) -> bool {
        self.flags.get(n).copied().unwrap_or(false)
    }

    /// Number of primes in `0..=limit`
    pub fn count(&self) -> usize {
        self.flags.iter().filter(|&&p| p).count()
    }

    /// Primes in ascending order
    pub fn primes(&self) -> impl Iterator<Item = usize> + '_ {
        self.flags
            .iter()
            .enumerate()
            .filter_map(|(n, &p)| if p { Some(n) } else { None })
    }

    /// The raw presence array, indexed by value
    pub fn as_slice(&self) -> &[bool] {
        &self.flags
    }
}

/// Sieve `0..=limit` and return the primality table.
pub fn sieve(limit: usize) -> Result<PrimeTable, SieveError> {
    let len = limit.checked_add(1).ok_or(SieveError::Allocation {
        requested: usize::MAX,
    })?;

    let mut flags: Vec<bool> = Vec::new();
    flags
        .try_reserve_exact(len)
        .map_err(|_| SieveError::Allocation { requested: len })?;

    // 0 and 1 are not prime; everything from 2 up starts as a candidate
    flags.resize(len, true);
    flags[0] = false;
    if len > 1 {
        flags[1] = false;
    }

    // p <= limit / p is p * p <= limit without the overflow
    let mut p = 2;
    while p <= limit / p {
        if flags[p] {
            for multiple in (p * p..=limit).step_by(p) {
                flags[multiple] = false;
            }
        }
        p += 1;
    }

    debug!(limit, "sieve done");
    Ok(PrimeTable { flags })
}

/// Sieve `0..=limit` and discard the result.
///
/// The presence array is released before returning.
pub fn compute_primes(limit: usize) -> Result<(), SieveError> {
    sieve(limit).map(drop)
}

/// Sieve up to `limit` the way the `compute_primes` binary does.
///
/// Prints [`COMPLETION_MESSAGE`] to `out` on success. On allocation failure
/// `out` stays untouched and `policy` decides whether the error goes to `err`.
/// The report, if any, is emitted last with `err` as its stderr. Returns the
/// process exit status.
pub fn run<O: Write, E: Write>(
    limit: usize,
    policy: AllocFailurePolicy,
    report: Option<&ReportConfig>,
    out: &mut O,
    err: &mut E,
) -> i32 {
    info!(limit, "sieving");
    let start = Instant::now();
    let result = sieve(limit);
    let elapsed = start.elapsed();

    let (outcome, prime_count, code) = match result {
        Ok(table) => {
            let prime_count = report.map(|_| table.count());
            drop(table);
            let _ = writeln!(out, "{}", COMPLETION_MESSAGE);
            (Outcome::Done, prime_count, 0)
        }
        Err(e) => {
            warn!(limit, error = %e, "sieve aborted");
            if policy == AllocFailurePolicy::Report {
                let _ = writeln!(err, "Error: {}", e);
            }
            (Outcome::Aborted, None, policy.exit_code())
        }
    };

    if let Some(report) = report {
        let data = ReportData {
            limit,
            outcome,
            prime_count,
            elapsed,
        };
        report::emit_to(report, &data, err);
    }
    code
}
