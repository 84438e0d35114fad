//! Leibniz series approximation of pi
//!
//! Sums the first `n` terms of
//!
//! ```text
//! pi = 4/1 - 4/3 + 4/5 - 4/7 + ...
//! ```
//!
//! The summation order is fixed: term 0 first, the sign flipping after every
//! term. Floating point addition is not associative, so any other order gives a
//! slightly different value.
//!
//! # Example
//!
//! ```
//! use compute_pi::{format_result, leibniz_pi};
//!
//! let pi = leibniz_pi(1_000);
//! assert!((pi - std::f64::consts::PI).abs() < 0.01);
//! assert!(format_result(pi).starts_with("Computed value of Pi: 3.14"));
//! ```

pub mod config;
pub mod report;

pub use config::{ConfigError, PiConfig};

/// Iteration count used by the `compute_pi` binary
pub const ITERATIONS: u64 = 1_000_000;

/// Prompt printed by the legacy console front end.
///
/// Nothing is ever read after it; it is only emitted for output parity.
pub const LEGACY_PROMPT: &str = "Enter the number of iterations: ";

/// Sum the first `iterations` terms of the Leibniz series.
///
/// The sign is kept as an integer and widened per term, and the denominator is
/// computed in 64-bit integer arithmetic before conversion, so the value is
/// reproducible bit for bit.
pub fn leibniz_pi(iterations: u64) -> f64 {
    let mut pi = 0.0_f64;
    let mut sign: i32 = 1;

    for i in 0..iterations {
        pi += f64::from(sign) * 4.0 / (2 * i + 1) as f64;
        sign = -sign;
    }

    tracing::debug!(iterations, pi, "leibniz series summed");
    pi
}

/// The contribution of term `i`: `(-1)^i * 4 / (2i + 1)`
///
/// The denominator is formed in `f64`, so it cannot overflow for large `i`.
/// It is exact, and equal to the one [`leibniz_pi`] uses, while `i < 2^52`.
pub fn term(i: u64) -> f64 {
    let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
    sign * 4.0 / (2.0 * i as f64 + 1.0)
}

/// Render the result line with 15 fractional digits
pub fn format_result(pi: f64) -> String {
    format!("Computed value of Pi: {:.15}", pi)
}
