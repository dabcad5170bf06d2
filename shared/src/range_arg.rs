//! Inclusive parameter sweeps written as "start:stop:step".
//!
//! Used for spacing sweeps in layout search and anywhere a caller wants to
//! hand a bounded, evenly stepped range through a CLI flag or a JSON config.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Tolerance used when deciding whether the final step lands on `stop`
const STEP_EPSILON: f64 = 1e-9;

/// Largest number of values a sweep may produce
pub const MAX_SWEEP_VALUES: usize = 100_000;

/// Error types for sweep range parsing and validation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RangeError {
    #[error("range must be in format 'start:stop:step', got '{0}'")]
    Format(String),
    #[error("invalid {component} value '{text}'")]
    Number { component: &'static str, text: String },
    #[error("range bounds and step must be finite")]
    NonFinite,
    #[error("step cannot be zero")]
    ZeroStep,
    #[error("step {step} moves away from stop ({start} -> {stop})")]
    WrongDirection { start: f64, stop: f64, step: f64 },
    #[error("sweep {start}:{stop}:{step} produces more than {limit} values")]
    TooManyValues {
        start: f64,
        stop: f64,
        step: f64,
        limit: usize,
    },
}

/// Validated inclusive sweep from `start` to `stop` in increments of `step`.
///
/// Serialized as its string form so configs stay readable:
/// `"spacing_sweep": "1.5:3:0.25"`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RangeArg {
    start: f64,
    stop: f64,
    step: f64,
    len: usize,
}

impl RangeArg {
    /// Build a sweep, checking that the step is non-zero and points toward `stop`.
    ///
    /// `start == stop` is a valid single-value sweep.
    pub fn new(start: f64, stop: f64, step: f64) -> Result<Self, RangeError> {
        if !(start.is_finite() && stop.is_finite() && step.is_finite()) {
            return Err(RangeError::NonFinite);
        }
        if step == 0.0 {
            return Err(RangeError::ZeroStep);
        }
        if (stop - start) * step < 0.0 {
            return Err(RangeError::WrongDirection { start, stop, step });
        }
        // Non-finite when the span or the ratio overflows
        let steps = ((stop - start) / step + STEP_EPSILON).floor();
        if !(steps.is_finite() && steps < MAX_SWEEP_VALUES as f64) {
            return Err(RangeError::TooManyValues {
                start,
                stop,
                step,
                limit: MAX_SWEEP_VALUES,
            });
        }
        Ok(Self {
            start,
            stop,
            step,
            len: steps as usize + 1,
        })
    }

    /// Sweep from literals already known to be valid, for use in `const`
    /// defaults. `len` must be the number of values `new` would produce.
    pub const fn from_literals(start: f64, stop: f64, step: f64, len: usize) -> Self {
        Self {
            start,
            stop,
            step,
            len,
        }
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn stop(&self) -> f64 {
        self.stop
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Number of values the sweep produces (always at least one)
    pub fn len(&self) -> usize {
        self.len
    }

    /// A validated sweep is never empty
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterate the sweep values from `start` toward `stop` (inclusive).
    ///
    /// Each value is computed as `start + i * step` rather than by repeated
    /// addition, so long sweeps do not drift past their end point.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len()).map(move |i| self.start + i as f64 * self.step)
    }

    /// Collect the sweep into a vector
    pub fn to_vec(&self) -> Vec<f64> {
        self.values().collect()
    }
}

impl FromStr for RangeArg {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let [start, stop, step] = parts.as_slice() else {
            return Err(RangeError::Format(s.to_string()));
        };

        let parse = |component: &'static str, text: &str| {
            text.trim()
                .parse::<f64>()
                .map_err(|_| RangeError::Number {
                    component,
                    text: text.to_string(),
                })
        };

        RangeArg::new(
            parse("start", *start)?,
            parse("stop", *stop)?,
            parse("step", *step)?,
        )
    }
}

impl TryFrom<String> for RangeArg {
    type Error = RangeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RangeArg> for String {
    fn from(range: RangeArg) -> Self {
        range.to_string()
    }
}

impl fmt::Display for RangeArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.start, self.stop, self.step)
    }
}
