//! Execution bookkeeping.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::engine::CANCEL_RETURN_CODE;

/// Outcome of one engine execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnCode {
    /// The engine finished with status zero.
    Success,
    /// The execution was cancelled by the user.
    Cancel,
    /// The engine failed with the given non-zero status.
    Error(i32),
}

impl ReturnCode {
    /// Map a raw engine status code to an outcome.
    pub fn from_value(value: i32) -> ReturnCode {
        match value {
            0 => ReturnCode::Success,
            CANCEL_RETURN_CODE => ReturnCode::Cancel,
            other => ReturnCode::Error(other),
        }
    }

    /// The raw status code.
    pub fn value(self) -> i32 {
        match self {
            ReturnCode::Success => 0,
            ReturnCode::Cancel => CANCEL_RETURN_CODE,
            ReturnCode::Error(code) => code,
        }
    }

    pub fn is_success(self) -> bool {
        self == ReturnCode::Success
    }

    pub fn is_cancel(self) -> bool {
        self == ReturnCode::Cancel
    }
}

impl fmt::Display for ReturnCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Record of one completed engine execution.
#[derive(Debug, Clone, Serialize)]
pub struct Execution {
    /// Monotonically increasing id within one harness.
    pub id: u64,
    /// The command string (or joined argument vector) that was run.
    pub command: String,
    /// When the execution started.
    pub started_at: DateTime<Utc>,
    /// The engine's outcome.
    pub return_code: ReturnCode,
    /// Captured engine output, filtered by the active log level.
    pub output: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_return_code_mapping() {
        assert_eq!(ReturnCode::from_value(0), ReturnCode::Success);
        assert_eq!(ReturnCode::from_value(255), ReturnCode::Cancel);
        assert_eq!(ReturnCode::from_value(1), ReturnCode::Error(1));
        assert_eq!(ReturnCode::from_value(-22), ReturnCode::Error(-22));
    }

    #[test]
    fn test_return_code_value_round_trip() {
        for code in [0, 1, 69, 255, -1] {
            assert_eq!(ReturnCode::from_value(code).value(), code);
        }
    }

    #[test]
    fn test_predicates() {
        assert!(ReturnCode::Success.is_success());
        assert!(!ReturnCode::Success.is_cancel());
        assert!(ReturnCode::Cancel.is_cancel());
        assert!(!ReturnCode::Error(1).is_success());
    }

    #[test]
    fn test_display_is_raw_code() {
        assert_eq!(ReturnCode::Cancel.to_string(), "255");
        assert_eq!(ReturnCode::Error(69).to_string(), "69");
    }
}
