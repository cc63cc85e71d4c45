// ABOUTME: Unified error handling for the Remy meal intelligence platform
// ABOUTME: Defines AppError, ErrorCode, and the AppResult alias used across crates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Meal Intelligence

//! # Unified Error Handling System
//!
//! Centralized error handling for the planning pipeline. Domain-expected
//! outcomes (dietary non-compliance, empty ranking results, adaptation
//! fallback) are modeled as structured values, not errors; `AppError` is
//! reserved for malformed input shapes and fatal validation failures that
//! require the caller to discard and regenerate.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation (3000-3999)
    /// Input value was structurally invalid
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    /// A required field was absent
    #[serde(rename = "MISSING_REQUIRED_FIELD")]
    MissingRequiredField = 3001,
    /// Input had an unexpected format
    #[serde(rename = "INVALID_FORMAT")]
    InvalidFormat = 3002,
    /// A numeric value fell outside its allowed range
    #[serde(rename = "VALUE_OUT_OF_RANGE")]
    ValueOutOfRange = 3003,
    /// Generated plan did not contain the requested number of days
    #[serde(rename = "DAY_COUNT_MISMATCH")]
    DayCountMismatch = 3004,

    // Internal (9000-9999)
    /// Unexpected internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    /// Serialization or deserialization failure
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError = 9003,
}

impl ErrorCode {
    /// Get a human-readable description of this error code
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "Invalid input",
            Self::MissingRequiredField => "Missing required field",
            Self::InvalidFormat => "Invalid format",
            Self::ValueOutOfRange => "Value out of range",
            Self::DayCountMismatch => "Day count mismatch",
            Self::InternalError => "Internal error",
            Self::SerializationError => "Serialization error",
        }
    }

    /// Whether the caller should discard the generated plan and re-request
    /// from the LLM rather than attempt repair
    #[must_use]
    pub const fn requires_regeneration(&self) -> bool {
        matches!(self, Self::DayCountMismatch)
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Convenience constructor for invalid input errors
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Convenience constructor for the fatal day-count validation failure
    #[must_use]
    pub fn day_count_mismatch(expected: usize, actual: usize) -> Self {
        Self::new(
            ErrorCode::DayCountMismatch,
            format!("generated plan has {actual} days, expected exactly {expected}"),
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, err.to_string()).with_source(err)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_count_mismatch_requires_regeneration() {
        let err = AppError::day_count_mismatch(3, 2);
        assert_eq!(err.code, ErrorCode::DayCountMismatch);
        assert!(err.code.requires_regeneration());
        assert!(err.message.contains("2 days"));
    }

    #[test]
    fn invalid_input_does_not_require_regeneration() {
        let err = AppError::invalid_input("bad filters");
        assert!(!err.code.requires_regeneration());
    }
}
