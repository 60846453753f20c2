//! Error types for the doccache library.
//!
//! Cache operations themselves are total: a lookup miss is `None`, never an
//! error. The types here cover the two places where something can be
//! reported back to the caller.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned by [`SampledLruBuilder::try_build`](crate::builder::SampledLruBuilder::try_build)
//!   when strict validation rejects a configuration (e.g. zero capacity).
//! - [`InvariantError`]: Returned by
//!   [`SampledLruCore::check_invariants`](crate::policy::sampled_lru::SampledLruCore::check_invariants)
//!   when the table, clock or capacity bound disagree.
//!
//! ## Example Usage
//!
//! ```
//! use doccache::builder::SampledLruBuilder;
//! use doccache::error::ConfigError;
//!
//! let bad: Result<_, ConfigError> = SampledLruBuilder::new(0)
//!     .strict(true)
//!     .try_build::<String, Vec<u8>>();
//! assert!(bad.is_err());
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal cache invariants are violated.
///
/// Carries a human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when cache configuration parameters are rejected.
///
/// Only produced when the builder is asked for strict validation; the plain
/// constructors accept any capacity and sampling width.
///
/// # Example
///
/// ```
/// use doccache::builder::SampledLruBuilder;
///
/// let err = SampledLruBuilder::new(0)
///     .strict(true)
///     .try_build_core::<u64, u64>()
///     .unwrap_err();
/// assert!(err.to_string().contains("capacity"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
