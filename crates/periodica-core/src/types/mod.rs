//! # Core Type Definitions
//!
//! This module contains the identifier and error types shared by every
//! part of the export engine:
//! - Derived identifiers (`RecordId`)
//! - Key-derivation scopes (`Namespace`)
//! - Error types (`ExportError`)
//!
//! ## Determinism Guarantees
//!
//! Identifiers are pure functions of their inputs (see `ident`): there is
//! no sequence counter, no randomness, and no dependence on insertion
//! order anywhere in this module.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// A content-derived primary key for one exported row.
///
/// The `Display` form (canonical hyphenated lowercase) is what lands in
/// `id` / `*_id` columns and what child key derivations concatenate, so
/// it must never change between releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(pub Uuid);

impl RecordId {
    /// Get the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.as_hyphenated())
    }
}

/// A key-derivation scope.
///
/// Namespaces partition the identifier space: the same row key derived
/// under two different namespaces yields two different identifiers.
/// Table namespaces are themselves derived from a root namespace, so a
/// renamed table invalidates only its own identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Namespace(pub Uuid);

impl Namespace {
    /// Parse a namespace from its textual UUID form.
    ///
    /// A malformed namespace is a configuration error surfaced before any
    /// write begins, never a per-row failure.
    pub fn parse(s: &str) -> Result<Self, ExportError> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| ExportError::InvalidNamespace(format!("{}: {}", s, e)))
    }

    /// Get the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.as_hyphenated())
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur during an export run.
///
/// - No silent failures
/// - Use `Result<T, ExportError>` for fallible operations
/// - The engine never panics; setup errors are reported before any write
#[derive(Debug, Error)]
pub enum ExportError {
    /// A namespace string could not be parsed as a UUID.
    #[error("Invalid namespace: {0}")]
    InvalidNamespace(String),

    /// The run configuration is unusable (bad destination, bad profile).
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An I/O error occurred on an output stream or the destination path.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================
