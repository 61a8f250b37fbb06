//! # periodica-core
//!
//! The deterministic relational export engine for Periodica - THE LOGIC.
//!
//! This crate flattens an in-memory supplier -> periodical -> anchor /
//! edition graph into a set of relational CSV tables connected by
//! stable, content-derived primary and foreign keys. Re-running an
//! export over unchanged input yields byte-identical files.
//!
//! ## Architectural Constraints
//!
//! - Pure Rust: no async, no network dependencies
//! - Deterministic: name-based identifiers (UUIDv5), explicit sort
//!   orders, no randomness, no sequence counters
//! - Silent: no logging; observability belongs to the app layer
//! - Single-threaded: each sink is owned by exactly one writer and the
//!   persister is the sole caller, by construction

// =============================================================================
// MODULES
// =============================================================================

pub mod ident;
pub mod model;
pub mod persist;
pub mod registry;
pub mod tabular;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{ExportError, Namespace, RecordId};

// =============================================================================
// RE-EXPORTS: Export Engine
// =============================================================================

pub use ident::{DEFAULT_ROOT_NAMESPACE, derive_id, derive_namespace, root_namespace};
pub use model::{
    EditionAnchor, Periodical, PeriodicalAnchor, PeriodicalEdition, PeriodicalSupplier,
    PeriodicalSuppliers,
};
pub use persist::{RelationalCsvPersister, WriteStats};
pub use registry::{RelationalTableNames, RelationalTableWriters, TableWriterOverrides};
pub use tabular::{FieldMap, RowTransform, TabularWriter};
