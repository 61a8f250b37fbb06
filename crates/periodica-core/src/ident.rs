//! # Deterministic Key Derivation
//!
//! Name-based identifier derivation for the relational export.
//!
//! Every exported row's primary key is a pure function of
//! `(namespace, key string)`; re-running an export over unchanged input
//! yields byte-identical identifiers and therefore byte-identical files.
//!
//! ## Namespace Hierarchy
//!
//! ```text
//! root namespace
//!   └─ table namespace   = derive_namespace(table_file_name, root)
//!        └─ row identity = derive_id(row_key, table_namespace)
//! ```
//!
//! Changing a table's file name or the root namespace invalidates that
//! table's identifiers but no unrelated table's.

use crate::{Namespace, RecordId};
use uuid::{Uuid, uuid};

/// Default root namespace for key derivation.
///
/// Compiled into the binary; a malformed constant fails the build rather
/// than the run. Callers may substitute their own root (see
/// `Namespace::parse`), which re-keys every table beneath it.
pub const DEFAULT_ROOT_NAMESPACE: Uuid = uuid!("7f1c6d9e-2a5b-4c83-9e4d-0b8a5f3c2d61");

/// Derive a row identifier for `value` within `namespace`.
///
/// UUIDv5 (name-based, SHA-1): stable across runs, machines, and
/// versions, with collision probability negligible for distinct inputs.
#[must_use]
pub fn derive_id(value: &str, namespace: &Namespace) -> RecordId {
    RecordId(Uuid::new_v5(namespace.as_uuid(), value.as_bytes()))
}

/// Derive a child namespace for `name` beneath `parent`.
///
/// Same derivation as `derive_id`; the result scopes a whole table
/// rather than a single row.
#[must_use]
pub fn derive_namespace(name: &str, parent: &Namespace) -> Namespace {
    Namespace(Uuid::new_v5(parent.as_uuid(), name.as_bytes()))
}

/// The default root namespace as a `Namespace`.
#[must_use]
pub const fn root_namespace() -> Namespace {
    Namespace(DEFAULT_ROOT_NAMESPACE)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn same_input_same_identifier() {
        let ns = root_namespace();
        assert_eq!(derive_id("alpha", &ns), derive_id("alpha", &ns));
    }

    #[test]
    fn different_value_different_identifier() {
        let ns = root_namespace();
        assert_ne!(derive_id("alpha", &ns), derive_id("beta", &ns));
    }

    #[test]
    fn different_namespace_different_identifier() {
        let ns1 = derive_namespace("suppliers.csv", &root_namespace());
        let ns2 = derive_namespace("periodicals.csv", &root_namespace());
        assert_ne!(derive_id("alpha", &ns1), derive_id("alpha", &ns2));
    }

    #[test]
    fn namespace_derivation_is_stable() {
        let a = derive_namespace("suppliers.csv", &root_namespace());
        let b = derive_namespace("suppliers.csv", &root_namespace());
        assert_eq!(a, b);
    }
}
