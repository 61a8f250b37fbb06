//! # Tabular Sink
//!
//! One logical output table backed by one buffered append-only stream.
//!
//! The writer is loosely typed: a row is an ordered column-name -> value
//! mapping, and the column schema is frozen from the first record
//! written. A pluggable per-record transform may veto a write or inject
//! extra columns without the writer knowing the record's concrete shape.
//!
//! ## Column Rendering
//!
//! A deliberate asymmetry: columns named `id` or ending in `_id` are
//! emitted as raw tokens (they are meant to be joined on directly);
//! every other column is emitted as a JSON literal, which safely carries
//! strings containing delimiters.

use crate::ident::{derive_id, derive_namespace};
use crate::{ExportError, Namespace, RecordId};
use serde_json::Value;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// An ordered column-name -> value mapping acting as one row.
///
/// Insertion order is significant: the first record's key order becomes
/// the table's frozen column schema.
pub type FieldMap = serde_json::Map<String, Value>;

// =============================================================================
// ROW TRANSFORM
// =============================================================================

/// Per-record write hook.
///
/// Invoked uniformly for every record before it is rendered. Returning
/// `None` vetoes the write: no row is emitted, no counter moves, and the
/// persister will not recurse into the record's children.
///
/// # Extension Point
///
/// Specialized record types inject additional columns here instead of
/// subclassing the writer; e.g. an email-sourced edition adding its
/// subject line. Implemented by any `Fn(&S, FieldMap) -> Option<FieldMap>`.
pub trait RowTransform<S> {
    /// Map a source record plus its suggested persisted fields to the
    /// fields actually persisted, or `None` for "no write".
    fn transform(&self, source: &S, suggested: FieldMap) -> Option<FieldMap>;
}

impl<S, F> RowTransform<S> for F
where
    F: Fn(&S, FieldMap) -> Option<FieldMap>,
{
    fn transform(&self, source: &S, suggested: FieldMap) -> Option<FieldMap> {
        self(source, suggested)
    }
}

// =============================================================================
// TABULAR WRITER
// =============================================================================

/// A single logical table writing delimited rows to one output file.
///
/// Generic over the source record type `S` so a transform can read the
/// raw record, not just the candidate fields.
pub struct TabularWriter<S> {
    file_name: String,
    namespace: Namespace,
    out: BufWriter<File>,
    columns: Option<Vec<String>>,
    rows_written: u64,
    transform: Option<Box<dyn RowTransform<S>>>,
}

impl<S> TabularWriter<S> {
    /// Open a writer for `file_name` under `dest`, scoped to a namespace
    /// derived from the file name against `parent`.
    pub fn create(dest: &Path, file_name: &str, parent: &Namespace) -> Result<Self, ExportError> {
        Self::open(dest, file_name, parent, None)
    }

    /// Open a writer with a custom per-record transform installed.
    pub fn create_with_transform(
        dest: &Path,
        file_name: &str,
        parent: &Namespace,
        transform: Box<dyn RowTransform<S>>,
    ) -> Result<Self, ExportError> {
        Self::open(dest, file_name, parent, Some(transform))
    }

    fn open(
        dest: &Path,
        file_name: &str,
        parent: &Namespace,
        transform: Option<Box<dyn RowTransform<S>>>,
    ) -> Result<Self, ExportError> {
        let path = dest.join(file_name);
        let file = File::create(&path)
            .map_err(|e| ExportError::IoError(format!("Cannot create {:?}: {}", path, e)))?;
        Ok(Self {
            file_name: file_name.to_string(),
            namespace: derive_namespace(file_name, parent),
            out: BufWriter::new(file),
            columns: None,
            rows_written: 0,
            transform,
        })
    }

    /// Derive an identifier scoped to this writer's namespace.
    ///
    /// Pure: no side effects, same result for the same key on every call.
    #[must_use]
    pub fn create_id(&self, key: &str) -> RecordId {
        derive_id(key, &self.namespace)
    }

    /// Write one record.
    ///
    /// The transform (if any) maps `(source, suggested)` to the persisted
    /// fields or vetoes the write. The first emitted record freezes the
    /// column schema and emits the header row. Returns whether a row was
    /// actually emitted.
    pub fn write(&mut self, source: &S, suggested: FieldMap) -> Result<bool, ExportError> {
        let fields = match &self.transform {
            Some(t) => match t.transform(source, suggested) {
                Some(fields) => fields,
                None => return Ok(false),
            },
            None => suggested,
        };

        if self.columns.is_none() {
            let columns: Vec<String> = fields.keys().cloned().collect();
            self.emit(&columns.join(","))?;
            self.columns = Some(columns);
        }

        // Columns absent from the frozen schema are dropped; missing
        // fields render as the empty cell. Output width stays stable for
        // the whole run.
        let mut row = String::new();
        if let Some(columns) = &self.columns {
            for (i, column) in columns.iter().enumerate() {
                if i > 0 {
                    row.push(',');
                }
                if let Some(value) = fields.get(column) {
                    row.push_str(&render_field(column, value));
                }
            }
        }

        self.emit("\n")?;
        self.emit(&row)?;
        self.rows_written = self.rows_written.saturating_add(1);
        Ok(true)
    }

    /// Flush the buffered output stream.
    ///
    /// Call exactly once per writer per run, after all writes are issued.
    pub fn close(&mut self) -> Result<(), ExportError> {
        self.out
            .flush()
            .map_err(|e| ExportError::IoError(format!("Cannot flush {}: {}", self.file_name, e)))
    }

    /// The table's file name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The writer's key-derivation namespace.
    #[must_use]
    pub const fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Rows emitted so far (header excluded).
    #[must_use]
    pub const fn rows_written(&self) -> u64 {
        self.rows_written
    }

    fn emit(&mut self, s: &str) -> Result<(), ExportError> {
        self.out
            .write_all(s.as_bytes())
            .map_err(|e| ExportError::IoError(format!("Cannot write {}: {}", self.file_name, e)))
    }
}

/// Whether a column holds a join key.
fn is_key_column(name: &str) -> bool {
    name == "id" || name.ends_with("_id")
}

/// Render one cell per the column rendering rule.
fn render_field(column: &str, value: &Value) -> String {
    if is_key_column(column) {
        match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    } else {
        // JSON literal: strings quoted and escaped, numbers bare.
        value.to_string()
    }
}

// =============================================================================
// TESTS
// =============================================================================
