//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::config::ExportProfile;
use periodica_core::{
    ExportError, FieldMap, Namespace, PeriodicalEdition, PeriodicalSuppliers,
    RelationalCsvPersister, RelationalTableWriters, TableWriterOverrides, TabularWriter,
    root_namespace,
};
use serde_json::Value;
use std::path::{Path, PathBuf};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum file size for a supplier graph snapshot (100 MB).
///
/// This prevents memory exhaustion from malicious or accidental large files.
const MAX_SOURCE_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), ExportError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| ExportError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(ExportError::ConfigError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Validate a source file path.
///
/// Canonicalizes the path (resolving symlinks and "..") and ensures it
/// names a regular file, so a path like "../../../etc/passwd" cannot
/// escape the intended location unnoticed.
fn validate_source_path(path: &Path) -> Result<PathBuf, ExportError> {
    let canonical = path.canonicalize().map_err(|e| {
        ExportError::IoError(format!("Invalid source path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(ExportError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Load and deserialize a supplier graph snapshot.
fn load_suppliers(path: &Path) -> Result<PeriodicalSuppliers, ExportError> {
    let source = validate_source_path(path)?;
    validate_file_size(&source, MAX_SOURCE_FILE_SIZE)?;

    let raw = std::fs::read_to_string(&source)
        .map_err(|e| ExportError::IoError(format!("Cannot read {:?}: {}", source, e)))?;
    serde_json::from_str(&raw).map_err(|e| {
        ExportError::ConfigError(format!("Invalid snapshot {:?}: {}", path.display(), e))
    })
}

/// Project an edition's subject line into an extra column.
///
/// Installed on the periodical-editions table when subjects are enabled;
/// editions without a subject keep the default field set.
fn subject_transform(edition: &PeriodicalEdition, mut suggested: FieldMap) -> Option<FieldMap> {
    if let Some(subject) = &edition.subject {
        suggested.insert("subject".to_string(), Value::from(subject.clone()));
    }
    Some(suggested)
}

// =============================================================================
// EXPORT COMMAND
// =============================================================================

/// Export a supplier graph snapshot to relational CSV tables.
pub fn cmd_export(
    source: &Path,
    dest: Option<PathBuf>,
    clean: bool,
    namespace: Option<String>,
    include_subject: bool,
    profile: &ExportProfile,
    json_mode: bool,
) -> Result<(), ExportError> {
    let suppliers = load_suppliers(source)?;

    let dest = dest
        .or_else(|| profile.destination.clone())
        .ok_or_else(|| {
            ExportError::ConfigError(
                "No destination directory given (use --dest or a profile)".to_string(),
            )
        })?;
    let root = match namespace.or_else(|| profile.namespace.clone()) {
        Some(s) => Namespace::parse(&s)?,
        None => root_namespace(),
    };

    if clean {
        RelationalTableWriters::recreate_dir(&dest)?;
    } else {
        RelationalTableWriters::ensure_dir(&dest)?;
    }

    let names = profile.tables.resolve();
    let mut overrides = TableWriterOverrides::default();
    if include_subject || profile.include_subject {
        overrides.periodical_editions = Some(TabularWriter::create_with_transform(
            &dest,
            &names.periodical_editions,
            &root,
            Box::new(subject_transform),
        )?);
    }
    overrides.names = Some(names);
    let writers = RelationalTableWriters::open_with(&dest, &root, overrides)?;

    tracing::info!(
        "Exporting {} supplier(s) from {:?} to {:?}",
        suppliers.len(),
        source,
        dest
    );

    let mut persister = RelationalCsvPersister::new(writers);
    persister.persist_suppliers(&suppliers)?;
    let stats = persister.finish()?;

    tracing::info!(
        "Wrote {} rows: {} suppliers, {} periodicals, {} periodical anchors ({} common), {} editions, {} edition anchors",
        stats.total_rows(),
        stats.suppliers,
        stats.periodicals,
        stats.periodical_anchors,
        stats.periodical_common_anchors,
        stats.periodical_editions,
        stats.edition_anchors
    );

    if json_mode {
        let output = serde_json::json!({
            "source": source.to_string_lossy(),
            "destination": dest.to_string_lossy(),
            "written": stats,
        });
        println!("{}", output);
    }
    Ok(())
}

// =============================================================================
// VALIDATE COMMAND
// =============================================================================

/// Parse a snapshot and report entity counts without writing.
pub fn cmd_validate(source: &Path, json_mode: bool) -> Result<(), ExportError> {
    let suppliers = load_suppliers(source)?;

    let periodicals: usize = suppliers.values().map(|s| s.periodicals.len()).sum();
    let anchors: usize = suppliers
        .values()
        .flat_map(|s| s.periodicals.values())
        .map(|p| p.anchors.len())
        .sum();
    let editions: usize = suppliers
        .values()
        .flat_map(|s| s.periodicals.values())
        .map(|p| p.editions.len())
        .sum();
    let edition_anchors: usize = suppliers
        .values()
        .flat_map(|s| s.periodicals.values())
        .flat_map(|p| p.editions.iter())
        .map(|e| e.anchors.len())
        .sum();

    if json_mode {
        let output = serde_json::json!({
            "source": source.to_string_lossy(),
            "suppliers": suppliers.len(),
            "periodicals": periodicals,
            "periodical_anchors": anchors,
            "editions": editions,
            "edition_anchors": edition_anchors,
        });
        println!("{}", output);
    } else {
        println!("Snapshot: {}", source.display());
        println!("  Suppliers:          {}", suppliers.len());
        println!("  Periodicals:        {}", periodicals);
        println!("  Periodical anchors: {}", anchors);
        println!("  Editions:           {}", editions);
        println!("  Edition anchors:    {}", edition_anchors);
    }
    Ok(())
}
