//! # Table Registry
//!
//! The named set of tabular sinks making up one relational export: one
//! writer per table, each scoped to a namespace derived from its file
//! name against a shared root namespace.
//!
//! Callers may substitute a custom writer for any single table (e.g. one
//! carrying a per-record transform) while defaulting the rest.

use crate::model::{EditionAnchor, Periodical, PeriodicalAnchor, PeriodicalEdition, PeriodicalSupplier};
use crate::tabular::TabularWriter;
use crate::{ExportError, Namespace};
use std::fs;
use std::path::Path;

// =============================================================================
// TABLE NAMES
// =============================================================================

/// File names of the six relational tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationalTableNames {
    pub suppliers: String,
    pub periodicals: String,
    pub periodical_anchors: String,
    pub periodical_common_anchors: String,
    pub periodical_editions: String,
    pub edition_anchors: String,
}

impl Default for RelationalTableNames {
    fn default() -> Self {
        Self {
            suppliers: "suppliers.csv".to_string(),
            periodicals: "periodicals.csv".to_string(),
            periodical_anchors: "periodical-anchors.csv".to_string(),
            periodical_common_anchors: "periodical-anchors-common.csv".to_string(),
            periodical_editions: "periodical-editions.csv".to_string(),
            edition_anchors: "periodical-edition-anchors.csv".to_string(),
        }
    }
}

// =============================================================================
// WRITER OVERRIDES
// =============================================================================

/// Override points for `RelationalTableWriters::open_with`.
///
/// Any table left `None` gets the default writer for its file name.
#[derive(Default)]
pub struct TableWriterOverrides {
    pub names: Option<RelationalTableNames>,
    pub suppliers: Option<TabularWriter<PeriodicalSupplier>>,
    pub periodicals: Option<TabularWriter<Periodical>>,
    pub periodical_anchors: Option<TabularWriter<PeriodicalAnchor>>,
    pub periodical_common_anchors: Option<TabularWriter<PeriodicalAnchor>>,
    pub periodical_editions: Option<TabularWriter<PeriodicalEdition>>,
    pub edition_anchors: Option<TabularWriter<EditionAnchor>>,
}

// =============================================================================
// REGISTRY
// =============================================================================

/// One tabular sink per relational table, all rooted in one namespace
/// and one destination directory.
pub struct RelationalTableWriters {
    pub names: RelationalTableNames,
    pub suppliers: TabularWriter<PeriodicalSupplier>,
    pub periodicals: TabularWriter<Periodical>,
    pub periodical_anchors: TabularWriter<PeriodicalAnchor>,
    pub periodical_common_anchors: TabularWriter<PeriodicalAnchor>,
    pub periodical_editions: TabularWriter<PeriodicalEdition>,
    pub edition_anchors: TabularWriter<EditionAnchor>,
}

impl RelationalTableWriters {
    /// Open the default writer set under `dest`.
    pub fn open(dest: &Path, root: &Namespace) -> Result<Self, ExportError> {
        Self::open_with(dest, root, TableWriterOverrides::default())
    }

    /// Open the writer set, substituting any overridden tables.
    pub fn open_with(
        dest: &Path,
        root: &Namespace,
        overrides: TableWriterOverrides,
    ) -> Result<Self, ExportError> {
        let names = overrides.names.unwrap_or_default();
        let suppliers = match overrides.suppliers {
            Some(w) => w,
            None => TabularWriter::create(dest, &names.suppliers, root)?,
        };
        let periodicals = match overrides.periodicals {
            Some(w) => w,
            None => TabularWriter::create(dest, &names.periodicals, root)?,
        };
        let periodical_anchors = match overrides.periodical_anchors {
            Some(w) => w,
            None => TabularWriter::create(dest, &names.periodical_anchors, root)?,
        };
        let periodical_common_anchors = match overrides.periodical_common_anchors {
            Some(w) => w,
            None => TabularWriter::create(dest, &names.periodical_common_anchors, root)?,
        };
        let periodical_editions = match overrides.periodical_editions {
            Some(w) => w,
            None => TabularWriter::create(dest, &names.periodical_editions, root)?,
        };
        let edition_anchors = match overrides.edition_anchors {
            Some(w) => w,
            None => TabularWriter::create(dest, &names.edition_anchors, root)?,
        };
        Ok(Self {
            names,
            suppliers,
            periodicals,
            periodical_anchors,
            periodical_common_anchors,
            periodical_editions,
            edition_anchors,
        })
    }

    /// Close every writer, leaf tables before parent tables.
    ///
    /// The sinks are independent resources; the reverse dependency order
    /// is for clarity, not correctness.
    pub fn close(&mut self) -> Result<(), ExportError> {
        self.edition_anchors.close()?;
        self.periodical_editions.close()?;
        self.periodical_common_anchors.close()?;
        self.periodical_anchors.close()?;
        self.periodicals.close()?;
        self.suppliers.close()
    }

    /// Remove and recreate the destination directory for a clean run.
    pub fn recreate_dir(dest: &Path) -> Result<(), ExportError> {
        if dest.exists() {
            fs::remove_dir_all(dest)
                .map_err(|e| ExportError::IoError(format!("Cannot remove {:?}: {}", dest, e)))?;
        }
        fs::create_dir_all(dest)
            .map_err(|e| ExportError::IoError(format!("Cannot create {:?}: {}", dest, e)))
    }

    /// Create the destination directory only if absent, for additive runs.
    pub fn ensure_dir(dest: &Path) -> Result<(), ExportError> {
        if !dest.exists() {
            fs::create_dir_all(dest)
                .map_err(|e| ExportError::IoError(format!("Cannot create {:?}: {}", dest, e)))?;
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
