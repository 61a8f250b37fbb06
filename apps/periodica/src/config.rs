//! # Export Profiles
//!
//! Optional TOML configuration for repeated export runs. CLI flags win
//! over profile values; a missing profile means all defaults.
//!
//! ```toml
//! destination = "out/relational"
//! namespace = "1b4e28ba-2fa1-11d2-883f-0016d3cca427"
//! include_subject = true
//!
//! [tables]
//! suppliers = "suppliers.csv"
//! ```

use periodica_core::{ExportError, RelationalTableNames};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// A TOML export profile.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportProfile {
    /// Destination directory for the CSV tables.
    pub destination: Option<PathBuf>,
    /// Root key-derivation namespace (UUID); re-keys every table.
    pub namespace: Option<String>,
    /// Persist edition subject lines as an extra column.
    pub include_subject: bool,
    /// Table file name overrides.
    pub tables: TableNamesProfile,
}

/// Per-table file name overrides; any name left out keeps its default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableNamesProfile {
    pub suppliers: Option<String>,
    pub periodicals: Option<String>,
    pub periodical_anchors: Option<String>,
    pub periodical_common_anchors: Option<String>,
    pub periodical_editions: Option<String>,
    pub edition_anchors: Option<String>,
}

impl ExportProfile {
    /// Load a profile, or defaults when no path is given.
    ///
    /// A malformed profile is a configuration error surfaced before any
    /// write begins.
    pub fn load(path: Option<&Path>) -> Result<Self, ExportError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ExportError::ConfigError(format!("Cannot read profile {:?}: {}", path, e))
        })?;
        toml::from_str(&raw)
            .map_err(|e| ExportError::ConfigError(format!("Invalid profile {:?}: {}", path, e)))
    }
}

impl TableNamesProfile {
    /// Resolve overrides against the default table names.
    #[must_use]
    pub fn resolve(&self) -> RelationalTableNames {
        let mut names = RelationalTableNames::default();
        if let Some(v) = &self.suppliers {
            names.suppliers = v.clone();
        }
        if let Some(v) = &self.periodicals {
            names.periodicals = v.clone();
        }
        if let Some(v) = &self.periodical_anchors {
            names.periodical_anchors = v.clone();
        }
        if let Some(v) = &self.periodical_common_anchors {
            names.periodical_common_anchors = v.clone();
        }
        if let Some(v) = &self.periodical_editions {
            names.periodical_editions = v.clone();
        }
        if let Some(v) = &self.edition_anchors {
            names.edition_anchors = v.clone();
        }
        names
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn missing_profile_yields_defaults() {
        let profile = ExportProfile::load(None).expect("load");
        assert!(profile.destination.is_none());
        assert!(!profile.include_subject);
        assert_eq!(profile.tables.resolve(), RelationalTableNames::default());
    }

    #[test]
    fn profile_overrides_table_names() {
        let profile: ExportProfile = toml::from_str(
            r#"
            destination = "out"
            include_subject = true

            [tables]
            suppliers = "sources.csv"
            "#,
        )
        .expect("parse");

        assert_eq!(profile.destination.as_deref(), Some(Path::new("out")));
        assert!(profile.include_subject);
        let names = profile.tables.resolve();
        assert_eq!(names.suppliers, "sources.csv");
        assert_eq!(names.periodicals, "periodicals.csv");
    }

    #[test]
    fn unknown_profile_keys_are_rejected() {
        let parsed: Result<ExportProfile, _> = toml::from_str("unknown_key = 1");
        assert!(parsed.is_err());
    }

    #[test]
    fn missing_profile_file_is_a_config_error() {
        let err = ExportProfile::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ExportError::ConfigError(_)));
    }
}
