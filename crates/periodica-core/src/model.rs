//! # Domain Shadow Model
//!
//! The entity graph the exporter consumes: suppliers own periodicals,
//! periodicals own classified anchors and editions, editions own anchor
//! occurrences.
//!
//! These types originate outside the export engine (mail ingestion and
//! anchor classification live elsewhere); the engine treats every field
//! as an opaque scalar except the sort keys used by the persister. No
//! classification is recomputed here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// All suppliers of an export run, keyed by supplier key.
///
/// `BTreeMap` keeps iteration deterministic, but the persister still
/// sorts by supplier *name* explicitly; keys and names may differ.
pub type PeriodicalSuppliers = BTreeMap<String, PeriodicalSupplier>;

/// An originating source of periodical content (e.g. a mailbox address).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodicalSupplier {
    /// Supplier name; the supplier row's key-derivation input.
    pub name: String,
    /// Periodicals published by this supplier, keyed by periodical key.
    pub periodicals: BTreeMap<String, Periodical>,
}

/// A recurring named content stream from a supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Periodical {
    /// Periodical name; unique within an export run.
    pub name: String,
    /// Anchor-text/classification pairs aggregated across all editions.
    pub anchors: Vec<PeriodicalAnchor>,
    /// Ingested editions of this periodical.
    pub editions: Vec<PeriodicalEdition>,
}

/// An anchor-text/classification pair aggregated across a periodical's
/// editions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodicalAnchor {
    /// Classified anchor text.
    pub anchor_text: String,
    /// Externally computed classification identifier.
    pub classification: String,
    /// Occurrences of this anchor across all editions.
    pub count: u64,
    /// Externally computed "common" (boilerplate/recurring) flag.
    pub common: bool,
}

/// One discrete content item belonging to a periodical (e.g. one
/// newsletter issue).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodicalEdition {
    /// Supplier-assigned content identifier (e.g. a message id).
    pub supplier_content_id: String,
    /// Sender address the edition arrived from.
    pub from_address: String,
    /// Sender display name.
    pub from_name: String,
    /// Publication timestamp; the persister's edition sort key.
    pub date: DateTime<Utc>,
    /// Subject line, present on email-sourced editions. Not persisted by
    /// the default writer; a per-table transform may project it into an
    /// extra column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Classified anchor occurrences inside this edition's content.
    pub anchors: Vec<EditionAnchor>,
}

/// A classified hyperlink occurrence within one edition's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditionAnchor {
    /// Classifier text of the anchor.
    pub classifier_text: String,
    /// Link target.
    pub href: String,
    /// Externally computed classification identifier.
    pub classification: String,
    /// Whether the classifying periodical anchor is a common anchor.
    pub common: bool,
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn edition_json_roundtrip_preserves_date() {
        let edition = PeriodicalEdition {
            supplier_content_id: "msg-1".to_string(),
            from_address: "news@example.com".to_string(),
            from_name: "Example News".to_string(),
            date: Utc.with_ymd_and_hms(2020, 6, 1, 0, 0, 0).single().expect("date"),
            subject: Some("Weekly digest".to_string()),
            anchors: Vec::new(),
        };

        let json = serde_json::to_string(&edition).expect("serialize");
        let back: PeriodicalEdition = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, edition);
    }

    #[test]
    fn edition_subject_defaults_to_none() {
        let json = r#"{
            "supplier_content_id": "msg-2",
            "from_address": "news@example.com",
            "from_name": "Example News",
            "date": "2020-01-01T00:00:00Z",
            "anchors": []
        }"#;
        let edition: PeriodicalEdition = serde_json::from_str(json).expect("deserialize");
        assert_eq!(edition.subject, None);
    }
}
