//! # Relational Persister
//!
//! Depth-first traversal of the supplier graph, deriving keys top-down
//! and writing foreign-key-consistent rows through the table registry.
//!
//! ## Reproducible Ordering
//!
//! Record order is part of the output contract — repeated exports over
//! unchanged input must be byte-diffable. Tie-break rules:
//! 1. suppliers ascending by name
//! 2. periodicals ascending by name
//! 3. periodical anchors ascending by anchor text
//! 4. editions descending by date (newest first)
//! 5. edition anchors ascending by (classifier text, href)
//!
//! A vetoed parent write suppresses its entire subtree: no identifiers
//! consumed, no counters incremented, no rows written.

use crate::model::{
    EditionAnchor, Periodical, PeriodicalAnchor, PeriodicalEdition, PeriodicalSupplier,
    PeriodicalSuppliers,
};
use crate::registry::RelationalTableWriters;
use crate::tabular::FieldMap;
use crate::{ExportError, RecordId};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

// =============================================================================
// WRITE STATISTICS
// =============================================================================

/// Per-table written-row counters for one export run.
///
/// Exposed for verification and logging by the caller; never used for
/// control flow. Counters use saturating arithmetic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WriteStats {
    pub suppliers: u64,
    pub periodicals: u64,
    pub periodical_anchors: u64,
    pub periodical_common_anchors: u64,
    pub periodical_editions: u64,
    pub edition_anchors: u64,
}

impl WriteStats {
    /// Total rows written across all tables.
    #[must_use]
    pub const fn total_rows(&self) -> u64 {
        self.suppliers
            .saturating_add(self.periodicals)
            .saturating_add(self.periodical_anchors)
            .saturating_add(self.periodical_common_anchors)
            .saturating_add(self.periodical_editions)
            .saturating_add(self.edition_anchors)
    }
}

// =============================================================================
// PERSISTER
// =============================================================================

/// Walks the domain graph and writes the relational CSV shadow.
///
/// Single-threaded and synchronous by construction: the persister is the
/// sole writer of every sink it owns, so no locking exists anywhere.
pub struct RelationalCsvPersister {
    writers: RelationalTableWriters,
    stats: WriteStats,
}

impl RelationalCsvPersister {
    /// Wrap an opened table registry.
    #[must_use]
    pub fn new(writers: RelationalTableWriters) -> Self {
        Self {
            writers,
            stats: WriteStats::default(),
        }
    }

    /// Counters accumulated so far.
    #[must_use]
    pub const fn stats(&self) -> &WriteStats {
        &self.stats
    }

    /// The underlying table registry.
    #[must_use]
    pub const fn writers(&self) -> &RelationalTableWriters {
        &self.writers
    }

    /// Persist every supplier in the collection, ascending by name.
    pub fn persist_suppliers(&mut self, suppliers: &PeriodicalSuppliers) -> Result<(), ExportError> {
        let mut ordered: Vec<&PeriodicalSupplier> = suppliers.values().collect();
        ordered.sort_by(|left, right| left.name.cmp(&right.name));
        for supplier in ordered {
            self.persist_supplier(supplier)?;
        }
        Ok(())
    }

    /// Persist one supplier and, if its row was written, its periodicals.
    ///
    /// Returns the supplier's derived identifier, or `None` if the write
    /// was vetoed (in which case nothing below it is traversed).
    pub fn persist_supplier(
        &mut self,
        supplier: &PeriodicalSupplier,
    ) -> Result<Option<RecordId>, ExportError> {
        let suppliers_pk = self.writers.suppliers.create_id(&supplier.name);
        let mut row = FieldMap::new();
        row.insert("id".to_string(), Value::from(suppliers_pk.to_string()));
        row.insert("name".to_string(), Value::from(supplier.name.clone()));
        row.insert(
            "periodicals".to_string(),
            Value::from(supplier.periodicals.len() as u64),
        );
        if !self.writers.suppliers.write(supplier, row)? {
            return Ok(None);
        }
        self.stats.suppliers = self.stats.suppliers.saturating_add(1);

        // Sort entries so that repeated runs create the same order.
        let mut periodicals: Vec<&Periodical> = supplier.periodicals.values().collect();
        periodicals.sort_by(|left, right| left.name.cmp(&right.name));
        for periodical in periodicals {
            self.persist_periodical(suppliers_pk, periodical)?;
        }
        Ok(Some(suppliers_pk))
    }

    /// Persist one periodical and, if its row was written, its anchors
    /// and editions.
    pub fn persist_periodical(
        &mut self,
        supplier_id: RecordId,
        periodical: &Periodical,
    ) -> Result<Option<RecordId>, ExportError> {
        let periodicals_pk = self.writers.periodicals.create_id(&periodical.name);
        let mut row = FieldMap::new();
        row.insert("id".to_string(), Value::from(periodicals_pk.to_string()));
        row.insert("supplier_id".to_string(), Value::from(supplier_id.to_string()));
        row.insert("name".to_string(), Value::from(periodical.name.clone()));
        row.insert(
            "editions".to_string(),
            Value::from(periodical.editions.len() as u64),
        );
        if !self.writers.periodicals.write(periodical, row)? {
            return Ok(None);
        }
        self.stats.periodicals = self.stats.periodicals.saturating_add(1);

        self.persist_anchors(periodicals_pk, periodical)?;
        self.persist_editions(supplier_id, periodicals_pk, periodical)?;
        Ok(Some(periodicals_pk))
    }

    /// Persist a periodical's aggregated anchors, ascending by anchor
    /// text, projecting common anchors into the secondary table.
    fn persist_anchors(
        &mut self,
        periodical_id: RecordId,
        periodical: &Periodical,
    ) -> Result<(), ExportError> {
        let mut anchors: Vec<&PeriodicalAnchor> = periodical.anchors.iter().collect();
        anchors.sort_by(|left, right| left.anchor_text.cmp(&right.anchor_text));

        for anchor in anchors {
            let anchor_pk = self.writers.periodical_anchors.create_id(&format!(
                "{}{}{}",
                periodical_id, anchor.anchor_text, anchor.classification
            ));
            let mut base = FieldMap::new();
            base.insert("id".to_string(), Value::from(anchor_pk.to_string()));
            base.insert(
                "periodical_id".to_string(),
                Value::from(periodical_id.to_string()),
            );
            base.insert(
                "periodical_name".to_string(),
                Value::from(periodical.name.clone()),
            );
            base.insert(
                "anchor_text_classified".to_string(),
                Value::from(anchor.anchor_text.clone()),
            );
            base.insert("anchors_count".to_string(), Value::from(anchor.count));
            base.insert(
                "editions_count".to_string(),
                Value::from(periodical.editions.len() as u64),
            );
            base.insert(
                "classification".to_string(),
                Value::from(anchor.classification.clone()),
            );

            // The primary row carries the discriminator column; the
            // common-anchors projection is the same row without it.
            let mut row = base.clone();
            row.insert("common_anchor".to_string(), Value::from(u64::from(anchor.common)));

            if self.writers.periodical_anchors.write(anchor, row)? {
                self.stats.periodical_anchors = self.stats.periodical_anchors.saturating_add(1);
                if anchor.common
                    && self.writers.periodical_common_anchors.write(anchor, base)?
                {
                    self.stats.periodical_common_anchors =
                        self.stats.periodical_common_anchors.saturating_add(1);
                }
            }
        }
        Ok(())
    }

    /// Persist a periodical's editions in descending date order (newest
    /// first), then each written edition's anchors.
    fn persist_editions(
        &mut self,
        supplier_id: RecordId,
        periodical_id: RecordId,
        periodical: &Periodical,
    ) -> Result<(), ExportError> {
        let mut editions: Vec<&PeriodicalEdition> = periodical.editions.iter().collect();
        editions.sort_by(|left, right| right.date.cmp(&left.date));

        for edition in editions {
            let editions_pk = self.writers.periodical_editions.create_id(&format!(
                "{}{}",
                supplier_id, edition.supplier_content_id
            ));
            let mut row = FieldMap::new();
            row.insert("id".to_string(), Value::from(editions_pk.to_string()));
            row.insert(
                "periodical_id".to_string(),
                Value::from(periodical_id.to_string()),
            );
            row.insert(
                "supplier_content_id".to_string(),
                Value::from(edition.supplier_content_id.clone()),
            );
            row.insert(
                "periodical_name".to_string(),
                Value::from(periodical.name.clone()),
            );
            row.insert(
                "from_address".to_string(),
                Value::from(edition.from_address.clone()),
            );
            row.insert("from_name".to_string(), Value::from(edition.from_name.clone()));
            row.insert("date".to_string(), Value::from(render_date(&edition.date)));
            row.insert("anchors".to_string(), Value::from(edition.anchors.len() as u64));

            if self.writers.periodical_editions.write(edition, row)? {
                self.stats.periodical_editions = self.stats.periodical_editions.saturating_add(1);
                self.persist_edition_anchors(editions_pk, periodical, edition)?;
            }
        }
        Ok(())
    }

    /// Persist one edition's anchors, ascending by (classifier text,
    /// href).
    fn persist_edition_anchors(
        &mut self,
        edition_id: RecordId,
        periodical: &Periodical,
        edition: &PeriodicalEdition,
    ) -> Result<(), ExportError> {
        let mut anchors: Vec<&EditionAnchor> = edition.anchors.iter().collect();
        anchors.sort_by(|left, right| {
            left.classifier_text
                .cmp(&right.classifier_text)
                .then_with(|| left.href.cmp(&right.href))
        });

        for anchor in anchors {
            let anchor_pk = self.writers.edition_anchors.create_id(&format!(
                "{}{}{}",
                edition_id, anchor.classifier_text, anchor.href
            ));
            let mut row = FieldMap::new();
            row.insert("id".to_string(), Value::from(anchor_pk.to_string()));
            row.insert("edition_id".to_string(), Value::from(edition_id.to_string()));
            row.insert(
                "periodical_name".to_string(),
                Value::from(periodical.name.clone()),
            );
            row.insert("date".to_string(), Value::from(render_date(&edition.date)));
            row.insert(
                "classification".to_string(),
                Value::from(anchor.classification.clone()),
            );
            row.insert(
                "anchor_text_classified".to_string(),
                Value::from(anchor.classifier_text.clone()),
            );
            row.insert(
                "common_anchor".to_string(),
                Value::from(u64::from(anchor.common)),
            );
            row.insert("href".to_string(), Value::from(anchor.href.clone()));

            if self.writers.edition_anchors.write(anchor, row)? {
                self.stats.edition_anchors = self.stats.edition_anchors.saturating_add(1);
            }
        }
        Ok(())
    }

    /// Close every sink and return the run's counters.
    pub fn finish(mut self) -> Result<WriteStats, ExportError> {
        self.writers.close()?;
        Ok(self.stats)
    }
}

/// RFC 3339 with millisecond precision in UTC, e.g.
/// `2020-06-01T00:00:00.000Z`.
fn render_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::ident::root_namespace;
    use chrono::TimeZone;
    use std::collections::BTreeMap;

    fn edition(content_id: &str, year: i32, month: u32) -> PeriodicalEdition {
        PeriodicalEdition {
            supplier_content_id: content_id.to_string(),
            from_address: "news@example.com".to_string(),
            from_name: "Example News".to_string(),
            date: Utc
                .with_ymd_and_hms(year, month, 1, 0, 0, 0)
                .single()
                .expect("date"),
            subject: None,
            anchors: Vec::new(),
        }
    }

    fn supplier(name: &str) -> PeriodicalSupplier {
        PeriodicalSupplier {
            name: name.to_string(),
            periodicals: BTreeMap::new(),
        }
    }

    #[test]
    fn suppliers_written_in_ascending_name_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let writers = RelationalTableWriters::open(dir.path(), &root_namespace()).expect("open");
        let mut persister = RelationalCsvPersister::new(writers);

        let mut suppliers = PeriodicalSuppliers::new();
        suppliers.insert("z-key".to_string(), supplier("B"));
        suppliers.insert("a-key".to_string(), supplier("A"));

        persister.persist_suppliers(&suppliers).expect("persist");
        let stats = persister.finish().expect("finish");
        assert_eq!(stats.suppliers, 2);

        let content =
            std::fs::read_to_string(dir.path().join("suppliers.csv")).expect("read suppliers");
        let lines: Vec<&str> = content.lines().collect();
        assert!(lines[1].contains("\"A\""));
        assert!(lines[2].contains("\"B\""));
    }

    #[test]
    fn editions_written_newest_first() {
        let dir = tempfile::tempdir().expect("tempdir");
        let writers = RelationalTableWriters::open(dir.path(), &root_namespace()).expect("open");
        let mut persister = RelationalCsvPersister::new(writers);

        let mut s = supplier("Example");
        s.periodicals.insert(
            "p".to_string(),
            Periodical {
                name: "Weekly".to_string(),
                anchors: Vec::new(),
                editions: vec![edition("old", 2020, 1), edition("new", 2020, 6)],
            },
        );

        persister.persist_supplier(&s).expect("persist");
        let stats = persister.finish().expect("finish");
        assert_eq!(stats.periodical_editions, 2);

        let content = std::fs::read_to_string(dir.path().join("periodical-editions.csv"))
            .expect("read editions");
        let lines: Vec<&str> = content.lines().collect();
        assert!(lines[1].contains("2020-06-01T00:00:00.000Z"));
        assert!(lines[2].contains("2020-01-01T00:00:00.000Z"));
    }

    #[test]
    fn stats_total_sums_all_tables() {
        let stats = WriteStats {
            suppliers: 1,
            periodicals: 2,
            periodical_anchors: 3,
            periodical_common_anchors: 1,
            periodical_editions: 4,
            edition_anchors: 5,
        };
        assert_eq!(stats.total_rows(), 16);
    }
}
