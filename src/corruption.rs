// 🎲 Defect Injector - controlled corruption of freshly generated records
//
// Corruption is a pure transformation applied immediately after a record is
// built: one Bernoulli draw per record against the table's configured rate,
// then one defect class chosen uniformly among the classes that are both
// enabled in the configuration and supported by the entity type. Disabling a
// class redistributes its probability mass over the remaining enabled
// classes; the overall corruption likelihood stays at the configured rate.
//
// Every corruption is appended to a ledger, and the ledger plus the finished
// dataset build the aggregate defect report handed to serializers.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::DefectClassSwitches;
use crate::model::{Dataset, TableKind};

// ============================================================================
// DEFECT CLASSES
// ============================================================================

/// The five corruption categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefectClass {
    MissingData,
    InvalidFormat,
    OutOfRange,
    InconsistentData,
    MalformedData,
}

impl DefectClass {
    pub const ALL: [DefectClass; 5] = [
        DefectClass::MissingData,
        DefectClass::InvalidFormat,
        DefectClass::OutOfRange,
        DefectClass::InconsistentData,
        DefectClass::MalformedData,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DefectClass::MissingData => "missing_data",
            DefectClass::InvalidFormat => "invalid_format",
            DefectClass::OutOfRange => "out_of_range",
            DefectClass::InconsistentData => "inconsistent_data",
            DefectClass::MalformedData => "malformed_data",
        }
    }
}

impl std::fmt::Display for DefectClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// CORRUPTIBLE ENTITIES
// ============================================================================

/// Implemented by every entity type the injector can corrupt.
///
/// `SUPPORTED` is the entity's declared field-schema contract: only classes
/// listed there have an eligible field on this entity, so an unsupported
/// class can never be selected for it. `corrupt` applies the class to an
/// eligible field and must leave foreign keys untouched unless the class is
/// specifically a relationship inconsistency.
pub trait Corruptible {
    const TABLE: TableKind;
    /// Defect classes with at least one eligible field on this entity.
    const SUPPORTED: &'static [DefectClass];

    fn record_id(&self) -> &str;

    /// Flag the record as corrupted with the given class tag.
    fn mark(&mut self, class: DefectClass);

    /// Apply the class to the record's eligible fields.
    fn corrupt(&mut self, class: DefectClass, rng: &mut ChaCha8Rng);
}

// ============================================================================
// LEDGER
// ============================================================================

/// One corruption event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefectEntry {
    pub table: TableKind,
    pub record_id: String,
    pub class: DefectClass,
}

/// Running record of every corruption applied during a generation pass.
#[derive(Debug, Default, Clone)]
pub struct DefectLedger {
    entries: Vec<DefectEntry>,
}

impl DefectLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, table: TableKind, record_id: &str, class: DefectClass) {
        self.entries.push(DefectEntry {
            table,
            record_id: record_id.to_string(),
            class,
        });
    }

    pub fn entries(&self) -> &[DefectEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge another ledger into this one (used by the orchestrator to fold
    /// per-table ledgers into the run-wide one).
    pub fn absorb(&mut self, other: DefectLedger) {
        self.entries.extend(other.entries);
    }

    /// Per-class counts for one table.
    pub fn counts_for(&self, table: TableKind) -> BTreeMap<DefectClass, usize> {
        let mut counts = BTreeMap::new();
        for entry in self.entries.iter().filter(|e| e.table == table) {
            *counts.entry(entry.class).or_insert(0) += 1;
        }
        counts
    }
}

// ============================================================================
// INJECTOR
// ============================================================================

/// Per-table corruption decision maker.
///
/// Built by the orchestrator with the table's configured rate and the
/// run-wide class switches; generators call `maybe_corrupt` once per record.
#[derive(Debug)]
pub struct DefectInjector {
    rate: f64,
    enabled: Vec<DefectClass>,
    ledger: DefectLedger,
}

impl DefectInjector {
    pub fn new(rate: f64, switches: &DefectClassSwitches) -> Self {
        DefectInjector {
            rate,
            enabled: switches.enabled_classes(),
            ledger: DefectLedger::new(),
        }
    }

    /// Injector that never corrupts; used by single-record synthesis paths.
    pub fn disabled() -> Self {
        DefectInjector {
            rate: 0.0,
            enabled: Vec::new(),
            ledger: DefectLedger::new(),
        }
    }

    /// Decide whether to corrupt the record, and if so pick a class, apply
    /// it, flag the record, and note it in the ledger.
    pub fn maybe_corrupt<T: Corruptible>(
        &mut self,
        record: &mut T,
        rng: &mut ChaCha8Rng,
    ) -> Option<DefectClass> {
        if self.rate <= 0.0 || rng.gen::<f64>() >= self.rate {
            return None;
        }

        let eligible: Vec<DefectClass> = T::SUPPORTED
            .iter()
            .copied()
            .filter(|c| self.enabled.contains(c))
            .collect();
        let class = *eligible.choose(rng)?;

        record.corrupt(class, rng);
        record.mark(class);
        self.ledger.record(T::TABLE, record.record_id(), class);
        Some(class)
    }

    pub fn ledger(&self) -> &DefectLedger {
        &self.ledger
    }

    pub fn take_ledger(&mut self) -> DefectLedger {
        std::mem::take(&mut self.ledger)
    }
}

// ============================================================================
// DEFECT REPORT
// ============================================================================

/// How many corrupted example rows each table report carries.
const REPORT_EXAMPLE_LIMIT: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDefectReport {
    pub total_records: usize,
    pub bad_records: usize,
    pub bad_percentage: f64,
    pub bad_by_type: BTreeMap<String, usize>,
    pub examples: Vec<serde_json::Value>,
}

/// Aggregate corruption report for a generation run, keyed by table name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefectReport {
    pub generated_at: String,
    pub tables: BTreeMap<String, TableDefectReport>,
}

impl DefectReport {
    /// Build the report from the finished dataset and the run ledger.
    pub fn build(dataset: &Dataset, ledger: &DefectLedger, generated_at: &str) -> Self {
        let mut tables = BTreeMap::new();

        for kind in TableKind::ALL {
            let total = dataset.len_of(kind);
            if total == 0 {
                continue;
            }
            let bad = dataset.bad_count_of(kind);
            let by_type = ledger
                .counts_for(kind)
                .into_iter()
                .map(|(class, count)| (class.as_str().to_string(), count))
                .collect();

            tables.insert(
                kind.as_str().to_string(),
                TableDefectReport {
                    total_records: total,
                    bad_records: bad,
                    bad_percentage: bad as f64 / total as f64 * 100.0,
                    bad_by_type: by_type,
                    examples: dataset.bad_rows_for(kind, REPORT_EXAMPLE_LIMIT),
                },
            );
        }

        DefectReport {
            generated_at: generated_at.to_string(),
            tables,
        }
    }

    pub fn total_bad_records(&self) -> usize {
        self.tables.values().map(|t| t.bad_records).sum()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    struct Probe {
        id: String,
        value: Option<String>,
        is_bad: bool,
        tag: Option<DefectClass>,
    }

    impl Probe {
        fn new() -> Self {
            Probe {
                id: "P1".to_string(),
                value: Some("ok".to_string()),
                is_bad: false,
                tag: None,
            }
        }
    }

    impl Corruptible for Probe {
        const TABLE: TableKind = TableKind::Customers;
        const SUPPORTED: &'static [DefectClass] =
            &[DefectClass::MissingData, DefectClass::MalformedData];

        fn record_id(&self) -> &str {
            &self.id
        }

        fn mark(&mut self, class: DefectClass) {
            self.is_bad = true;
            self.tag = Some(class);
        }

        fn corrupt(&mut self, class: DefectClass, _rng: &mut ChaCha8Rng) {
            if class == DefectClass::MissingData {
                self.value = None;
            }
        }
    }

    #[test]
    fn test_zero_rate_never_corrupts() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut injector = DefectInjector::new(0.0, &DefectClassSwitches::default());

        for _ in 0..500 {
            let mut probe = Probe::new();
            assert!(injector.maybe_corrupt(&mut probe, &mut rng).is_none());
            assert!(!probe.is_bad);
        }
        assert!(injector.ledger().is_empty());
    }

    #[test]
    fn test_full_rate_always_corrupts() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut injector = DefectInjector::new(1.0, &DefectClassSwitches::default());

        for _ in 0..100 {
            let mut probe = Probe::new();
            let class = injector.maybe_corrupt(&mut probe, &mut rng);
            assert!(class.is_some());
            assert!(probe.is_bad);
            assert_eq!(probe.tag, class);
        }
        assert_eq!(injector.ledger().len(), 100);
    }

    #[test]
    fn test_disabled_class_never_selected() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let switches = DefectClassSwitches {
            missing_data: true,
            invalid_format: false,
            out_of_range: false,
            inconsistent_data: false,
            malformed_data: false,
        };
        let mut injector = DefectInjector::new(1.0, &switches);

        for _ in 0..200 {
            let mut probe = Probe::new();
            let class = injector.maybe_corrupt(&mut probe, &mut rng);
            assert_eq!(class, Some(DefectClass::MissingData));
            assert_eq!(probe.value, None, "missing_data should blank the field");
        }
    }

    #[test]
    fn test_unsupported_classes_fall_back_to_supported() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        // All five enabled, but Probe only supports two.
        let mut injector = DefectInjector::new(1.0, &DefectClassSwitches::default());

        for _ in 0..200 {
            let mut probe = Probe::new();
            let class = injector.maybe_corrupt(&mut probe, &mut rng).unwrap();
            assert!(Probe::SUPPORTED.contains(&class));
        }
    }

    #[test]
    fn test_no_overlap_means_no_corruption() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let switches = DefectClassSwitches {
            missing_data: false,
            invalid_format: true,
            out_of_range: true,
            inconsistent_data: true,
            malformed_data: false,
        };
        let mut injector = DefectInjector::new(1.0, &switches);

        let mut probe = Probe::new();
        assert!(injector.maybe_corrupt(&mut probe, &mut rng).is_none());
        assert!(!probe.is_bad);
    }

    #[test]
    fn test_realized_rate_tracks_configured_rate() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut injector = DefectInjector::new(0.2, &DefectClassSwitches::default());

        let n = 1000;
        let mut bad = 0;
        for _ in 0..n {
            let mut probe = Probe::new();
            if injector.maybe_corrupt(&mut probe, &mut rng).is_some() {
                bad += 1;
            }
        }
        // Binomial(1000, 0.2): ~4 standard deviations around the mean.
        assert!((150..=250).contains(&bad), "bad count {bad} outside tolerance");
    }

    #[test]
    fn test_ledger_counts_by_class() {
        let mut ledger = DefectLedger::new();
        ledger.record(TableKind::Customers, "C1", DefectClass::MissingData);
        ledger.record(TableKind::Customers, "C2", DefectClass::MissingData);
        ledger.record(TableKind::Customers, "C3", DefectClass::OutOfRange);
        ledger.record(TableKind::Accounts, "A1", DefectClass::MalformedData);

        let counts = ledger.counts_for(TableKind::Customers);
        assert_eq!(counts.get(&DefectClass::MissingData), Some(&2));
        assert_eq!(counts.get(&DefectClass::OutOfRange), Some(&1));
        assert_eq!(counts.get(&DefectClass::MalformedData), None);
    }
}
