use crate::error::{KanaVizError, KvResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use strum_macros::{Display, EnumIter, EnumString};

/// Scale of the `Accuracy` column. Fixed for the lifetime of a pipeline.
#[derive(
    Debug, Clone, Copy, Default, EnumIter, EnumString, Display, PartialEq, Eq, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum AccuracyUnit {
    /// 0.0 ..= 1.0
    #[default]
    Ratio,
    /// 0.0 ..= 100.0
    Percent,
}

impl AccuracyUnit {
    pub fn max(&self) -> f64 {
        match self {
            Self::Ratio => 1.0,
            Self::Percent => 100.0,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && (0.0..=self.max()).contains(&value)
    }

    /// Ratio of correct to seen expressed in this unit.
    pub fn of_counts(&self, correct: u64, seen: u64) -> f64 {
        if seen == 0 {
            return 0.0;
        }
        (correct as f64 / seen as f64) * self.max()
    }
}

/// One row of practice data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub kana_type: String,
    pub kana: String,
    pub accuracy: f64,
    pub times_seen: u32,
    pub times_correct: u32,
}

impl Record {
    pub fn new(
        kana_type: impl Into<String>,
        kana: impl Into<String>,
        accuracy: f64,
        times_seen: u32,
        times_correct: u32,
    ) -> Self {
        Self {
            kana_type: kana_type.into(),
            kana: kana.into(),
            accuracy,
            times_seen,
            times_correct,
        }
    }

    /// Checks the field invariants. `row` is only used for the error report.
    pub fn validate(&self, unit: AccuracyUnit, row: usize) -> KvResult<()> {
        let malformed = |reason: String| KanaVizError::MalformedRecord { row, reason };

        if self.kana_type.is_empty() {
            return Err(malformed("empty Kana Type".to_string()));
        }
        if self.kana.is_empty() {
            return Err(malformed("empty Kana".to_string()));
        }
        if !unit.contains(self.accuracy) {
            return Err(malformed(format!(
                "Accuracy {} outside 0..={} ({})",
                self.accuracy,
                unit.max(),
                unit
            )));
        }
        if self.times_correct > self.times_seen {
            return Err(malformed(format!(
                "Times Correct ({}) exceeds Times Seen ({})",
                self.times_correct, self.times_seen
            )));
        }
        Ok(())
    }
}

/// Immutable, cheaply clonable sequence of validated records.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet {
    records: Arc<[Record]>,
    unit: AccuracyUnit,
}

impl RecordSet {
    pub fn new(records: Vec<Record>, unit: AccuracyUnit) -> Self {
        Self {
            records: records.into(),
            unit,
        }
    }

    pub fn unit(&self) -> AccuracyUnit {
        self.unit
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[Record] {
        &self.records
    }

    /// Distinct kana types in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter(|r| seen.insert(r.kana_type.as_str()))
            .map(|r| r.kana_type.clone())
            .collect()
    }

    pub fn contains_category(&self, category: &str) -> bool {
        self.records.iter().any(|r| r.kana_type == category)
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
