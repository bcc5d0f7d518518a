use crate::record::{AccuracyUnit, Record, RecordSet};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One bar of the ranked single-category chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    pub kana: String,
    pub accuracy: f64,
    pub times_seen: u32,
    pub times_correct: u32,
}

impl From<&Record> for SeriesPoint {
    fn from(r: &Record) -> Self {
        Self {
            kana: r.kana.clone(),
            accuracy: r.accuracy,
            times_seen: r.times_seen,
            times_correct: r.times_correct,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySeries {
    pub category: String,
    pub points: Vec<SeriesPoint>,
}

impl CategorySeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedItem {
    pub kana: String,
    pub mean_accuracy: f64,
    /// Σcorrect / Σseen over the group, in the record set's unit.
    pub pooled_accuracy: f64,
    pub samples: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryGroup {
    pub category: String,
    pub items: Vec<GroupedItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedSeries {
    pub groups: Vec<CategoryGroup>,
    /// Union of item keys over every group, first-seen order.
    pub item_domain: Vec<String>,
}

impl GroupedSeries {
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.category.as_str())
    }

    pub fn value(&self, category: &str, kana: &str) -> Option<f64> {
        self.groups
            .iter()
            .find(|g| g.category == category)?
            .items
            .iter()
            .find(|i| i.kana == kana)
            .map(|i| i.mean_accuracy)
    }

    /// Category x `item_domain` grid. Items a category never saw are `None`.
    pub fn matrix(&self) -> Vec<Vec<Option<f64>>> {
        self.groups
            .iter()
            .map(|g| {
                let by_kana: HashMap<&str, f64> = g
                    .items
                    .iter()
                    .map(|i| (i.kana.as_str(), i.mean_accuracy))
                    .collect();
                self.item_domain
                    .iter()
                    .map(|k| by_kana.get(k.as_str()).copied())
                    .collect()
            })
            .collect()
    }

    /// Upper bound for the value axis. 0 when there is nothing to draw.
    pub fn max_mean(&self) -> f64 {
        self.groups
            .iter()
            .flat_map(|g| g.items.iter())
            .map(|i| i.mean_accuracy)
            .fold(0.0, f64::max)
    }
}

/// Ranked view of one category, ascending by accuracy. Ties keep record order.
pub fn project(records: &RecordSet, category: &str) -> CategorySeries {
    let mut points: Vec<SeriesPoint> = records
        .iter()
        .filter(|r| r.kana_type == category)
        .map(SeriesPoint::from)
        .collect();

    // sort_by is stable
    points.sort_by(|a, b| a.accuracy.total_cmp(&b.accuracy));

    CategorySeries {
        category: category.to_string(),
        points,
    }
}

#[derive(Default)]
struct Accumulator {
    sum: f64,
    count: usize,
    seen: u64,
    correct: u64,
}

/// Mean accuracy per (kana type, kana), both levels in first-seen order.
pub fn project_grouped(records: &RecordSet) -> GroupedSeries {
    let unit = records.unit();
    let mut order: Vec<(String, Vec<(String, Accumulator)>)> = Vec::new();
    let mut category_idx: HashMap<&str, usize> = HashMap::new();
    let mut item_idx: Vec<HashMap<&str, usize>> = Vec::new();

    for r in records {
        let ci = *category_idx.entry(r.kana_type.as_str()).or_insert_with(|| {
            order.push((r.kana_type.clone(), Vec::new()));
            item_idx.push(HashMap::new());
            order.len() - 1
        });

        let items = &mut order[ci].1;
        let ii = *item_idx[ci].entry(r.kana.as_str()).or_insert_with(|| {
            items.push((r.kana.clone(), Accumulator::default()));
            items.len() - 1
        });

        let acc = &mut items[ii].1;
        acc.sum += r.accuracy;
        acc.count += 1;
        acc.seen += u64::from(r.times_seen);
        acc.correct += u64::from(r.times_correct);
    }

    let groups: Vec<CategoryGroup> = order
        .into_iter()
        .map(|(category, items)| CategoryGroup {
            category,
            items: items
                .into_iter()
                .map(|(kana, acc)| finish(kana, &acc, unit))
                .collect(),
        })
        .collect();

    let item_domain = item_domain(&groups);
    GroupedSeries {
        groups,
        item_domain,
    }
}

fn finish(kana: String, acc: &Accumulator, unit: AccuracyUnit) -> GroupedItem {
    GroupedItem {
        kana,
        // count >= 1: groups only exist once a record lands in them
        mean_accuracy: acc.sum / acc.count as f64,
        pooled_accuracy: unit.of_counts(acc.correct, acc.seen),
        samples: acc.count,
    }
}

/// Union of item keys across all groups. The first group is not authoritative:
/// an item only one category has still gets a slot.
pub fn item_domain(groups: &[CategoryGroup]) -> Vec<String> {
    let mut seen = HashSet::new();
    groups
        .iter()
        .flat_map(|g| g.items.iter())
        .filter(|i| seen.insert(i.kana.as_str()))
        .map(|i| i.kana.clone())
        .collect()
}

/// Running totals for one kana type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScore {
    pub seen: u64,
    pub correct: u64,
    pub percentage: f64,
}

pub fn score(records: &RecordSet, category: &str) -> CategoryScore {
    let (seen, correct) = records
        .iter()
        .filter(|r| r.kana_type == category)
        .fold((0u64, 0u64), |(s, c), r| {
            (s + u64::from(r.times_seen), c + u64::from(r.times_correct))
        });

    CategoryScore {
        seen,
        correct,
        percentage: AccuracyUnit::Percent.of_counts(correct, seen),
    }
}
