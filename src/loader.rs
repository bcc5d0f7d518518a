use crate::error::{KanaVizError, KvResult, LoadFailure};
use crate::record::{AccuracyUnit, Record, RecordSet};
use serde::Serialize;
use std::future::Future;
use std::io::{self, Read};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const COL_KANA_TYPE: &str = "Kana Type";
pub const COL_KANA: &str = "Kana";
pub const COL_ACCURACY: &str = "Accuracy";
pub const COL_TIMES_SEEN: &str = "Times Seen";
pub const COL_TIMES_CORRECT: &str = "Times Correct";

const REQUIRED_COLUMNS: [&str; 5] = [
    COL_KANA_TYPE,
    COL_KANA,
    COL_ACCURACY,
    COL_TIMES_SEEN,
    COL_TIMES_CORRECT,
];

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub unit: AccuracyUnit,
    /// `None` waits for the read indefinitely.
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedRow {
    /// 1-based data row, header excluded.
    pub row: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    pub rows_read: usize,
    pub skipped: Vec<SkippedRow>,
}

impl LoadReport {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn accepted(&self) -> usize {
        self.rows_read - self.skipped.len()
    }

    fn skip(&mut self, row: usize, reason: String) {
        warn!("⚠️  [Row {}] Skipping malformed record: {}", row, reason);
        self.skipped.push(SkippedRow { row, reason });
    }
}

#[derive(Debug, Clone)]
pub struct LoadedData {
    pub records: RecordSet,
    pub report: LoadReport,
}

/// Reads and parses the CSV at `path`. The only suspension point of the pipeline.
pub async fn load<P: AsRef<Path>>(path: P, opts: &LoadOptions) -> KvResult<LoadedData> {
    let path = path.as_ref();
    let origin = path.display().to_string();
    info!("📂 Loading practice data: {}", origin);

    let bytes = read_within(&origin, opts.timeout, tokio::fs::read(path)).await?;

    let data = parse_reader(bytes.as_slice(), opts.unit).map_err(|e| match e {
        KanaVizError::Load { cause, .. } => KanaVizError::load(&origin, cause),
        other => other,
    })?;

    info!(
        "   -> Loaded {} records ({} skipped) across {} categories.",
        data.records.len(),
        data.report.skipped_count(),
        data.records.categories().len()
    );
    if data.report.skipped_count() > 0 {
        warn!(
            "⚠️  Skipped {} invalid rows in '{}'.",
            data.report.skipped_count(),
            origin
        );
    }

    Ok(data)
}

async fn read_within<F>(origin: &str, timeout: Option<Duration>, read: F) -> KvResult<Vec<u8>>
where
    F: Future<Output = io::Result<Vec<u8>>>,
{
    let bytes = match timeout {
        Some(limit) => tokio::time::timeout(limit, read)
            .await
            .map_err(|_| KanaVizError::load(origin, LoadFailure::Timeout(limit)))?,
        None => read.await,
    };
    bytes.map_err(|e| KanaVizError::load(origin, e))
}

/// Synchronous parser behind [`load`]. Malformed rows are skipped and reported.
pub fn parse_reader<R: Read>(reader: R, unit: AccuracyUnit) -> KvResult<LoadedData> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| KanaVizError::load("<reader>", e))?
        .clone();
    let columns = ColumnMap::resolve(&headers)?;
    debug!("   Column layout: {:?}", columns);

    let mut records = Vec::new();
    let mut report = LoadReport::default();

    for result in rdr.records() {
        let result = match result {
            // The stream itself broke: no partial set escapes
            Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => {
                return Err(KanaVizError::load("<reader>", e));
            }
            other => other,
        };

        report.rows_read += 1;
        let row = report.rows_read;

        let rec = match result {
            Ok(rec) => rec,
            Err(e) => {
                report.skip(row, format!("unreadable row: {}", e));
                continue;
            }
        };

        match columns.extract(&rec, row).and_then(|r| {
            r.validate(unit, row)?;
            Ok(r)
        }) {
            Ok(record) => records.push(record),
            Err(KanaVizError::MalformedRecord { row, reason }) => report.skip(row, reason),
            Err(e) => return Err(e),
        }
    }

    Ok(LoadedData {
        records: RecordSet::new(records, unit),
        report,
    })
}

/// Case- and spacing-insensitive header key: `" times_SEEN "` -> `"times seen"`.
pub fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}')
        .split(|c: char| c.is_whitespace() || c == '_')
        .filter(|part| !part.is_empty())
        .map(|part| part.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    kana_type: usize,
    kana: usize,
    accuracy: usize,
    times_seen: usize,
    times_correct: usize,
}

impl ColumnMap {
    fn resolve(headers: &csv::StringRecord) -> KvResult<Self> {
        let normalized: Vec<String> = headers.iter().map(normalize_header).collect();
        let find = |name: &str| {
            let key = normalize_header(name);
            normalized.iter().position(|h| *h == key)
        };

        let found: Vec<Option<usize>> = REQUIRED_COLUMNS.iter().map(|c| find(*c)).collect();
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .zip(&found)
            .filter(|(_, idx)| idx.is_none())
            .map(|(name, _)| name.to_string())
            .collect();

        match found.as_slice() {
            [Some(kana_type), Some(kana), Some(accuracy), Some(times_seen), Some(times_correct)] => {
                Ok(Self {
                    kana_type: *kana_type,
                    kana: *kana,
                    accuracy: *accuracy,
                    times_seen: *times_seen,
                    times_correct: *times_correct,
                })
            }
            _ => Err(KanaVizError::load(
                "<reader>",
                LoadFailure::MissingColumns(missing),
            )),
        }
    }

    fn extract(&self, rec: &csv::StringRecord, row: usize) -> KvResult<Record> {
        let field = |idx: usize, name: &'static str| field_at(rec, idx, name, row);

        let accuracy_raw = field(self.accuracy, COL_ACCURACY)?;
        let accuracy: f64 = accuracy_raw
            .parse()
            .map_err(|_| KanaVizError::MalformedRecord {
                row,
                reason: format!("non-numeric Accuracy '{}'", accuracy_raw),
            })?;

        Ok(Record {
            kana_type: field(self.kana_type, COL_KANA_TYPE)?.to_string(),
            kana: field(self.kana, COL_KANA)?.to_string(),
            accuracy,
            times_seen: parse_count(field(self.times_seen, COL_TIMES_SEEN)?, COL_TIMES_SEEN, row)?,
            times_correct: parse_count(
                field(self.times_correct, COL_TIMES_CORRECT)?,
                COL_TIMES_CORRECT,
                row,
            )?,
        })
    }
}

fn field_at<'r>(rec: &'r csv::StringRecord, idx: usize, name: &str, row: usize) -> KvResult<&'r str> {
    rec.get(idx).ok_or_else(|| KanaVizError::MalformedRecord {
        row,
        reason: format!("missing '{}' field", name),
    })
}

fn parse_count(raw: &str, name: &str, row: usize) -> KvResult<u32> {
    let malformed = |reason: String| KanaVizError::MalformedRecord { row, reason };
    let value: i64 = raw
        .parse()
        .map_err(|_| malformed(format!("non-integer {} '{}'", name, raw)))?;
    if value < 0 {
        return Err(malformed(format!("negative {} ({})", name, value)));
    }
    u32::try_from(value).map_err(|_| malformed(format!("{} out of range ({})", name, value)))
}
