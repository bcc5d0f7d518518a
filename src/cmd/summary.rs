use crate::reports;
use clap::Args;
use kanaviz::config::{OutputFormat, VizConfig};
use kanaviz::error::KvResult;
use kanaviz::loader::{LoadReport, LoadedData};
use kanaviz::transform::{self, CategoryScore};
use serde::Serialize;

#[derive(Args, Debug, Clone)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub config: VizConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDoc<'a> {
    categories: Vec<SummaryRow<'a>>,
    load: &'a LoadReport,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryRow<'a> {
    kana_type: &'a str,
    #[serde(flatten)]
    score: CategoryScore,
}

pub fn run(config: &VizConfig, loaded: &LoadedData) -> KvResult<()> {
    let records = &loaded.records;
    let rows: Vec<(String, CategoryScore)> = records
        .categories()
        .into_iter()
        .map(|c| {
            let score = transform::score(records, &c);
            (c, score)
        })
        .collect();

    match config.format {
        OutputFormat::Table => {
            reports::print_summary(&rows);
            println!(
                "{} rows read, {} accepted, {} skipped.",
                loaded.report.rows_read,
                loaded.report.accepted(),
                loaded.report.skipped_count()
            );
        }
        OutputFormat::Json => {
            let doc = SummaryDoc {
                categories: rows
                    .iter()
                    .map(|(name, score)| SummaryRow {
                        kana_type: name,
                        score: *score,
                    })
                    .collect(),
                load: &loaded.report,
            };
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
    }
    Ok(())
}
