use crate::error::{KanaVizError, KvResult};
use crate::loader::LoadOptions;
use crate::record::AccuracyUnit;
use crate::render::ViewMode;
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, Default, EnumString, Display, PartialEq, Eq, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VizConfig {
    /// Practice results CSV.
    #[arg(long, default_value = "data/analytics.csv")]
    pub data: String,

    #[arg(long, default_value_t = AccuracyUnit::Ratio)]
    pub unit: AccuracyUnit,

    #[arg(long, default_value_t = ViewMode::Ranked)]
    pub mode: ViewMode,

    #[arg(long, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// 0 disables the load timeout.
    #[arg(long, default_value_t = 0)]
    pub timeout_secs: u64,
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            data: "data/analytics.csv".to_string(),
            unit: AccuracyUnit::Ratio,
            mode: ViewMode::Ranked,
            format: OutputFormat::Table,
            timeout_secs: 0,
        }
    }
}

impl VizConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> KvResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            KanaVizError::Config(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Copies over only the values the user typed on the command line.
    pub fn merge_from_cli(&mut self, cli: &VizConfig, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($field:ident, $arg_name:expr) => {
                if matches.value_source($arg_name) == Some(ValueSource::CommandLine) {
                    self.$field = cli.$field.clone();
                }
            };
        }

        update_if_present!(data, "data");
        update_if_present!(unit, "unit");
        update_if_present!(mode, "mode");
        update_if_present!(format, "format");
        update_if_present!(timeout_secs, "timeout_secs");
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            unit: self.unit,
            timeout: (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs)),
        }
    }
}
