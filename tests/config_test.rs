use clap::{CommandFactory, FromArgMatches, Parser};
use kanaviz::config::{OutputFormat, VizConfig};
use kanaviz::render::ViewMode;
use kanaviz::AccuracyUnit;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

#[derive(Parser, Debug)]
struct TestCli {
    #[command(flatten)]
    config: VizConfig,
}

fn parse(args: &[&str]) -> (VizConfig, clap::ArgMatches) {
    let mut argv = vec!["kanaviz"];
    argv.extend_from_slice(args);
    let matches = TestCli::command().get_matches_from(argv);
    let cli = TestCli::from_arg_matches(&matches).unwrap();
    (cli.config, matches)
}

fn write_json(body: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", body).unwrap();
    file
}

#[test]
fn test_cli_defaults_match_default_impl() {
    let (cli, _) = parse(&[]);
    let default = VizConfig::default();

    assert_eq!(cli.data, default.data);
    assert_eq!(cli.unit, default.unit);
    assert_eq!(cli.mode, default.mode);
    assert_eq!(cli.format, default.format);
    assert_eq!(cli.timeout_secs, default.timeout_secs);
}

#[test]
fn test_cli_parses_enums_case_insensitively() {
    let (cli, _) = parse(&["--unit", "Percent", "--mode", "GROUPED", "--format", "json"]);
    assert_eq!(cli.unit, AccuracyUnit::Percent);
    assert_eq!(cli.mode, ViewMode::Grouped);
    assert_eq!(cli.format, OutputFormat::Json);
}

#[test]
fn test_file_values_survive_unless_flag_given() {
    let file = write_json(r#"{ "data": "from_file.csv", "unit": "percent", "timeout_secs": 5 }"#);
    let mut base = VizConfig::load_from_file(file.path()).unwrap();
    assert_eq!(base.data, "from_file.csv");
    // Missing keys fall back to Default
    assert_eq!(base.mode, ViewMode::Ranked);

    let (cli, matches) = parse(&["--mode", "grouped", "--timeout-secs", "9"]);
    base.merge_from_cli(&cli, &matches);

    assert_eq!(base.data, "from_file.csv");
    assert_eq!(base.unit, AccuracyUnit::Percent);
    assert_eq!(base.mode, ViewMode::Grouped);
    assert_eq!(base.timeout_secs, 9);
}

#[test]
fn test_missing_config_file_is_config_error() {
    let err = VizConfig::load_from_file("does/not/exist.json").unwrap_err();
    assert!(err.to_string().starts_with("Configuration Error"));
}

#[test]
fn test_invalid_json_is_reported() {
    let file = write_json("{ not json");
    assert!(VizConfig::load_from_file(file.path()).is_err());
}

#[test]
fn test_load_options_timeout() {
    let mut config = VizConfig::default();
    assert_eq!(config.load_options().timeout, None);

    config.timeout_secs = 3;
    config.unit = AccuracyUnit::Percent;
    let opts = config.load_options();
    assert_eq!(opts.timeout, Some(Duration::from_secs(3)));
    assert_eq!(opts.unit, AccuracyUnit::Percent);
}
