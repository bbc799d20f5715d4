use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use ifra_core::{CodePolicy, ColumnMap, KeyPolicy};
use ifra_engine::{
    ExportOptions, HarvestSettings, Locator, ProbeMode, ResponseShape, StrategyTable,
};
use ifra_harvester::cli::{Args, LogArg};
use ifra_harvester::config::{load_strategy_table, parse_strategy_table, ConfigError, FileConfig};
use ifra_harvester::logging::{level_for, LogDestination};
use pretty_assertions::assert_eq;

#[test]
fn empty_config_is_all_defaults() {
    let config = FileConfig::parse("()").unwrap();
    assert_eq!(config, FileConfig::default());
    assert_eq!(config.harvest, HarvestSettings::default());
    assert_eq!(config.harvest.max_pages, 200);
    assert_eq!(config.harvest.pause_ms, 1000);
    assert_eq!(config.harvest.mode, ProbeMode::Pool);
    assert_eq!(config.export, ExportOptions::default());
    assert!(config.strategy_table().unwrap() == StrategyTable::ifra_default());
}

#[test]
fn partial_sections_keep_remaining_defaults() {
    let config = FileConfig::parse(
        r#"(
            harvest: (max_pages: 5, mode: first_viable),
            fetch: (timeout_secs: 7),
            export: (key_column: "cas"),
            output_dir: "out",
        )"#,
    )
    .unwrap();

    assert_eq!(config.harvest.max_pages, 5);
    assert_eq!(config.harvest.mode, ProbeMode::FirstViable);
    assert_eq!(config.harvest.pause_ms, 1000);
    assert_eq!(config.export.key_column, "cas");
    assert_eq!(config.export.output_filename, "ifra_ingredients.csv");
    assert_eq!(config.output_dir, PathBuf::from("out"));

    let fetch = config.fetch.settings();
    assert_eq!(fetch.request_timeout, Duration::from_secs(7));
    assert_eq!(fetch.connect_timeout, Duration::from_secs(10));
    assert_eq!(fetch.redirect_limit, 5);
}

#[test]
fn bundled_example_config_parses() {
    let config = FileConfig::parse(include_str!("../harvester.example.ron")).unwrap();
    assert_eq!(config.output_dir, PathBuf::from("data"));
    assert!(config.validate().is_ok());
}

#[test]
fn malformed_config_is_a_parse_error() {
    let err = FileConfig::parse("(harvest: (max_pages: \"many\"))").unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn missing_config_file_is_a_read_error() {
    let err = FileConfig::load(&PathBuf::from("/nonexistent/harvester.ron")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn zero_page_ceiling_is_rejected() {
    let mut config = FileConfig::default();
    config.harvest.max_pages = 0;
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn flags_override_file_values() {
    let mut config = FileConfig::parse(
        r#"(harvest: (max_pages: 5, pause_ms: 250), export: (key_column: "cas"))"#,
    )
    .unwrap();
    let args = Args::try_parse_from([
        "ifra-harvester",
        "--max-pages",
        "3",
        "--mode",
        "first-viable",
        "--timeout-secs",
        "12",
        "--output-file",
        "list.csv",
        "--base-url",
        "https://mirror.example/transparency-list",
    ])
    .unwrap();

    args.apply(&mut config);

    assert_eq!(config.harvest.max_pages, 3);
    assert_eq!(config.harvest.pause_ms, 250);
    assert_eq!(config.harvest.mode, ProbeMode::FirstViable);
    assert_eq!(config.harvest.base_url, "https://mirror.example/transparency-list");
    assert_eq!(config.fetch.timeout_secs, 12);
    assert_eq!(config.export.output_filename, "list.csv");
    assert_eq!(config.export.key_column, "cas");
}

#[test]
fn log_flags() {
    let args = Args::try_parse_from(["ifra-harvester"]).unwrap();
    assert_eq!(args.log, LogArg::Terminal);
    assert!(!args.verbose);

    let args = Args::try_parse_from(["ifra-harvester", "--log", "both", "-v"]).unwrap();
    assert_eq!(LogDestination::from(args.log), LogDestination::Both);
    assert_eq!(level_for(args.verbose), log::LevelFilter::Debug);

    assert!(Args::try_parse_from(["ifra-harvester", "--mode", "fastest"]).is_err());
}

#[test]
fn example_strategy_table_parses() {
    let table = parse_strategy_table(include_str!("../strategies.example.ron")).unwrap();
    assert_eq!(table.strategies.len(), 3);

    let json = &table.strategies[0];
    assert_eq!(json.shape, ResponseShape::Structured);
    assert_eq!(json.columns, ColumnMap::canonical());

    let listing = &table.strategies[1];
    assert_eq!(
        listing.locator,
        Locator::Query {
            param: "page".into(),
            start: 0,
            bare_first: true,
        }
    );
    assert_eq!(listing.columns, ColumnMap::name_first());
    assert_eq!(listing.columns.key_policy, KeyPolicy::CasPattern);
    assert_eq!(listing.columns.code_policy, CodePolicy::NcsPattern);

    let offset = &table.strategies[2];
    assert_eq!(
        offset.locator,
        Locator::Offset {
            param: "start".into(),
            page_size: 50,
        }
    );
    assert_eq!(offset.columns.description, None);
    assert_eq!(offset.columns.key_policy, KeyPolicy::Any);
    assert!(table.strategies.iter().all(|s| s.compile().is_ok()));
}

#[test]
fn strategy_table_file_overrides_the_builtin_one() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("strategies.ron");
    fs::write(&path, include_str!("../strategies.example.ron")).unwrap();

    let config = FileConfig {
        strategies: Some(path.clone()),
        ..FileConfig::default()
    };
    assert_eq!(config.strategy_table().unwrap().strategies[0].name, "mirror-json");

    fs::write(&path, "(strategies: [])").unwrap();
    assert!(matches!(
        load_strategy_table(&path),
        Err(ConfigError::EmptyStrategyTable(_))
    ));
}
