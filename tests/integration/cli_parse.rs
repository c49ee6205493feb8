use clap::{CommandFactory, Parser};
use envlay::logging::{LogFormat, LogOutput};
use envlay::tooling::cli::{Cli, CliContext, Commands, ScanStatus};
use std::path::PathBuf;

#[test]
fn parse_valid_command_matrix() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["envlay", "env-key", "--prefix", "MYAPP", "retryCount"],
        vec!["envlay", "env-key", "--prefix", "MYAPP", "host", "port", "--format", "json"],
        vec!["envlay", "field-name", "--prefix", "MYAPP", "MYAPP_RETRY_COUNT"],
        vec!["envlay", "scan", "--prefix", "MYAPP"],
        vec!["envlay", "--log-level", "debug", "scan", "--prefix", "MYAPP", "--format", "json"],
    ];

    for args in cases {
        let parsed = Cli::try_parse_from(args.clone());
        assert!(parsed.is_ok(), "expected valid parse for args: {args:?}");
    }
}

#[test]
fn parse_rejects_missing_arguments() {
    assert!(Cli::try_parse_from(["envlay", "env-key", "--prefix", "MYAPP"]).is_err());
    assert!(Cli::try_parse_from(["envlay", "scan"]).is_err());
    assert!(Cli::try_parse_from(["envlay", "field-name", "MYAPP_X"]).is_err());
}

#[test]
fn command_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn log_flags_feed_logging_config() {
    let cli = Cli::try_parse_from([
        "envlay",
        "--log-level",
        "debug",
        "--log-format",
        "json",
        "scan",
        "--prefix",
        "MYAPP",
    ])
    .unwrap();

    let logging = cli.logging_config();
    assert_eq!(logging.level, "debug");
    assert_eq!(logging.format, LogFormat::Json);
    assert_eq!(logging.output, LogOutput::Stderr);
    assert_eq!(logging.file, None);
}

#[test]
fn log_file_flag_adds_file_output() {
    let cli = Cli::try_parse_from([
        "envlay",
        "--log-file",
        "/tmp/envlay-cli.log",
        "scan",
        "--prefix",
        "MYAPP",
    ])
    .unwrap();

    let logging = cli.logging_config();
    assert_eq!(logging.file, Some(PathBuf::from("/tmp/envlay-cli.log")));
    assert_eq!(logging.output, LogOutput::FileAndStderr);
    assert_eq!(logging.format, LogFormat::Text);
}

#[test]
fn unknown_log_format_is_rejected_by_parser() {
    assert!(
        Cli::try_parse_from(["envlay", "--log-format", "xml", "scan", "--prefix", "A"]).is_err()
    );
}

#[test]
fn parsed_scan_executes_against_snapshot() {
    let cli = Cli::try_parse_from(["envlay", "scan", "--prefix", "MYAPP"]).unwrap();
    let context = CliContext::with_env(
        [("MYAPP_HOST", "db"), ("HOME", "/root")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    );

    let Commands::Scan { prefix, .. } = &cli.command else {
        panic!("expected scan command");
    };
    let rows = context.scan(prefix).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].field.as_deref(), Some("host"));
    assert_eq!(rows[0].status, ScanStatus::Ok);

    let table = context.execute(&cli.command).unwrap();
    assert!(table.contains("MYAPP_HOST"));
    assert!(!table.contains("db"));
}
