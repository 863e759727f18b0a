#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(clippy::wildcard_enum_match_arm)]

use clap::CommandFactory;

use super::*;

/// The root help output must contain all top-level subcommand names.
#[test]
fn test_root_help_lists_all_subcommands() {
    let mut cmd = Cli::command();
    let help = format!("{}", cmd.render_help());

    for name in ["validate", "country", "countries", "lookup", "generate"] {
        assert!(
            help.contains(name),
            "root help should mention subcommand '{name}'"
        );
    }
}

/// The root help output must describe every global flag.
#[test]
fn test_root_help_lists_global_flags() {
    let mut cmd = Cli::command();
    let help = format!("{}", cmd.render_help());

    let expected_flags = [
        "--format",
        "--quiet",
        "--verbose",
        "--store",
        "--max-file-size",
        "--no-color",
        "--help",
        "--version",
    ];
    for flag in &expected_flags {
        assert!(
            help.contains(flag),
            "root help should mention flag '{flag}'"
        );
    }
}

/// `addrule validate --help` must mention the input and every field flag.
#[test]
fn test_validate_help() {
    let mut cmd = Cli::command();
    let sub = cmd
        .find_subcommand_mut("validate")
        .expect("validate subcommand should exist");
    let help = format!("{}", sub.render_help());
    for flag in [
        "--input",
        "--country",
        "--street",
        "--locality",
        "--administrative-area",
        "--post-code",
        "--sorting-code",
    ] {
        assert!(help.contains(flag), "validate help should mention {flag}");
    }
}

/// `addrule generate --help` must mention the pool and mirror flags.
#[test]
fn test_generate_help() {
    let mut cmd = Cli::command();
    let sub = cmd
        .find_subcommand_mut("generate")
        .expect("generate subcommand should exist");
    let help = format!("{}", sub.render_help());
    for flag in [
        "--output",
        "--from-dir",
        "--upstream-url",
        "--workers",
        "--fail-fast",
        "--allow-failures",
    ] {
        assert!(help.contains(flag), "generate help should mention {flag}");
    }
}

/// `--input -` should produce `PathOrStdin::Stdin`.
#[test]
fn test_input_dash_is_stdin() {
    let cli = Cli::try_parse_from(["addrule", "validate", "--input", "-"])
        .expect("should parse validate --input -");
    match cli.command {
        Command::Validate { input, .. } => match input {
            Some(PathOrStdin::Stdin) => {}
            other => panic!("expected Stdin, got {other:?}"),
        },
        _ => panic!("expected Validate subcommand"),
    }
}

/// A real path should produce `PathOrStdin::Path`.
#[test]
fn test_input_path() {
    let cli = Cli::try_parse_from(["addrule", "validate", "--input", "address.json"])
        .expect("should parse validate --input <path>");
    match cli.command {
        Command::Validate { input, .. } => match input {
            Some(PathOrStdin::Path(p)) => assert_eq!(p.to_string_lossy(), "address.json"),
            other => panic!("expected Path, got {other:?}"),
        },
        _ => panic!("expected Validate subcommand"),
    }
}

/// `--input` and field flags describe the address twice.
#[test]
fn test_input_conflicts_with_country() {
    let result = Cli::try_parse_from([
        "addrule",
        "validate",
        "--input",
        "address.json",
        "--country",
        "US",
    ]);
    assert!(result.is_err(), "--input and --country should conflict");
}

/// Repeated `--street` flags keep their order.
#[test]
fn test_street_lines_accumulate() {
    let cli = Cli::try_parse_from([
        "addrule",
        "validate",
        "--country",
        "GB",
        "--street",
        "Flat 2",
        "--street",
        "10 Downing St",
    ])
    .expect("should parse repeated --street");
    match cli.command {
        Command::Validate { address, .. } => {
            assert_eq!(address.street_address, vec!["Flat 2", "10 Downing St"]);
            assert_eq!(address.country.as_deref(), Some("GB"));
        }
        _ => panic!("expected Validate subcommand"),
    }
}

/// A dependent locality needs a locality on the lookup path.
#[test]
fn test_lookup_positional_path() {
    let cli = Cli::try_parse_from([
        "addrule", "lookup", "KR", "11", "강남구", "역삼동", "-l", "en",
    ])
    .expect("should parse a three-level lookup");
    match cli.command {
        Command::Lookup {
            code,
            area,
            locality,
            dependent_locality,
            language,
            postal_key,
        } => {
            assert_eq!(code, "KR");
            assert_eq!(area, "11");
            assert_eq!(locality.as_deref(), Some("강남구"));
            assert_eq!(dependent_locality.as_deref(), Some("역삼동"));
            assert_eq!(language.as_deref(), Some("en"));
            assert!(!postal_key);
        }
        _ => panic!("expected Lookup subcommand"),
    }
}

/// Postal keys exist for administrative areas only.
#[test]
fn test_postal_key_conflicts_with_locality() {
    let result =
        Cli::try_parse_from(["addrule", "lookup", "--postal-key", "KR", "11", "강남구"]);
    assert!(result.is_err(), "--postal-key with a locality should fail");
}

/// `--quiet` and `--verbose` must conflict with each other.
#[test]
fn test_quiet_verbose_conflict() {
    let result = Cli::try_parse_from(["addrule", "--quiet", "--verbose", "countries"]);
    assert!(
        result.is_err(),
        "--quiet and --verbose should conflict; parse should fail"
    );
}

/// The verbosity flags pick the default log filter.
#[test]
fn test_log_filter() {
    let quiet = Cli::try_parse_from(["addrule", "-q", "countries"]).expect("parse -q");
    assert_eq!(quiet.log_filter(), "error");
    let verbose = Cli::try_parse_from(["addrule", "-v", "countries"]).expect("parse -v");
    assert_eq!(verbose.log_filter(), "debug");
    let default = Cli::try_parse_from(["addrule", "countries"]).expect("parse");
    assert_eq!(default.log_filter(), "warn");
}

/// `--max-file-size` should default to 64 MB.
#[test]
fn test_max_file_size_default() {
    let cli = Cli::try_parse_from(["addrule", "countries"])
        .expect("should parse without --max-file-size");
    assert_eq!(cli.max_file_size, 67_108_864);
}

/// `--format json` should parse to `OutputFormat::Json`, after the
/// subcommand too.
#[test]
fn test_format_flag_is_global() {
    let cli = Cli::try_parse_from(["addrule", "country", "US", "--format", "json"])
        .expect("should parse --format json");
    assert_eq!(cli.format, OutputFormat::Json);
}

/// `generate` defaults match the upstream service limits.
#[test]
fn test_generate_defaults() {
    let cli = Cli::try_parse_from(["addrule", "generate"]).expect("should parse generate");
    match cli.command {
        Command::Generate(args) => {
            assert_eq!(args.timeout, 30);
            assert!(args.output.is_none());
            assert!(args.countries.is_empty());
            assert!(!args.fail_fast);
            assert!(!args.allow_failures);
        }
        _ => panic!("expected Generate subcommand"),
    }
}
