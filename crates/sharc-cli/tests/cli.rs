//! Integration tests for argument parsing, rendering and file commands.

use clap::Parser;

use sharc_cli::cli::{Cli, Command, InputArgs, RepackArgs};
use sharc_cli::commands::{rename_to_stem, run_repack};
use sharc_cli::summary::{issue_label, render_overview, stage_label};
use sharc_codec::{
    Archive, SchemaVersion, ShaderSource, ShaderStage, ValueCount, WarningKind, read_sharc,
    write_sharc,
};

fn demo_archive() -> Archive {
    let mut archive = Archive::new("demo", SchemaVersion::V11);
    archive
        .sources
        .push(ShaderSource::new("demo.vert", "void main() {}"));
    archive
        .sources
        .push(ShaderSource::new("demo.frag", "// 影\nvoid main() {}"));
    let program = archive.new_program("demo");
    program.set_stage_index(ShaderStage::Vertex, 0);
    program.set_stage_index(ShaderStage::Fragment, 5);
    archive
}

#[test]
fn test_parse_check_strict() {
    let cli = Cli::try_parse_from(["sharc", "check", "--strict", "a.sharc"]).unwrap();
    match cli.command {
        Command::Check(args) => {
            assert!(args.strict);
            assert_eq!(args.input.input.to_str(), Some("a.sharc"));
            assert!(!args.input.big_endian);
        }
        _ => panic!("expected check"),
    }
}

#[test]
fn test_parse_repack_with_global_flags() {
    let cli = Cli::try_parse_from([
        "sharc",
        "repack",
        "in.sharc",
        "out.sharc",
        "--keep-name",
        "--log-format",
        "json",
    ])
    .unwrap();
    match cli.command {
        Command::Repack(args) => {
            assert!(args.keep_name);
            assert_eq!(args.output.to_str(), Some("out.sharc"));
        }
        _ => panic!("expected repack"),
    }
}

#[test]
fn test_parse_requires_input() {
    assert!(Cli::try_parse_from(["sharc", "info"]).is_err());
    assert!(Cli::try_parse_from(["sharc", "repack", "in.sharc"]).is_err());
}

#[test]
fn test_overview_text() {
    insta::assert_snapshot!(render_overview(&demo_archive()), @r"
    Archive: demo
    Version: v11
    Byte order: little endian
    Programs: 1
      demo: vertex=demo.vert, fragment=#5 (missing), geometry=-
    Sources: 2
      demo.vert (14 bytes)
      demo.frag (21 bytes)
    ");
}

#[test]
fn test_stage_labels() {
    let archive = demo_archive();
    let program = &archive.programs[0];
    assert_eq!(
        stage_label(program, ShaderStage::Vertex, &archive.sources),
        "demo.vert"
    );
    assert_eq!(
        stage_label(program, ShaderStage::Geometry, &archive.sources),
        "-"
    );
}

#[test]
fn test_issue_labels() {
    assert_eq!(
        issue_label(WarningKind::MissingDefault(ValueCount::Multiple(3))),
        "missing default (3 values)"
    );
    assert_eq!(
        issue_label(WarningKind::DefaultWithoutDeclaration),
        "default without declaration"
    );
}

#[test]
fn test_rename_to_stem() {
    let mut archive = demo_archive();
    rename_to_stem(&mut archive, std::path::Path::new("out/renamed.sharc"));
    assert_eq!(archive.name(), "renamed");
}

#[test]
fn test_repack_renames_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("demo.sharc");
    let output = dir.path().join("copy.sharc");
    write_sharc(&input, &demo_archive()).unwrap();

    let args = RepackArgs {
        input: InputArgs {
            input: input.clone(),
            big_endian: false,
        },
        output: output.clone(),
        keep_name: false,
    };
    run_repack(&args).unwrap();

    let repacked = read_sharc(&output).unwrap().archive;
    assert_eq!(repacked.name(), "copy");
    assert_eq!(repacked.sources, demo_archive().sources);
}
