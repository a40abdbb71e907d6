use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{info, info_span, warn};

use sharc_codec::{
    Archive, DecodeOptions, Decoded, SharcError, read_sharc_with_options, write_sharc,
};

use crate::cli::{CheckArgs, DumpArgs, ExtractArgs, InputArgs, RepackArgs};
use crate::summary::{programs_table, render_overview, sources_table, warnings_table};

/// Outcome of `check`.
#[derive(Debug)]
pub struct CheckResult {
    pub warnings: Vec<sharc_codec::CrossReferenceWarning>,
    /// Strict mode rejected the archive.
    pub failed: bool,
}

fn decode_options(args: &InputArgs) -> DecodeOptions {
    let options = DecodeOptions::new();
    if args.big_endian {
        options.big_endian()
    } else {
        options
    }
}

fn load(args: &InputArgs, options: DecodeOptions) -> Result<Decoded> {
    let _span = info_span!("load", path = %args.input.display()).entered();
    let decoded = read_sharc_with_options(&args.input, options)
        .with_context(|| format!("read {}", args.input.display()))?;
    info!(
        programs = decoded.archive.programs.len(),
        sources = decoded.archive.sources.len(),
        warnings = decoded.warnings.len(),
        "Loaded archive"
    );
    Ok(decoded)
}

pub fn run_info(args: &InputArgs) -> Result<()> {
    let decoded = load(args, decode_options(args))?;
    println!("{}", render_overview(&decoded.archive));
    if !decoded.archive.programs.is_empty() {
        println!("{}", programs_table(&decoded.archive));
    }
    if !decoded.archive.sources.is_empty() {
        println!("{}", sources_table(&decoded.archive));
    }
    Ok(())
}

pub fn run_check(args: &CheckArgs) -> Result<CheckResult> {
    let mut options = decode_options(&args.input);
    if args.strict {
        options = options.strict();
    }

    let result = match read_sharc_with_options(&args.input.input, options) {
        Ok(decoded) => CheckResult {
            warnings: decoded.warnings,
            failed: false,
        },
        Err(SharcError::Validation(warnings)) => CheckResult {
            warnings,
            failed: true,
        },
        Err(error) => {
            return Err(anyhow::Error::new(error)
                .context(format!("check {}", args.input.input.display())));
        }
    };

    if result.warnings.is_empty() {
        println!("{}: no diagnostics", args.input.input.display());
    } else {
        println!("{}", warnings_table(&result.warnings));
    }
    Ok(result)
}

pub fn run_extract(args: &ExtractArgs) -> Result<PathBuf> {
    let decoded = load(&args.input, decode_options(&args.input))?;
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| args.input.input.with_extension(""));
    if output_dir == args.input.input {
        bail!(
            "output directory would overwrite {}; pass --output-dir",
            args.input.input.display()
        );
    }

    for source in &decoded.archive.sources {
        let path = source
            .export(&output_dir)
            .with_context(|| format!("export {}", source.name))?;
        info!(path = %path.display(), "Extracted source");
    }
    println!(
        "Extracted {} source(s) to {}",
        decoded.archive.sources.len(),
        output_dir.display()
    );
    Ok(output_dir)
}

pub fn run_repack(args: &RepackArgs) -> Result<()> {
    let mut archive = load(&args.input, decode_options(&args.input))?.archive;
    if !args.keep_name {
        rename_to_stem(&mut archive, &args.output);
    }
    write_sharc(&args.output, &archive)
        .with_context(|| format!("write {}", args.output.display()))?;
    println!("Wrote {}", args.output.display());
    Ok(())
}

pub fn run_dump(args: &DumpArgs) -> Result<()> {
    let decoded = load(&args.input, decode_options(&args.input).without_validation())?;
    let json = if args.pretty {
        serde_json::to_string_pretty(&decoded.archive)
    } else {
        serde_json::to_string(&decoded.archive)
    }
    .context("serialize archive")?;
    println!("{json}");
    Ok(())
}

/// Rename the archive after the file stem of `path`, if it has one.
pub fn rename_to_stem(archive: &mut Archive, path: &Path) {
    match path.file_stem().and_then(|stem| stem.to_str()) {
        Some(stem) => archive.set_name(stem),
        None => warn!(path = %path.display(), "Output path has no file stem; keeping name"),
    }
}
