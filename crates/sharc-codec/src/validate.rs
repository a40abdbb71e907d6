//! Cross-reference validation.
//!
//! Runs after a v11 archive has been fully decoded and checks invariants
//! that span several record lists of a program:
//!
//! - variation defaults pair up with declarations by `(name, id)`;
//! - a matched default carries at most one value (fatal);
//! - uniform blocks store their default size in `offset_or_id` (fatal);
//! - samplers and attributes have no default and `offset_or_id == -1` (fatal).
//!
//! Pairing problems are not fatal. They are returned as
//! [`CrossReferenceWarning`]s and logged.
//!
//! Stage indices are *not* checked here: whether a program's source index
//! resolves is up to the caller (see [`ShaderProgram::stage_source`]).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::archive::Archive;
use crate::error::{Result, SharcError};
use crate::record::{ShaderProgram, SymbolKind, UNUSED_STAGE};

/// Severity of a cross-reference diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Expected in real archives; nothing to act on.
    Info,
    /// Likely an authoring mistake.
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARNING"),
        }
    }
}

/// How many values a declared variation enumerates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueCount {
    None,
    Single,
    Multiple(usize),
}

impl ValueCount {
    #[must_use]
    pub fn of(len: usize) -> Self {
        match len {
            0 => Self::None,
            1 => Self::Single,
            n => Self::Multiple(n),
        }
    }
}

impl fmt::Display for ValueCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "no values"),
            Self::Single => write!(f, "one value"),
            Self::Multiple(n) => write!(f, "{n} values"),
        }
    }
}

/// What went wrong between a declaration and its default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WarningKind {
    /// A default names a variation that is not declared.
    DefaultWithoutDeclaration,
    /// The declaration has values but its default carries none.
    EmptyDefault,
    /// The declaration has no default at all.
    MissingDefault(ValueCount),
}

/// Non-fatal diagnostic produced while validating a decoded archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossReferenceWarning {
    pub program: String,
    pub variation: String,
    pub id: String,
    pub kind: WarningKind,
}

impl CrossReferenceWarning {
    fn new(program: &str, key: (&str, &str), kind: WarningKind) -> Self {
        Self {
            program: program.to_string(),
            variation: key.0.to_string(),
            id: key.1.to_string(),
            kind,
        }
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        match self.kind {
            WarningKind::MissingDefault(ValueCount::None | ValueCount::Single) => Severity::Info,
            WarningKind::MissingDefault(ValueCount::Multiple(_))
            | WarningKind::EmptyDefault
            | WarningKind::DefaultWithoutDeclaration => Severity::Warning,
        }
    }
}

impl fmt::Display for CrossReferenceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = format!("('{}', '{}')", self.variation, self.id);
        match self.kind {
            WarningKind::DefaultWithoutDeclaration => write!(
                f,
                "program '{}': default {key} does not match any declared variation",
                self.program
            ),
            WarningKind::EmptyDefault => write!(
                f,
                "program '{}': variation {key} has values but an empty default",
                self.program
            ),
            WarningKind::MissingDefault(count) => write!(
                f,
                "program '{}': variation {key} with {count} has no default",
                self.program
            ),
        }
    }
}

/// Validate every program of a decoded archive.
///
/// Legacy (v10) archives carry no declarations and are not checked.
pub fn validate_archive(archive: &Archive) -> Result<Vec<CrossReferenceWarning>> {
    if !archive.version().has_variation_defaults() {
        return Ok(Vec::new());
    }

    let mut warnings = Vec::new();
    for program in &archive.programs {
        warnings.extend(validate_program(program)?);
    }

    for warning in &warnings {
        tracing::warn!(severity = %warning.severity(), "{warning}");
    }
    Ok(warnings)
}

/// Validate one program: variation pairing, then symbol invariants.
pub fn validate_program(program: &ShaderProgram) -> Result<Vec<CrossReferenceWarning>> {
    let warnings = check_variations(program)?;
    check_symbols(program)?;
    Ok(warnings)
}

fn check_variations(program: &ShaderProgram) -> Result<Vec<CrossReferenceWarning>> {
    let (Some(declarations), Some(defaults)) = (
        program.variations.declarations(),
        program.variations.defaults(),
    ) else {
        return Ok(Vec::new());
    };

    let mut warnings = Vec::new();

    for default in defaults {
        match declarations.iter().find(|decl| decl.key() == default.key()) {
            Some(_) if default.values.len() > 1 => {
                return Err(SharcError::invariant(
                    format!("program '{}'", program.name),
                    format!(
                        "default ('{}', '{}') carries {} values, at most one allowed",
                        default.name,
                        default.id,
                        default.values.len()
                    ),
                ));
            }
            Some(_) => {}
            None => warnings.push(CrossReferenceWarning::new(
                &program.name,
                default.key(),
                WarningKind::DefaultWithoutDeclaration,
            )),
        }
    }

    for decl in declarations {
        match defaults.iter().find(|default| default.key() == decl.key()) {
            Some(default) => {
                if !decl.values.is_empty() && default.values.is_empty() {
                    warnings.push(CrossReferenceWarning::new(
                        &program.name,
                        decl.key(),
                        WarningKind::EmptyDefault,
                    ));
                }
            }
            None => warnings.push(CrossReferenceWarning::new(
                &program.name,
                decl.key(),
                WarningKind::MissingDefault(ValueCount::of(decl.values.len())),
            )),
        }
    }

    Ok(warnings)
}

/// Check the per-kind symbol invariants of a program.
pub fn check_symbols(program: &ShaderProgram) -> Result<()> {
    for symbol in &program.uniform_blocks {
        if usize::try_from(symbol.offset_or_id).ok() != Some(symbol.default_value.len()) {
            return Err(symbol_violation(
                program,
                SymbolKind::UniformBlock,
                &symbol.name,
                format!(
                    "offset {} does not match default length {}",
                    symbol.offset_or_id,
                    symbol.default_value.len()
                ),
            ));
        }
    }

    for kind in [SymbolKind::Sampler, SymbolKind::Attribute] {
        for symbol in program.symbols(kind) {
            if !symbol.default_value.is_empty() {
                return Err(symbol_violation(
                    program,
                    kind,
                    &symbol.name,
                    format!("carries a {} byte default value", symbol.default_value.len()),
                ));
            }
            if symbol.offset_or_id != UNUSED_STAGE {
                return Err(symbol_violation(
                    program,
                    kind,
                    &symbol.name,
                    format!("offset is {}, expected -1", symbol.offset_or_id),
                ));
            }
        }
    }

    Ok(())
}

fn symbol_violation(
    program: &ShaderProgram,
    kind: SymbolKind,
    symbol: &str,
    message: String,
) -> SharcError {
    SharcError::invariant(
        format!("program '{}', {kind} '{symbol}'", program.name),
        message,
    )
}
