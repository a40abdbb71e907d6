//! Shader program record.
//!
//! # Layout
//!
//! | Offset | Width | Field     | Description                             |
//! |--------|-------|-----------|-----------------------------------------|
//! | 0      | 4     | size      | Record size incl. every nested list     |
//! | 4      | 4     | nameLen   | Program name length (incl. NUL)         |
//! | 8      | 4     | vertex    | Source index of the vertex stage or -1  |
//! | 12     | 4     | fragment  | Source index of the fragment stage or -1|
//! | 16     | 4     | geometry  | Source index of the geometry stage or -1|
//! | 20     | ...   | name, then nested lists (see below)                 |
//!
//! Nested lists, in order: vertex/fragment/geometry macros, the variation
//! block (v11: declarations + defaults, v10: opaque variation macros), then
//! uniform variables, uniform blocks, sampler variables and attribute
//! variables.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{
    OpaqueRecord, ShaderMacro, ShaderSource, ShaderSymbol, SymbolKind, VariationDeclaration,
    VariationDefault,
};
use crate::error::{Result, SharcError};
use crate::field::{FieldReader, FieldWriter, encode_string};
use crate::list::{Record, RecordList};
use crate::types::{CodecContext, SchemaVersion};
use crate::validate::check_symbols;

/// Stage index value meaning "stage not used".
pub const UNUSED_STAGE: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Geometry,
}

impl ShaderStage {
    pub const ALL: [ShaderStage; 3] = [Self::Vertex, Self::Fragment, Self::Geometry];
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => write!(f, "vertex"),
            Self::Fragment => write!(f, "fragment"),
            Self::Geometry => write!(f, "geometry"),
        }
    }
}

/// Version-specific variation block of a program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgramVariations {
    /// v11: declared axes and their defaults.
    Declared {
        declarations: RecordList<VariationDeclaration>,
        defaults: RecordList<VariationDefault>,
    },
    /// v10: variation macros whose layout is not decoded.
    Legacy { macros: RecordList<OpaqueRecord> },
}

impl ProgramVariations {
    /// Empty block for the given schema.
    #[must_use]
    pub fn empty(version: SchemaVersion) -> Self {
        match version {
            SchemaVersion::V11 => Self::Declared {
                declarations: RecordList::new(),
                defaults: RecordList::new(),
            },
            SchemaVersion::V10 => Self::Legacy {
                macros: RecordList::new(),
            },
        }
    }

    /// Schema this block belongs to.
    #[must_use]
    pub fn version(&self) -> SchemaVersion {
        match self {
            Self::Declared { .. } => SchemaVersion::V11,
            Self::Legacy { .. } => SchemaVersion::V10,
        }
    }

    /// Number of variation records (declarations or legacy macros).
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Declared { declarations, .. } => declarations.len(),
            Self::Legacy { macros } => macros.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn declarations(&self) -> Option<&RecordList<VariationDeclaration>> {
        match self {
            Self::Declared { declarations, .. } => Some(declarations),
            Self::Legacy { .. } => None,
        }
    }

    #[must_use]
    pub fn defaults(&self) -> Option<&RecordList<VariationDefault>> {
        match self {
            Self::Declared { defaults, .. } => Some(defaults),
            Self::Legacy { .. } => None,
        }
    }

    fn decode(reader: &mut FieldReader<'_>, ctx: &CodecContext) -> Result<Self> {
        Ok(match ctx.version {
            SchemaVersion::V11 => Self::Declared {
                declarations: RecordList::decode(reader, ctx)?,
                defaults: RecordList::decode(reader, ctx)?,
            },
            SchemaVersion::V10 => Self::Legacy {
                macros: RecordList::decode(reader, ctx)?,
            },
        })
    }

    fn encode(&self, writer: &mut FieldWriter, ctx: &CodecContext) -> Result<()> {
        match self {
            Self::Declared {
                declarations,
                defaults,
            } => {
                declarations.encode(writer, ctx)?;
                defaults.encode(writer, ctx)?;
            }
            Self::Legacy { macros } => {
                macros.encode(writer, ctx)?;
            }
        }
        Ok(())
    }
}

/// One linked shader program.
///
/// Stage indices refer to positions in the archive's source list. They are
/// not range-checked by the codec; use [`ShaderProgram::stage_source`] to
/// resolve them safely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShaderProgram {
    pub name: String,
    pub vertex_index: i32,
    pub fragment_index: i32,
    pub geometry_index: i32,
    pub vertex_macros: RecordList<ShaderMacro>,
    pub fragment_macros: RecordList<ShaderMacro>,
    pub geometry_macros: RecordList<ShaderMacro>,
    pub variations: ProgramVariations,
    pub uniform_variables: RecordList<ShaderSymbol>,
    pub uniform_blocks: RecordList<ShaderSymbol>,
    pub sampler_variables: RecordList<ShaderSymbol>,
    pub attribute_variables: RecordList<ShaderSymbol>,
}

impl ShaderProgram {
    /// Empty program with every stage unused.
    pub fn new(name: impl Into<String>, version: SchemaVersion) -> Self {
        Self {
            name: name.into(),
            vertex_index: UNUSED_STAGE,
            fragment_index: UNUSED_STAGE,
            geometry_index: UNUSED_STAGE,
            vertex_macros: RecordList::new(),
            fragment_macros: RecordList::new(),
            geometry_macros: RecordList::new(),
            variations: ProgramVariations::empty(version),
            uniform_variables: RecordList::new(),
            uniform_blocks: RecordList::new(),
            sampler_variables: RecordList::new(),
            attribute_variables: RecordList::new(),
        }
    }

    #[must_use]
    pub fn stage_index(&self, stage: ShaderStage) -> i32 {
        match stage {
            ShaderStage::Vertex => self.vertex_index,
            ShaderStage::Fragment => self.fragment_index,
            ShaderStage::Geometry => self.geometry_index,
        }
    }

    pub fn set_stage_index(&mut self, stage: ShaderStage, index: i32) {
        match stage {
            ShaderStage::Vertex => self.vertex_index = index,
            ShaderStage::Fragment => self.fragment_index = index,
            ShaderStage::Geometry => self.geometry_index = index,
        }
    }

    /// Source used by `stage`, or `None` when unused or out of range.
    #[must_use]
    pub fn stage_source<'a>(
        &self,
        stage: ShaderStage,
        sources: &'a RecordList<ShaderSource>,
    ) -> Option<&'a ShaderSource> {
        usize::try_from(self.stage_index(stage))
            .ok()
            .and_then(|index| sources.get(index))
    }

    #[must_use]
    pub fn macros(&self, stage: ShaderStage) -> &RecordList<ShaderMacro> {
        match stage {
            ShaderStage::Vertex => &self.vertex_macros,
            ShaderStage::Fragment => &self.fragment_macros,
            ShaderStage::Geometry => &self.geometry_macros,
        }
    }

    pub fn macros_mut(&mut self, stage: ShaderStage) -> &mut RecordList<ShaderMacro> {
        match stage {
            ShaderStage::Vertex => &mut self.vertex_macros,
            ShaderStage::Fragment => &mut self.fragment_macros,
            ShaderStage::Geometry => &mut self.geometry_macros,
        }
    }

    #[must_use]
    pub fn symbols(&self, kind: SymbolKind) -> &RecordList<ShaderSymbol> {
        match kind {
            SymbolKind::UniformVariable => &self.uniform_variables,
            SymbolKind::UniformBlock => &self.uniform_blocks,
            SymbolKind::Sampler => &self.sampler_variables,
            SymbolKind::Attribute => &self.attribute_variables,
        }
    }

    pub fn symbols_mut(&mut self, kind: SymbolKind) -> &mut RecordList<ShaderSymbol> {
        match kind {
            SymbolKind::UniformVariable => &mut self.uniform_variables,
            SymbolKind::UniformBlock => &mut self.uniform_blocks,
            SymbolKind::Sampler => &mut self.sampler_variables,
            SymbolKind::Attribute => &mut self.attribute_variables,
        }
    }
}

impl Record for ShaderProgram {
    const KIND: &'static str = "program";
    const HEADER_LEN: usize = 20;

    fn decode(reader: &mut FieldReader<'_>, ctx: &CodecContext) -> Result<Self> {
        let _size = reader.read_u32()?;
        let name_len = reader.read_len()?;
        let vertex_index = reader.read_i32()?;
        let fragment_index = reader.read_i32()?;
        let geometry_index = reader.read_i32()?;
        let name = reader.read_string(name_len)?;

        let vertex_macros = RecordList::decode(reader, ctx)?;
        let fragment_macros = RecordList::decode(reader, ctx)?;
        let geometry_macros = RecordList::decode(reader, ctx)?;
        let variations = ProgramVariations::decode(reader, ctx)?;
        let uniform_variables = RecordList::decode(reader, ctx)?;
        let uniform_blocks = RecordList::decode(reader, ctx)?;
        let sampler_variables = RecordList::decode(reader, ctx)?;
        let attribute_variables = RecordList::decode(reader, ctx)?;

        tracing::debug!(
            program = %name,
            vertex_index,
            fragment_index,
            geometry_index,
            variations = variations.len(),
            "Decoded program"
        );

        Ok(Self {
            name,
            vertex_index,
            fragment_index,
            geometry_index,
            vertex_macros,
            fragment_macros,
            geometry_macros,
            variations,
            uniform_variables,
            uniform_blocks,
            sampler_variables,
            attribute_variables,
        })
    }

    fn encode(&self, writer: &mut FieldWriter, ctx: &CodecContext) -> Result<()> {
        let found = self.variations.version();
        if found != ctx.version {
            return Err(SharcError::SchemaMismatch {
                program: self.name.clone(),
                expected: ctx.version,
                found,
            });
        }
        if ctx.version == SchemaVersion::V11 {
            check_symbols(self)?;
        }

        let name = encode_string(&self.name)?;

        let start = writer.begin_sized();
        writer.write_len(name.len())?;
        writer.write_i32(self.vertex_index);
        writer.write_i32(self.fragment_index);
        writer.write_i32(self.geometry_index);
        writer.write_bytes(&name);

        for stage in ShaderStage::ALL {
            self.macros(stage).encode(writer, ctx)?;
        }
        self.variations.encode(writer, ctx)?;
        for kind in SymbolKind::ALL {
            self.symbols(kind).encode(writer, ctx)?;
        }

        writer.finish_sized(start)?;
        Ok(())
    }
}
