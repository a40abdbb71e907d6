//! Archive record codecs.
//!
//! Leaf records (macros, symbols, variations, sources, opaque blobs) and the
//! program record that aggregates them. Every type implements
//! [`Record`](crate::list::Record) so it can be stored in a
//! [`RecordList`](crate::list::RecordList).

pub mod opaque;
pub mod program;
pub mod shader_macro;
pub mod source;
pub mod symbol;
pub mod variation;

pub use opaque::{OPAQUE_MIN_LEN, OpaqueRecord};
pub use program::{ProgramVariations, ShaderProgram, ShaderStage, UNUSED_STAGE};
pub use shader_macro::ShaderMacro;
pub use source::ShaderSource;
pub use symbol::{ShaderSymbol, SymbolKind};
pub use variation::{VariationDeclaration, VariationDefault};
