//! Property tests: any well-formed archive survives decode(encode(..)) and
//! reports its own length in the header.

use proptest::prelude::*;
use sharc_codec::{
    Archive, ByteOrder, DecodeOptions, OpaqueRecord, ProgramVariations, RecordList, SchemaVersion,
    ShaderMacro, ShaderProgram, ShaderSource, ShaderSymbol, VariationDeclaration,
    VariationDefault, decode_with_options, encode,
};

fn name() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_.]{0,12}"
}

fn value() -> impl Strategy<Value = String> {
    "[a-z0-9]{1,6}"
}

fn code() -> impl Strategy<Value = String> {
    prop_oneof![
        "[ -~\n\t]{0,64}",
        Just("// 影と光\nvoid main() {}".to_string()),
    ]
}

fn stage_index() -> impl Strategy<Value = i32> {
    prop_oneof![Just(-1), 0i32..8]
}

fn shader_macro() -> impl Strategy<Value = ShaderMacro> {
    (name(), name()).prop_map(|(n, v)| ShaderMacro::new(n, v))
}

fn flags() -> impl Strategy<Value = Vec<bool>> {
    prop::collection::vec(any::<bool>(), 0..6)
}

fn uniform_variable() -> impl Strategy<Value = ShaderSymbol> {
    (
        name(),
        name(),
        any::<i32>(),
        prop::collection::vec(any::<u8>(), 0..16),
        flags(),
    )
        .prop_map(|(n, id, offset, default, flags)| {
            ShaderSymbol::new(n, id)
                .with_offset(offset)
                .with_default(default)
                .with_variations(flags)
        })
}

fn uniform_block() -> impl Strategy<Value = ShaderSymbol> {
    (name(), name(), prop::collection::vec(any::<u8>(), 0..32), flags())
        .prop_map(|(n, id, default, flags)| {
            ShaderSymbol::uniform_block(n, id, default).with_variations(flags)
        })
}

fn bare_symbol() -> impl Strategy<Value = ShaderSymbol> {
    (name(), name(), flags())
        .prop_map(|(n, id, flags)| ShaderSymbol::new(n, id).with_variations(flags))
}

fn declared_variations() -> impl Strategy<Value = ProgramVariations> {
    (
        prop::collection::vec(
            (name(), name(), prop::collection::vec(value(), 0..4)),
            0..4,
        ),
        prop::collection::vec(
            (
                name(),
                name(),
                prop::option::of(value()),
                prop::collection::vec(any::<u8>(), 0..8),
            ),
            0..4,
        ),
    )
        .prop_map(|(decls, defaults)| ProgramVariations::Declared {
            declarations: decls
                .into_iter()
                .map(|(n, id, values)| VariationDeclaration::new(n, id).with_values(values))
                .collect(),
            defaults: defaults
                .into_iter()
                .map(|(n, id, v, trailing)| {
                    let mut default = VariationDefault::new(n, id);
                    default.values.extend(v);
                    default.trailing = trailing;
                    default
                })
                .collect(),
        })
}

fn opaque() -> impl Strategy<Value = OpaqueRecord> {
    prop::collection::vec(any::<u8>(), 4..24).prop_map(OpaqueRecord::new)
}

fn legacy_variations() -> impl Strategy<Value = ProgramVariations> {
    prop::collection::vec(opaque(), 0..4).prop_map(|macros| ProgramVariations::Legacy {
        macros: macros.into(),
    })
}

fn program(version: SchemaVersion) -> impl Strategy<Value = ShaderProgram> {
    let variations = match version {
        SchemaVersion::V11 => declared_variations().boxed(),
        SchemaVersion::V10 => legacy_variations().boxed(),
    };
    (
        name(),
        (stage_index(), stage_index(), stage_index()),
        prop::collection::vec(shader_macro(), 0..3),
        prop::collection::vec(shader_macro(), 0..3),
        variations,
        prop::collection::vec(uniform_variable(), 0..3),
        prop::collection::vec(uniform_block(), 0..3),
        prop::collection::vec(bare_symbol(), 0..3),
        prop::collection::vec(bare_symbol(), 0..3),
    )
        .prop_map(
            move |(n, (vertex, fragment, geometry), vm, fm, variations, uv, ub, sv, av)| {
                let mut program = ShaderProgram::new(n, version);
                program.vertex_index = vertex;
                program.fragment_index = fragment;
                program.geometry_index = geometry;
                program.vertex_macros = vm.into();
                program.fragment_macros = fm.into();
                program.variations = variations;
                program.uniform_variables = uv.into();
                program.uniform_blocks = ub.into();
                program.sampler_variables = sv.into();
                program.attribute_variables = av.into();
                program
            },
        )
}

fn archive() -> impl Strategy<Value = Archive> {
    prop_oneof![Just(SchemaVersion::V10), Just(SchemaVersion::V11)].prop_flat_map(|version| {
        let unknown = match version {
            SchemaVersion::V10 => prop::option::of(prop::collection::vec(opaque(), 0..3))
                .prop_map(|list| list.map(RecordList::from))
                .boxed(),
            SchemaVersion::V11 => Just(None).boxed(),
        };
        (
            name(),
            prop_oneof![Just(ByteOrder::Little), Just(ByteOrder::Big)],
            prop::collection::vec(program(version), 0..3),
            prop::collection::vec((name(), code()), 0..4),
            unknown,
        )
            .prop_map(move |(n, order, programs, sources, unknown)| {
                let mut archive = Archive::new(n, version);
                archive.header.byte_order = order;
                archive.programs = programs.into();
                archive.sources = sources
                    .into_iter()
                    .map(|(n, c)| ShaderSource::new(n, c))
                    .collect();
                archive.unknown = unknown;
                archive
            })
    })
}

fn declared_size(bytes: &[u8], order: ByteOrder) -> u32 {
    let raw = [bytes[8], bytes[9], bytes[10], bytes[11]];
    match order {
        ByteOrder::Little => u32::from_le_bytes(raw),
        ByteOrder::Big => u32::from_be_bytes(raw),
    }
}

proptest! {
    #[test]
    fn prop_roundtrip(archive in archive()) {
        let bytes = encode(&archive).unwrap();
        let options = DecodeOptions::new().with_byte_order(archive.header.byte_order);
        let decoded = decode_with_options(&bytes, &options).unwrap();

        prop_assert_eq!(&decoded.archive, &archive);
        prop_assert_eq!(encode(&decoded.archive).unwrap(), bytes);
    }

    #[test]
    fn prop_declared_size_matches(archive in archive()) {
        let bytes = encode(&archive).unwrap();
        prop_assert_eq!(
            declared_size(&bytes, archive.header.byte_order) as usize,
            bytes.len()
        );
    }
}
