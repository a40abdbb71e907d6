//! Integration tests for archive decode/encode.
//!
//! Covers the documented behaviours of the codec: round trips of v10 and v11
//! archives, header gating, stage index handling and cross-reference
//! diagnostics.

use sharc_codec::{
    Archive, ByteOrder, DecodeOptions, OpaqueRecord, ProgramVariations, RecordList, SchemaVersion,
    Severity, ShaderMacro, ShaderProgram, ShaderSource, ShaderStage, ShaderSymbol, SharcError,
    ValueCount, VariationDeclaration, VariationDefault, WarningKind, decode, decode_with_options,
    encode,
};

/// Read the archive file size field.
fn declared_size(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]])
}

/// A v11 archive exercising every record type.
fn rich_archive() -> Archive {
    let mut archive = Archive::new("rich", SchemaVersion::V11);
    archive
        .sources
        .push(ShaderSource::new("lit.vert", "void main() { gl_Position = vec4(0); }"));
    archive
        .sources
        .push(ShaderSource::new("lit.frag", "// 影\nvoid main() {}"));

    let program = archive.new_program("lit");
    program.set_stage_index(ShaderStage::Vertex, 0);
    program.set_stage_index(ShaderStage::Fragment, 1);
    program
        .macros_mut(ShaderStage::Vertex)
        .push(ShaderMacro::new("SKINNING", "1"));
    program
        .macros_mut(ShaderStage::Fragment)
        .push(ShaderMacro::new("FOG_MODE", "linear"));
    program.variations = ProgramVariations::Declared {
        declarations: vec![
            VariationDeclaration::new("FOG", "fog").with_values(["0", "1"]),
            VariationDeclaration::new("SHADOW", "shadow").with_values(["off", "pcf", "vsm"]),
        ]
        .into(),
        defaults: vec![
            VariationDefault::new("FOG", "fog").with_value("1"),
            VariationDefault::new("SHADOW", "shadow").with_value("pcf"),
        ]
        .into(),
    };
    program.uniform_variables.push(
        ShaderSymbol::new("uTime", "time")
            .with_offset(16)
            .with_default(vec![0; 4])
            .with_variations(vec![true, true, false]),
    );
    program
        .uniform_blocks
        .push(ShaderSymbol::uniform_block("Material", "cMat", vec![0, 0, 128, 63]));
    program
        .sampler_variables
        .push(ShaderSymbol::new("albedo", "s0"));
    program
        .attribute_variables
        .push(ShaderSymbol::new("aPosition", "a0"));

    archive
}

#[test]
fn test_minimal_roundtrip() {
    let mut archive = Archive::new("test", SchemaVersion::V11);
    archive.new_program("p0");
    archive
        .sources
        .push(ShaderSource::new("a.glsl", "void main(){}"));

    let bytes = encode(&archive).unwrap();
    let decoded = decode(&bytes).unwrap().archive;

    assert_eq!(decoded.name(), "test");
    assert_eq!(decoded.version(), SchemaVersion::V11);
    let program = decoded.program("p0").unwrap();
    assert_eq!(program.vertex_index, -1);
    assert_eq!(program.fragment_index, -1);
    assert_eq!(decoded.sources[0].name, "a.glsl");
    assert_eq!(decoded.sources[0].code(), "void main(){}");
}

#[test]
fn test_rich_roundtrip_is_byte_exact() {
    let archive = rich_archive();
    let bytes = encode(&archive).unwrap();
    assert_eq!(declared_size(&bytes) as usize, bytes.len());

    let decoded = decode(&bytes).unwrap();
    assert!(decoded.warnings.is_empty());
    assert_eq!(decoded.archive, archive);
    assert_eq!(encode(&decoded.archive).unwrap(), bytes);
}

#[test]
fn test_flipped_magic_is_malformed_header() {
    let mut bytes = encode(&rich_archive()).unwrap();
    bytes[1] ^= 0x20;
    assert!(matches!(
        decode(&bytes),
        Err(SharcError::MalformedHeader { .. })
    ));
}

#[test]
fn test_version_gating() {
    let bytes = encode(&Archive::new("v", SchemaVersion::V11)).unwrap();

    for (raw, accepted) in [(9u32, false), (10, true), (11, true), (12, false)] {
        let mut patched = bytes.clone();
        patched[4..8].copy_from_slice(&raw.to_le_bytes());
        let result = decode(&patched);
        assert_eq!(result.is_ok(), accepted, "version {raw}");
        if !accepted {
            assert!(matches!(result, Err(SharcError::MalformedHeader { .. })));
        }
    }
}

#[test]
fn test_bad_endianness_tag() {
    let mut bytes = encode(&Archive::new("v", SchemaVersion::V11)).unwrap();
    bytes[12..16].copy_from_slice(&2u32.to_le_bytes());
    assert!(matches!(
        decode(&bytes),
        Err(SharcError::MalformedHeader { .. })
    ));
}

#[test]
fn test_truncated_buffer() {
    let bytes = encode(&rich_archive()).unwrap();
    for cut in [3, 19, 40, bytes.len() - 1] {
        assert!(
            matches!(
                decode(&bytes[..cut]),
                Err(SharcError::TruncatedBuffer { .. })
            ),
            "cut at {cut}"
        );
    }
}

#[test]
fn test_dangling_stage_index_is_not_checked() {
    let mut archive = Archive::new("dangling", SchemaVersion::V11);
    for name in ["a.glsl", "b.glsl", "c.glsl"] {
        archive.sources.push(ShaderSource::new(name, ""));
    }
    archive
        .new_program("p")
        .set_stage_index(ShaderStage::Vertex, 5);

    let bytes = encode(&archive).unwrap();
    let decoded = decode(&bytes).unwrap().archive;
    let program = &decoded.programs[0];
    assert_eq!(program.vertex_index, 5);
    assert!(
        program
            .stage_source(ShaderStage::Vertex, &decoded.sources)
            .is_none()
    );
}

#[test]
fn test_missing_default_yields_one_warning() {
    let mut archive = Archive::new("warn", SchemaVersion::V11);
    let program = archive.new_program("p");
    program.variations = ProgramVariations::Declared {
        declarations: vec![VariationDeclaration::new("FOG", "fog").with_values(["1"])].into(),
        defaults: RecordList::new(),
    };

    let bytes = encode(&archive).unwrap();
    let decoded = decode(&bytes).unwrap();
    assert_eq!(decoded.warnings.len(), 1);
    let warning = &decoded.warnings[0];
    assert_eq!(warning.program, "p");
    assert_eq!(warning.kind, WarningKind::MissingDefault(ValueCount::Single));
    assert_eq!(warning.severity(), Severity::Info);
    assert_eq!(decoded.archive, archive);

    // Info-level diagnostics do not fail a strict decode.
    assert!(decode_with_options(&bytes, &DecodeOptions::new().strict()).is_ok());
}

#[test]
fn test_strict_decode_fails_on_warning() {
    let mut archive = Archive::new("strict", SchemaVersion::V11);
    let program = archive.new_program("p");
    program.variations = ProgramVariations::Declared {
        declarations: RecordList::new(),
        defaults: vec![VariationDefault::new("GHOST", "g").with_value("1")].into(),
    };
    let bytes = encode(&archive).unwrap();

    let decoded = decode(&bytes).unwrap();
    assert_eq!(
        decoded.warnings[0].kind,
        WarningKind::DefaultWithoutDeclaration
    );
    assert!(decoded.has_warnings());

    match decode_with_options(&bytes, &DecodeOptions::new().strict()) {
        Err(SharcError::Validation(warnings)) => assert_eq!(warnings.len(), 1),
        other => panic!("expected validation error, got {other:?}"),
    }

    let unchecked = DecodeOptions::new().strict().without_validation();
    assert!(
        decode_with_options(&bytes, &unchecked)
            .unwrap()
            .warnings
            .is_empty()
    );
}

#[test]
fn test_default_with_two_values_is_fatal_on_decode() {
    let mut archive = Archive::new("fatal", SchemaVersion::V11);
    let mut default = VariationDefault::new("FOG", "fog");
    default.values = vec!["0".into(), "1".into()];
    archive.new_program("p").variations = ProgramVariations::Declared {
        declarations: vec![VariationDeclaration::new("FOG", "fog").with_values(["0", "1"])]
            .into(),
        defaults: vec![default].into(),
    };

    let bytes = encode(&archive).unwrap();
    assert!(decode(&bytes).unwrap_err().is_invariant_violation());
    assert!(decode_with_options(&bytes, &DecodeOptions::new().without_validation()).is_ok());
}

#[test]
fn test_symbol_invariants_enforced_on_encode() {
    let mut archive = rich_archive();
    archive.programs[0].uniform_blocks[0].offset_or_id = 0;
    assert!(encode(&archive).unwrap_err().is_invariant_violation());

    let mut archive = rich_archive();
    archive.programs[0].sampler_variables[0].default_value = vec![1];
    assert!(encode(&archive).unwrap_err().is_invariant_violation());

    let mut archive = rich_archive();
    archive.programs[0].attribute_variables[0].offset_or_id = 3;
    assert!(encode(&archive).unwrap_err().is_invariant_violation());
}

#[test]
fn test_legacy_archive_roundtrip() {
    let mut archive = Archive::new("legacy", SchemaVersion::V10);
    archive.sources.push(ShaderSource::new("old.vert", "void main(){}"));
    let program = archive.new_program("old");
    program.vertex_index = 0;
    program.variations = ProgramVariations::Legacy {
        macros: vec![
            OpaqueRecord::new(vec![1, 0, 0, 0]),
            OpaqueRecord::new(b"\x04\0\0\0FOG\0\x01\0\0\0".to_vec()),
        ]
        .into(),
    };
    archive.unknown = Some(vec![OpaqueRecord::new(vec![0xAB; 12])].into());

    let bytes = encode(&archive).unwrap();
    assert_eq!(declared_size(&bytes) as usize, bytes.len());

    let decoded = decode(&bytes).unwrap();
    assert!(decoded.warnings.is_empty());
    assert_eq!(decoded.archive, archive);
    assert_eq!(encode(&decoded.archive).unwrap(), bytes);
}

#[test]
fn test_legacy_archive_without_unknown_list() {
    let archive = Archive::new("legacy", SchemaVersion::V10);
    let decoded = decode(&encode(&archive).unwrap()).unwrap().archive;
    assert!(decoded.unknown.is_none());
}

#[test]
fn test_program_version_must_match_archive() {
    let mut archive = Archive::new("mixed", SchemaVersion::V10);
    archive
        .programs
        .push(ShaderProgram::new("new", SchemaVersion::V11));
    assert!(matches!(
        encode(&archive),
        Err(SharcError::SchemaMismatch { .. })
    ));
}

#[test]
fn test_list_editing() {
    let mut archive = rich_archive();
    archive.sources.insert(0, ShaderSource::new("common.glsl", ""));
    archive.sources.remove(2);
    archive.set_name("edited");

    let decoded = decode(&encode(&archive).unwrap()).unwrap().archive;
    assert_eq!(decoded.name(), "edited");
    let names: Vec<_> = decoded.sources.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["common.glsl", "lit.vert"]);
}

#[test]
fn test_undersized_record_is_malformed() {
    let mut archive = Archive::new("small", SchemaVersion::V11);
    archive.sources.push(ShaderSource::new("a", ""));
    let mut bytes = encode(&archive).unwrap();

    // Header (20 + "small\0"), empty program list, then the source list header.
    let source_at = 26 + 8 + 8;
    bytes[source_at..source_at + 4].copy_from_slice(&4u32.to_le_bytes());
    assert!(matches!(
        decode(&bytes),
        Err(SharcError::MalformedRecord { record: "source", .. })
    ));
}

#[test]
fn test_big_endian_roundtrip() {
    let mut archive = rich_archive();
    archive.header.byte_order = ByteOrder::Big;
    let bytes = encode(&archive).unwrap();
    assert_eq!(&bytes[0..4], b"SHAA");

    let decoded = decode_with_options(&bytes, &DecodeOptions::new().big_endian()).unwrap();
    assert_eq!(decoded.archive, archive);
    assert!(matches!(
        decode(&bytes),
        Err(SharcError::MalformedHeader { .. })
    ));
}
