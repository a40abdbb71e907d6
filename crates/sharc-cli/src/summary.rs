//! Human readable rendering of archives and diagnostics.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use sharc_codec::{
    Archive, ByteOrder, CrossReferenceWarning, RecordList, Severity, ShaderProgram, ShaderSource,
    ShaderStage, UNUSED_STAGE, WarningKind,
};

/// Plain-text overview of an archive, one fact per line.
pub fn render_overview(archive: &Archive) -> String {
    let byte_order = match archive.header.byte_order {
        ByteOrder::Little => "little endian",
        ByteOrder::Big => "big endian",
    };

    let mut lines = vec![
        format!("Archive: {}", archive.name()),
        format!("Version: {}", archive.version()),
        format!("Byte order: {byte_order}"),
        format!("Programs: {}", archive.programs.len()),
    ];
    for program in &archive.programs {
        let stages: Vec<String> = ShaderStage::ALL
            .iter()
            .map(|&stage| {
                format!(
                    "{stage}={}",
                    stage_label(program, stage, &archive.sources)
                )
            })
            .collect();
        lines.push(format!("  {}: {}", program.name, stages.join(", ")));
    }
    lines.push(format!("Sources: {}", archive.sources.len()));
    for source in &archive.sources {
        lines.push(format!("  {} ({} bytes)", source.name, source.code().len()));
    }
    if let Some(unknown) = &archive.unknown {
        lines.push(format!("Unknown records: {}", unknown.len()));
    }
    lines.join("\n")
}

/// Source name used by a stage, `-` when unused, `#n (missing)` when dangling.
pub fn stage_label(
    program: &ShaderProgram,
    stage: ShaderStage,
    sources: &RecordList<ShaderSource>,
) -> String {
    match program.stage_source(stage, sources) {
        Some(source) => source.name.clone(),
        None if program.stage_index(stage) == UNUSED_STAGE => "-".to_string(),
        None => format!("#{} (missing)", program.stage_index(stage)),
    }
}

pub fn programs_table(archive: &Archive) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Program"),
        header_cell("Vertex"),
        header_cell("Fragment"),
        header_cell("Geometry"),
        header_cell("Macros"),
        header_cell("Variations"),
        header_cell("Symbols"),
    ]);
    apply_table_style(&mut table);
    for index in 4..7 {
        align_column(&mut table, index, CellAlignment::Right);
    }

    for program in &archive.programs {
        let mut row = vec![Cell::new(&program.name).add_attribute(Attribute::Bold)];
        for stage in ShaderStage::ALL {
            let label = stage_label(program, stage, &archive.sources);
            row.push(match label.as_str() {
                "-" => dim_cell(label),
                text if text.ends_with("(missing)") => Cell::new(label).fg(Color::Red),
                _ => Cell::new(label),
            });
        }
        let macros: usize = ShaderStage::ALL
            .iter()
            .map(|&stage| program.macros(stage).len())
            .sum();
        let symbols: usize = sharc_codec::SymbolKind::ALL
            .iter()
            .map(|&kind| program.symbols(kind).len())
            .sum();
        row.push(Cell::new(macros));
        row.push(Cell::new(program.variations.len()));
        row.push(Cell::new(symbols));
        table.add_row(row);
    }
    table
}

pub fn sources_table(archive: &Archive) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Source"),
        header_cell("Bytes"),
        header_cell("Lines"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);

    for (index, source) in archive.sources.iter().enumerate() {
        table.add_row(vec![
            dim_cell(index),
            Cell::new(&source.name),
            Cell::new(source.code().len()),
            Cell::new(source.code().lines().count()),
        ]);
    }
    table
}

pub fn warnings_table(warnings: &[CrossReferenceWarning]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Program"),
        header_cell("Variation"),
        header_cell("Id"),
        header_cell("Issue"),
    ]);
    apply_table_style(&mut table);

    for warning in warnings {
        table.add_row(vec![
            severity_cell(warning.severity()),
            Cell::new(&warning.program),
            Cell::new(&warning.variation),
            Cell::new(&warning.id),
            Cell::new(issue_label(warning.kind)),
        ]);
    }
    table
}

/// Short description of a warning kind.
pub fn issue_label(kind: WarningKind) -> String {
    match kind {
        WarningKind::DefaultWithoutDeclaration => "default without declaration".to_string(),
        WarningKind::EmptyDefault => "empty default".to_string(),
        WarningKind::MissingDefault(count) => format!("missing default ({count})"),
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn severity_cell(severity: Severity) -> Cell {
    match severity {
        Severity::Warning => Cell::new("WARN").fg(Color::Yellow),
        Severity::Info => dim_cell("INFO"),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
