use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::types::AnalysisResult;

pub fn print_summary(result: &AnalysisResult) {
    println!("Data: {}", result.data_dir.display());
    println!("Inserts: {}", result.inserts_dir.display());
    if !result.figures_written.is_empty() {
        println!("Figures: {}", result.figures_dir.display());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Condition"),
        header_cell("Scripts"),
        header_cell("Successful"),
        header_cell("Datasets"),
        header_cell("Clean"),
    ]);
    apply_table_style(&mut table);
    for index in 1..5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for condition in &result.conditions {
        table.add_row(vec![
            Cell::new(condition.condition.as_str())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(condition.scripts),
            Cell::new(condition.successful_scripts),
            Cell::new(condition.datasets),
            Cell::new(condition.clean_datasets),
        ]);
    }
    println!("{table}");

    println!(
        "Paired scripts: {}  Inserts written: {}  Figures written: {}",
        result.paired_scripts,
        result.inserts_written,
        result.figures_written.len()
    );

    if !result.errors.is_empty() {
        eprintln!("Errors:");
        for error in &result.errors {
            eprintln!("- {error}");
        }
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

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}
