use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use trade_cli::types::{BuildResult, RecipeSummary};
use trade_concordance::ReferenceSummary;
use trade_core::RecipePreset;

pub fn print_build_summary(result: &BuildResult) {
    if let Some(dir) = &result.output_dir {
        println!("Output: {}", dir.display());
    } else {
        println!("Output: (dry run)");
    }
    println!(
        "Source: {} rows across {} years",
        result.source_rows,
        result.years.len()
    );
    if let Some(rows) = result.adjusted_rows {
        println!("Adjustment: {rows} rows replaced or inserted");
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Recipe"),
        header_cell("Type"),
        header_cell("Rows"),
        header_cell("Coverage min %"),
        header_cell("Coverage mean %"),
        header_cell("Issues"),
        header_cell("Output"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 2..=5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    let mut total_rows = 0usize;
    for summary in &result.recipes {
        total_rows += summary.rows;
        table.add_row(vec![
            Cell::new(&summary.recipe),
            Cell::new(summary.data_type),
            Cell::new(summary.rows),
            pct_cell(min_coverage(summary)),
            pct_cell(summary.mean_coverage()),
            issue_cell(summary.issues),
            match &summary.output {
                Some(path) => Cell::new(
                    path.file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                ),
                None => dim_cell("-"),
            },
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(total_rows).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    println!("{table}");
}

pub fn print_presets(presets: &[RecipePreset]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Recipe"),
        header_cell("Level"),
        header_cell("Non-official codes"),
        header_cell("Intertemporal recode"),
        header_cell("Balanced panel"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    for preset in presets {
        let config = &preset.config;
        table.add_row(vec![
            Cell::new(&preset.name),
            Cell::new(config.level.column_name()),
            Cell::new(if config.drop_non_official {
                "dropped"
            } else {
                "flagged"
            }),
            yes_no_cell(config.intertemporal_recode),
            yes_no_cell(config.drop_incomplete_coverage),
        ]);
    }
    println!("{table}");
}

pub fn print_reference_summary(summary: &ReferenceSummary) {
    println!("Reference: {}", summary.reference_dir.display());
    let mut table = Table::new();
    table.set_header(vec![header_cell("Table"), header_cell("Entries")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Verified files"), Cell::new(summary.file_count)]);
    table.add_row(vec![Cell::new("Countries"), Cell::new(summary.country_count)]);
    table.add_row(vec![Cell::new("SITC codes"), Cell::new(summary.sitc_code_count)]);
    table.add_row(vec![
        Cell::new("Intertemporal recodes"),
        Cell::new(summary.recode_count),
    ]);
    println!("{table}");
}

fn min_coverage(summary: &RecipeSummary) -> Option<f64> {
    summary
        .coverage
        .years
        .iter()
        .filter_map(|year| year.coverage_pct)
        .reduce(f64::min)
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
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

fn pct_cell(value: Option<f64>) -> Cell {
    match value {
        Some(pct) if pct < 50.0 => Cell::new(format!("{pct:.1}")).fg(Color::Yellow),
        Some(pct) => Cell::new(format!("{pct:.1}")),
        None => dim_cell("-"),
    }
}

fn issue_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count).fg(Color::Yellow).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn yes_no_cell(flag: bool) -> Cell {
    if flag {
        Cell::new("yes").fg(Color::Green)
    } else {
        dim_cell("no")
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
