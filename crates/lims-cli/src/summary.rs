use std::fmt::Write as _;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use lims_cli::pipeline::PipelineReport;
use lims_model::ErrorCode;

/// Widest histogram bar, in characters.
const BAR_WIDTH: usize = 40;
/// Record ids listed per error code.
const MAX_EXAMPLES: usize = 3;

pub fn print_summary(report: &PipelineReport) {
    println!("Run: {}", report.run_id);
    println!("Input: {} ({})", report.input.display(), report.format);
    if let Some(files) = &report.audit_files {
        println!("Audit: {}, {}", files.csv.display(), files.json.display());
    }
    if !report.intake.ok {
        eprintln!("Intake failed: {}", report.intake.message);
    }
    println!("{}", summary_table(report));
    if let Some(table) = issue_table(report) {
        println!();
        println!("Issues:");
        println!("{table}");
    }
    if let Some(table) = histogram_table(report) {
        println!();
        println!("Acknowledgment delays:");
        println!("{table}");
    }
}

fn summary_table(report: &PipelineReport) -> Table {
    let metrics = &report.metrics;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Metric"), header_cell("Value")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);

    table.add_row(vec![Cell::new("Records"), Cell::new(metrics.throughput())]);
    table.add_row(vec![Cell::new("Valid"), Cell::new(metrics.valid_count)]);
    table.add_row(vec![
        Cell::new("Quarantined"),
        count_cell(Some(metrics.quarantine_size()), Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Validation errors"),
        count_cell(Some(metrics.error_count), Color::Red),
    ]);
    table.add_row(vec![
        Cell::new("Error rate"),
        Cell::new(format_rate(metrics.error_rate())),
    ]);
    if report.reconciled {
        table.add_row(vec![Cell::new("Acknowledged"), Cell::new(metrics.acked_count)]);
        table.add_row(vec![
            Cell::new(format!("SLA breaches (>{}ms)", report.sla_threshold_ms)),
            count_cell(Some(metrics.sla_breach_count), Color::Red),
        ]);
        table.add_row(vec![
            Cell::new("SLA breach rate"),
            Cell::new(format_rate(metrics.sla_breach_rate())),
        ]);
    } else {
        table.add_row(vec![Cell::new("Acknowledged"), dim_cell("-")]);
        table.add_row(vec![Cell::new("SLA breaches"), dim_cell("-")]);
    }
    table
}

fn issue_table(report: &PipelineReport) -> Option<Table> {
    let by_code = &report.metrics.error_count_by_code;
    if by_code.is_empty() {
        return None;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Code"),
        header_cell("Description"),
        header_cell("Count"),
        header_cell("Examples"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Center);
    align_column(&mut table, 2, CellAlignment::Right);
    for (code, count) in by_code {
        table.add_row(vec![
            Cell::new(code.as_str())
                .fg(Color::Red)
                .add_attribute(Attribute::Bold),
            Cell::new(code.description()),
            Cell::new(count),
            Cell::new(examples(report, *code)),
        ]);
    }
    Some(table)
}

fn histogram_table(report: &PipelineReport) -> Option<Table> {
    let buckets = report.metrics.delay_histogram();
    let max = buckets.iter().map(|bucket| bucket.count).max()?;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Delay"),
        header_cell("Count"),
        header_cell(""),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 1, CellAlignment::Right);
    for bucket in buckets {
        let breached = bucket.start_ms >= report.sla_threshold_ms;
        let bar = Cell::new(histogram_bar(bucket.count, max)).fg(if breached {
            Color::Red
        } else {
            Color::Green
        });
        table.add_row(vec![Cell::new(bucket.label()), Cell::new(bucket.count), bar]);
    }
    Some(table)
}

/// Distinct record ids carrying `code`, in input order.
fn examples(report: &PipelineReport, code: ErrorCode) -> String {
    let mut ids: Vec<&str> = Vec::new();
    for error in report.errors.iter().filter(|error| error.code == code) {
        if !ids.contains(&error.record_id.as_str()) {
            ids.push(&error.record_id);
        }
    }
    let shown = ids.len().min(MAX_EXAMPLES);
    let mut text = ids[..shown].join(", ");
    if ids.len() > shown {
        let _ = write!(text, " (+{} more)", ids.len() - shown);
    }
    text
}

fn histogram_bar(count: usize, max: usize) -> String {
    if count == 0 || max == 0 {
        return String::new();
    }
    let width = (count * BAR_WIDTH).div_ceil(max);
    "█".repeat(width)
}

fn format_rate(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: Option<usize>, color: Color) -> Cell {
    match count {
        Some(value) if value > 0 => Cell::new(value).fg(color).add_attribute(Attribute::Bold),
        Some(value) => dim_cell(value),
        None => dim_cell("-"),
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
