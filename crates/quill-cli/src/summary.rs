//! Replay summary output.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};
use quill_cli::replay::ReplayReport;
use quill_store::StoreCall;

const PREVIEW_CHARS: usize = 48;

pub fn print_summary(report: &ReplayReport) {
    println!("{}", calls_table(report));

    let stats = report.stats;
    println!(
        "Autosave: {} scheduled, {} cancelled, {} duplicates, {} dispatched ({} ok, {} failed)",
        stats.scheduled,
        stats.cancelled,
        stats.duplicates,
        stats.dispatched,
        stats.succeeded,
        stats.failed
    );
    println!("Final view: {}", report.final_view.label());

    if !report.errors.is_empty() {
        println!();
        for (at_ms, error) in &report.errors {
            println!("error at {at_ms} ms: {error}");
        }
    }
}

fn calls_table(report: &ReplayReport) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("At (ms)").add_attribute(Attribute::Bold),
        Cell::new("Operation").add_attribute(Attribute::Bold),
        Cell::new("Argument").add_attribute(Attribute::Bold),
    ]);

    for (at_ms, call) in &report.calls {
        table.add_row(vec![
            Cell::new(at_ms).set_alignment(CellAlignment::Right),
            Cell::new(call.operation()),
            Cell::new(argument(call)),
        ]);
    }
    table
}

fn argument(call: &StoreCall) -> String {
    match call {
        StoreCall::Update { content, .. } => preview(content),
        StoreCall::RemoveCoverImage { id } => id.to_string(),
        StoreCall::DeleteFile { url } => url.clone(),
    }
}

fn preview(content: &str) -> String {
    if content.chars().count() <= PREVIEW_CHARS {
        return content.to_string();
    }
    let head: String = content.chars().take(PREVIEW_CHARS).collect();
    format!("{head}…")
}
