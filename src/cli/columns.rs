use std::path::PathBuf;

use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::pipeline::{Pipeline, PipelineOptions};
use crate::settings::load_settings;

pub fn run(file: &str, preview_rows: usize) -> Result<()> {
    let settings = load_settings();
    let pipeline = Pipeline::new(PipelineOptions::from(&settings));
    let table = pipeline.inspect(&PathBuf::from(file))?;

    if table.columns.is_empty() {
        println!("{file} is empty.");
        return Ok(());
    }

    println!(
        "Header found on row {} ({} data rows below it)",
        table.header_row + 1,
        table.rows.len()
    );
    println!();
    for (i, name) in table.columns.iter().enumerate() {
        println!("  {:>2}. {name}", i + 1);
    }

    if preview_rows > 0 && !table.is_empty() {
        let mut preview = Table::new();
        preview.set_header(table.columns.clone());
        for row in table.rows.iter().take(preview_rows) {
            preview.add_row(row.iter().map(|c| Cell::new(c.as_text())));
        }
        println!();
        println!("{preview}");
    }
    Ok(())
}
