use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};
use tally::{ColumnRole, Statement};

use super::resolve_settings;

pub fn run(file: &Path, config: Option<&Path>, json: bool) -> Result<()> {
    let settings = resolve_settings(config)?;
    let stmt = Statement::open(file, &settings)
        .with_context(|| format!("failed to load {}", file.display()))?;
    let mapping = stmt.detect();

    if json {
        println!("{}", serde_json::to_string_pretty(&mapping)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Role", "Column"]);
    for role in ColumnRole::ALL {
        if role == ColumnRole::Amount {
            continue;
        }
        table.add_row(vec![
            Cell::new(role),
            Cell::new(mapping.get(role).unwrap_or("-")),
        ]);
    }
    println!(
        "{} ({} columns, {} rows)\n{table}",
        file.display(),
        stmt.table().column_count(),
        stmt.table().row_count()
    );
    Ok(())
}
