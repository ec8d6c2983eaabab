use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use colored::Colorize;
use comfy_table::{Cell, Table};
use serde::Serialize;
use tally::fmt::{money, money_opt, signed_money, timestamp};
use tally::{ColumnMapping, ImportSummary, ParsedTransaction, Statement};

use super::{resolve_settings, OutputFormat};

/// Output row: the record plus its derived amount.
#[derive(Serialize)]
struct Record<'a> {
    date: NaiveDateTime,
    description: &'a str,
    credit: Option<f64>,
    debit: Option<f64>,
    amount: f64,
    category: Option<&'a str>,
}

impl<'a> From<&'a ParsedTransaction> for Record<'a> {
    fn from(t: &'a ParsedTransaction) -> Self {
        Self {
            date: t.date,
            description: &t.description,
            credit: t.credit,
            debit: t.debit,
            amount: t.amount(),
            category: t.category.as_deref(),
        }
    }
}

fn load_mapping(path: &Path) -> Result<ColumnMapping> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read mapping {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid mapping {}", path.display()))
}

pub fn run(
    file: &Path,
    config: Option<&Path>,
    mapping_file: Option<&Path>,
    overrides: &[String],
    format: OutputFormat,
    summary: bool,
) -> Result<()> {
    let settings = resolve_settings(config)?;
    let stmt = Statement::open(file, &settings)
        .with_context(|| format!("failed to load {}", file.display()))?;

    let base = match mapping_file {
        Some(path) => load_mapping(path)?,
        None => stmt.detect(),
    };
    let mapping = base.merged(&ColumnMapping::from_pairs(overrides)?);
    let txns: Vec<ParsedTransaction> = stmt.transactions(&mapping)?.collect();

    match format {
        OutputFormat::Table => print_table(&txns),
        OutputFormat::Json => {
            let records: Vec<Record> = txns.iter().map(Record::from).collect();
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            for t in &txns {
                wtr.serialize(Record::from(t))?;
            }
            wtr.flush()?;
        }
    }

    if summary {
        let report = ImportSummary::from_transactions(stmt.table().row_count(), &txns);
        let text = summary_text(&report);
        if format == OutputFormat::Table {
            println!("{text}");
        } else {
            // Keep stdout machine-readable.
            writeln!(std::io::stderr(), "{text}")?;
        }
    }
    Ok(())
}

fn print_table(txns: &[ParsedTransaction]) {
    let mut table = Table::new();
    table.set_header(vec!["Date", "Description", "Category", "Credit", "Debit", "Amount"]);
    for t in txns {
        let amount = t.amount();
        let amount = if amount < 0.0 {
            signed_money(amount).red().to_string()
        } else {
            signed_money(amount).green().to_string()
        };
        table.add_row(vec![
            Cell::new(timestamp(&t.date)),
            Cell::new(&t.description),
            Cell::new(t.category.as_deref().unwrap_or("")),
            Cell::new(money_opt(t.credit)),
            Cell::new(money_opt(t.debit)),
            Cell::new(amount),
        ]);
    }
    println!("{table}");
}

fn summary_text(s: &ImportSummary) -> String {
    let mut lines = vec![format!("{} rows read, {} transactions", s.rows_read, s.emitted)];
    if s.dropped > 0 {
        lines.push(format!("{} rows dropped (no parseable date)", s.dropped).yellow().to_string());
    }
    lines.push(format!(
        "Credits {}  Debits {}  {} {}",
        money(s.total_credit),
        money(s.total_debit),
        "Net".bold(),
        signed_money(s.net_amount)
    ));
    if let (Some(first), Some(last)) = (s.first_date, s.last_date) {
        lines.push(format!("{} to {}", timestamp(&first), timestamp(&last)));
    }
    lines.join("\n")
}
