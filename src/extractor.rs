use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::amounts::cell_amount;
use crate::classifier::{ColumnMapping, ColumnRole};
use crate::dates::DateParser;
use crate::error::Result;
use crate::table::{Cell, Table};

pub const DEFAULT_FALLBACK_DESCRIPTION: &str = "Unknown";

/// One normalized statement row. Only rows with a parsed date become one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedTransaction {
    pub date: NaiveDateTime,
    pub credit: Option<f64>,
    pub debit: Option<f64>,
    pub description: String,
    pub category: Option<String>,
}

impl ParsedTransaction {
    /// Signed amount, `credit - debit`, with absent sides counted as zero.
    pub fn amount(&self) -> f64 {
        self.credit.unwrap_or(0.0) - self.debit.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy)]
enum DescriptionSource {
    Column(usize),
    Fallback,
}

/// Mapping resolved to column indices once per extraction.
#[derive(Debug, Clone, Copy)]
struct ResolvedColumns {
    date: Option<usize>,
    credit: Option<usize>,
    debit: Option<usize>,
    description: DescriptionSource,
    category: Option<usize>,
}

impl ResolvedColumns {
    fn resolve(table: &Table, mapping: &ColumnMapping) -> Self {
        let index = |role| mapping.get(role).and_then(|c| table.index_of(c));
        let description = match index(ColumnRole::Description) {
            Some(idx) => DescriptionSource::Column(idx),
            None => table
                .columns()
                .iter()
                .position(|c| !mapping.is_claimed(c))
                .map_or(DescriptionSource::Fallback, DescriptionSource::Column),
        };
        Self {
            date: index(ColumnRole::Date),
            credit: index(ColumnRole::Credit),
            debit: index(ColumnRole::Debit),
            description,
            category: index(ColumnRole::Category),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Extractor {
    dates: DateParser,
    fallback_description: String,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(DateParser::default(), DEFAULT_FALLBACK_DESCRIPTION)
    }
}

impl Extractor {
    pub fn new(dates: DateParser, fallback_description: impl Into<String>) -> Self {
        Self {
            dates,
            fallback_description: fallback_description.into(),
        }
    }

    /// Lazily turn `table` rows into transactions using `mapping`.
    ///
    /// Fails only when `mapping` names a column the table does not have.
    /// Rows whose date does not parse are skipped; without a `Date` mapping
    /// every row is skipped.
    pub fn extract<'a>(
        &'a self,
        table: &'a Table,
        mapping: &ColumnMapping,
    ) -> Result<Transactions<'a>> {
        mapping.validate(table)?;
        let columns = ResolvedColumns::resolve(table, mapping);
        if columns.date.is_none() && table.row_count() > 0 {
            warn!(rows = table.row_count(), "no date column mapped, every row will be dropped");
        }
        Ok(Transactions {
            extractor: self,
            table,
            columns,
            row: 0,
        })
    }

    fn build(
        &self,
        table: &Table,
        columns: &ResolvedColumns,
        row: usize,
    ) -> Option<ParsedTransaction> {
        let date = columns
            .date
            .map(|idx| table.cell(row, idx))
            .and_then(Cell::as_text)
            .and_then(|raw| self.dates.parse(&raw))?;

        let amount = |col: Option<usize>| col.and_then(|idx| cell_amount(table.cell(row, idx)));
        let text = |idx: usize| table.cell(row, idx).as_text().map(|t| t.into_owned());

        let description = match columns.description {
            DescriptionSource::Column(idx) => text(idx).unwrap_or_default(),
            DescriptionSource::Fallback => self.fallback_description.clone(),
        };

        Some(ParsedTransaction {
            date,
            credit: amount(columns.credit),
            debit: amount(columns.debit),
            description,
            category: columns.category.and_then(text),
        })
    }
}

/// One-shot, in-order iterator over the transactions of a table.
pub struct Transactions<'a> {
    extractor: &'a Extractor,
    table: &'a Table,
    columns: ResolvedColumns,
    row: usize,
}

impl Iterator for Transactions<'_> {
    type Item = ParsedTransaction;

    fn next(&mut self) -> Option<Self::Item> {
        while self.row < self.table.row_count() {
            let row = self.row;
            self.row += 1;
            match self.extractor.build(self.table, &self.columns, row) {
                Some(txn) => return Some(txn),
                None => trace!(row, "row dropped, date did not parse"),
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.table.row_count() - self.row))
    }
}
