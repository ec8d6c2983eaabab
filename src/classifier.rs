//! Column role inference.
//!
//! Every step is a pure function from the previous mapping to the next one, run
//! in a fixed order over the table's columns (left to right):
//!
//! 1. `Date`: the first column whose first present value parses as a date.
//! 2. `Credit`/`Debit` by header keyword, with the adjacency fallback for
//!    header columns that carry no values.
//! 3. `Credit`/`Debit` by position among the remaining numeric columns.
//! 4. `Description`: the unclaimed text column with the longest mean value.
//!
//! `Category` and `Amount` are never inferred.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::amounts::is_numeric_column;
use crate::dates::DateParser;
use crate::error::{Result, TallyError};
use crate::table::{Cell, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnRole {
    Date,
    Credit,
    Debit,
    Amount,
    Description,
    Category,
}

impl ColumnRole {
    pub const ALL: [ColumnRole; 6] = [
        ColumnRole::Date,
        ColumnRole::Credit,
        ColumnRole::Debit,
        ColumnRole::Amount,
        ColumnRole::Description,
        ColumnRole::Category,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Credit => "credit",
            Self::Debit => "debit",
            Self::Amount => "amount",
            Self::Description => "description",
            Self::Category => "category",
        }
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ColumnRole {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .find(|r| r.key() == needle)
            .copied()
            .ok_or_else(|| TallyError::UnknownRole(s.to_string()))
    }
}

/// Role → column name. Partial mappings are valid; each role maps to at most one column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMapping(BTreeMap<ColumnRole, String>);

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the mapping with `role` pointing at `column`.
    pub fn with(mut self, role: ColumnRole, column: impl Into<String>) -> Self {
        self.0.insert(role, column.into());
        self
    }

    pub fn get(&self, role: ColumnRole) -> Option<&str> {
        self.0.get(&role).map(String::as_str)
    }

    pub fn contains(&self, role: ColumnRole) -> bool {
        self.0.contains_key(&role)
    }

    /// Whether any role already points at `column`.
    pub fn is_claimed(&self, column: &str) -> bool {
        self.0.values().any(|c| c == column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ColumnRole, &str)> {
        self.0.iter().map(|(r, c)| (*r, c.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries of `overrides` replace entries of `self` role by role. A column
    /// given a new role is released from any role it held before.
    pub fn merged(self, overrides: &ColumnMapping) -> Self {
        overrides.iter().fold(self, |mut m, (role, column)| {
            m.0.retain(|r, c| *r == role || *c != column);
            m.with(role, column)
        })
    }

    /// Build a mapping from `role=column` pairs, e.g. `credit=Paid In`.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        pairs.into_iter().try_fold(Self::new(), |m, pair| {
            let pair = pair.as_ref();
            let (role, column) = pair
                .split_once('=')
                .ok_or_else(|| TallyError::UnknownRole(pair.to_string()))?;
            Ok(m.with(role.parse()?, column.trim()))
        })
    }

    /// Every mapped column must exist in `table`.
    pub fn validate(&self, table: &Table) -> Result<()> {
        match self.iter().find(|(_, c)| table.index_of(c).is_none()) {
            Some((role, column)) => Err(TallyError::UnknownColumn {
                role,
                column: column.to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// Case-insensitive header substrings that name the credit and debit columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderKeywords {
    pub credit: Vec<String>,
    pub debit: Vec<String>,
}

impl Default for HeaderKeywords {
    fn default() -> Self {
        Self {
            credit: vec!["credit".to_string(), "deposit".to_string()],
            debit: vec!["debit".to_string(), "withdrawal".to_string()],
        }
    }
}

impl HeaderKeywords {
    /// Credit keywords are checked first, so `Debit/Credit` reads as credit.
    pub fn role_for(&self, header: &str) -> Option<ColumnRole> {
        let header = header.to_lowercase();
        let hit = |words: &[String]| words.iter().any(|w| header.contains(&w.to_lowercase()));
        if hit(self.credit.as_slice()) {
            Some(ColumnRole::Credit)
        } else if hit(self.debit.as_slice()) {
            Some(ColumnRole::Debit)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Classifier {
    keywords: HeaderKeywords,
    dates: DateParser,
}

impl Classifier {
    pub fn new(keywords: HeaderKeywords, dates: DateParser) -> Self {
        Self { keywords, dates }
    }

    pub fn date_parser(&self) -> &DateParser {
        &self.dates
    }

    /// Infer a (possibly partial) role mapping for `table`. Deterministic.
    pub fn classify(&self, table: &Table) -> ColumnMapping {
        let numeric: Vec<bool> = (0..table.column_count())
            .map(|idx| is_numeric_column(table.column(idx)))
            .collect();

        let mapping = self.detect_date(table, ColumnMapping::new());
        let mapping = self.detect_by_header(table, &numeric, mapping);
        let mapping = detect_by_position(table, &numeric, mapping);
        detect_description(table, mapping)
    }

    /// Leftmost column whose first present value parses as a date. Later rows
    /// are not consulted, so an earlier date-shaped ID column wins.
    fn detect_date(&self, table: &Table, mapping: ColumnMapping) -> ColumnMapping {
        let found = table.columns().iter().enumerate().find(|(idx, _)| {
            table
                .first_value(*idx)
                .and_then(Cell::as_text)
                .and_then(|v| self.dates.parse(&v))
                .is_some()
        });
        match found {
            Some((_, name)) => {
                debug!(column = %name, "date column");
                mapping.with(ColumnRole::Date, name.as_str())
            }
            None => {
                debug!("no date column found");
                mapping
            }
        }
    }

    /// Each unclaimed numeric column whose header names a role claims it, so a
    /// later match replaces an earlier one and the earlier column is released.
    /// A claimed column with no values hands the role to the next unclaimed
    /// numeric column to its right, if there is one. Columns whose own header
    /// names the other role are passed over by that search.
    fn detect_by_header(
        &self,
        table: &Table,
        numeric: &[bool],
        mapping: ColumnMapping,
    ) -> ColumnMapping {
        let columns = table.columns();
        columns.iter().enumerate().fold(mapping, |m, (idx, name)| {
            if !numeric[idx] || m.is_claimed(name) {
                return m;
            }
            let Some(role) = self.keywords.role_for(name) else {
                return m;
            };
            if let Some(previous) = m.get(role) {
                debug!(column = %name, released = %previous, %role, "later header takes role");
            }
            let target = if table.is_empty_column(idx) {
                match self.adjacent_column(columns, numeric, &m, role, idx + 1) {
                    Some(next) => {
                        debug!(
                            column = %name,
                            moved_to = %columns[next],
                            %role,
                            "empty header column, using adjacent column"
                        );
                        next
                    }
                    None => idx,
                }
            } else {
                idx
            };
            debug!(column = %columns[target], %role, "header keyword match");
            m.with(role, columns[target].as_str())
        })
    }

    fn adjacent_column(
        &self,
        columns: &[String],
        numeric: &[bool],
        mapping: &ColumnMapping,
        role: ColumnRole,
        start: usize,
    ) -> Option<usize> {
        (start..columns.len()).find(|&idx| {
            let name = &columns[idx];
            numeric[idx]
                && !mapping.is_claimed(name)
                && self.keywords.role_for(name).map_or(true, |r| r == role)
        })
    }
}

/// Unclaimed numeric columns in order: the first fills a missing `Credit`, the
/// second a missing `Debit`. Nothing further is tried.
fn detect_by_position(table: &Table, numeric: &[bool], mapping: ColumnMapping) -> ColumnMapping {
    if mapping.contains(ColumnRole::Credit) && mapping.contains(ColumnRole::Debit) {
        return mapping;
    }
    let candidates: Vec<&str> = table
        .columns()
        .iter()
        .enumerate()
        .filter(|(idx, name)| numeric[*idx] && !mapping.is_claimed(name))
        .map(|(_, name)| name.as_str())
        .collect();

    let mut mapping = mapping;
    if !mapping.contains(ColumnRole::Credit) {
        if let Some(col) = candidates.first() {
            debug!(column = %col, "credit column by position");
            mapping = mapping.with(ColumnRole::Credit, *col);
        }
    }
    if !mapping.contains(ColumnRole::Debit) {
        match candidates.get(1) {
            Some(col) => {
                debug!(column = %col, "debit column by position");
                mapping = mapping.with(ColumnRole::Debit, *col);
            }
            None => debug!("no second numeric column, debit left unmapped"),
        }
    }
    mapping
}

/// Mean character length of the present values of a text column.
fn mean_text_len(cells: &[Cell]) -> Option<f64> {
    let lengths: Vec<usize> = cells
        .iter()
        .filter_map(|c| match c {
            Cell::Text(s) => Some(s.chars().count()),
            _ => None,
        })
        .collect();
    if lengths.is_empty() {
        return None;
    }
    Some(lengths.iter().sum::<usize>() as f64 / lengths.len() as f64)
}

/// Longest unclaimed text column by mean length; ties go to the leftmost.
fn detect_description(table: &Table, mapping: ColumnMapping) -> ColumnMapping {
    let best = table
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, name)| !mapping.is_claimed(name))
        .filter_map(|(idx, name)| mean_text_len(table.column(idx)).map(|len| (name, len)))
        .fold(None::<(&String, f64)>, |best, (name, len)| match best {
            Some((_, top)) if top >= len => best,
            _ => Some((name, len)),
        });
    match best {
        Some((name, len)) => {
            debug!(column = %name, mean_len = len, "description column");
            mapping.with(ColumnRole::Description, name.as_str())
        }
        None => mapping,
    }
}
