use std::borrow::Cow;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use crate::error::LoadError;

/// Markers treated as an absent value, matched against the trimmed field.
pub const DEFAULT_MISSING_MARKERS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "#N/A", "<NA>",
];

/// A single raw value, typed once at load time.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Missing,
}

impl Cell {
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Text rendering of the cell. Integral numbers drop the fractional part.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Cell::Text(s) => Some(Cow::Borrowed(s.as_str())),
            Cell::Number(n) => Some(Cow::Owned(format_number(*n))),
            Cell::Missing => None,
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub delimiter: u8,
    pub missing_markers: Vec<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            missing_markers: DEFAULT_MISSING_MARKERS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl LoadOptions {
    fn is_missing(&self, raw: &str) -> bool {
        let trimmed = raw.trim();
        trimmed.is_empty() || self.missing_markers.iter().any(|m| m == trimmed)
    }
}

/// Column-oriented, immutable view of a statement file.
///
/// Every column holds exactly `row_count()` cells; row order is the file order.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    cells: Vec<Vec<Cell>>,
    rows: usize,
}

impl Table {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column(&self, idx: usize) -> &[Cell] {
        &self.cells[idx]
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        &self.cells[col][row]
    }

    /// True when the column was typed as numeric at load time (all-missing included).
    pub fn is_number_column(&self, idx: usize) -> bool {
        self.cells[idx]
            .iter()
            .all(|c| matches!(c, Cell::Number(_) | Cell::Missing))
    }

    pub fn is_empty_column(&self, idx: usize) -> bool {
        self.cells[idx].iter().all(Cell::is_missing)
    }

    /// First non-missing cell of the column, if any.
    pub fn first_value(&self, idx: usize) -> Option<&Cell> {
        self.cells[idx].iter().find(|c| !c.is_missing())
    }
}

pub fn load_path(path: &Path, opts: &LoadOptions) -> Result<Table, LoadError> {
    let file = std::fs::File::open(path)?;
    let table = load_reader(std::io::BufReader::new(file), opts)?;
    info!(
        path = %path.display(),
        columns = table.column_count(),
        rows = table.row_count(),
        "loaded statement"
    );
    Ok(table)
}

pub fn load_str(content: &str, opts: &LoadOptions) -> Result<Table, LoadError> {
    load_reader(content.as_bytes(), opts)
}

pub fn load_reader<R: Read>(reader: R, opts: &LoadOptions) -> Result<Table, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(opts.delimiter)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Err(LoadError::NoColumns);
    }
    let columns = disambiguate_headers(&headers);
    let width = columns.len();

    let mut raw: Vec<Vec<Option<String>>> = vec![Vec::new(); width];
    let mut rows = 0usize;
    for result in rdr.records() {
        let record = result?;
        if record.len() > width && record.iter().skip(width).any(|f| !f.trim().is_empty()) {
            return Err(LoadError::RaggedRow {
                line: record.position().map(|p| p.line()).unwrap_or(0),
                expected: width,
                found: record.len(),
            });
        }
        for (idx, column) in raw.iter_mut().enumerate() {
            let value = record
                .get(idx)
                .filter(|f| !opts.is_missing(f))
                .map(|f| f.to_string());
            column.push(value);
        }
        rows += 1;
    }

    let cells = raw.into_iter().map(type_column).collect();
    Ok(Table {
        columns,
        cells,
        rows,
    })
}

/// Empty headers become `Unnamed: <idx>`; repeats get `.1`, `.2`, ... suffixes.
fn disambiguate_headers(headers: &csv::StringRecord) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(headers.len());
    for (idx, raw) in headers.iter().enumerate() {
        let base = match raw.trim() {
            "" => format!("Unnamed: {idx}"),
            name => name.to_string(),
        };
        let mut name = base.clone();
        let mut n = 0;
        while seen.contains(&name) {
            n += 1;
            name = format!("{base}.{n}");
        }
        if n > 0 {
            debug!(header = %base, renamed = %name, "duplicate header renamed");
        }
        seen.insert(name.clone());
        out.push(name);
    }
    out
}

fn parse_plain_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if !s.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn type_column(values: Vec<Option<String>>) -> Vec<Cell> {
    let numeric = values
        .iter()
        .flatten()
        .all(|v| parse_plain_number(v).is_some());
    values
        .into_iter()
        .map(|v| match v {
            None => Cell::Missing,
            Some(s) if numeric => parse_plain_number(&s).map_or(Cell::Missing, Cell::Number),
            Some(s) => Cell::Text(s),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(content: &str) -> Table {
        load_str(content, &LoadOptions::default()).unwrap()
    }

    #[test]
    fn test_load_preserves_headers_and_row_order() {
        let t = load("Date,Description,Amount\n2024-01-05,Coffee,4.50\n2024-01-06,Rent,1200\n");
        assert_eq!(t.columns(), ["Date", "Description", "Amount"]);
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.cell(0, 1), &Cell::Text("Coffee".to_string()));
        assert_eq!(t.cell(1, 1), &Cell::Text("Rent".to_string()));
    }

    #[test]
    fn test_numeric_columns_typed_at_load() {
        let t = load("Date,Amount,Memo\n2024-01-05,4.50,a\n2024-01-06,,b\n");
        assert_eq!(t.cell(0, 1), &Cell::Number(4.5));
        assert_eq!(t.cell(1, 1), &Cell::Missing);
        assert!(t.is_number_column(1));
        assert!(!t.is_number_column(2));
    }

    #[test]
    fn test_currency_text_stays_text() {
        let t = load("Amount\n$1.00\n2.00\n");
        assert_eq!(t.cell(0, 0), &Cell::Text("$1.00".to_string()));
        assert_eq!(t.cell(1, 0), &Cell::Text("2.00".to_string()));
        assert!(!t.is_number_column(0));
    }

    #[test]
    fn test_missing_markers() {
        let t = load("Date,Memo\nN/A,x\n  ,NULL\n");
        assert!(t.cell(0, 0).is_missing());
        assert!(t.cell(1, 0).is_missing());
        assert!(t.cell(1, 1).is_missing());
        assert_eq!(t.first_value(1), Some(&Cell::Text("x".to_string())));
    }

    #[test]
    fn test_all_missing_column_counts_as_numeric() {
        let t = load("Deposit,Memo\n,a\n,b\n");
        assert!(t.is_empty_column(0));
        assert!(t.is_number_column(0));
        assert_eq!(t.first_value(0), None);
    }

    #[test]
    fn test_duplicate_and_empty_headers() {
        let t = load("Amount,Amount,,Amount.1,Amount\n1,2,3,4,5\n");
        assert_eq!(
            t.columns(),
            ["Amount", "Amount.1", "Unnamed: 2", "Amount.1.1", "Amount.2"]
        );
    }

    #[test]
    fn test_short_rows_are_padded() {
        let t = load("a,b,c\n1,x\n");
        assert_eq!(t.row_count(), 1);
        assert!(t.cell(0, 2).is_missing());
    }

    #[test]
    fn test_trailing_empty_fields_tolerated() {
        let t = load("a,b\n1,x,,\n");
        assert_eq!(t.row_count(), 1);
        assert_eq!(t.column_count(), 2);
    }

    #[test]
    fn test_extra_fields_rejected() {
        let err = load_str("a,b\n1,2,3\n", &LoadOptions::default()).unwrap_err();
        match err {
            LoadError::RaggedRow { line, expected, found } => {
                assert_eq!(line, 2);
                assert_eq!(expected, 2);
                assert_eq!(found, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_input_has_no_columns() {
        let err = load_str("", &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::NoColumns));
    }

    #[test]
    fn test_header_only_is_empty_table() {
        let t = load("Date,Amount\n");
        assert_eq!(t.column_count(), 2);
        assert_eq!(t.row_count(), 0);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_path(&dir.path().join("nope.csv"), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }

    #[test]
    fn test_load_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stmt.csv");
        std::fs::write(&path, "Date,Memo\n01/15/2025,PAYMENT\n").unwrap();
        let t = load_path(&path, &LoadOptions::default()).unwrap();
        assert_eq!(t.row_count(), 1);
    }

    #[test]
    fn test_semicolon_delimiter() {
        let opts = LoadOptions {
            delimiter: b';',
            ..LoadOptions::default()
        };
        let t = load_str("Date;Amount\n2024-01-05;1,5\n", &opts).unwrap();
        assert_eq!(t.cell(0, 1), &Cell::Text("1,5".to_string()));
    }

    #[test]
    fn test_as_text_renders_integral_numbers() {
        assert_eq!(Cell::Number(20240105.0).as_text().unwrap(), "20240105");
        assert_eq!(Cell::Number(4.5).as_text().unwrap(), "4.5");
        assert_eq!(Cell::Missing.as_text(), None);
    }
}
