use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::classifier::{Classifier, ColumnMapping};
use crate::error::Result;
use crate::extractor::{Extractor, ParsedTransaction, Transactions};
use crate::settings::Settings;
use crate::table::{self, Table};

/// A loaded statement plus the classifier and extractor configured for it.
#[derive(Debug, Clone)]
pub struct Statement {
    table: Table,
    classifier: Classifier,
    extractor: Extractor,
}

impl Statement {
    pub fn open(path: &Path, settings: &Settings) -> Result<Self> {
        let table = table::load_path(path, &settings.load_options())?;
        Ok(Self::from_table(table, settings))
    }

    pub fn from_reader<R: Read>(reader: R, settings: &Settings) -> Result<Self> {
        let table = table::load_reader(reader, &settings.load_options())?;
        Ok(Self::from_table(table, settings))
    }

    pub fn from_table(table: Table, settings: &Settings) -> Self {
        Self {
            table,
            classifier: settings.classifier(),
            extractor: settings.extractor(),
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn detect(&self) -> ColumnMapping {
        self.classifier.classify(&self.table)
    }

    /// The supplied mapping when given, otherwise the inferred one.
    pub fn mapping(&self, supplied: Option<&ColumnMapping>) -> ColumnMapping {
        match supplied {
            Some(m) => {
                debug!(roles = m.len(), "using supplied column mapping");
                m.clone()
            }
            None => self.detect(),
        }
    }

    pub fn transactions(&self, mapping: &ColumnMapping) -> Result<Transactions<'_>> {
        self.extractor.extract(&self.table, mapping)
    }

    pub fn parse(&self, supplied: Option<&ColumnMapping>) -> Result<Vec<ParsedTransaction>> {
        let mapping = self.mapping(supplied);
        Ok(self.transactions(&mapping)?.collect())
    }
}

/// Load `path` with default settings and extract its transactions.
pub fn parse_path(path: &Path, mapping: Option<&ColumnMapping>) -> Result<Vec<ParsedTransaction>> {
    Statement::open(path, &Settings::default())?.parse(mapping)
}
