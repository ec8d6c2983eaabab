//! Schema-inferring bank statement importer.
//!
//! A statement CSV is loaded into a column-oriented [`Table`], its columns are
//! assigned roles by the [`Classifier`], and the [`Extractor`] turns each row
//! into a [`ParsedTransaction`]. Nothing is persisted.

pub mod amounts;
pub mod classifier;
pub mod dates;
pub mod error;
pub mod extractor;
pub mod fmt;
pub mod settings;
pub mod statement;
pub mod summary;
pub mod table;

pub use classifier::{Classifier, ColumnMapping, ColumnRole, HeaderKeywords};
pub use dates::DateParser;
pub use error::{LoadError, Result, TallyError};
pub use extractor::{Extractor, ParsedTransaction, Transactions};
pub use settings::Settings;
pub use statement::{parse_path, Statement};
pub use summary::ImportSummary;
pub use table::{Cell, LoadOptions, Table};
