use chrono::NaiveDateTime;
use serde::Serialize;

use crate::extractor::ParsedTransaction;

/// Input-versus-output accounting for one extraction run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportSummary {
    pub rows_read: usize,
    pub emitted: usize,
    pub dropped: usize,
    pub total_credit: f64,
    pub total_debit: f64,
    /// Sum of every record's derived amount: the balance change a ledger would apply.
    pub net_amount: f64,
    pub first_date: Option<NaiveDateTime>,
    pub last_date: Option<NaiveDateTime>,
}

impl ImportSummary {
    pub fn from_transactions(rows_read: usize, txns: &[ParsedTransaction]) -> Self {
        let total_credit: f64 = txns.iter().filter_map(|t| t.credit).sum();
        let total_debit: f64 = txns.iter().filter_map(|t| t.debit).sum();
        Self {
            rows_read,
            emitted: txns.len(),
            dropped: rows_read.saturating_sub(txns.len()),
            total_credit,
            total_debit,
            net_amount: txns.iter().map(ParsedTransaction::amount).sum(),
            first_date: txns.iter().map(|t| t.date).min(),
            last_date: txns.iter().map(|t| t.date).max(),
        }
    }
}
