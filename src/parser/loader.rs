use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::{debug, info};

use super::record::{parse_record, ColumnIndex, Transaction};
use crate::error::Result;

/// Load the joined transaction export from a CSV file
pub fn load_transactions(path: &Path) -> Result<Vec<Transaction>> {
    let file = File::open(path)?;
    let rows = read_transactions(BufReader::new(file))?;
    info!(path = %path.display(), rows = rows.len(), "Loaded transactions");
    Ok(rows)
}

/// Read transactions from any CSV source.
///
/// The header is validated before the first data row is parsed, and the
/// result is stably sorted by purchase timestamp.
pub fn read_transactions<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = ColumnIndex::from_headers(reader.headers()?)?;
    debug!(?columns, "Resolved input columns");

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        // header is line 1
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(idx as u64 + 2);
        rows.push(parse_record(&record, &columns, line)?);
    }

    rows.sort_by_key(|row| row.purchased_at);
    Ok(rows)
}
