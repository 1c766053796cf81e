//! Delimited table I/O.
//!
//! Reads a header-first delimited file into a [`RowSet`] and writes a
//! [`RowSet`] back out with overwrite semantics. Empty cells are read as
//! nulls and nulls are written as empty cells.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::Result;
use crate::record::{Record, RowSet};

/// Read a delimited file with a header row.
///
/// Short rows get nulls for their missing trailing cells. Fields beyond the
/// header are dropped with a warning.
pub fn read_table(path: impl AsRef<Path>, delimiter: u8) -> Result<RowSet> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let columns = unique_headers(reader.headers()?.iter());
    let mut rows = RowSet::new(columns);

    for result in reader.records() {
        let raw = result?;
        if raw.len() > rows.columns.len() {
            warn!(
                path = %path.display(),
                line = raw.position().map(|p| p.line()),
                fields = raw.len(),
                columns = rows.columns.len(),
                "row has more fields than the header, extra fields dropped"
            );
        }
        let mut record = Record::new();
        for (i, column) in rows.columns.iter().enumerate() {
            let value = raw.get(i).filter(|v| !v.is_empty()).map(str::to_string);
            record.set(column.clone(), value);
        }
        rows.push(record);
    }

    debug!(path = %path.display(), rows = rows.len(), columns = rows.columns.len(), "read table");
    Ok(rows)
}

/// Write a row set to `path`, replacing any existing file.
///
/// The header row is always written, even for an empty row set.
pub fn write_table(path: impl AsRef<Path>, rows: &RowSet, delimiter: u8) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)?;

    writer.write_record(&rows.columns)?;
    for record in rows {
        writer.write_record(rows.columns.iter().map(|c| record.text(c)))?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = rows.len(), "wrote table");
    Ok(())
}

/// Make header names unique: a repeated `Name` becomes `Name.1`, `Name.2`, ...
fn unique_headers<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::new();
    for h in headers {
        let base = h.to_string();
        match seen.get_mut(&base) {
            Some(n) => {
                *n += 1;
                out.push(format!("{}.{}", base, n));
            }
            None => {
                seen.insert(base.clone(), 0);
                out.push(base);
            }
        }
    }
    out
}
