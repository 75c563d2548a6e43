use crate::ingest::store_batch;
use crate::Result;
use std::io::BufRead;
use triplot_columnar::{Cell, Repository};

#[derive(Clone, Copy, Debug)]
pub struct CsvReaderOptions {
    pub delimiter: u8,
    /// Rows per ingestion batch; keeps memory bounded for large files.
    pub batch_rows: usize,
}

impl Default for CsvReaderOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            batch_rows: 1000,
        }
    }
}

/// Stream a CSV source into the RAW table without materializing a full grid.
///
/// Rows are parsed into cells (numeric-looking fields become numbers, empty
/// fields nulls, everything else text) and handed to
/// [`store_batch`](crate::store_batch) in `batch_rows` chunks; the first row
/// of the first chunk supplies the column headers.
pub fn ingest_csv<R: BufRead>(
    repo: &mut Repository,
    reader: R,
    options: CsvReaderOptions,
) -> Result<()> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        // Headers are handled by `store_batch`, not the csv crate.
        .has_headers(false)
        // Accept rows with varying column counts; width checking happens at
        // ingestion where it can name the expected schema.
        .flexible(true)
        .from_reader(reader);

    let batch_rows = options.batch_rows.max(1);
    let mut record = csv::StringRecord::new();
    let mut batch: Vec<Vec<Cell>> = Vec::with_capacity(batch_rows.min(1024));

    while csv_reader.read_record(&mut record)? {
        batch.push(record.iter().map(parse_field).collect());
        if batch.len() == batch_rows {
            store_batch(repo, &batch)?;
            batch.clear();
        }
    }
    if !batch.is_empty() {
        store_batch(repo, &batch)?;
    }
    Ok(())
}

fn parse_field(field: &str) -> Cell {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return Cell::Null;
    }
    match trimmed.parse::<f64>() {
        // `"nan"` and `"inf"` parse successfully but are not data values;
        // keep them as text so they coerce like any other non-numeric field.
        Ok(v) if v.is_finite() => Cell::Number(v),
        _ => Cell::Text(field.to_owned()),
    }
}
