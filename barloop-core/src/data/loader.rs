//! CSV ingest: one `SYMBOL.csv` file per symbol.
//!
//! Expected columns: `datetime,open,high,low,close,adj_close,volume` with an
//! ISO date in `datetime`. Rows may arrive unsorted; alignment sorts them.

use crate::data::DataError;
use crate::domain::Bar;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct CsvRow {
    datetime: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    adj_close: f64,
    volume: u64,
}

/// Load `{dir}/{symbol}.csv` for every requested symbol.
///
/// A missing file or unparseable row is a configuration error and aborts the
/// run before simulation starts.
pub fn load_csv_dir(dir: &Path, symbols: &[String]) -> Result<HashMap<String, Vec<Bar>>, DataError> {
    let mut out = HashMap::with_capacity(symbols.len());
    for symbol in symbols {
        let path = dir.join(format!("{symbol}.csv"));
        let bars = load_csv_file(&path, symbol)?;
        if bars.is_empty() {
            return Err(DataError::EmptySeries {
                symbol: symbol.clone(),
            });
        }
        out.insert(symbol.clone(), bars);
    }
    Ok(out)
}

fn load_csv_file(path: &Path, symbol: &str) -> Result<Vec<Bar>, DataError> {
    let display = path.display().to_string();
    let mut reader = csv::Reader::from_path(path).map_err(|source| DataError::Csv {
        path: display.clone(),
        source,
    })?;

    let mut bars = Vec::new();
    for row in reader.deserialize() {
        let row: CsvRow = row.map_err(|source| DataError::Csv {
            path: display.clone(),
            source,
        })?;
        bars.push(Bar {
            symbol: symbol.to_string(),
            datetime: row.datetime,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            adj_close: row.adj_close,
            volume: row.volume,
            returns: 0.0,
        });
    }
    Ok(bars)
}
