/// Tabular file export (.xlsx, or .csv by extension)
use std::path::{Path, PathBuf};
use rust_xlsxwriter::Workbook;
use tracing::info;

use crate::error::Result;
use crate::export::{format_timestamp, header, to_text_rows, Tabular};

const SHEET_NAME: &str = "volatility";

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| e.eq_ignore_ascii_case("csv"))
}

fn write_xlsx<T: Tabular>(rows: &[T], path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, name) in header::<T>().iter().enumerate() {
        worksheet.write_string(0, col as u16, name)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        worksheet.write_string(r, 0, format_timestamp(row.timestamp()))?;
        for (j, value) in row.values().iter().enumerate() {
            worksheet.write_number(r, (j + 1) as u16, *value)?;
        }
    }

    worksheet.set_freeze_panes(1, 0)?;
    workbook.save(path)?;
    Ok(())
}

fn write_csv<T: Tabular>(rows: &[T], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in to_text_rows(rows) {
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the full table (index + all columns) to `path`, replacing any
/// existing file, and return the path written.
pub fn save_table<T: Tabular>(rows: &[T], path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    if is_csv(path) {
        write_csv(rows, path)?;
    } else {
        write_xlsx(rows, path)?;
    }

    info!("💾 Saved {} rows to {}", rows.len(), path.display());
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use crate::types::{Bar, VolatilityRow};

    fn sample_rows(count: usize) -> Vec<VolatilityRow> {
        let start = Utc.with_ymd_and_hms(2025, 1, 15, 3, 50, 0).unwrap();
        (0..count)
            .map(|i| VolatilityRow {
                timestamp: start + Duration::minutes(i as i64),
                open: 76500.0 + i as f64,
                high: 76510.0 + i as f64,
                low: 76490.0 + i as f64,
                close: 76505.0 + i as f64,
                ret: 0.0001 * i as f64,
                vola: 0.2,
            })
            .collect()
    }

    #[test]
    fn test_save_xlsx() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sensex_volatility.xlsx");

        let written = save_table(&sample_rows(10), &path).unwrap();
        assert_eq!(written, path);
        assert!(std::fs::metadata(&path).unwrap().len() > 0);

        // overwrite in place
        save_table(&sample_rows(3), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_save_csv_round_trips_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("vola.csv");

        save_table(&sample_rows(4), &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), vec!["Datetime", "Open", "High", "Low", "Close", "ret", "vola"]);

        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 4);
        assert_eq!(&records[0][0], "2025-01-15 09:20:00+05:30");
    }

    #[test]
    fn test_save_empty_candles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.xlsx");
        assert!(save_table::<Bar>(&[], &path).is_ok());
    }
}
