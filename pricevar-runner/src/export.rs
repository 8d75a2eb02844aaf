//! Output files: raw CSV, variation spreadsheet, snapshot paths.
//!
//! Every file is replaced, never appended: an existing file is removed, the new
//! content is written to a sibling `.tmp` path, then renamed into place.

use chrono::Datelike;
use pricevar_core::data::write_series;
use pricevar_core::domain::{AugmentedSeries, PriceSeries, Ticker};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, XlsxError};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to remove existing {}: {source}", path.display())]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to encode CSV {}: {source}", path.display())]
    Csv { path: PathBuf, source: csv::Error },

    #[error("failed to build spreadsheet {}: {source}", path.display())]
    Xlsx { path: PathBuf, source: XlsxError },
}

impl ExportError {
    pub fn path(&self) -> &Path {
        match self {
            Self::Remove { path, .. }
            | Self::Io { path, .. }
            | Self::Csv { path, .. }
            | Self::Xlsx { path, .. } => path,
        }
    }
}

/// File names for one ticker inside the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    dir: PathBuf,
    ticker: String,
}

impl OutputPaths {
    pub fn new(dir: impl Into<PathBuf>, ticker: &Ticker) -> Self {
        Self {
            dir: dir.into(),
            ticker: ticker.as_str().to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn raw_csv(&self) -> PathBuf {
        self.dir.join(format!("{}_historical_data.csv", self.ticker))
    }

    pub fn variation_xlsx(&self) -> PathBuf {
        self.dir
            .join(format!("{}_historical_data_with_variation.xlsx", self.ticker))
    }

    pub fn histogram_snapshot(&self) -> PathBuf {
        self.dir
            .join(format!("{}_variation_histogram.txt", self.ticker))
    }

    pub fn fit_snapshot(&self) -> PathBuf {
        self.dir.join(format!("{}_variation_fit.txt", self.ticker))
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn remove_existing(path: &Path) -> Result<(), ExportError> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "removed previous output");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(ExportError::Remove {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn commit(tmp: &Path, path: &Path) -> Result<(), ExportError> {
    std::fs::rename(tmp, path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Replace `path` with whatever `write` produces.
///
/// The temporary file is removed again if `write` fails.
pub fn replace_file<F>(path: &Path, write: F) -> Result<(), ExportError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), ExportError>,
{
    remove_existing(path)?;
    let tmp = tmp_path(path);
    let io_err = |source| ExportError::Io {
        path: tmp.clone(),
        source,
    };

    let result = File::create(&tmp).map_err(io_err).and_then(|file| {
        let mut writer = BufWriter::new(file);
        write(&mut writer)?;
        writer.flush().map_err(io_err)
    });
    if let Err(e) = result {
        let _ = std::fs::remove_file(&tmp);
        return Err(e);
    }
    commit(&tmp, path)
}

/// Write the raw price history CSV.
pub fn write_price_csv(series: &PriceSeries, path: &Path) -> Result<(), ExportError> {
    replace_file(path, |writer| {
        write_series(series, writer).map_err(|source| ExportError::Csv {
            path: path.to_path_buf(),
            source,
        })
    })?;
    tracing::info!(
        ticker = %series.ticker(),
        rows = series.len(),
        path = %path.display(),
        "wrote price history"
    );
    Ok(())
}

const XLSX_HEADERS: [&str; 9] = [
    "Date",
    "Open",
    "High",
    "Low",
    "Close",
    "Volume",
    "Dividends",
    "Stock Splits",
    "Percentage_Daily_Variation",
];

fn build_workbook(series: &AugmentedSeries) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    let sheet = workbook.add_worksheet();
    sheet.set_name("Sheet1")?;
    for (col, name) in XLSX_HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, &header)?;
    }
    sheet.set_column_width(0, 12)?;
    sheet.set_column_width(8, 28)?;

    for (i, record) in series.records().iter().enumerate() {
        let row = (i + 1) as u32;
        let date = ExcelDateTime::from_ymd(
            record.date.year() as u16,
            record.date.month() as u8,
            record.date.day() as u8,
        )?;
        sheet.write_datetime_with_format(row, 0, &date, &date_format)?;

        let prices = [record.open, record.high, record.low, record.close];
        for (offset, value) in prices.into_iter().enumerate() {
            if value.is_finite() {
                sheet.write_number(row, 1 + offset as u16, value)?;
            }
        }
        sheet.write_number(row, 5, record.volume as f64)?;
        sheet.write_number(row, 6, record.dividends)?;
        sheet.write_number(row, 7, record.stock_splits)?;
        if let Some(v) = record.percentage_daily_variation {
            sheet.write_number(row, 8, v)?;
        }
    }

    Ok(workbook)
}

/// Write the augmented series as a single-sheet workbook.
///
/// Missing prices and variations are left as blank cells.
pub fn write_variation_xlsx(series: &AugmentedSeries, path: &Path) -> Result<(), ExportError> {
    let xlsx_err = |source| ExportError::Xlsx {
        path: path.to_path_buf(),
        source,
    };
    let mut workbook = build_workbook(series).map_err(xlsx_err)?;
    let bytes = workbook.save_to_buffer().map_err(xlsx_err)?;

    replace_file(path, |writer| {
        writer.write_all(&bytes).map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })
    })?;
    tracing::info!(
        ticker = %series.ticker(),
        rows = series.len(),
        path = %path.display(),
        "wrote variation spreadsheet"
    );
    Ok(())
}

/// Write a rendered chart snapshot.
pub fn write_snapshot(text: &str, path: &Path) -> Result<(), ExportError> {
    replace_file(path, |writer| {
        writer
            .write_all(text.as_bytes())
            .map_err(|source| ExportError::Io {
                path: path.to_path_buf(),
                source,
            })
    })
}
