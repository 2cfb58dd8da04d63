//! CSV ingestion for price files and the news table.
//!
//! Rows that fail to parse are skipped and counted in an [`IngestReport`];
//! only structural problems (unreadable file, missing required column) are
//! errors.

use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::{NewsItem, PriceBar};

const PRICE_COLUMNS: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];
const NEWS_COLUMNS: [&str; 4] = ["headline", "publisher", "date", "stock"];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%:z", "%Y-%m-%d %H:%M:%S%z"];
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in '{source_name}': {source}")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },

    #[error("'{source_name}' is missing required column '{column}'")]
    MissingColumn {
        source_name: String,
        column: &'static str,
    },

    #[error("'{0}' is not a directory")]
    NotADirectory(PathBuf),
}

/// Why a row was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// The CSV record itself could not be read.
    Malformed,
    BadDate,
    BadNumber,
    NonFinite,
    Negative,
}

/// Row accounting for one or more ingested sources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestReport {
    pub files: usize,
    pub rows_read: usize,
    pub rows_kept: usize,
    pub dropped: BTreeMap<DropReason, usize>,
}

impl IngestReport {
    pub fn rows_dropped(&self) -> usize {
        self.dropped.values().sum()
    }

    pub fn merge(&mut self, other: &IngestReport) {
        self.files += other.files;
        self.rows_read += other.rows_read;
        self.rows_kept += other.rows_kept;
        for (reason, n) in &other.dropped {
            *self.dropped.entry(*reason).or_default() += n;
        }
    }

    fn drop_row(&mut self, reason: DropReason) {
        *self.dropped.entry(reason).or_default() += 1;
    }
}

/// Parse a timestamp in any accepted format. Offset timestamps keep their
/// wall-clock local time; plain dates map to midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.naive_local());
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Calendar date of a price-file date cell.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    parse_timestamp(raw).map(|t| t.date())
}

fn header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header(name), idx))
        .collect()
}

fn normalize_header(name: &str) -> String {
    name.trim().trim_start_matches('\u{feff}').to_lowercase()
}

fn require_columns<const N: usize>(
    map: &HashMap<String, usize>,
    columns: [&'static str; N],
    source_name: &str,
) -> Result<[usize; N], IngestError> {
    let mut out = [0; N];
    for (slot, column) in out.iter_mut().zip(columns) {
        *slot = *map.get(column).ok_or_else(|| IngestError::MissingColumn {
            source_name: source_name.to_string(),
            column,
        })?;
    }
    Ok(out)
}

fn reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input)
}

fn parse_price(raw: &str) -> Result<f64, DropReason> {
    let v: f64 = raw.trim().parse().map_err(|_| DropReason::BadNumber)?;
    if !v.is_finite() {
        return Err(DropReason::NonFinite);
    }
    if v < 0.0 {
        return Err(DropReason::Negative);
    }
    Ok(v)
}

fn price_row(ticker: &str, record: &StringRecord, idx: &[usize; 6]) -> Result<PriceBar, DropReason> {
    let field = |i: usize| record.get(idx[i]).unwrap_or("");
    let date = parse_date(field(0)).ok_or(DropReason::BadDate)?;
    let open = parse_price(field(1))?;
    let high = parse_price(field(2))?;
    let low = parse_price(field(3))?;
    let close = parse_price(field(4))?;
    // Volume may be written as a float; the fraction is truncated.
    let volume = parse_price(field(5))? as u64;
    Ok(PriceBar {
        ticker: ticker.to_string(),
        date,
        open,
        high,
        low,
        close,
        volume,
    })
}

/// Read one ticker's price CSV from any reader.
pub fn read_prices<R: Read>(
    ticker: &str,
    input: R,
    source_name: &str,
) -> Result<(Vec<PriceBar>, IngestReport), IngestError> {
    let mut rdr = reader(input);
    let headers = rdr
        .headers()
        .map_err(|source| IngestError::Csv {
            source_name: source_name.to_string(),
            source,
        })?
        .clone();
    let idx = require_columns(&header_map(&headers), PRICE_COLUMNS, source_name)?;

    let mut report = IngestReport {
        files: 1,
        ..Default::default()
    };
    let mut bars = Vec::new();
    for record in rdr.records() {
        report.rows_read += 1;
        let parsed = record
            .map_err(|_| DropReason::Malformed)
            .and_then(|r| price_row(ticker, &r, &idx));
        match parsed {
            Ok(bar) => bars.push(bar),
            Err(reason) => report.drop_row(reason),
        }
    }
    report.rows_kept = bars.len();
    if report.rows_dropped() > 0 {
        debug!(ticker, source = source_name, dropped = report.rows_dropped(), "skipped price rows");
    }
    Ok((bars, report))
}

/// Ticker symbol for a price file: the upper-cased file stem.
pub fn ticker_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
}

/// Load a single `<TICKER>.csv` price file.
pub fn load_price_file(path: &Path) -> Result<(Vec<PriceBar>, IngestReport), IngestError> {
    let ticker = ticker_from_path(path).ok_or_else(|| IngestError::Io {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "no file stem"),
    })?;
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_prices(&ticker, file, &path.display().to_string())
}

/// Load every `*.csv` file in `dir` (sorted by file name) as price data.
pub fn load_price_dir(dir: &Path) -> Result<(Vec<PriceBar>, IngestReport), IngestError> {
    if !dir.is_dir() {
        return Err(IngestError::NotADirectory(dir.to_path_buf()));
    }
    let io_err = |source| IngestError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        if path.is_file() && is_csv {
            paths.push(path);
        }
    }
    paths.sort();

    let mut bars = Vec::new();
    let mut report = IngestReport::default();
    for path in &paths {
        let (file_bars, file_report) = load_price_file(path)?;
        report.merge(&file_report);
        bars.extend(file_bars);
    }
    info!(
        dir = %dir.display(),
        files = report.files,
        rows = report.rows_kept,
        dropped = report.rows_dropped(),
        "loaded price files"
    );
    Ok((bars, report))
}

fn news_row(record: &StringRecord, idx: &[usize; 4]) -> Result<NewsItem, DropReason> {
    let field = |i: usize| record.get(idx[i]).unwrap_or("");
    let date = parse_timestamp(field(2)).ok_or(DropReason::BadDate)?;
    Ok(NewsItem {
        headline: field(0).to_string(),
        publisher: field(1).to_string(),
        stock: field(3).trim().to_uppercase(),
        date,
    })
}

/// Read the news table from any reader.
pub fn read_news<R: Read>(
    input: R,
    source_name: &str,
) -> Result<(Vec<NewsItem>, IngestReport), IngestError> {
    let mut rdr = reader(input);
    let headers = rdr
        .headers()
        .map_err(|source| IngestError::Csv {
            source_name: source_name.to_string(),
            source,
        })?
        .clone();
    let idx = require_columns(&header_map(&headers), NEWS_COLUMNS, source_name)?;

    let mut report = IngestReport {
        files: 1,
        ..Default::default()
    };
    let mut items = Vec::new();
    for record in rdr.records() {
        report.rows_read += 1;
        let parsed = record
            .map_err(|_| DropReason::Malformed)
            .and_then(|r| news_row(&r, &idx));
        match parsed {
            Ok(item) => items.push(item),
            Err(reason) => report.drop_row(reason),
        }
    }
    report.rows_kept = items.len();
    if report.rows_dropped() > 0 {
        warn!(source = source_name, dropped = report.rows_dropped(), "skipped news rows");
    }
    Ok((items, report))
}

/// Load the news CSV at `path`.
pub fn load_news_file(path: &Path) -> Result<(Vec<NewsItem>, IngestReport), IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let out = read_news(file, &path.display().to_string())?;
    info!(path = %path.display(), rows = out.1.rows_kept, "loaded news");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn timestamp_formats() {
        assert_eq!(parse_timestamp("2020-06-05 10:30:54-04:00"), Some(ts("2020-06-05 10:30:54")));
        assert_eq!(parse_timestamp("2020-06-05T23:30:00+02:00"), Some(ts("2020-06-05 23:30:00")));
        assert_eq!(parse_timestamp("2020-06-05 10:30:54"), Some(ts("2020-06-05 10:30:54")));
        assert_eq!(parse_timestamp("2020-06-05"), Some(ts("2020-06-05 00:00:00")));
        assert_eq!(parse_timestamp("06/05/2020"), Some(ts("2020-06-05 00:00:00")));
        assert_eq!(parse_timestamp("not a date"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn offset_timestamp_keeps_local_calendar_day() {
        // Late evening in New York is already the next day in UTC.
        assert_eq!(
            parse_date("2020-06-05 22:00:00-04:00"),
            NaiveDate::from_ymd_opt(2020, 6, 5)
        );
    }

    #[test]
    fn prices_with_mixed_case_headers_and_extra_columns() {
        let csv = "Date,Open,High,Low,Close,Adj Close,Volume,Dividends\n\
                   2024-01-02,10,11,9,10.5,10.4,1000,0\n\
                   2024-01-03,10.5,12,10,11,10.9,1.5e3,0\n";
        let (bars, report) = read_prices("ABC", csv.as_bytes(), "ABC.csv").unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].ticker, "ABC");
        assert_eq!(bars[0].close, 10.5);
        assert_eq!(bars[1].volume, 1500);
        assert_eq!(report.rows_read, 2);
        assert_eq!(report.rows_dropped(), 0);
    }

    #[test]
    fn bad_price_rows_are_counted() {
        let csv = "date,open,high,low,close,volume\n\
                   2024-01-02,10,11,9,10,100\n\
                   garbage,10,11,9,10,100\n\
                   2024-01-04,10,11,9,abc,100\n\
                   2024-01-05,10,11,9,NaN,100\n\
                   2024-01-08,10,11,9,-1,100\n";
        let (bars, report) = read_prices("ABC", csv.as_bytes(), "ABC.csv").unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(report.rows_read, 5);
        assert_eq!(report.dropped[&DropReason::BadDate], 1);
        assert_eq!(report.dropped[&DropReason::BadNumber], 1);
        assert_eq!(report.dropped[&DropReason::NonFinite], 1);
        assert_eq!(report.dropped[&DropReason::Negative], 1);
    }

    #[test]
    fn missing_price_column_is_an_error() {
        let csv = "date,open,high,low,volume\n2024-01-02,1,1,1,1\n";
        let err = read_prices("ABC", csv.as_bytes(), "ABC.csv").unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn { column: "close", .. }));
    }

    #[test]
    fn news_rows_normalize_ticker_and_headline() {
        let csv = ",headline,url,publisher,date,stock\n\
                   0,Stock rallies,http://x,Wire,2020-06-05 10:30:54-04:00, aapl \n\
                   1,,http://y,Wire,2020-06-06,msft\n\
                   2,Broken,http://z,Wire,yesterday,aapl\n";
        let (items, report) = read_news(csv.as_bytes(), "news.csv").unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].stock, "AAPL");
        assert_eq!(items[0].date, ts("2020-06-05 10:30:54"));
        assert_eq!(items[1].headline, "");
        assert_eq!(items[1].stock, "MSFT");
        assert_eq!(report.dropped[&DropReason::BadDate], 1);
    }

    #[test]
    fn price_dir_uses_file_stems() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("msft.csv"),
            "Date,Open,High,Low,Close,Volume\n2024-01-02,1,2,1,2,10\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("AAPL.csv"),
            "Date,Open,High,Low,Close,Volume\n2024-01-02,3,4,3,4,10\n",
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let (bars, report) = load_price_dir(dir.path()).unwrap();
        assert_eq!(report.files, 2);
        let tickers: Vec<_> = bars.iter().map(|b| b.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["AAPL", "MSFT"]);
    }

    #[test]
    fn missing_dir_is_an_error() {
        let err = load_price_dir(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, IngestError::NotADirectory(_)));
    }
}
