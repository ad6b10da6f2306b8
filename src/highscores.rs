//! Match records and the high score leaderboard
//!
//! A finished run appends one `Record` to an append-only store. The store is
//! a flat CSV file with the header `date,score,kills,coins`; the leaderboard
//! is a sorted view over whatever the store holds.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of entries shown on the leaderboard
pub const MAX_HIGH_SCORES: usize = 10;

/// Column header of the record file
pub const CSV_HEADER: &str = "date,score,kills,coins";

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("record store {path} unavailable: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed record on line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

/// Outcome of one finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Human-readable UTC timestamp
    pub date: String,
    pub score: u64,
    pub kills: u64,
    pub coins: u64,
}

impl Record {
    pub fn new(date: impl Into<String>, score: u64, kills: u64, coins: u64) -> Self {
        Self {
            date: date.into(),
            score,
            kills,
            coins,
        }
    }

    /// Stamp a record with the current wall clock time
    pub fn now(score: u64, kills: u64, coins: u64) -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self::new(format_date(secs), score, kills, coins)
    }

    fn to_csv_line(&self) -> String {
        // Commas would split the date column
        let date = self.date.replace(',', " ");
        format!("{},{},{},{}", date, self.score, self.kills, self.coins)
    }

    fn from_csv_line(line: &str, line_no: usize) -> Result<Self, RecordError> {
        let cols: Vec<&str> = line.split(',').map(str::trim).collect();
        let [date, score, kills, coins] = cols.as_slice() else {
            return Err(RecordError::Malformed {
                line: line_no,
                reason: format!("expected 4 columns, found {}", cols.len()),
            });
        };
        let number = |name: &str, text: &str| {
            text.parse::<u64>().map_err(|e| RecordError::Malformed {
                line: line_no,
                reason: format!("{name} {text:?}: {e}"),
            })
        };
        Ok(Self {
            date: (*date).to_string(),
            score: number("score", score)?,
            kills: number("kills", kills)?,
            coins: number("coins", coins)?,
        })
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}  score {}  kills {}  coins {}",
            self.date, self.score, self.kills, self.coins
        )
    }
}

/// Append-only match history
pub trait RecordStore {
    fn append(&mut self, record: &Record) -> Result<(), RecordError>;

    fn records(&self) -> Result<Vec<Record>, RecordError>;

    /// Does any stored record beat `score` strictly
    fn any_higher(&self, score: u64) -> Result<bool, RecordError> {
        Ok(self.records()?.iter().any(|r| r.score > score))
    }

    /// Drop every stored record
    fn clear(&mut self) -> Result<(), RecordError>;
}

/// Records kept in memory only
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    pub records: Vec<Record>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryRecordStore {
    fn append(&mut self, record: &Record) -> Result<(), RecordError> {
        self.records.push(record.clone());
        Ok(())
    }

    fn records(&self) -> Result<Vec<Record>, RecordError> {
        Ok(self.records.clone())
    }

    fn clear(&mut self) -> Result<(), RecordError> {
        self.records.clear();
        Ok(())
    }
}

/// Flat CSV file, one record per line after the header
#[derive(Debug, Clone)]
pub struct CsvRecordStore {
    path: PathBuf,
}

impl CsvRecordStore {
    /// Open the store, writing a fresh header if the file is missing or empty
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, RecordError> {
        let store = Self { path: path.into() };
        match fs::metadata(&store.path) {
            Ok(meta) if meta.len() > 0 => {}
            Ok(_) => {
                store.write_header()?;
                log::info!("Wrote header to empty record store {}", store.path.display());
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                store.write_header()?;
                log::info!("Created record store {}", store.path.display());
            }
            Err(e) => return Err(store.io_error(e)),
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> RecordError {
        RecordError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn write_header(&self) -> Result<(), RecordError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;
        }
        let mut file = File::create(&self.path).map_err(|e| self.io_error(e))?;
        writeln!(file, "{CSV_HEADER}").map_err(|e| self.io_error(e))
    }
}

impl RecordStore for CsvRecordStore {
    fn append(&mut self, record: &Record) -> Result<(), RecordError> {
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;
        writeln!(file, "{}", record.to_csv_line()).map_err(|e| self.io_error(e))?;
        log::info!("Record saved: {}", record);
        Ok(())
    }

    fn records(&self) -> Result<Vec<Record>, RecordError> {
        let file = File::open(&self.path).map_err(|e| self.io_error(e))?;
        let mut records = Vec::new();
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| self.io_error(e))?;
            if line.trim().is_empty() || (idx == 0 && line.trim() == CSV_HEADER) {
                continue;
            }
            records.push(Record::from_csv_line(&line, idx + 1)?);
        }
        Ok(records)
    }

    fn clear(&mut self) -> Result<(), RecordError> {
        self.write_header()?;
        log::info!("Cleared record store {}", self.path.display());
        Ok(())
    }
}

/// Top scores, sorted descending
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Leaderboard {
    pub entries: Vec<Record>,
}

impl Leaderboard {
    /// Build the top-`MAX_HIGH_SCORES` view of a record list
    pub fn from_records(mut records: Vec<Record>) -> Self {
        // Stable sort keeps earlier records ahead on ties
        records.sort_by(|a, b| b.score.cmp(&a.score));
        records.truncate(MAX_HIGH_SCORES);
        Self { entries: records }
    }

    pub fn load(store: &dyn RecordStore) -> Result<Self, RecordError> {
        Ok(Self::from_records(store.records()?))
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}

const WEEKDAYS: [&str; 7] = ["Thu", "Fri", "Sat", "Sun", "Mon", "Tue", "Wed"];
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Format unix seconds as `Www Mmm dd hh:mm:ss yyyy` (UTC)
pub fn format_date(unix_secs: u64) -> String {
    let days = (unix_secs / 86_400) as i64;
    let rem = unix_secs % 86_400;
    let (year, month, day) = civil_from_days(days);
    format!(
        "{} {} {:2} {:02}:{:02}:{:02} {}",
        WEEKDAYS[days.rem_euclid(7) as usize],
        MONTHS[(month - 1) as usize],
        day,
        rem / 3600,
        (rem / 60) % 60,
        rem % 60,
        year
    )
}

/// Days since 1970-01-01 to a proleptic Gregorian (year, month, day)
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file_path(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        std::env::temp_dir().join(format!(
            "soul_hunter_{}_{}_{}.csv",
            name,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(0), "Thu Jan  1 00:00:00 1970");
        // 2000-02-29 12:34:56 UTC
        assert_eq!(format_date(951_827_696), "Tue Feb 29 12:34:56 2000");
    }

    #[test]
    fn test_memory_store_any_higher() {
        let mut store = MemoryRecordStore::new();
        assert!(!store.any_higher(0).expect("read"));
        store.append(&Record::new("d", 300, 2, 5)).expect("append");
        assert!(store.any_higher(299).expect("read"));
        assert!(!store.any_higher(300).expect("read"), "ties are not higher");
        store.clear().expect("clear");
        assert!(store.records().expect("read").is_empty());
    }

    #[test]
    fn test_csv_store_roundtrip_and_clear() {
        let path = temp_file_path("roundtrip");
        let mut store = CsvRecordStore::open(&path).expect("open");
        assert_eq!(
            fs::read_to_string(&path).expect("read").trim(),
            CSV_HEADER
        );

        store
            .append(&Record::new("Mon Oct 19 10:00:00 2026", 500, 7, 42))
            .expect("append");
        store.append(&Record::new("later", 120, 1, 3)).expect("append");

        // Reopening keeps existing rows
        let store = CsvRecordStore::open(&path).expect("reopen");
        let records = store.records().expect("records");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].score, 500);
        assert_eq!(records[0].date, "Mon Oct 19 10:00:00 2026");
        assert!(store.any_higher(499).expect("read"));
        assert!(!store.any_higher(500).expect("read"));

        let mut store = store;
        store.clear().expect("clear");
        assert!(store.records().expect("records").is_empty());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_csv_store_malformed_row() {
        let path = temp_file_path("malformed");
        fs::write(&path, format!("{CSV_HEADER}\nyesterday,lots,1,2\n")).expect("write");
        let store = CsvRecordStore::open(&path).expect("open");
        assert!(matches!(
            store.records(),
            Err(RecordError::Malformed { line: 2, .. })
        ));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_csv_store_empty_file_gets_header() {
        let path = temp_file_path("empty");
        File::create(&path).expect("create");
        let mut store = CsvRecordStore::open(&path).expect("open");
        store.append(&Record::new("d", 500, 1, 2)).expect("append");

        let records = store.records().expect("records");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].score, 500);
        assert!(store.any_higher(100).expect("read"));
        assert!(fs::read_to_string(&path).expect("read").starts_with(CSV_HEADER));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_csv_store_headerless_first_row_is_kept() {
        let path = temp_file_path("headerless");
        fs::write(&path, "d,300,2,5\ne,200,1,1\n").expect("write");
        let store = CsvRecordStore::open(&path).expect("open");
        let records = store.records().expect("records");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].score, 300);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_csv_store_missing_file_is_io_error() {
        let path = temp_file_path("vanished");
        let store = CsvRecordStore::open(&path).expect("open");
        fs::remove_file(&path).expect("remove");
        assert!(matches!(store.records(), Err(RecordError::Io { .. })));
    }

    #[test]
    fn test_leaderboard_sorted_and_capped() {
        let records = (0..15)
            .map(|i| Record::new(format!("day {i}"), (i * 37 % 11) as u64 * 10, 0, 0))
            .collect();
        let board = Leaderboard::from_records(records);
        assert_eq!(board.entries.len(), MAX_HIGH_SCORES);
        assert!(board.entries.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(board.top_score(), Some(100));
    }

    #[test]
    fn test_leaderboard_rank() {
        let board = Leaderboard::from_records(vec![
            Record::new("a", 300, 0, 0),
            Record::new("b", 100, 0, 0),
        ]);
        assert_eq!(board.potential_rank(500), Some(1));
        assert_eq!(board.potential_rank(200), Some(2));
        assert_eq!(board.potential_rank(50), Some(3));
        assert!(!board.qualifies(0));
    }
}
