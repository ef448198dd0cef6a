//! Append-only record of executed cycles.

use chrono::{DateTime, Local};
use rust_decimal::Decimal;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
#[cfg(test)]
use std::sync::Mutex;
use triangular_executor::{LimitOrder, OrderOutcome};

/// One executed cycle as written to the trade log.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub timestamp: DateTime<Local>,
    pub coin: String,
    pub change: Decimal,
    pub cumulative_change: Decimal,
    pub legs: Vec<(LimitOrder, OrderOutcome)>,
}

impl TradeRecord {
    pub fn new(
        coin: &str,
        change: Decimal,
        cumulative_change: Decimal,
        legs: Vec<(LimitOrder, OrderOutcome)>,
    ) -> Self {
        Self {
            timestamp: Local::now(),
            coin: coin.to_string(),
            change,
            cumulative_change,
            legs,
        }
    }

    /// Text block appended to the log.
    pub fn render(&self) -> String {
        let mut out = format!(
            "[{}] <{}> Change: {:.2}% - ZChange: {:.2}%\n",
            self.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
            self.coin,
            self.change,
            self.cumulative_change
        );
        for (order, outcome) in &self.legs {
            out.push_str(&format!("{} - {}\n", order, outcome));
        }
        out
    }
}

/// Destination for trade records.
pub trait TradeLog: Send + Sync {
    fn append(&self, record: &TradeRecord) -> io::Result<()>;
}

/// Appends records to a file, creating it on first write.
#[derive(Debug, Clone)]
pub struct FileTradeLog {
    path: PathBuf,
}

impl FileTradeLog {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl TradeLog for FileTradeLog {
    fn append(&self, record: &TradeRecord) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(record.render().as_bytes())
    }
}

/// Keeps rendered records in memory.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryTradeLog {
    records: Mutex<Vec<String>>,
}

#[cfg(test)]
impl MemoryTradeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<String> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
impl TradeLog for MemoryTradeLog {
    fn append(&self, record: &TradeRecord) -> io::Result<()> {
        let mut records = self
            .records
            .lock()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
        records.push(record.render());
        Ok(())
    }
}
