use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::ByteRecord;

use crate::error::{BankCsvError, Result};
use crate::models::Transaction;

/// Second field of the row that opens a statement section.
pub const HEADER_MARKER: &str = " Posted Transactions Date";

const IDX_DATE: usize = 1;
const IDX_DESCRIPTION: usize = 2;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Strict `DD/MM/YYYY`: two-digit day and month, four-digit year.
pub fn parse_date_dmy(raw: &str) -> Option<NaiveDate> {
    let shaped = raw.len() == 10
        && raw.bytes().enumerate().all(|(i, b)| match i {
            2 | 5 => b == b'/',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%d/%m/%Y").ok()
}

/// `YYYYMMDD` followed by the 2-digit sequence number for that day.
pub fn format_id(date: NaiveDate, counter: u32) -> String {
    format!("{}{:02}", date.format("%Y%m%d"), counter)
}

pub fn is_header_marker(record: &ByteRecord) -> bool {
    record.get(1) == Some(HEADER_MARKER.as_bytes())
}

fn field<'r>(record: &'r ByteRecord, index: usize, path: &Path, line: u64) -> Result<&'r [u8]> {
    record.get(index).ok_or_else(|| BankCsvError::MissingField {
        path: path.to_path_buf(),
        line,
        index,
    })
}

/// Date and amount columns must be text; descriptions may be any bytes.
fn text_field<'r>(record: &'r ByteRecord, index: usize, path: &Path, line: u64) -> Result<&'r str> {
    std::str::from_utf8(field(record, index, path, line)?).map_err(|_| BankCsvError::NotUtf8 {
        path: path.to_path_buf(),
        line,
        index,
    })
}

// ---------------------------------------------------------------------------
// Statement layouts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatementFormat {
    Credit,
    /// Rows seen before any header marker are read with this layout.
    #[default]
    Debit,
}

impl StatementFormat {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Debit => "debit",
        }
    }

    /// Layout named by the first field of a header marker row.
    pub fn from_marker(first_field: &[u8]) -> Option<Self> {
        match first_field {
            b"Masked Card Number" => Some(Self::Credit),
            b"Posted Account" => Some(Self::Debit),
            _ => None,
        }
    }

    /// Value column, and the column read (negated) when that one is blank or zero.
    fn value_columns(&self) -> (usize, usize) {
        match self {
            Self::Credit => (3, 4),
            Self::Debit => (5, 6),
        }
    }

    pub fn parse_value(&self, record: &ByteRecord, path: &Path, line: u64) -> Result<String> {
        let (primary, fallback) = self.value_columns();
        let value = text_field(record, primary, path, line)?.trim();
        if value.is_empty() || value == "0.00" {
            let other = text_field(record, fallback, path, line)?.trim();
            return Ok(format!("-{other}"));
        }
        Ok(value.to_string())
    }
}

// ---------------------------------------------------------------------------
// Cross-file sequence state
// ---------------------------------------------------------------------------

/// Date of the previous transaction and its sequence number. Shared by every
/// input of a run, so ids keep counting when a file continues the day the
/// previous file ended on.
#[derive(Debug, Default, Clone)]
pub struct ParseState {
    last_date: Option<NaiveDate>,
    counter: u32,
}

impl ParseState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self, date: NaiveDate) -> String {
        if self.last_date == Some(date) {
            self.counter += 1;
        } else {
            self.last_date = Some(date);
            self.counter = 1;
        }
        format_id(date, self.counter)
    }
}

pub fn parse_record(
    record: &ByteRecord,
    format: StatementFormat,
    state: &mut ParseState,
    path: &Path,
    line: u64,
) -> Result<Transaction> {
    let raw_date = text_field(record, IDX_DATE, path, line)?;
    let date = parse_date_dmy(raw_date).ok_or_else(|| BankCsvError::Date {
        path: path.to_path_buf(),
        line,
        text: raw_date.to_string(),
    })?;
    let description = field(record, IDX_DESCRIPTION, path, line)?.to_vec();
    let value = format.parse_value(record, path, line)?;
    let id = state.next_id(date);
    Ok(Transaction {
        id,
        date,
        description,
        value,
        account: None,
        src_account: String::new(),
    })
}

// ---------------------------------------------------------------------------
// Single statement file
// ---------------------------------------------------------------------------

pub struct StatementReader<R: Read> {
    path: PathBuf,
    reader: csv::Reader<R>,
    record: ByteRecord,
    format: StatementFormat,
}

impl<R: Read> StatementReader<R> {
    /// `path` is only used to label errors and log lines.
    pub fn new(path: &Path, input: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(false)
            .from_reader(input);
        Self {
            path: path.to_path_buf(),
            reader,
            record: ByteRecord::new(),
            format: StatementFormat::default(),
        }
    }

    /// Next data row as a transaction, consuming any header markers before it.
    pub fn next_transaction(&mut self, state: &mut ParseState) -> Result<Option<Transaction>> {
        loop {
            if !self.reader.read_byte_record(&mut self.record)? {
                return Ok(None);
            }
            let line = self.record.position().map_or(0, |p| p.line());
            if is_header_marker(&self.record) {
                let marker = &self.record[0];
                self.format = StatementFormat::from_marker(marker).ok_or_else(|| {
                    BankCsvError::UnknownFormat {
                        path: self.path.clone(),
                        marker: String::from_utf8_lossy(marker).into_owned(),
                    }
                })?;
                log::info!(
                    "{}:{line}: {} statement section",
                    self.path.display(),
                    self.format.key()
                );
                continue;
            }
            return parse_record(&self.record, self.format, state, &self.path, line).map(Some);
        }
    }
}

// ---------------------------------------------------------------------------
// All inputs of a run
// ---------------------------------------------------------------------------

/// Yields the transactions of every input in order. Stops after the first error.
pub struct TransactionReader {
    inputs: std::vec::IntoIter<PathBuf>,
    current: Option<StatementReader<BufReader<File>>>,
    state: ParseState,
    failed: bool,
}

impl TransactionReader {
    pub fn new(inputs: Vec<PathBuf>) -> Self {
        Self {
            inputs: inputs.into_iter(),
            current: None,
            state: ParseState::new(),
            failed: false,
        }
    }

    fn open_next(&mut self) -> Option<Result<()>> {
        let path = self.inputs.next()?;
        log::info!("Reading {}", path.display());
        match File::open(&path) {
            Ok(file) => {
                self.current = Some(StatementReader::new(&path, BufReader::new(file)));
                Some(Ok(()))
            }
            Err(source) => Some(Err(BankCsvError::InputOpen { path, source })),
        }
    }
}

impl Iterator for TransactionReader {
    type Item = Result<Transaction>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            if self.current.is_none() {
                if let Err(e) = self.open_next()? {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
            let Some(statement) = self.current.as_mut() else {
                continue;
            };
            match statement.next_transaction(&mut self.state) {
                Ok(Some(transaction)) => return Some(Ok(transaction)),
                Ok(None) => self.current = None,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
