use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BankCsvError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Cannot read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Cannot open input {}: {source}", path.display())]
    InputOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Unknown input format for {}: header marker '{marker}'", path.display())]
    UnknownFormat { path: PathBuf, marker: String },

    #[error("{}:{line}: invalid date '{text}' (expected DD/MM/YYYY)", path.display())]
    Date {
        path: PathBuf,
        line: u64,
        text: String,
    },

    #[error("{}:{line}: missing field {index}", path.display())]
    MissingField {
        path: PathBuf,
        line: u64,
        index: usize,
    },

    #[error("{}:{line}: field {index} is not valid UTF-8", path.display())]
    NotUtf8 {
        path: PathBuf,
        line: u64,
        index: usize,
    },

    #[error("Invalid regex '{pattern}': {source}")]
    Regex {
        pattern: String,
        source: regex::Error,
    },

    #[error("Cannot create output {}: {source}", path.display())]
    OutputCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Input reader stopped unexpectedly")]
    Producer,
}

pub type Result<T> = std::result::Result<T, BankCsvError>;
