//! Double-entry CSV output.

use std::borrow::Cow;
use std::io::Write;

use csv::QuoteStyle;

use crate::error::Result;
use crate::models::Transaction;

/// Written verbatim, ahead of the CSV writer, so every column name is quoted.
pub const HEADER: &str = "\"id\",\"date\",\"description\",\"withdrawal\",\"account\"\n";

/// Flips the sign of a textual amount: `-12.34` <-> `12.34`.
pub fn invert_value(value: &str) -> String {
    match value.strip_prefix('-') {
        Some(magnitude) => magnitude.to_string(),
        None => format!("-{value}"),
    }
}

/// Quote when the field holds a delimiter, quote or line break, when it starts
/// with whitespace, or when it is exactly `\.`.
fn needs_quotes(field: &[u8]) -> bool {
    if field.is_empty() {
        return false;
    }
    if field == br"\." || field.iter().any(|b| matches!(b, b',' | b'"' | b'\r' | b'\n')) {
        return true;
    }
    let head = &field[..field.len().min(4)];
    String::from_utf8_lossy(head)
        .chars()
        .next()
        .is_some_and(char::is_whitespace)
}

pub fn quote_field(field: &[u8]) -> Cow<'_, [u8]> {
    if !needs_quotes(field) {
        return Cow::Borrowed(field);
    }
    let mut quoted = Vec::with_capacity(field.len() + 2);
    quoted.push(b'"');
    for &b in field {
        if b == b'"' {
            quoted.push(b'"');
        }
        quoted.push(b);
    }
    quoted.push(b'"');
    Cow::Owned(quoted)
}

/// Collects transactions as a source row plus, once classified, a balancing
/// destination row.
///
/// The header reaches `out` immediately. Rows are held until [`finish`], so a
/// run that fails part way leaves nothing but the header behind.
///
/// [`finish`]: LedgerWriter::finish
pub struct LedgerWriter<W: Write> {
    out: W,
    rows: csv::Writer<Vec<u8>>,
}

impl<W: Write> LedgerWriter<W> {
    pub fn new(mut out: W) -> Result<Self> {
        out.write_all(HEADER.as_bytes())?;
        out.flush()?;
        // Fields arrive pre-quoted by `quote_field`.
        let rows = csv::WriterBuilder::new()
            .quote_style(QuoteStyle::Never)
            .from_writer(Vec::new());
        Ok(Self { out, rows })
    }

    pub fn add(&mut self, t: &Transaction) -> Result<()> {
        let date = t.date.format("%Y-%m-%d").to_string();
        self.rows.write_record([
            quote_field(t.id.as_bytes()),
            quote_field(date.as_bytes()),
            quote_field(&t.description),
            quote_field(t.value.as_bytes()),
            quote_field(t.src_account.as_bytes()),
        ])?;
        if let Some(account) = t.destination() {
            let inverted = invert_value(&t.value);
            self.rows.write_record([
                Cow::Borrowed(&b""[..]),
                Cow::Borrowed(&b""[..]),
                Cow::Borrowed(&b""[..]),
                quote_field(inverted.as_bytes()),
                quote_field(account.as_bytes()),
            ])?;
        }
        Ok(())
    }

    /// Writes the collected rows, flushes, and hands back the underlying writer.
    pub fn finish(self) -> Result<W> {
        let Self { mut out, rows } = self;
        let rows = rows.into_inner().map_err(|e| e.into_error())?;
        out.write_all(&rows)?;
        out.flush()?;
        Ok(out)
    }
}
