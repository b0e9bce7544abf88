use std::borrow::Cow;

use chrono::NaiveDate;

/// A single statement line, normalized.
///
/// `description` holds the statement bytes untouched, whatever their encoding.
/// `value` keeps the text of the statement column (trimmed), with a leading
/// `-` when money left the source account.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    pub description: Vec<u8>,
    pub value: String,
    /// Destination account; `None` or empty until a rule matches.
    pub account: Option<String>,
    pub src_account: String,
}

impl Transaction {
    /// Destination account, if one was assigned and is non-empty.
    pub fn destination(&self) -> Option<&str> {
        self.account.as_deref().filter(|a| !a.is_empty())
    }

    pub fn is_classified(&self) -> bool {
        self.destination().is_some()
    }

    /// Description for log lines; invalid UTF-8 shows as U+FFFD.
    pub fn description_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.description)
    }
}
