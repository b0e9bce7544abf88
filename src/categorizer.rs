use regex::bytes::Regex;

use crate::config::AccountRule;
use crate::error::{BankCsvError, Result};
use crate::models::Transaction;

struct CompiledRule {
    account: String,
    regex: Regex,
}

/// Assigns destination accounts from the ordered rule list. Every rule is
/// tried; the last one whose pattern matches the description decides.
pub struct Categorizer {
    rules: Vec<CompiledRule>,
}

impl Categorizer {
    pub fn new(rules: &[AccountRule]) -> Result<Self> {
        let rules = rules
            .iter()
            .map(|rule| {
                let regex = Regex::new(&rule.regex).map_err(|source| BankCsvError::Regex {
                    pattern: rule.regex.clone(),
                    source,
                })?;
                Ok(CompiledRule {
                    account: rule.account.clone(),
                    regex,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Account of the last matching rule. An empty account name still
    /// overrides earlier matches and leaves the transaction unclassified.
    pub fn account_for(&self, description: &[u8]) -> Option<&str> {
        let mut account = None;
        for rule in &self.rules {
            if rule.regex.is_match(description) {
                log::debug!(
                    "'{}' matches /{}/ -> {}",
                    String::from_utf8_lossy(description),
                    rule.regex,
                    rule.account
                );
                account = Some(rule.account.as_str());
            }
        }
        account
    }

    /// Sets `transaction.account` when any rule matches; see [`Transaction::destination`].
    pub fn categorize(&self, transaction: &mut Transaction) {
        if let Some(account) = self.account_for(&transaction.description) {
            transaction.account = Some(account.to_string());
        }
    }
}
