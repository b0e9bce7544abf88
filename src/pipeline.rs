use std::io::Write;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::thread;

use crate::categorizer::Categorizer;
use crate::error::{BankCsvError, Result};
use crate::importer::TransactionReader;
use crate::ledger::LedgerWriter;
use crate::models::Transaction;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConvertSummary {
    pub transactions: usize,
    pub classified: usize,
    pub unclassified: usize,
}

/// Reads every input in order on a background thread and writes the ledger
/// to `out`. The first error from either side ends the run.
pub fn convert<W: Write>(
    src_account: &str,
    categorizer: &Categorizer,
    inputs: Vec<PathBuf>,
    out: W,
) -> Result<(ConvertSummary, W)> {
    let mut ledger = LedgerWriter::new(out)?;

    let (tx, rx) = mpsc::sync_channel::<Result<Transaction>>(0);
    let producer = thread::spawn(move || {
        for item in TransactionReader::new(inputs) {
            let failed = item.is_err();
            // Send fails once the consumer has given up.
            if tx.send(item).is_err() || failed {
                break;
            }
        }
    });

    let drained = drain(rx, src_account, categorizer, &mut ledger);
    let joined = producer.join().map_err(|_| BankCsvError::Producer);
    let summary = drained?;
    joined?;

    let out = ledger.finish()?;
    Ok((summary, out))
}

fn drain<W: Write>(
    rx: Receiver<Result<Transaction>>,
    src_account: &str,
    categorizer: &Categorizer,
    ledger: &mut LedgerWriter<W>,
) -> Result<ConvertSummary> {
    let mut summary = ConvertSummary::default();
    for item in rx {
        let mut t = item?;
        t.src_account = src_account.to_string();
        summary.transactions += 1;
        categorizer.categorize(&mut t);
        if t.is_classified() {
            summary.classified += 1;
        } else {
            summary.unclassified += 1;
            log::warn!("could not assign account to {} ({})", t.description_lossy(), t.id);
        }
        ledger.add(&t)?;
    }
    Ok(summary)
}
