use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use crate::categorizer::Categorizer;
use crate::cli::Cli;
use crate::config::load_config;
use crate::error::{BankCsvError, Result};
use crate::pipeline::convert;

fn open_output(output: &str) -> Result<Box<dyn Write>> {
    if output == "-" {
        return Ok(Box::new(std::io::stdout().lock()));
    }
    let file = File::create(output).map_err(|source| BankCsvError::OutputCreate {
        path: PathBuf::from(output),
        source,
    })?;
    Ok(Box::new(file))
}

pub fn run(cli: &Cli) -> Result<()> {
    let config = load_config(&cli.config)?;
    let categorizer = Categorizer::new(&config.account_from_description)?;
    if categorizer.is_empty() {
        log::warn!("{} has no rules; every transaction stays unclassified", cli.config.display());
    } else {
        log::info!("{} classification rule(s)", categorizer.len());
    }

    let out = open_output(&cli.output)?;
    let (summary, mut out) = convert(&cli.src_account, &categorizer, cli.inputs.clone(), out)?;
    out.flush()?;

    log::info!(
        "{} transactions: {} classified, {} unclassified",
        summary.transactions,
        summary.classified,
        summary.unclassified
    );
    Ok(())
}
