pub mod convert;

use std::path::PathBuf;

use clap::{ArgAction, Parser};

#[derive(Parser, Debug)]
#[command(
    name = "bankcsv",
    version,
    about = "Convert bank statement CSV exports into a double-entry CSV ledger."
)]
pub struct Cli {
    /// Output file, '-' for standard output
    #[arg(short = 'o', long = "output", default_value = "-")]
    pub output: String,
    /// Log more (-v: progress, -vv: rule matches)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
    /// Account the statements belong to, e.g. 'Assets:Bank:Checking'
    pub src_account: String,
    /// JSON file with the AccountFromDescription rules
    pub config: PathBuf,
    /// Statement CSV files, read in the order given
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,
}

impl Cli {
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_defaults_to_stdout() {
        let cli = Cli::try_parse_from(["bankcsv", "Assets:Bank", "rules.json", "a.csv", "b.csv"]).unwrap();
        assert_eq!(cli.output, "-");
        assert_eq!(cli.src_account, "Assets:Bank");
        assert_eq!(cli.inputs, [PathBuf::from("a.csv"), PathBuf::from("b.csv")]);
        assert_eq!(cli.log_level(), log::LevelFilter::Warn);
    }

    #[test]
    fn test_output_and_verbosity_flags() {
        let cli = Cli::try_parse_from(["bankcsv", "-o", "out.csv", "-vv", "A", "r.json", "a.csv"]).unwrap();
        assert_eq!(cli.output, "out.csv");
        assert_eq!(cli.log_level(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_inputs_required() {
        assert!(Cli::try_parse_from(["bankcsv", "Assets:Bank", "rules.json"]).is_err());
    }
}
