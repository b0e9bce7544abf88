mod categorizer;
mod cli;
mod config;
mod error;
mod importer;
mod ledger;
mod models;
mod pipeline;

use clap::Parser;

use cli::Cli;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .format_timestamp(None)
        .init();

    if let Err(e) = cli::convert::run(&cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
