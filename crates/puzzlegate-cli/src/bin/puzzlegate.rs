//! Puzzlegate command-line tool.
//!
//! Set `RUST_LOG=debug` to see generation details.

use std::process::ExitCode;

use clap::Parser as _;
use puzzlegate_cli::Cli;

fn main() -> ExitCode {
    better_panic::install();
    env_logger::init();

    let cli = Cli::parse();
    match puzzlegate_cli::run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
