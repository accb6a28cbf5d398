//! Binary entrypoint for the `navdrift` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    // Silent when absent; NAVDRIFT_ROOT and RUST_LOG may come from `.env`.
    let _ = dotenvy::dotenv();

    match navdrift::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
