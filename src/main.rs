use matrix_gate::cli;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // Pick a language before any output is produced.
    matrix_gate::init();

    match cli::run().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
