use riskmatrix::cli;
use riskmatrix::error::RiskMatrixError;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = cli::parse_args();
    cli::init_logging(cli.verbosity);

    match cli::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {:#}", error);
            ExitCode::from(exit_code(&error))
        }
    }
}

// Library errors carry their own exit codes; anything else is a generic failure.
fn exit_code(error: &anyhow::Error) -> u8 {
    error
        .downcast_ref::<RiskMatrixError>()
        .map(|e| u8::try_from(e.exit_code()).unwrap_or(1))
        .unwrap_or(1)
}
