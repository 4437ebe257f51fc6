// Entrypoint for the example program.
// - Keeps `main` small: parse the three arguments and hand them to the UI.
// - Every failure is printed to stdout and ends the process with status 1.

use std::process::ExitCode;
use tracing_subscriber::{fmt, EnvFilter};
use visallo_client_example::{config::Config, ui};

fn main() -> ExitCode {
    // Diagnostics are opt-in through RUST_LOG and never touch stdout.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let config = match Config::from_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(e) => {
            println!("{}", e);
            return ExitCode::from(1);
        }
    };

    match ui::run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("{:#}", e);
            ExitCode::from(1)
        }
    }
}
