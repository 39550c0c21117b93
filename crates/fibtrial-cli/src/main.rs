use clap::Parser;

mod cli;
mod logging;

use cli::args::Cli;
use cli::commands::{dispatch, exit_codes};

fn main() {
    let cli = Cli::parse();
    let code = match dispatch(cli) {
        Ok(code) => code,
        Err(e) => {
            let code = exit_codes::error_code(&e);
            tracing::error!(error_code = code, error = %e, "run aborted");
            eprintln!("fatal [{code}]: {e:?}");
            exit_codes::for_error(&e)
        }
    };
    std::process::exit(code);
}
