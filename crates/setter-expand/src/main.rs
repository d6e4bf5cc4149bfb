use std::{
    io::{self, Write},
    process,
};

use anyhow::Result;
use setter_core::init_tracing;
use setter_expand::{command, run, Options, EXIT_FAILURE};
use tracing::error;

fn main() {
    let code = match try_main() {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            eprintln!("error: {e:#}");
            EXIT_FAILURE
        }
    };
    process::exit(code);
}

fn try_main() -> Result<i32> {
    // Parse command line arguments
    let matches = command().get_matches();
    let options = Options::from_matches(&matches)?;

    // Initialize logging
    init_tracing(options.debug);

    let outcome = run(&options, &mut io::stdin().lock())?;

    io::stdout().write_all(outcome.stdout.as_bytes())?;
    io::stderr().write_all(outcome.stderr.as_bytes())?;
    Ok(outcome.exit_code)
}
