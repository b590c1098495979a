use std::io;
use std::process::ExitCode;

use clap::Parser;
use stencil::{logging, report, Args, Config};

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(&args.log_level);

    match try_main(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn try_main(args: Args) -> anyhow::Result<()> {
    let config = Config::try_from(args)?;
    let report = stencil::run(&config)?;

    report::write_failures(&mut io::stderr().lock(), &report)?;
    report::write_summary(&mut io::stdout().lock(), &report)?;
    Ok(())
}
