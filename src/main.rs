use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

/// Exit status for a crawl that stopped on a failed listing fetch but still wrote its items.
const EXIT_ABORTED: u8 = 2;

fn main() -> ExitCode {
    match try_main() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> anyhow::Result<ExitCode> {
    shelfscrape::logging::init().context("init logging")?;

    let cli = shelfscrape::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        shelfscrape::cli::Command::Crawl(args) => {
            let outcome = shelfscrape::crawl::run(args).context("crawl")?;
            if outcome.is_aborted() {
                return Ok(ExitCode::from(EXIT_ABORTED));
            }
        }
        shelfscrape::cli::Command::Health(args) => {
            shelfscrape::health::run(args).context("health")?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
