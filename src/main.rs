use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

fn main() -> ExitCode {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn try_main() -> anyhow::Result<()> {
    readtrail::logging::init().context("init logging")?;

    let cli = readtrail::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        readtrail::cli::Command::Log(args) => {
            readtrail::commands::log(args).context("log")?;
        }
        readtrail::cli::Command::Recent(args) => {
            readtrail::commands::recent(args).context("recent")?;
        }
        readtrail::cli::Command::Revisit(args) => {
            readtrail::commands::revisit(args).context("revisit")?;
        }
        readtrail::cli::Command::Popular(args) => {
            readtrail::commands::popular(args).context("popular")?;
        }
        readtrail::cli::Command::Series(args) => {
            readtrail::commands::series(args).context("series")?;
        }
        readtrail::cli::Command::Reset(args) => {
            readtrail::commands::reset(args).context("reset")?;
        }
    }

    Ok(())
}
