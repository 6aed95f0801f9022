use clap::{Parser, Subcommand};

use self::{burndown::BurndownArg, survival::SurvivalArg};

mod burndown;
mod survival;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Print debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print warnings and errors only
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Reconstruct and resample a burndown matrix for charting
    Burndown(#[clap(flatten)] BurndownArg),
    /// Print the survival ratio of a burndown matrix
    Survival(#[clap(flatten)] SurvivalArg),
}

fn init_logger(args: &CommandArgs) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if args.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if args.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_logger(&args);
    match &args.mode {
        Mode::Burndown(arg) => burndown::run(arg)?,
        Mode::Survival(arg) => survival::run(arg)?,
    }
    Ok(())
}
