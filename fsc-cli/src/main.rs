//! fsc CLI - beach-seine fish community analysis.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "fsc-cli",
    version,
    about = "Beach-seine fish community analysis toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: fsc_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    fsc_cmd::run(cli.command)
}
