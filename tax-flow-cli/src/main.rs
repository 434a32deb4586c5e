use std::io;

use clap::Parser;

use tax_flow_cli::cli::Cli;
use tax_flow_cli::{app, logging};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let stdout = io::stdout();
    app::run(&cli, &mut stdout.lock())
}
