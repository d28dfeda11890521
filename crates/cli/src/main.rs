use anyhow::Result;
use clap::Parser;

use copurchase_cli::{Cli, run};

fn main() -> Result<()> {
    let cli = Cli::parse();
    copurchase_observability::init(cli.log_format);

    tracing::debug!(prices_dir = %cli.prices_dir.display(), "starting");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(cli, &mut out)
}
