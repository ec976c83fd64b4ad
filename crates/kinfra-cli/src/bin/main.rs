use clap::Parser;
use fluvio_future::task::run_block_on;

use kinfra_cli::Root;

fn main() -> anyhow::Result<()> {
    fluvio_future::subscriber::init_tracer(None);

    let root = Root::parse();
    run_block_on(root.process())
}
