use clap::Parser;
use stackup::{Cli, Config, Sequencer};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    Sequencer::new(config, &cli.root).run(&cli.options())?;
    Ok(())
}
