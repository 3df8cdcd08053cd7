use clap::Parser;
use maxmatch_cli::{run, Cli};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Logs vão para stderr; stdout fica só com a WER média
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let summary = run(&cli)?;

    if let Some(mean) = summary.mean() {
        println!("{mean}");
    }
    Ok(())
}
