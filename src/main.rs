use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use shelfscan::app::AppContext;
use shelfscan::cli::{commands, Cli, Commands};
use shelfscan::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so JSON and CSV on stdout stay clean
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = match cli.config.as_deref() {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if let Commands::Config = cli.command {
        commands::show_config(&config, cli.config.as_deref())?;
        return Ok(());
    }

    let ctx = AppContext::new(config)?;

    match cli.command {
        Commands::Search {
            term,
            max_results,
            format,
            output,
        } => {
            commands::search(&ctx, &term, max_results, format, output).await?;
        }
        Commands::Request { path } => {
            commands::request(&ctx, path.as_deref()).await?;
        }
        Commands::Parse { path } => {
            commands::parse_file(&ctx, &path)?;
        }
        Commands::Config => {}
    }

    Ok(())
}
