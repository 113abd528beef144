pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "shelfscan")]
#[command(about = "Extract product listings from paginated shop search results", long_about = None)]
pub struct Cli {
    /// Configuration file (default: ~/.config/shelfscan/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search the source and print the extracted products
    Search {
        /// Search term
        term: String,

        /// Maximum number of products (default from config)
        #[arg(short = 'n', long)]
        max_results: Option<usize>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Also write a CSV export; without a path, search_results_<term>.csv
        #[arg(short, long)]
        output: Option<Option<PathBuf>>,
    },
    /// Serve a JSON request ({"searchTerm", "maxResults"}) from a file or stdin
    Request {
        /// Request file; reads stdin when omitted or "-"
        path: Option<PathBuf>,
    },
    /// Run extraction on a saved result page
    Parse {
        /// HTML file
        path: PathBuf,
    },
    /// Show where configuration is read from and whether the gateway key is set
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_arguments() {
        let cli = Cli::parse_from(["shelfscan", "search", "吹風機", "-n", "10", "--format", "json"]);
        match cli.command {
            Commands::Search {
                term,
                max_results,
                format,
                output,
            } => {
                assert_eq!(term, "吹風機");
                assert_eq!(max_results, Some(10));
                assert_eq!(format, OutputFormat::Json);
                assert!(output.is_none());
            }
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn test_output_path_is_optional() {
        let cli = Cli::parse_from(["shelfscan", "search", "laptop", "-o"]);
        let Commands::Search { output, .. } = cli.command else {
            panic!("expected search command");
        };
        assert_eq!(output, Some(None));

        let cli = Cli::parse_from(["shelfscan", "search", "laptop", "-o", "out.csv"]);
        let Commands::Search { output, .. } = cli.command else {
            panic!("expected search command");
        };
        assert_eq!(output, Some(Some(PathBuf::from("out.csv"))));
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::parse_from(["shelfscan", "parse", "page.html", "--config", "alt.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("alt.toml")));
        assert!(matches!(cli.command, Commands::Parse { .. }));
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
