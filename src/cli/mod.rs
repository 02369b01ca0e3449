pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "myflix-api")]
#[command(about = "myFlix API - movies catalog and user accounts over HTTP")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output command results in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve(commands::serve::ServeArgs),

    #[command(about = "Insert movie documents from a JSON fixture file")]
    Seed(commands::seed::SeedArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let config = AppConfig::from_env();
    tracing::info!("Starting myFlix API in {:?} mode", config.environment);

    match cli.command {
        Some(Commands::Serve(args)) => commands::serve::handle(args, config).await,
        None => commands::serve::handle(commands::serve::ServeArgs::default(), config).await,
        Some(Commands::Seed(args)) => commands::seed::handle(args, config, output_format).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_default_and_subcommands() {
        let cli = Cli::try_parse_from(["myflix-api"]).unwrap();
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["myflix-api", "serve", "--port", "9000"]).unwrap();
        match cli.command {
            Some(Commands::Serve(args)) => assert_eq!(args.port, Some(9000)),
            _ => panic!("expected serve"),
        }

        let cli = Cli::try_parse_from(["myflix-api", "seed", "--file", "movies.json", "--json"]).unwrap();
        assert_eq!(OutputFormat::from_cli(&cli), OutputFormat::Json);
        assert!(matches!(cli.command, Some(Commands::Seed(_))));
    }
}
