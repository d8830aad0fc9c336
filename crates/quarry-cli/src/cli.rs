//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Quarry - Extract convention-encoded XML game data to structured JSON.
#[derive(Debug, Parser)]
#[command(name = "quarry")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Category registry file (defaults to the built-in registry)
    #[arg(short, long, global = true)]
    pub registry: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract every registered category to JSON files
    Extract(ExtractArgs),

    /// Look up a localization key
    Resolve(ResolveArgs),

    /// List registered categories
    Categories,
}

/// Location of the game data.
#[derive(Debug, Clone, clap::Args)]
pub struct SourceArgs {
    /// Game installation directory (or an Infos directory)
    #[arg(short, long, env = "QUARRY_GAME_PATH")]
    pub game_path: PathBuf,

    /// Language id or column name (overrides the configuration)
    #[arg(short, long)]
    pub language: Option<String>,
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Directory to write JSON output files
    #[arg(short, long, default_value = "./output")]
    pub output_dir: PathBuf,

    /// Game version string to embed in output metadata
    #[arg(long)]
    pub game_version: Option<String>,

    /// Specific categories to extract (default: all)
    #[arg(long, num_args = 1.., value_delimiter = ',')]
    pub categories: Vec<String>,

    /// Maximum concurrent category builds (overrides the configuration)
    #[arg(short, long)]
    pub workers: Option<usize>,
}

/// Arguments for the resolve command.
#[derive(Debug, Parser)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Localization key (e.g. TEXT_NATION_ROME)
    pub key: String,

    /// Grammatical form index (prints every form when omitted)
    #[arg(long)]
    pub form: Option<usize>,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_command() {
        let cli = Cli::parse_from([
            "quarry",
            "extract",
            "--game-path",
            "/games/OldWorld",
            "--categories",
            "technologies,units",
            "--game-version",
            "1.0.70000",
        ]);
        match cli.command {
            Command::Extract(args) => {
                assert_eq!(args.source.game_path, PathBuf::from("/games/OldWorld"));
                assert_eq!(args.categories, vec!["technologies", "units"]);
                assert_eq!(args.output_dir, PathBuf::from("./output"));
                assert_eq!(args.game_version.as_deref(), Some("1.0.70000"));
                assert!(args.source.language.is_none());
            }
            _ => panic!("Expected Extract command"),
        }
    }

    #[test]
    fn test_resolve_command_with_global_flags() {
        let cli = Cli::parse_from([
            "quarry",
            "resolve",
            "-g",
            "/games/OldWorld",
            "TEXT_NATION_ROME",
            "--form",
            "3",
            "--format",
            "json",
            "--no-color",
        ]);
        assert_eq!(cli.format, Some(CliFormat::Json));
        assert!(cli.no_color);
        match cli.command {
            Command::Resolve(args) => {
                assert_eq!(args.key, "TEXT_NATION_ROME");
                assert_eq!(args.form, Some(3));
            }
            _ => panic!("Expected Resolve command"),
        }
    }

    #[test]
    fn test_categories_command() {
        let cli = Cli::parse_from(["quarry", "categories", "-v"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Categories));
    }

    #[test]
    fn test_format_conversion() {
        let format: crate::config::OutputFormat = CliFormat::Json.into();
        assert!(matches!(format, crate::config::OutputFormat::Json));
    }
}
