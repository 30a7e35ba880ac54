//! CLI argument definitions for Kiln.
//!
//! Uses `clap` derive macros to define the command surface. Each command
//! corresponds to a handler in the [`super::commands`] module.

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "kiln",
    version,
    about = "A package manager with a SAT-based dependency resolver",
    long_about = "Kiln resolves the version ranges in Kiln.toml against a registry index, \
                  picking exactly one version of every package so that all ranges hold at once."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Registry index (path or http(s) URL), overriding Kiln.toml and the global config
    #[arg(long, global = true, env = "KILN_REGISTRY")]
    pub registry: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve dependencies and print the chosen versions
    Resolve {
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Re-resolve all dependencies and rewrite Kiln.lock
    Lock,

    /// Display the dependency tree
    Tree {
        /// Maximum depth to display
        #[arg(long)]
        depth: Option<usize>,
        /// Show the path from the project to a dependency
        #[arg(long, conflicts_with = "inverted")]
        why: Option<String>,
        /// Show what depends on a dependency
        #[arg(long, value_name = "NAME")]
        inverted: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

/// Parse command-line arguments.
pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_tree_flags() {
        let cli = Cli::try_parse_from(["kiln", "tree", "--depth", "2", "--why", "fmt"]).unwrap();
        match cli.command {
            Command::Tree { depth, why, inverted } => {
                assert_eq!(depth, Some(2));
                assert_eq!(why.as_deref(), Some("fmt"));
                assert!(inverted.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn why_and_inverted_conflict() {
        let result = Cli::try_parse_from(["kiln", "tree", "--why", "a", "--inverted", "b"]);
        assert!(result.is_err());
    }

    #[test]
    fn registry_is_global() {
        let cli =
            Cli::try_parse_from(["kiln", "resolve", "--format", "json", "--registry", "idx.toml"])
                .unwrap();
        assert_eq!(cli.registry.as_deref(), Some("idx.toml"));
        assert!(matches!(cli.command, Command::Resolve { format: Format::Json }));
    }
}
