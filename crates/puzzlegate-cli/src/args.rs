use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use puzzlegate_generator::{PuzzleConfig, PuzzleSeed};

/// Generate, print and batch-check puzzlegate puzzles.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// JSON file with generator parameters.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a Keen puzzle and print it with its solution.
    Keen(GenerateArgs),
    /// Generate a region map and print it with its colouring.
    Map(GenerateArgs),
    /// Generate a Bridges puzzle and print it with its solution.
    Bridges(GenerateArgs),
    /// Generate an Untangle graph and print both layouts.
    Untangle(GenerateArgs),
    /// Generate puzzles of every game in parallel and validate them.
    Check(CheckArgs),
}

/// Options of the generating subcommands.
#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Seed to reproduce, as 64 hex digits. Random if omitted.
    #[arg(long, value_name = "HEX")]
    pub seed: Option<PuzzleSeed>,

    /// Grid size (square side for Keen, width and height otherwise) or node count
    /// for Untangle. Overrides the config file.
    #[arg(long, value_name = "N")]
    pub size: Option<u8>,

    /// Print the puzzle as JSON instead of ASCII.
    #[arg(long)]
    pub json: bool,
}

/// Options of the `check` subcommand.
#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    /// Puzzles to generate per game.
    #[arg(long, value_name = "N", default_value_t = 100)]
    pub count: u64,

    /// First seed; puzzle `i` uses `PuzzleSeed::from_u64(first_seed + i)`.
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub first_seed: u64,
}

/// A puzzle kind selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameKind {
    /// Keen.
    Keen,
    /// Region map.
    Map,
    /// Bridges.
    Bridges,
    /// Untangle.
    Untangle,
}

impl GameKind {
    /// Applies a `--size` override to the parameters of this game.
    pub fn apply_size(self, config: &mut PuzzleConfig, size: u8) {
        match self {
            Self::Keen => config.keen.size = size,
            Self::Map => {
                config.map.width = size;
                config.map.height = size;
            }
            Self::Bridges => {
                config.bridges.width = size;
                config.bridges.height = size;
            }
            Self::Untangle => config.untangle.nodes = usize::from(size),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate() {
        let seed = PuzzleSeed::from_u64(9);
        let seed_text = seed.to_string();
        let cli = Cli::try_parse_from([
            "puzzlegate",
            "bridges",
            "--seed",
            seed_text.as_str(),
            "--json",
            "--config",
            "params.json",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("params.json")));
        let Command::Bridges(args) = cli.command else {
            panic!("expected the bridges subcommand");
        };
        assert_eq!(args.seed, Some(seed));
        assert!(args.json);
        assert_eq!(args.size, None);
    }

    #[test]
    fn test_parse_rejects_bad_seed() {
        assert!(Cli::try_parse_from(["puzzlegate", "keen", "--seed", "xyz"]).is_err());
    }

    #[test]
    fn test_size_override() {
        let mut config = PuzzleConfig::default();
        GameKind::Map.apply_size(&mut config, 9);
        GameKind::Untangle.apply_size(&mut config, 10);
        assert_eq!((config.map.width, config.map.height), (9, 9));
        assert_eq!(config.untangle.nodes, 10);
        assert_eq!(config.keen, PuzzleConfig::default().keen);
    }
}
