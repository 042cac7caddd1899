//! Command-line front end for the puzzlegate generators.
//!
//! The `puzzlegate` binary prints one generated puzzle per game subcommand, as
//! ASCII or JSON, and `puzzlegate check` batch-validates many puzzles in
//! parallel. Generator parameters come from a [`PuzzleConfig`] JSON file and can
//! be overridden by flags.

use std::{fs, path::Path};

use log::debug;
use puzzlegate_generator::{
    BridgesGenerator, KeenGenerator, MapGenerator, PuzzleConfig, PuzzleSeed, UntangleGenerator,
};

pub use self::{args::*, check::*, error::*, render::*};

mod args;
mod check;
mod error;
mod render;

/// Loads generator parameters, falling back to the defaults without a file.
///
/// Missing fields in the file take their default values.
///
/// # Errors
///
/// Returns [`CliError::ReadConfig`] if the file cannot be read, [`CliError::Json`]
/// if it is not a valid config, and [`CliError::Generator`] if a parameter is out
/// of range.
pub fn load_config(path: Option<&Path>) -> Result<PuzzleConfig, CliError> {
    let Some(path) = path else {
        return Ok(PuzzleConfig::default());
    };
    let text = fs::read_to_string(path).map_err(|source| CliError::ReadConfig {
        path: path.to_owned(),
        source,
    })?;
    let config = serde_json::from_str::<PuzzleConfig>(&text)?;
    config.validate()?;
    debug!("loaded config from {}", path.display());
    Ok(config)
}

/// Generates one puzzle of `kind` and renders it as ASCII or pretty JSON.
///
/// # Errors
///
/// Returns [`CliError::Generator`] if the parameters are invalid or generation
/// gives up, and [`CliError::Json`] if serialization fails.
pub fn generate(
    kind: GameKind,
    config: &PuzzleConfig,
    args: &GenerateArgs,
) -> Result<String, CliError> {
    let mut config = config.clone();
    if let Some(size) = args.size {
        kind.apply_size(&mut config, size);
    }
    let seed = args.seed.unwrap_or_else(PuzzleSeed::random);
    debug!("generating {kind:?} with seed {seed}");

    let text = match kind {
        GameKind::Keen => {
            let puzzle = KeenGenerator::new(config.keen)?.generate_with_seed(seed)?;
            render_output(&puzzle, args.json, || KeenView(&puzzle).to_string())?
        }
        GameKind::Map => {
            let puzzle = MapGenerator::new(config.map)?.generate_with_seed(seed)?;
            render_output(&puzzle, args.json, || MapView(&puzzle).to_string())?
        }
        GameKind::Bridges => {
            let puzzle = BridgesGenerator::new(config.bridges)?.generate_with_seed(seed)?;
            render_output(&puzzle, args.json, || BridgesView(&puzzle).to_string())?
        }
        GameKind::Untangle => {
            let puzzle = UntangleGenerator::new(config.untangle)?.generate_with_seed(seed)?;
            render_output(&puzzle, args.json, || UntangleView(&puzzle).to_string())?
        }
    };
    Ok(text)
}

fn render_output<T, F>(puzzle: &T, json: bool, ascii: F) -> Result<String, CliError>
where
    T: serde::Serialize,
    F: FnOnce() -> String,
{
    if json {
        Ok(serde_json::to_string_pretty(puzzle)?)
    } else {
        Ok(ascii())
    }
}

/// Runs a parsed command line, printing results to stdout.
///
/// # Errors
///
/// Returns the first error from loading the config, generating or checking.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    let config = load_config(cli.config.as_deref())?;
    let (kind, args) = match &cli.command {
        Command::Keen(args) => (GameKind::Keen, args),
        Command::Map(args) => (GameKind::Map, args),
        Command::Bridges(args) => (GameKind::Bridges, args),
        Command::Untangle(args) => (GameKind::Untangle, args),
        Command::Check(args) => {
            check_all(&config, args.first_seed, args.count)?;
            println!("all {} puzzles per game passed", args.count);
            return Ok(());
        }
    };
    println!("{}", generate(kind, &config, args)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn args(seed: u64, json: bool) -> GenerateArgs {
        GenerateArgs {
            seed: Some(PuzzleSeed::from_u64(seed)),
            size: None,
            json,
        }
    }

    #[test]
    fn test_same_seed_prints_same_puzzle() {
        let config = PuzzleConfig::default();
        for kind in [GameKind::Keen, GameKind::Map, GameKind::Bridges, GameKind::Untangle] {
            let first = generate(kind, &config, &args(7, false)).unwrap();
            let second = generate(kind, &config, &args(7, false)).unwrap();
            assert_eq!(first, second);
            assert!(first.ends_with(&PuzzleSeed::from_u64(7).to_string()));
        }
    }

    #[test]
    fn test_json_output_parses_back() {
        let config = PuzzleConfig::default();
        let text = generate(GameKind::Keen, &config, &args(3, true)).unwrap();
        let puzzle: puzzlegate_generator::KeenPuzzle = serde_json::from_str(&text).unwrap();
        assert_eq!(puzzle.seed(), PuzzleSeed::from_u64(3));
    }

    #[test]
    fn test_size_flag_overrides_config() {
        let config = PuzzleConfig::default();
        let args = GenerateArgs {
            size: Some(5),
            ..args(1, true)
        };
        let text = generate(GameKind::Keen, &config, &args).unwrap();
        let puzzle: puzzlegate_generator::KeenPuzzle = serde_json::from_str(&text).unwrap();
        assert_eq!(puzzle.size(), 5);
    }

    #[test]
    fn test_missing_config_file_is_reported() {
        let path = PathBuf::from("/nonexistent/puzzlegate.json");
        let err = load_config(Some(path.as_path())).unwrap_err();
        assert!(matches!(err, CliError::ReadConfig { .. }));
        assert_eq!(load_config(None).unwrap(), PuzzleConfig::default());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: PuzzleConfig = serde_json::from_str(r#"{"keen": {"size": 6}}"#).unwrap();
        assert_eq!(config.keen.size, 6);
        assert_eq!(config.keen.max_cage_size, 3);
        assert_eq!(config.map, PuzzleConfig::default().map);
    }
}
