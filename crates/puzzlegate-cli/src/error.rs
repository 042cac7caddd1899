use std::{io, path::PathBuf};

use puzzlegate_generator::{GeneratorError, PuzzleSeed};

/// Errors reported by the command-line front end.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum CliError {
    /// The config file could not be read.
    #[display("failed to read {}: {source}", path.display())]
    ReadConfig {
        /// Path given on the command line.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// Config parsing or puzzle serialization failed.
    #[display("json error: {_0}")]
    #[from]
    Json(serde_json::Error),
    /// Generation failed or the config is invalid.
    #[display("{_0}")]
    #[from]
    Generator(GeneratorError),
    /// A generated puzzle broke one of its guarantees.
    #[display("{game} puzzle {seed} failed check: {property}")]
    CheckFailed {
        /// Game name.
        game: &'static str,
        /// Seed that reproduces the puzzle.
        seed: PuzzleSeed,
        /// Violated property.
        property: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_mark_wraps_sources() {
        fn parse() -> Result<u8, CliError> {
            Ok(serde_json::from_str::<u8>("no")?)
        }
        assert!(matches!(parse(), Err(CliError::Json(_))));

        let err = CliError::from(GeneratorError::InvalidParameters { reason: "size" });
        assert_eq!(err.to_string(), "invalid parameters: size");
    }
}
