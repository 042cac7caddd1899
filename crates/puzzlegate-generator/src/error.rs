use puzzlegate_solver::SolverError;

/// Errors that can occur while generating a puzzle.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum GeneratorError {
    /// Generator parameters are out of the supported range.
    #[display("invalid parameters: {reason}")]
    InvalidParameters {
        /// What is wrong with the parameters.
        reason: &'static str,
    },
    /// A backtracking search failed.
    #[display("search failed: {_0}")]
    #[from]
    Solver(SolverError),
    /// The map could not be coloured within the retry budget.
    #[display("map colouring failed after {attempts} attempts")]
    ColoringFailed {
        /// Number of maps generated before giving up.
        attempts: u32,
    },
    /// Island growth kept stalling before reaching the target island count.
    #[display("bridge growth stalled after {restarts} restarts")]
    BridgesStalled {
        /// Number of restarts performed before giving up.
        restarts: u32,
    },
}

/// Errors that can occur when parsing a [`PuzzleSeed`](crate::PuzzleSeed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseSeedError {
    /// The string does not have exactly 64 hex digits.
    #[display("expected 64 hex digits, got {len} characters")]
    InvalidLength {
        /// Length of the rejected string.
        len: usize,
    },
    /// The string contains a character that is not a hex digit.
    #[display("invalid hex digit at position {index}")]
    InvalidDigit {
        /// Byte offset of the offending character.
        index: usize,
    },
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_solver_error_converts_and_is_source() {
        let err = GeneratorError::from(SolverError::BudgetExhausted { attempts: 7 });
        assert_eq!(
            err,
            GeneratorError::Solver(SolverError::BudgetExhausted { attempts: 7 })
        );
        assert!(err.source().is_some());
        assert_eq!(
            err.to_string(),
            "search failed: search budget exhausted after 7 attempts"
        );
    }

    #[test]
    fn test_counted_failures_have_no_source() {
        let coloring = GeneratorError::ColoringFailed { attempts: 3 };
        let stalled = GeneratorError::BridgesStalled { restarts: 3 };
        assert!(coloring.source().is_none());
        assert!(stalled.source().is_none());
        assert_ne!(coloring, stalled);
    }
}
