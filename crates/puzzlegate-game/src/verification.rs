/// Result of checking a game state.
///
/// `details` carries the game-specific report, e.g. which cells conflict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification<D> {
    /// Whether the current state is a valid solution.
    pub solved: bool,
    /// Game-specific findings.
    pub details: D,
}

impl<D> Verification<D> {
    /// Creates a verification result.
    #[must_use]
    pub fn new(solved: bool, details: D) -> Self {
        Self { solved, details }
    }

    /// Returns `true` if the state is solved.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.solved
    }
}

/// A game session that can check its state and report a score.
pub trait PuzzleGame {
    /// Game-specific verification details.
    type Report;

    /// Checks the current state. Repeated calls on the same state agree.
    fn verify(&self) -> Verification<Self::Report>;

    /// Score for solving the puzzle unaided.
    fn base_score(&self) -> u32;
}

/// A game session that can apply its known solution.
pub trait AutoSolve: PuzzleGame {
    /// Replaces the player state with the generator's solution.
    fn auto_solve(&mut self);
}
