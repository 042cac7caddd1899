use log::debug;

use crate::{AutoSolve, PuzzleGame, Verification};

/// Receives the completion report of a [`Round`].
///
/// `is_clean` is `true` only for an unaided solve.
pub trait ProgressSink {
    /// Called once when a round ends.
    fn on_complete(&mut self, score: u32, is_clean: bool);
}

impl<F> ProgressSink for F
where
    F: FnMut(u32, bool),
{
    fn on_complete(&mut self, score: u32, is_clean: bool) {
        self(score, is_clean);
    }
}

/// How a [`Round`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum RoundOutcome {
    /// The player solved the puzzle.
    Solved,
    /// The puzzle was auto-solved.
    Bypassed,
    /// The player gave up.
    Forfeited,
}

/// A single play-through of a game, reporting completion exactly once.
///
/// # Example
///
/// ```
/// use puzzlegate_game::{KeenGame, Round, RoundOutcome};
/// use puzzlegate_generator::{KeenGenerator, KeenParams, PuzzleSeed};
///
/// let generator = KeenGenerator::new(KeenParams::default())?;
/// let mut round = Round::new(KeenGame::new(generator.generate_with_seed(PuzzleSeed::from_u64(0))?));
///
/// let mut reports = Vec::new();
/// let mut sink = |score: u32, clean: bool| reports.push((score, clean));
/// round.bypass(&mut sink);
/// round.bypass(&mut sink);
/// assert_eq!(round.outcome(), Some(RoundOutcome::Bypassed));
/// assert_eq!(reports, vec![(20, false)]);
/// # Ok::<(), puzzlegate_generator::GeneratorError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Round<G> {
    game: G,
    outcome: Option<RoundOutcome>,
}

impl<G> Round<G>
where
    G: PuzzleGame,
{
    /// Starts a round for `game`.
    #[must_use]
    pub fn new(game: G) -> Self {
        Self {
            game,
            outcome: None,
        }
    }

    /// Returns the game being played.
    #[must_use]
    pub fn game(&self) -> &G {
        &self.game
    }

    /// Returns the game for player input.
    ///
    /// Input after completion is allowed but never reported again.
    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    /// Returns how the round ended, if it has.
    #[must_use]
    pub fn outcome(&self) -> Option<RoundOutcome> {
        self.outcome
    }

    /// Returns `true` once the round has ended.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.outcome.is_some()
    }

    /// Verifies the game and, on the first solved check, reports the full score
    /// as a clean completion.
    pub fn check<S>(&mut self, sink: &mut S) -> Verification<G::Report>
    where
        S: ProgressSink + ?Sized,
    {
        let verification = self.game.verify();
        if verification.solved && self.outcome.is_none() {
            let score = self.game.base_score();
            self.finish(RoundOutcome::Solved, score, true, sink);
        }
        verification
    }

    /// Ends the round without a score.
    pub fn forfeit<S>(&mut self, sink: &mut S)
    where
        S: ProgressSink + ?Sized,
    {
        if self.outcome.is_none() {
            self.finish(RoundOutcome::Forfeited, 0, false, sink);
        }
    }

    fn finish<S>(&mut self, outcome: RoundOutcome, score: u32, is_clean: bool, sink: &mut S)
    where
        S: ProgressSink + ?Sized,
    {
        debug!("round finished: {outcome:?}, score {score}, clean {is_clean}");
        self.outcome = Some(outcome);
        sink.on_complete(score, is_clean);
    }
}

impl<G> Round<G>
where
    G: AutoSolve,
{
    /// Auto-solves the game and reports a quarter of the base score.
    ///
    /// Does nothing once the round has ended.
    pub fn bypass<S>(&mut self, sink: &mut S)
    where
        S: ProgressSink + ?Sized,
    {
        if self.outcome.is_some() {
            return;
        }
        self.game.auto_solve();
        let score = self.game.base_score() / 4;
        self.finish(RoundOutcome::Bypassed, score, false, sink);
    }
}
