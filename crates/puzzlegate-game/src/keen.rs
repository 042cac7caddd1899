use puzzlegate_core::{Position, ValueSet};
use puzzlegate_generator::KeenPuzzle;

use crate::{
    AutoSolve, GameError, InputBlockReason, InputOperation, PuzzleGame, Verification,
};

/// Points per cell for a clean Keen solve.
pub const KEEN_POINTS_PER_CELL: u32 = 5;

/// Findings of [`KeenGame`] verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeenReport {
    /// Number of cells holding a value.
    pub filled: usize,
    /// Cells whose value repeats in their row or column, row-major.
    pub row_column_conflicts: Vec<Position>,
    /// Ids of fully filled cages whose clue is not met.
    pub unsatisfied_cages: Vec<usize>,
}

/// A Keen play session.
///
/// Cells hold either a value or a set of pencil notes. Cage clues are only
/// checked once every cell of the cage is filled.
///
/// # Example
///
/// ```
/// use puzzlegate_core::Position;
/// use puzzlegate_game::{KeenGame, PuzzleGame};
/// use puzzlegate_generator::{KeenGenerator, KeenParams, PuzzleSeed};
///
/// let generator = KeenGenerator::new(KeenParams::default())?;
/// let mut game = KeenGame::new(generator.generate_with_seed(PuzzleSeed::from_u64(1))?);
///
/// let origin = Position::new(0, 0);
/// let value = game.puzzle().solution().get(origin);
/// game.set_value(origin, value).unwrap();
/// assert_eq!(game.value(origin), Ok(Some(value)));
/// assert!(!game.verify().solved);
/// # Ok::<(), puzzlegate_generator::GeneratorError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct KeenGame {
    puzzle: KeenPuzzle,
    values: Vec<Option<u8>>,
    notes: Vec<ValueSet>,
}

impl KeenGame {
    /// Creates an empty session for `puzzle`.
    #[must_use]
    pub fn new(puzzle: KeenPuzzle) -> Self {
        let len = puzzle.grid_size().len();
        Self {
            puzzle,
            values: vec![None; len],
            notes: vec![ValueSet::new(); len],
        }
    }

    /// Returns the puzzle being played.
    #[must_use]
    pub fn puzzle(&self) -> &KeenPuzzle {
        &self.puzzle
    }

    fn index(&self, pos: Position) -> Result<usize, GameError> {
        let size = self.puzzle.grid_size();
        if size.contains(pos) {
            Ok(size.index_of(pos))
        } else {
            Err(GameError::PositionOutOfRange { pos })
        }
    }

    fn check_value(&self, value: u8) -> Result<(), GameError> {
        let max = self.puzzle.size();
        if (1..=max).contains(&value) {
            Ok(())
        } else {
            Err(GameError::ValueOutOfRange { value, max })
        }
    }

    /// Returns the value at `pos`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PositionOutOfRange`] if `pos` is outside the grid.
    pub fn value(&self, pos: Position) -> Result<Option<u8>, GameError> {
        Ok(self.values[self.index(pos)?])
    }

    /// Returns the pencil notes at `pos`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PositionOutOfRange`] if `pos` is outside the grid.
    pub fn notes(&self, pos: Position) -> Result<ValueSet, GameError> {
        Ok(self.notes[self.index(pos)?])
    }

    /// Places `value` at `pos`, replacing any value or notes there.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PositionOutOfRange`] or [`GameError::ValueOutOfRange`]
    /// for input outside the puzzle.
    pub fn set_value(&mut self, pos: Position, value: u8) -> Result<InputOperation, GameError> {
        let index = self.index(pos)?;
        self.check_value(value)?;
        if self.values[index] == Some(value) {
            return Ok(InputOperation::NoOp);
        }
        self.values[index] = Some(value);
        self.notes[index] = ValueSet::new();
        Ok(InputOperation::Set)
    }

    /// Removes the value or notes at `pos`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PositionOutOfRange`] if `pos` is outside the grid.
    pub fn clear_cell(&mut self, pos: Position) -> Result<InputOperation, GameError> {
        let index = self.index(pos)?;
        if self.values[index].take().is_some() {
            return Ok(InputOperation::Removed);
        }
        if !self.notes[index].is_empty() {
            self.notes[index] = ValueSet::new();
            return Ok(InputOperation::Removed);
        }
        Ok(InputOperation::NoOp)
    }

    /// Toggles the pencil note `value` at `pos`.
    ///
    /// # Errors
    ///
    /// Returns [`InputBlockReason::FilledCell`] if the cell holds a value, and
    /// [`GameError::PositionOutOfRange`] or [`GameError::ValueOutOfRange`] for input
    /// outside the puzzle.
    pub fn toggle_note(&mut self, pos: Position, value: u8) -> Result<InputOperation, GameError> {
        let index = self.index(pos)?;
        self.check_value(value)?;
        if self.values[index].is_some() {
            return Err(InputBlockReason::FilledCell.into());
        }
        if self.notes[index].toggle(value) {
            Ok(InputOperation::Set)
        } else {
            Ok(InputOperation::Removed)
        }
    }
}

impl PuzzleGame for KeenGame {
    type Report = KeenReport;

    /// Checks rows, columns and fully filled cages.
    fn verify(&self) -> Verification<KeenReport> {
        let size = self.puzzle.grid_size();
        let value_at = |pos: Position| self.values[size.index_of(pos)];

        let filled = self.values.iter().flatten().count();
        let peers = |pos: Position| {
            size.positions()
                .filter(move |&other| other != pos && (other.same_row(pos) || other.same_column(pos)))
        };
        let row_column_conflicts = size
            .positions()
            .filter(|&pos| {
                value_at(pos).is_some_and(|value| peers(pos).any(|other| value_at(other) == Some(value)))
            })
            .collect::<Vec<_>>();
        let unsatisfied_cages = self
            .puzzle
            .cages()
            .iter()
            .filter(|cage| {
                cage.cells
                    .iter()
                    .map(|&pos| value_at(pos))
                    .collect::<Option<Vec<_>>>()
                    .is_some_and(|values| !cage.is_satisfied_by(&values))
            })
            .map(|cage| cage.id)
            .collect::<Vec<_>>();

        let solved = filled == size.len()
            && row_column_conflicts.is_empty()
            && unsatisfied_cages.is_empty();
        Verification::new(
            solved,
            KeenReport {
                filled,
                row_column_conflicts,
                unsatisfied_cages,
            },
        )
    }

    fn base_score(&self) -> u32 {
        let cells = u32::try_from(self.puzzle.grid_size().len()).unwrap_or(u32::MAX);
        cells.saturating_mul(KEEN_POINTS_PER_CELL)
    }
}

impl AutoSolve for KeenGame {
    /// Fills every cell with the solved value and clears all notes.
    fn auto_solve(&mut self) {
        let solution = self.puzzle.solution();
        self.values = solution.cells().iter().copied().map(Some).collect();
        self.notes.fill(ValueSet::new());
    }
}
