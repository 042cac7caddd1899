use puzzlegate_generator::{MapPuzzle, RegionId};
use puzzlegate_solver::Color;

use crate::{
    AutoSolve, GameError, InputBlockReason, InputOperation, PuzzleGame, Verification,
};

/// Points per region for a clean map solve.
pub const MAP_POINTS_PER_REGION: u32 = 10;

/// Findings of [`MapGame`] verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapReport {
    /// Regions without a colour.
    pub uncolored: Vec<RegionId>,
    /// Adjacent region pairs `(a, b)`, `a < b`, sharing a colour.
    pub conflicts: Vec<(RegionId, RegionId)>,
}

/// A region map colouring session.
///
/// Regions with a clue start with the clue colour and cannot be changed.
///
/// # Example
///
/// ```
/// use puzzlegate_game::{InputOperation, MapGame};
/// use puzzlegate_generator::{MapGenerator, MapParams, PuzzleSeed};
///
/// let params = MapParams { clue_probability: 0.0, ..MapParams::default() };
/// let mut game = MapGame::new(MapGenerator::new(params)?.generate_with_seed(PuzzleSeed::from_u64(2))?);
///
/// assert_eq!(game.color(0), Ok(None));
/// assert_eq!(game.tap_region(0), Ok(InputOperation::Set));
/// assert_eq!(game.color(0).unwrap().map(u8::from), Some(0));
/// # Ok::<(), puzzlegate_generator::GeneratorError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MapGame {
    puzzle: MapPuzzle,
    colors: Vec<Option<Color>>,
}

impl MapGame {
    /// Creates a session with only the clue regions coloured.
    #[must_use]
    pub fn new(puzzle: MapPuzzle) -> Self {
        let colors = puzzle.clues().to_vec();
        Self { puzzle, colors }
    }

    /// Returns the puzzle being played.
    #[must_use]
    pub fn puzzle(&self) -> &MapPuzzle {
        &self.puzzle
    }

    /// Returns the colours of all regions.
    #[must_use]
    pub fn colors(&self) -> &[Option<Color>] {
        &self.colors
    }

    /// Returns the colour of `region`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UnknownRegion`] if there is no such region.
    pub fn color(&self, region: RegionId) -> Result<Option<Color>, GameError> {
        self.colors
            .get(region)
            .copied()
            .ok_or(GameError::UnknownRegion { id: region })
    }

    fn check_editable(&self, region: RegionId) -> Result<(), GameError> {
        match self.puzzle.clues().get(region) {
            None => Err(GameError::UnknownRegion { id: region }),
            Some(Some(_)) => Err(InputBlockReason::ClueRegion.into()),
            Some(None) => Ok(()),
        }
    }

    /// Advances the colour of `region`: unset, 0, 1, 2, 3, unset.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UnknownRegion`] for an unknown region and
    /// [`InputBlockReason::ClueRegion`] for a clued one.
    pub fn tap_region(&mut self, region: RegionId) -> Result<InputOperation, GameError> {
        self.check_editable(region)?;
        let next = match self.colors[region] {
            None => Color::new(0),
            Some(color) => color.next(),
        };
        self.colors[region] = next;
        Ok(if next.is_some() {
            InputOperation::Set
        } else {
            InputOperation::Removed
        })
    }

    /// Sets or clears the colour of `region`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UnknownRegion`] for an unknown region and
    /// [`InputBlockReason::ClueRegion`] for a clued one.
    pub fn set_color(
        &mut self,
        region: RegionId,
        color: Option<Color>,
    ) -> Result<InputOperation, GameError> {
        self.check_editable(region)?;
        let previous = std::mem::replace(&mut self.colors[region], color);
        Ok(if previous == color {
            InputOperation::NoOp
        } else if color.is_some() {
            InputOperation::Set
        } else {
            InputOperation::Removed
        })
    }
}

impl PuzzleGame for MapGame {
    type Report = MapReport;

    /// Solved when every region is coloured and no neighbours share a colour.
    fn verify(&self) -> Verification<MapReport> {
        let uncolored = self
            .colors
            .iter()
            .enumerate()
            .filter(|(_, color)| color.is_none())
            .map(|(region, _)| region)
            .collect::<Vec<_>>();
        let conflicts = self
            .puzzle
            .adjacency()
            .edges()
            .filter(|&(a, b)| self.colors[a].is_some() && self.colors[a] == self.colors[b])
            .collect::<Vec<_>>();

        Verification::new(
            uncolored.is_empty() && conflicts.is_empty(),
            MapReport {
                uncolored,
                conflicts,
            },
        )
    }

    fn base_score(&self) -> u32 {
        let regions = u32::try_from(self.puzzle.region_count()).unwrap_or(u32::MAX);
        regions.saturating_mul(MAP_POINTS_PER_REGION)
    }
}

impl AutoSolve for MapGame {
    /// Colours every region with the solved colour.
    fn auto_solve(&mut self) {
        self.colors = self.puzzle.solution().iter().copied().map(Some).collect();
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use puzzlegate_generator::{MapGenerator, MapParams, PuzzleSeed};

    use super::*;

    fn game(seed: u64, clue_probability: f64) -> MapGame {
        let params = MapParams {
            clue_probability,
            ..MapParams::default()
        };
        let generator = MapGenerator::new(params).unwrap();
        MapGame::new(generator.generate_with_seed(PuzzleSeed::from_u64(seed)).unwrap())
    }

    #[test]
    fn test_tap_cycles_through_colors() {
        let mut game = game(0, 0.0);
        let expected = [
            (InputOperation::Set, Some(0)),
            (InputOperation::Set, Some(1)),
            (InputOperation::Set, Some(2)),
            (InputOperation::Set, Some(3)),
            (InputOperation::Removed, None),
            (InputOperation::Set, Some(0)),
        ];
        for (operation, color) in expected {
            assert_eq!(game.tap_region(3), Ok(operation));
            assert_eq!(game.color(3).unwrap().map(u8::from), color);
        }
    }

    #[test]
    fn test_clue_regions_never_change() {
        let mut game = game(1, 1.0);
        let clues = game.colors().to_vec();
        assert!(clues.iter().all(Option::is_some));
        for _ in 0..6 {
            assert_eq!(
                game.tap_region(0),
                Err(GameError::Blocked(InputBlockReason::ClueRegion))
            );
        }
        assert_eq!(
            game.set_color(0, None),
            Err(GameError::Blocked(InputBlockReason::ClueRegion))
        );
        assert_eq!(game.colors(), clues.as_slice());
        assert!(game.verify().solved);
    }

    #[test]
    fn test_set_color_operations() {
        let mut game = game(2, 0.0);
        let red = Color::new(0);
        assert_eq!(game.set_color(1, red), Ok(InputOperation::Set));
        assert_eq!(game.set_color(1, red), Ok(InputOperation::NoOp));
        assert_eq!(game.set_color(1, None), Ok(InputOperation::Removed));
        assert_eq!(game.set_color(99, red), Err(GameError::UnknownRegion { id: 99 }));
    }

    #[test]
    fn test_conflicts_are_reported() {
        let mut game = game(3, 0.0);
        game.auto_solve();
        assert!(game.verify().solved);

        let (a, b) = game.puzzle().adjacency().edges().next().unwrap();
        let color_b = game.color(b).unwrap();
        game.set_color(a, color_b).unwrap();

        let verification = game.verify();
        assert!(!verification.solved);
        assert!(verification.details.conflicts.contains(&(a, b)));
        assert!(verification.details.uncolored.is_empty());
        assert_eq!(verification, game.verify());
    }

    proptest! {
        #[test]
        fn prop_taps_leave_clues_intact(seed in any::<u64>(), taps in prop::collection::vec(0usize..12, 0..40)) {
            let mut game = game(seed, 0.3);
            let clues = game.puzzle().clues().to_vec();
            for region in taps {
                let result = game.tap_region(region);
                prop_assert_eq!(result.is_err(), clues[region].is_some());
            }
            for (color, clue) in game.colors().iter().zip(&clues) {
                if clue.is_some() {
                    prop_assert_eq!(color, clue);
                }
            }
        }
    }
}
