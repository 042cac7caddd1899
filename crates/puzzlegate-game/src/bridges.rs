use std::collections::BTreeMap;

use puzzlegate_core::Adjacency;
use puzzlegate_generator::{Bridge, BridgesPuzzle, Multiplicity};

use crate::{
    AutoSolve, GameError, InputBlockReason, InputOperation, PuzzleGame, Verification,
};

/// Points per island for a clean Bridges solve.
pub const BRIDGES_POINTS_PER_ISLAND: u32 = 10;

/// Findings of [`BridgesGame`] verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgesReport {
    /// Ids of islands whose bridge count differs from the required count.
    pub unsatisfied_islands: Vec<usize>,
    /// Whether the placed bridges connect every island.
    pub connected: bool,
}

/// A Bridges play session.
///
/// Selecting a pair of islands cycles the bridge between them through
/// single, double and removed.
///
/// # Example
///
/// ```
/// use puzzlegate_game::{BridgesGame, InputOperation};
/// use puzzlegate_generator::{BridgesGenerator, BridgesParams, PuzzleSeed};
///
/// let generator = BridgesGenerator::new(BridgesParams::default())?;
/// let puzzle = generator.generate_with_seed(PuzzleSeed::from_u64(5))?;
/// let bridge = puzzle.solution()[0];
/// let mut game = BridgesGame::new(puzzle);
///
/// assert_eq!(game.toggle_bridge(bridge.a, bridge.b), Ok(InputOperation::Set));
/// assert_eq!(game.current_count(bridge.a), Ok(1));
/// # Ok::<(), puzzlegate_generator::GeneratorError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BridgesGame {
    puzzle: BridgesPuzzle,
    bridges: BTreeMap<(usize, usize), Multiplicity>,
}

impl BridgesGame {
    /// Creates a session with no bridges placed.
    #[must_use]
    pub fn new(puzzle: BridgesPuzzle) -> Self {
        Self {
            puzzle,
            bridges: BTreeMap::new(),
        }
    }

    /// Returns the puzzle being played.
    #[must_use]
    pub fn puzzle(&self) -> &BridgesPuzzle {
        &self.puzzle
    }

    /// Returns the placed bridges, ordered by endpoints.
    pub fn bridges(&self) -> impl Iterator<Item = Bridge> + '_ {
        self.bridges
            .iter()
            .map(|(&(a, b), &multiplicity)| Bridge::new(a, b, multiplicity))
    }

    fn check_island(&self, id: usize) -> Result<(), GameError> {
        if id < self.puzzle.islands().len() {
            Ok(())
        } else {
            Err(GameError::UnknownIsland { id })
        }
    }

    /// Returns the total multiplicity of the bridges placed at `island`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UnknownIsland`] if there is no such island.
    pub fn current_count(&self, island: usize) -> Result<u8, GameError> {
        self.check_island(island)?;
        Ok(self.count_at(island))
    }

    fn count_at(&self, island: usize) -> u8 {
        self.bridges
            .iter()
            .filter(|&(&(a, b), _)| a == island || b == island)
            .map(|(_, multiplicity)| multiplicity.count())
            .sum()
    }

    /// Reports what [`BridgesGame::toggle_bridge`] would do without changing anything.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UnknownIsland`] for an unknown island, and
    /// [`GameError::Blocked`] if the bridge cannot be placed: the islands are the
    /// same, not aligned, have an island between them, or a placed bridge crosses
    /// the path.
    pub fn toggle_bridge_capability(&self, a: usize, b: usize) -> Result<InputOperation, GameError> {
        self.check_island(a)?;
        self.check_island(b)?;
        if a == b {
            return Err(InputBlockReason::SameIsland.into());
        }
        let key = (a.min(b), a.max(b));
        match self.bridges.get(&key) {
            Some(Multiplicity::Single) => return Ok(InputOperation::Set),
            Some(Multiplicity::Double) => return Ok(InputOperation::Removed),
            None => {}
        }

        let Some(path) = self.puzzle.path(a, b) else {
            return Err(InputBlockReason::NotAligned.into());
        };
        if self
            .puzzle
            .islands()
            .iter()
            .any(|island| path.covers(island.position))
        {
            return Err(InputBlockReason::IslandInTheWay.into());
        }
        let new = Bridge::new(a, b, Multiplicity::Single);
        if self
            .bridges()
            .any(|placed| self.puzzle.bridge_paths_cross(&new, &placed))
        {
            return Err(InputBlockReason::BridgeCrossing.into());
        }
        Ok(InputOperation::Set)
    }

    /// Cycles the bridge between `a` and `b`: none, single, double, none.
    ///
    /// # Errors
    ///
    /// Same as [`BridgesGame::toggle_bridge_capability`]. A rejected toggle leaves
    /// the bridges unchanged.
    pub fn toggle_bridge(&mut self, a: usize, b: usize) -> Result<InputOperation, GameError> {
        let operation = self.toggle_bridge_capability(a, b)?;
        let key = (a.min(b), a.max(b));
        match self.bridges.get(&key) {
            None => {
                self.bridges.insert(key, Multiplicity::Single);
            }
            Some(Multiplicity::Single) => {
                self.bridges.insert(key, Multiplicity::Double);
            }
            Some(Multiplicity::Double) => {
                self.bridges.remove(&key);
            }
        }
        Ok(operation)
    }

    /// Removes every placed bridge.
    pub fn clear(&mut self) {
        self.bridges.clear();
    }
}

impl PuzzleGame for BridgesGame {
    type Report = BridgesReport;

    /// Solved when every island has its required count and the bridges connect
    /// all islands.
    fn verify(&self) -> Verification<BridgesReport> {
        let islands = self.puzzle.islands();
        let unsatisfied_islands = islands
            .iter()
            .filter(|island| self.count_at(island.id) != island.required)
            .map(|island| island.id)
            .collect::<Vec<_>>();
        let connected = Adjacency::from_edges(islands.len(), self.bridges.keys().copied())
            .is_connected();

        Verification::new(
            unsatisfied_islands.is_empty() && connected,
            BridgesReport {
                unsatisfied_islands,
                connected,
            },
        )
    }

    fn base_score(&self) -> u32 {
        let islands = u32::try_from(self.puzzle.islands().len()).unwrap_or(u32::MAX);
        islands.saturating_mul(BRIDGES_POINTS_PER_ISLAND)
    }
}

impl AutoSolve for BridgesGame {
    /// Replaces the placed bridges with the solution.
    fn auto_solve(&mut self) {
        self.bridges = self
            .puzzle
            .solution()
            .iter()
            .map(|bridge| ((bridge.a, bridge.b), bridge.multiplicity))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use puzzlegate_core::{GridSize, Position};
    use puzzlegate_generator::{BridgesGenerator, BridgesParams, Island, PuzzleSeed};

    use super::*;

    fn generated(seed: u64) -> BridgesGame {
        let generator = BridgesGenerator::new(BridgesParams::default()).unwrap();
        BridgesGame::new(generator.generate_with_seed(PuzzleSeed::from_u64(seed)).unwrap())
    }

    /// A plus shape: islands left/right on row 2 and top/bottom on column 2,
    /// with a corner island sharing row 0 with the top island.
    ///
    /// ```text
    /// . . 1 . 4
    /// . . . . .
    /// 0 . . . 2
    /// . . . . .
    /// . . 3 . .
    /// ```
    fn plus() -> BridgesGame {
        let island = |id, x, y| Island {
            id,
            position: Position::new(x, y),
            required: 1,
        };
        let islands = vec![
            island(0, 0, 2),
            island(1, 2, 0),
            island(2, 4, 2),
            island(3, 2, 4),
            island(4, 4, 0),
        ];
        let puzzle =
            BridgesPuzzle::new(GridSize::new(5, 5), islands, Vec::new(), PuzzleSeed::from_u64(0))
                .unwrap();
        BridgesGame::new(puzzle)
    }

    #[test]
    fn test_toggle_cycles_single_double_removed() {
        let mut game = generated(0);
        let bridge = game.puzzle().solution()[0];
        let (a, b) = (bridge.a, bridge.b);

        assert_eq!(game.toggle_bridge(a, b), Ok(InputOperation::Set));
        assert_eq!(game.current_count(a), Ok(1));
        assert_eq!(game.toggle_bridge(b, a), Ok(InputOperation::Set));
        assert_eq!(game.current_count(b), Ok(2));
        assert_eq!(game.toggle_bridge(a, b), Ok(InputOperation::Removed));
        assert_eq!(game.current_count(a), Ok(0));
        assert_eq!(game.bridges().count(), 0);
    }

    #[test]
    fn test_crossing_bridge_is_blocked() {
        let mut game = plus();
        assert_eq!(game.toggle_bridge(0, 2), Ok(InputOperation::Set));
        assert_eq!(
            game.toggle_bridge(1, 3),
            Err(GameError::Blocked(InputBlockReason::BridgeCrossing))
        );
        assert_eq!(game.bridges().count(), 1);

        // Upgrading an existing bridge never re-checks crossings.
        assert_eq!(game.toggle_bridge(0, 2), Ok(InputOperation::Set));
        // Bridges meeting at an island do not cross.
        assert_eq!(game.toggle_bridge(2, 4), Ok(InputOperation::Set));
    }

    #[test]
    fn test_misaligned_and_same_island_are_blocked() {
        let mut game = plus();
        assert_eq!(
            game.toggle_bridge(0, 1),
            Err(GameError::Blocked(InputBlockReason::NotAligned))
        );
        assert_eq!(
            game.toggle_bridge(3, 3),
            Err(GameError::Blocked(InputBlockReason::SameIsland))
        );
        assert_eq!(game.toggle_bridge(0, 9), Err(GameError::UnknownIsland { id: 9 }));
    }

    #[test]
    fn test_island_in_the_way_is_blocked() {
        let island = |id, x| Island {
            id,
            position: Position::new(x, 0),
            required: 1,
        };
        let puzzle = BridgesPuzzle::new(
            GridSize::new(5, 1),
            vec![island(0, 0), island(1, 2), island(2, 4)],
            Vec::new(),
            PuzzleSeed::from_u64(0),
        )
        .unwrap();
        let mut game = BridgesGame::new(puzzle);
        assert_eq!(
            game.toggle_bridge(0, 2),
            Err(GameError::Blocked(InputBlockReason::IslandInTheWay))
        );
        assert_eq!(game.toggle_bridge(0, 1), Ok(InputOperation::Set));
    }

    #[test]
    fn test_auto_solve_is_solved() {
        let mut game = generated(1);
        assert!(!game.verify().solved);
        game.auto_solve();
        let verification = game.verify();
        assert!(verification.solved);
        assert!(verification.details.connected);
        assert_eq!(
            game.base_score(),
            10 * u32::try_from(game.puzzle().islands().len()).unwrap()
        );
    }

    #[test]
    fn test_counts_match_but_disconnected_is_not_solved() {
        // Two separate pairs, each satisfied by a single bridge.
        let island = |id, x, y| Island {
            id,
            position: Position::new(x, y),
            required: 1,
        };
        let puzzle = BridgesPuzzle::new(
            GridSize::new(3, 3),
            vec![island(0, 0, 0), island(1, 2, 0), island(2, 0, 2), island(3, 2, 2)],
            Vec::new(),
            PuzzleSeed::from_u64(0),
        )
        .unwrap();
        let mut game = BridgesGame::new(puzzle);
        game.toggle_bridge(0, 1).unwrap();
        game.toggle_bridge(2, 3).unwrap();

        let verification = game.verify();
        assert!(verification.details.unsatisfied_islands.is_empty());
        assert!(!verification.details.connected);
        assert!(!verification.solved);
    }

    #[test]
    fn test_verify_is_idempotent() {
        let mut game = generated(2);
        let bridge = game.puzzle().solution()[0];
        game.toggle_bridge(bridge.a, bridge.b).unwrap();
        assert_eq!(game.verify(), game.verify());
    }
}
