use puzzlegate_core::Point;
use puzzlegate_generator::{Edge, PuzzleSeed, UntanglePuzzle, crossing_pairs};

use crate::{GameError, InputOperation, PuzzleGame, Verification};

/// Points per edge for a clean untangle solve.
pub const UNTANGLE_POINTS_PER_EDGE: u32 = 10;

/// Findings of [`UntangleGame`] verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UntangleReport {
    /// Number of crossing edge pairs.
    pub crossings: usize,
    /// Index pairs `(i, j)`, `i < j`, of the crossing edges.
    pub crossing_pairs: Vec<(usize, usize)>,
}

/// An untangle session.
///
/// Only the scrambled layout is kept; the generator's solved layout is dropped,
/// so there is no auto-solve. Crossings are recomputed after every move.
///
/// # Example
///
/// ```
/// use puzzlegate_core::Point;
/// use puzzlegate_game::{PuzzleGame, UntangleGame};
///
/// let square = vec![
///     Point::new(0.0, 0.0),
///     Point::new(1.0, 0.0),
///     Point::new(1.0, 1.0),
///     Point::new(0.0, 1.0),
/// ];
/// let mut game = UntangleGame::from_layout(square, vec![(0, 2), (1, 3)])?;
/// assert_eq!(game.crossing_count(), 1);
///
/// game.move_node(2, Point::new(0.2, -0.5))?;
/// assert!(game.verify().solved);
/// # Ok::<(), puzzlegate_game::GameError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct UntangleGame {
    nodes: Vec<Point>,
    edges: Vec<Edge>,
    crossings: Vec<(usize, usize)>,
    seed: Option<PuzzleSeed>,
}

impl UntangleGame {
    /// Starts a session from the scrambled layout of `puzzle`.
    #[must_use]
    pub fn new(puzzle: UntanglePuzzle) -> Self {
        let seed = puzzle.seed();
        let (nodes, edges) = puzzle.into_scrambled();
        let crossings = crossing_pairs(&nodes, &edges);
        Self {
            nodes,
            edges,
            crossings,
            seed: Some(seed),
        }
    }

    /// Starts a session from an explicit layout.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UnknownNode`] if an edge refers to a missing node and
    /// [`GameError::NonFiniteCoordinate`] if a node position is not finite.
    pub fn from_layout(nodes: Vec<Point>, edges: Vec<Edge>) -> Result<Self, GameError> {
        if nodes.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(GameError::NonFiniteCoordinate);
        }
        if let Some(&(a, b)) = edges
            .iter()
            .find(|&&(a, b)| a >= nodes.len() || b >= nodes.len())
        {
            return Err(GameError::UnknownNode { id: a.max(b) });
        }
        let crossings = crossing_pairs(&nodes, &edges);
        Ok(Self {
            nodes,
            edges,
            crossings,
            seed: None,
        })
    }

    /// Returns the current node positions.
    #[must_use]
    pub fn nodes(&self) -> &[Point] {
        &self.nodes
    }

    /// Returns the edges.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns the seed of the generated puzzle, if the session came from one.
    #[must_use]
    pub fn seed(&self) -> Option<PuzzleSeed> {
        self.seed
    }

    /// Returns the number of crossing edge pairs in the current layout.
    #[must_use]
    pub fn crossing_count(&self) -> usize {
        self.crossings.len()
    }

    /// Returns the crossing edge index pairs in the current layout.
    #[must_use]
    pub fn crossing_pairs(&self) -> &[(usize, usize)] {
        &self.crossings
    }

    /// Moves node `id` to `to` and recomputes the crossings.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UnknownNode`] for an unknown node and
    /// [`GameError::NonFiniteCoordinate`] if `to` is not finite.
    pub fn move_node(&mut self, id: usize, to: Point) -> Result<InputOperation, GameError> {
        if !to.x.is_finite() || !to.y.is_finite() {
            return Err(GameError::NonFiniteCoordinate);
        }
        let node = self.nodes.get_mut(id).ok_or(GameError::UnknownNode { id })?;
        if *node == to {
            return Ok(InputOperation::NoOp);
        }
        *node = to;
        self.crossings = crossing_pairs(&self.nodes, &self.edges);
        Ok(InputOperation::Set)
    }
}

impl PuzzleGame for UntangleGame {
    type Report = UntangleReport;

    /// Solved when no two edges cross.
    fn verify(&self) -> Verification<UntangleReport> {
        Verification::new(
            self.crossings.is_empty(),
            UntangleReport {
                crossings: self.crossings.len(),
                crossing_pairs: self.crossings.clone(),
            },
        )
    }

    fn base_score(&self) -> u32 {
        let edges = u32::try_from(self.edges.len()).unwrap_or(u32::MAX);
        edges.saturating_mul(UNTANGLE_POINTS_PER_EDGE)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use puzzlegate_generator::{UntangleGenerator, UntangleParams, count_crossings};

    use super::*;

    fn square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ]
    }

    #[test]
    fn test_single_crossing_is_resolved_by_a_move() {
        let edges = vec![(0, 1), (1, 2), (2, 3), (0, 3), (0, 2), (1, 3)];
        let mut game = UntangleGame::from_layout(square(), edges).unwrap();
        let verification = game.verify();
        assert_eq!(verification.details.crossings, 1);
        assert_eq!(verification.details.crossing_pairs, vec![(4, 5)]);
        assert!(!verification.solved);

        // Pull node 3 inside the triangle 0-1-2 so both diagonals meet only at nodes.
        assert_eq!(
            game.move_node(3, Point::new(0.7, 0.3)),
            Ok(InputOperation::Set)
        );
        let verification = game.verify();
        assert_eq!(verification.details.crossings, 0);
        assert!(verification.solved);
    }

    #[test]
    fn test_invalid_moves_are_rejected() {
        let mut game = UntangleGame::from_layout(square(), vec![(0, 2)]).unwrap();
        assert_eq!(
            game.move_node(7, Point::new(0.5, 0.5)),
            Err(GameError::UnknownNode { id: 7 })
        );
        assert_eq!(
            game.move_node(0, Point::new(f64::NAN, 0.5)),
            Err(GameError::NonFiniteCoordinate)
        );
        assert_eq!(game.move_node(0, Point::new(0.0, 0.0)), Ok(InputOperation::NoOp));
        assert_eq!(
            UntangleGame::from_layout(square(), vec![(0, 4)]),
            Err(GameError::UnknownNode { id: 4 })
        );
    }

    #[test]
    fn test_generated_session_drops_solved_layout() {
        let puzzle = UntangleGenerator::new(UntangleParams::default())
            .unwrap()
            .generate_with_seed(PuzzleSeed::from_u64(0))
            .unwrap();
        let expected = count_crossings(puzzle.nodes(), puzzle.edges());
        let seed = puzzle.seed();
        let game = UntangleGame::new(puzzle);
        assert_eq!(game.crossing_count(), expected);
        assert_eq!(game.seed(), Some(seed));
        assert_eq!(game.verify(), game.verify());
    }

    proptest! {
        #[test]
        fn prop_moves_keep_crossings_current(
            seed in any::<u64>(),
            moves in prop::collection::vec((0usize..8, 0.0f64..1.0, 0.0f64..1.0), 1..20),
        ) {
            let puzzle = UntangleGenerator::new(UntangleParams::default())
                .unwrap()
                .generate_with_seed(PuzzleSeed::from_u64(seed))
                .unwrap();
            let mut game = UntangleGame::new(puzzle);
            for (id, x, y) in moves {
                game.move_node(id, Point::new(x, y)).unwrap();
                prop_assert_eq!(game.crossing_count(), count_crossings(game.nodes(), game.edges()));
            }
        }
    }
}
