//! Untangle: a planar graph drawn with its nodes scrambled.
//!
//! Nodes are first placed at solved positions and joined greedily by the
//! shortest edges that cross nothing already accepted. The solved layout is then
//! replaced by independent random positions, so a crossing-free drawing is
//! known to exist.

use puzzlegate_core::{Point, Segment};
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{GeneratorError, PuzzleSeed, UntangleParams};

const DOMAIN: &str = "untangle";

const MIN_COORD: f64 = 0.05;
const MAX_COORD: f64 = 0.95;
const PLACEMENT_TRIES: usize = 32;

/// An undirected edge between two node ids, with `.0 < .1`.
pub type Edge = (usize, usize);

/// Returns `true` if the edges have a node in common.
#[must_use]
pub fn shares_node(e: Edge, f: Edge) -> bool {
    e.0 == f.0 || e.0 == f.1 || e.1 == f.0 || e.1 == f.1
}

/// Returns `true` if edges `e` and `f` cross in layout `positions`.
///
/// Edges sharing a node never cross.
///
/// # Panics
///
/// Panics if an edge refers to a node outside `positions`.
#[must_use]
pub fn edges_cross(positions: &[Point], e: Edge, f: Edge) -> bool {
    if shares_node(e, f) {
        return false;
    }
    let segment = |(a, b): Edge| Segment::new(positions[a], positions[b]);
    segment(e).intersects(&segment(f))
}

/// Returns the index pairs `(i, j)`, `i < j`, of edges that cross in `positions`.
///
/// # Panics
///
/// Panics if an edge refers to a node outside `positions`.
#[must_use]
pub fn crossing_pairs(positions: &[Point], edges: &[Edge]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for (i, &e) in edges.iter().enumerate() {
        for (j, &f) in edges.iter().enumerate().skip(i + 1) {
            if edges_cross(positions, e, f) {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

/// Returns the number of crossing edge pairs in `positions`.
///
/// # Panics
///
/// Panics if an edge refers to a node outside `positions`.
#[must_use]
pub fn count_crossings(positions: &[Point], edges: &[Edge]) -> usize {
    edges
        .iter()
        .enumerate()
        .map(|(i, &e)| {
            edges[i + 1..]
                .iter()
                .filter(|&&f| edges_cross(positions, e, f))
                .count()
        })
        .sum()
}

/// A generated untangle puzzle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UntanglePuzzleFields")]
pub struct UntanglePuzzle {
    nodes: Vec<Point>,
    solved_layout: Vec<Point>,
    edges: Vec<Edge>,
    seed: PuzzleSeed,
}

#[derive(Deserialize)]
struct UntanglePuzzleFields {
    nodes: Vec<Point>,
    solved_layout: Vec<Point>,
    edges: Vec<Edge>,
    seed: PuzzleSeed,
}

impl TryFrom<UntanglePuzzleFields> for UntanglePuzzle {
    type Error = GeneratorError;

    fn try_from(fields: UntanglePuzzleFields) -> Result<Self, Self::Error> {
        let invalid = |reason| Err(GeneratorError::InvalidParameters { reason });
        let len = fields.solved_layout.len();
        if fields.nodes.len() != len {
            return invalid("layouts place different node counts");
        }
        if fields
            .nodes
            .iter()
            .chain(&fields.solved_layout)
            .any(|p| !p.x.is_finite() || !p.y.is_finite())
        {
            return invalid("node coordinates must be finite");
        }
        if fields.edges.iter().any(|&(a, b)| a >= b || b >= len) {
            return invalid("edge endpoints must be ordered node ids");
        }
        if count_crossings(&fields.solved_layout, &fields.edges) != 0 {
            return invalid("solved layout has crossings");
        }
        Ok(Self {
            nodes: fields.nodes,
            solved_layout: fields.solved_layout,
            edges: fields.edges,
            seed: fields.seed,
        })
    }
}

impl UntanglePuzzle {
    /// Returns the scrambled starting positions.
    #[must_use]
    pub fn nodes(&self) -> &[Point] {
        &self.nodes
    }

    /// Returns the crossing-free layout the graph was built on.
    #[must_use]
    pub fn solved_layout(&self) -> &[Point] {
        &self.solved_layout
    }

    /// Returns the edges.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns the seed the puzzle was generated from.
    #[must_use]
    pub fn seed(&self) -> PuzzleSeed {
        self.seed
    }

    /// Splits the puzzle into its starting layout and edges, dropping the solved
    /// layout.
    #[must_use]
    pub fn into_scrambled(self) -> (Vec<Point>, Vec<Edge>) {
        (self.nodes, self.edges)
    }
}

/// Generator of untangle puzzles.
///
/// # Examples
///
/// ```
/// use puzzlegate_generator::{PuzzleSeed, UntangleGenerator, UntangleParams, count_crossings};
///
/// let generator = UntangleGenerator::new(UntangleParams::default())?;
/// let puzzle = generator.generate_with_seed(PuzzleSeed::from_u64(8))?;
/// assert_eq!(count_crossings(puzzle.solved_layout(), puzzle.edges()), 0);
/// assert!(puzzle.edges().len() <= 12);
/// # Ok::<(), puzzlegate_generator::GeneratorError>(())
/// ```
#[derive(Debug, Clone)]
pub struct UntangleGenerator {
    params: UntangleParams,
}

impl UntangleGenerator {
    /// Creates a generator.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::InvalidParameters`] if `params` are out of range.
    pub fn new(params: UntangleParams) -> Result<Self, GeneratorError> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Returns the generator parameters.
    #[must_use]
    pub fn params(&self) -> &UntangleParams {
        &self.params
    }

    /// Generates a puzzle from a fresh random seed.
    ///
    /// # Errors
    ///
    /// Generation itself cannot fail once the parameters are valid; the `Result`
    /// matches the other generators.
    pub fn generate(&self) -> Result<UntanglePuzzle, GeneratorError> {
        self.generate_with_seed(PuzzleSeed::random())
    }

    /// Generates the puzzle determined by `seed`.
    ///
    /// # Errors
    ///
    /// Generation itself cannot fail once the parameters are valid; the `Result`
    /// matches the other generators.
    pub fn generate_with_seed(&self, seed: PuzzleSeed) -> Result<UntanglePuzzle, GeneratorError> {
        let mut rng = seed.rng(DOMAIN);
        let solved_layout = place_nodes(self.params.nodes, self.params.min_spacing, &mut rng);
        let edges = planar_edges(&solved_layout, self.params.edge_cap());

        let crossable = edges
            .iter()
            .enumerate()
            .any(|(i, &e)| edges[i + 1..].iter().any(|&f| !shares_node(e, f)));
        let mut nodes = random_layout(self.params.nodes, &mut rng);
        let mut redraws = 0;
        while crossable
            && redraws < self.params.max_scramble_attempts
            && count_crossings(&nodes, &edges) == 0
        {
            log::trace!("scrambled layout has no crossings, redrawing");
            nodes = random_layout(self.params.nodes, &mut rng);
            redraws += 1;
        }

        log::debug!(
            "generated untangle puzzle: nodes={}, edges={}, crossings={}, seed={seed}",
            nodes.len(),
            edges.len(),
            count_crossings(&nodes, &edges)
        );
        Ok(UntanglePuzzle {
            nodes,
            solved_layout,
            edges,
            seed,
        })
    }
}

fn random_point<R>(rng: &mut R) -> Point
where
    R: Rng + ?Sized,
{
    Point::new(
        rng.random_range(MIN_COORD..=MAX_COORD),
        rng.random_range(MIN_COORD..=MAX_COORD),
    )
}

fn random_layout<R>(count: usize, rng: &mut R) -> Vec<Point>
where
    R: Rng + ?Sized,
{
    (0..count).map(|_| random_point(rng)).collect()
}

/// Places `count` points, each at least `spacing` from the earlier ones when a
/// few random tries find such a spot, otherwise at the best spot tried.
fn place_nodes<R>(count: usize, spacing: f64, rng: &mut R) -> Vec<Point>
where
    R: Rng + ?Sized,
{
    let spacing_sq = spacing * spacing;
    let clearance = |candidate: Point, points: &[Point]| {
        points
            .iter()
            .map(|&p| p.distance_squared(candidate))
            .fold(f64::INFINITY, f64::min)
    };
    let mut points: Vec<Point> = Vec::with_capacity(count);
    for _ in 0..count {
        let mut best = random_point(rng);
        let mut best_clearance = clearance(best, &points);
        for _ in 1..PLACEMENT_TRIES {
            if best_clearance >= spacing_sq {
                break;
            }
            let candidate = random_point(rng);
            let candidate_clearance = clearance(candidate, &points);
            if candidate_clearance > best_clearance {
                best = candidate;
                best_clearance = candidate_clearance;
            }
        }
        points.push(best);
    }
    points
}

/// Accepts the shortest edges first, skipping any that would cross an accepted
/// edge, until `cap` edges are accepted.
fn planar_edges(positions: &[Point], cap: usize) -> Vec<Edge> {
    let mut candidates = (0..positions.len())
        .flat_map(|a| (a + 1..positions.len()).map(move |b| (a, b)))
        .collect::<Vec<_>>();
    candidates.sort_by(|&(a, b), &(c, d)| {
        positions[a]
            .distance_squared(positions[b])
            .total_cmp(&positions[c].distance_squared(positions[d]))
    });

    let mut accepted: Vec<Edge> = Vec::with_capacity(cap);
    for edge in candidates {
        if accepted.len() >= cap {
            break;
        }
        if !accepted.iter().any(|&other| edges_cross(positions, edge, other)) {
            accepted.push(edge);
        }
    }
    accepted
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

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
    fn test_diagonals_cross_but_shared_nodes_do_not() {
        let positions = square();
        assert!(edges_cross(&positions, (0, 2), (1, 3)));
        assert!(!edges_cross(&positions, (0, 1), (1, 2)));
        assert!(!edges_cross(&positions, (0, 1), (2, 3)));

        let edges = [(0, 1), (1, 2), (2, 3), (0, 3), (0, 2), (1, 3)];
        assert_eq!(count_crossings(&positions, &edges), 1);
        assert_eq!(crossing_pairs(&positions, &edges), vec![(4, 5)]);
    }

    #[test]
    fn test_planar_edges_skip_crossing_diagonal() {
        let edges = planar_edges(&square(), 10);
        assert_eq!(edges.len(), 5);
        assert_eq!(count_crossings(&square(), &edges), 0);
    }

    #[test]
    fn test_planar_edges_respect_cap() {
        assert_eq!(planar_edges(&square(), 3).len(), 3);
        assert!(planar_edges(&square(), 0).is_empty());
    }

    #[test]
    fn test_deserialize_checks_layouts() {
        let puzzle = UntangleGenerator::new(UntangleParams::default())
            .unwrap()
            .generate_with_seed(PuzzleSeed::from_u64(1))
            .unwrap();
        let json = serde_json::to_value(&puzzle).unwrap();
        assert_eq!(serde_json::from_value::<UntanglePuzzle>(json).unwrap(), puzzle);

        let load = |edges: &[Edge]| {
            serde_json::from_value::<UntanglePuzzle>(serde_json::json!({
                "nodes": square(),
                "solved_layout": square(),
                "edges": edges,
                "seed": PuzzleSeed::from_u64(0),
            }))
        };
        assert!(load(&[(0, 1), (1, 2)]).is_ok());
        let err = load(&[(0, 2), (1, 3)]).unwrap_err();
        assert!(err.to_string().contains("solved layout has crossings"), "{err}");
        assert!(load(&[(1, 0)]).is_err());
        assert!(load(&[(2, 4)]).is_err());
    }

    #[test]
    fn test_nodes_stay_in_margin() {
        let generator = UntangleGenerator::new(UntangleParams::default()).unwrap();
        let puzzle = generator.generate_with_seed(PuzzleSeed::from_u64(2)).unwrap();
        for p in puzzle.nodes().iter().chain(puzzle.solved_layout()) {
            assert!((MIN_COORD..=MAX_COORD).contains(&p.x));
            assert!((MIN_COORD..=MAX_COORD).contains(&p.y));
        }
    }

    proptest! {
        #[test]
        fn prop_solved_layout_is_planar(seed in any::<u64>(), nodes in 2usize..=12) {
            let params = UntangleParams { nodes, ..UntangleParams::default() };
            let cap = params.edge_cap();
            let puzzle = UntangleGenerator::new(params)
                .unwrap()
                .generate_with_seed(PuzzleSeed::from_u64(seed))
                .unwrap();

            prop_assert_eq!(puzzle.nodes().len(), nodes);
            prop_assert!(puzzle.edges().len() <= cap);
            prop_assert!(puzzle.edges().iter().all(|&(a, b)| a < b && b < nodes));
            prop_assert_eq!(count_crossings(puzzle.solved_layout(), puzzle.edges()), 0);
        }

        #[test]
        fn prop_crossing_count_matches_brute_force(seed in any::<u64>()) {
            let puzzle = UntangleGenerator::new(UntangleParams::default())
                .unwrap()
                .generate_with_seed(PuzzleSeed::from_u64(seed))
                .unwrap();
            let (nodes, edges) = (puzzle.nodes(), puzzle.edges());

            let mut brute = 0;
            for e in edges {
                for f in edges {
                    let disjoint = e.0 != f.0 && e.0 != f.1 && e.1 != f.0 && e.1 != f.1;
                    let cross = Segment::new(nodes[e.0], nodes[e.1])
                        .intersects(&Segment::new(nodes[f.0], nodes[f.1]));
                    if disjoint && cross {
                        brute += 1;
                    }
                }
            }
            prop_assert_eq!(count_crossings(nodes, edges) * 2, brute);
            prop_assert_eq!(crossing_pairs(nodes, edges).len() * 2, brute);
        }
    }
}
