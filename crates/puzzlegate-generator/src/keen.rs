//! Keen: a Latin square partitioned into arithmetic cages.
//!
//! Generation first fills a random Latin square, then grows small connected
//! cages over it and derives each cage's clue from the solved values.

use std::fmt;

use puzzlegate_core::{GridSize, Position};
use puzzlegate_solver::{LatinSquare, LatinSquareSolver};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use tinyvec::ArrayVec;

use crate::{GeneratorError, KeenParams, PuzzleSeed};

const DOMAIN: &str = "keen";

/// The arithmetic operation of a cage clue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// Single-cell cage; the target is the cell value itself.
    None,
    /// Sum of all values.
    Add,
    /// Absolute difference of two values.
    Subtract,
    /// Product of all values.
    Multiply,
    /// Larger of two values divided by the smaller; only when it divides evenly.
    Divide,
}

impl Operator {
    /// Returns the clue symbol, empty for [`Operator::None`].
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "×",
            Self::Divide => "÷",
        }
    }

    /// Operators a cage of `len` cells may carry.
    #[must_use]
    pub const fn candidates(len: usize) -> &'static [Self] {
        match len {
            0 => &[],
            1 => &[Self::None],
            2 => &[Self::Add, Self::Subtract, Self::Multiply, Self::Divide],
            _ => &[Self::Add, Self::Multiply],
        }
    }

    /// Applies the operator to the cage values.
    ///
    /// Returns `None` when the operator does not apply to that many values, or for
    /// a division that does not come out even.
    #[must_use]
    pub fn apply(self, values: &[u8]) -> Option<u32> {
        match (self, values) {
            (Self::None, &[value]) => Some(u32::from(value)),
            (Self::Add, [_, _, ..]) => Some(values.iter().copied().map(u32::from).sum()),
            (Self::Multiply, [_, _, ..]) => Some(values.iter().copied().map(u32::from).product()),
            (Self::Subtract, &[a, b]) => Some(u32::from(a.abs_diff(b))),
            (Self::Divide, &[a, b]) => {
                let (hi, lo) = (a.max(b), a.min(b));
                (lo != 0 && hi % lo == 0).then(|| u32::from(hi / lo))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A connected group of cells sharing one arithmetic clue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cage {
    /// Index of the cage within its puzzle.
    pub id: usize,
    /// Member cells in row-major order.
    pub cells: ArrayVec<[Position; 3]>,
    /// Clue operator.
    pub operator: Operator,
    /// Clue target.
    pub target: u32,
}

impl Cage {
    /// Returns `true` if `values` (one per cell, in cell order) meet the clue.
    #[must_use]
    pub fn is_satisfied_by(&self, values: &[u8]) -> bool {
        values.len() == self.cells.len() && self.operator.apply(values) == Some(self.target)
    }

    /// Returns the clue text, e.g. `"7+"` or `"3"`.
    #[must_use]
    pub fn clue(&self) -> String {
        format!("{}{}", self.target, self.operator)
    }
}

/// Partitions a solved Latin square into cages and derives their clues.
///
/// Cells are scanned in row-major order. Each unassigned cell starts a cage that
/// grows into random unassigned orthogonal neighbours until it reaches a random
/// target size in `1..=max_cage_size` or runs out of neighbours. The clue operator
/// is drawn uniformly from the operators that are valid for the solved values.
///
/// # Panics
///
/// Panics if `max_cage_size` is not in `1..=3`.
pub fn assign_cages<R>(solution: &LatinSquare, max_cage_size: u8, rng: &mut R) -> Vec<Cage>
where
    R: Rng + ?Sized,
{
    assert!((1..=3).contains(&max_cage_size), "cage size must be in 1..=3");
    let size = solution.grid_size();
    let mut assigned = vec![false; size.len()];
    let mut cages = Vec::new();

    for start in size.positions() {
        if assigned[size.index_of(start)] {
            continue;
        }
        let target_len = usize::from(rng.random_range(1..=max_cage_size));
        let mut cells = ArrayVec::<[Position; 3]>::new();
        cells.push(start);
        assigned[size.index_of(start)] = true;

        while cells.len() < target_len {
            let mut frontier = cells
                .iter()
                .flat_map(|&cell| size.neighbors(cell))
                .filter(|&pos| !assigned[size.index_of(pos)])
                .collect::<Vec<_>>();
            frontier.sort_unstable();
            frontier.dedup();
            let Some(&next) = frontier.choose(rng) else {
                break;
            };
            assigned[size.index_of(next)] = true;
            cells.push(next);
        }
        cells.sort_unstable();

        let values = cells.iter().map(|&pos| solution.get(pos)).collect::<Vec<_>>();
        let clues = Operator::candidates(values.len())
            .iter()
            .filter_map(|&op| op.apply(&values).map(|target| (op, target)))
            .collect::<Vec<_>>();
        let Some(&(operator, target)) = clues.choose(rng) else {
            unreachable!("every non-empty cage has a valid operator");
        };

        cages.push(Cage {
            id: cages.len(),
            cells,
            operator,
            target,
        });
    }

    cages
}

/// A generated Keen puzzle.
///
/// Deserialization goes through [`KeenPuzzle::new`], so a loaded puzzle has
/// the same guarantees as a generated one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "KeenPuzzleFields")]
pub struct KeenPuzzle {
    solution: LatinSquare,
    cages: Vec<Cage>,
    cage_of: Vec<usize>,
    seed: PuzzleSeed,
}

/// Stored fields of a [`KeenPuzzle`]. The cage lookup is rebuilt on load.
#[derive(Deserialize)]
struct KeenPuzzleFields {
    solution: LatinSquare,
    cages: Vec<Cage>,
    seed: PuzzleSeed,
}

impl TryFrom<KeenPuzzleFields> for KeenPuzzle {
    type Error = GeneratorError;

    fn try_from(fields: KeenPuzzleFields) -> Result<Self, Self::Error> {
        Self::new(fields.solution, fields.cages, fields.seed)
    }
}

impl KeenPuzzle {
    /// Builds a puzzle from a solution and cages that partition it.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::InvalidParameters`] if the cages do not cover every
    /// cell exactly once or a cage clue is not met by the solution.
    pub fn new(
        solution: LatinSquare,
        cages: Vec<Cage>,
        seed: PuzzleSeed,
    ) -> Result<Self, GeneratorError> {
        let size = solution.grid_size();
        let mut cage_of = vec![usize::MAX; size.len()];
        for cage in &cages {
            for &pos in &cage.cells {
                if !size.contains(pos) {
                    return Err(GeneratorError::InvalidParameters {
                        reason: "cage cell outside the grid",
                    });
                }
                let slot = &mut cage_of[size.index_of(pos)];
                if *slot != usize::MAX {
                    return Err(GeneratorError::InvalidParameters {
                        reason: "cages overlap",
                    });
                }
                *slot = cage.id;
            }
            let values = cage.cells.iter().map(|&p| solution.get(p)).collect::<Vec<_>>();
            if !cage.is_satisfied_by(&values) {
                return Err(GeneratorError::InvalidParameters {
                    reason: "cage clue does not match the solution",
                });
            }
        }
        if cage_of.contains(&usize::MAX) {
            return Err(GeneratorError::InvalidParameters {
                reason: "cages do not cover the grid",
            });
        }
        if cages.iter().enumerate().any(|(i, cage)| cage.id != i) {
            return Err(GeneratorError::InvalidParameters {
                reason: "cage ids must match their index",
            });
        }
        Ok(Self {
            solution,
            cages,
            cage_of,
            seed,
        })
    }

    /// Returns the order of the puzzle.
    #[must_use]
    pub fn size(&self) -> u8 {
        self.solution.size()
    }

    /// Returns the grid dimensions.
    #[must_use]
    pub fn grid_size(&self) -> GridSize {
        self.solution.grid_size()
    }

    /// Returns the solved Latin square.
    #[must_use]
    pub fn solution(&self) -> &LatinSquare {
        &self.solution
    }

    /// Returns the cages, indexed by id.
    #[must_use]
    pub fn cages(&self) -> &[Cage] {
        &self.cages
    }

    /// Returns the cage containing `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is outside the grid.
    #[must_use]
    pub fn cage_at(&self, pos: Position) -> &Cage {
        &self.cages[self.cage_of[self.grid_size().index_of(pos)]]
    }

    /// Returns the seed the puzzle was generated from.
    #[must_use]
    pub fn seed(&self) -> PuzzleSeed {
        self.seed
    }
}

/// Generator of Keen puzzles.
///
/// # Examples
///
/// ```
/// use puzzlegate_generator::{KeenGenerator, KeenParams, PuzzleSeed};
///
/// let generator = KeenGenerator::new(KeenParams::default())?;
/// let puzzle = generator.generate_with_seed(PuzzleSeed::from_u64(1))?;
/// assert_eq!(puzzle.size(), 4);
/// assert!(puzzle.solution().is_latin());
/// # Ok::<(), puzzlegate_generator::GeneratorError>(())
/// ```
#[derive(Debug, Clone)]
pub struct KeenGenerator {
    params: KeenParams,
    solver: LatinSquareSolver,
}

impl KeenGenerator {
    /// Creates a generator.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::InvalidParameters`] if `params` are out of range.
    pub fn new(params: KeenParams) -> Result<Self, GeneratorError> {
        params.validate()?;
        Ok(Self {
            params,
            solver: LatinSquareSolver::new(),
        })
    }

    /// Returns the generator parameters.
    #[must_use]
    pub fn params(&self) -> &KeenParams {
        &self.params
    }

    /// Generates a puzzle from a fresh random seed.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::Solver`] if the Latin square search fails.
    pub fn generate(&self) -> Result<KeenPuzzle, GeneratorError> {
        self.generate_with_seed(PuzzleSeed::random())
    }

    /// Generates the puzzle determined by `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::Solver`] if the Latin square search fails.
    pub fn generate_with_seed(&self, seed: PuzzleSeed) -> Result<KeenPuzzle, GeneratorError> {
        let mut rng = seed.rng(DOMAIN);
        let solution = self.solver.generate(self.params.size, &mut rng)?;
        let cages = assign_cages(&solution, self.params.max_cage_size, &mut rng);
        log::debug!(
            "generated keen puzzle: size={}, cages={}, seed={seed}",
            self.params.size,
            cages.len()
        );
        KeenPuzzle::new(solution, cages, seed)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand_pcg::Pcg64;

    use super::*;

    fn solution_4x4() -> LatinSquare {
        LatinSquare::from_rows(&[
            vec![1, 2, 3, 4],
            vec![2, 1, 4, 3],
            vec![3, 4, 1, 2],
            vec![4, 3, 2, 1],
        ])
        .unwrap()
    }

    #[test]
    fn test_operator_apply() {
        assert_eq!(Operator::None.apply(&[3]), Some(3));
        assert_eq!(Operator::None.apply(&[3, 1]), None);
        assert_eq!(Operator::Add.apply(&[3, 1, 4]), Some(8));
        assert_eq!(Operator::Multiply.apply(&[3, 1, 4]), Some(12));
        assert_eq!(Operator::Subtract.apply(&[1, 4]), Some(3));
        assert_eq!(Operator::Subtract.apply(&[1, 4, 2]), None);
        assert_eq!(Operator::Divide.apply(&[2, 6]), Some(3));
        assert_eq!(Operator::Divide.apply(&[4, 6]), None);
        assert_eq!(Operator::Add.apply(&[4]), None);
    }

    #[test]
    fn test_cage_clue_text() {
        let mut cells = ArrayVec::new();
        cells.push(Position::new(0, 0));
        cells.push(Position::new(1, 0));
        let cage = Cage {
            id: 0,
            cells,
            operator: Operator::Subtract,
            target: 1,
        };
        assert_eq!(cage.clue(), "1-");
        assert!(cage.is_satisfied_by(&[2, 1]));
        assert!(cage.is_satisfied_by(&[1, 2]));
        assert!(!cage.is_satisfied_by(&[1]));
    }

    #[test]
    fn test_single_cell_cages() {
        let solution = solution_4x4();
        let cages = assign_cages(&solution, 1, &mut Pcg64::seed_from_u64(0));
        assert_eq!(cages.len(), 16);
        for cage in &cages {
            assert_eq!(cage.operator, Operator::None);
            assert_eq!(cage.target, u32::from(solution.get(cage.cells[0])));
        }
    }

    #[test]
    fn test_rejects_overlapping_cages() {
        let solution = solution_4x4();
        let mut cages = assign_cages(&solution, 1, &mut Pcg64::seed_from_u64(0));
        cages[1] = Cage {
            id: 1,
            ..cages[0].clone()
        };
        assert!(KeenPuzzle::new(solution, cages, PuzzleSeed::from_u64(0)).is_err());
    }

    #[test]
    fn test_deserialize_validates_cages() {
        let puzzle = KeenGenerator::new(KeenParams::default())
            .unwrap()
            .generate_with_seed(PuzzleSeed::from_u64(3))
            .unwrap();
        let mut json = serde_json::to_value(&puzzle).unwrap();

        // The cage lookup is rebuilt rather than trusted.
        json["cage_of"] = serde_json::json!([]);
        assert_eq!(serde_json::from_value::<KeenPuzzle>(json.clone()).unwrap(), puzzle);

        let mut uncovered = json.clone();
        uncovered["cages"].as_array_mut().unwrap().pop();
        let err = serde_json::from_value::<KeenPuzzle>(uncovered).unwrap_err();
        assert!(err.to_string().contains("cages do not cover the grid"), "{err}");

        let mut wrong_clue = json;
        let target = wrong_clue["cages"][0]["target"].as_u64().unwrap();
        wrong_clue["cages"][0]["target"] = (target + 100).into();
        assert!(serde_json::from_value::<KeenPuzzle>(wrong_clue).is_err());
    }

    #[test]
    fn test_same_seed_same_puzzle() {
        let generator = KeenGenerator::new(KeenParams::default()).unwrap();
        let seed = PuzzleSeed::from_u64(99);
        assert_eq!(
            generator.generate_with_seed(seed).unwrap(),
            generator.generate_with_seed(seed).unwrap()
        );
    }

    proptest! {
        #[test]
        fn prop_cages_partition_grid_and_match_solution(seed in any::<u64>(), size in 2u8..=7) {
            let generator = KeenGenerator::new(KeenParams { size, max_cage_size: 3 }).unwrap();
            let puzzle = generator.generate_with_seed(PuzzleSeed::from_u64(seed)).unwrap();
            let grid = puzzle.grid_size();

            let mut covered = vec![0; grid.len()];
            for cage in puzzle.cages() {
                prop_assert!((1..=3).contains(&cage.cells.len()));
                for &pos in &cage.cells {
                    covered[grid.index_of(pos)] += 1;
                }
                let values: Vec<_> = cage.cells.iter().map(|&p| puzzle.solution().get(p)).collect();
                prop_assert!(cage.is_satisfied_by(&values));
                match cage.cells.len() {
                    1 => prop_assert_eq!(cage.operator, Operator::None),
                    2 => prop_assert_ne!(cage.operator, Operator::None),
                    _ => prop_assert!(matches!(cage.operator, Operator::Add | Operator::Multiply)),
                }
                if let [a, b] = cage.cells[..] {
                    prop_assert_eq!(a.manhattan_distance(b), 1);
                }
            }
            prop_assert!(covered.iter().all(|&n| n == 1));
        }
    }
}
