use std::fmt;

use puzzlegate_core::{GridSize, Position, ValueSet};
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{SearchBudget, SolverError};

/// A completed Latin square of order `size` with values `1..=size`.
///
/// Cells are stored in row-major order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LatinSquareFields")]
pub struct LatinSquare {
    size: u8,
    cells: Vec<u8>,
}

#[derive(Deserialize)]
struct LatinSquareFields {
    size: u8,
    cells: Vec<u8>,
}

impl TryFrom<LatinSquareFields> for LatinSquare {
    type Error = SolverError;

    fn try_from(LatinSquareFields { size, cells }: LatinSquareFields) -> Result<Self, Self::Error> {
        if !(1..=LatinSquareSolver::MAX_SIZE).contains(&size) {
            return Err(SolverError::InvalidSize {
                size,
                max: LatinSquareSolver::MAX_SIZE,
            });
        }
        let square = Self { size, cells };
        if !square.is_latin() {
            return Err(SolverError::Unsatisfiable);
        }
        Ok(square)
    }
}

impl LatinSquare {
    /// Builds a square from rows, checking the Latin property.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvalidSize`] if the rows are not square or too large,
    /// and [`SolverError::Unsatisfiable`] if some row or column repeats a value.
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self, SolverError> {
        let size = u8::try_from(rows.len())
            .ok()
            .filter(|size| (1..=LatinSquareSolver::MAX_SIZE).contains(size))
            .ok_or(SolverError::InvalidSize {
                size: u8::MAX,
                max: LatinSquareSolver::MAX_SIZE,
            })?;
        if rows.iter().any(|row| row.len() != rows.len()) {
            return Err(SolverError::InvalidSize {
                size,
                max: LatinSquareSolver::MAX_SIZE,
            });
        }
        let square = Self {
            size,
            cells: rows.concat(),
        };
        if !square.is_latin() {
            return Err(SolverError::Unsatisfiable);
        }
        Ok(square)
    }

    /// Returns the order of the square.
    #[must_use]
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Returns the grid dimensions of the square.
    #[must_use]
    pub fn grid_size(&self) -> GridSize {
        GridSize::square(self.size)
    }

    /// Returns the value at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is outside the square.
    #[must_use]
    pub fn get(&self, pos: Position) -> u8 {
        self.cells[self.grid_size().index_of(pos)]
    }

    /// Returns the cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Iterates the rows of the square.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks(usize::from(self.size))
    }

    /// Returns `true` if every row and column is a permutation of `1..=size`.
    #[must_use]
    pub fn is_latin(&self) -> bool {
        let n = usize::from(self.size);
        if self.cells.len() != n * n || !self.cells.iter().all(|v| (1..=self.size).contains(v)) {
            return false;
        }
        let full = ValueSet::full(self.size);
        let rows_ok = self
            .rows()
            .all(|row| row.iter().copied().collect::<ValueSet>() == full);
        let columns_ok = (0..n).all(|c| {
            (0..n)
                .map(|r| self.cells[r * n + c])
                .collect::<ValueSet>()
                == full
        });
        rows_ok && columns_ok
    }
}

impl fmt::Display for LatinSquare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for (j, value) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{value}")?;
            }
        }
        Ok(())
    }
}

/// Randomized backtracking generator of Latin squares.
///
/// Cells are filled in row-major order. Each cell tries the values `1..=size` in
/// a freshly shuffled order and keeps the first one not already used in its row
/// or column; a cell with no usable value sends the search back to the previous
/// cell.
///
/// # Examples
///
/// ```
/// use puzzlegate_core::Position;
/// use puzzlegate_solver::{LatinSquareSolver, SearchBudget, SolverError};
/// use rand::SeedableRng as _;
/// use rand_pcg::Pcg64;
///
/// let mut rng = Pcg64::seed_from_u64(1);
/// let square = LatinSquareSolver::new().generate(5, &mut rng)?;
/// assert!((1..=5).contains(&square.get(Position::new(4, 4))));
///
/// let tiny_budget = LatinSquareSolver::with_budget(SearchBudget::new(3));
/// assert!(tiny_budget.generate(5, &mut rng).is_err());
/// # Ok::<(), SolverError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LatinSquareSolver {
    budget: SearchBudget,
}

#[derive(Debug)]
struct ChoicePoint {
    candidates: Vec<u8>,
    placed: Option<u8>,
}

impl LatinSquareSolver {
    /// Largest supported order.
    pub const MAX_SIZE: u8 = 9;

    /// Creates a solver with the default budget.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a solver with a custom budget.
    #[must_use]
    pub fn with_budget(budget: SearchBudget) -> Self {
        Self { budget }
    }

    /// Generates a random Latin square of order `size`.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvalidSize`] if `size` is not in `1..=MAX_SIZE`,
    /// and [`SolverError::BudgetExhausted`] if the search tries more candidates
    /// than the budget allows.
    pub fn generate<R>(&self, size: u8, rng: &mut R) -> Result<LatinSquare, SolverError>
    where
        R: Rng + ?Sized,
    {
        if !(1..=Self::MAX_SIZE).contains(&size) {
            return Err(SolverError::InvalidSize {
                size,
                max: Self::MAX_SIZE,
            });
        }

        let n = usize::from(size);
        let total = n * n;
        let mut cells = vec![0; total];
        let mut row_used = vec![ValueSet::EMPTY; n];
        let mut column_used = vec![ValueSet::EMPTY; n];
        let mut attempts = self.budget.counter();

        let shuffled = |rng: &mut R| {
            let mut values = (1..=size).collect::<Vec<_>>();
            values.shuffle(rng);
            values
        };

        let mut stack = Vec::with_capacity(total);
        stack.push(ChoicePoint {
            candidates: shuffled(rng),
            placed: None,
        });

        while !stack.is_empty() {
            let index = stack.len() - 1;
            let (row, column) = (index / n, index % n);
            let point = &mut stack[index];

            if let Some(previous) = point.placed.take() {
                row_used[row].remove(previous);
                column_used[column].remove(previous);
                cells[index] = 0;
            }

            let next = loop {
                let Some(value) = point.candidates.pop() else {
                    break None;
                };
                attempts.spend()?;
                if !row_used[row].contains(value) && !column_used[column].contains(value) {
                    break Some(value);
                }
            };

            let Some(value) = next else {
                stack.pop();
                continue;
            };

            point.placed = Some(value);
            row_used[row].insert(value);
            column_used[column].insert(value);
            cells[index] = value;

            if index + 1 == total {
                log::trace!(
                    "latin square of order {size} found after {} attempts",
                    attempts.used()
                );
                return Ok(LatinSquare { size, cells });
            }
            stack.push(ChoicePoint {
                candidates: shuffled(rng),
                placed: None,
            });
        }

        Err(SolverError::Unsatisfiable)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand_pcg::Pcg64;

    use super::*;

    #[test]
    fn test_generates_every_supported_size() {
        let mut rng = Pcg64::seed_from_u64(0);
        for size in 1..=LatinSquareSolver::MAX_SIZE {
            let square = LatinSquareSolver::new().generate(size, &mut rng).unwrap();
            assert_eq!(square.size(), size);
            assert!(square.is_latin(), "order {size}:\n{square}");
        }
    }

    #[test]
    fn test_deserialize_checks_latin_property() {
        let square = LatinSquare::from_rows(&[vec![1, 2], vec![2, 1]]).unwrap();
        let json = serde_json::to_string(&square).unwrap();
        assert_eq!(serde_json::from_str::<LatinSquare>(&json).unwrap(), square);

        for bad in [
            r#"{"size":2,"cells":[1,2,2]}"#,
            r#"{"size":2,"cells":[1,2,1,2]}"#,
            r#"{"size":0,"cells":[]}"#,
            r#"{"size":12,"cells":[]}"#,
        ] {
            assert!(serde_json::from_str::<LatinSquare>(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_rejects_unsupported_sizes() {
        let mut rng = Pcg64::seed_from_u64(0);
        let solver = LatinSquareSolver::new();
        assert!(solver.generate(0, &mut rng).unwrap_err().is_invalid_size());
        assert!(solver.generate(10, &mut rng).unwrap_err().is_invalid_size());
    }

    #[test]
    fn test_budget_exhaustion_is_reported() {
        let mut rng = Pcg64::seed_from_u64(0);
        let solver = LatinSquareSolver::with_budget(SearchBudget::new(10));
        assert_eq!(
            solver.generate(4, &mut rng),
            Err(SolverError::BudgetExhausted { attempts: 10 })
        );
    }

    #[test]
    fn test_same_seed_same_square() {
        let a = LatinSquareSolver::new()
            .generate(6, &mut Pcg64::seed_from_u64(42))
            .unwrap();
        let b = LatinSquareSolver::new()
            .generate(6, &mut Pcg64::seed_from_u64(42))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_rows() {
        let square = LatinSquare::from_rows(&[vec![1, 2], vec![2, 1]]).unwrap();
        assert_eq!(square.get(Position::new(1, 0)), 2);
        assert_eq!(square.to_string(), "1 2\n2 1");
        assert_eq!(
            LatinSquare::from_rows(&[vec![1, 2], vec![1, 2]]),
            Err(SolverError::Unsatisfiable)
        );
        assert!(
            LatinSquare::from_rows(&[vec![1, 2], vec![2]])
                .unwrap_err()
                .is_invalid_size()
        );
    }

    proptest! {
        #[test]
        fn prop_rows_and_columns_are_permutations(seed in any::<u64>(), size in 1u8..=7) {
            let mut rng = Pcg64::seed_from_u64(seed);
            let square = LatinSquareSolver::new().generate(size, &mut rng).unwrap();
            prop_assert!(square.is_latin());
        }
    }
}
