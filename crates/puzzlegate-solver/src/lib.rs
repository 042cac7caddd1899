//! Budgeted backtracking searches used by the puzzle generators.
//!
//! Two searches live here:
//!
//! - [`LatinSquareSolver`] fills an N×N grid so that every row and column is a
//!   permutation of `1..=N`.
//! - [`FourColoring`] assigns one of four [`Color`]s to every node of a region
//!   adjacency graph so that adjacent nodes differ.
//!
//! Both try candidates in a randomly shuffled order drawn from the caller's RNG,
//! keep their state on an explicit stack of choice points, and count every tried
//! candidate against a [`SearchBudget`]. A search that runs out of budget stops
//! with [`SolverError::BudgetExhausted`] instead of looping.
//!
//! # Examples
//!
//! ```
//! use puzzlegate_solver::LatinSquareSolver;
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg64;
//!
//! let mut rng = Pcg64::seed_from_u64(7);
//! let square = LatinSquareSolver::new().generate(4, &mut rng)?;
//! assert!(square.is_latin());
//! # Ok::<(), puzzlegate_solver::SolverError>(())
//! ```

pub use self::{budget::*, error::*, four_coloring::*, latin_square::*};

mod budget;
mod error;
mod four_coloring;
mod latin_square;
