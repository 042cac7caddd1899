/// Errors produced by the backtracking searches.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    derive_more::Display,
    derive_more::Error,
    derive_more::IsVariant,
)]
pub enum SolverError {
    /// The requested grid size is not supported.
    #[display("unsupported size {size}, expected 1..={max}")]
    InvalidSize {
        /// Requested size.
        size: u8,
        /// Largest supported size.
        max: u8,
    },
    /// A colour index is not one of the four map colours.
    #[display("colour index {index} is outside 0..={max}")]
    InvalidColor {
        /// Rejected index.
        index: u8,
        /// Largest colour index.
        max: u8,
    },
    /// The search tried more candidates than its budget allows.
    #[display("search budget exhausted after {attempts} attempts")]
    BudgetExhausted {
        /// Number of candidates tried.
        attempts: usize,
    },
    /// The search space was exhausted without finding a solution.
    #[display("constraints have no solution")]
    Unsatisfiable,
}
