use crate::SolverError;

/// Upper bound on the number of candidates a search may try.
///
/// The default is generous for every size the games use; it only matters if
/// parameters are scaled up far enough to make the search pathological.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchBudget {
    max_attempts: usize,
}

impl SearchBudget {
    /// The budget used when none is given.
    pub const DEFAULT: Self = Self::new(200_000);

    /// Creates a budget allowing `max_attempts` candidate tries.
    #[must_use]
    pub const fn new(max_attempts: usize) -> Self {
        Self { max_attempts }
    }

    /// Returns the maximum number of candidate tries.
    #[must_use]
    pub const fn max_attempts(self) -> usize {
        self.max_attempts
    }

    pub(crate) fn counter(self) -> AttemptCounter {
        AttemptCounter {
            used: 0,
            max: self.max_attempts,
        }
    }
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug)]
pub(crate) struct AttemptCounter {
    used: usize,
    max: usize,
}

impl AttemptCounter {
    pub(crate) fn spend(&mut self) -> Result<(), SolverError> {
        if self.used >= self.max {
            return Err(SolverError::BudgetExhausted {
                attempts: self.used,
            });
        }
        self.used += 1;
        Ok(())
    }

    pub(crate) fn used(&self) -> usize {
        self.used
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_stops_at_limit() {
        let mut counter = SearchBudget::new(2).counter();
        assert!(counter.spend().is_ok());
        assert!(counter.spend().is_ok());
        assert_eq!(
            counter.spend(),
            Err(SolverError::BudgetExhausted { attempts: 2 })
        );
        assert_eq!(counter.used(), 2);
    }
}
