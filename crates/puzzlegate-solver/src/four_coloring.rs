use std::fmt;

use puzzlegate_core::Adjacency;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{SearchBudget, SolverError};

/// One of the four map colours, `0..=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Color(u8);

impl Color {
    /// Number of distinct colours.
    pub const COUNT: u8 = 4;

    /// All colours in ascending order.
    pub const ALL: [Self; 4] = [Self(0), Self(1), Self(2), Self(3)];

    /// Creates a colour from its index, or `None` if `index >= 4`.
    #[must_use]
    pub const fn new(index: u8) -> Option<Self> {
        if index < Self::COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Returns the colour index.
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Returns the colour after this one, or `None` after the last colour.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        Self::new(self.0 + 1)
    }
}

impl TryFrom<u8> for Color {
    type Error = SolverError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::new(index).ok_or(SolverError::InvalidColor {
            index,
            max: Self::COUNT - 1,
        })
    }
}

impl From<Color> for u8 {
    fn from(color: Color) -> Self {
        color.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Returns `true` if no two adjacent nodes share a colour.
///
/// # Panics
///
/// Panics if `colors` does not have one entry per node.
#[must_use]
pub fn is_proper_coloring(adjacency: &Adjacency, colors: &[Color]) -> bool {
    assert_eq!(colors.len(), adjacency.len(), "one colour per node");
    adjacency.edges().all(|(a, b)| colors[a] != colors[b])
}

/// Randomized backtracking four-colouring of an adjacency graph.
///
/// Nodes are coloured in index order. Each node tries the four colours in a
/// freshly shuffled order and rejects any colour already used by a coloured
/// neighbour. Planar region maps always admit a colouring, so for them the
/// budget only guards against malformed input.
///
/// # Examples
///
/// ```
/// use puzzlegate_core::Adjacency;
/// use puzzlegate_solver::{FourColoring, is_proper_coloring};
/// use rand::SeedableRng as _;
/// use rand_pcg::Pcg64;
///
/// let wheel = Adjacency::from_edges(5, [(0, 1), (1, 2), (2, 3), (3, 0), (4, 0), (4, 1), (4, 2), (4, 3)]);
/// let colors = FourColoring::new().solve(&wheel, &mut Pcg64::seed_from_u64(3))?;
/// assert!(is_proper_coloring(&wheel, &colors));
/// # Ok::<(), puzzlegate_solver::SolverError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FourColoring {
    budget: SearchBudget,
}

#[derive(Debug)]
struct ChoicePoint {
    candidates: Vec<Color>,
}

impl FourColoring {
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

    /// Colours every node of `adjacency`.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::Unsatisfiable`] if the graph is not four-colourable and
    /// [`SolverError::BudgetExhausted`] if the budget runs out first.
    pub fn solve<R>(&self, adjacency: &Adjacency, rng: &mut R) -> Result<Vec<Color>, SolverError>
    where
        R: Rng + ?Sized,
    {
        let total = adjacency.len();
        if total == 0 {
            return Ok(Vec::new());
        }

        let mut colors: Vec<Option<Color>> = vec![None; total];
        let mut attempts = self.budget.counter();

        let shuffled = |rng: &mut R| {
            let mut candidates = Color::ALL.to_vec();
            candidates.shuffle(rng);
            ChoicePoint { candidates }
        };

        let mut stack = Vec::with_capacity(total);
        stack.push(shuffled(rng));

        while !stack.is_empty() {
            let node = stack.len() - 1;
            colors[node] = None;
            let point = &mut stack[node];

            let next = loop {
                let Some(color) = point.candidates.pop() else {
                    break None;
                };
                attempts.spend()?;
                let clashes = adjacency
                    .neighbors(node)
                    .filter(|&other| other < node)
                    .any(|other| colors[other] == Some(color));
                if !clashes {
                    break Some(color);
                }
            };

            let Some(color) = next else {
                stack.pop();
                continue;
            };
            colors[node] = Some(color);

            if node + 1 == total {
                log::trace!(
                    "{total} regions coloured after {} attempts",
                    attempts.used()
                );
                return Ok(colors.into_iter().flatten().collect());
            }
            stack.push(shuffled(rng));
        }

        Err(SolverError::Unsatisfiable)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand_pcg::Pcg64;

    use super::*;

    fn complete_graph(n: usize) -> Adjacency {
        Adjacency::from_edges(n, (0..n).flat_map(|a| (a + 1..n).map(move |b| (a, b))))
    }

    #[test]
    fn test_colors_complete_graph_on_four_nodes() {
        let graph = complete_graph(4);
        let colors = FourColoring::new()
            .solve(&graph, &mut Pcg64::seed_from_u64(0))
            .unwrap();
        assert!(is_proper_coloring(&graph, &colors));
        let mut sorted = colors.clone();
        sorted.sort();
        assert_eq!(sorted, Color::ALL.to_vec());
    }

    #[test]
    fn test_color_rejects_index_past_last() {
        assert_eq!(Color::try_from(3), Ok(Color::ALL[3]));
        let err = Color::try_from(5).unwrap_err();
        assert_eq!(err, SolverError::InvalidColor { index: 5, max: 3 });
        assert_eq!(err.to_string(), "colour index 5 is outside 0..=3");

        let err = serde_json::from_str::<Color>("5").unwrap_err();
        assert!(err.to_string().contains("colour index 5"));
    }

    #[test]
    fn test_complete_graph_on_five_nodes_is_unsatisfiable() {
        let graph = complete_graph(5);
        assert_eq!(
            FourColoring::new().solve(&graph, &mut Pcg64::seed_from_u64(0)),
            Err(SolverError::Unsatisfiable)
        );
    }

    #[test]
    fn test_budget_exhaustion_is_reported() {
        let graph = complete_graph(5);
        let result =
            FourColoring::with_budget(SearchBudget::new(5)).solve(&graph, &mut Pcg64::seed_from_u64(0));
        assert_eq!(result, Err(SolverError::BudgetExhausted { attempts: 5 }));
    }

    #[test]
    fn test_empty_graph() {
        let colors = FourColoring::new()
            .solve(&Adjacency::new(0), &mut Pcg64::seed_from_u64(0))
            .unwrap();
        assert!(colors.is_empty());
    }

    #[test]
    fn test_color_cycle() {
        assert_eq!(Color::new(0).and_then(Color::next), Color::new(1));
        assert_eq!(Color::ALL[3].next(), None);
        assert_eq!(Color::new(4), None);
        assert!(Color::try_from(9).is_err());
    }

    proptest! {
        #[test]
        fn prop_grid_graphs_are_colored_properly(seed in any::<u64>(), w in 1usize..6, h in 1usize..6) {
            let index = |x: usize, y: usize| y * w + x;
            let mut graph = Adjacency::new(w * h);
            for y in 0..h {
                for x in 0..w {
                    if x + 1 < w {
                        graph.add_edge(index(x, y), index(x + 1, y));
                    }
                    if y + 1 < h {
                        graph.add_edge(index(x, y), index(x, y + 1));
                    }
                    if x + 1 < w && y + 1 < h {
                        graph.add_edge(index(x, y), index(x + 1, y + 1));
                    }
                }
            }
            let colors = FourColoring::new()
                .solve(&graph, &mut Pcg64::seed_from_u64(seed))
                .unwrap();
            prop_assert!(is_proper_coloring(&graph, &colors));
        }
    }
}
