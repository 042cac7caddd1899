//! Bridges (Hashiwokakero): islands joined by horizontal and vertical bridges.
//!
//! The solution is grown as a tree. Starting from a random island, each step
//! walks a random distance in a random direction from the current island,
//! places a new island there and records the bridge between them.

use puzzlegate_core::{Direction, GridSize, Position, Relabel};
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{BridgesParams, GeneratorError, PuzzleSeed};

const DOMAIN: &str = "bridges";

/// Number of parallel bridges between two islands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Multiplicity {
    /// One bridge.
    Single,
    /// Two parallel bridges.
    Double,
}

impl Multiplicity {
    /// Returns the number of bridges, 1 or 2.
    #[must_use]
    #[inline]
    pub const fn count(self) -> u8 {
        match self {
            Self::Single => 1,
            Self::Double => 2,
        }
    }
}

/// An island with the number of bridges it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Island {
    /// Index of the island within its puzzle.
    pub id: usize,
    /// Grid cell of the island.
    pub position: Position,
    /// Total multiplicity of the bridges touching the island.
    pub required: u8,
}

/// A bridge between islands `a` and `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bridge {
    /// Lower island id.
    pub a: usize,
    /// Higher island id.
    pub b: usize,
    /// Number of parallel bridges.
    pub multiplicity: Multiplicity,
}

impl Bridge {
    /// Creates a bridge, ordering the endpoints.
    #[must_use]
    pub fn new(a: usize, b: usize, multiplicity: Multiplicity) -> Self {
        Self {
            a: a.min(b),
            b: a.max(b),
            multiplicity,
        }
    }

    /// Returns `true` if `island` is one of the endpoints.
    #[must_use]
    pub fn touches(&self, island: usize) -> bool {
        self.a == island || self.b == island
    }
}

/// The straight grid path of a bridge between two aligned cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridSegment {
    start: Position,
    end: Position,
}

impl GridSegment {
    /// Creates the path between two cells on a common row or column.
    ///
    /// Returns `None` if the cells are not aligned or are the same cell.
    #[must_use]
    pub fn new(a: Position, b: Position) -> Option<Self> {
        if a == b || !(a.same_row(b) || a.same_column(b)) {
            return None;
        }
        Some(Self {
            start: a.min(b),
            end: a.max(b),
        })
    }

    /// Returns the endpoint that comes first in row-major order.
    #[must_use]
    pub fn start(&self) -> Position {
        self.start
    }

    /// Returns the endpoint that comes last in row-major order.
    #[must_use]
    pub fn end(&self) -> Position {
        self.end
    }

    /// Returns `true` if the path runs along a row.
    #[must_use]
    pub fn is_horizontal(&self) -> bool {
        self.start.same_row(self.end)
    }

    /// Returns `true` if `pos` lies strictly between the endpoints.
    #[must_use]
    pub fn covers(&self, pos: Position) -> bool {
        if self.is_horizontal() {
            pos.y == self.start.y && self.start.x < pos.x && pos.x < self.end.x
        } else {
            pos.x == self.start.x && self.start.y < pos.y && pos.y < self.end.y
        }
    }

    /// Returns the cells strictly between the endpoints.
    pub fn interior(&self) -> impl Iterator<Item = Position> {
        self.start.between(self.end)
    }

    /// Returns `true` if the two paths cross or overlap.
    ///
    /// A horizontal and a vertical path cross when each passes strictly through
    /// the interior of the other. Paths meeting only at a shared endpoint never
    /// cross.
    #[must_use]
    pub fn crosses(&self, other: &Self) -> bool {
        match (self.is_horizontal(), other.is_horizontal()) {
            (true, false) => self.covers(Position::new(other.start.x, self.start.y))
                && other.covers(Position::new(other.start.x, self.start.y)),
            (false, true) => other.crosses(self),
            (true, true) => {
                self.start.y == other.start.y
                    && self.start.x.max(other.start.x) < self.end.x.min(other.end.x)
            }
            (false, false) => {
                self.start.x == other.start.x
                    && self.start.y.max(other.start.y) < self.end.y.min(other.end.y)
            }
        }
    }
}

/// A generated bridges puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BridgesPuzzleFields")]
pub struct BridgesPuzzle {
    size: GridSize,
    islands: Vec<Island>,
    solution: Vec<Bridge>,
    seed: PuzzleSeed,
}

#[derive(Deserialize)]
struct BridgesPuzzleFields {
    size: GridSize,
    islands: Vec<Island>,
    solution: Vec<Bridge>,
    seed: PuzzleSeed,
}

impl TryFrom<BridgesPuzzleFields> for BridgesPuzzle {
    type Error = GeneratorError;

    fn try_from(fields: BridgesPuzzleFields) -> Result<Self, Self::Error> {
        Self::new(fields.size, fields.islands, fields.solution, fields.seed)
    }
}

impl BridgesPuzzle {
    /// Builds a puzzle from islands and a solution.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::InvalidParameters`] if an island id does not match
    /// its index, islands share a cell or lie outside the grid, or a solution
    /// bridge is not a straight unobstructed path between two known islands.
    pub fn new(
        size: GridSize,
        islands: Vec<Island>,
        solution: Vec<Bridge>,
        seed: PuzzleSeed,
    ) -> Result<Self, GeneratorError> {
        let invalid = |reason| Err(GeneratorError::InvalidParameters { reason });
        let mut seen = vec![false; size.len()];
        for (index, island) in islands.iter().enumerate() {
            if island.id != index {
                return invalid("island ids must match their index");
            }
            if !size.contains(island.position) {
                return invalid("island outside the grid");
            }
            let cell = &mut seen[size.index_of(island.position)];
            if *cell {
                return invalid("islands share a cell");
            }
            *cell = true;
        }
        let this = Self {
            size,
            islands,
            solution,
            seed,
        };
        for bridge in &this.solution {
            if bridge.a >= this.islands.len() || bridge.b >= this.islands.len() {
                return invalid("bridge refers to an unknown island");
            }
            let Some(path) = this.path(bridge.a, bridge.b) else {
                return invalid("bridge endpoints are not aligned");
            };
            if this.islands.iter().any(|island| path.covers(island.position)) {
                return invalid("bridge passes through an island");
            }
        }
        Ok(this)
    }

    /// Returns the grid dimensions.
    #[must_use]
    pub fn size(&self) -> GridSize {
        self.size
    }

    /// Returns the islands, indexed by id.
    #[must_use]
    pub fn islands(&self) -> &[Island] {
        &self.islands
    }

    /// Returns the island at `pos`, if any.
    #[must_use]
    pub fn island_at(&self, pos: Position) -> Option<&Island> {
        self.islands.iter().find(|island| island.position == pos)
    }

    /// Returns the solution bridges.
    #[must_use]
    pub fn solution(&self) -> &[Bridge] {
        &self.solution
    }

    /// Returns the grid path of the bridge between islands `a` and `b`.
    ///
    /// Returns `None` if the islands are not aligned.
    ///
    /// # Panics
    ///
    /// Panics if an island id is out of range.
    #[must_use]
    pub fn path(&self, a: usize, b: usize) -> Option<GridSegment> {
        GridSegment::new(self.islands[a].position, self.islands[b].position)
    }

    /// Returns `true` if the paths of two bridges cross.
    ///
    /// # Panics
    ///
    /// Panics if an island id is out of range.
    #[must_use]
    pub fn bridge_paths_cross(&self, a: &Bridge, b: &Bridge) -> bool {
        match (self.path(a.a, a.b), self.path(b.a, b.b)) {
            (Some(a), Some(b)) => a.crosses(&b),
            _ => false,
        }
    }

    /// Returns the seed the puzzle was generated from.
    #[must_use]
    pub fn seed(&self) -> PuzzleSeed {
        self.seed
    }
}

/// Generator of bridges puzzles.
///
/// # Examples
///
/// ```
/// use puzzlegate_generator::{BridgesGenerator, BridgesParams, PuzzleSeed};
///
/// let generator = BridgesGenerator::new(BridgesParams::default())?;
/// let puzzle = generator.generate_with_seed(PuzzleSeed::from_u64(3))?;
/// assert!((6..=10).contains(&puzzle.islands().len()));
/// assert_eq!(puzzle.solution().len(), puzzle.islands().len() - 1);
/// # Ok::<(), puzzlegate_generator::GeneratorError>(())
/// ```
#[derive(Debug, Clone)]
pub struct BridgesGenerator {
    params: BridgesParams,
}

/// Island and bridge layout of one growth attempt, before compaction.
#[derive(Debug)]
struct Layout {
    islands: Vec<Position>,
    bridges: Vec<Bridge>,
    island_cells: Vec<bool>,
    path_cells: Vec<bool>,
}

impl Layout {
    fn new(size: GridSize, first: Position) -> Self {
        let mut layout = Self {
            islands: Vec::new(),
            bridges: Vec::new(),
            island_cells: vec![false; size.len()],
            path_cells: vec![false; size.len()],
        };
        layout.islands.push(first);
        layout.island_cells[size.index_of(first)] = true;
        layout
    }

    /// Returns `true` if a new island at `dest` bridged from `from` fits.
    ///
    /// The destination must be a free cell and the path must not run through an
    /// island or an existing bridge path. A path cell shared with a bridge
    /// crossing it or running alongside it is exactly such a conflict.
    fn accepts(&self, size: GridSize, from: Position, dest: Position) -> bool {
        let free = |pos: Position| {
            let index = size.index_of(pos);
            !self.island_cells[index] && !self.path_cells[index]
        };
        free(dest) && from.between(dest).all(free)
    }

    fn push(&mut self, size: GridSize, from: usize, dest: Position, multiplicity: Multiplicity) {
        let id = self.islands.len();
        for pos in self.islands[from].between(dest) {
            self.path_cells[size.index_of(pos)] = true;
        }
        self.islands.push(dest);
        self.island_cells[size.index_of(dest)] = true;
        self.bridges.push(Bridge::new(from, id, multiplicity));
    }
}

impl BridgesGenerator {
    /// Creates a generator.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::InvalidParameters`] if `params` are out of range.
    pub fn new(params: BridgesParams) -> Result<Self, GeneratorError> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Returns the generator parameters.
    #[must_use]
    pub fn params(&self) -> &BridgesParams {
        &self.params
    }

    /// Generates a puzzle from a fresh random seed.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::BridgesStalled`] if growth cannot reach the target
    /// island count within the restart limit.
    pub fn generate(&self) -> Result<BridgesPuzzle, GeneratorError> {
        self.generate_with_seed(PuzzleSeed::random())
    }

    /// Generates the puzzle determined by `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::BridgesStalled`] if growth cannot reach the target
    /// island count within the restart limit.
    pub fn generate_with_seed(&self, seed: PuzzleSeed) -> Result<BridgesPuzzle, GeneratorError> {
        let size = GridSize::new(self.params.width, self.params.height);
        let mut rng = seed.rng(DOMAIN);
        let target = rng.random_range(self.params.min_islands..=self.params.max_islands);

        for restart in 0..=self.params.max_restarts {
            let Some(layout) = self.grow(size, target, &mut rng) else {
                log::trace!("bridge growth stalled before {target} islands, restart {restart}");
                continue;
            };
            let puzzle = compact(size, layout, seed);
            log::debug!(
                "generated bridges puzzle: islands={}, bridges={}, restarts={restart}, seed={seed}",
                puzzle.islands.len(),
                puzzle.solution.len()
            );
            return Ok(puzzle);
        }

        log::warn!(
            "bridge growth stalled after {} restarts, seed={seed}",
            self.params.max_restarts
        );
        Err(GeneratorError::BridgesStalled {
            restarts: self.params.max_restarts,
        })
    }

    /// Grows a tree of `target` islands, or returns `None` if every island runs
    /// out of valid extensions first.
    fn grow<R>(&self, size: GridSize, target: usize, rng: &mut R) -> Option<Layout>
    where
        R: Rng + ?Sized,
    {
        let first = size.position_of(rng.random_range(0..size.len()));
        let mut layout = Layout::new(size, first);
        let mut exhausted = vec![false];
        let mut current = 0;

        let mut moves = Direction::ALL
            .into_iter()
            .flat_map(|dir| (self.params.min_step..=self.params.max_step).map(move |d| (dir, d)))
            .collect::<Vec<_>>();

        while layout.islands.len() < target {
            let from = layout.islands[current];
            moves.shuffle(rng);
            let dest = moves.iter().find_map(|&(dir, distance)| {
                size.step(from, dir, distance)
                    .filter(|&dest| layout.accepts(size, from, dest))
            });

            if let Some(dest) = dest {
                let multiplicity = if rng.random_bool(self.params.double_probability) {
                    Multiplicity::Double
                } else {
                    Multiplicity::Single
                };
                layout.push(size, current, dest, multiplicity);
                exhausted.push(false);
                current = layout.islands.len() - 1;
                continue;
            }

            exhausted[current] = true;
            let open = (0..layout.islands.len())
                .filter(|&id| !exhausted[id])
                .collect::<Vec<_>>();
            current = *open.choose(rng)?;
        }

        Some(layout)
    }
}

/// Computes required counts and drops islands without bridges.
fn compact(size: GridSize, layout: Layout, seed: PuzzleSeed) -> BridgesPuzzle {
    let mut required = vec![0u8; layout.islands.len()];
    for bridge in &layout.bridges {
        required[bridge.a] += bridge.multiplicity.count();
        required[bridge.b] += bridge.multiplicity.count();
    }

    let relabel = Relabel::retain(layout.islands.len(), |id| required[id] > 0);
    if !relabel.is_identity() {
        log::trace!(
            "dropping {} islands without bridges",
            layout.islands.len() - relabel.len()
        );
    }

    let islands = relabel
        .compact(layout.islands.into_iter().zip(required).collect::<Vec<_>>())
        .into_iter()
        .enumerate()
        .map(|(id, (position, required))| Island {
            id,
            position,
            required,
        })
        .collect();
    let solution = layout
        .bridges
        .into_iter()
        .filter_map(|bridge| {
            Some(Bridge::new(
                relabel.get(bridge.a)?,
                relabel.get(bridge.b)?,
                bridge.multiplicity,
            ))
        })
        .collect();

    BridgesPuzzle {
        size,
        islands,
        solution,
        seed,
    }
}
