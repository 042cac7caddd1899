//! Region map: a planar subdivision of a grid to be four-coloured.
//!
//! Each cell is split into four triangular quadrants along its diagonals so
//! region borders can run diagonally through a cell. Generation grows regions
//! over whole cells, then re-assigns one quadrant in some 2×2 blocks so that a
//! region cornered by another meets it along diagonals instead.

use puzzlegate_core::{Adjacency, Direction, GridSize, Position};
use puzzlegate_solver::{Color, FourColoring, is_proper_coloring};
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{GeneratorError, MapParams, PuzzleSeed};

const DOMAIN: &str = "map";

/// Identifier of a map region.
pub type RegionId = usize;

/// One of the four triangles a cell is split into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quadrant {
    /// Triangle along the top edge.
    Top,
    /// Triangle along the right edge.
    Right,
    /// Triangle along the bottom edge.
    Bottom,
    /// Triangle along the left edge.
    Left,
}

impl Quadrant {
    /// All quadrants, clockwise from [`Quadrant::Top`].
    pub const ALL: [Self; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    /// Returns the index of the quadrant within a cell's `[RegionId; 4]`.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::Top => 0,
            Self::Right => 1,
            Self::Bottom => 2,
            Self::Left => 3,
        }
    }
}

const TOP: usize = Quadrant::Top.index();
const RIGHT: usize = Quadrant::Right.index();
const BOTTOM: usize = Quadrant::Bottom.index();
const LEFT: usize = Quadrant::Left.index();

/// A generated region map puzzle.
///
/// On deserialization the adjacency graph is rebuilt from the quadrants and the
/// colouring and clues are checked against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MapPuzzleFields")]
pub struct MapPuzzle {
    size: GridSize,
    cells: Vec<[RegionId; 4]>,
    adjacency: Adjacency,
    solution: Vec<Color>,
    clues: Vec<Option<Color>>,
    seed: PuzzleSeed,
}

#[derive(Deserialize)]
struct MapPuzzleFields {
    size: GridSize,
    cells: Vec<[RegionId; 4]>,
    solution: Vec<Color>,
    clues: Vec<Option<Color>>,
    seed: PuzzleSeed,
}

impl TryFrom<MapPuzzleFields> for MapPuzzle {
    type Error = GeneratorError;

    fn try_from(fields: MapPuzzleFields) -> Result<Self, Self::Error> {
        let invalid = |reason| Err(GeneratorError::InvalidParameters { reason });
        let MapPuzzleFields {
            size,
            cells,
            solution,
            clues,
            seed,
        } = fields;
        let regions = solution.len();
        if cells.len() != size.len() {
            return invalid("map cells do not match the grid");
        }
        if cells.iter().flatten().any(|&region| region >= regions) {
            return invalid("quadrant refers to an unknown region");
        }
        if clues.len() != regions {
            return invalid("clues do not match the regions");
        }
        let adjacency = region_adjacency(size, &cells, regions);
        if !is_proper_coloring(&adjacency, &solution) {
            return invalid("adjacent regions share a colour");
        }
        if clues
            .iter()
            .zip(&solution)
            .any(|(clue, color)| clue.is_some_and(|clue| clue != *color))
        {
            return invalid("clue disagrees with the solution");
        }
        Ok(Self {
            size,
            cells,
            adjacency,
            solution,
            clues,
            seed,
        })
    }
}

impl MapPuzzle {
    /// Returns the grid dimensions.
    #[must_use]
    pub fn size(&self) -> GridSize {
        self.size
    }

    /// Returns the quadrant regions of every cell, in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[[RegionId; 4]] {
        &self.cells
    }

    /// Returns the region owning `quadrant` of the cell at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is outside the grid.
    #[must_use]
    pub fn region_at(&self, pos: Position, quadrant: Quadrant) -> RegionId {
        self.cells[self.size.index_of(pos)][quadrant.index()]
    }

    /// Returns the number of regions.
    #[must_use]
    pub fn region_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Returns the region adjacency graph.
    #[must_use]
    pub fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }

    /// Returns the solved colouring, one colour per region.
    #[must_use]
    pub fn solution(&self) -> &[Color] {
        &self.solution
    }

    /// Returns the revealed clue colours, one entry per region.
    #[must_use]
    pub fn clues(&self) -> &[Option<Color>] {
        &self.clues
    }

    /// Returns the seed the puzzle was generated from.
    #[must_use]
    pub fn seed(&self) -> PuzzleSeed {
        self.seed
    }
}

/// Generator of region map puzzles.
///
/// # Examples
///
/// ```
/// use puzzlegate_generator::{MapGenerator, MapParams, PuzzleSeed};
/// use puzzlegate_solver::is_proper_coloring;
///
/// let generator = MapGenerator::new(MapParams::default())?;
/// let puzzle = generator.generate_with_seed(PuzzleSeed::from_u64(7))?;
/// assert_eq!(puzzle.region_count(), 12);
/// assert!(is_proper_coloring(puzzle.adjacency(), puzzle.solution()));
/// # Ok::<(), puzzlegate_generator::GeneratorError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MapGenerator {
    params: MapParams,
    coloring: FourColoring,
}

impl MapGenerator {
    /// Creates a generator.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::InvalidParameters`] if `params` are out of range.
    pub fn new(params: MapParams) -> Result<Self, GeneratorError> {
        params.validate()?;
        Ok(Self {
            params,
            coloring: FourColoring::new(),
        })
    }

    /// Replaces the colouring solver, e.g. to change its budget.
    #[must_use]
    pub fn with_coloring(mut self, coloring: FourColoring) -> Self {
        self.coloring = coloring;
        self
    }

    /// Returns the generator parameters.
    #[must_use]
    pub fn params(&self) -> &MapParams {
        &self.params
    }

    /// Generates a puzzle from a fresh random seed.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::ColoringFailed`] if no generated map could be
    /// coloured within the attempt limit.
    pub fn generate(&self) -> Result<MapPuzzle, GeneratorError> {
        self.generate_with_seed(PuzzleSeed::random())
    }

    /// Generates the puzzle determined by `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::ColoringFailed`] if no generated map could be
    /// coloured within the attempt limit.
    pub fn generate_with_seed(&self, seed: PuzzleSeed) -> Result<MapPuzzle, GeneratorError> {
        let size = GridSize::new(self.params.width, self.params.height);
        for attempt in 0..self.params.max_attempts {
            let mut rng = seed.rng_for_attempt(DOMAIN, attempt);
            let owners = grow_regions(size, self.params.regions, &mut rng)?;
            let cells = split_cells(size, &owners, &mut rng);
            let adjacency = region_adjacency(size, &cells, self.params.regions);

            let solution = match self.coloring.solve(&adjacency, &mut rng) {
                Ok(solution) => solution,
                Err(err) => {
                    log::trace!("map attempt {attempt} could not be coloured: {err}");
                    continue;
                }
            };
            let clues = solution
                .iter()
                .map(|&color| rng.random_bool(self.params.clue_probability).then_some(color))
                .collect::<Vec<_>>();

            log::debug!(
                "generated map puzzle: {}x{}, regions={}, borders={}, clues={}, seed={seed}",
                size.width,
                size.height,
                adjacency.len(),
                adjacency.edge_count(),
                clues.iter().flatten().count()
            );
            return Ok(MapPuzzle {
                size,
                cells,
                adjacency,
                solution,
                clues,
                seed,
            });
        }

        log::warn!(
            "map colouring failed after {} attempts, seed={seed}",
            self.params.max_attempts
        );
        Err(GeneratorError::ColoringFailed {
            attempts: self.params.max_attempts,
        })
    }
}

/// Assigns every cell to one of `regions` regions by randomized flood fill.
///
/// Seeds are `regions` distinct random cells. Each step picks a random unfilled
/// cell bordering a filled one and gives it the region of a random filled
/// neighbour.
fn grow_regions<R>(
    size: GridSize,
    regions: usize,
    rng: &mut R,
) -> Result<Vec<RegionId>, GeneratorError>
where
    R: Rng + ?Sized,
{
    let mut owners: Vec<Option<RegionId>> = vec![None; size.len()];
    let mut order = (0..size.len()).collect::<Vec<_>>();
    order.shuffle(rng);
    for (region, &cell) in order.iter().take(regions).enumerate() {
        owners[cell] = Some(region);
    }

    let mut queued = vec![false; size.len()];
    let mut frontier = Vec::new();
    for pos in size.positions() {
        if owners[size.index_of(pos)].is_some() {
            for next in size.neighbors(pos) {
                let index = size.index_of(next);
                if owners[index].is_none() && !queued[index] {
                    queued[index] = true;
                    frontier.push(next);
                }
            }
        }
    }

    while !frontier.is_empty() {
        let pos = frontier.swap_remove(rng.random_range(0..frontier.len()));
        let filled = size
            .neighbors(pos)
            .filter_map(|next| owners[size.index_of(next)])
            .collect::<Vec<_>>();
        let Some(&region) = filled.choose(rng) else {
            continue;
        };
        owners[size.index_of(pos)] = Some(region);
        for next in size.neighbors(pos) {
            let index = size.index_of(next);
            if owners[index].is_none() && !queued[index] {
                queued[index] = true;
                frontier.push(next);
            }
        }
    }

    owners
        .into_iter()
        .collect::<Option<Vec<_>>>()
        .ok_or(GeneratorError::InvalidParameters {
            reason: "map growth left cells unassigned",
        })
}

/// Splits whole-cell regions into quadrants and applies the diagonal cross-cuts.
///
/// A 2×2 block where one corner cell belongs to a region and the other three
/// to a second region is cut: one of the two cells edge-adjacent to the corner
/// gives the quadrant facing the corner to the corner's region. The donor keeps
/// three chained quadrants, so both regions stay connected and no new region
/// pair becomes adjacent. A block is only cut if none of its cells was already
/// split.
fn split_cells<R>(size: GridSize, owners: &[RegionId], rng: &mut R) -> Vec<[RegionId; 4]>
where
    R: Rng + ?Sized,
{
    let mut cells = owners.iter().map(|&region| [region; 4]).collect::<Vec<_>>();
    let mut split = vec![false; size.len()];

    for y in 0..size.height.saturating_sub(1) {
        for x in 0..size.width.saturating_sub(1) {
            // Corner `i` has its horizontal partner at `i ^ 1`, its vertical
            // partner at `i ^ 2` and its diagonal at `i ^ 3`.
            let block = [(x, y), (x + 1, y), (x, y + 1), (x + 1, y + 1)]
                .map(|(x, y)| size.index_of(Position::new(x, y)));
            if block.iter().any(|&cell| split[cell]) {
                continue;
            }
            let Some(corner) = (0..4).find(|&i| {
                let rest = owners[block[i ^ 1]];
                owners[block[i]] != rest
                    && owners[block[i ^ 2]] == rest
                    && owners[block[i ^ 3]] == rest
            }) else {
                continue;
            };
            let (donor, facing) = if rng.random_bool(0.5) {
                (block[corner ^ 1], if corner & 1 == 0 { LEFT } else { RIGHT })
            } else {
                (block[corner ^ 2], if corner & 2 == 0 { TOP } else { BOTTOM })
            };
            cells[donor][facing] = owners[block[corner]];
            for cell in block {
                split[cell] = true;
            }
        }
    }

    cells
}

/// Builds the region adjacency graph from the quadrant assignment.
fn region_adjacency(size: GridSize, cells: &[[RegionId; 4]], regions: usize) -> Adjacency {
    let mut adjacency = Adjacency::new(regions);
    for pos in size.positions() {
        let quads = cells[size.index_of(pos)];
        for i in 0..4 {
            for j in i + 1..4 {
                adjacency.add_edge(quads[i], quads[j]);
            }
        }
        if let Some(right) = size.step(pos, Direction::Right, 1) {
            adjacency.add_edge(quads[RIGHT], cells[size.index_of(right)][LEFT]);
        }
        if let Some(below) = size.step(pos, Direction::Down, 1) {
            adjacency.add_edge(quads[BOTTOM], cells[size.index_of(below)][TOP]);
        }
    }
    adjacency
}
