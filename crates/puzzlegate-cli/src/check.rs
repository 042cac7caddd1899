//! Batch validation of generated puzzles.

use log::{debug, info};
use puzzlegate_core::Adjacency;
use puzzlegate_game::{AutoSolve, BridgesGame, KeenGame, MapGame, PuzzleGame, UntangleGame};
use puzzlegate_generator::{
    BridgesGenerator, BridgesPuzzle, KeenGenerator, KeenPuzzle, MapGenerator, MapPuzzle,
    PuzzleConfig, PuzzleSeed, UntangleGenerator, UntanglePuzzle, count_crossings, edges_cross,
};
use puzzlegate_solver::is_proper_coloring;
use rayon::prelude::*;

use crate::CliError;

type Property = &'static str;

fn ensure(holds: bool, property: Property) -> Result<(), Property> {
    if holds { Ok(()) } else { Err(property) }
}

fn ensure_solvable<G>(mut game: G) -> Result<(), Property>
where
    G: AutoSolve,
    G::Report: PartialEq,
{
    ensure(game.verify() == game.verify(), "verify is idempotent")?;
    game.auto_solve();
    ensure(game.verify().solved, "auto-solved state verifies")
}

/// Checks a Keen puzzle: the solution is Latin, cages partition the grid and
/// every clue holds for the solved values.
///
/// # Errors
///
/// Returns the first violated property.
pub fn check_keen(puzzle: &KeenPuzzle) -> Result<(), Property> {
    let solution = puzzle.solution();
    ensure(solution.is_latin(), "solution is a Latin square")?;

    let size = puzzle.grid_size();
    let mut covered = vec![0_u32; size.len()];
    for cage in puzzle.cages() {
        for &pos in &cage.cells {
            covered[size.index_of(pos)] += 1;
        }
        let values = cage.cells.iter().map(|&pos| solution.get(pos)).collect::<Vec<_>>();
        ensure(cage.is_satisfied_by(&values), "cage clues match the solution")?;
    }
    ensure(covered.iter().all(|&n| n == 1), "cages partition the grid")?;

    ensure_solvable(KeenGame::new(puzzle.clone()))
}

/// Checks a region map: the colouring is proper and clues agree with it.
///
/// # Errors
///
/// Returns the first violated property.
pub fn check_map(puzzle: &MapPuzzle) -> Result<(), Property> {
    ensure(
        is_proper_coloring(puzzle.adjacency(), puzzle.solution()),
        "adjacent regions have different colours",
    )?;
    ensure(
        puzzle
            .clues()
            .iter()
            .zip(puzzle.solution())
            .all(|(clue, color)| clue.is_none_or(|clue| clue == *color)),
        "clues match the colouring",
    )?;
    ensure_solvable(MapGame::new(puzzle.clone()))
}

/// Checks a Bridges puzzle: the island count is in range, required counts match
/// the solution, and the solution is crossing free and connected.
///
/// # Errors
///
/// Returns the first violated property.
pub fn check_bridges(puzzle: &BridgesPuzzle, config: &PuzzleConfig) -> Result<(), Property> {
    let params = &config.bridges;
    let islands = puzzle.islands();
    ensure(
        (params.min_islands..=params.max_islands).contains(&islands.len()),
        "island count is in range",
    )?;
    for island in islands {
        let count: u8 = puzzle
            .solution()
            .iter()
            .filter(|bridge| bridge.touches(island.id))
            .map(|bridge| bridge.multiplicity.count())
            .sum();
        ensure(count == island.required, "required counts match the solution")?;
    }
    let solution = puzzle.solution();
    for (i, a) in solution.iter().enumerate() {
        for b in &solution[i + 1..] {
            ensure(!puzzle.bridge_paths_cross(a, b), "solution bridges do not cross")?;
        }
    }
    let graph = Adjacency::from_edges(islands.len(), solution.iter().map(|b| (b.a, b.b)));
    ensure(graph.is_connected(), "solution connects every island")?;

    ensure_solvable(BridgesGame::new(puzzle.clone()))
}

/// Checks an Untangle puzzle: the solved layout is planar and the crossing count
/// of the scrambled layout agrees with a pairwise scan.
///
/// # Errors
///
/// Returns the first violated property.
pub fn check_untangle(puzzle: &UntanglePuzzle) -> Result<(), Property> {
    ensure(
        count_crossings(puzzle.solved_layout(), puzzle.edges()) == 0,
        "solved layout has no crossings",
    )?;

    let edges = puzzle.edges();
    let mut brute_force = 0;
    for (i, &e) in edges.iter().enumerate() {
        for &f in &edges[i + 1..] {
            if edges_cross(puzzle.nodes(), e, f) {
                brute_force += 1;
            }
        }
    }
    let game = UntangleGame::new(puzzle.clone());
    ensure(
        game.crossing_count() == brute_force,
        "scrambled crossing count matches a pairwise scan",
    )?;
    ensure(game.verify() == game.verify(), "verify is idempotent")
}

fn run_batch<P, G, C>(
    game: &'static str,
    seeds: &[PuzzleSeed],
    generate: G,
    check: C,
) -> Result<(), CliError>
where
    G: Fn(PuzzleSeed) -> Result<P, puzzlegate_generator::GeneratorError> + Sync,
    C: Fn(&P) -> Result<(), Property> + Sync,
{
    seeds.par_iter().try_for_each(|&seed| {
        let puzzle = generate(seed)?;
        check(&puzzle).map_err(|property| CliError::CheckFailed {
            game,
            seed,
            property,
        })?;
        debug!("{game} {seed}: ok");
        Ok::<_, CliError>(())
    })?;
    info!("{game}: {} puzzles passed", seeds.len());
    Ok(())
}

/// Generates `count` puzzles per game from consecutive `u64` seeds and checks
/// every guarantee of each.
///
/// # Errors
///
/// Returns [`CliError::CheckFailed`] for a broken puzzle and
/// [`CliError::Generator`] if the config is invalid or generation fails.
pub fn check_all(config: &PuzzleConfig, first_seed: u64, count: u64) -> Result<(), CliError> {
    let seeds = (0..count)
        .map(|i| PuzzleSeed::from_u64(first_seed.wrapping_add(i)))
        .collect::<Vec<_>>();

    let keen = KeenGenerator::new(config.keen.clone())?;
    run_batch("keen", &seeds, |seed| keen.generate_with_seed(seed), check_keen)?;

    let map = MapGenerator::new(config.map.clone())?;
    run_batch("map", &seeds, |seed| map.generate_with_seed(seed), check_map)?;

    let bridges = BridgesGenerator::new(config.bridges.clone())?;
    run_batch(
        "bridges",
        &seeds,
        |seed| bridges.generate_with_seed(seed),
        |puzzle| check_bridges(puzzle, config),
    )?;

    let untangle = UntangleGenerator::new(config.untangle.clone())?;
    run_batch(
        "untangle",
        &seeds,
        |seed| untangle.generate_with_seed(seed),
        check_untangle,
    )
}

#[cfg(test)]
mod tests {
    use puzzlegate_generator::{BridgesParams, GeneratorError, KeenParams};

    use super::*;

    #[test]
    fn test_default_config_passes() {
        check_all(&PuzzleConfig::default(), 0, 8).unwrap();
    }

    #[test]
    fn test_empty_batch_passes() {
        check_all(&PuzzleConfig::default(), 0, 0).unwrap();
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let config = PuzzleConfig {
            keen: KeenParams {
                size: 0,
                ..KeenParams::default()
            },
            ..PuzzleConfig::default()
        };
        let err = check_all(&config, 0, 1).unwrap_err();
        assert!(matches!(
            err,
            CliError::Generator(GeneratorError::InvalidParameters { .. })
        ));
    }

    #[test]
    fn test_island_range_is_checked() {
        let puzzle = BridgesGenerator::new(BridgesParams::default())
            .unwrap()
            .generate_with_seed(PuzzleSeed::from_u64(4))
            .unwrap();
        let mut config = PuzzleConfig::default();
        assert_eq!(check_bridges(&puzzle, &config), Ok(()));

        config.bridges.min_islands = puzzle.islands().len() + 1;
        config.bridges.max_islands = puzzle.islands().len() + 1;
        assert_eq!(
            check_bridges(&puzzle, &config),
            Err("island count is in range")
        );
    }
}
