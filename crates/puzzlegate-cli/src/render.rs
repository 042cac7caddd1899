//! ASCII views of generated puzzles.

use std::fmt;

use puzzlegate_core::Position;
use puzzlegate_generator::{
    BridgesPuzzle, KeenPuzzle, MapPuzzle, Multiplicity, Quadrant, UntanglePuzzle, count_crossings,
};

/// Keen cage layout, clues and solution.
pub struct KeenView<'a>(pub &'a KeenPuzzle);

impl fmt::Display for KeenView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let puzzle = self.0;
        let size = puzzle.grid_size();

        writeln!(f, "Cages:")?;
        for y in 0..size.height {
            write!(f, " ")?;
            for x in 0..size.width {
                write!(f, " {:>2}", puzzle.cage_at(Position::new(x, y)).id)?;
            }
            writeln!(f)?;
        }
        writeln!(f)?;
        writeln!(f, "Clues:")?;
        for cage in puzzle.cages() {
            writeln!(f, "  {:>2}: {}", cage.id, cage.clue())?;
        }
        writeln!(f)?;
        writeln!(f, "Solution:")?;
        for row in puzzle.solution().rows() {
            write!(f, " ")?;
            for value in row {
                write!(f, " {value:>2}")?;
            }
            writeln!(f)?;
        }
        writeln!(f)?;
        write!(f, "Seed: {}", puzzle.seed())
    }
}

/// Region map with one region id per cell quadrant, clues and colouring.
pub struct MapView<'a>(pub &'a MapPuzzle);

impl fmt::Display for MapView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let puzzle = self.0;
        let size = puzzle.size();
        let rule = format!("+{}", "------+".repeat(usize::from(size.width)));

        writeln!(f, "Regions:")?;
        writeln!(f, "{rule}")?;
        for y in 0..size.height {
            for line in 0..3 {
                write!(f, "|")?;
                for x in 0..size.width {
                    let pos = Position::new(x, y);
                    let region = |quadrant| puzzle.region_at(pos, quadrant);
                    match line {
                        0 => write!(f, "  {:>2}  |", region(Quadrant::Top))?,
                        1 => write!(
                            f,
                            "{:>2}  {:>2}|",
                            region(Quadrant::Left),
                            region(Quadrant::Right)
                        )?,
                        _ => write!(f, "  {:>2}  |", region(Quadrant::Bottom))?,
                    }
                }
                writeln!(f)?;
            }
            writeln!(f, "{rule}")?;
        }
        writeln!(f)?;

        write!(f, "Clues:")?;
        for (region, clue) in puzzle.clues().iter().enumerate() {
            if let Some(color) = clue {
                write!(f, " {region}={color}")?;
            }
        }
        writeln!(f)?;
        write!(f, "Solution:")?;
        for (region, color) in puzzle.solution().iter().enumerate() {
            write!(f, " {region}={color}")?;
        }
        writeln!(f)?;
        writeln!(f)?;
        write!(f, "Seed: {}", puzzle.seed())
    }
}

/// Bridges islands and solution.
///
/// Islands show their required count. Bridges draw as `-`/`=` across and
/// `|`/`"` down for single/double.
pub struct BridgesView<'a>(pub &'a BridgesPuzzle);

impl BridgesView<'_> {
    fn canvas(&self, with_bridges: bool) -> Vec<Vec<char>> {
        let puzzle = self.0;
        let size = puzzle.size();
        let mut canvas = vec![vec!['.'; usize::from(size.width)]; usize::from(size.height)];
        for island in puzzle.islands() {
            canvas[usize::from(island.position.y)][usize::from(island.position.x)] =
                char::from_digit(u32::from(island.required), 10).unwrap_or('?');
        }
        if with_bridges {
            for bridge in puzzle.solution() {
                let Some(path) = puzzle.path(bridge.a, bridge.b) else {
                    continue;
                };
                let mark = match (path.is_horizontal(), bridge.multiplicity) {
                    (true, Multiplicity::Single) => '-',
                    (true, Multiplicity::Double) => '=',
                    (false, Multiplicity::Single) => '|',
                    (false, Multiplicity::Double) => '"',
                };
                for pos in path.interior() {
                    canvas[usize::from(pos.y)][usize::from(pos.x)] = mark;
                }
            }
        }
        canvas
    }
}

impl fmt::Display for BridgesView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (title, with_bridges) in [("Islands:", false), ("Solution:", true)] {
            writeln!(f, "{title}")?;
            for row in self.canvas(with_bridges) {
                writeln!(f, "  {}", row.into_iter().collect::<String>())?;
            }
            writeln!(f)?;
        }
        write!(f, "Seed: {}", self.0.seed())
    }
}

/// Untangle edges with the scrambled and solved layouts.
pub struct UntangleView<'a>(pub &'a UntanglePuzzle);

impl fmt::Display for UntangleView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let puzzle = self.0;
        write!(f, "Edges:")?;
        for (a, b) in puzzle.edges() {
            write!(f, " {a}-{b}")?;
        }
        writeln!(f)?;
        writeln!(f, "Crossings: {}", puzzle_crossings(puzzle))?;
        writeln!(f)?;
        writeln!(f, "Nodes (scrambled -> solved):")?;
        for (id, (start, solved)) in puzzle.nodes().iter().zip(puzzle.solved_layout()).enumerate() {
            writeln!(
                f,
                "  {id:>2}: ({:.3}, {:.3}) -> ({:.3}, {:.3})",
                start.x, start.y, solved.x, solved.y
            )?;
        }
        writeln!(f)?;
        write!(f, "Seed: {}", puzzle.seed())
    }
}

fn puzzle_crossings(puzzle: &UntanglePuzzle) -> usize {
    count_crossings(puzzle.nodes(), puzzle.edges())
}

#[cfg(test)]
mod tests {
    use puzzlegate_core::GridSize;
    use puzzlegate_generator::{
        Bridge, Island, KeenGenerator, KeenParams, MapGenerator, MapParams, PuzzleSeed,
        UntangleGenerator, UntangleParams,
    };

    use super::*;

    #[test]
    fn test_keen_view_lists_every_cage() {
        let puzzle = KeenGenerator::new(KeenParams::default())
            .unwrap()
            .generate_with_seed(PuzzleSeed::from_u64(0))
            .unwrap();
        let text = KeenView(&puzzle).to_string();
        for cage in puzzle.cages() {
            assert!(text.contains(&format!("{:>2}: {}", cage.id, cage.clue())));
        }
        assert!(text.ends_with(&puzzle.seed().to_string()));
    }

    #[test]
    fn test_bridges_view_draws_paths() {
        let island = |id, x, y, required| Island {
            id,
            position: Position::new(x, y),
            required,
        };
        let puzzle = BridgesPuzzle::new(
            GridSize::new(4, 3),
            vec![island(0, 0, 0, 3), island(1, 3, 0, 2), island(2, 0, 2, 1)],
            vec![
                Bridge::new(0, 1, Multiplicity::Double),
                Bridge::new(0, 2, Multiplicity::Single),
            ],
            PuzzleSeed::from_u64(0),
        )
        .unwrap();
        let text = BridgesView(&puzzle).to_string();
        assert!(text.starts_with("Islands:\n  3..2\n  ....\n  1...\n"));
        assert!(text.contains("Solution:\n  3==2\n  |...\n  1...\n"));
    }

    #[test]
    fn test_map_view_has_three_lines_per_row() {
        let params = MapParams {
            width: 3,
            height: 2,
            regions: 4,
            ..MapParams::default()
        };
        let puzzle = MapGenerator::new(params)
            .unwrap()
            .generate_with_seed(PuzzleSeed::from_u64(1))
            .unwrap();
        let text = MapView(&puzzle).to_string();
        let grid_lines = text.lines().filter(|line| line.starts_with('|')).count();
        assert_eq!(grid_lines, 6);
    }

    #[test]
    fn test_untangle_view_lists_nodes() {
        let puzzle = UntangleGenerator::new(UntangleParams::default())
            .unwrap()
            .generate_with_seed(PuzzleSeed::from_u64(2))
            .unwrap();
        let text = UntangleView(&puzzle).to_string();
        assert!(text.contains(&format!("Crossings: {}", puzzle_crossings(&puzzle))));
        assert_eq!(
            text.lines().filter(|line| line.contains(") -> (")).count(),
            puzzle.nodes().len()
        );
    }
}
