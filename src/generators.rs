use rand::Rng;
use tracing::{debug, trace};

use crate::cells::{CellCoordinate, CompassPrimary, CoordinateSmallVec};
use crate::grid::{Grid, GridError, IndexType, LinkMode};

/// What the binary tree generator does on reaching a cell with no south or east neighbour.
///
/// On a rectangular grid visited in row-major order that cell is the south east corner, which
/// is also the last cell visited, so both policies carve the same maze.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum ExhaustedPolicy {
    /// Stop carving altogether.
    Terminate,
    /// Carve nothing for the cell and carry on with the next one.
    SkipCell,
}

impl Default for ExhaustedPolicy {
    fn default() -> ExhaustedPolicy {
        ExhaustedPolicy::Terminate
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Default)]
pub struct GeneratorOptions {
    link_mode: LinkMode,
    exhausted_policy: ExhaustedPolicy,
}

impl GeneratorOptions {
    #[inline]
    pub fn link_mode(&self) -> LinkMode {
        self.link_mode
    }

    #[inline]
    pub fn exhausted_policy(&self) -> ExhaustedPolicy {
        self.exhausted_policy
    }
}

#[derive(Debug, Default)]
pub struct GeneratorOptionsBuilder {
    options: GeneratorOptions,
}

impl GeneratorOptionsBuilder {
    pub fn new() -> GeneratorOptionsBuilder {
        GeneratorOptionsBuilder::default()
    }

    pub fn link_mode(mut self, link_mode: LinkMode) -> GeneratorOptionsBuilder {
        self.options.link_mode = link_mode;
        self
    }

    pub fn exhausted_policy(mut self, exhausted_policy: ExhaustedPolicy) -> GeneratorOptionsBuilder {
        self.options.exhausted_policy = exhausted_policy;
        self
    }

    pub fn build(self) -> GeneratorOptions {
        self.options
    }
}

/// Apply the binary tree maze generation algorithm to a grid with the default options.
pub fn binary_tree<GridIndexType, R>(grid: &mut Grid<GridIndexType>,
                                     rng: &mut R)
                                     -> Result<usize, GridError>
    where GridIndexType: IndexType,
          R: Rng + ?Sized
{
    binary_tree_with(grid, rng, &GeneratorOptions::default())
}

/// Apply the binary tree maze generation algorithm to a grid.
/// It works simply by visiting each cell in the grid and choosing to carve a passage
/// south or east, uniformly between whichever of the two exist.
/// The two directions are constant for the entire maze generation process,
/// otherwise we'd have a good way for generating many areas with no way in or out. We would not be
/// generating a perfect maze.
/// The last row can only carve east and the last column only south, so both end up as
/// unbroken corridors meeting in the south east corner.
///
/// Returns the number of cells that carved a passage.
pub fn binary_tree_with<GridIndexType, R>(grid: &mut Grid<GridIndexType>,
                                          rng: &mut R,
                                          options: &GeneratorOptions)
                                          -> Result<usize, GridError>
    where GridIndexType: IndexType,
          R: Rng + ?Sized
{
    const CARVE_DIRECTIONS: [CompassPrimary; 2] = [CompassPrimary::South, CompassPrimary::East];
    let mut carved = 0;

    for cell_coord in grid.iter() {

        let neighbours = grid.neighbours_at_directions(cell_coord, &CARVE_DIRECTIONS)
            .into_iter()
            .flatten()
            .collect::<CoordinateSmallVec>();

        let link_coord = match neighbours.len() {
            0 => {
                match options.exhausted_policy() {
                    ExhaustedPolicy::Terminate => {
                        debug!(at = %cell_coord, "binary tree out of directions, stopping");
                        break;
                    }
                    ExhaustedPolicy::SkipCell => continue,
                }
            }
            1 => neighbours[0],
            n => neighbours[rng.gen_range(0..n)],
        };

        grid.link_with(cell_coord, link_coord, options.link_mode())?;
        carved += 1;
    }

    debug!(carved, rows = grid.rows().0, columns = grid.columns().0, "binary tree maze carved");
    Ok(carved)
}

/// Apply the sidewinder maze generation algorithm to a grid with the default options.
pub fn sidewinder<GridIndexType, R>(grid: &mut Grid<GridIndexType>,
                                    rng: &mut R)
                                    -> Result<usize, GridError>
    where GridIndexType: IndexType,
          R: Rng + ?Sized
{
    sidewinder_with(grid, rng, &GeneratorOptions::default())
}

/// Apply the sidewinder maze generation algorithm to the grid.
/// Sidewinder starts on the western column and moves eastwards a row at a time.
/// Like the simple binary tree algorithm it picks from one of two directions. The difference is
/// that one direction (east) just carves in that direction but when we pick to
/// close out the run we carve a passage south from a random cell selected from
/// the most recent run of horizontal cells.
/// A run always closes at the eastern boundary. On the last row there is nowhere south to go,
/// so runs never close early and the whole row becomes one east-west corridor.
///
/// Returns the number of passages carved.
pub fn sidewinder_with<GridIndexType, R>(grid: &mut Grid<GridIndexType>,
                                         rng: &mut R,
                                         options: &GeneratorOptions)
                                         -> Result<usize, GridError>
    where GridIndexType: IndexType,
          R: Rng + ?Sized
{
    let mut carved = 0;
    let mut run: Vec<CellCoordinate> = Vec::with_capacity(grid.columns().0);

    for coordinates_line in grid.iter_row() {
        run.clear();

        for coord in coordinates_line {
            run.push(coord);

            let next_in_run_cell = grid.neighbour_at_direction(coord, CompassPrimary::East);
            let at_eastern_boundary = next_in_run_cell.is_none();
            let at_southern_boundary =
                grid.neighbour_at_direction(coord, CompassPrimary::South).is_none();

            let should_close_out = at_eastern_boundary ||
                                   (!at_southern_boundary && rng.gen::<bool>()); // coin flip

            if should_close_out {
                let run_member = run[rng.gen_range(0..run.len())];

                let close_out_coord = grid.neighbour_at_direction(run_member,
                                                                  CompassPrimary::South);
                if close_out_coord.is_some() {
                    grid.link_with(run_member, close_out_coord, options.link_mode())?;
                    carved += 1;
                }
                trace!(run_length = run.len(), exit = %run_member, "run closed");
                run.clear();
            } else {
                grid.link_with(coord, next_in_run_cell, options.link_mode())?;
                carved += 1;
            }
        }
    }

    debug!(carved, rows = grid.rows().0, columns = grid.columns().0, "sidewinder maze carved");
    Ok(carved)
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::grids::{large_rect_grid, small_rect_grid, LargeRectangularGrid,
                       SmallRectangularGrid};
    use crate::units::{ColumnsCount, RowsCount};

    use quickcheck::quickcheck;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn small_grid(rows: usize, columns: usize) -> SmallRectangularGrid {
        small_rect_grid(RowsCount(rows), ColumnsCount(columns))
            .expect("grid dimensions too large for small grid")
    }

    fn seeded_rng(seed: u64) -> XorShiftRng {
        XorShiftRng::seed_from_u64(seed)
    }

    fn gc(row: u32, column: u32) -> CellCoordinate {
        CellCoordinate::new(row, column)
    }

    fn passages<GridIndexType: IndexType>(grid: &Grid<GridIndexType>)
                                          -> Vec<(CellCoordinate, CellCoordinate)> {
        let mut links = grid.iter_links().map(|(from, to, _)| (from, to)).collect::<Vec<_>>();
        links.sort();
        links
    }

    #[test]
    fn binary_tree_leaves_corridors_along_the_south_and_east_edges() {
        for seed in 0..20 {
            let mut g = small_grid(4, 4);
            binary_tree(&mut g, &mut seeded_rng(seed)).unwrap();

            for column in 0..3 {
                assert!(g.is_linked(gc(3, column), gc(3, column + 1)));
            }
            for row in 0..3 {
                assert!(g.is_linked(gc(row, 3), gc(row + 1, 3)));
            }
            assert!(g.neighbours(gc(3, 3)).is_empty());
        }
    }

    #[test]
    fn binary_tree_carves_exactly_once_per_cell_except_the_corner() {
        let mut g = small_grid(5, 7);
        let carved = binary_tree(&mut g, &mut seeded_rng(3)).unwrap();
        assert_eq!(carved, 34);
        assert_eq!(g.links_count(), 34);
        for (coord, cell) in g.iter_cells() {
            let expected_links = if coord == gc(4, 6) { 0 } else { 1 };
            assert_eq!(cell.neighbours().len(), expected_links);
            assert!(cell.north().is_none());
            assert!(cell.west().is_none());
        }
        assert!(g.is_perfect_maze());
    }

    #[test]
    fn binary_tree_takes_the_first_option_on_a_zero_rng() {
        let mut g = small_grid(3, 3);
        binary_tree(&mut g, &mut StepRng::new(0, 0)).unwrap();
        // south wherever south exists, east along the last row
        for row in 0..2 {
            for column in 0..3 {
                assert!(g.is_neighbour_linked(gc(row, column), CompassPrimary::South));
            }
        }
        assert!(g.is_neighbour_linked(gc(2, 0), CompassPrimary::East));
        assert!(g.is_neighbour_linked(gc(2, 1), CompassPrimary::East));
    }

    #[test]
    fn binary_tree_exhaustion_policies_agree_on_rectangular_grids() {
        let terminate = GeneratorOptionsBuilder::new()
            .exhausted_policy(ExhaustedPolicy::Terminate)
            .build();
        let skip = GeneratorOptionsBuilder::new()
            .exhausted_policy(ExhaustedPolicy::SkipCell)
            .build();

        let mut g1 = small_grid(6, 5);
        let mut g2 = small_grid(6, 5);
        let carved1 = binary_tree_with(&mut g1, &mut seeded_rng(11), &terminate).unwrap();
        let carved2 = binary_tree_with(&mut g2, &mut seeded_rng(11), &skip).unwrap();

        // the south east corner is the only exhausted cell and it is visited last, so
        // stopping there and skipping it both leave every other cell carved once
        let corner = gc(5, 4);
        for g in &[&g1, &g2] {
            assert_eq!(g.iter().last(), Some(corner));
            assert!(g.neighbours(corner).is_empty());
            assert!(g.iter()
                .filter(|&coord| coord != corner)
                .all(|coord| g.neighbours(coord).len() == 1));
        }
        assert_eq!(carved1, g1.size() - 1);
        assert_eq!(carved2, g2.size() - 1);
        assert_eq!(passages(&g1), passages(&g2));
    }

    #[test]
    fn binary_tree_on_a_single_row_or_column_is_one_corridor() {
        let mut row = small_grid(1, 5);
        binary_tree(&mut row, &mut seeded_rng(1)).unwrap();
        for column in 0..4 {
            assert!(row.is_neighbour_linked(gc(0, column), CompassPrimary::East));
        }

        let mut column = small_grid(5, 1);
        binary_tree(&mut column, &mut seeded_rng(1)).unwrap();
        for r in 0..4 {
            assert!(column.is_neighbour_linked(gc(r, 0), CompassPrimary::South));
        }
    }

    #[test]
    fn sidewinder_leaves_an_unbroken_last_row() {
        for seed in 0..20 {
            let mut g = small_grid(4, 4);
            sidewinder(&mut g, &mut seeded_rng(seed)).unwrap();

            for column in 0..3 {
                assert!(g.is_linked(gc(3, column), gc(3, column + 1)));
            }
            assert!(!g.is_neighbour_linked(gc(3, 3), CompassPrimary::East));
            for column in 0..4 {
                assert!(!g.is_neighbour_linked(gc(3, column), CompassPrimary::South));
            }
        }
    }

    #[test]
    fn sidewinder_closes_every_run_with_a_south_passage() {
        let mut g = small_grid(5, 6);
        sidewinder(&mut g, &mut seeded_rng(5)).unwrap();

        for row in 0..4 {
            let south_exits = (0..6)
                .filter(|&column| g.is_neighbour_linked(gc(row, column), CompassPrimary::South))
                .count();
            let run_breaks = (0..5)
                .filter(|&column| !g.is_neighbour_linked(gc(row, column), CompassPrimary::East))
                .count();
            // one exit per run, and a row of k breaks has k + 1 runs
            assert_eq!(south_exits, run_breaks + 1);
        }
        assert!(g.is_perfect_maze());
    }

    #[test]
    fn sidewinder_never_closes_early_on_a_zero_rng() {
        let mut g = small_grid(3, 4);
        let carved = sidewinder(&mut g, &mut StepRng::new(0, 0)).unwrap();
        assert_eq!(carved, 11);
        for row in 0..3 {
            for column in 0..3 {
                assert!(g.is_neighbour_linked(gc(row, column), CompassPrimary::East));
            }
        }
        // each full-row run exits from its first cell
        assert!(g.is_neighbour_linked(gc(0, 0), CompassPrimary::South));
        assert!(g.is_neighbour_linked(gc(1, 0), CompassPrimary::South));
        assert!(g.is_perfect_maze());
    }

    #[test]
    fn sidewinder_on_a_single_column_carves_straight_down() {
        let mut g = small_grid(5, 1);
        let carved = sidewinder(&mut g, &mut seeded_rng(9)).unwrap();
        assert_eq!(carved, 4);
        for row in 0..4 {
            assert!(g.is_neighbour_linked(gc(row, 0), CompassPrimary::South));
        }
    }

    #[test]
    fn generators_carve_nothing_on_a_single_cell() {
        let mut g = small_grid(1, 1);
        assert_eq!(binary_tree(&mut g, &mut seeded_rng(0)), Ok(0));
        assert_eq!(sidewinder(&mut g, &mut seeded_rng(0)), Ok(0));
        assert_eq!(g.links_count(), 0);
    }

    #[test]
    fn same_seed_same_maze() {
        let build = |seed, generator: fn(&mut LargeRectangularGrid, &mut XorShiftRng)
                                         -> Result<usize, GridError>| {
            let mut g = large_rect_grid(RowsCount(12), ColumnsCount(9)).unwrap();
            generator(&mut g, &mut seeded_rng(seed)).unwrap();
            passages(&g)
        };

        assert_eq!(build(42, binary_tree), build(42, binary_tree));
        assert_eq!(build(42, sidewinder), build(42, sidewinder));
        assert_ne!(build(42, sidewinder), build(43, sidewinder));
    }

    #[test]
    fn bidirectional_carving_links_both_ends() {
        let options = GeneratorOptionsBuilder::new()
            .link_mode(LinkMode::Bidirectional)
            .build();

        let mut g = small_grid(4, 4);
        binary_tree_with(&mut g, &mut seeded_rng(8), &options).unwrap();
        assert_eq!(g.links_count(), 30);
        for (from, to, _) in g.iter_links() {
            assert!(g.is_linked(to, from));
        }
        assert!(g.is_perfect_maze());

        let mut g = small_grid(4, 4);
        sidewinder_with(&mut g, &mut seeded_rng(8), &options).unwrap();
        assert_eq!(g.links_count(), 30);
        assert!(g.is_perfect_maze());
    }

    #[test]
    fn generated_mazes_are_perfect() {
        fn p(rows: u8, columns: u8, seed: u64) -> bool {
            let shape = (RowsCount(rows as usize % 30 + 1), ColumnsCount(columns as usize % 30 + 1));

            let mut binary = large_rect_grid(shape.0, shape.1).unwrap();
            binary_tree(&mut binary, &mut seeded_rng(seed)).unwrap();

            let mut winder = large_rect_grid(shape.0, shape.1).unwrap();
            sidewinder(&mut winder, &mut seeded_rng(seed)).unwrap();

            binary.is_perfect_maze() && winder.is_perfect_maze()
        }
        quickcheck(p as fn(u8, u8, u64) -> bool);
    }
}
