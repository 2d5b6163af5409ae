use std::fmt;

use crate::cells::CompassPrimary;
use crate::grid::{Grid, IndexType};
use crate::units::ColumnsCount;

const CORNER: &str = "+";
const WALL_LR_3: &str = "---";
const WALL_UD: &str = "|";
const CELL_BODY: &str = "   "; // 3 spaces
const EAST_PASSAGE: &str = " ";

/// Text rendering of the maze.
///
/// Each cell simply uses the southern wall of the cell above it as its own northern wall, so
/// after the top border we only draw each cell's body, its eastern boundary ('|') and its
/// southern boundary ('---+'). A wall is left out only where the cell itself carved a passage
/// east or south; passages carved westward or northward into a cell are not drawn.
impl<GridIndexType: IndexType> fmt::Display for Grid<GridIndexType> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let ColumnsCount(columns_count) = self.columns();
        let line_length = 1 + 4 * columns_count;
        let mut output = String::with_capacity((2 * self.rows().0 + 1) * (line_length + 1));

        // Start by special case rendering the text for the north most boundary
        output.push_str(CORNER);
        for _ in 0..columns_count {
            output.push_str(WALL_LR_3);
            output.push_str(CORNER);
        }
        output.push('\n');

        for row in self.iter_row() {

            // The west most boundary of the row is always a wall
            let mut row_middle_section_render = String::with_capacity(line_length);
            let mut row_bottom_section_render = String::with_capacity(line_length);
            row_middle_section_render.push_str(WALL_UD);
            row_bottom_section_render.push_str(CORNER);

            for cell_coord in row {
                let east_open = self.is_neighbour_linked(cell_coord, CompassPrimary::East);
                let south_open = self.is_neighbour_linked(cell_coord, CompassPrimary::South);

                row_middle_section_render.push_str(CELL_BODY);
                row_middle_section_render.push_str(if east_open { EAST_PASSAGE } else { WALL_UD });

                row_bottom_section_render.push_str(if south_open { CELL_BODY } else { WALL_LR_3 });
                row_bottom_section_render.push_str(CORNER);
            }

            output.push_str(&row_middle_section_render);
            output.push('\n');
            output.push_str(&row_bottom_section_render);
            output.push('\n');
        }

        f.write_str(&output)
    }
}

#[cfg(test)]
mod tests {
    use crate::cells::CellCoordinate;
    use crate::grids::small_rect_grid;
    use crate::units::{ColumnsCount, RowsCount};

    fn gc(row: u32, column: u32) -> CellCoordinate {
        CellCoordinate::new(row, column)
    }

    #[test]
    fn unlinked_grid_draws_every_wall() {
        let g = small_rect_grid(RowsCount(2), ColumnsCount(3)).unwrap();
        let expected = "\
+---+---+---+
|   |   |   |
+---+---+---+
|   |   |   |
+---+---+---+
";
        assert_eq!(g.to_string(), expected);
    }

    #[test]
    fn fully_linked_grid_draws_only_the_border() {
        let mut g = small_rect_grid(RowsCount(3), ColumnsCount(3)).unwrap();
        for coord in g.iter() {
            for &neighbour in &[gc(coord.row, coord.column + 1), gc(coord.row + 1, coord.column)] {
                if g.is_valid_coordinate(neighbour) {
                    g.link(coord, neighbour).unwrap();
                }
            }
        }
        let expected = "\
+---+---+---+
|           |
+   +   +   +
|           |
+   +   +   +
|           |
+---+---+---+
";
        assert_eq!(g.to_string(), expected);
    }

    #[test]
    fn only_east_and_south_passages_open_walls() {
        let mut g = small_rect_grid(RowsCount(2), ColumnsCount(2)).unwrap();
        g.link(gc(0, 0), gc(0, 1)).unwrap();
        g.link(gc(1, 1), gc(0, 1)).unwrap(); // north, not drawn
        g.link(gc(0, 0), gc(1, 0)).unwrap();
        let expected = "\
+---+---+
|       |
+   +---+
|   |   |
+---+---+
";
        assert_eq!(g.to_string(), expected);
    }

    #[test]
    fn single_cell() {
        let g = small_rect_grid(RowsCount(1), ColumnsCount(1)).unwrap();
        assert_eq!(g.to_string(), "+---+\n|   |\n+---+\n");
    }
}
