use std::fmt;
use std::slice;

use petgraph::graph;
pub use petgraph::graph::IndexType;
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction, Graph};
use rand::Rng;
use thiserror::Error;
use tracing::trace;

use crate::cells::{Cell, CellCoordinate, CompassPrimary, CoordinateOptionSmallVec,
                   CoordinateSmallVec};
use crate::grid_dimensions::RectGridDimensions;
use crate::grid_iterators::{CellIter, RowIter};
use crate::units::{ColumnsCount, EdgesCount, NodesCount, RowsCount};

/// Errors from constructing a grid, looking up its cells or carving passages.
#[derive(Error, Eq, PartialEq, Copy, Clone, Debug)]
pub enum GridError {
    /// A dimension is zero, or the grid has more cells or possible passages than its
    /// index type can address.
    #[error("invalid grid shape {rows}x{columns}")]
    InvalidShape { rows: usize, columns: usize },

    #[error("coordinate {0} is outside the grid")]
    OutOfBounds(CellCoordinate),

    #[error("cannot link to an absent cell")]
    NullSibling,

    #[error("cells {0} and {1} are not adjacent")]
    NotAdjacent(CellCoordinate, CellCoordinate),
}

/// Whether carving a passage from `a` to `b` also carves the passage back from `b` to `a`.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum LinkMode {
    /// Only `a` records the passage. Reciprocal links are never implied.
    Directed,
    /// Both cells record the passage, each in its own direction.
    Bidirectional,
}

impl Default for LinkMode {
    fn default() -> LinkMode {
        LinkMode::Directed
    }
}

/// A rectangular grid of cells that owns every passage carved between them.
///
/// Passages are directed edges of a petgraph `Graph`, one node per cell in row-major order and
/// each edge weighted by the compass direction it leads in. Only geometrically adjacent cells
/// can be linked, so a cell has at most one passage per direction.
pub struct Grid<GridIndexType: IndexType = u32> {
    graph: Graph<(), CompassPrimary, Directed, GridIndexType>,
    dimensions: RectGridDimensions,
}

impl<GridIndexType: IndexType> fmt::Debug for Grid<GridIndexType> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "Grid :: graph: {:?}, rows: {:?}, columns: {:?}",
               self.graph,
               self.rows(),
               self.columns())
    }
}

impl<GridIndexType: IndexType> Grid<GridIndexType> {
    /// Build a grid of `rows` x `columns` cells with no passages.
    pub fn new(rows: RowsCount, columns: ColumnsCount) -> Result<Grid<GridIndexType>, GridError> {

        let invalid_shape = GridError::InvalidShape {
            rows: rows.0,
            columns: columns.0,
        };
        if rows.0 == 0 || columns.0 == 0 || rows.0 > u32::MAX as usize ||
           columns.0 > u32::MAX as usize {
            return Err(invalid_shape);
        }

        // The graph panics on reaching its index type's maximum, for nodes and edges alike.
        let index_limit = <GridIndexType as IndexType>::max().index();
        let dimensions = RectGridDimensions::new(rows, columns);
        let (nodes, edges) = match dimensions.graph_size() {
            Some((NodesCount(nodes), EdgesCount(edges))) if nodes <= index_limit &&
                                                            edges <= index_limit => (nodes, edges),
            _ => return Err(invalid_shape),
        };

        let mut grid = Grid {
            graph: Graph::with_capacity(nodes, edges),
            dimensions,
        };
        for _ in 0..nodes {
            let _ = grid.graph.add_node(());
        }

        Ok(grid)
    }

    #[inline]
    pub fn dimensions(&self) -> &RectGridDimensions {
        &self.dimensions
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.dimensions.size().0
    }

    #[inline]
    pub fn rows(&self) -> RowsCount {
        self.dimensions.rows()
    }

    #[inline]
    pub fn columns(&self) -> ColumnsCount {
        self.dimensions.columns()
    }

    /// Number of directed passages. A bidirectional link counts twice.
    #[inline]
    pub fn links_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// The cell at `coord`.
    pub fn get(&self, coord: CellCoordinate) -> Result<Cell<'_, GridIndexType>, GridError> {
        if self.is_valid_coordinate(coord) {
            Ok(Cell::new(self, coord))
        } else {
            Err(GridError::OutOfBounds(coord))
        }
    }

    /// A cell chosen uniformly from the whole grid.
    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Cell<'_, GridIndexType> {
        let index = rng.gen_range(0..self.size());
        Cell::new(self, self.dimensions.index_to_grid_coordinate(index))
    }

    /// Link two cells with a passage from `a` to `b` only.
    ///
    /// The direction is derived from where `b` lies relative to `a`, and is returned.
    /// Linking an already linked pair again is a no-op.
    pub fn link<C>(&mut self, a: CellCoordinate, b: C) -> Result<CompassPrimary, GridError>
        where C: Into<Option<CellCoordinate>>
    {
        self.link_with(a, b, LinkMode::Directed)
    }

    /// Link two cells with passages both ways. Either both passages are carved or neither is.
    pub fn link_bidirectional<C>(&mut self,
                                 a: CellCoordinate,
                                 b: C)
                                 -> Result<CompassPrimary, GridError>
        where C: Into<Option<CellCoordinate>>
    {
        self.link_with(a, b, LinkMode::Bidirectional)
    }

    pub fn link_with<C>(&mut self,
                        a: CellCoordinate,
                        b: C,
                        mode: LinkMode)
                        -> Result<CompassPrimary, GridError>
        where C: Into<Option<CellCoordinate>>
    {
        let (a_index, b_index, direction) = self.passage_endpoints(a, b.into())?;

        let _ = self.graph.update_edge(a_index, b_index, direction);
        if mode == LinkMode::Bidirectional {
            let _ = self.graph.update_edge(b_index, a_index, direction.opposite());
        }
        trace!(from = %a, ?direction, ?mode, "linked");

        Ok(direction)
    }

    /// Remove the passage from `a` to `b`, if the coordinates are valid and one exists.
    /// Returns true if a passage was removed.
    pub fn unlink<C>(&mut self, a: CellCoordinate, b: C) -> bool
        where C: Into<Option<CellCoordinate>>
    {
        self.unlink_with(a, b, LinkMode::Directed)
    }

    pub fn unlink_with<C>(&mut self, a: CellCoordinate, b: C, mode: LinkMode) -> bool
        where C: Into<Option<CellCoordinate>>
    {
        let b = match b.into() {
            Some(coord) => coord,
            None => return false,
        };
        let a_index_opt = self.grid_coordinate_graph_index(a);
        let b_index_opt = self.grid_coordinate_graph_index(b);

        if let (Some(a_index), Some(b_index)) = (a_index_opt, b_index_opt) {
            let mut removed = self.remove_passage(a_index, b_index);
            if mode == LinkMode::Bidirectional {
                removed |= self.remove_passage(b_index, a_index);
            }
            removed
        } else {
            false
        }
    }

    /// Is there a passage from `a` to `b`? Absent or invalid cells are never linked.
    pub fn is_linked<C>(&self, a: CellCoordinate, b: C) -> bool
        where C: Into<Option<CellCoordinate>>
    {
        let b = match b.into() {
            Some(coord) => coord,
            None => return false,
        };
        let a_index_opt = self.grid_coordinate_graph_index(a);
        let b_index_opt = self.grid_coordinate_graph_index(b);
        if let (Some(a_index), Some(b_index)) = (a_index_opt, b_index_opt) {
            self.graph.find_edge(a_index, b_index).is_some()
        } else {
            false
        }
    }

    /// Where the passage from `coord` heading in `direction` leads, if one was carved.
    pub fn passage(&self, coord: CellCoordinate, direction: CompassPrimary) -> Option<CellCoordinate> {
        let node = self.grid_coordinate_graph_index(coord)?;
        self.graph
            .edges_directed(node, Direction::Outgoing)
            .find(|edge| *edge.weight() == direction)
            .map(|edge| self.dimensions.index_to_grid_coordinate(edge.target().index()))
    }

    #[inline]
    pub fn is_neighbour_linked(&self, coord: CellCoordinate, direction: CompassPrimary) -> bool {
        self.passage(coord, direction).is_some()
    }

    /// Cells reachable from `coord` through its carved passages, in north, south, east, west
    /// order. Empty for a coordinate outside the grid.
    pub fn neighbours(&self, coord: CellCoordinate) -> CoordinateSmallVec {
        CompassPrimary::ALL
            .iter()
            .filter_map(|&direction| self.passage(coord, direction))
            .collect()
    }

    /// The in-bounds cell one step away in `direction`, whether or not a passage leads there.
    pub fn neighbour_at_direction(&self,
                                  coord: CellCoordinate,
                                  direction: CompassPrimary)
                                  -> Option<CellCoordinate> {
        direction.offset(coord)
                 .filter(|&neighbour_coord| self.is_valid_coordinate(neighbour_coord))
    }

    pub fn neighbours_at_directions(&self,
                                    coord: CellCoordinate,
                                    dirs: &[CompassPrimary])
                                    -> CoordinateOptionSmallVec {
        dirs.iter()
            .map(|direction| self.neighbour_at_direction(coord, *direction))
            .collect()
    }

    /// Is `coord` inside the grid?
    #[inline]
    pub fn is_valid_coordinate(&self, coord: CellCoordinate) -> bool {
        self.dimensions.is_valid_coordinate(coord)
    }

    /// Row-major index of `coord`, or None if it lies outside the grid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: CellCoordinate) -> Option<usize> {
        self.dimensions.grid_coordinate_to_index(coord)
    }

    /// Every coordinate in row-major order. Does not borrow the grid.
    #[inline]
    pub fn iter(&self) -> CellIter {
        CellIter::new(self.dimensions)
    }

    /// Every row, top to bottom, as coordinates ordered west to east. Does not borrow the grid.
    #[inline]
    pub fn iter_row(&self) -> RowIter {
        RowIter::new(self.dimensions)
    }

    /// Every cell in row-major order, paired with its coordinate.
    pub fn iter_cells(&self)
                      -> impl Iterator<Item = (CellCoordinate, Cell<'_, GridIndexType>)> + Clone + '_ {
        self.iter().map(move |coord| (coord, Cell::new(self, coord)))
    }

    /// Every row of cells, top to bottom, each ordered west to east.
    pub fn iter_row_cells(&self) -> impl Iterator<Item = Vec<Cell<'_, GridIndexType>>> + Clone + '_ {
        self.iter_row().map(move |row| {
            row.into_iter()
               .map(|coord| Cell::new(self, coord))
               .collect::<Vec<_>>()
        })
    }

    pub fn iter_links(&self) -> LinksIter<'_, GridIndexType> {
        LinksIter {
            graph_edge_iter: self.graph.raw_edges().iter(),
            dimensions: &self.dimensions,
        }
    }

    /// Do the passages, ignoring their direction, form a spanning tree over every cell?
    /// A pair of cells linked both ways counts as one passage.
    pub fn is_perfect_maze(&self) -> bool {
        let mut regions = UnionFind::<usize>::new(self.size());
        let mut passages = 0;

        for edge in self.graph.raw_edges() {
            let (source, target) = (edge.source(), edge.target());
            let reciprocated = self.graph.find_edge(target, source).is_some();
            if reciprocated && source.index() > target.index() {
                continue;
            }
            if !regions.union(source.index(), target.index()) {
                // closes a loop
                return false;
            }
            passages += 1;
        }

        passages + 1 == self.size()
    }

    fn passage_endpoints(&self,
                         a: CellCoordinate,
                         b: Option<CellCoordinate>)
                         -> Result<(graph::NodeIndex<GridIndexType>,
                                    graph::NodeIndex<GridIndexType>,
                                    CompassPrimary),
                                   GridError> {
        let b = b.ok_or(GridError::NullSibling)?;
        let a_index = self.grid_coordinate_graph_index(a).ok_or(GridError::OutOfBounds(a))?;
        let b_index = self.grid_coordinate_graph_index(b).ok_or(GridError::OutOfBounds(b))?;
        let direction = CompassPrimary::between(a, b).ok_or(GridError::NotAdjacent(a, b))?;
        Ok((a_index, b_index, direction))
    }

    fn remove_passage(&mut self,
                      from: graph::NodeIndex<GridIndexType>,
                      to: graph::NodeIndex<GridIndexType>)
                      -> bool {
        if let Some(edge_index) = self.graph.find_edge(from, to) {
            // swaps the last edge into the freed slot; edge indices are never held
            self.graph.remove_edge(edge_index);
            true
        } else {
            false
        }
    }

    /// Graph node of the cell at `coord`, if the cell exists.
    #[inline]
    fn grid_coordinate_graph_index(&self,
                                   coord: CellCoordinate)
                                   -> Option<graph::NodeIndex<GridIndexType>> {
        self.grid_coordinate_to_index(coord)
            .map(graph::NodeIndex::<GridIndexType>::new)
    }
}

/// Iterator over every directed passage as `(from, to, direction)`, in the order carved.
pub struct LinksIter<'a, GridIndexType: IndexType> {
    graph_edge_iter: slice::Iter<'a, graph::Edge<CompassPrimary, GridIndexType>>,
    dimensions: &'a RectGridDimensions,
}

impl<'a, GridIndexType: IndexType> Iterator for LinksIter<'a, GridIndexType> {
    type Item = (CellCoordinate, CellCoordinate, CompassPrimary);

    fn next(&mut self) -> Option<Self::Item> {
        let dimensions = self.dimensions;
        self.graph_edge_iter.next().map(|edge| {
            let src_cell_coord = dimensions.index_to_grid_coordinate(edge.source().index());
            let dst_cell_coord = dimensions.index_to_grid_coordinate(edge.target().index());
            (src_cell_coord, dst_cell_coord, edge.weight)
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.graph_edge_iter.size_hint()
    }
}
impl<'a, GridIndexType: IndexType> ExactSizeIterator for LinksIter<'a, GridIndexType> {}

impl<'a, GridIndexType: IndexType> fmt::Debug for LinksIter<'a, GridIndexType> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "LinksIter :: remaining: {:?}", self.graph_edge_iter.len())
    }
}
