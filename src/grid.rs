use std::error::Error;
use std::fmt;
use std::iter;
use std::marker::PhantomData;
use std::rc::Rc;
use std::slice;

use petgraph::{Graph, Undirected};
use petgraph::graph;
pub use petgraph::graph::IndexType;
use rand::Rng;

use crate::cells::{Cell, CellLayout, Coordinate, GridKind, PointsSmallVec};
use crate::grid_iterators::{iso_projection, BatchIter, CellIter, CellOrder, IsoCellIter};
use crate::grid_traits::{CellGraph, GridDimensions};
use crate::units::{ColumnLength, ColumnsCount, EdgesCount, NodesCount, RowLength, RowsCount};
use crate::vec2::Vec2;


/// A rectangular lattice of cells plus the passages carved between them.
///
/// Cells are the nodes of an undirected graph, indexed in row-major order, each node holding
/// the cell's world position. Passages ("links" or "connections") are the graph's edges, so a
/// link always exists in both directions at once. Only the links ever change after construction.
pub struct Grid<GridIndexType: IndexType, CellT: Cell> {
    graph: Graph<Vec2, (), Undirected, GridIndexType>,
    dimensions: Rc<dyn GridDimensions>,
    layout: CellLayout,
    cell_type: PhantomData<CellT>,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CellLinkError {
    InvalidGridCoordinate,
    SelfLink,
    NotNeighbours,
}

impl fmt::Display for CellLinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match *self {
            CellLinkError::InvalidGridCoordinate => "cell coordinate is outside of the grid",
            CellLinkError::SelfLink => "a cell cannot be linked to itself",
            CellLinkError::NotNeighbours => "only neighbouring cells can be linked",
        };
        f.write_str(description)
    }
}

impl Error for CellLinkError {}

impl<GridIndexType: IndexType, CellT: Cell> fmt::Debug for Grid<GridIndexType, CellT> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Grid :: kind: {:?}, graph: {:?}, rows: {:?}, columns: {:?}, layout: {:?}",
               CellT::KIND, self.graph, self.rows(), self.columns(), self.layout)
    }
}

impl<GridIndexType: IndexType, CellT: Cell> Grid<GridIndexType, CellT> {
    /// Build every cell and fix its world position.
    ///
    /// Panics if the number of cells does not fit `GridIndexType`, see `grids` for checked
    /// constructors.
    pub fn new(dimensions: Rc<dyn GridDimensions>,
               origin: Vec2,
               cell_height: f64)
               -> Grid<GridIndexType, CellT> {

        let (NodesCount(nodes), EdgesCount(edges)) = dimensions.graph_size();
        let layout = CellT::layout(origin, dimensions.as_ref(), cell_height);

        let mut grid = Grid {
            graph: Graph::with_capacity(nodes, edges),
            dimensions,
            layout,
            cell_type: PhantomData,
        };
        for index in 0..nodes {
            let coord = CellT::Coord::from_row_major_index(index, grid.dimensions());
            let _ = grid.graph.add_node(CellT::world_coordinate(coord, &grid.layout));
        }

        grid
    }

    #[inline]
    pub fn kind(&self) -> GridKind {
        CellT::KIND
    }

    #[inline]
    pub fn dimensions(&self) -> &dyn GridDimensions {
        self.dimensions.as_ref()
    }

    #[inline]
    pub fn layout(&self) -> &CellLayout {
        &self.layout
    }

    #[inline]
    pub fn origin(&self) -> Vec2 {
        self.layout.origin
    }

    #[inline]
    pub fn cell_size(&self) -> Vec2 {
        self.layout.cell_size
    }

    #[inline]
    pub fn cell_radius(&self) -> Vec2 {
        self.layout.cell_radius
    }

    /// Column and row counts as a vector.
    #[inline]
    pub fn grid_size(&self) -> Vec2 {
        Vec2::new(self.columns().0 as f64, self.rows().0 as f64)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.dimensions.size().0
    }

    /// Number of passages, each counted once.
    #[inline]
    pub fn links_count(&self) -> usize {
        self.graph.edge_count()
    }

    #[inline]
    pub fn rows(&self) -> RowsCount {
        self.dimensions.rows()
    }

    #[inline]
    pub fn row_length(&self) -> Option<RowLength> {
        self.dimensions.row_length(None)
    }

    #[inline]
    pub fn columns(&self) -> ColumnsCount {
        self.dimensions.columns()
    }

    #[inline]
    pub fn column_length(&self) -> ColumnLength {
        self.dimensions.column_length(None)
    }

    /// Panics on a grid without cells.
    pub fn random_cell<R: Rng>(&self, rng: &mut R) -> CellT::Coord {
        let index = rng.gen_range(0..self.size());
        CellT::Coord::from_row_major_index(index, self.dimensions())
    }

    /// The cell at `coord` with its whole query surface, None outside of the grid.
    pub fn cell(&self, coord: CellT::Coord) -> Option<GridCell<'_, GridIndexType, CellT>> {
        self.grid_coordinate_graph_index(coord)
            .map(|node_index| {
                GridCell {
                    grid: self,
                    coord,
                    node_index,
                }
            })
    }

    /// Every cell in column by column order.
    pub fn cells(&self) -> impl Iterator<Item = GridCell<'_, GridIndexType, CellT>> + '_ {
        self.iter().filter_map(move |coord| self.cell(coord))
    }

    /// World position of a cell's centre, fixed when the grid was built.
    #[inline]
    pub fn world_coordinate(&self, coord: CellT::Coord) -> Option<Vec2> {
        self.grid_coordinate_graph_index(coord).map(|node_index| self.graph[node_index])
    }

    pub fn points(&self, coord: CellT::Coord) -> Option<PointsSmallVec> {
        self.world_coordinate(coord).map(|world| CellT::points(world, &self.layout))
    }

    /// Link two neighbouring cells, in both directions.
    ///
    /// Linking an already linked pair changes nothing.
    pub fn link(&mut self, a: CellT::Coord, b: CellT::Coord) -> Result<(), CellLinkError> {
        if a == b {
            return Err(CellLinkError::SelfLink);
        }
        let a_index_opt = self.grid_coordinate_graph_index(a);
        let b_index_opt = self.grid_coordinate_graph_index(b);
        match (a_index_opt, b_index_opt) {
            (Some(a_index), Some(b_index)) => {
                if !self.is_neighbour(a, b) {
                    return Err(CellLinkError::NotNeighbours);
                }
                let _ = self.graph.update_edge(a_index, b_index, ());
                Ok(())
            }
            _ => Err(CellLinkError::InvalidGridCoordinate),
        }
    }

    /// Unlink two cells, if the grid coordinates are valid and a link exists between them.
    /// Returns true if an unlink occurred.
    pub fn unlink(&mut self, a: CellT::Coord, b: CellT::Coord) -> bool {
        let a_index_opt = self.grid_coordinate_graph_index(a);
        let b_index_opt = self.grid_coordinate_graph_index(b);

        if let (Some(a_index), Some(b_index)) = (a_index_opt, b_index_opt) {
            if let Some(edge_index) = self.graph.find_edge(a_index, b_index) {
                // This will invalidate the last edge index in the graph, which is fine as we
                // are not storing them for any reason.
                self.graph.remove_edge(edge_index);
                return true;
            }
        }

        false
    }

    /// Remove every passage, leaving the cells untouched.
    pub fn unlink_all(&mut self) {
        self.graph.clear_edges();
    }

    /// Cell nodes that are linked to a particular node by a passage.
    pub fn links(&self, coord: CellT::Coord) -> Option<CellT::CoordinateSmallVec> {
        self.grid_coordinate_graph_index(coord)
            .map(|graph_node_index| self.links_at(graph_node_index))
    }

    /// Cell nodes adjacent on the lattice to a particular node, but not necessarily linked by a
    /// passage.
    pub fn neighbours(&self, coord: CellT::Coord) -> CellT::CoordinateSmallVec {
        CellT::offset_directions(coord)
            .iter()
            .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
            .collect::<CellT::CoordinateSmallVec>()
    }

    /// Neighbours still walled off from `coord`.
    pub fn unconnected_neighbours(&self, coord: CellT::Coord) -> CellT::CoordinateSmallVec {
        self.neighbours(coord)
            .iter()
            .cloned()
            .filter(|neighbour| !self.is_linked(coord, *neighbour))
            .collect()
    }

    pub fn neighbours_at_directions(&self,
                                    coord: CellT::Coord,
                                    dirs: &[CellT::Direction])
                                    -> CellT::CoordinateOptionSmallVec {
        dirs.iter()
            .map(|direction| self.neighbour_at_direction(coord, *direction))
            .collect()
    }

    pub fn neighbour_at_direction(&self,
                                  coord: CellT::Coord,
                                  direction: CellT::Direction)
                                  -> Option<CellT::Coord> {
        if !self.is_valid_coordinate(coord) {
            return None;
        }
        CellT::offset_coordinate(coord, direction)
            .filter(|neighbour_coord| self.is_valid_coordinate(*neighbour_coord))
    }

    /// Are two cells in the grid linked?
    pub fn is_linked(&self, a: CellT::Coord, b: CellT::Coord) -> bool {
        let a_index_opt = self.grid_coordinate_graph_index(a);
        let b_index_opt = self.grid_coordinate_graph_index(b);
        if let (Some(a_index), Some(b_index)) = (a_index_opt, b_index_opt) {
            self.graph.find_edge(a_index, b_index).is_some()
        } else {
            false
        }
    }

    pub fn is_neighbour_linked(&self, coord: CellT::Coord, direction: CellT::Direction) -> bool {
        self.neighbour_at_direction(coord, direction)
            .map_or(false,
                    |neighbour_coord| self.is_linked(coord, neighbour_coord))
    }

    /// Convert a grid coordinate to a one dimensional index in the range 0...grid.size().
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: CellT::Coord) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            let grid_2d_coord = coord.as_cartesian_2d();
            let ColumnsCount(row_size) = self.columns();
            Some((grid_2d_coord.y as usize * row_size) + grid_2d_coord.x as usize)
        } else {
            None
        }
    }

    /// Column by column, each column top to bottom.
    #[inline]
    pub fn iter(&self) -> CellIter<CellT> {
        CellIter::new(CellOrder::ColumnByColumn, self.dimensions())
    }

    /// Row by row, each row left to right.
    #[inline]
    pub fn iter_left_to_right(&self) -> CellIter<CellT> {
        CellIter::new(CellOrder::LeftToRight, self.dimensions())
    }

    /// Anti-diagonals in increasing `x + y`, the back to front order for isometric drawing.
    #[inline]
    pub fn iter_iso(&self) -> IsoCellIter<CellT> {
        IsoCellIter::new(self.dimensions())
    }

    #[inline]
    pub fn iter_row(&self) -> BatchIter<CellT> {
        BatchIter::rows(self.dimensions())
    }

    #[inline]
    pub fn iter_column(&self) -> BatchIter<CellT> {
        BatchIter::columns(self.dimensions())
    }

    pub fn iter_links(&self) -> LinksIter<'_, CellT, GridIndexType> {
        LinksIter {
            graph_edge_iter: self.graph.raw_edges().iter(),
            dimensions: self.dimensions(),
            cell_type: PhantomData,
        }
    }

    /// Is the grid coordinate valid for this grid - within the grid's dimensions
    #[inline]
    pub fn is_valid_coordinate(&self, coord: CellT::Coord) -> bool {
        let grid_2d_coord = coord.as_cartesian_2d();
        (grid_2d_coord.x as usize) < self.columns().0 && (grid_2d_coord.y as usize) < self.rows().0
    }

    fn is_neighbour(&self, a: CellT::Coord, b: CellT::Coord) -> bool {
        self.neighbours(a).iter().any(|&coord| coord == b)
    }

    fn links_at(&self, graph_node_index: graph::NodeIndex<GridIndexType>) -> CellT::CoordinateSmallVec {
        self.graph
            .neighbors(graph_node_index)
            .map(|linked_index| CellT::Coord::from_row_major_index(linked_index.index(), self.dimensions()))
            .collect()
    }

    /// Convert a grid coordinate into petgraph nodeindex
    /// Returns None if the grid coordinate is invalid (out of the grid's dimensions).
    #[inline]
    fn grid_coordinate_graph_index(&self,
                                   coord: CellT::Coord)
                                   -> Option<graph::NodeIndex<GridIndexType>> {
        let grid_index_raw_opt = self.grid_coordinate_to_index(coord);
        grid_index_raw_opt.map(graph::NodeIndex::<GridIndexType>::new)
    }
}

impl<GridIndexType: IndexType, CellT: Cell> CellGraph for Grid<GridIndexType, CellT> {
    type CellRef = CellT::Coord;
    type CellRefSmallVec = CellT::CoordinateSmallVec;

    fn contains(&self, cell: Self::CellRef) -> bool {
        self.is_valid_coordinate(cell)
    }

    fn neighbours(&self, cell: Self::CellRef) -> Self::CellRefSmallVec {
        Grid::neighbours(self, cell)
    }

    fn connections(&self, cell: Self::CellRef) -> Self::CellRefSmallVec {
        match self.grid_coordinate_graph_index(cell) {
            Some(graph_node_index) => self.links_at(graph_node_index),
            None => iter::empty::<Self::CellRef>().collect(),
        }
    }

    fn connect(&mut self, a: Self::CellRef, b: Self::CellRef) -> Result<(), CellLinkError> {
        self.link(a, b)
    }

    fn cells_count(&self) -> usize {
        self.size()
    }
}

/// One cell of a grid: its lattice position plus what a renderer asks of it.
pub struct GridCell<'a, GridIndexType: IndexType, CellT: Cell> {
    grid: &'a Grid<GridIndexType, CellT>,
    coord: CellT::Coord,
    node_index: graph::NodeIndex<GridIndexType>,
}

impl<'a, GridIndexType: IndexType, CellT: Cell> Clone for GridCell<'a, GridIndexType, CellT> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<'a, GridIndexType: IndexType, CellT: Cell> Copy for GridCell<'a, GridIndexType, CellT> {}

impl<'a, GridIndexType: IndexType, CellT: Cell> fmt::Debug for GridCell<'a, GridIndexType, CellT> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GridCell :: coord: {:?}, world: {}", self.coord, self.world_coords())
    }
}

impl<'a, GridIndexType: IndexType, CellT: Cell> GridCell<'a, GridIndexType, CellT> {
    #[inline]
    pub fn coordinate(&self) -> CellT::Coord {
        self.coord
    }

    /// Lattice position as a vector.
    #[inline]
    pub fn grid_coords(&self) -> Vec2 {
        self.coord.as_cartesian_2d().as_vec2()
    }

    #[inline]
    pub fn world_coords(&self) -> Vec2 {
        self.grid.graph[self.node_index]
    }

    /// Where this cell sits when the lattice is drawn isometrically, see `iso_projection`.
    #[inline]
    pub fn iso_coords(&self, cell_size: f64, iso_origin: Vec2) -> Vec2 {
        iso_projection(self.grid_coords(), cell_size, iso_origin)
    }

    pub fn points(&self) -> PointsSmallVec {
        CellT::points(self.world_coords(), &self.grid.layout)
    }

    pub fn connections(&self) -> CellT::CoordinateSmallVec {
        self.grid.links_at(self.node_index)
    }

    pub fn neighbours(&self) -> CellT::CoordinateSmallVec {
        self.grid.neighbours(self.coord)
    }

    pub fn unconnected_neighbours(&self) -> CellT::CoordinateSmallVec {
        self.grid.unconnected_neighbours(self.coord)
    }

    /// Is there a passage to the cell `offset` lattice steps away, e.g. `Vec2::UP`?
    pub fn has_connection(&self, offset: Vec2) -> bool {
        let here = self.grid_coords();
        self.connections()
            .iter()
            .any(|linked| linked.as_cartesian_2d().as_vec2() - here == offset)
    }

    #[inline]
    pub fn is_linked_towards(&self, direction: CellT::Direction) -> bool {
        self.grid.is_neighbour_linked(self.coord, direction)
    }
}

pub struct LinksIter<'a, CellT: Cell, GridIndexType: IndexType> {
    graph_edge_iter: slice::Iter<'a, graph::Edge<(), GridIndexType>>,
    dimensions: &'a dyn GridDimensions,
    cell_type: PhantomData<CellT>,
}

impl<'a, CellT: Cell, GridIndexType: IndexType> Iterator for LinksIter<'a, CellT, GridIndexType> {
    type Item = (CellT::Coord, CellT::Coord);

    fn next(&mut self) -> Option<Self::Item> {
        self.graph_edge_iter.next().map(|edge| {
            let src_cell_coord = CellT::Coord::from_row_major_index(edge.source().index(),
                                                                    self.dimensions);
            let dst_cell_coord = CellT::Coord::from_row_major_index(edge.target().index(),
                                                                    self.dimensions);
            (src_cell_coord, dst_cell_coord)
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.graph_edge_iter.size_hint()
    }
}
impl<'a, CellT: Cell, GridIndexType: IndexType> ExactSizeIterator
    for LinksIter<'a, CellT, GridIndexType> {
} // default impl using size_hint()

impl<'a, CellT: Cell, GridIndexType: IndexType> fmt::Debug for LinksIter<'a, CellT, GridIndexType> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LinksIter :: edges iter : {:?}", self.graph_edge_iter)
    }
}

#[cfg(test)]
mod tests {

    use crate::cells::{Cartesian2DCoordinate, CompassPrimary, HexCell, HexDirection};
    use crate::grids::{hex_grid, square_grid, SmallSquareGrid};

    use itertools::Itertools;
    use quickcheck::{quickcheck, TestResult};
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    use super::*;
    use crate::units;

    fn small_grid(w: usize, h: usize) -> SmallSquareGrid {
        square_grid(Vec2::ZERO, units::RowLength(w), units::ColumnLength(h), 1.0)
            .expect("grid dimensions too large for small grid")
    }

    fn hex(w: usize, h: usize) -> Grid<u32, HexCell> {
        hex_grid(Vec2::ZERO, units::RowLength(w), units::ColumnLength(h), 10.0)
            .expect("grid dimensions too large")
    }

    // compare a smallvec against a slice or array literal
    macro_rules! assert_smallvec_eq {
        ($x:expr, $y:expr) => (assert_eq!(&*$x, &*$y))
    }

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).sqr_magnitude() < 1e-9
    }

    fn sorted(coords: &[Cartesian2DCoordinate]) -> Vec<Cartesian2DCoordinate> {
        coords.iter().cloned().sorted().collect()
    }

    #[test]
    fn square_neighbours_sit_one_cell_away() {
        let g = square_grid::<u32>(Vec2::new(2.0, 4.0), units::RowLength(6), units::ColumnLength(4), 3.0)
            .expect("grid");
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);

        for coord in g.iter() {
            let here = g.world_coordinate(coord).expect("valid coordinate");
            for neighbour in g.neighbours(coord).iter() {
                let there = g.world_coordinate(*neighbour).expect("valid neighbour");
                let step = there - here;
                assert!(step.sqr_magnitude() == 9.0 && (step.x == 0.0 || step.y == 0.0));
            }
        }

        assert_eq!(sorted(&g.neighbours(gc(5, 0))), sorted(&[gc(4, 0), gc(5, 1)]));
        assert_eq!(sorted(&g.neighbours(gc(5, 3))), sorted(&[gc(4, 3), gc(5, 2)]));
        assert_eq!(sorted(&g.neighbours(gc(2, 0))), sorted(&[gc(1, 0), gc(3, 0), gc(2, 1)]));
        assert_eq!(sorted(&g.neighbours(gc(3, 2))),
                   sorted(&[gc(2, 2), gc(4, 2), gc(3, 1), gc(3, 3)]));
        assert!(g.neighbours(gc(6, 3)).is_empty());
    }

    #[test]
    fn hex_neighbour_cells() {
        let g = hex(4, 4);
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);

        // even row corner
        assert_eq!(sorted(&g.neighbours(gc(0, 0))), sorted(&[gc(1, 0), gc(0, 1)]));
        // odd row interior
        assert_eq!(sorted(&g.neighbours(gc(1, 1))),
                   sorted(&[gc(1, 0), gc(2, 0), gc(0, 1), gc(2, 1), gc(1, 2), gc(2, 2)]));
        // even row interior
        assert_eq!(sorted(&g.neighbours(gc(1, 2))),
                   sorted(&[gc(0, 1), gc(1, 1), gc(0, 2), gc(2, 2), gc(0, 3), gc(1, 3)]));
        // odd row, east edge
        assert_eq!(sorted(&g.neighbours(gc(3, 3))), sorted(&[gc(3, 2), gc(2, 3)]));
    }

    #[test]
    fn hex_neighbours_are_equidistant_and_share_an_edge() {
        let g = hex(5, 4);
        let width = g.cell_size().x;

        for coord in g.iter() {
            let here = g.world_coordinate(coord).expect("valid coordinate");
            let outline = g.points(coord).expect("valid coordinate");
            for neighbour in g.neighbours(coord).iter() {
                let there = g.world_coordinate(*neighbour).expect("valid neighbour");
                assert!(((there - here).sqr_magnitude() - width * width).abs() < 1e-9);

                let other_outline = g.points(*neighbour).expect("valid neighbour");
                let shared = outline.iter()
                    .filter(|p| other_outline.iter().any(|q| close(**p, *q)))
                    .count();
                assert_eq!(shared, 2);
            }
        }
    }

    #[test]
    fn hex_world_coordinates_stagger_even_rows() {
        let g = hex(3, 2);
        let width = 5.0 * 3f64.sqrt();
        let wc = |x, y| g.world_coordinate(Cartesian2DCoordinate::new(x, y)).expect("valid coordinate");

        assert!(close(g.cell_size(), Vec2::new(width, 10.0)));
        assert!(close(wc(0, 0), Vec2::new(width / 2.0, 12.5)));
        assert!(close(wc(0, 1), Vec2::new(width, 20.0)));
        assert!(close(wc(2, 1) - wc(1, 1), Vec2::new(width, 0.0)));
        assert!(g.world_coordinate(Cartesian2DCoordinate::new(0, 2)).is_none());
    }

    #[test]
    fn directions_point_the_way_they_say() {
        let g = square_grid::<u32>(Vec2::ZERO, units::RowLength(3), units::ColumnLength(3), 2.0)
            .expect("grid");
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        let centre = g.world_coordinate(gc(1, 1)).expect("valid coordinate");
        let compass = [(CompassPrimary::North, Vec2::UP),
                       (CompassPrimary::South, Vec2::DOWN),
                       (CompassPrimary::East, Vec2::RIGHT),
                       (CompassPrimary::West, Vec2::LEFT)];
        for &(dir, unit) in &compass {
            let neighbour = g.neighbour_at_direction(gc(1, 1), dir).expect("interior neighbour");
            let there = g.world_coordinate(neighbour).expect("valid neighbour");
            assert_eq!(there - centre, unit.scale(2.0));
        }

        let all_dirs = compass.iter().map(|&(dir, _)| dir).collect::<Vec<_>>();
        assert_smallvec_eq!(g.neighbours_at_directions(gc(2, 2), &all_dirs),
                            &[Some(gc(2, 1)), None, None, Some(gc(1, 2))]);
        assert!(g.neighbours_at_directions(gc(0, 0), &[]).is_empty());
        // stepping back in from outside the grid finds nothing
        assert_eq!(g.neighbour_at_direction(gc(3, 1), CompassPrimary::West), None);
    }

    #[test]
    fn hex_directions_depend_on_row_parity() {
        let g = hex(4, 4);
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        let width = g.cell_size().x;

        // odd rows lean right, even rows lean left
        assert_eq!(g.neighbour_at_direction(gc(1, 1), HexDirection::NorthEast), Some(gc(2, 0)));
        assert_eq!(g.neighbour_at_direction(gc(1, 1), HexDirection::NorthWest), Some(gc(1, 0)));
        assert_eq!(g.neighbour_at_direction(gc(1, 2), HexDirection::NorthEast), Some(gc(1, 1)));
        assert_eq!(g.neighbour_at_direction(gc(1, 2), HexDirection::NorthWest), Some(gc(0, 1)));
        assert_eq!(g.neighbour_at_direction(gc(0, 2), HexDirection::SouthWest), None);

        let wc = |x, y| g.world_coordinate(gc(x, y)).expect("valid coordinate");
        assert!(close(wc(2, 0) - wc(1, 1), Vec2::new(width / 2.0, -7.5)));
        assert!(close(wc(0, 1) - wc(1, 2), Vec2::new(-width / 2.0, -7.5)));
    }

    #[test]
    fn grid_size() {
        let g = small_grid(10, 6);
        assert_eq!(g.size(), 60);
        assert_eq!(g.rows().0, 6);
        assert_eq!(g.columns().0, 10);
        assert_eq!(g.grid_size(), Vec2::new(10.0, 6.0));
        assert_eq!(g.kind(), GridKind::Square);
        assert_eq!(hex(2, 3).kind(), GridKind::Hex);
    }

    #[test]
    fn indices_follow_rows_left_to_right() {
        let g = hex(4, 3);
        for (i, coord) in g.iter_left_to_right().enumerate() {
            assert_eq!(g.grid_coordinate_to_index(coord), Some(i));
            assert_eq!(Cartesian2DCoordinate::from_row_major_index(i, g.dimensions()), coord);
        }
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        assert_eq!(g.grid_coordinate_to_index(gc(3, 3)), None);
        assert_eq!(g.grid_coordinate_to_index(gc(4, 0)), None);
        assert_eq!(g.grid_coordinate_to_index(gc(u32::MAX, u32::MAX)), None);
    }

    #[test]
    fn random_cell() {
        let g = hex(4, 5);
        let mut rng = XorShiftRng::seed_from_u64(7);
        for _ in 0..1000 {
            let coord = g.random_cell(&mut rng);
            assert!(g.is_valid_coordinate(coord));
        }
    }

    #[test]
    fn traversal_orders() {
        let g = hex(3, 2);
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);

        assert_eq!(g.iter().collect::<Vec<_>>(),
                   vec![gc(0, 0), gc(0, 1), gc(1, 0), gc(1, 1), gc(2, 0), gc(2, 1)]);
        assert_eq!(g.iter_left_to_right().collect::<Vec<_>>(),
                   vec![gc(0, 0), gc(1, 0), gc(2, 0), gc(0, 1), gc(1, 1), gc(2, 1)]);
        assert_eq!(g.iter_iso().collect::<Vec<_>>(),
                   vec![gc(0, 0), gc(0, 1), gc(1, 0), gc(1, 1), gc(2, 0), gc(2, 1)]);

        let rows = g.iter_row().collect::<Vec<_>>();
        assert_eq!(rows, vec![vec![gc(0, 0), gc(1, 0), gc(2, 0)], vec![gc(0, 1), gc(1, 1), gc(2, 1)]]);
        let columns = g.iter_column().collect::<Vec<_>>();
        assert_eq!(columns.len(), 3);
        assert!(columns.iter().all(|column| column.len() == 2));
        assert_eq!(columns.concat(), g.iter().collect::<Vec<_>>());
    }

    #[test]
    fn world_coordinates_follow_lattice() {
        let g = square_grid::<u32>(Vec2::new(5.0, 5.0), units::RowLength(3), units::ColumnLength(2), 10.0)
            .expect("grid");
        for coord in g.iter() {
            let expected = Vec2::new(5.0 + coord.x as f64 * 10.0 + 5.0, 5.0 + coord.y as f64 * 10.0 + 5.0);
            assert_eq!(g.world_coordinate(coord), Some(expected));
        }
        assert_eq!(g.world_coordinate(Cartesian2DCoordinate::new(3, 0)), None);
        assert_eq!(g.cell_radius(), Vec2::new(5.0, 5.0));
    }

    #[test]
    fn linking_a_hex_corridor() {
        let mut g = hex(3, 3);
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        // a zig-zag down the middle: (1, 0) even, (1, 1) odd, (1, 2) even
        let (top, middle, bottom) = (gc(1, 0), gc(1, 1), gc(1, 2));
        let linked_dirs = |grid: &Grid<u32, HexCell>, coord| {
            HexCell::offset_directions(coord)
                .iter()
                .cloned()
                .filter(|dir| grid.is_neighbour_linked(coord, *dir))
                .collect::<Vec<HexDirection>>()
        };

        g.link(top, middle).expect("link failed");
        g.link(bottom, middle).expect("link failed");
        assert_eq!(g.links_count(), 2);
        assert!(g.is_linked(middle, top) && g.is_linked(top, middle));
        assert!(!g.is_linked(top, bottom));
        assert_eq!(sorted(&g.links(middle).expect("valid coordinate")), vec![top, bottom]);
        assert_eq!(linked_dirs(&g, top), vec![HexDirection::SouthEast]);
        assert_eq!(linked_dirs(&g, middle), vec![HexDirection::SouthWest, HexDirection::NorthWest]);
        assert_eq!(linked_dirs(&g, bottom), vec![HexDirection::NorthEast]);

        let unconnected = g.unconnected_neighbours(middle);
        assert_eq!(unconnected.len(), 4);
        assert!(!unconnected.contains(&top) && !unconnected.contains(&bottom));

        assert!(g.unlink(middle, top));
        assert!(!g.unlink(top, middle));
        assert_eq!(g.links(top).expect("valid coordinate").len(), 0);
        assert_smallvec_eq!(g.links(bottom).expect("valid coordinate"), &[middle]);
        assert_eq!(g.links(gc(3, 0)), None);
    }

    #[test]
    fn rejected_links_leave_the_grid_untouched() {
        let mut g = hex(4, 4);
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        assert_eq!(g.link(gc(1, 1), gc(1, 1)), Err(CellLinkError::SelfLink));
        assert_eq!(g.link(gc(0, 0), gc(4, 0)), Err(CellLinkError::InvalidGridCoordinate));
        assert_eq!(g.link(gc(9, 9), gc(0, 0)), Err(CellLinkError::InvalidGridCoordinate));
        // (0, 0) sits on an even row, (1, 1) is down and to its right but not adjacent
        assert_eq!(g.link(gc(0, 0), gc(1, 1)), Err(CellLinkError::NotNeighbours));
        assert_eq!(g.link(gc(0, 0), gc(2, 0)), Err(CellLinkError::NotNeighbours));
        assert_eq!(g.links_count(), 0);
        assert!(!CellLinkError::NotNeighbours.to_string().is_empty());
    }

    #[test]
    fn linking_twice_keeps_one_passage() {
        let mut g = small_grid(4, 4);
        let a = Cartesian2DCoordinate::new(2, 3);
        let b = Cartesian2DCoordinate::new(3, 3);
        g.link(a, b).expect("link failed");
        g.link(b, a).expect("link failed");
        g.link(a, b).expect("link failed");
        assert_eq!(g.links_count(), 1);
        assert_smallvec_eq!(g.links(a).expect("valid coordinate"), &[b]);

        g.unlink(a, b);
        assert_eq!(g.links_count(), 0);
        assert!(g.links(b).expect("valid coordinate").is_empty());
    }

    #[test]
    fn links_iter_yields_each_link_once() {
        let mut g = small_grid(3, 1);
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        g.link(gc(0, 0), gc(1, 0)).expect("link failed");
        g.link(gc(1, 0), gc(2, 0)).expect("link failed");
        let links = g.iter_links().collect::<Vec<_>>();
        assert_eq!(links, vec![(gc(0, 0), gc(1, 0)), (gc(1, 0), gc(2, 0))]);

        g.unlink_all();
        assert_eq!(g.iter_links().len(), 0);
    }

    #[test]
    fn grid_cell_surface() {
        let mut g = small_grid(3, 3);
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        let centre = gc(1, 1);
        g.link(centre, gc(1, 0)).expect("link failed");
        g.link(centre, gc(2, 1)).expect("link failed");

        let cell = g.cell(centre).expect("cell in grid");
        assert_eq!(cell.coordinate(), centre);
        assert_eq!(cell.grid_coords(), Vec2::new(1.0, 1.0));
        assert_eq!(cell.world_coords(), Vec2::new(1.5, 1.5));
        assert_eq!(&*cell.points(),
                   &[Vec2::new(1.0, 1.0), Vec2::new(2.0, 1.0), Vec2::new(2.0, 2.0), Vec2::new(1.0, 2.0)]);

        let connections = cell.connections().iter().cloned().sorted().collect::<Vec<_>>();
        assert_eq!(connections, vec![gc(1, 0), gc(2, 1)]);
        let unconnected = cell.unconnected_neighbours().iter().cloned().sorted().collect::<Vec<_>>();
        assert_eq!(unconnected, vec![gc(0, 1), gc(1, 2)]);
        assert_eq!(cell.neighbours().len(), 4);

        assert!(cell.has_connection(Vec2::UP));
        assert!(cell.has_connection(Vec2::RIGHT));
        assert!(!cell.has_connection(Vec2::DOWN));
        assert!(!cell.has_connection(Vec2::LEFT));
        assert!(cell.is_linked_towards(CompassPrimary::North));
        assert_eq!(cell.iso_coords(4.0, Vec2::new(10.0, 0.0)), Vec2::new(10.0, 2.0));
        assert!(!cell.is_linked_towards(CompassPrimary::West));

        assert!(g.cell(gc(3, 3)).is_none());
        assert_eq!(g.cells().count(), 9);
    }

    #[test]
    fn hex_links_follow_hex_adjacency() {
        let mut g = hex(3, 3);
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        // odd row cells reach up and to the right
        assert_eq!(g.link(gc(1, 1), gc(2, 0)), Ok(()));
        assert!(g.is_neighbour_linked(gc(1, 1), HexDirection::NorthEast));
        assert!(g.is_neighbour_linked(gc(2, 0), HexDirection::SouthWest));
        // but not up and to the left
        assert_eq!(g.link(gc(1, 1), gc(0, 0)), Err(CellLinkError::NotNeighbours));
    }

    #[test]
    fn cell_graph_view_of_grid() {
        let mut g = small_grid(2, 2);
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        assert!(CellGraph::contains(&g, gc(1, 1)));
        assert!(!CellGraph::contains(&g, gc(2, 1)));
        CellGraph::connect(&mut g, gc(0, 0), gc(0, 1)).expect("connect failed");
        assert_smallvec_eq!(CellGraph::connections(&g, gc(0, 0)), &[gc(0, 1)]);
        assert_smallvec_eq!(CellGraph::connections(&g, gc(5, 5)), &[]);
        assert_eq!(CellGraph::cells_count(&g), 4);
    }

    #[test]
    fn neighbours_are_bounded_and_symmetric() {
        fn check<CellT: Cell<Coord = Cartesian2DCoordinate>>(g: &Grid<u32, CellT>, max: usize) -> bool {
            g.iter().all(|coord| {
                let neighbours = g.neighbours(coord);
                let expected_min = if g.size() == 1 { 0 } else { 1 };
                neighbours.len() >= expected_min && neighbours.len() <= max &&
                neighbours.iter().all(|n| g.neighbours(*n).contains(&coord))
            })
        }

        fn prop(w: u8, h: u8) -> TestResult {
            let (w, h) = ((w % 12) as usize + 1, (h % 12) as usize + 1);
            let squares = square_grid::<u32>(Vec2::ZERO, units::RowLength(w), units::ColumnLength(h), 1.0)
                .expect("square grid");
            let hexes = hex_grid::<u32>(Vec2::ZERO, units::RowLength(w), units::ColumnLength(h), 1.0)
                .expect("hex grid");
            TestResult::from_bool(check(&squares, 4) && check(&hexes, 6))
        }
        quickcheck(prop as fn(u8, u8) -> TestResult);
    }

    #[test]
    fn interior_and_corner_neighbour_counts() {
        let squares = small_grid(5, 5);
        let hexes = hex(5, 5);
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        assert_eq!(squares.neighbours(gc(0, 0)).len(), 2);
        assert_eq!(squares.neighbours(gc(2, 2)).len(), 4);
        assert_eq!(hexes.neighbours(gc(0, 0)).len(), 2);
        assert_eq!(hexes.neighbours(gc(2, 2)).len(), 6);
        assert_eq!(hexes.neighbours(gc(4, 4)).len(), 3);
    }
}
