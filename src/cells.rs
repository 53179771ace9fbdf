use std::convert::From;
use std::f64::consts::PI;
use std::fmt::Debug;
use std::hash::Hash;
use std::iter::FromIterator;
use std::ops::Deref;

use smallvec::SmallVec;

use crate::grid_traits::GridDimensions;
use crate::units::{ColumnIndex, ColumnsCount, RowIndex, RowsCount};
use crate::vec2::Vec2;

pub trait Coordinate
    : PartialEq + Eq + Hash + Copy + Clone + Debug + Ord + PartialOrd {
    fn from_row_major_index(index: usize, dimensions: &dyn GridDimensions) -> Self;
    fn from_row_column_indices(col_index: ColumnIndex, row_index: RowIndex) -> Self;
    fn as_cartesian_2d(&self) -> Cartesian2DCoordinate;
}

/// Tag naming the lattice a cell type lives on.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum GridKind {
    Square,
    Hex,
}

/// World space placement shared by every cell of a grid, fixed at grid construction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CellLayout {
    /// World position that lattice coordinate (0, 0) is measured from.
    pub origin: Vec2,
    pub cell_size: Vec2,
    /// Half extents of a cell.
    pub cell_radius: Vec2,
}

pub type PointsSmallVec = SmallVec<[Vec2; 6]>;

pub trait Cell {
    type Coord: Coordinate;
    type Direction: Eq + PartialEq + Copy + Clone + Debug;
    // Deref<Target=[Self::Coord]> gives access to the `iter` of slices.
    type CoordinateSmallVec: FromIterator<Self::Coord> + Deref<Target = [Self::Coord]>;
    type CoordinateOptionSmallVec: FromIterator<Option<Self::Coord>> + Deref<Target = [Option<Self::Coord>]>;
    type DirectionSmallVec: FromIterator<Self::Direction> + Deref<Target = [Self::Direction]>;

    const KIND: GridKind;

    /// Creates a small vec of the possible directions away from this Cell.
    fn offset_directions(coord: Self::Coord) -> Self::DirectionSmallVec;

    /// Creates a new `Coord` offset 1 cell away in the given direction.
    /// Returns None if the Coordinate is not representable.
    /// The caller still has to check the result lies within the grid.
    fn offset_coordinate(coord: Self::Coord, dir: Self::Direction) -> Option<Self::Coord>;

    fn layout(origin: Vec2, dimensions: &dyn GridDimensions, cell_height: f64) -> CellLayout;

    fn world_coordinate(coord: Self::Coord, layout: &CellLayout) -> Vec2;

    /// Outline of a cell centred on `world_coordinate`, clockwise in screen space (y down).
    fn points(world_coordinate: Vec2, layout: &CellLayout) -> PointsSmallVec;

    /// Number of distinct neighbour pairs on a lattice of these dimensions, i.e. the most links
    /// a grid can ever hold.
    fn max_links(dimensions: &dyn GridDimensions) -> usize;
}

#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct Cartesian2DCoordinate {
    pub x: u32,
    pub y: u32,
}

impl Cartesian2DCoordinate {
    pub fn new(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate { x, y }
    }

    /// Move by a signed lattice offset, None if either axis leaves the u32 range.
    #[inline]
    pub fn offset(&self, dx: i64, dy: i64) -> Option<Cartesian2DCoordinate> {
        let x = i64::from(self.x) + dx;
        let y = i64::from(self.y) + dy;
        if x < 0 || y < 0 || x > i64::from(u32::MAX) || y > i64::from(u32::MAX) {
            None
        } else {
            Some(Cartesian2DCoordinate::new(x as u32, y as u32))
        }
    }

    #[inline]
    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(f64::from(self.x), f64::from(self.y))
    }
}

impl Coordinate for Cartesian2DCoordinate {
    #[inline]
    fn from_row_major_index(index: usize, dimensions: &dyn GridDimensions) -> Cartesian2DCoordinate {
        let ColumnsCount(width) = dimensions.columns();
        let x = index % width;
        let y = index / width;

        Cartesian2DCoordinate::new(x as u32, y as u32)
    }

    #[inline]
    fn from_row_column_indices(col_index: ColumnIndex, row_index: RowIndex) -> Self {
        let (ColumnIndex(col), RowIndex(row)) = (col_index, row_index);
        Cartesian2DCoordinate::new(col as u32, row as u32)
    }

    #[inline]
    fn as_cartesian_2d(&self) -> Cartesian2DCoordinate {
        *self
    }
}

impl From<(u32, u32)> for Cartesian2DCoordinate {
    fn from(x_y_pair: (u32, u32)) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x_y_pair.0, x_y_pair.1)
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CompassPrimary {
    North,
    South,
    East,
    West,
}

impl CompassPrimary {
    /// Unit lattice step, y grows southwards.
    pub fn offset(self) -> Vec2 {
        match self {
            CompassPrimary::North => Vec2::UP,
            CompassPrimary::South => Vec2::DOWN,
            CompassPrimary::East => Vec2::RIGHT,
            CompassPrimary::West => Vec2::LEFT,
        }
    }
}

#[derive(Copy, Clone, Debug)]
pub struct SquareCell;

impl Cell for SquareCell {
    type Coord = Cartesian2DCoordinate;
    type Direction = CompassPrimary;
    type CoordinateSmallVec = SmallVec<[Self::Coord; 4]>;
    type CoordinateOptionSmallVec = SmallVec<[Option<Self::Coord>; 4]>;
    type DirectionSmallVec = SmallVec<[CompassPrimary; 4]>;

    const KIND: GridKind = GridKind::Square;

    fn offset_directions(_: Self::Coord) -> Self::DirectionSmallVec {
        [CompassPrimary::North, CompassPrimary::South, CompassPrimary::East, CompassPrimary::West]
            .iter()
            .cloned()
            .collect::<Self::DirectionSmallVec>()
    }

    fn offset_coordinate(coord: Self::Coord, dir: Self::Direction) -> Option<Self::Coord> {
        match dir {
            CompassPrimary::North => coord.offset(0, -1),
            CompassPrimary::South => coord.offset(0, 1),
            CompassPrimary::East => coord.offset(1, 0),
            CompassPrimary::West => coord.offset(-1, 0),
        }
    }

    fn layout(origin: Vec2, _: &dyn GridDimensions, cell_height: f64) -> CellLayout {
        CellLayout {
            origin,
            cell_size: Vec2::new(cell_height, cell_height),
            cell_radius: Vec2::new(cell_height / 2.0, cell_height / 2.0),
        }
    }

    fn world_coordinate(coord: Self::Coord, layout: &CellLayout) -> Vec2 {
        let CellLayout { origin, cell_size, cell_radius } = *layout;
        Vec2::new(origin.x + (f64::from(coord.x) * cell_size.x + cell_radius.x),
                  origin.y + (f64::from(coord.y) * cell_size.y + cell_radius.y))
    }

    fn points(world_coordinate: Vec2, layout: &CellLayout) -> PointsSmallVec {
        let r = layout.cell_radius;
        [Vec2::new(-r.x, -r.y), Vec2::new(r.x, -r.y), Vec2::new(r.x, r.y), Vec2::new(-r.x, r.y)]
            .iter()
            .map(|&corner| world_coordinate + corner)
            .collect()
    }

    fn max_links(dimensions: &dyn GridDimensions) -> usize {
        let (ColumnsCount(w), RowsCount(h)) = (dimensions.columns(), dimensions.rows());
        w.saturating_sub(1) * h + w * h.saturating_sub(1)
    }
}

/// Neighbour directions on a pointy-top hex lattice.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum HexDirection {
    East,
    SouthEast,
    SouthWest,
    West,
    NorthWest,
    NorthEast,
}

/// Pointy-top hexagons with every odd row pushed half a cell to the right of the even rows.
#[derive(Copy, Clone, Debug)]
pub struct HexCell;

impl Cell for HexCell {
    type Coord = Cartesian2DCoordinate;
    type Direction = HexDirection;
    type CoordinateSmallVec = SmallVec<[Self::Coord; 6]>;
    type CoordinateOptionSmallVec = SmallVec<[Option<Self::Coord>; 6]>;
    type DirectionSmallVec = SmallVec<[HexDirection; 6]>;

    const KIND: GridKind = GridKind::Hex;

    fn offset_directions(_: Self::Coord) -> Self::DirectionSmallVec {
        [HexDirection::East,
         HexDirection::SouthEast,
         HexDirection::SouthWest,
         HexDirection::West,
         HexDirection::NorthWest,
         HexDirection::NorthEast]
            .iter()
            .cloned()
            .collect::<Self::DirectionSmallVec>()
    }

    fn offset_coordinate(coord: Self::Coord, dir: Self::Direction) -> Option<Self::Coord> {
        let odd_row = coord.y % 2 == 1;
        let (dx, dy) = match (dir, odd_row) {
            (HexDirection::East, _) => (1, 0),
            (HexDirection::West, _) => (-1, 0),
            (HexDirection::SouthEast, true) => (1, 1),
            (HexDirection::SouthEast, false) => (0, 1),
            (HexDirection::SouthWest, true) => (0, 1),
            (HexDirection::SouthWest, false) => (-1, 1),
            (HexDirection::NorthWest, true) => (0, -1),
            (HexDirection::NorthWest, false) => (-1, -1),
            (HexDirection::NorthEast, true) => (1, -1),
            (HexDirection::NorthEast, false) => (0, -1),
        };
        coord.offset(dx, dy)
    }

    fn layout(origin: Vec2, dimensions: &dyn GridDimensions, cell_height: f64) -> CellLayout {
        let cell_size = Vec2::new((cell_height / 2.0) * 3f64.sqrt(), cell_height);
        let RowsCount(rows) = dimensions.rows();
        let origin_x = if rows % 2 == 0 {
            origin.x + cell_size.x
        } else {
            origin.x + (0.75 * cell_size.x)
        };
        CellLayout {
            origin: Vec2::new(origin_x, origin.y + (1.25 * cell_size.y)),
            cell_size,
            cell_radius: cell_size.scale(0.5),
        }
    }

    fn world_coordinate(coord: Self::Coord, layout: &CellLayout) -> Vec2 {
        let CellLayout { origin, cell_size, cell_radius } = *layout;
        let mut world = Vec2::new(origin.x + (f64::from(coord.x) * cell_size.x),
                                  origin.y + (f64::from(coord.y) * (cell_size.y * 0.75)));
        if coord.y % 2 == 0 {
            world.x -= cell_radius.x;
        }
        world
    }

    fn points(world_coordinate: Vec2, layout: &CellLayout) -> PointsSmallVec {
        (0..6)
            .map(|i| {
                let angle = (f64::from(i) / 6.0) * 2.0 * PI - (PI / 6.0);
                world_coordinate + Vec2::new(angle.cos(), angle.sin()).scale(layout.cell_radius.y)
            })
            .collect()
    }

    fn max_links(dimensions: &dyn GridDimensions) -> usize {
        let (ColumnsCount(w), RowsCount(h)) = (dimensions.columns(), dimensions.rows());
        // row neighbours plus the zig-zag between each pair of adjacent rows
        w.saturating_sub(1) * h + h.saturating_sub(1) * (2 * w).saturating_sub(1)
    }
}
