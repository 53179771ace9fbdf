//! Geometry the quadtree can index.
//!
//! Every shape answers a single question through `Indexable`: which of a node's four quadrants
//! might it overlap. Shapes carry an opaque `data` payload that the index stores and hands back
//! but never reads.

use std::cell::{Cell, RefCell};

use smallvec::SmallVec;

use crate::vec2::Vec2;

/// An axis aligned region, `(x, y)` is the top left corner and y grows downwards.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Child slots of a split quadtree node, in storage order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Quadrant {
    NorthEast = 0,
    NorthWest = 1,
    SouthWest = 2,
    SouthEast = 3,
}

pub type QuadrantSmallVec = SmallVec<[Quadrant; 4]>;

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [Quadrant::NorthEast,
                                    Quadrant::NorthWest,
                                    Quadrant::SouthWest,
                                    Quadrant::SouthEast];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Bounds {
        Bounds { x, y, width, height }
    }

    #[inline]
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    #[inline]
    pub fn centre(&self) -> Vec2 {
        Vec2::new(self.x + (self.width / 2.0), self.y + (self.height / 2.0))
    }

    /// The quarter of this region a child node in slot `quadrant` covers.
    pub fn quadrant(&self, quadrant: Quadrant) -> Bounds {
        let (w2, h2) = (self.width / 2.0, self.height / 2.0);
        let (x, y) = match quadrant {
            Quadrant::NorthEast => (self.x + w2, self.y),
            Quadrant::NorthWest => (self.x, self.y),
            Quadrant::SouthWest => (self.x, self.y + h2),
            Quadrant::SouthEast => (self.x + w2, self.y + h2),
        };
        Bounds::new(x, y, w2, h2)
    }

    pub fn quadrants(&self) -> [Bounds; 4] {
        [self.quadrant(Quadrant::NorthEast),
         self.quadrant(Quadrant::NorthWest),
         self.quadrant(Quadrant::SouthWest),
         self.quadrant(Quadrant::SouthEast)]
    }
}

/// Anything that can say which quadrants of a node it may overlap. Zero to four may be returned.
pub trait Indexable {
    fn qt_index(&self, bounds: &Bounds) -> QuadrantSmallVec;
}

/// Quadrant membership by comparing a box's edges with the node's midlines.
fn box_quadrants(x: f64, y: f64, width: f64, height: f64, bounds: &Bounds) -> QuadrantSmallVec {
    let centre = bounds.centre();
    let start_is_north = y < centre.y;
    let start_is_west = x < centre.x;
    let end_is_east = x + width > centre.x;
    let end_is_south = y + height > centre.y;

    let mut quadrants = QuadrantSmallVec::new();
    if start_is_north && end_is_east {
        quadrants.push(Quadrant::NorthEast);
    }
    if start_is_west && start_is_north {
        quadrants.push(Quadrant::NorthWest);
    }
    if start_is_west && end_is_south {
        quadrants.push(Quadrant::SouthWest);
    }
    if end_is_east && end_is_south {
        quadrants.push(Quadrant::SouthEast);
    }
    quadrants
}

/// Quadrants whose rectangle passes `hits(min_x, min_y, max_x, max_y)`.
fn quadrants_hit<F>(bounds: &Bounds, hits: F) -> QuadrantSmallVec
    where F: Fn(f64, f64, f64, f64) -> bool
{
    Quadrant::ALL
        .iter()
        .cloned()
        .filter(|quadrant| {
            let q = bounds.quadrant(*quadrant);
            hits(q.x, q.y, q.max_x(), q.max_y())
        })
        .collect()
}

impl Indexable for Bounds {
    fn qt_index(&self, bounds: &Bounds) -> QuadrantSmallVec {
        box_quadrants(self.x, self.y, self.width, self.height, bounds)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rectangle<D = ()> {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub data: D,
}

impl Rectangle {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Rectangle {
        Rectangle { x, y, width, height, data: () }
    }
}

impl<D> Rectangle<D> {
    pub fn with_data<E>(self, data: E) -> Rectangle<E> {
        Rectangle {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            data,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height)
    }
}

impl<D> Indexable for Rectangle<D> {
    fn qt_index(&self, bounds: &Bounds) -> QuadrantSmallVec {
        box_quadrants(self.x, self.y, self.width, self.height, bounds)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Circle<D = ()> {
    pub x: f64,
    pub y: f64,
    pub r: f64,
    pub data: D,
}

impl Circle {
    pub fn new(x: f64, y: f64, r: f64) -> Circle {
        Circle { x, y, r, data: () }
    }

    /// Does a circle overlap a rectangle?
    ///
    /// The point of the rectangle nearest the centre is found by clamping, the circle overlaps
    /// when that point is strictly closer than `r`. Touching does not count.
    pub fn intersect_rect(x: f64,
                          y: f64,
                          r: f64,
                          min_x: f64,
                          min_y: f64,
                          max_x: f64,
                          max_y: f64)
                          -> bool {
        let delta_x = x - min_x.max(x.min(max_x));
        let delta_y = y - min_y.max(y.min(max_y));
        (delta_x * delta_x + delta_y * delta_y) < (r * r)
    }
}

impl<D> Circle<D> {
    pub fn with_data<E>(self, data: E) -> Circle<E> {
        Circle {
            x: self.x,
            y: self.y,
            r: self.r,
            data,
        }
    }

    #[inline]
    pub fn centre(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl<D> Indexable for Circle<D> {
    fn qt_index(&self, bounds: &Bounds) -> QuadrantSmallVec {
        quadrants_hit(bounds, |min_x, min_y, max_x, max_y| {
            Circle::intersect_rect(self.x, self.y, self.r, min_x, min_y, max_x, max_y)
        })
    }
}

/// A line segment from `(x1, y1)` to `(x2, y2)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Line<D = ()> {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub data: D,
}

impl Line {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Line {
        Line { x1, y1, x2, y2, data: () }
    }

    /// Does a segment cross a rectangle?
    ///
    /// Rejects a segment lying wholly beyond one side, accepts one with an endpoint inside (edges
    /// included), and otherwise looks for a crossing strictly inside one of the four sides.
    /// A diagonal passing exactly through a corner is reported as a miss.
    pub fn intersect_rect(x1: f64,
                          y1: f64,
                          x2: f64,
                          y2: f64,
                          min_x: f64,
                          min_y: f64,
                          max_x: f64,
                          max_y: f64)
                          -> bool {
        if (x1 <= min_x && x2 <= min_x) || (y1 <= min_y && y2 <= min_y) ||
           (x1 >= max_x && x2 >= max_x) || (y1 >= max_y && y2 >= max_y) {
            return false;
        }

        let inside = |x: f64, y: f64| x >= min_x && x <= max_x && y >= min_y && y <= max_y;
        if inside(x1, y1) || inside(x2, y2) {
            return true;
        }

        // vertical segments give an infinite slope, which the x crossings below still handle
        let m = (y2 - y1) / (x2 - x1);
        let strictly_between = |v: f64, low: f64, high: f64| v > low && v < high;

        strictly_between(m * (min_x - x1) + y1, min_y, max_y) ||
        strictly_between(m * (max_x - x1) + y1, min_y, max_y) ||
        strictly_between((min_y - y1) / m + x1, min_x, max_x) ||
        strictly_between((max_y - y1) / m + x1, min_x, max_x)
    }
}

impl<D> Line<D> {
    pub fn with_data<E>(self, data: E) -> Line<E> {
        Line {
            x1: self.x1,
            y1: self.y1,
            x2: self.x2,
            y2: self.y2,
            data,
        }
    }
}

impl<D> Indexable for Line<D> {
    fn qt_index(&self, bounds: &Bounds) -> QuadrantSmallVec {
        quadrants_hit(bounds, |min_x, min_y, max_x, max_y| {
            Line::intersect_rect(self.x1, self.y1, self.x2, self.y2, min_x, min_y, max_x, max_y)
        })
    }
}

/// The built in shapes as one closed type, for trees holding a mix of them.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Shape<D = ()> {
    Rectangle(Rectangle<D>),
    Circle(Circle<D>),
    Line(Line<D>),
}

impl<D> Shape<D> {
    pub fn data(&self) -> &D {
        match *self {
            Shape::Rectangle(ref rect) => &rect.data,
            Shape::Circle(ref circle) => &circle.data,
            Shape::Line(ref line) => &line.data,
        }
    }
}

impl<D> Indexable for Shape<D> {
    fn qt_index(&self, bounds: &Bounds) -> QuadrantSmallVec {
        match *self {
            Shape::Rectangle(ref rect) => rect.qt_index(bounds),
            Shape::Circle(ref circle) => circle.qt_index(bounds),
            Shape::Line(ref line) => line.qt_index(bounds),
        }
    }
}

impl<D> From<Rectangle<D>> for Shape<D> {
    fn from(rect: Rectangle<D>) -> Shape<D> {
        Shape::Rectangle(rect)
    }
}

impl<D> From<Circle<D>> for Shape<D> {
    fn from(circle: Circle<D>) -> Shape<D> {
        Shape::Circle(circle)
    }
}

impl<D> From<Line<D>> for Shape<D> {
    fn from(line: Line<D>) -> Shape<D> {
        Shape::Line(line)
    }
}

// Interior mutability lets a caller move a shape the tree already holds, then `update` it.

impl<T: Indexable + ?Sized> Indexable for RefCell<T> {
    fn qt_index(&self, bounds: &Bounds) -> QuadrantSmallVec {
        self.borrow().qt_index(bounds)
    }
}

impl<T: Indexable + Copy> Indexable for Cell<T> {
    fn qt_index(&self, bounds: &Bounds) -> QuadrantSmallVec {
        self.get().qt_index(bounds)
    }
}
