//! Axis-aligned rectangle geometry used by the R*-tree.
//!
//! Coordinates follow screen conventions: a [`Rectangle`] is anchored at its
//! left-upper corner and extends by `width` along x and `height` along y, so
//! the right-lower corner is `left_upper + (width, height)`.

use serde::{Deserialize, Serialize};

/// Extent of the rectangle built around a point for point queries.
pub const POINT_QUERY_EXTENT: f64 = f64::EPSILON;

/// A point in 2D space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the point translated by `(dx, dy)`.
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Squared euclidean distance to another point.
    pub fn distance_squared(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Point({}, {})", self.x, self.y)
    }
}

/// The coordinate axes of the plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Both axes, in evaluation order.
    pub const ALL: [Axis; 2] = [Axis::X, Axis::Y];
}

/// An axis-aligned minimum bounding rectangle.
///
/// `Rectangle` is an immutable value type. Width and height are never
/// negative; a rectangle with zero width and zero height is the empty
/// sentinel that [`Rectangle::union`] treats as its identity.
///
/// # Examples
///
/// ```rust
/// use rstar_index::{Point, Rectangle};
///
/// let a = Rectangle::new(0.0, 0.0, 2.0, 2.0);
/// let b = Rectangle::new(1.0, 1.0, 2.0, 2.0);
///
/// assert!(a.intersects(&b));
/// assert_eq!(a.intersection_area(&b), 1.0);
/// assert_eq!(a.union(&b), Rectangle::new(0.0, 0.0, 3.0, 3.0));
/// assert!(a.contains_point(Point::new(2.0, 2.0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rectangle {
    /// Left-upper (minimum) corner
    pub left_upper: Point,
    /// Extent along x
    pub width: f64,
    /// Extent along y
    pub height: f64,
}

impl std::fmt::Display for Rectangle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Rectangle({}, {}, {}, {})",
            self.left_upper.x, self.left_upper.y, self.width, self.height
        )
    }
}

impl Rectangle {
    /// Creates a rectangle from its left-upper corner and its extent.
    ///
    /// # Arguments
    ///
    /// * `x` - X coordinate of the left-upper corner
    /// * `y` - Y coordinate of the left-upper corner
    /// * `width` - Extent along x, must not be negative
    /// * `height` - Extent along y, must not be negative
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        debug_assert!(
            width >= 0.0 && height >= 0.0,
            "rectangle extent must not be negative"
        );
        Self {
            left_upper: Point::new(x, y),
            width,
            height,
        }
    }

    /// Creates the rectangle spanned by two opposite corners, in any order.
    ///
    /// The extent is rounded up so that the rebuilt right-lower corner never
    /// falls short of the larger corner.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let min_x = a.x.min(b.x);
        let min_y = a.y.min(b.y);
        Self::new(
            min_x,
            min_y,
            covering_extent(min_x, a.x.max(b.x)),
            covering_extent(min_y, a.y.max(b.y)),
        )
    }

    /// Creates a square of side `extent` centred on `point`.
    pub fn around_point(point: Point, extent: f64) -> Self {
        let half = extent / 2.0;
        Self::new(point.x - half, point.y - half, extent, extent)
    }

    /// The empty sentinel: zero width and height at the origin.
    pub const fn empty() -> Self {
        Self {
            left_upper: Point::new(0.0, 0.0),
            width: 0.0,
            height: 0.0,
        }
    }

    /// Returns `true` for zero width and zero height.
    pub fn is_empty(&self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }

    /// Returns `true` when all coordinates are finite and the extent is not negative.
    pub fn is_valid(&self) -> bool {
        self.left_upper.x.is_finite()
            && self.left_upper.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width >= 0.0
            && self.height >= 0.0
    }

    /// The right-lower (maximum) corner.
    pub fn right_lower(&self) -> Point {
        self.left_upper.offset(self.width, self.height)
    }

    /// Lower edge coordinate along `axis`.
    pub fn lower(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.left_upper.x,
            Axis::Y => self.left_upper.y,
        }
    }

    /// Upper edge coordinate along `axis`.
    pub fn upper(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.left_upper.x + self.width,
            Axis::Y => self.left_upper.y + self.height,
        }
    }

    pub fn center(&self) -> Point {
        self.left_upper.offset(self.width / 2.0, self.height / 2.0)
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Perimeter of the rectangle.
    pub fn margin(&self) -> f64 {
        2.0 * (self.width + self.height)
    }

    /// Smallest rectangle covering both operands.
    ///
    /// The empty sentinel is absorbing: if either side is empty the other one
    /// is returned unchanged, which makes `empty()` a fold identity.
    pub fn union(&self, other: &Rectangle) -> Rectangle {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        self.merge(other)
    }

    /// Smallest rectangle covering both operands, treating zero-extent
    /// rectangles as real locations.
    pub fn merge(&self, other: &Rectangle) -> Rectangle {
        let lower = self.right_lower();
        let other_lower = other.right_lower();
        Rectangle::from_corners(
            Point::new(
                self.left_upper.x.min(other.left_upper.x),
                self.left_upper.y.min(other.left_upper.y),
            ),
            Point::new(lower.x.max(other_lower.x), lower.y.max(other_lower.y)),
        )
    }

    /// Tight cover of all rectangles, or the empty sentinel when there are none.
    pub fn cover<'a, I>(rectangles: I) -> Rectangle
    where
        I: IntoIterator<Item = &'a Rectangle>,
    {
        rectangles
            .into_iter()
            .copied()
            .reduce(|acc, r| acc.merge(&r))
            .unwrap_or_else(Rectangle::empty)
    }

    /// Area of the overlap between both rectangles; zero when disjoint.
    pub fn intersection_area(&self, other: &Rectangle) -> f64 {
        let lower = self.right_lower();
        let other_lower = other.right_lower();
        let dx = (lower.x.min(other_lower.x) - self.left_upper.x.max(other.left_upper.x)).max(0.0);
        let dy = (lower.y.min(other_lower.y) - self.left_upper.y.max(other.left_upper.y)).max(0.0);
        dx * dy
    }

    /// Area growth needed for `self` to also cover `other`.
    pub fn enlargement_area(&self, other: &Rectangle) -> f64 {
        (self.merge(other).area() - self.area()).max(0.0)
    }

    /// Edge-inclusive intersection test; touching rectangles intersect.
    pub fn intersects(&self, other: &Rectangle) -> bool {
        let lower = self.right_lower();
        let other_lower = other.right_lower();
        self.left_upper.x <= other_lower.x
            && other.left_upper.x <= lower.x
            && self.left_upper.y <= other_lower.y
            && other.left_upper.y <= lower.y
    }

    /// Edge-inclusive containment test.
    pub fn contains(&self, other: &Rectangle) -> bool {
        let lower = self.right_lower();
        let other_lower = other.right_lower();
        self.left_upper.x <= other.left_upper.x
            && self.left_upper.y <= other.left_upper.y
            && lower.x >= other_lower.x
            && lower.y >= other_lower.y
    }

    pub fn contains_point(&self, point: Point) -> bool {
        let lower = self.right_lower();
        point.x >= self.left_upper.x
            && point.x <= lower.x
            && point.y >= self.left_upper.y
            && point.y <= lower.y
    }

    /// Squared distance between the centres of both rectangles.
    pub fn distance_squared_to_center(&self, other: &Rectangle) -> f64 {
        self.center().distance_squared(&other.center())
    }
}

/// Smallest extent `e >= max - min` with `min + e >= max`.
fn covering_extent(min: f64, max: f64) -> f64 {
    let mut extent = max - min;
    while min + extent < max {
        extent = extent.next_up();
    }
    extent
}
