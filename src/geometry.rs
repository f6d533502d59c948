//! Geometry primitives consumed by the quadtree.
//!
//! Boxes use the x-major corner convention: bit 0 of a corner index picks the
//! x-half (0 = min, 1 = max) and bit 1 picks the y-half.

/// A point (or vector) in the plane.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point {
    /// Creates a point from its coordinates
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared euclidean distance to `other`
    #[inline]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Euclidean distance to `other`
    #[inline]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }
}

/// Axis-aligned bounding box: `min` is the lower-left corner, `max` the upper-right.
///
/// The default box is zero-sized and sits at the origin.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    /// Lower corner
    pub min: Point,
    /// Upper corner
    pub max: Point,
}

impl Aabb {
    /// Creates a box from its bounds (min_x, min_y, max_x, max_y)
    ///
    /// # Examples
    /// ```
    /// use quadtree2d::Aabb;
    ///
    /// let b = Aabb::new(0.0, 0.0, 4.0, 2.0);
    /// assert_eq!(b.width(), 4.0);
    /// assert_eq!(b.height(), 2.0);
    /// ```
    #[inline]
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min: Point::new(min_x, min_y),
            max: Point::new(max_x, max_y),
        }
    }

    /// Creates the box spanned by two arbitrary opposite corners
    #[inline]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self::new(a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y))
    }

    /// Extent along x
    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Extent along y
    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Center of the box
    #[inline]
    pub fn mid_point(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
        )
    }

    /// Returns corner `index` in x-major order: 0 = (min, min), 1 = (max, min),
    /// 2 = (min, max), 3 = (max, max).
    ///
    /// # Panics
    /// Panics if `index >= 4`.
    #[inline]
    pub fn corner(&self, index: usize) -> Point {
        assert!(index < 4, "corner index {index} out of range 0..4");
        Point::new(
            if index & 1 == 0 { self.min.x } else { self.max.x },
            if index & 2 == 0 { self.min.y } else { self.max.y },
        )
    }

    /// Returns the quadrant box spanning `corner(index)` to the midpoint.
    ///
    /// # Panics
    /// Panics if `index >= 4`.
    #[inline]
    pub fn quadrant(&self, index: usize) -> Self {
        Self::from_corners(self.corner(index), self.mid_point())
    }

    /// Extends the shorter axis from the lower corner so width equals height
    #[must_use]
    pub fn square_from_min(&self) -> Self {
        let size = self.width().max(self.height()).max(0.0);
        Self::new(self.min.x, self.min.y, self.min.x + size, self.min.y + size)
    }

    /// Whether the two boxes share any point (touching edges count)
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Whether `point` lies inside the box or on its boundary
    #[inline]
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Closest point of the box to `point`
    #[inline]
    pub fn clamp(&self, point: Point) -> Point {
        Point::new(
            point.x.max(self.min.x).min(self.max.x),
            point.y.max(self.min.y).min(self.max.y),
        )
    }

    /// Squared distance from `point` to the box; 0 when inside
    #[inline]
    pub fn distance_squared_to(&self, point: Point) -> f64 {
        self.clamp(point).distance_squared(point)
    }

    /// Whether the ray hits the box
    #[inline]
    pub fn intersects_ray(&self, ray: &Ray) -> bool {
        self.ray_entry(ray).is_some()
    }

    /// Parametric distance along `ray` at which it enters the box.
    ///
    /// Returns `Some(0.0)` when the origin is already inside, `None` on a miss.
    /// Slab test; a zero direction component yields infinite slab bounds so
    /// the axis only constrains the origin.
    ///
    /// # Examples
    /// ```
    /// use quadtree2d::{Aabb, Point, Ray};
    ///
    /// let b = Aabb::new(2.0, -1.0, 3.0, 1.0);
    /// let ray = Ray::new(Point::new(0.0, 0.0), Point::new(1.0, 0.0));
    /// assert_eq!(b.ray_entry(&ray), Some(2.0));
    /// ```
    pub fn ray_entry(&self, ray: &Ray) -> Option<f64> {
        let mut t_near = 0.0_f64;
        let mut t_far = f64::INFINITY;

        for (origin, dir, lo, hi) in [
            (ray.origin.x, ray.direction.x, self.min.x, self.max.x),
            (ray.origin.y, ray.direction.y, self.min.y, self.max.y),
        ] {
            if dir == 0.0 {
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / dir;
            let t0 = (lo - origin) * inv;
            let t1 = (hi - origin) * inv;
            let (t0, t1) = if t0 <= t1 { (t0, t1) } else { (t1, t0) };
            t_near = t_near.max(t0);
            t_far = t_far.min(t1);
            if t_near > t_far {
                return None;
            }
        }

        Some(t_near)
    }
}

/// Half-line starting at `origin` and extending along `direction`
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Ray {
    /// Start point
    pub origin: Point,
    /// Direction; need not be normalized
    pub direction: Point,
}

impl Ray {
    /// Creates a ray
    #[inline]
    pub const fn new(origin: Point, direction: Point) -> Self {
        Self { origin, direction }
    }

    /// Point at parameter `t`
    #[inline]
    pub fn at(&self, t: f64) -> Point {
        Point::new(
            self.origin.x + self.direction.x * t,
            self.origin.y + self.direction.y * t,
        )
    }
}
