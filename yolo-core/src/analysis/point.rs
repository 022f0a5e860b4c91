use std::fmt;
use std::ops::{Add, Div, Index, Mul, Sub};

use serde::{Deserialize, Serialize};

/// A point in image space.
///
/// Points are plain values: every operation returns a new point and
/// equality compares both coordinates exactly, without any epsilon.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a point from its coordinates.
    ///
    /// # Example
    /// ```
    /// use yolo_core::analysis::point::Point;
    /// let p = Point::new(1.5, -2.0);
    /// assert_eq!(p.x, 1.5);
    /// assert_eq!(p.y, -2.0);
    /// ```
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Multiplies both coordinates by `k`.
    pub fn scale(&self, k: f64) -> Self {
        Self::new(self.x * k, self.y * k)
    }

    /// Euclidean distance between two points.
    ///
    /// # Example
    /// ```
    /// use yolo_core::analysis::point::Point;
    /// let a = Point::new(0.0, 0.0);
    /// let b = Point::new(3.0, 4.0);
    /// assert_eq!(a.distance(&b), 5.0);
    /// ```
    pub fn distance(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Truncates both coordinates toward zero.
    ///
    /// # Example
    /// ```
    /// use yolo_core::analysis::point::Point;
    /// assert_eq!(Point::new(1.9, -1.9).to_integer(), Point::new(1.0, -1.0));
    /// ```
    pub fn to_integer(&self) -> Self {
        Self::new(self.x.trunc(), self.y.trunc())
    }

    /// Real-valued copy of the point. Coordinates are already `f64`, so this
    /// is the identity.
    pub fn to_real(&self) -> Self {
        *self
    }

    pub fn as_tuple(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Pixel coordinates, truncated toward zero.
    pub fn as_pixel(&self) -> (i32, i32) {
        (self.x as i32, self.y as i32)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Self) -> Self::Output {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Self) -> Self::Output {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Self::Output {
        self.scale(rhs)
    }
}

impl Div<f64> for Point {
    type Output = Point;

    fn div(self, rhs: f64) -> Self::Output {
        Point::new(self.x / rhs, self.y / rhs)
    }
}

impl Index<usize> for Point {
    type Output = f64;

    /// 0 is `x`, 1 is `y`; any other index panics.
    fn index(&self, index: usize) -> &Self::Output {
        match index {
            0 => &self.x,
            1 => &self.y,
            _ => panic!("Point index out of range: {}", index),
        }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<glam::DVec2> for Point {
    fn from(v: glam::DVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Point> for glam::DVec2 {
    fn from(p: Point) -> Self {
        glam::DVec2::new(p.x, p.y)
    }
}
