use std::fmt;
use std::ops::Mul;

use glam::DVec2;
use serde::Serialize;
use snafu::ensure;

use super::point::Point;
use crate::consts::GROUND_TRUTH_CONFIDENCE;
use crate::error::{DegenerateGeometrySnafu, InvalidDimensionSnafu, YoloError};

/// An axis-aligned bounding box around an object in an image.
///
/// The box is stored as a center, a size and a confidence score. Corners are
/// derived on demand. Image coordinates are used throughout: `x` grows to the
/// right and `y` grows downward, so the top-left corner holds the minimum of
/// both coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Rectangle {
    center: Point,
    width: f64,
    height: f64,
    confidence: f64,
}

impl Rectangle {
    /// Creates a rectangle from its center, size and confidence.
    ///
    /// # Arguments
    /// * `center` - Center of the box
    /// * `width` - Horizontal extent
    /// * `height` - Vertical extent
    /// * `confidence` - Detection score, conventionally in `[0, 1]`
    ///
    /// The size is not validated; a negative width or height yields a
    /// rectangle whose corners are swapped. Use [`Rectangle::try_new`] when
    /// the input is untrusted.
    ///
    /// # Example
    /// ```
    /// use yolo_core::analysis::{bbox::Rectangle, point::Point};
    /// let rect = Rectangle::new(Point::new(0.0, 0.0), 1.0, 2.0, 0.5);
    /// assert_eq!(rect.top_left(), Point::new(-0.5, -1.0));
    /// assert_eq!(rect.bottom_right(), Point::new(0.5, 1.0));
    /// assert_eq!(rect.area(), 2.0);
    /// ```
    pub fn new(center: Point, width: f64, height: f64, confidence: f64) -> Self {
        Self {
            center,
            width,
            height,
            confidence,
        }
    }

    /// Creates a rectangle, rejecting negative or non-finite sizes.
    ///
    /// # Errors
    /// `InvalidDimension` when `width` or `height` is negative, NaN or infinite.
    pub fn try_new(
        center: Point,
        width: f64,
        height: f64,
        confidence: f64,
    ) -> Result<Self, YoloError> {
        ensure!(
            width.is_finite() && height.is_finite() && width >= 0.0 && height >= 0.0,
            InvalidDimensionSnafu { width, height }
        );
        Ok(Self::new(center, width, height, confidence))
    }

    /// Creates a rectangle spanning two opposite corners.
    ///
    /// The corners may come in any order; width and height are the absolute
    /// differences. The confidence is always `1.0`.
    ///
    /// # Arguments
    /// * `top_left` - One corner, usually `(xmin, ymin)`
    /// * `bottom_right` - The opposite corner, usually `(xmax, ymax)`
    ///
    /// # Example
    /// ```
    /// use yolo_core::analysis::{bbox::Rectangle, point::Point};
    /// let rect = Rectangle::from_corners(Point::new(0.0, 0.0), Point::new(4.0, 2.0));
    /// assert_eq!(rect, Rectangle::new(Point::new(2.0, 1.0), 4.0, 2.0, 1.0));
    /// ```
    pub fn from_corners(top_left: Point, bottom_right: Point) -> Self {
        let center = (top_left + bottom_right) / 2.0;
        Self::new(
            center,
            (bottom_right.x - top_left.x).abs(),
            (bottom_right.y - top_left.y).abs(),
            GROUND_TRUTH_CONFIDENCE,
        )
    }

    /// Center of the box.
    pub fn center(&self) -> Point {
        self.center
    }

    /// Horizontal extent.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Vertical extent.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Detection score. Rectangles built from corners carry `1.0`.
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    fn half_size(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Real-valued top-left corner.
    pub fn top_left(&self) -> Point {
        self.center - self.half_size()
    }

    /// Real-valued bottom-right corner.
    pub fn bottom_right(&self) -> Point {
        self.center + self.half_size()
    }

    /// Top-left corner snapped to the first pixel inside the box,
    /// `floor(c) + 1` on each axis.
    ///
    /// Only meant for drawing. Area and overlap math use [`Rectangle::top_left`].
    pub fn top_left_pixel(&self) -> Point {
        let corner = self.top_left();
        Point::new(corner.x.floor() + 1.0, corner.y.floor() + 1.0)
    }

    /// Bottom-right corner snapped outward with `ceil`.
    pub fn bottom_right_pixel(&self) -> Point {
        let corner = self.bottom_right();
        Point::new(corner.x.ceil(), corner.y.ceil())
    }

    /// Left edge, `center.x - width / 2`.
    pub fn xmin(&self) -> f64 {
        self.top_left().x
    }

    /// Top edge, `center.y - height / 2`.
    pub fn ymin(&self) -> f64 {
        self.top_left().y
    }

    /// Right edge, `center.x + width / 2`.
    pub fn xmax(&self) -> f64 {
        self.bottom_right().x
    }

    /// Bottom edge, `center.y + height / 2`.
    pub fn ymax(&self) -> f64 {
        self.bottom_right().y
    }

    /// Calculates the area of the rectangle.
    ///
    /// # Returns
    /// `width * height`, never negative for a valid rectangle
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Tests whether the closed extents of both rectangles overlap.
    ///
    /// Rectangles that only share an edge or a corner intersect.
    ///
    /// # Arguments
    /// * `other` - The rectangle to test against
    ///
    /// # Example
    /// ```
    /// use yolo_core::analysis::{bbox::Rectangle, point::Point};
    /// let left = Rectangle::from_corners(Point::new(0.0, 0.0), Point::new(2.0, 2.0));
    /// let right = Rectangle::from_corners(Point::new(2.0, 0.0), Point::new(4.0, 2.0));
    /// assert!(left.intersects(&right));
    /// assert_eq!(left.intersection_area(&right), 0.0);
    /// ```
    pub fn intersects(&self, other: &Self) -> bool {
        self.xmin() <= other.xmax()
            && self.xmax() >= other.xmin()
            && self.ymin() <= other.ymax()
            && self.ymax() >= other.ymin()
    }

    /// Tests whether `(x, y)` lies strictly inside the rectangle.
    ///
    /// Points on the boundary are outside.
    ///
    /// # Arguments
    /// * `x` - Horizontal coordinate of the point
    /// * `y` - Vertical coordinate of the point
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let top_left = self.top_left();
        let bottom_right = self.bottom_right();

        top_left.x < x && top_left.y < y && bottom_right.x > x && bottom_right.y > y
    }

    /// Tests whether `p` lies in a band of total width `delta` centered on
    /// the boundary.
    ///
    /// The rectangle is grown and shrunk by `delta` in width and height, which
    /// moves each edge by `delta / 2`. A point is on the edge when the grown
    /// rectangle contains it and the shrunk one does not.
    ///
    /// # Arguments
    /// * `p` - The point to test
    /// * `delta` - Total width of the band
    ///
    /// # Example
    /// ```
    /// use yolo_core::analysis::{bbox::Rectangle, point::Point};
    /// let rect = Rectangle::new(Point::new(0.0, 0.0), 4.0, 4.0, 1.0);
    /// assert!(rect.on_edge(&Point::new(2.0, 0.0), 1.0));
    /// assert!(!rect.on_edge(&Point::new(0.0, 0.0), 1.0));
    /// ```
    pub fn on_edge(&self, p: &Point, delta: f64) -> bool {
        let inclusive = Self::new(
            self.center,
            self.width + delta,
            self.height + delta,
            self.confidence,
        );
        let exclusive = Self::new(
            self.center,
            self.width - delta,
            self.height - delta,
            self.confidence,
        );

        inclusive.contains(p.x, p.y) && !exclusive.contains(p.x, p.y)
    }

    /// Area shared by both rectangles, `0.0` when they do not intersect.
    ///
    /// # Arguments
    /// * `other` - The rectangle to intersect with
    ///
    /// # Algorithm
    /// 1. Take the maximum of both top-left corners and the minimum of both
    ///    bottom-right corners, on the real-valued corners
    /// 2. Multiply the width and height of the resulting overlap
    pub fn intersection_area(&self, other: &Self) -> f64 {
        if !self.intersects(other) {
            return 0.0;
        }

        let min = DVec2::from(self.top_left()).max(other.top_left().into());
        let max = DVec2::from(self.bottom_right()).min(other.bottom_right().into());
        let overlap = max - min;

        overlap.x * overlap.y
    }

    /// Area covered by either rectangle.
    ///
    /// # Returns
    /// `area(self) + area(other) - intersection_area`, which is the plain sum
    /// for disjoint rectangles
    pub fn union_area(&self, other: &Self) -> f64 {
        self.area() + other.area() - self.intersection_area(other)
    }

    /// Intersection over union of two rectangles.
    ///
    /// Returns `0.0` when the union area is zero, which happens only for two
    /// empty rectangles. [`Rectangle::checked_iou`] reports that case as an
    /// error instead.
    ///
    /// # Example
    /// ```
    /// use yolo_core::analysis::{bbox::Rectangle, point::Point};
    /// let a = Rectangle::new(Point::new(0.0, 0.0), 1.0, 2.0, 0.5);
    /// let b = Rectangle::new(Point::new(1.0, 1.0), 2.0, 1.0, 0.5);
    /// assert_eq!(a.iou(&b), 1.0 / 15.0);
    /// ```
    pub fn iou(&self, other: &Self) -> f64 {
        self.checked_iou(other).unwrap_or(0.0)
    }

    /// Intersection over union, failing when the union area is zero.
    ///
    /// # Errors
    /// `DegenerateGeometry` for two empty rectangles.
    pub fn checked_iou(&self, other: &Self) -> Result<f64, YoloError> {
        let union_area = self.union_area(other);
        ensure!(union_area > 0.0, DegenerateGeometrySnafu);

        Ok(self.intersection_area(other) / union_area)
    }

    /// Scales the area by `k`, keeping center, aspect ratio and confidence.
    ///
    /// Width and height are each multiplied by `sqrt(|k|)`.
    ///
    /// # Example
    /// ```
    /// use yolo_core::analysis::{bbox::Rectangle, point::Point};
    /// let rect = Rectangle::new(Point::new(1.0, 1.0), 2.0, 3.0, 0.7);
    /// let scaled = rect * 4.0;
    /// assert_eq!(scaled.width(), 4.0);
    /// assert_eq!(scaled.height(), 6.0);
    /// assert_eq!(scaled.area(), rect.area() * 4.0);
    /// ```
    pub fn scale(&self, k: f64) -> Self {
        let factor = k.abs().sqrt();
        Self::new(
            self.center,
            self.width * factor,
            self.height * factor,
            self.confidence,
        )
    }
}

impl Mul<f64> for Rectangle {
    type Output = Rectangle;

    fn mul(self, rhs: f64) -> Self::Output {
        self.scale(rhs)
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {}, {})",
            self.center.x, self.center.y, self.width, self.height, self.confidence
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    //            |
    //          __|__
    //         |  |  |
    //         |  |  |
    // --------|-----|---------->  X
    //         |  |__|_______
    //         |__|__|       |
    //            |__________|
    //            |
    //            v
    //            Y
    fn fixture() -> (Rectangle, Rectangle) {
        (
            Rectangle::new(Point::new(0.0, 0.0), 1.0, 2.0, 0.5),
            Rectangle::new(Point::new(1.0, 1.0), 2.0, 1.0, 0.5),
        )
    }

    #[test]
    fn test_rect_corners() {
        let (bbox1, bbox2) = fixture();
        assert_eq!(bbox1.top_left(), Point::new(-0.5, -1.0));
        assert_eq!(bbox2.top_left(), Point::new(0.0, 0.5));
        assert_eq!(bbox1.bottom_right(), Point::new(0.5, 1.0));
        assert_eq!(bbox2.bottom_right(), Point::new(2.0, 1.5));

        assert_eq!(bbox1.xmin(), -0.5);
        assert_eq!(bbox1.ymin(), -1.0);
        assert_eq!(bbox2.xmax(), 2.0);
        assert_eq!(bbox2.ymax(), 1.5);
    }

    #[test]
    fn test_rect_pixel_corners() {
        let rect = Rectangle::new(Point::new(143.0, 178.0), 48.0, 124.0, 0.1);
        // Real corners (119, 116) and (167, 240)
        assert_eq!(rect.top_left_pixel(), Point::new(120.0, 117.0));
        assert_eq!(rect.bottom_right_pixel(), Point::new(167.0, 240.0));

        let fractional = Rectangle::new(Point::new(10.0, 10.0), 5.0, 3.0, 1.0);
        // Real corners (7.5, 8.5) and (12.5, 11.5)
        assert_eq!(fractional.top_left_pixel(), Point::new(8.0, 9.0));
        assert_eq!(fractional.bottom_right_pixel(), Point::new(13.0, 12.0));

        // Snapping never affects the geometry
        assert_eq!(fractional.area(), 15.0);
    }

    #[test]
    fn test_rect_area() {
        let (bbox1, bbox2) = fixture();
        assert_eq!(bbox1.area(), 2.0);
        assert_eq!(bbox2.area(), 2.0);

        let empty = Rectangle::new(Point::new(3.0, 3.0), 0.0, 5.0, 1.0);
        assert_eq!(empty.area(), 0.0);
    }

    #[test]
    fn test_rect_intersects() {
        let (bbox1, bbox2) = fixture();
        assert!(bbox1.intersects(&bbox2));
        assert!(bbox2.intersects(&bbox1));

        let far = Rectangle::new(Point::new(10.0, 10.0), 1.0, 1.0, 1.0);
        assert!(!bbox1.intersects(&far));
        assert!(!far.intersects(&bbox1));

        // Corner contact counts as intersecting
        let corner = Rectangle::from_corners(Point::new(0.5, 1.0), Point::new(1.5, 2.0));
        assert!(bbox1.intersects(&corner));
        assert!(corner.intersects(&bbox1));
    }

    #[test]
    fn test_rect_union_area() {
        let (bbox1, bbox2) = fixture();
        assert_eq!(bbox1.union_area(&bbox2), 2.0 + 2.0 - 1.0 / 4.0);
        assert_eq!(bbox2.union_area(&bbox1), 2.0 + 2.0 - 1.0 / 4.0);
    }

    #[test]
    fn test_rect_intersection_area() {
        let (bbox1, bbox2) = fixture();
        assert_eq!(bbox1.intersection_area(&bbox2), 1.0 / 4.0);
        assert_eq!(bbox2.intersection_area(&bbox1), 1.0 / 4.0);

        // Containment
        let outer = Rectangle::from_corners(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        let inner = Rectangle::from_corners(Point::new(2.0, 3.0), Point::new(5.0, 7.0));
        assert_eq!(outer.intersection_area(&inner), 12.0);
        assert_eq!(inner.intersection_area(&outer), 12.0);
    }

    #[test]
    fn test_rect_iou() {
        let (bbox1, bbox2) = fixture();
        assert_eq!(bbox1.iou(&bbox2), 1.0 / 15.0);
        assert_eq!(bbox2.iou(&bbox1), 1.0 / 15.0);

        let a = Rectangle::from_corners(Point::new(0.0, 0.0), Point::new(4.0, 4.0));
        let b = Rectangle::from_corners(Point::new(2.0, 2.0), Point::new(6.0, 6.0));
        assert!((a.iou(&b) - 4.0 / 28.0).abs() < 1e-12);
    }

    #[test]
    fn test_rect_self_overlap() {
        let rects = [
            fixture().0,
            fixture().1,
            Rectangle::new(Point::new(-3.25, 7.5), 0.75, 12.0, 0.9),
            Rectangle::new(Point::new(338.0, 236.0), 297.0, 241.0, 0.1),
        ];

        for rect in rects {
            assert_eq!(rect.intersection_area(&rect), rect.area());
            assert_eq!(rect.union_area(&rect), rect.area());
            assert_eq!(rect.iou(&rect), 1.0);
        }
    }

    #[test]
    fn test_rect_disjoint() {
        let a = Rectangle::new(Point::new(0.0, 0.0), 2.0, 2.0, 1.0);
        let b = Rectangle::new(Point::new(5.0, -5.0), 3.0, 1.0, 1.0);

        assert!(!a.intersects(&b));
        assert_eq!(a.intersection_area(&b), 0.0);
        assert_eq!(b.intersection_area(&a), 0.0);
        assert_eq!(a.union_area(&b), a.area() + b.area());
        assert_eq!(b.union_area(&a), a.area() + b.area());
        assert_eq!(a.iou(&b), 0.0);
    }

    #[test]
    fn test_rect_degenerate_iou() {
        let p1 = Rectangle::new(Point::new(0.0, 0.0), 0.0, 0.0, 1.0);
        let p2 = Rectangle::new(Point::new(3.0, 3.0), 0.0, 0.0, 1.0);

        assert_eq!(p1.union_area(&p2), 0.0);
        assert_eq!(p1.iou(&p2), 0.0);
        assert!(matches!(
            p1.checked_iou(&p2),
            Err(YoloError::DegenerateGeometry)
        ));

        // Coincident empty rectangles are degenerate as well
        assert_eq!(p1.iou(&p1), 0.0);
        assert!(p1.checked_iou(&p1).is_err());

        // A single empty rectangle still has a defined IoU
        let full = Rectangle::new(Point::new(0.0, 0.0), 2.0, 2.0, 1.0);
        assert_eq!(full.checked_iou(&p1).unwrap(), 0.0);
    }

    #[test]
    fn test_rect_contains_is_open() {
        let rect = Rectangle::from_corners(Point::new(0.0, 0.0), Point::new(4.0, 2.0));

        assert!(rect.contains(2.0, 1.0));
        assert!(rect.contains(0.001, 1.999));
        // Boundary points are excluded
        assert!(!rect.contains(0.0, 1.0));
        assert!(!rect.contains(4.0, 1.0));
        assert!(!rect.contains(2.0, 0.0));
        assert!(!rect.contains(2.0, 2.0));
        assert!(!rect.contains(5.0, 1.0));
    }

    #[test]
    fn test_rect_on_edge() {
        // Edges at -2 and 2 on both axes; delta 1 gives a band from 1.5 to 2.5
        let rect = Rectangle::new(Point::new(0.0, 0.0), 4.0, 4.0, 1.0);

        assert!(rect.on_edge(&Point::new(2.0, 0.0), 1.0));
        assert!(rect.on_edge(&Point::new(0.0, -2.4), 1.0));
        assert!(rect.on_edge(&Point::new(1.6, 0.0), 1.0));
        assert!(rect.on_edge(&Point::new(2.0, 2.0), 1.0));
        assert!(!rect.on_edge(&Point::new(1.4, 0.0), 1.0));
        assert!(!rect.on_edge(&Point::new(2.6, 0.0), 1.0));
        assert!(!rect.on_edge(&Point::new(0.0, 0.0), 1.0));

        // A delta wider than the box makes the whole interior an edge
        assert!(rect.on_edge(&Point::new(0.0, 0.0), 10.0));
    }

    #[test]
    fn test_rect_from_corners() {
        let rect = Rectangle::from_corners(Point::new(0.0, 0.0), Point::new(4.0, 2.0));
        assert_eq!(rect.center(), Point::new(2.0, 1.0));
        assert_eq!(rect.width(), 4.0);
        assert_eq!(rect.height(), 2.0);
        assert_eq!(rect.confidence(), 1.0);

        // Swapped corners produce the same rectangle
        let swapped = Rectangle::from_corners(Point::new(4.0, 2.0), Point::new(0.0, 0.0));
        assert_eq!(swapped, rect);
    }

    #[test]
    fn test_rect_scale() {
        let rect = Rectangle::new(Point::new(5.0, -1.0), 2.0, 3.0, 0.25);

        let scaled = rect.scale(4.0);
        assert_eq!(scaled.width(), 4.0);
        assert_eq!(scaled.height(), 6.0);
        assert_eq!(scaled.center(), rect.center());
        assert_eq!(scaled.confidence(), 0.25);

        assert_eq!(rect * 4.0, scaled);
        // Only the magnitude of the factor matters
        assert_eq!(rect * -4.0, scaled);
        assert_eq!(rect * 0.0, Rectangle::new(rect.center(), 0.0, 0.0, 0.25));
    }

    #[test]
    fn test_rect_try_new() {
        assert!(Rectangle::try_new(Point::new(0.0, 0.0), 1.0, 1.0, 0.5).is_ok());
        assert!(Rectangle::try_new(Point::new(0.0, 0.0), 0.0, 0.0, 0.5).is_ok());
        assert!(matches!(
            Rectangle::try_new(Point::new(0.0, 0.0), -1.0, 1.0, 0.5),
            Err(YoloError::InvalidDimension { .. })
        ));
        assert!(Rectangle::try_new(Point::new(0.0, 0.0), 1.0, f64::NAN, 0.5).is_err());
        assert!(Rectangle::try_new(Point::new(0.0, 0.0), f64::INFINITY, 1.0, 0.5).is_err());

        // The unchecked constructor keeps negative sizes as given
        let inverted = Rectangle::new(Point::new(0.0, 0.0), -2.0, 2.0, 1.0);
        assert_eq!(inverted.width(), -2.0);
    }

    #[test]
    fn test_rect_equality_and_display() {
        let (bbox1, _) = fixture();
        assert_eq!(bbox1, Rectangle::new(Point::new(0.0, 0.0), 1.0, 2.0, 0.5));
        assert_ne!(bbox1, Rectangle::new(Point::new(0.0, 0.0), 1.0, 2.0, 0.6));
        assert_eq!(bbox1.to_string(), "(0, 0, 1, 2, 0.5)");
    }
}
