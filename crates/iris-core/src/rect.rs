//! Axis-aligned rectangle: containment, intersection, union, IoU and the
//! derived shapes detection pipelines need (safe clip, centered square).

use crate::point::Point;
use crate::transform::TransformMatrix;
use crate::vec::Coord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-left origin plus size.
///
/// Degenerate rectangles (`width <= 0` or `height <= 0`) are valid,
/// representable values; `intersect` produces them for disjoint inputs.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect<T> {
    pub x: T,
    pub y: T,
    pub width: T,
    pub height: T,
}

pub type Rect2i = Rect<i32>;
pub type Rect2f = Rect<f32>;
pub type Rect2d = Rect<f64>;

fn min_t<T: PartialOrd>(a: T, b: T) -> T {
    if b < a {
        b
    } else {
        a
    }
}

fn max_t<T: PartialOrd>(a: T, b: T) -> T {
    if b > a {
        b
    } else {
        a
    }
}

impl<T: Coord> Rect<T> {
    pub fn new(x: T, y: T, width: T, height: T) -> Self {
        Self { x, y, width, height }
    }

    /// Build from two corner points. `top_left()`/`bottom_right()` on the
    /// result return the original corners exactly.
    pub fn from_corners(top_left: Point<T>, bottom_right: Point<T>) -> Self {
        Self {
            x: top_left.x,
            y: top_left.y,
            width: bottom_right.x - top_left.x,
            height: bottom_right.y - top_left.y,
        }
    }

    /// Convert to another scalar type with `as`-cast semantics.
    pub fn cast<U: Coord>(self) -> Rect<U> {
        Rect {
            x: U::from_f64(self.x.into()),
            y: U::from_f64(self.y.into()),
            width: U::from_f64(self.width.into()),
            height: U::from_f64(self.height.into()),
        }
    }

    pub fn top_left(&self) -> Point<T> {
        Point::new(self.x, self.y)
    }

    pub fn top_right(&self) -> Point<T> {
        Point::new(self.x + self.width, self.y)
    }

    pub fn bottom_left(&self) -> Point<T> {
        Point::new(self.x, self.y + self.height)
    }

    pub fn bottom_right(&self) -> Point<T> {
        Point::new(self.x + self.width, self.y + self.height)
    }

    pub fn center(&self) -> Point<T> {
        let two = T::one() + T::one();
        Point::new(self.x + self.width / two, self.y + self.height / two)
    }

    /// The four corners, clockwise from top-left.
    pub fn vertices(&self) -> [Point<T>; 4] {
        [
            self.top_left(),
            self.top_right(),
            self.bottom_right(),
            self.bottom_left(),
        ]
    }

    pub fn area(&self) -> T {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= T::zero() || self.height <= T::zero()
    }

    /// Closed-interval containment: points on the boundary count.
    pub fn contains_point(&self, p: &Point<T>) -> bool {
        p.x >= self.x
            && p.y >= self.y
            && p.x <= self.x + self.width
            && p.y <= self.y + self.height
    }

    /// Full containment on all four sides; boundary-touching counts.
    pub fn contains_rect(&self, other: &Rect<T>) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.x + other.width <= self.x + self.width
            && other.y + other.height <= self.y + self.height
    }

    /// Intersection. Disjoint inputs yield `width <= 0` or `height <= 0`
    /// (an empty rectangle, not an error).
    pub fn intersect(&self, other: &Rect<T>) -> Rect<T> {
        let x1 = max_t(self.x, other.x);
        let y1 = max_t(self.y, other.y);
        let x2 = min_t(self.x + self.width, other.x + other.width);
        let y2 = min_t(self.y + self.height, other.y + other.height);
        Rect::new(x1, y1, x2 - x1, y2 - y1)
    }

    /// Bounding rectangle of both.
    pub fn union(&self, other: &Rect<T>) -> Rect<T> {
        let x1 = min_t(self.x, other.x);
        let y1 = min_t(self.y, other.y);
        let x2 = max_t(self.x + self.width, other.x + other.width);
        let y2 = max_t(self.y + self.height, other.y + other.height);
        Rect::new(x1, y1, x2 - x1, y2 - y1)
    }

    /// Intersection over union, in `[0, 1]`. Zero for disjoint inputs.
    pub fn iou(&self, other: &Rect<T>) -> f64 {
        let inter = self.intersect(other);
        if inter.is_empty() {
            return 0.0;
        }
        let inter_area: f64 = inter.width.into() * inter.height.into();
        let area_a: f64 = self.width.into() * self.height.into();
        let area_b: f64 = other.width.into() * other.height.into();
        let union_area = area_a + area_b - inter_area;
        if union_area > 0.0 {
            inter_area / union_area
        } else {
            0.0
        }
    }

    /// Scale position and size in place (coordinate-space rescale).
    pub fn scale(&mut self, sx: T, sy: T) {
        self.x = self.x * sx;
        self.y = self.y * sy;
        self.width = self.width * sx;
        self.height = self.height * sy;
    }

    pub fn translate(&mut self, dx: T, dy: T) {
        self.x = self.x + dx;
        self.y = self.y + dy;
    }

    /// Square with the same center and side `scale * max(width, height)`.
    pub fn square(&self, scale: f32) -> Rect<T> {
        let w: f64 = self.width.into();
        let h: f64 = self.height.into();
        let side = scale as f64 * w.max(h);
        let cx: f64 = self.x.into() + w / 2.0;
        let cy: f64 = self.y.into() + h / 2.0;
        Rect::new(
            T::from_f64(cx - side / 2.0),
            T::from_f64(cy - side / 2.0),
            T::from_f64(side),
            T::from_f64(side),
        )
    }

    /// Clip to `[0, width) x [0, height)`. The result never extends past
    /// the given bounds; use before any pixel access.
    pub fn safe_rect(&self, width: T, height: T) -> Rect<T> {
        let x1 = max_t(self.x, T::zero());
        let y1 = max_t(self.y, T::zero());
        let x2 = min_t(self.x + self.width, width);
        let y2 = min_t(self.y + self.height, height);
        Rect::new(
            x1,
            y1,
            max_t(x2 - x1, T::zero()),
            max_t(y2 - y1, T::zero()),
        )
    }
}

impl<T: fmt::Display> fmt::Display for Rect<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} {} {}x{}]",
            self.x, self.y, self.width, self.height
        )
    }
}

/// Axis-aligned bounding rectangle of a point set. Returns the zero
/// rectangle for an empty slice.
pub fn min_bounding_rect<T: Coord>(points: &[Point<T>]) -> Rect<T> {
    let Some(first) = points.first() else {
        return Rect::default();
    };
    let mut min_x = first.x;
    let mut min_y = first.y;
    let mut max_x = first.x;
    let mut max_y = first.y;
    for p in &points[1..] {
        min_x = min_t(min_x, p.x);
        min_y = min_t(min_y, p.y);
        max_x = max_t(max_x, p.x);
        max_y = max_t(max_y, p.y);
    }
    Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
}

/// Transform a rectangle's four corners and return their bounding box.
///
/// A transformed rectangle is generally not axis-aligned, so the output
/// is the bounding box of the transformed corners.
pub fn apply_transform_to_rect<T: Coord>(
    rect: &Rect<T>,
    transform: &TransformMatrix,
) -> Rect<T> {
    let corners = rect.vertices();
    let transformed: Vec<Point<T>> =
        corners.iter().map(|p| transform.transform_point(*p)).collect();
    min_bounding_rect(&transformed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_from_corners_roundtrip() {
        let tl = Point::new(3, 4);
        let br = Point::new(10, 20);
        let r = Rect::from_corners(tl, br);
        assert_eq!(r.top_left(), tl);
        assert_eq!(r.bottom_right(), br);
    }

    #[test]
    fn test_corners_and_center() {
        let r = Rect::new(0, 0, 10, 20);
        assert_eq!(r.top_right(), Point::new(10, 0));
        assert_eq!(r.bottom_left(), Point::new(0, 20));
        assert_eq!(r.center(), Point::new(5, 10));
        assert_eq!(r.vertices()[2], Point::new(10, 20));
    }

    #[test]
    fn test_contains_boundary_counts() {
        let r = Rect::new(0, 0, 10, 10);
        assert!(r.contains_point(&Point::new(0, 0)));
        assert!(r.contains_point(&Point::new(10, 10)));
        assert!(!r.contains_point(&Point::new(11, 5)));
        assert!(r.contains_rect(&Rect::new(0, 0, 10, 10)));
        assert!(r.contains_rect(&Rect::new(2, 2, 8, 8)));
        assert!(!r.contains_rect(&Rect::new(2, 2, 9, 8)));
    }

    #[test]
    fn test_intersect_union_iou_scenario() {
        // Rect(0,0,10,10) vs Rect(5,5,10,10): intersection (5,5,5,5),
        // union area 175, IoU 25/175.
        let a = Rect::new(0.0f64, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0f64, 5.0, 10.0, 10.0);
        let inter = a.intersect(&b);
        assert_eq!(inter, Rect::new(5.0, 5.0, 5.0, 5.0));
        let union_area = a.area() + b.area() - inter.area();
        assert!((union_area - 175.0).abs() < 1e-9);
        assert!((a.iou(&b) - 25.0 / 175.0).abs() < 1e-9);
    }

    #[test]
    fn test_iou_bounds_and_identities() {
        let a = Rect::new(0.0f64, 0.0, 4.0, 4.0);
        assert!((a.iou(&a) - 1.0).abs() < 1e-9);
        let disjoint = Rect::new(100.0, 100.0, 4.0, 4.0);
        assert_eq!(a.iou(&disjoint), 0.0);
    }

    #[test]
    fn test_intersect_area_bounded_randomized() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let a = Rect::new(
                rng.gen_range(-50.0f64..50.0),
                rng.gen_range(-50.0..50.0),
                rng.gen_range(0.0..40.0),
                rng.gen_range(0.0..40.0),
            );
            let b = Rect::new(
                rng.gen_range(-50.0f64..50.0),
                rng.gen_range(-50.0..50.0),
                rng.gen_range(0.0..40.0),
                rng.gen_range(0.0..40.0),
            );
            let inter = a.intersect(&b);
            if !inter.is_empty() {
                assert!(inter.area() <= a.area().min(b.area()) + 1e-9);
            }
            let iou = a.iou(&b);
            assert!((0.0..=1.0 + 1e-9).contains(&iou), "iou out of range: {iou}");
        }
    }

    #[test]
    fn test_empty_intersection_is_value_not_error() {
        let a = Rect::new(0, 0, 5, 5);
        let b = Rect::new(10, 10, 5, 5);
        let inter = a.intersect(&b);
        assert!(inter.is_empty());
        assert!(inter.width <= 0);
    }

    #[test]
    fn test_square_preserves_center() {
        let r = Rect::new(10.0f32, 20.0, 30.0, 10.0);
        let sq = r.square(1.0);
        assert_eq!(sq.width, 30.0);
        assert_eq!(sq.height, 30.0);
        assert!((sq.center().x - r.center().x).abs() < 1e-4);
        assert!((sq.center().y - r.center().y).abs() < 1e-4);

        let scaled = r.square(2.0);
        assert_eq!(scaled.width, 60.0);
    }

    #[test]
    fn test_safe_rect_clips() {
        let r = Rect::new(-5, -5, 20, 20);
        let safe = r.safe_rect(12, 10);
        assert_eq!(safe, Rect::new(0, 0, 12, 10));

        // fully outside
        let out = Rect::new(50, 50, 5, 5).safe_rect(12, 10);
        assert!(out.is_empty());
    }

    #[test]
    fn test_scale_and_translate() {
        let mut r = Rect::new(2.0f64, 3.0, 4.0, 5.0);
        r.scale(2.0, 10.0);
        assert_eq!(r, Rect::new(4.0, 30.0, 8.0, 50.0));
        r.translate(-4.0, -30.0);
        assert_eq!(r, Rect::new(0.0, 0.0, 8.0, 50.0));
    }

    #[test]
    fn test_min_bounding_rect() {
        let pts = vec![
            Point::new(3, 7),
            Point::new(-2, 4),
            Point::new(5, -1),
        ];
        let r = min_bounding_rect(&pts);
        assert_eq!(r, Rect::new(-2, -1, 7, 8));
        assert_eq!(min_bounding_rect::<i32>(&[]), Rect::default());
    }

    #[test]
    fn test_apply_transform_to_rect_rotation() {
        // 90° rotation maps [0,0,4,2] onto x in [-2,0], y in [0,4]
        let r = Rect::new(0.0f32, 0.0, 4.0, 2.0);
        let out = apply_transform_to_rect(&r, &TransformMatrix::rotation_90());
        assert!((out.x + 2.0).abs() < 1e-5);
        assert!(out.y.abs() < 1e-5);
        assert!((out.width - 2.0).abs() < 1e-5);
        assert!((out.height - 4.0).abs() < 1e-5);
    }
}
