//! In-place drawing: lines, rectangles, circles, fills.
//!
//! The only mutating operations on [`Image`] besides `fill`/`reset`.
//! Colors are per-channel `f64` slices (BGR for 3-channel images, see
//! [`color`](crate::color)); missing entries read as 0, values clamp to
//! `[0, 255]`.

use crate::image::Image;
use iris_core::{Point, Rect};

impl Image {
    fn color_bytes(&self, color: &[f64]) -> Vec<u8> {
        (0..self.channels() as usize)
            .map(|ch| {
                color
                    .get(ch)
                    .copied()
                    .unwrap_or(0.0)
                    .round()
                    .clamp(0.0, 255.0) as u8
            })
            .collect()
    }

    /// Set one pixel, ignoring out-of-bounds coordinates.
    fn put(&mut self, x: i32, y: i32, color: &[u8]) {
        if x < 0 || y < 0 || x >= self.width() as i32 || y >= self.height() as i32 {
            return;
        }
        let c = self.channels() as usize;
        let w = self.width() as usize;
        let idx = (y as usize * w + x as usize) * c;
        self.bytes_mut()[idx..idx + c].copy_from_slice(color);
    }

    /// Square stamp of side `thickness` centered on `(x, y)`.
    fn put_thick(&mut self, x: i32, y: i32, color: &[u8], thickness: i32) {
        if thickness <= 1 {
            self.put(x, y, color);
            return;
        }
        let lo = -(thickness - 1) / 2;
        let hi = thickness / 2;
        for dy in lo..=hi {
            for dx in lo..=hi {
                self.put(x + dx, y + dy, color);
            }
        }
    }

    /// Fill a clipped region, inclusive-exclusive on both axes.
    fn fill_span(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: &[u8]) {
        let x0 = x0.max(0);
        let y0 = y0.max(0);
        let x1 = x1.min(self.width() as i32);
        let y1 = y1.min(self.height() as i32);
        let c = self.channels() as usize;
        let w = self.width() as usize;
        let bytes = self.bytes_mut();
        for y in y0..y1 {
            for x in x0..x1 {
                let idx = (y as usize * w + x as usize) * c;
                bytes[idx..idx + c].copy_from_slice(color);
            }
        }
    }

    /// Bresenham line from `p1` to `p2`.
    pub fn draw_line(&mut self, p1: Point<i32>, p2: Point<i32>, color: &[f64], thickness: i32) {
        let color = self.color_bytes(color);
        let (mut x, mut y) = (p1.x, p1.y);
        let dx = (p2.x - p1.x).abs();
        let dy = -(p2.y - p1.y).abs();
        let sx = if p1.x < p2.x { 1 } else { -1 };
        let sy = if p1.y < p2.y { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.put_thick(x, y, &color, thickness);
            if x == p2.x && y == p2.y {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Rectangle outline, stroke drawn just inside the rectangle.
    pub fn draw_rect(&mut self, rect: Rect<i32>, color: &[f64], thickness: i32) {
        let color = self.color_bytes(color);
        let t = thickness.max(1);
        let (x0, y0) = (rect.x, rect.y);
        let (x1, y1) = (rect.x + rect.width, rect.y + rect.height);
        // top, bottom, left, right strips
        self.fill_span(x0, y0, x1, y0 + t, &color);
        self.fill_span(x0, y1 - t, x1, y1, &color);
        self.fill_span(x0, y0, x0 + t, y1, &color);
        self.fill_span(x1 - t, y0, x1, y1, &color);
    }

    /// Circle outline of the given radius; a negative thickness fills
    /// the disk.
    pub fn draw_circle(
        &mut self,
        center: Point<i32>,
        radius: i32,
        color: &[f64],
        thickness: i32,
    ) {
        let color = self.color_bytes(color);
        let r = radius as f64;
        let filled = thickness < 0;
        let half = (thickness.max(1) as f64 / 2.0).max(0.5);

        let reach = radius + thickness.abs().max(1);
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                let d = ((dx * dx + dy * dy) as f64).sqrt();
                let hit = if filled {
                    d <= r + 0.5
                } else {
                    (d - r).abs() <= half
                };
                if hit {
                    self.put(center.x + dx, center.y + dy, &color);
                }
            }
        }
    }

    /// Fill a rectangle with a solid color (clipped to the image).
    pub fn fill_rect(&mut self, rect: Rect<i32>, color: &[f64]) {
        let color = self.color_bytes(color);
        self.fill_span(
            rect.x,
            rect.y,
            rect.x + rect.width,
            rect.y + rect.height,
            &color,
        );
    }
}
