use glam::{DVec2, IVec2};

use crate::core::Color;
use crate::pipeline::buffer::Buffer;

/// Fill a triangle given in integer pixel coordinates, edges included.
///
/// Winding doesn't matter. Zero area triangles paint nothing. Projected
/// points can be far off screen, so edge functions run in i128.
pub fn fill_triangle<B: Buffer>(buf: &mut B, pts: [IVec2; 3], color: Color) {
    let (width, height) = (buf.width() as i64, buf.height() as i64);
    if width == 0 || height == 0 {
        return;
    }

    let mut edges = [
        Edge::new(pts[1], pts[2]),
        Edge::new(pts[2], pts[0]),
        Edge::new(pts[0], pts[1]),
    ];
    let area = edges[0].eval(pts[0].x as i128, pts[0].y as i128);
    if area == 0 {
        return;
    }
    if area < 0 {
        for e in &mut edges {
            e.flip();
        }
    }

    let min_x = pts.iter().map(|p| p.x as i64).min().unwrap_or(0).max(0);
    let max_x = pts.iter().map(|p| p.x as i64).max().unwrap_or(-1).min(width - 1);
    let min_y = pts.iter().map(|p| p.y as i64).min().unwrap_or(0).max(0);
    let max_y = pts.iter().map(|p| p.y as i64).max().unwrap_or(-1).min(height - 1);
    if min_x > max_x || min_y > max_y {
        return;
    }

    for y in min_y..=max_y {
        let mut w = edges.map(|e| e.eval(min_x as i128, y as i128));
        let mut span: Option<(i64, i64)> = None;

        for x in min_x..=max_x {
            if w.iter().all(|&v| v >= 0) {
                span = Some(match span {
                    Some((start, _)) => (start, x),
                    None => (x, x),
                });
            } else if span.is_some() {
                // a triangle covers one contiguous run per row
                break;
            }
            for (v, e) in w.iter_mut().zip(edges.iter()) {
                *v += e.step_x;
            }
        }

        if let Some((x0, x1)) = span {
            buf.fill_span(y as usize, x0 as usize, x1 as usize, color);
        }
    }
}

/// `w(x, y) = step_x * x + step_y * y + c`, positive on the inner side of a
/// counter-clockwise edge.
#[derive(Debug, Clone, Copy)]
struct Edge {
    step_x: i128,
    step_y: i128,
    c: i128,
}

impl Edge {
    fn new(a: IVec2, b: IVec2) -> Self {
        let (ax, ay, bx, by) = (a.x as i128, a.y as i128, b.x as i128, b.y as i128);
        Self {
            step_x: ay - by,
            step_y: bx - ax,
            c: (by - ay) * ax - (bx - ax) * ay,
        }
    }

    fn eval(&self, x: i128, y: i128) -> i128 {
        self.step_x * x + self.step_y * y + self.c
    }

    fn flip(&mut self) {
        self.step_x = -self.step_x;
        self.step_y = -self.step_y;
        self.c = -self.c;
    }
}

/// Closed outline through `pts`.
pub fn draw_polygon_outline<B: Buffer>(buf: &mut B, pts: &[IVec2], color: Color) {
    for (i, &start) in pts.iter().enumerate() {
        let end = pts[(i + 1) % pts.len()];
        draw_line(buf, start, end, color);
    }
}

/// Line between two pixel positions, clipped to the buffer first so far off
/// screen endpoints stay cheap.
pub fn draw_line<B: Buffer>(buf: &mut B, start: IVec2, end: IVec2, color: Color) {
    let bounds = DVec2::new(buf.width() as f64 - 1.0, buf.height() as f64 - 1.0);
    let Some((a, b)) = clip_line(start.as_dvec2(), end.as_dvec2(), bounds) else {
        return;
    };

    bresenham(a.round().as_ivec2(), b.round().as_ivec2(), |p| {
        if p.x >= 0 && p.y >= 0 {
            buf.set_pixel(p.x as usize, p.y as usize, color);
        }
    });
}

/// Liang-Barsky clip of `a -> b` against `[0, max.x] x [0, max.y]`.
/// Runs in f64 so endpoints near the i32 limits keep pixel precision.
pub fn clip_line(a: DVec2, b: DVec2, max: DVec2) -> Option<(DVec2, DVec2)> {
    if max.x < 0.0 || max.y < 0.0 {
        return None;
    }
    let d = b - a;
    let mut t0 = 0.0f64;
    let mut t1 = 1.0f64;

    for (p, q) in [
        (-d.x, a.x),
        (d.x, max.x - a.x),
        (-d.y, a.y),
        (d.y, max.y - a.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            if t > t1 {
                return None;
            }
            t0 = t0.max(t);
        } else {
            if t < t0 {
                return None;
            }
            t1 = t1.min(t);
        }
    }

    Some((a + d * t0, a + d * t1))
}

pub fn bresenham<F>(start: IVec2, end: IVec2, mut plot: F)
where
    F: FnMut(IVec2),
{
    let (mut x0, mut y0) = (start.x, start.y);
    let (x1, y1) = (end.x, end.y);

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        plot(IVec2::new(x0, y0));

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
