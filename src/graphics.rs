use crate::frame::Primitive;
use crate::math::edge_function;
use crate::vertex::{Color, Vertex};
use serde::Deserialize;

/// Clipping planes of the fixed orthographic view
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct OrthoVolume {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
}

impl Default for OrthoVolume {
    fn default() -> Self {
        OrthoVolume {
            left: -1.2,
            right: 1.2,
            bottom: -0.6,
            top: 2.0,
        }
    }
}

/// Maps world coordinates onto a pixel grid
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub volume: OrthoVolume,
    pub width: usize,
    pub height: usize,
    /// Window height the stroke widths were tuned for
    pub reference_height: f64,
}

impl Viewport {
    pub fn new(volume: OrthoVolume, width: usize, height: usize, reference_height: f64) -> Self {
        Viewport {
            volume,
            width,
            height,
            reference_height,
        }
    }

    /// World position to continuous pixel coordinates, y pointing down
    pub fn to_screen(&self, vertex: &Vertex) -> [f64; 2] {
        let v = &self.volume;
        [
            (vertex.x() - v.left) / (v.right - v.left) * self.width as f64,
            (v.top - vertex.y()) / (v.top - v.bottom) * self.height as f64,
        ]
    }

    /// Stroke width in device pixels, never thinner than one
    pub fn stroke_pixels(&self, width: f64) -> usize {
        let scaled = width * self.height as f64 / self.reference_height.max(1.0);
        (scaled.round() as usize).max(1)
    }
}

/// RGBA pixel buffer
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        PixelBuffer {
            width,
            height,
            data: vec![0u8; width * height * 4],
        }
    }

    pub fn clear(&mut self, color: Color) {
        let (r, g, b) = color.as_rgb8();
        for pixel in self.data.chunks_exact_mut(4) {
            pixel.copy_from_slice(&[r, g, b, 255]);
        }
    }

    /// Writes one pixel; out-of-bounds coordinates are clipped
    pub fn put(&mut self, x: isize, y: isize, color: Color) {
        if x < 0 || y < 0 || x >= self.width as isize || y >= self.height as isize {
            return;
        }
        let offset = (y as usize * self.width + x as usize) * 4;
        let (r, g, b) = color.as_rgb8();
        self.data[offset..offset + 4].copy_from_slice(&[r, g, b, 255]);
    }

    pub fn get(&self, x: usize, y: usize) -> (u8, u8, u8) {
        let offset = (y * self.width + x) * 4;
        (self.data[offset], self.data[offset + 1], self.data[offset + 2])
    }
}

/// Text placed at a pixel position, left to the host to draw
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    pub x: usize,
    pub y: usize,
    pub text: String,
    pub color: Color,
}

#[derive(Clone, Debug)]
pub struct RenderedFrame {
    pub pixels: PixelBuffer,
    pub labels: Vec<Label>,
}

/// Rasterizes a display list back to front
pub fn render(primitives: &[Primitive], viewport: &Viewport, background: Color) -> RenderedFrame {
    let mut pixels = PixelBuffer::new(viewport.width, viewport.height);
    pixels.clear(background);
    let mut labels = Vec::new();
    if viewport.width == 0 || viewport.height == 0 {
        return RenderedFrame { pixels, labels };
    }

    let screen = |vertices: &[Vertex]| -> Vec<[f64; 2]> {
        vertices.iter().map(|v| viewport.to_screen(v)).collect()
    };

    for primitive in primitives {
        match primitive {
            Primitive::Polygon { vertices, color } | Primitive::TriangleFan { vertices, color } => {
                fill_fan(&screen(vertices), &mut pixels, *color);
            }
            Primitive::Quad { vertices, color } => {
                fill_fan(&screen(vertices), &mut pixels, *color);
            }
            Primitive::LineLoop {
                vertices,
                color,
                width,
            } => {
                let points = screen(vertices);
                let thickness = viewport.stroke_pixels(*width);
                stroke_polyline(&points, true, &mut pixels, *color, thickness);
            }
            Primitive::LineStrip {
                vertices,
                color,
                width,
            } => {
                let points = screen(vertices);
                let thickness = viewport.stroke_pixels(*width);
                stroke_polyline(&points, false, &mut pixels, *color, thickness);
            }
            Primitive::Line {
                from,
                to,
                color,
                width,
            } => {
                let (a, b) = (viewport.to_screen(from), viewport.to_screen(to));
                let thickness = viewport.stroke_pixels(*width);
                draw_line(a[0], a[1], b[0], b[1], &mut pixels, *color, thickness);
            }
            Primitive::Text {
                anchor,
                text,
                color,
            } => {
                let [x, y] = viewport.to_screen(anchor);
                if (0.0..viewport.width as f64).contains(&x)
                    && (0.0..viewport.height as f64).contains(&y)
                {
                    labels.push(Label {
                        x: x as usize,
                        y: y as usize,
                        text: text.clone(),
                        color: *color,
                    });
                }
            }
        }
    }

    RenderedFrame { pixels, labels }
}

/// Fills a convex polygon as a triangle fan anchored at the first point
fn fill_fan(points: &[[f64; 2]], pixels: &mut PixelBuffer, color: Color) {
    if points.len() < 3 {
        return;
    }
    for pair in points[1..].windows(2) {
        fill_triangle(&points[0], &pair[0], &pair[1], pixels, color);
    }
}

/// Fills a triangle of either winding, sampling at pixel centers
pub fn fill_triangle(
    v0: &[f64; 2],
    v1: &[f64; 2],
    v2: &[f64; 2],
    pixels: &mut PixelBuffer,
    color: Color,
) {
    // Precompute area of the triangle
    let area = edge_function(v0, v1, v2);
    if area == 0.0 {
        return;
    }

    // Compute bounding box of the triangle
    let min_x = v0[0].min(v1[0]).min(v2[0]).floor().max(0.0) as usize;
    let max_x = v0[0]
        .max(v1[0])
        .max(v2[0])
        .ceil()
        .min(pixels.width as f64 - 1.0);
    let min_y = v0[1].min(v1[1]).min(v2[1]).floor().max(0.0) as usize;
    let max_y = v0[1]
        .max(v1[1])
        .max(v2[1])
        .ceil()
        .min(pixels.height as f64 - 1.0);
    if max_x < 0.0 || max_y < 0.0 {
        return;
    }

    for y in min_y..=max_y as usize {
        for x in min_x..=max_x as usize {
            let p = [x as f64 + 0.5, y as f64 + 0.5];

            let w0 = edge_function(v1, v2, &p) / area;
            let w1 = edge_function(v2, v0, &p) / area;
            let w2 = edge_function(v0, v1, &p) / area;

            if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                pixels.put(x as isize, y as isize, color);
            }
        }
    }
}

fn stroke_polyline(
    points: &[[f64; 2]],
    closed: bool,
    pixels: &mut PixelBuffer,
    color: Color,
    thickness: usize,
) {
    match points {
        [] => {}
        [only] => draw_line(only[0], only[1], only[0], only[1], pixels, color, thickness),
        _ => {
            for pair in points.windows(2) {
                draw_line(pair[0][0], pair[0][1], pair[1][0], pair[1][1], pixels, color, thickness);
            }
            if closed {
                let (first, last) = (points[0], points[points.len() - 1]);
                draw_line(last[0], last[1], first[0], first[1], pixels, color, thickness);
            }
        }
    }
}

/// Clips a segment to the box `[min, max]` (Liang-Barsky). Returns `None` when
/// nothing of it lies inside or its coordinates are not finite.
fn clip_segment(
    a: [f64; 2],
    b: [f64; 2],
    min: [f64; 2],
    max: [f64; 2],
) -> Option<([f64; 2], [f64; 2])> {
    let delta = [b[0] - a[0], b[1] - a[1]];
    if !a.iter().chain(&b).chain(&delta).all(|c| c.is_finite()) {
        return None;
    }
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for axis in 0..2 {
        for (p, q) in [
            (-delta[axis], a[axis] - min[axis]),
            (delta[axis], max[axis] - a[axis]),
        ] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }
    }
    let at = |t: f64| [a[0] + t * delta[0], a[1] + t * delta[1]];
    Some((at(t0), at(t1)))
}

/// Draws a line between two points using Bresenham's algorithm with a square brush
pub fn draw_line(
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    pixels: &mut PixelBuffer,
    color: Color,
    thickness: usize,
) {
    let reach = thickness.max(1).min(pixels.width.max(pixels.height) + 1) as isize;
    let offset = (reach - 1) / 2;

    // Keep the walk within the buffer plus the brush margin
    let margin = reach as f64;
    let Some((a, b)) = clip_segment(
        [x0, y0],
        [x1, y1],
        [-margin, -margin],
        [pixels.width as f64 + margin, pixels.height as f64 + margin],
    ) else {
        return;
    };

    let (mut x0, mut y0, x1, y1) = (
        a[0].floor() as isize,
        a[1].floor() as isize,
        b[0].floor() as isize,
        b[1].floor() as isize,
    );
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy; // error value e_xy

    loop {
        for by in 0..reach {
            for bx in 0..reach {
                pixels.put(x0 + bx - offset, y0 + by - offset, color);
            }
        }

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

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(width: usize, height: usize) -> Viewport {
        Viewport::new(OrthoVolume::default(), width, height, 600.0)
    }

    #[test]
    fn corners_map_to_corners() {
        let vp = viewport(240, 260);
        assert_eq!(vp.to_screen(&Vertex::new(-1.2, 2.0)), [0.0, 0.0]);
        let [x, y] = vp.to_screen(&Vertex::new(1.2, -0.6));
        assert!((x - 240.0).abs() < 1e-9);
        assert!((y - 260.0).abs() < 1e-9);
    }

    #[test]
    fn stroke_scales_with_height_but_never_vanishes() {
        assert_eq!(viewport(800, 600).stroke_pixels(3.0), 3);
        assert_eq!(viewport(80, 46).stroke_pixels(3.0), 1);
    }

    #[test]
    fn triangles_fill_in_both_windings() {
        for (a, b, c) in [
            ([1.0, 1.0], [9.0, 1.0], [1.0, 9.0]),
            ([1.0, 1.0], [1.0, 9.0], [9.0, 1.0]),
        ] {
            let mut pixels = PixelBuffer::new(10, 10);
            pixels.clear(Color::WHITE);
            fill_triangle(&a, &b, &c, &mut pixels, Color::RED);
            assert_eq!(pixels.get(2, 2), (255, 0, 0));
            assert_eq!(pixels.get(8, 8), (255, 255, 255));
        }
    }

    #[test]
    fn degenerate_triangle_draws_nothing() {
        let mut pixels = PixelBuffer::new(4, 4);
        fill_triangle(&[0.0, 0.0], &[2.0, 2.0], &[3.0, 3.0], &mut pixels, Color::RED);
        assert!(pixels.data.iter().all(|&b| b == 0));
    }

    #[test]
    fn offscreen_line_is_clipped() {
        let mut pixels = PixelBuffer::new(4, 4);
        draw_line(-10.0, -10.0, 20.0, 20.0, &mut pixels, Color::WHITE, 3);
        assert_eq!(pixels.get(0, 0), (255, 255, 255));
        assert_eq!(pixels.get(3, 3), (255, 255, 255));
    }

    #[test]
    fn render_paints_background_then_shapes() {
        let vp = viewport(24, 26);
        let quad = Primitive::Quad {
            vertices: [
                Vertex::new(-0.6, 0.0),
                Vertex::new(0.6, 0.0),
                Vertex::new(0.6, 1.0),
                Vertex::new(-0.6, 1.0),
            ],
            color: Color::BLUE,
        };
        let label = Primitive::Text {
            anchor: Vertex::new(0.0, 2.0),
            text: "Doraemon".into(),
            color: Color::BLACK,
        };
        let frame = render(&[quad, label], &vp, Color::rgb(1.0, 1.0, 0.8));
        assert_eq!(frame.pixels.get(0, 0), (255, 255, 204));
        assert_eq!(frame.pixels.get(12, 13), (0, 0, 255));
        assert_eq!(frame.labels.len(), 1);
        assert_eq!((frame.labels[0].x, frame.labels[0].y), (12, 0));
    }

    #[test]
    fn zero_sized_viewport_renders_nothing() {
        let frame = render(&[], &viewport(0, 0), Color::WHITE);
        assert!(frame.pixels.data.is_empty());
    }
    #[test]
    fn far_away_endpoints_are_clipped_to_the_buffer() {
        let mut pixels = PixelBuffer::new(10, 10);
        draw_line(-1e12, 5.0, 1e12, 5.0, &mut pixels, Color::WHITE, 1);
        assert_eq!(pixels.get(0, 5), (255, 255, 255));
        assert_eq!(pixels.get(9, 5), (255, 255, 255));
        assert_eq!(pixels.get(5, 4), (0, 0, 0));

        // saturating coordinates must neither overflow nor walk forever
        draw_line(-1e300, 1.0, 1e300, 1.0, &mut pixels, Color::RED, 3);
        draw_line(f64::NEG_INFINITY, 0.0, 3.0, 3.0, &mut pixels, Color::RED, 1);
        draw_line(f64::NAN, 0.0, 3.0, 3.0, &mut pixels, Color::RED, 1);
        assert_eq!(pixels.get(9, 5), (255, 255, 255));
    }

    #[test]
    fn segment_outside_the_margin_draws_nothing() {
        let mut pixels = PixelBuffer::new(4, 4);
        draw_line(-50.0, 20.0, 50.0, 20.0, &mut pixels, Color::WHITE, 3);
        assert!(pixels.data.iter().all(|&b| b == 0));
    }

    #[test]
    fn narrow_view_renders_without_panicking() {
        let volume = OrthoVolume {
            left: 0.0,
            right: 1e-300,
            ..OrthoVolume::default()
        };
        let vp = Viewport::new(volume, 24, 26, 600.0);
        let line = Primitive::Line {
            from: Vertex::new(-0.5, 0.0),
            to: Vertex::new(0.5, 1.0),
            color: Color::BLACK,
            width: 3.0,
        };
        let label = Primitive::Text {
            anchor: Vertex::new(0.5, 1.0),
            text: "Doraemon".into(),
            color: Color::BLACK,
        };
        let frame = render(&[line, label], &vp, Color::WHITE);
        assert!(frame.labels.is_empty());
        assert_eq!(frame.pixels.get(0, 0), (255, 255, 255));
    }
}
