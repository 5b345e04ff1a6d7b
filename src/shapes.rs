use crate::frame::{Frame, Primitive};
use crate::vertex::{Color, Vertex};
use std::f64::consts::PI;

/// Boundary samples used for a full ellipse
pub const ELLIPSE_SEGMENTS: usize = 300;

/// Stroke width for outlines, lines and arcs, in reference-window pixels
pub const STROKE_WIDTH: f64 = 3.0;

/// Samples `i = 0..=segments` around the ellipse, so the last vertex closes the ring
fn ellipse_points(center: [f64; 2], rx: f64, ry: f64, segments: usize) -> Vec<[f64; 2]> {
    (0..=segments)
        .map(|i| {
            let angle = 2.0 * PI * i as f64 / segments as f64;
            [rx * angle.cos() + center[0], ry * angle.sin() + center[1]]
        })
        .collect()
}

/// Whole-degree steps from `start` to `end`, walking backwards when `start > end`
pub fn arc_steps(start_deg: i32, end_deg: i32) -> Vec<i32> {
    if start_deg <= end_deg {
        (start_deg..=end_deg).collect()
    } else {
        (end_deg..=start_deg).rev().collect()
    }
}

fn arc_points(center: [f64; 2], rx: f64, ry: f64, start_deg: i32, end_deg: i32) -> Vec<[f64; 2]> {
    arc_steps(start_deg, end_deg)
        .into_iter()
        .map(|degree| {
            let angle = (degree as f64).to_radians();
            [rx * angle.cos() + center[0], ry * angle.sin() + center[1]]
        })
        .collect()
}

/// Draws a filled ellipse outlined in black
pub fn draw_ellipse(frame: &mut Frame, center: [f64; 2], rx: f64, ry: f64, color: Color) {
    draw_ellipse_with_segments(frame, center, rx, ry, color, ELLIPSE_SEGMENTS);
}

/// Same as [`draw_ellipse`] with an explicit sample count (at least 3)
pub fn draw_ellipse_with_segments(
    frame: &mut Frame,
    center: [f64; 2],
    rx: f64,
    ry: f64,
    color: Color,
    segments: usize,
) {
    let segments = segments.max(3);
    // fill and outline share one sampling pass
    let vertices: Vec<Vertex> = ellipse_points(center, rx, ry, segments)
        .into_iter()
        .map(|p| frame.project(p))
        .collect();
    frame.emit(Primitive::Polygon {
        vertices: vertices.clone(),
        color,
    });
    frame.emit(Primitive::LineLoop {
        vertices,
        color: Color::BLACK,
        width: STROKE_WIDTH,
    });
}

/// Draws an open arc of the ellipse between two angles in degrees.
///
/// The walk direction follows operand order: `(0, -180)` traces the lower
/// half clockwise rather than being an empty range.
pub fn draw_arc(
    frame: &mut Frame,
    center: [f64; 2],
    rx: f64,
    ry: f64,
    start_deg: i32,
    end_deg: i32,
    color: Color,
) {
    let vertices = arc_points(center, rx, ry, start_deg, end_deg)
        .into_iter()
        .map(|p| frame.project(p))
        .collect();
    frame.emit(Primitive::LineStrip {
        vertices,
        color,
        width: STROKE_WIDTH,
    });
}

/// Draws a filled wedge: a fan anchored at the center over the arc samples
pub fn draw_filled_arc(
    frame: &mut Frame,
    center: [f64; 2],
    rx: f64,
    ry: f64,
    start_deg: i32,
    end_deg: i32,
    color: Color,
) {
    let mut vertices = vec![frame.project(center)];
    vertices.extend(
        arc_points(center, rx, ry, start_deg, end_deg)
            .into_iter()
            .map(|p| frame.project(p)),
    );
    frame.emit(Primitive::TriangleFan { vertices, color });
}

pub fn draw_line(frame: &mut Frame, from: [f64; 2], to: [f64; 2], color: Color) {
    let (from, to) = (frame.project(from), frame.project(to));
    frame.emit(Primitive::Line {
        from,
        to,
        color,
        width: STROKE_WIDTH,
    });
}

/// Draws a filled rectangle from two opposite corners, outlined in black.
/// Either diagonal pairing is accepted.
pub fn draw_rectangle(frame: &mut Frame, c1: [f64; 2], c2: [f64; 2], color: Color) {
    let vertices = [
        frame.project(c1),
        frame.project([c2[0], c1[1]]),
        frame.project(c2),
        frame.project([c1[0], c2[1]]),
    ];
    frame.emit(Primitive::Quad { vertices, color });
    frame.emit(Primitive::LineLoop {
        vertices: vertices.to_vec(),
        color: Color::BLACK,
        width: STROKE_WIDTH,
    });
}

pub fn draw_text(frame: &mut Frame, anchor: [f64; 2], text: &str, color: Color) {
    let anchor = frame.project(anchor);
    frame.emit(Primitive::Text {
        anchor,
        text: text.to_owned(),
        color,
    });
}
