//! Display list for one frame plus the model-view transform stack.
//!
//! Shape calls append [`Primitive`]s whose vertices have already been
//! transformed by the current matrix, so the rasterizer never needs to know
//! about the stack.

use crate::math::{
    multiply_matrices, rotation, scaling, transform_point, translation, Matrix, IDENTITY,
};
use crate::vertex::{Color, Vertex};

/// One drawing primitive, in the vocabulary of a fixed-function pipeline
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    /// Filled convex polygon
    Polygon { vertices: Vec<Vertex>, color: Color },
    /// Filled quadrilateral
    Quad { vertices: [Vertex; 4], color: Color },
    /// Filled fan anchored at the first vertex
    TriangleFan { vertices: Vec<Vertex>, color: Color },
    /// Closed outline
    LineLoop {
        vertices: Vec<Vertex>,
        color: Color,
        width: f64,
    },
    /// Open polyline
    LineStrip {
        vertices: Vec<Vertex>,
        color: Color,
        width: f64,
    },
    /// Single segment
    Line {
        from: Vertex,
        to: Vertex,
        color: Color,
        width: f64,
    },
    /// Text label anchored at its lower-left corner
    Text {
        anchor: Vertex,
        text: String,
        color: Color,
    },
}

impl Primitive {
    /// All vertices carried by the primitive, in emission order
    pub fn vertices(&self) -> Vec<Vertex> {
        match self {
            Primitive::Polygon { vertices, .. }
            | Primitive::TriangleFan { vertices, .. }
            | Primitive::LineLoop { vertices, .. }
            | Primitive::LineStrip { vertices, .. } => vertices.clone(),
            Primitive::Quad { vertices, .. } => vertices.to_vec(),
            Primitive::Line { from, to, .. } => vec![*from, *to],
            Primitive::Text { anchor, .. } => vec![*anchor],
        }
    }
}

/// The frame under construction
#[derive(Debug)]
pub struct Frame {
    current: Matrix,
    stack: Vec<Matrix>,
    primitives: Vec<Primitive>,
}

impl Default for Frame {
    fn default() -> Self {
        Frame::new()
    }
}

impl Frame {
    pub fn new() -> Self {
        Frame {
            current: IDENTITY,
            stack: Vec::new(),
            primitives: Vec::new(),
        }
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn transform(&self) -> &Matrix {
        &self.current
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Saves the current matrix
    pub fn push(&mut self) {
        self.stack.push(self.current);
    }

    /// Restores the most recently saved matrix
    pub fn pop(&mut self) {
        match self.stack.pop() {
            Some(saved) => self.current = saved,
            None => tracing::warn!("transform stack underflow, keeping current matrix"),
        }
    }

    /// Runs `draw` between a push and its matching pop
    pub fn scoped<F: FnOnce(&mut Frame)>(&mut self, draw: F) {
        self.push();
        draw(self);
        self.pop();
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.current = multiply_matrices(&self.current, &translation(dx, dy));
    }

    /// Rotates about the local origin, counter-clockwise in degrees
    pub fn rotate(&mut self, degrees: f64) {
        self.current = multiply_matrices(&self.current, &rotation(degrees));
    }

    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.current = multiply_matrices(&self.current, &scaling(sx, sy));
    }

    /// Maps a local-space point through the current matrix
    pub fn project(&self, point: [f64; 2]) -> Vertex {
        let [x, y] = transform_point(&self.current, point);
        Vertex::new(x, y)
    }

    pub fn emit(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_restores_the_ambient_matrix() {
        let mut frame = Frame::new();
        frame.scale(0.5, 0.5);
        let before = *frame.transform();
        frame.scoped(|f| {
            f.translate(0.45, 0.63);
            f.rotate(25.0);
            f.translate(-0.45, -0.63);
            assert_eq!(f.depth(), 1);
        });
        assert_eq!(*frame.transform(), before);
        assert_eq!(frame.depth(), 0);
    }

    #[test]
    fn pop_on_empty_stack_keeps_matrix() {
        let mut frame = Frame::new();
        frame.scale(2.0, 2.0);
        let before = *frame.transform();
        frame.pop();
        assert_eq!(*frame.transform(), before);
    }

    #[test]
    fn project_applies_current_matrix() {
        let mut frame = Frame::new();
        frame.scale(0.5, 2.0);
        assert_eq!(frame.project([1.0, 1.0]), Vertex::new(0.5, 2.0));
    }
}
