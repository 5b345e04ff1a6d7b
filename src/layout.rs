//! Character layout as data.
//!
//! Coordinates are hand-tuned world units inside the orthographic view.
//! Layers are listed back to front.

use crate::vertex::Color;

/// Where a shape takes its fill color from
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Paint {
    Fixed(Color),
    /// The balloon color picked from the menu
    Accent,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Ellipse {
        center: [f64; 2],
        radii: [f64; 2],
        paint: Paint,
    },
    Arc {
        center: [f64; 2],
        radii: [f64; 2],
        start_deg: i32,
        end_deg: i32,
        paint: Paint,
    },
    FilledArc {
        center: [f64; 2],
        radii: [f64; 2],
        start_deg: i32,
        end_deg: i32,
        paint: Paint,
    },
    Line {
        from: [f64; 2],
        to: [f64; 2],
        paint: Paint,
    },
    Rectangle {
        corner1: [f64; 2],
        corner2: [f64; 2],
        paint: Paint,
    },
    /// Spoke from `hub` to the ellipse of `reach` radii, at the current
    /// rotation plus `phase_deg`
    Blade {
        hub: [f64; 2],
        reach: [f64; 2],
        phase_deg: f64,
        paint: Paint,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Leg {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Layer {
    Shape(Shape),
    /// Shapes drawn under that leg's vertical scale
    Leg {
        side: Leg,
        shapes: &'static [Shape],
    },
    /// Shapes rotated by the sway angle about `pivot`
    Sway {
        pivot: [f64; 2],
        shapes: &'static [Shape],
    },
}

pub const LABEL_TEXT: &str = "Doraemon";
pub const LABEL_ANCHOR: [f64; 2] = [-0.2, 1.8];

const SKY: Color = Color::rgb(0.6, 0.8, 1.0);
const CREAM: Color = Color::rgb(1.0, 1.0, 0.8);
const SMILE: Color = Color::rgb(0.98, 0.012, 0.337);
const GOLD: Color = Color::rgb(1.0, 0.6667, 0.1137);

const fn ellipse(x: f64, y: f64, rx: f64, ry: f64, color: Color) -> Shape {
    Shape::Ellipse {
        center: [x, y],
        radii: [rx, ry],
        paint: Paint::Fixed(color),
    }
}

const fn arc(x: f64, y: f64, rx: f64, ry: f64, start_deg: i32, end_deg: i32) -> Shape {
    Shape::Arc {
        center: [x, y],
        radii: [rx, ry],
        start_deg,
        end_deg,
        paint: Paint::Fixed(Color::BLACK),
    }
}

const fn wedge(
    x: f64,
    y: f64,
    rx: f64,
    ry: f64,
    start_deg: i32,
    end_deg: i32,
    color: Color,
) -> Shape {
    Shape::FilledArc {
        center: [x, y],
        radii: [rx, ry],
        start_deg,
        end_deg,
        paint: Paint::Fixed(color),
    }
}

const fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Shape {
    Shape::Line {
        from: [x1, y1],
        to: [x2, y2],
        paint: Paint::Fixed(Color::BLACK),
    }
}

const fn rect(x1: f64, y1: f64, x2: f64, y2: f64, color: Color) -> Shape {
    Shape::Rectangle {
        corner1: [x1, y1],
        corner2: [x2, y2],
        paint: Paint::Fixed(color),
    }
}

/// Offsets of the second and third blade: 120 and 240 radians, reduced to degrees
const BLADE_PHASES_DEG: [f64; 2] = [35.49354156987829, 70.98708313975658];

const fn blade(phase_deg: f64) -> Shape {
    Shape::Blade {
        hub: [0.0, 0.8],
        reach: [0.1, 0.04],
        phase_deg,
        paint: Paint::Fixed(Color::BLACK),
    }
}

const fn balloon(x: f64) -> Shape {
    Shape::Ellipse {
        center: [x, 0.83],
        radii: [0.1, 0.2],
        paint: Paint::Accent,
    }
}

const LEFT_LEG: &[Shape] = &[ellipse(-0.1, -0.08, 0.09, 0.05, Color::WHITE)];
const RIGHT_LEG: &[Shape] = &[ellipse(0.1, -0.08, 0.09, 0.05, Color::WHITE)];
const RIGHT_BALLOON: &[Shape] = &[balloon(0.45)];
const LEFT_BALLOON: &[Shape] = &[balloon(-0.45)];

/// Head, face, torso and legs
pub const CHARACTER: &[Layer] = &[
    // face
    Layer::Shape(ellipse(0.0, 0.5, 0.25, 0.2, SKY)),
    Layer::Shape(ellipse(0.0, 0.44, 0.22, 0.133, Color::WHITE)),
    // eyes
    Layer::Shape(ellipse(-0.04, 0.54, 0.04, 0.065, Color::WHITE)),
    Layer::Shape(ellipse(0.04, 0.54, 0.04, 0.065, Color::WHITE)),
    Layer::Shape(arc(-0.032, 0.51, 0.018, 0.025, 40, 180)),
    Layer::Shape(arc(0.04, 0.51, 0.018, 0.025, 40, 180)),
    // nose
    Layer::Shape(ellipse(0.0, 0.461, 0.025, 0.025, Color::RED)),
    Layer::Shape(line(0.0, 0.436, 0.0, 0.411)),
    // mustache
    Layer::Shape(line(0.12, 0.44, 0.2, 0.47)),
    Layer::Shape(line(0.12, 0.40, 0.2, 0.40)),
    Layer::Shape(line(0.12, 0.36, 0.2, 0.33)),
    Layer::Shape(line(-0.12, 0.44, -0.2, 0.47)),
    Layer::Shape(line(-0.12, 0.40, -0.2, 0.40)),
    Layer::Shape(line(-0.12, 0.36, -0.2, 0.33)),
    // smile
    Layer::Shape(wedge(0.0, 0.413, 0.065, 0.065, 0, -180, SMILE)),
    // hands and fists
    Layer::Shape(rect(-0.35, 0.28, -0.12, 0.21, SKY)),
    Layer::Shape(rect(0.35, 0.28, 0.12, 0.21, SKY)),
    Layer::Shape(ellipse(-0.35, 0.25, 0.05, 0.05, Color::WHITE)),
    Layer::Shape(ellipse(0.35, 0.25, 0.05, 0.05, Color::WHITE)),
    // stomach and pocket
    Layer::Shape(rect(-0.15, 0.28, 0.15, -0.03, SKY)),
    Layer::Shape(wedge(0.0, 0.275, 0.13, 0.22, 0, -180, Color::WHITE)),
    Layer::Shape(arc(0.0, 0.16, 0.06, 0.06, 0, -180)),
    Layer::Shape(line(-0.06, 0.16, 0.06, 0.16)),
    // neck band and bell
    Layer::Shape(rect(-0.12, 0.324, 0.12, 0.28, Color::RED)),
    Layer::Shape(ellipse(0.0, 0.275, 0.035, 0.035, GOLD)),
    // legs
    Layer::Leg {
        side: Leg::Left,
        shapes: LEFT_LEG,
    },
    Layer::Leg {
        side: Leg::Right,
        shapes: RIGHT_LEG,
    },
    Layer::Shape(line(0.0, -0.035, 0.0, 0.03)),
];

/// Bamboo copter on top of the head
pub const COPTER: &[Layer] = &[
    Layer::Shape(ellipse(0.0, 0.8, 0.1, 0.04, CREAM)),
    Layer::Shape(line(0.0, 0.7, 0.0, 0.8)),
    Layer::Shape(blade(0.0)),
    Layer::Shape(blade(BLADE_PHASES_DEG[0])),
    Layer::Shape(blade(BLADE_PHASES_DEG[1])),
];

/// Two balloons on threads, swaying about the thread tops
pub const BALLOONS: &[Layer] = &[
    Layer::Shape(line(0.35, 0.3, 0.45, 0.63)),
    Layer::Shape(line(-0.35, 0.3, -0.45, 0.63)),
    Layer::Sway {
        pivot: [0.45, 0.63],
        shapes: RIGHT_BALLOON,
    },
    Layer::Sway {
        pivot: [-0.45, 0.63],
        shapes: LEFT_BALLOON,
    },
];
