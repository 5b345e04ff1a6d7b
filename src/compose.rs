use crate::frame::Frame;
use crate::layout::{
    Layer, Leg, Paint, Shape, BALLOONS, CHARACTER, COPTER, LABEL_ANCHOR, LABEL_TEXT,
};
use crate::shapes::{
    draw_arc, draw_ellipse, draw_filled_arc, draw_line, draw_rectangle, draw_text,
};
use crate::state::AnimationState;
use crate::vertex::Color;

/// Builds one frame from the current state. Reads the state, never mutates it.
pub fn compose_frame(frame: &mut Frame, state: &AnimationState) {
    if state.show_label {
        draw_text(frame, LABEL_ANCHOR, LABEL_TEXT, Color::BLACK);
    }

    let (ambient, depth) = (*frame.transform(), frame.depth());
    frame.scoped(|frame| {
        frame.scale(state.body_scale, state.body_scale);
        for layers in [CHARACTER, COPTER, BALLOONS] {
            draw_layers(frame, layers, state);
        }
    });
    debug_assert_eq!(*frame.transform(), ambient);
    debug_assert_eq!(frame.depth(), depth);
}

pub fn draw_layers(frame: &mut Frame, layers: &[Layer], state: &AnimationState) {
    for layer in layers {
        match layer {
            Layer::Shape(shape) => draw_shape(frame, shape, state),
            Layer::Leg { side, shapes } => {
                let scale = match side {
                    Leg::Left => state.left_leg_scale,
                    Leg::Right => state.right_leg_scale,
                };
                frame.scoped(|frame| {
                    frame.scale(1.0, scale);
                    for shape in shapes.iter() {
                        draw_shape(frame, shape, state);
                    }
                });
            }
            Layer::Sway { pivot, shapes } => frame.scoped(|frame| {
                frame.translate(pivot[0], pivot[1]);
                frame.rotate(state.sway_deg);
                frame.translate(-pivot[0], -pivot[1]);
                for shape in shapes.iter() {
                    draw_shape(frame, shape, state);
                }
            }),
        }
    }
}

fn resolve(paint: Paint, state: &AnimationState) -> Color {
    match paint {
        Paint::Fixed(color) => color,
        Paint::Accent => state.accent,
    }
}

pub fn draw_shape(frame: &mut Frame, shape: &Shape, state: &AnimationState) {
    match *shape {
        Shape::Ellipse {
            center,
            radii,
            paint,
        } => draw_ellipse(frame, center, radii[0], radii[1], resolve(paint, state)),
        Shape::Arc {
            center,
            radii,
            start_deg,
            end_deg,
            paint,
        } => draw_arc(
            frame,
            center,
            radii[0],
            radii[1],
            start_deg,
            end_deg,
            resolve(paint, state),
        ),
        Shape::FilledArc {
            center,
            radii,
            start_deg,
            end_deg,
            paint,
        } => draw_filled_arc(
            frame,
            center,
            radii[0],
            radii[1],
            start_deg,
            end_deg,
            resolve(paint, state),
        ),
        Shape::Line { from, to, paint } => draw_line(frame, from, to, resolve(paint, state)),
        Shape::Rectangle {
            corner1,
            corner2,
            paint,
        } => draw_rectangle(frame, corner1, corner2, resolve(paint, state)),
        Shape::Blade {
            hub,
            reach,
            phase_deg,
            paint,
        } => {
            let (sin_a, cos_a) = (state.rotation_deg + phase_deg).to_radians().sin_cos();
            let tip = [hub[0] + reach[0] * cos_a, hub[1] + reach[1] * sin_a];
            draw_line(frame, hub, tip, resolve(paint, state));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Primitive;
    use crate::math::IDENTITY;
    use crate::vertex::Vertex;

    fn composed(state: &AnimationState) -> Frame {
        let mut frame = Frame::new();
        compose_frame(&mut frame, state);
        frame
    }

    fn count(frame: &Frame, pred: impl Fn(&Primitive) -> bool) -> usize {
        frame.primitives().iter().filter(|p| pred(p)).count()
    }

    #[test]
    fn composition_restores_transform() {
        let frame = composed(&AnimationState::default());
        assert_eq!(*frame.transform(), IDENTITY);
        assert_eq!(frame.depth(), 0);
    }

    #[test]
    fn layout_snapshot_counts() {
        let frame = composed(&AnimationState::default());
        // ellipses: 10 character + 1 copter + 2 balloons
        assert_eq!(count(&frame, |p| matches!(p, Primitive::Polygon { .. })), 13);
        assert_eq!(count(&frame, |p| matches!(p, Primitive::Quad { .. })), 4);
        assert_eq!(count(&frame, |p| matches!(p, Primitive::LineLoop { .. })), 17);
        assert_eq!(count(&frame, |p| matches!(p, Primitive::TriangleFan { .. })), 2);
        assert_eq!(count(&frame, |p| matches!(p, Primitive::LineStrip { .. })), 3);
        // 9 character + attacher + 3 blades + 2 threads
        assert_eq!(count(&frame, |p| matches!(p, Primitive::Line { .. })), 15);
        assert_eq!(count(&frame, |p| matches!(p, Primitive::Text { .. })), 1);
    }

    #[test]
    fn label_follows_the_flag_and_ignores_body_scale() {
        let state = AnimationState::default();
        let frame = composed(&state);
        match &frame.primitives()[0] {
            Primitive::Text { anchor, text, .. } => {
                assert_eq!(text, "Doraemon");
                assert_eq!(*anchor, Vertex::new(-0.2, 1.8));
            }
            other => panic!("expected label first, got {other:?}"),
        }

        let hidden = AnimationState {
            show_label: false,
            ..state
        };
        let frame = composed(&hidden);
        assert_eq!(count(&frame, |p| matches!(p, Primitive::Text { .. })), 0);
    }

    #[test]
    fn face_is_scaled_by_body_scale() {
        let state = AnimationState {
            body_scale: 1.5,
            show_label: false,
            ..AnimationState::default()
        };
        let frame = composed(&state);
        // first primitive is the face fill; vertex 0 sits at angle 0
        let face = frame.primitives()[0].vertices();
        assert!((face[0].x() - 0.25 * 1.5).abs() < 1e-9);
        assert!((face[0].y() - 0.5 * 1.5).abs() < 1e-9);
    }

    #[test]
    fn balloons_take_the_accent_color() {
        let state = AnimationState {
            accent: Color::GREEN,
            ..AnimationState::default()
        };
        let frame = composed(&state);
        let green = count(&frame, |p| {
            matches!(p, Primitive::Polygon { color, .. } if *color == Color::GREEN)
        });
        assert_eq!(green, 2);
    }

    #[test]
    fn sway_rotates_balloons_about_the_thread_top() {
        let state = AnimationState {
            sway_deg: 90.0,
            body_scale: 1.0,
            show_label: false,
            ..AnimationState::default()
        };
        let mut frame = Frame::new();
        draw_layers(&mut frame, BALLOONS, &state);
        let right = frame
            .primitives()
            .iter()
            .find(|p| matches!(p, Primitive::Polygon { .. }))
            .map(Primitive::vertices)
            .unwrap_or_default();
        // balloon center (0.45, 0.83) swings to (0.25, 0.63); vertex 0 is center + (0.1, 0)
        assert!((right[0].x() - 0.25).abs() < 1e-9);
        assert!((right[0].y() - 0.73).abs() < 1e-9);
    }

    #[test]
    fn legs_scale_vertically_only() {
        let state = AnimationState {
            left_leg_scale: 1.2,
            right_leg_scale: 0.8,
            ..AnimationState::default()
        };
        let mut frame = Frame::new();
        draw_layers(&mut frame, &CHARACTER[CHARACTER.len() - 3..CHARACTER.len() - 1], &state);
        let left = frame.primitives()[0].vertices();
        let right = frame.primitives()[2].vertices();
        // vertex 0 is center + (rx, 0)
        assert!((left[0].x() - -0.01).abs() < 1e-9);
        assert!((left[0].y() - -0.096).abs() < 1e-9);
        assert!((right[0].x() - 0.19).abs() < 1e-9);
        assert!((right[0].y() - -0.064).abs() < 1e-9);
        assert_eq!(*frame.transform(), IDENTITY);
    }

    #[test]
    fn blades_follow_rotation() {
        let state = AnimationState {
            rotation_deg: 90.0,
            ..AnimationState::default()
        };
        let mut frame = Frame::new();
        draw_layers(&mut frame, &COPTER[2..3], &state);
        match &frame.primitives()[0] {
            Primitive::Line { to, .. } => {
                assert!(to.x().abs() < 1e-9);
                assert!((to.y() - 0.84).abs() < 1e-9);
            }
            other => panic!("expected blade line, got {other:?}"),
        }
    }

    #[test]
    fn second_blade_sits_at_a_120_radian_turn() {
        let state = AnimationState::default();
        let mut frame = Frame::new();
        draw_layers(&mut frame, &COPTER[3..4], &state);
        match &frame.primitives()[0] {
            Primitive::Line { to, .. } => {
                assert!((to.x() - 0.1 * 120.0_f64.cos()).abs() < 1e-9);
                assert!((to.y() - (0.8 + 0.04 * 120.0_f64.sin())).abs() < 1e-9);
            }
            other => panic!("expected blade line, got {other:?}"),
        }
    }
}
