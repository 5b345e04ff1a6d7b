use crate::vertex::Color;
use serde::Deserialize;
use std::time::Duration;

/// Tuning constants for the animation; fixed for the lifetime of the process
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Motion {
    /// Copter spin per tick, in degrees
    pub angular_speed: f64,
    /// Body growth per tick
    pub scale_speed: f64,
    /// Body scale where growth (and the walking gait) stops
    pub scale_ceiling: f64,
    pub leg_min: f64,
    pub leg_max: f64,
    /// Gait cycles per radian of copter rotation
    pub gait_frequency: f64,
    /// Balloon sway per tick, in degrees
    pub sway_step: f64,
    /// Balloons reverse once they swing past this angle
    pub sway_limit: f64,
}

impl Default for Motion {
    fn default() -> Self {
        Motion {
            angular_speed: 0.1_f64.to_degrees(),
            scale_speed: 0.01,
            scale_ceiling: 1.8,
            leg_min: 0.8,
            leg_max: 1.2,
            gait_frequency: 3.5,
            sway_step: 2.0,
            sway_limit: 25.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwayDirection {
    Forward,
    Backward,
}

impl SwayDirection {
    pub fn sign(self) -> f64 {
        match self {
            SwayDirection::Forward => 1.0,
            SwayDirection::Backward => -1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            SwayDirection::Forward => SwayDirection::Backward,
            SwayDirection::Backward => SwayDirection::Forward,
        }
    }
}

/// Application state
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationState {
    /// Current copter rotation, degrees in [0, 360)
    pub rotation_deg: f64,
    /// Uniform character scale
    pub body_scale: f64,
    pub left_leg_scale: f64,
    pub right_leg_scale: f64,
    /// Balloon deflection in degrees
    pub sway_deg: f64,
    pub sway_direction: SwayDirection,
    /// Balloon fill color
    pub accent: Color,
    /// Animation running (ticks still arrive while paused)
    pub running: bool,
    /// Draw the figure name above the character
    pub show_label: bool,
    pub motion: Motion,
}

/// Result of one timer tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tick {
    /// Delay before the next tick must fire
    pub rearm: Duration,
    /// Whether any field changed and a redraw is due
    pub updated: bool,
}

pub const DEFAULT_ACCENT: Color = Color::rgb(0.8, 0.6, 1.0);

impl Default for AnimationState {
    fn default() -> Self {
        AnimationState::new(Motion::default())
    }
}

impl AnimationState {
    pub fn new(motion: Motion) -> Self {
        AnimationState {
            rotation_deg: 0.0,
            body_scale: 0.5,
            left_leg_scale: 1.0,
            right_leg_scale: 1.0,
            sway_deg: 0.0,
            sway_direction: SwayDirection::Forward,
            accent: DEFAULT_ACCENT,
            running: false,
            show_label: true,
            motion,
        }
    }

    /// Advances the animation by one tick.
    ///
    /// The returned [`Tick`] always re-arms at `period`; pausing only gates
    /// the state update, never the clock.
    pub fn advance(&mut self, period: Duration) -> Tick {
        if !self.running {
            return Tick {
                rearm: period,
                updated: false,
            };
        }

        let m = self.motion;
        self.rotation_deg = (self.rotation_deg + m.angular_speed).rem_euclid(360.0);

        if self.body_scale < m.scale_ceiling {
            self.body_scale = (self.body_scale + m.scale_speed).min(m.scale_ceiling);
            let phase = ((m.gait_frequency * self.rotation_deg.to_radians()).sin() + 1.0) / 2.0;
            let span = m.leg_max - m.leg_min;
            self.right_leg_scale = m.leg_min + span * phase;
            self.left_leg_scale = m.leg_max - span * phase;
        } else {
            self.right_leg_scale = 1.0;
            self.left_leg_scale = 1.0;
        }

        self.sway_deg += self.sway_direction.sign() * m.sway_step;
        if self.sway_deg.abs() > m.sway_limit {
            self.sway_direction = self.sway_direction.flipped();
        }

        Tick {
            rearm: period,
            updated: true,
        }
    }

    pub fn toggle_running(&mut self) {
        self.running = !self.running;
        tracing::debug!(running = self.running, "animation toggled");
    }

    /// Whether growth has finished and the gait is pinned
    pub fn fully_grown(&self) -> bool {
        self.body_scale >= self.motion.scale_ceiling
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: Duration = Duration::from_millis(80);

    fn running() -> AnimationState {
        AnimationState {
            running: true,
            ..AnimationState::default()
        }
    }

    #[test]
    fn paused_advance_only_rearms() {
        let mut state = AnimationState::default();
        state.rotation_deg = 42.0;
        state.sway_deg = -7.0;
        let before = state.clone();
        for _ in 0..50 {
            let tick = state.advance(PERIOD);
            assert_eq!(tick.rearm, PERIOD);
            assert!(!tick.updated);
        }
        assert_eq!(state, before);
    }

    #[test]
    fn body_grows_to_ceiling_then_holds() {
        let mut state = running();
        let mut last = state.body_scale;
        let mut ticks = 0;
        while !state.fully_grown() {
            let tick = state.advance(PERIOD);
            assert!(tick.updated);
            assert!(state.body_scale > last);
            last = state.body_scale;
            ticks += 1;
            assert!(ticks < 1_000, "growth never reached the ceiling");
        }
        assert_eq!(state.body_scale, 1.8);

        for _ in 0..10 {
            state.advance(PERIOD);
            assert_eq!(state.body_scale, 1.8);
            assert_eq!(state.left_leg_scale, 1.0);
            assert_eq!(state.right_leg_scale, 1.0);
        }
    }

    #[test]
    fn legs_stay_in_opposite_phase_while_growing() {
        let mut state = running();
        let m = state.motion;
        while !state.fully_grown() {
            state.advance(PERIOD);
            let sum = state.left_leg_scale + state.right_leg_scale;
            assert!((sum - (m.leg_min + m.leg_max)).abs() < 1e-9);
            for leg in [state.left_leg_scale, state.right_leg_scale] {
                assert!(leg >= m.leg_min - 1e-9 && leg <= m.leg_max + 1e-9);
            }
        }
    }

    #[test]
    fn sway_flips_after_passing_the_limit() {
        let mut state = running();
        state.sway_deg = 24.0;
        state.sway_direction = SwayDirection::Forward;
        state.advance(PERIOD);
        assert_eq!(state.sway_deg, 26.0);
        assert_eq!(state.sway_direction, SwayDirection::Backward);
        state.advance(PERIOD);
        assert_eq!(state.sway_deg, 24.0);
        assert_eq!(state.sway_direction, SwayDirection::Backward);
    }

    #[test]
    fn sway_reaching_the_limit_exactly_keeps_direction() {
        let mut state = running();
        state.sway_deg = 23.0;
        state.advance(PERIOD);
        assert_eq!(state.sway_deg, 25.0);
        assert_eq!(state.sway_direction, SwayDirection::Forward);
    }

    #[test]
    fn rotation_wraps_below_a_full_turn() {
        let mut state = running();
        state.motion.angular_speed = 0.1;
        state.rotation_deg = 359.95;
        state.advance(PERIOD);
        assert!((state.rotation_deg - 0.05).abs() < 1e-9);
    }

    #[test]
    fn negative_speed_wraps_into_range() {
        let mut state = running();
        state.motion.angular_speed = -0.1;
        state.rotation_deg = 0.05;
        state.advance(PERIOD);
        assert!((state.rotation_deg - 359.95).abs() < 1e-9);
    }

    #[test]
    fn toggle_is_an_involution() {
        let mut state = AnimationState::default();
        state.toggle_running();
        assert!(state.running);
        state.toggle_running();
        assert!(!state.running);
    }
}
