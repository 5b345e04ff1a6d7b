use crate::compose::compose_frame;
use crate::frame::Frame;
use crate::graphics::{render, RenderedFrame, Viewport};
use crate::input::{apply_menu, MenuItem, MouseButton};
use crate::state::AnimationState;
use crate::vertex::Color;
use std::time::Duration;

/// Requests a widget makes of its host while handling an event
#[derive(Debug, Default, PartialEq, Eq)]
pub struct EventCtx {
    timer: Option<Duration>,
    paint: bool,
    menu: bool,
    quit: bool,
}

impl EventCtx {
    pub fn new() -> Self {
        EventCtx::default()
    }

    /// Schedules the next timer event `delay` from now
    pub fn request_timer(&mut self, delay: Duration) {
        self.timer = Some(delay);
    }

    pub fn request_paint(&mut self) {
        self.paint = true;
    }

    /// Asks the host to open the context menu at the pointer
    pub fn request_menu(&mut self) {
        self.menu = true;
    }

    pub fn submit_quit(&mut self) {
        self.quit = true;
    }

    pub fn timer(&self) -> Option<Duration> {
        self.timer
    }

    pub fn paint_requested(&self) -> bool {
        self.paint
    }

    pub fn menu_requested(&self) -> bool {
        self.menu
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }
}

/// Event dispatch surface: one method per kind of host event.
///
/// The host calls these strictly one at a time. Only `paint` sees the data
/// immutably.
pub trait Widget<T> {
    fn timer(&mut self, ctx: &mut EventCtx, data: &mut T);
    fn key_down(&mut self, ctx: &mut EventCtx, key: char, data: &mut T);
    fn mouse_down(&mut self, ctx: &mut EventCtx, button: MouseButton, data: &mut T);
    fn menu(&mut self, ctx: &mut EventCtx, item: MenuItem, data: &mut T);
    /// Called when the drawable area changes size, in pixels
    fn layout(&mut self, ctx: &mut EventCtx, width: usize, height: usize);
    fn paint(&mut self, data: &T) -> RenderedFrame;
}

/// Cartoon widget
pub struct CartoonWidget {
    period: Duration,
    viewport: Viewport,
    background: Color,
    frames_painted: u64,
}

impl CartoonWidget {
    pub fn new(period: Duration, viewport: Viewport, background: Color) -> Self {
        CartoonWidget {
            period,
            viewport,
            background,
            frames_painted: 0,
        }
    }

    pub fn frames_painted(&self) -> u64 {
        self.frames_painted
    }
}

impl Widget<AnimationState> for CartoonWidget {
    fn timer(&mut self, ctx: &mut EventCtx, data: &mut AnimationState) {
        let was_grown = data.fully_grown();
        let tick = data.advance(self.period);
        if tick.updated {
            if !was_grown && data.fully_grown() {
                tracing::info!(body_scale = data.body_scale, "growth finished, gait stopped");
            }
            ctx.request_paint();
        }
        ctx.request_timer(tick.rearm);
    }

    fn key_down(&mut self, ctx: &mut EventCtx, key: char, data: &mut AnimationState) {
        match key {
            's' => {
                data.toggle_running();
                ctx.request_paint();
            }
            'q' | 'Q' => ctx.submit_quit(),
            _ => {}
        }
    }

    fn mouse_down(&mut self, ctx: &mut EventCtx, button: MouseButton, data: &mut AnimationState) {
        match button {
            MouseButton::Left => {
                data.toggle_running();
                ctx.request_paint();
            }
            MouseButton::Right => ctx.request_menu(),
            MouseButton::Middle => {}
        }
    }

    fn menu(&mut self, ctx: &mut EventCtx, item: MenuItem, data: &mut AnimationState) {
        apply_menu(data, item);
        ctx.request_paint();
    }

    fn layout(&mut self, ctx: &mut EventCtx, width: usize, height: usize) {
        if (width, height) != (self.viewport.width, self.viewport.height) {
            tracing::debug!(width, height, "viewport reset");
            self.viewport = Viewport::new(
                self.viewport.volume,
                width,
                height,
                self.viewport.reference_height,
            );
        }
        ctx.request_paint();
    }

    fn paint(&mut self, data: &AnimationState) -> RenderedFrame {
        let mut frame = Frame::new();
        compose_frame(&mut frame, data);
        self.frames_painted += 1;
        if tracing::enabled!(tracing::Level::TRACE) {
            let vertices: usize = frame.primitives().iter().map(|p| p.vertices().len()).sum();
            tracing::trace!(
                frame = self.frames_painted,
                primitives = frame.primitives().len(),
                vertices,
                "frame composed"
            );
        }
        render(frame.primitives(), &self.viewport, self.background)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::OrthoVolume;

    const PERIOD: Duration = Duration::from_millis(80);

    fn widget() -> CartoonWidget {
        CartoonWidget::new(
            PERIOD,
            Viewport::new(OrthoVolume::default(), 48, 52, 600.0),
            Color::rgb(1.0, 1.0, 0.8),
        )
    }

    #[test]
    fn timer_always_rearms() {
        let mut widget = widget();
        let mut state = AnimationState::default();

        let mut ctx = EventCtx::new();
        widget.timer(&mut ctx, &mut state);
        assert_eq!(ctx.timer(), Some(PERIOD));
        assert!(!ctx.paint_requested());

        state.running = true;
        let mut ctx = EventCtx::new();
        widget.timer(&mut ctx, &mut state);
        assert_eq!(ctx.timer(), Some(PERIOD));
        assert!(ctx.paint_requested());
    }

    #[test]
    fn s_key_and_left_click_toggle_running() {
        let mut widget = widget();
        let mut state = AnimationState::default();
        let mut ctx = EventCtx::new();
        widget.key_down(&mut ctx, 's', &mut state);
        assert!(state.running);
        widget.mouse_down(&mut ctx, MouseButton::Left, &mut state);
        assert!(!state.running);
        widget.key_down(&mut ctx, 'x', &mut state);
        assert!(!state.running);
        assert!(!ctx.quit_requested());
    }

    #[test]
    fn right_click_asks_for_menu_without_touching_state() {
        let mut widget = widget();
        let mut state = AnimationState::default();
        let before = state.clone();
        let mut ctx = EventCtx::new();
        widget.mouse_down(&mut ctx, MouseButton::Right, &mut state);
        assert!(ctx.menu_requested());
        assert_eq!(state, before);
    }

    #[test]
    fn menu_selection_updates_state() {
        let mut widget = widget();
        let mut state = AnimationState::default();
        let mut ctx = EventCtx::new();
        widget.menu(&mut ctx, MenuItem::BlueBalloons, &mut state);
        assert_eq!(state.accent, Color::BLUE);
        assert!(ctx.paint_requested());
    }

    #[test]
    fn layout_resets_viewport_size() {
        let mut widget = widget();
        let mut ctx = EventCtx::new();
        widget.layout(&mut ctx, 100, 60);
        assert_eq!((widget.viewport.width, widget.viewport.height), (100, 60));
        assert_eq!(widget.viewport.volume, OrthoVolume::default());
    }

    #[test]
    fn paint_reads_state_and_draws_the_character() {
        let mut widget = widget();
        let state = AnimationState::default();
        let frame = widget.paint(&state);
        assert_eq!(widget.frames_painted(), 1);
        assert_eq!(frame.labels.len(), 1);
        assert_eq!((frame.pixels.width, frame.pixels.height), (48, 52));
        // the face straddles world x = 0 at y = 0.25 (scaled by 0.5)
        let [x, y] = widget
            .viewport
            .to_screen(&crate::vertex::Vertex::new(0.0, 0.25));
        assert_ne!(frame.pixels.get(x as usize, y as usize), (255, 255, 204));
    }
}
