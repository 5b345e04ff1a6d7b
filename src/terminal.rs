//! Terminal host: owns the event loop and presents frames as half-block cells.
//!
//! Each terminal cell shows two vertically stacked pixels: the upper one as
//! the foreground of `▀`, the lower one as the background.

use crate::config::SessionConfig;
use crate::graphics::{Label, PixelBuffer, RenderedFrame, Viewport};
use crate::input::{MenuItem, MouseButton};
use crate::state::AnimationState;
use crate::vertex::Color;
use crate::widget::{CartoonWidget, EventCtx, Widget};
use anyhow::{Context, Result};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseEvent, MouseEventKind,
};
use crossterm::style::{self, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
};
use crossterm::{execute, queue};
use std::io::{self, Write};
use std::time::Instant;

const UPPER_HALF: char = '▀';

type Rgb = (u8, u8, u8);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Rgb,
    bg: Rgb,
}

/// Character grid built from a pixel buffer, two pixel rows per cell row
#[derive(Clone, Debug, PartialEq)]
pub struct CellGrid {
    columns: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl CellGrid {
    pub fn from_pixels(pixels: &PixelBuffer) -> Self {
        let columns = pixels.width;
        let rows = pixels.height.div_ceil(2);
        let mut cells = Vec::with_capacity(columns * rows);
        for row in 0..rows {
            for x in 0..columns {
                let top = pixels.get(x, row * 2);
                let bottom = if row * 2 + 1 < pixels.height {
                    pixels.get(x, row * 2 + 1)
                } else {
                    top
                };
                cells.push(Cell {
                    ch: UPPER_HALF,
                    fg: top,
                    bg: bottom,
                });
            }
        }
        CellGrid {
            columns,
            rows,
            cells,
        }
    }

    /// Writes text over the grid, keeping each cell's lower pixel as background
    /// unless `bg` is given. Text past the right edge is dropped.
    pub fn overlay_text(
        &mut self,
        column: usize,
        row: usize,
        text: &str,
        fg: Color,
        bg: Option<Color>,
    ) {
        if row >= self.rows {
            return;
        }
        for (i, ch) in text.chars().enumerate() {
            let x = column + i;
            if x >= self.columns {
                break;
            }
            let cell = &mut self.cells[row * self.columns + x];
            cell.ch = ch;
            cell.fg = fg.as_rgb8();
            if let Some(bg) = bg {
                cell.bg = bg.as_rgb8();
            }
        }
    }

    pub fn overlay_labels(&mut self, labels: &[Label]) {
        for label in labels {
            self.overlay_text(label.x, label.y / 2, &label.text, label.color, None);
        }
    }

    #[cfg(test)]
    fn row_text(&self, row: usize) -> String {
        self.cells[row * self.columns..(row + 1) * self.columns]
            .iter()
            .map(|c| c.ch)
            .collect()
    }

    /// Emits the grid. `positioned` moves the cursor to each row (raw mode);
    /// otherwise rows are separated by newlines.
    pub fn write_to<W: Write>(&self, out: &mut W, positioned: bool) -> io::Result<()> {
        for row in 0..self.rows {
            if positioned {
                queue!(out, MoveTo(0, row as u16))?;
            }
            let mut current: Option<(Rgb, Rgb)> = None;
            for cell in &self.cells[row * self.columns..(row + 1) * self.columns] {
                if current != Some((cell.fg, cell.bg)) {
                    queue!(
                        out,
                        SetForegroundColor(rgb(cell.fg)),
                        SetBackgroundColor(rgb(cell.bg))
                    )?;
                    current = Some((cell.fg, cell.bg));
                }
                queue!(out, Print(cell.ch))?;
            }
            queue!(out, ResetColor)?;
            if !positioned {
                queue!(out, Print('\n'))?;
            }
        }
        Ok(())
    }
}

fn rgb((r, g, b): Rgb) -> style::Color {
    style::Color::Rgb { r, g, b }
}

/// Right-click context menu placed at the pointer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContextMenu {
    column: u16,
    row: u16,
}

impl ContextMenu {
    /// Opens at `(column, row)`, shifted so the box stays inside the screen
    pub fn open(column: u16, row: u16, screen_columns: u16, screen_rows: u16) -> Self {
        let width = Self::width() as u16;
        let height = MenuItem::ALL.len() as u16;
        ContextMenu {
            column: column.min(screen_columns.saturating_sub(width)),
            row: row.min(screen_rows.saturating_sub(height)),
        }
    }

    fn width() -> usize {
        MenuItem::ALL
            .iter()
            .map(|item| Self::entry(*item).chars().count())
            .max()
            .unwrap_or(0)
    }

    fn entry(item: MenuItem) -> String {
        format!(" {}. {} ", item.number(), item.label())
    }

    /// The entry under a click, if any
    pub fn hit(&self, column: u16, row: u16) -> Option<MenuItem> {
        let inside_x = column >= self.column && column < self.column + Self::width() as u16;
        if !inside_x || row < self.row {
            return None;
        }
        MenuItem::ALL.get((row - self.row) as usize).copied()
    }

    fn draw(&self, grid: &mut CellGrid) {
        let width = Self::width();
        for (i, item) in MenuItem::ALL.iter().enumerate() {
            let text = format!("{:<width$}", Self::entry(*item));
            grid.overlay_text(
                self.column as usize,
                self.row as usize + i,
                &text,
                Color::WHITE,
                Some(Color::rgb(0.2, 0.2, 0.2)),
            );
        }
    }
}

/// Restores the terminal when dropped, including on error paths
struct TerminalGuard;

impl TerminalGuard {
    fn enter(title: &str) -> Result<Self> {
        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        let guard = TerminalGuard;
        execute!(
            io::stdout(),
            EnterAlternateScreen,
            EnableMouseCapture,
            Hide,
            SetTitle(title)
        )
        .context("failed to prepare terminal")?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(err) = execute!(
            io::stdout(),
            ResetColor,
            Show,
            DisableMouseCapture,
            LeaveAlternateScreen
        ) {
            tracing::warn!(%err, "failed to restore terminal screen");
        }
        if let Err(err) = terminal::disable_raw_mode() {
            tracing::warn!(%err, "failed to disable raw mode");
        }
    }
}

/// Pixel size for a terminal of `columns` x `rows`, keeping the last row for status
fn pixel_size(columns: u16, rows: u16) -> (usize, usize) {
    (columns as usize, rows.saturating_sub(1) as usize * 2)
}

pub fn viewport_for(config: &SessionConfig, columns: u16, rows: u16) -> Viewport {
    let (width, height) = pixel_size(columns, rows);
    Viewport::new(config.view, width, height, config.window.height as f64)
}

fn status_line(state: &AnimationState) -> String {
    let mode = if state.running { "running" } else { "Paused" };
    format!("[{mode}] s / left click: start/stop | right click: menu | q: quit")
}

/// Composes the full screen: frame, labels, menu and status line
fn compose_screen(
    frame: &RenderedFrame,
    menu: Option<&ContextMenu>,
    state: &AnimationState,
) -> CellGrid {
    let mut grid = CellGrid::from_pixels(&frame.pixels);
    grid.overlay_labels(&frame.labels);
    if let Some(menu) = menu {
        menu.draw(&mut grid);
    }
    // append the status row
    let columns = grid.columns;
    let blank = Cell {
        ch: ' ',
        fg: (255, 255, 255),
        bg: (0, 0, 0),
    };
    grid.cells.extend(std::iter::repeat(blank).take(columns));
    grid.rows += 1;
    let row = grid.rows - 1;
    grid.overlay_text(0, row, &status_line(state), Color::WHITE, None);
    grid
}

/// Runs the interactive loop until the user quits
pub fn run(config: &SessionConfig, mut state: AnimationState) -> Result<()> {
    let period = config.tick_period();
    let _guard = TerminalGuard::enter(&config.title)?;
    let (mut columns, mut rows) = terminal::size().context("failed to query terminal size")?;
    let mut widget = CartoonWidget::new(
        period,
        viewport_for(config, columns, rows),
        config.background,
    );
    let mut menu: Option<ContextMenu> = None;
    let mut next_tick = Instant::now() + period;
    let mut dirty = true;
    let mut stdout = io::stdout();

    tracing::info!(columns, rows, tick_ms = config.tick_ms, "terminal session started");

    loop {
        if dirty {
            let frame = widget.paint(&state);
            let grid = compose_screen(&frame, menu.as_ref(), &state);
            grid.write_to(&mut stdout, true)?;
            stdout.flush()?;
            dirty = false;
        }

        let timeout = next_tick.saturating_duration_since(Instant::now());
        if event::poll(timeout)? {
            let mut ctx = EventCtx::new();
            match event::read()? {
                Event::Key(key) => {
                    if let Some(outcome) = handle_key(key, &mut menu) {
                        match outcome {
                            KeyOutcome::Quit => ctx.submit_quit(),
                            KeyOutcome::Menu(item) => widget.menu(&mut ctx, item, &mut state),
                            KeyOutcome::Char(c) => widget.key_down(&mut ctx, c, &mut state),
                            KeyOutcome::Redraw => ctx.request_paint(),
                        }
                    }
                }
                Event::Mouse(mouse) => {
                    handle_mouse(mouse, &mut menu, &mut widget, &mut ctx, &mut state);
                    if ctx.menu_requested() {
                        menu = Some(ContextMenu::open(mouse.column, mouse.row, columns, rows));
                        ctx.request_paint();
                    }
                }
                Event::Resize(new_columns, new_rows) => {
                    (columns, rows) = (new_columns, new_rows);
                    menu = None;
                    let (width, height) = pixel_size(columns, rows);
                    widget.layout(&mut ctx, width, height);
                    execute!(stdout, Clear(ClearType::All))?;
                }
                _ => {}
            }
            if ctx.quit_requested() {
                tracing::info!(frames = widget.frames_painted(), "quit requested");
                return Ok(());
            }
            dirty |= ctx.paint_requested();
        }

        if Instant::now() >= next_tick {
            let mut ctx = EventCtx::new();
            widget.timer(&mut ctx, &mut state);
            let delay = ctx.timer().unwrap_or_else(|| {
                tracing::warn!("timer not re-armed, falling back to configured period");
                period
            });
            next_tick = Instant::now() + delay;
            dirty |= ctx.paint_requested();
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum KeyOutcome {
    Quit,
    Menu(MenuItem),
    Char(char),
    Redraw,
}

fn handle_key(key: KeyEvent, menu: &mut Option<ContextMenu>) -> Option<KeyOutcome> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(KeyOutcome::Quit);
    }
    if menu.is_some() {
        return match key.code {
            KeyCode::Esc => {
                *menu = None;
                Some(KeyOutcome::Redraw)
            }
            KeyCode::Char(c) => {
                let item = c.to_digit(10).and_then(MenuItem::from_number)?;
                *menu = None;
                Some(KeyOutcome::Menu(item))
            }
            _ => None,
        };
    }
    match key.code {
        KeyCode::Esc => Some(KeyOutcome::Quit),
        KeyCode::Char(c) => Some(KeyOutcome::Char(c)),
        _ => None,
    }
}

fn handle_mouse(
    mouse: MouseEvent,
    menu: &mut Option<ContextMenu>,
    widget: &mut CartoonWidget,
    ctx: &mut EventCtx,
    state: &mut AnimationState,
) {
    let button = match mouse.kind {
        MouseEventKind::Down(event::MouseButton::Left) => MouseButton::Left,
        MouseEventKind::Down(event::MouseButton::Right) => MouseButton::Right,
        MouseEventKind::Down(event::MouseButton::Middle) => MouseButton::Middle,
        _ => return,
    };

    if let Some(open) = menu.take() {
        // any click while the menu is open either picks an entry or dismisses it
        if let Some(item) = open.hit(mouse.column, mouse.row) {
            widget.menu(ctx, item, state);
        }
        ctx.request_paint();
        return;
    }
    widget.mouse_down(ctx, button, state);
}

/// Advances `ticks` ticks with the animation running, then writes one frame
/// sized `columns` x `rows` as ANSI art
pub fn render_still<W: Write>(
    out: &mut W,
    config: &SessionConfig,
    mut state: AnimationState,
    ticks: u32,
    columns: u16,
    rows: u16,
) -> Result<()> {
    let period = config.tick_period();
    state.running = true;
    for _ in 0..ticks {
        state.advance(period);
    }
    let mut widget = CartoonWidget::new(
        period,
        viewport_for(config, columns, rows),
        config.background,
    );
    let frame = widget.paint(&state);
    let mut grid = CellGrid::from_pixels(&frame.pixels);
    grid.overlay_labels(&frame.labels);
    grid.write_to(out, false).context("failed to write frame")?;
    out.flush()?;
    tracing::info!(ticks, body_scale = state.body_scale, "still frame written");
    Ok(())
}
