use crate::state::AnimationState;
use crate::vertex::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// Context menu entries, in display order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuItem {
    RedBalloons,
    GreenBalloons,
    BlueBalloons,
    ToggleFigureName,
}

impl MenuItem {
    pub const ALL: [MenuItem; 4] = [
        MenuItem::RedBalloons,
        MenuItem::GreenBalloons,
        MenuItem::BlueBalloons,
        MenuItem::ToggleFigureName,
    ];

    /// Looks up an entry by its 1-based menu number
    pub fn from_number(number: u32) -> Option<Self> {
        number
            .checked_sub(1)
            .and_then(|index| Self::ALL.get(index as usize).copied())
    }

    pub fn number(self) -> u32 {
        match self {
            MenuItem::RedBalloons => 1,
            MenuItem::GreenBalloons => 2,
            MenuItem::BlueBalloons => 3,
            MenuItem::ToggleFigureName => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuItem::RedBalloons => "Red Balloons",
            MenuItem::GreenBalloons => "Green Balloons",
            MenuItem::BlueBalloons => "Blue Balloons",
            MenuItem::ToggleFigureName => "Toggle Figure Name",
        }
    }
}

/// Applies a menu selection to the state
pub fn apply_menu(state: &mut AnimationState, item: MenuItem) {
    match item {
        MenuItem::RedBalloons => state.accent = Color::RED,
        MenuItem::GreenBalloons => state.accent = Color::GREEN,
        MenuItem::BlueBalloons => state.accent = Color::BLUE,
        MenuItem::ToggleFigureName => state.show_label = !state.show_label,
    }
    tracing::debug!(item = item.label(), "menu item applied");
}

/// Lines printed for the user at startup
pub fn instructions() -> [&'static str; 4] {
    [
        "Instructions for user interactions:",
        "1. Press 's' to start/stop the animation.",
        "2. Left click to start/stop the animation.",
        "3. Right click to open the menu. You can change the color of the balloons and toggle the figure name.",
    ]
}
