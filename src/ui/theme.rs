use ratatui::style::Color;

/// Catppuccin Mocha color palette
mod palette {
    use super::Color;

    pub const MAUVE: Color = Color::Rgb(203, 166, 247);
    pub const RED: Color = Color::Rgb(243, 139, 168);
    pub const PEACH: Color = Color::Rgb(250, 179, 135);
    pub const YELLOW: Color = Color::Rgb(249, 226, 175);
    pub const GREEN: Color = Color::Rgb(166, 227, 161);
    pub const BLUE: Color = Color::Rgb(137, 180, 250);
    pub const LAVENDER: Color = Color::Rgb(180, 190, 254);

    pub const TEXT: Color = Color::Rgb(205, 214, 244);
    pub const SUBTEXT0: Color = Color::Rgb(166, 173, 200);
    pub const OVERLAY1: Color = Color::Rgb(127, 132, 156);
    pub const SURFACE1: Color = Color::Rgb(69, 71, 90);
    pub const SURFACE0: Color = Color::Rgb(49, 50, 68);
}

pub const BG_HIGHLIGHT: Color = palette::SURFACE0;

pub const TEXT: Color = palette::TEXT;
pub const TEXT_MUTED: Color = palette::SUBTEXT0;
pub const TEXT_DIM: Color = palette::OVERLAY1;

pub const BORDER: Color = palette::SURFACE1;

pub const ERROR: Color = palette::RED;
pub const ACCENT: Color = palette::MAUVE;
pub const KEY_HINT: Color = palette::LAVENDER;

/// Commit log
pub const AUTHOR: Color = palette::BLUE;
pub const SHA: Color = palette::PEACH;

/// Chart series
pub const CURRENT: Color = palette::GREEN;
pub const PREVIOUS: Color = palette::YELLOW;
