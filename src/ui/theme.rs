use ratatui::style::Color;

// Small dark palette with a green accent. Prefer adding new roles here
// instead of sprinkling colors through the UI.
pub const BG: Color = Color::Rgb(11, 13, 16);
pub const SURFACE: Color = Color::Rgb(17, 21, 27);
pub const BAR_BG: Color = Color::Rgb(14, 18, 24);

pub const FG: Color = Color::Rgb(229, 231, 235);
pub const MUTED: Color = Color::Rgb(156, 163, 175);
pub const DIM: Color = Color::Rgb(107, 114, 128);
pub const BORDER: Color = Color::Rgb(55, 65, 81);

pub const ACCENT: Color = Color::Rgb(74, 222, 128);
pub const ACCENT_BG: Color = Color::Rgb(16, 44, 26);

pub const ERROR: Color = Color::Rgb(248, 113, 113);

// Heatmap intensity ramp, level 0 (no commits) to 3 (three or more).
pub const HEAT: [Color; 4] = [
    Color::Rgb(30, 36, 44),
    Color::Rgb(22, 101, 52),
    Color::Rgb(34, 160, 78),
    Color::Rgb(74, 222, 128),
];
