use ratatui::style::Color;

// Backgrounds
pub const BG_DARK: Color = Color::Rgb(12, 18, 24);
pub const BG_BAR: Color = Color::Rgb(17, 25, 33);
pub const BG_SURFACE: Color = Color::Rgb(22, 33, 43);
pub const BG_HIGHLIGHT: Color = Color::Rgb(30, 48, 60);

// Primary accent (portal teal)
pub const ACCENT: Color = Color::Rgb(0, 150, 136);
pub const ACCENT_DIM: Color = Color::Rgb(0, 100, 92);

// Text
pub const TEXT: Color = Color::Rgb(222, 226, 230);
pub const TEXT_DIM: Color = Color::Rgb(134, 142, 150);
pub const TEXT_MUTED: Color = Color::Rgb(80, 90, 100);

// Semantic
pub const GREEN: Color = Color::Rgb(52, 211, 153);
pub const ORANGE: Color = Color::Rgb(251, 146, 60);
pub const RED: Color = Color::Rgb(248, 113, 113);
pub const YELLOW: Color = Color::Rgb(251, 191, 36);
pub const BLUE: Color = Color::Rgb(96, 165, 250);
