//! Colours shared by every view

use ratatui::style::Color;

/// Titles and key hints
pub const ACCENT: Color = Color::Rgb(91, 206, 250);
/// Panel borders
pub const BORDER: Color = Color::Rgb(130, 130, 140);
/// Selected menu row background
pub const SEL_BG: Color = Color::Rgb(35, 45, 60);
pub const SUCCESS: Color = Color::Rgb(120, 200, 120);
pub const FAILURE: Color = Color::Rgb(230, 100, 100);
/// Secondary text
pub const DIM: Color = Color::Rgb(130, 130, 140);
