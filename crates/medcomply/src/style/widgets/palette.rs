//! Color palette.

use iced::Color;

/// Application color palette.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    // Brand
    pub primary: Color,
    pub primary_hover: Color,
    pub primary_pressed: Color,

    // Surfaces
    pub surface: Color,
    pub surface_sunken: Color,
    pub background: Color,

    // Text
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub text_on_primary: Color,

    // Outcomes
    pub flagged: Color,
    pub flagged_tint: Color,
    pub clean: Color,
    pub error: Color,
    pub error_tint: Color,

    // States
    pub selected: Color,
    pub selected_border: Color,
    pub hover: Color,

    // Borders
    pub border_subtle: Color,
    pub border_medium: Color,

    pub shadow: Color,
}

impl Palette {
    /// Light clinical palette.
    #[must_use]
    pub const fn light() -> Self {
        Self {
            primary: Color::from_rgb(0.0, 0.50, 0.55),
            primary_hover: Color::from_rgb(0.10, 0.60, 0.64),
            primary_pressed: Color::from_rgb(0.0, 0.40, 0.44),

            surface: Color::WHITE,
            surface_sunken: Color::from_rgb(0.96, 0.97, 0.975),
            background: Color::from_rgb(0.94, 0.955, 0.96),

            text_primary: Color::from_rgb(0.10, 0.13, 0.16),
            text_secondary: Color::from_rgb(0.38, 0.43, 0.48),
            text_muted: Color::from_rgb(0.58, 0.62, 0.66),
            text_on_primary: Color::WHITE,

            flagged: Color::from_rgb(0.78, 0.36, 0.0),
            flagged_tint: Color::from_rgb(1.0, 0.95, 0.88),
            clean: Color::from_rgb(0.16, 0.58, 0.32),
            error: Color::from_rgb(0.80, 0.16, 0.20),
            error_tint: Color::from_rgb(1.0, 0.93, 0.93),

            selected: Color::from_rgb(0.89, 0.96, 0.96),
            selected_border: Color::from_rgb(0.0, 0.50, 0.55),
            hover: Color::from_rgb(0.95, 0.97, 0.97),

            border_subtle: Color::from_rgb(0.89, 0.91, 0.92),
            border_medium: Color::from_rgb(0.80, 0.83, 0.85),

            shadow: Color::from_rgba(0.0, 0.0, 0.0, 0.05),
        }
    }
}

/// Active palette.
#[must_use]
pub const fn current() -> Palette {
    Palette::light()
}
