use ratatui::style::Color;

/// Colors of the landing page, on a dark terminal background
#[derive(Debug, Clone)]
pub struct Theme {
    pub bg: Color,
    /// Cards, code window and the scrolled navbar
    pub surface: Color,
    pub fg: Color,
    pub heading: Color,
    pub muted: Color,
    pub border: Color,
    pub accent: Color,
    pub accent_fg: Color,
    pub success: Color,
    pub error: Color,
    pub code: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bg: Color::Rgb(0x0f, 0x17, 0x2a),
            surface: Color::Rgb(0x1e, 0x29, 0x3b),
            fg: Color::Rgb(0xcb, 0xd5, 0xe1),
            heading: Color::Rgb(0xf8, 0xfa, 0xfc),
            muted: Color::Rgb(0x64, 0x74, 0x8b),
            border: Color::Rgb(0x33, 0x41, 0x55),
            accent: Color::Rgb(0x63, 0x66, 0xf1),
            accent_fg: Color::Rgb(0xff, 0xff, 0xff),
            success: Color::Rgb(0x10, 0xb9, 0x81),
            error: Color::Rgb(0xef, 0x44, 0x44),
            code: Color::Rgb(0xa5, 0xf3, 0xfc),
        }
    }
}

impl Theme {
    /// `color` drawn at `opacity` over the page background
    pub fn fade(&self, color: Color, opacity: f64) -> Color {
        blend(self.bg, color, opacity)
    }
}

/// Mix `from` towards `to`; non-RGB colors snap at the halfway point
pub fn blend(from: Color, to: Color, t: f64) -> Color {
    let t = t.clamp(0.0, 1.0);
    match (from, to) {
        (Color::Rgb(r0, g0, b0), Color::Rgb(r1, g1, b1)) => {
            let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
            Color::Rgb(mix(r0, r1), mix(g0, g1), mix(b0, b1))
        }
        _ if t < 0.5 => from,
        _ => to,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_endpoints_and_midpoint() {
        let black = Color::Rgb(0, 0, 0);
        let white = Color::Rgb(255, 255, 255);
        assert_eq!(blend(black, white, 0.0), black);
        assert_eq!(blend(black, white, 1.0), white);
        assert_eq!(blend(black, white, 0.5), Color::Rgb(128, 128, 128));
        assert_eq!(blend(black, white, 3.0), white);
    }

    #[test]
    fn test_blend_named_colors_snap() {
        assert_eq!(blend(Color::Black, Color::White, 0.4), Color::Black);
        assert_eq!(blend(Color::Black, Color::White, 0.6), Color::White);
    }

    #[test]
    fn test_fade_full_opacity_keeps_color() {
        let theme = Theme::default();
        assert_eq!(theme.fade(theme.success, 1.0), theme.success);
        assert_eq!(theme.fade(theme.success, 0.0), theme.bg);
    }
}
