//! Theme color parsing shared by the HTML report and the viewer.

use ratatui::style::Color;

/// RGB color (0-255 per channel)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// `#rrggbb` notation
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Parse hex color string (e.g., "#2ecc71" or "2ecc71")
pub fn parse_hex(s: &str) -> Result<Rgb, String> {
    let s = s.trim().trim_start_matches('#');
    if s.len() != 6 || !s.is_ascii() {
        return Err(format!(
            "invalid hex color: expected 6 characters, got {}",
            s.chars().count()
        ));
    }

    let r = u8::from_str_radix(&s[0..2], 16)
        .map_err(|_| format!("invalid hex color: bad red component in '{}'", s))?;
    let g = u8::from_str_radix(&s[2..4], 16)
        .map_err(|_| format!("invalid hex color: bad green component in '{}'", s))?;
    let b = u8::from_str_radix(&s[4..6], 16)
        .map_err(|_| format!("invalid hex color: bad blue component in '{}'", s))?;

    Ok(Rgb { r, g, b })
}

/// Parse ANSI color name to ratatui Color
pub fn parse_ansi_name(name: &str) -> Option<Color> {
    match name.to_lowercase().replace('-', "_").as_str() {
        "default" | "reset" => Some(Color::Reset),
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "gray" | "grey" => Some(Color::Gray),
        "dark_gray" | "dark_grey" | "darkgray" | "darkgrey" => Some(Color::DarkGray),
        "light_red" | "lightred" => Some(Color::LightRed),
        "light_green" | "lightgreen" => Some(Color::LightGreen),
        "light_yellow" | "lightyellow" => Some(Color::LightYellow),
        "light_blue" | "lightblue" => Some(Color::LightBlue),
        "light_magenta" | "lightmagenta" => Some(Color::LightMagenta),
        "light_cyan" | "lightcyan" => Some(Color::LightCyan),
        "white" => Some(Color::White),
        _ => None,
    }
}

/// Resolve a color string: hex or ANSI name
pub fn resolve_color(value: &str) -> Option<Color> {
    let value = value.trim();
    if value.starts_with('#') {
        return parse_hex(value)
            .ok()
            .map(|rgb| Color::Rgb(rgb.r, rgb.g, rgb.b));
    }
    parse_ansi_name(value)
}

/// RGB value used when a terminal color has to be printed on paper.
/// Returns None for colors without a fixed value (reset, palette indices).
pub fn color_to_rgb(color: Color) -> Option<Rgb> {
    let (r, g, b) = match color {
        Color::Rgb(r, g, b) => (r, g, b),
        Color::Black => (0x00, 0x00, 0x00),
        Color::Red => (0xff, 0x00, 0x00),
        Color::Green => (0x00, 0x80, 0x00),
        Color::Yellow => (0xb8, 0x86, 0x0b),
        Color::Blue => (0x00, 0x00, 0xff),
        Color::Magenta => (0xff, 0x00, 0xff),
        Color::Cyan => (0x00, 0x8b, 0x8b),
        Color::Gray => (0x80, 0x80, 0x80),
        Color::DarkGray => (0x40, 0x40, 0x40),
        Color::LightRed => (0xff, 0x66, 0x66),
        Color::LightGreen => (0x90, 0xee, 0x90),
        Color::LightYellow => (0xff, 0xff, 0xe0),
        Color::LightBlue => (0xad, 0xd8, 0xe6),
        Color::LightMagenta => (0xee, 0x82, 0xee),
        Color::LightCyan => (0xe0, 0xff, 0xff),
        Color::White => (0xff, 0xff, 0xff),
        _ => return None,
    };
    Some(Rgb { r, g, b })
}

/// CSS value for a theme color
pub fn css_color(color: Color) -> String {
    color_to_rgb(color)
        .map(Rgb::to_hex)
        .unwrap_or_else(|| "inherit".to_string())
}
