use eframe::egui::Color32;
use palette::Srgb;

// ---------------------------------------------------------------------------
// Named colour lookup
// ---------------------------------------------------------------------------

/// Used when a chart names a colour we cannot resolve.
pub const FALLBACK: Color32 = Color32::LIGHT_BLUE;

/// Resolve a CSS/SVG colour name (`"darkorange"`) or hex code (`"#CCCCCC"`).
pub fn parse_color(name: &str) -> Option<Color32> {
    let name = name.trim();
    let rgb: Srgb<u8> = if name.starts_with('#') {
        name.parse().ok()?
    } else {
        palette::named::from_str(&name.to_ascii_lowercase())?
    };
    Some(Color32::from_rgb(rgb.red, rgb.green, rgb.blue))
}

pub fn color_or_fallback(name: &str) -> Color32 {
    parse_color(name).unwrap_or_else(|| {
        log::debug!("Unknown colour '{name}', using fallback");
        FALLBACK
    })
}

// ---------------------------------------------------------------------------
// DisplayMetadata – how one chart is labelled
// ---------------------------------------------------------------------------

/// Title, axis labels and line colour for a single render call.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayMetadata {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub color: Color32,
}

impl DisplayMetadata {
    pub fn new(title: impl Into<String>, x_label: &str, y_label: &str, color: &str) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            color: color_or_fallback(color),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_names_resolve() {
        assert_eq!(parse_color("darkorange"), Some(Color32::from_rgb(255, 140, 0)));
        assert_eq!(parse_color("Crimson"), Some(Color32::from_rgb(220, 20, 60)));
        assert_eq!(parse_color("forestgreen"), Some(Color32::from_rgb(34, 139, 34)));
        assert_eq!(parse_color("deepskyblue"), Some(Color32::from_rgb(0, 191, 255)));
        assert_eq!(parse_color("violet"), Some(Color32::from_rgb(238, 130, 238)));
    }

    #[test]
    fn hex_codes_resolve() {
        assert_eq!(parse_color("#CCCCCC"), Some(Color32::from_rgb(204, 204, 204)));
        assert_eq!(parse_color("#2e8b57"), Some(Color32::from_rgb(46, 139, 87)));
    }

    #[test]
    fn unknown_colour_falls_back() {
        assert_eq!(parse_color("not-a-colour"), None);
        let meta = DisplayMetadata::new("t", "x", "y", "not-a-colour");
        assert_eq!(meta.color, FALLBACK);
    }
}
