use crate::constants::NEUTRAL_THEME;
use glam::Vec3;

/// What the catalog hands the engine for one showcase. Read once at scene
/// construction; theme colour changes go through `Scene::set_theme_color`.
#[derive(Clone, Debug, PartialEq)]
pub struct ProductDescriptor {
    pub name: String,
    pub image_url: String,
    pub theme_color: Vec3,
    pub description_summary: String,
}

impl ProductDescriptor {
    /// Builds a descriptor from a CSS-style hex theme colour. Unparseable
    /// colours fall back to neutral grey.
    pub fn new(
        name: impl Into<String>,
        image_url: impl Into<String>,
        theme_hex: &str,
        description_summary: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let theme_color = parse_hex_color(theme_hex).unwrap_or_else(|| {
            log::warn!("[product] '{}': bad theme colour {:?}, using neutral", name, theme_hex);
            Vec3::from(NEUTRAL_THEME)
        });
        Self {
            name,
            image_url: image_url.into(),
            theme_color,
            description_summary: description_summary.into(),
        }
    }
}

/// `#RRGGBB`, `RRGGBB`, `#RGB` or `RGB` to linear-ish \[0, 1\] RGB.
pub fn parse_hex_color(s: &str) -> Option<Vec3> {
    let hex = s.trim().trim_start_matches('#');
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |v: u8| v as f32 / 255.0;
    match hex.len() {
        6 => {
            let v = u32::from_str_radix(hex, 16).ok()?;
            Some(Vec3::new(
                channel((v >> 16) as u8),
                channel((v >> 8) as u8),
                channel(v as u8),
            ))
        }
        3 => {
            let v = u16::from_str_radix(hex, 16).ok()?;
            let expand = |n: u16| ((n & 0xF) as u8) * 17;
            Some(Vec3::new(
                channel(expand(v >> 8)),
                channel(expand(v >> 4)),
                channel(expand(v)),
            ))
        }
        _ => None,
    }
}
