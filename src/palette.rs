//! Category colors and the marker brightness gradient.

use std::collections::BTreeMap;

/// Master palette: category label -> base hex color. New categories only
/// need a row here.
pub const DEFAULT_TYPE_COLORS: &[(&str, &str)] = &[
    ("VEÍCULO 1", "#0608C2"),
    ("VEÍCULO 2", "#8F0606"),
    ("VEÍCULO 3", "#1D5F96"),
    ("ISCA 1", "#778504"),
    ("ISCA 2", "#63065D"),
    ("ISCA 3", "#2E7D32"),
    ("ESCOLTA", "#C42DAC"),
    ("SENSOR", "#FF8C00"),
    ("TRAVA_CILTRONC", "#469E92"),
];

/// Fallback for categories with no mapped color.
pub const NEUTRAL_COLOR: &str = "#808080";

/// Cycling palette for ad hoc checkpoints created in the browser.
pub const CHECKPOINT_COLORS: &[&str] = &[
    "#FF0000", "#00FF00", "#0000FF", "#FFFF00", "#FF00FF", "#00FFFF",
    "#FFA500", "#800080", "#008000", "#800000", "#008080", "#000080",
];

pub fn default_type_colors() -> BTreeMap<String, String> {
    DEFAULT_TYPE_COLORS
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Base color for a category, from the user mapping or the neutral gray.
pub fn type_color<'a>(name: &str, colors: &'a BTreeMap<String, String>) -> &'a str {
    colors.get(name).map(String::as_str).unwrap_or(NEUTRAL_COLOR)
}

/// Gradient position for point `index` of a group of `total` points.
/// First point of a multi-point group sits at 0.3, the last at 1.0.
pub fn gradient_factor(index: usize, total: usize) -> f64 {
    if total <= 1 {
        1.0
    } else {
        0.3 + 0.7 * (index as f64 / (total - 1) as f64)
    }
}

/// Blend a hex color toward white. `factor` 1.0 keeps the color unchanged,
/// smaller values lighten it.
pub fn adjust_brightness(hex_color: &str, factor: f64) -> String {
    let (r, g, b) = parse_hex(hex_color).unwrap_or((128, 128, 128));
    let blend = |c: u8| -> u8 {
        let c = c as f64;
        (c + (255.0 - c) * (1.0 - factor)).round().clamp(0.0, 255.0) as u8
    };
    format!("#{:02x}{:02x}{:02x}", blend(r), blend(g), blend(b))
}

/// Marker color: category base color lightened along the group gradient.
pub fn marker_color(
    name: &str,
    index: usize,
    total: usize,
    colors: &BTreeMap<String, String>,
) -> String {
    adjust_brightness(type_color(name, colors), gradient_factor(index, total))
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let h = hex.trim_start_matches('#');
    if h.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&h[0..2], 16).ok()?;
    let g = u8::from_str_radix(&h[2..4], 16).ok()?;
    let b = u8::from_str_radix(&h[4..6], 16).ok()?;
    Some((r, g, b))
}
