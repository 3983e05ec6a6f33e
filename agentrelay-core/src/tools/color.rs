use schemars::JsonSchema;
use serde::Deserialize;

use crate::tool::ToolResult;

pub const VALID_COLORS: [&str; 10] = [
    "red", "blue", "green", "yellow", "purple", "orange", "pink", "white", "black", "gray",
];

#[derive(Debug, Deserialize, JsonSchema)]
pub struct BackgroundColorInput {
    /// A color name (red, blue, green, ...) or a hex code such as `#FF5733`.
    pub color: String,
}

/// The frontend applies the color; this only validates and acknowledges it.
pub fn set_background_color(input: BackgroundColorInput) -> ToolResult {
    let color = input.color.trim();

    if is_named_color(color) || is_hex_color(color) {
        return ToolResult::text(format!("Background color changed to {}! 🎨", color));
    }

    ToolResult::text(format!(
        "Invalid color '{}'. Please use a color name ({}) or a hex code (e.g., #FF5733).",
        color,
        VALID_COLORS.join(", ")
    ))
}

fn is_named_color(color: &str) -> bool {
    VALID_COLORS
        .iter()
        .any(|valid| valid.eq_ignore_ascii_case(color))
}

fn is_hex_color(color: &str) -> bool {
    match color.strip_prefix('#') {
        Some(hex) => {
            (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(color: &str) -> String {
        set_background_color(BackgroundColorInput {
            color: color.to_string(),
        })
        .as_text()
    }

    #[test]
    fn test_named_colors_case_insensitive() {
        assert_eq!(set("Blue"), "Background color changed to Blue! 🎨");
        assert_eq!(set("gray"), "Background color changed to gray! 🎨");
    }

    #[test]
    fn test_hex_colors() {
        assert_eq!(set("#FF5733"), "Background color changed to #FF5733! 🎨");
        assert_eq!(set("#abc"), "Background color changed to #abc! 🎨");
        assert!(set("#GGGGGG").starts_with("Invalid color"));
        assert!(set("#12345").starts_with("Invalid color"));
    }

    #[test]
    fn test_invalid_color_lists_valid_names() {
        let text = set("chartreuse");
        assert!(text.starts_with("Invalid color 'chartreuse'"));
        assert!(text.contains("red, blue, green"));
    }
}
