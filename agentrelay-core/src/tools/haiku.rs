use rand::seq::SliceRandom;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tool::{ToolError, ToolResult};

pub const THEMES: [&str; 6] = ["nature", "technology", "seasons", "love", "wisdom", "time"];

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct HaikuInput {
    /// Optional theme, e.g. "nature", "technology" or "love". Picked at random when omitted.
    #[serde(default)]
    pub theme: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Haiku {
    pub title: String,
    pub lines: Vec<String>,
    pub theme: String,
}

pub fn create_haiku(input: HaikuInput) -> Result<ToolResult, ToolError> {
    let theme = match input.theme.map(|t| t.trim().to_string()) {
        Some(theme) if !theme.is_empty() => theme,
        _ => THEMES
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or("nature")
            .to_string(),
    };
    ToolResult::json(compose(theme))
}

pub(crate) fn compose(theme: String) -> Haiku {
    let (title, lines): (String, [&str; 3]) = match theme.to_lowercase().as_str() {
        "nature" => (
            "Nature's Whisper".to_string(),
            [
                "Morning dew glistens",
                "On petals soft as silk dreams",
                "Spring awakens earth",
            ],
        ),
        "technology" => (
            "Digital Dreams".to_string(),
            [
                "Code flows like water",
                "Binary thoughts crystallize",
                "Silicon wisdom",
            ],
        ),
        "love" => (
            "Heart's Echo".to_string(),
            [
                "Two hearts beat as one",
                "In rhythm with the cosmos",
                "Love transcends all time",
            ],
        ),
        _ => (
            format!("Thoughts on {}", title_case(&theme)),
            [
                "Moments drift like clouds",
                "Each breath a small infinity",
                "Life unfolds in verse",
            ],
        ),
    };

    Haiku {
        title,
        lines: lines.iter().map(|line| line.to_string()).collect(),
        theme,
    }
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_themes() {
        assert_eq!(compose("nature".into()).title, "Nature's Whisper");
        assert_eq!(compose("Technology".into()).title, "Digital Dreams");
        assert_eq!(compose("love".into()).lines[0], "Two hearts beat as one");
    }

    #[test]
    fn test_other_themes_get_generic_haiku() {
        let haiku = compose("rainy days".into());
        assert_eq!(haiku.title, "Thoughts on Rainy Days");
        assert_eq!(haiku.theme, "rainy days");
        assert_eq!(haiku.lines.len(), 3);
    }

    #[test]
    fn test_missing_theme_picks_a_known_one() {
        let result = create_haiku(HaikuInput::default()).unwrap();
        let ToolResult::Json(value) = result else {
            panic!("expected JSON result");
        };
        let theme = value["theme"].as_str().unwrap();
        assert!(THEMES.contains(&theme));
    }
}
