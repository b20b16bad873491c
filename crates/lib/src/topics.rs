//! # Topic Categories
//!
//! The relay knows a small, closed set of news categories. Each one carries the
//! id the browser client uses for its tabs, the outlets the prompt should
//! target, and the outlet name records fall back to when the generator omits
//! one. Free-form topics are mapped onto a category by keyword.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Politics,
    Finance,
    Tech,
    Sports,
    International,
    Fashion,
    General,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Politics,
        Category::Finance,
        Category::Tech,
        Category::Sports,
        Category::International,
        Category::Fashion,
        Category::General,
    ];

    /// The id used by the browser client's tab buttons.
    pub fn id(self) -> &'static str {
        match self {
            Category::Politics => "indian-politics",
            Category::Finance => "finance",
            Category::Tech => "tech",
            Category::Sports => "sport",
            Category::International => "international",
            Category::Fashion => "fashion",
            Category::General => "general",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Politics => "Politics",
            Category::Finance => "Finance",
            Category::Tech => "Tech",
            Category::Sports => "Sports",
            Category::International => "International",
            Category::Fashion => "Fashion",
            Category::General => "General",
        }
    }

    /// The outlet name shown on a record when the generator leaves `source` blank.
    pub fn display_source(self) -> &'static str {
        match self {
            Category::Politics => "The Hindu",
            Category::Finance => "The Economic Times",
            Category::Tech => "Tech Sources",
            Category::Sports => "Sports News",
            Category::International => "World News",
            Category::Fashion => "Vogue",
            Category::General => "News",
        }
    }

    /// The outlets the prompt asks the generator to draw from.
    pub fn default_sources(self) -> &'static [&'static str] {
        match self {
            Category::Politics => &["The Hindu"],
            Category::Finance => &["The Economic Times", "Mint"],
            Category::Tech => &["Wired", "TechCrunch"],
            Category::Sports => &["ESPN", "Cricbuzz"],
            Category::International => &["BBC", "Reuters"],
            Category::Fashion => &["Vogue"],
            Category::General => &[],
        }
    }

    /// Maps free text (a tab id, a label, or a whole prompt) onto a category.
    ///
    /// Matching is a case-insensitive keyword search, checked in a fixed order so
    /// that text mentioning several categories resolves predictably. Anything
    /// unrecognized is `General`.
    pub fn detect(text: &str) -> Category {
        let text = text.to_lowercase();

        if contains_any(&text, &["politic"]) {
            Category::Politics
        } else if contains_any(&text, &["sport"]) {
            Category::Sports
        } else if contains_any(&text, &["financ", "market", "business"]) {
            Category::Finance
        } else if contains_any(&text, &["tech"]) {
            Category::Tech
        } else if contains_any(&text, &["fashion"]) {
            Category::Fashion
        } else if contains_any(&text, &["international", "world"]) {
            Category::International
        } else {
            Category::General
        }
    }
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| text.contains(n))
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Exact (case-insensitive) match on a label or client id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s) || c.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_client_tab_ids() {
        assert_eq!(Category::detect("indian-politics"), Category::Politics);
        assert_eq!(Category::detect("finance"), Category::Finance);
        assert_eq!(Category::detect("tech"), Category::Tech);
        assert_eq!(Category::detect("sport"), Category::Sports);
        assert_eq!(Category::detect("international"), Category::International);
        assert_eq!(Category::detect("fashion"), Category::Fashion);
    }

    #[test]
    fn detects_topic_inside_prompt_text() {
        let prompt = "Topic: finance from The Economic Times, Mint. Task: List 5 distinct news headlines.";
        assert_eq!(Category::detect(prompt), Category::Finance);
        assert_eq!(Category::detect("Latest SPORTS scores"), Category::Sports);
    }

    #[test]
    fn unknown_topics_are_general() {
        assert_eq!(Category::detect("gardening"), Category::General);
        assert_eq!(Category::detect(""), Category::General);
    }

    #[test]
    fn parses_labels_and_ids() {
        assert_eq!("Finance".parse::<Category>(), Ok(Category::Finance));
        assert_eq!("indian-politics".parse::<Category>(), Ok(Category::Politics));
        assert_eq!(" general ".parse::<Category>(), Ok(Category::General));
        assert!("Weather".parse::<Category>().is_err());
    }
}
