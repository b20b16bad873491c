//! # Fallback Headlines
//!
//! When live generation is unusable the pipeline answers from a static table of
//! archived headlines. The table is built once at startup and only read
//! afterwards, so it is shared behind an `Arc` without locking.
//!
//! Fallback records name an "(Archived)" outlet and carry a description that
//! says live updates are paused, so a reader can tell them apart from live
//! results.

use crate::{
    errors::FallbackError,
    topics::Category,
    types::{ArticleList, ArticleRecord},
};
use serde::Deserialize;
use std::collections::HashMap;

/// The description shared by every built-in fallback record.
pub const FALLBACK_DESCRIPTION: &str =
    "Live updates are currently paused due to high traffic. Trying to reconnect...";

/// Built-in sets: (category, archived outlet, headlines).
const BUILTIN_SETS: &[(Category, &str, [&str; 5])] = &[
    (
        Category::Politics,
        "The Hindu (Archived)",
        [
            "Parliament Session to Resume Next Week",
            "New Policy Announced for Urban Development",
            "Election Commission Reviews New Guidelines",
            "Local Leaders Discuss Infrastructure Projects",
            "Summit Talks Conclude with Key Agreements",
        ],
    ),
    (
        Category::Finance,
        "Economic Times (Archived)",
        [
            "Market Watch: Sensex Remains Stable",
            "Rupee Shows Slight Recovery Against Dollar",
            "Tech Stocks Rally After Global Trends",
            "New Tax Reforms Discussed by Experts",
            "Gold Prices See a Minor Dip Today",
        ],
    ),
    (
        Category::Sports,
        "ESPN (Archived)",
        [
            "Championship Finals Scheduled for Sunday",
            "National Team Announces New Squad",
            "Star Player Returns to Training Camp",
            "Record Attendance at Local Match",
            "Upcoming Tournament Venues Confirmed",
        ],
    ),
    (
        Category::Fashion,
        "Vogue (Archived)",
        [
            "Fashion Week: Sustainable Trends Take Over",
            "Top Designers Reveal Winter Collection",
            "Vintage Styles Making a Comeback",
            "New Fabric Technology Changes the Game",
            "Celebrity Styles from the Red Carpet",
        ],
    ),
    (
        Category::Tech,
        "Wired (Archived)",
        [
            "New AI Model Released by Tech Giant",
            "Smartphone Sales Hit Record Highs",
            "Cybersecurity Warning Issued for Businesses",
            "Breakthrough in Battery Technology Announced",
            "Space Mission Launches Successfully",
        ],
    ),
    (
        Category::General,
        "BBC News (Archived)",
        [
            "Global Markets Rally After Quarterly Reports",
            "Scientists Discover New Species in Amazon",
            "Major Breakthrough in Renewable Energy",
            "Health Officials Issue New Wellness Guidelines",
            "Education Summit Focuses on Digital Learning",
        ],
    ),
];

/// An immutable map from category to its fallback list.
///
/// Every table has a `General` set, which answers for categories without a
/// set of their own.
#[derive(Debug, Clone)]
pub struct FallbackTable {
    sets: HashMap<Category, ArticleList>,
    general: ArticleList,
}

/// One record as written in an operator-provided YAML table.
#[derive(Debug, Deserialize)]
struct FallbackEntry {
    title: String,
    source: String,
    description: String,
}

impl FallbackTable {
    /// The table compiled into the binary.
    pub fn builtin() -> Self {
        let mut sets: HashMap<Category, ArticleList> = BUILTIN_SETS
            .iter()
            .filter_map(|(category, source, titles)| {
                let records = titles
                    .iter()
                    .map(|title| ArticleRecord {
                        title: title.to_string(),
                        source: source.to_string(),
                        description: FALLBACK_DESCRIPTION.to_string(),
                        url: None,
                        image_url: None,
                    })
                    .collect();
                ArticleList::new(records).map(|list| (*category, list))
            })
            .collect();
        let general = sets.remove(&Category::General).unwrap_or_else(last_resort);
        Self { sets, general }
    }

    /// Loads a table from YAML: a map of category label (or client id) to a
    /// list of `{title, source, description}` records.
    ///
    /// The table must have a non-empty `General` set, and every record must
    /// have non-blank fields.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, FallbackError> {
        let raw: HashMap<String, Vec<FallbackEntry>> = serde_yaml::from_str(yaml)?;

        let mut sets = HashMap::new();
        for (name, entries) in raw {
            let category: Category = name
                .parse()
                .map_err(FallbackError::UnknownCategory)?;
            let records = entries
                .into_iter()
                .map(|entry| entry.into_record(category))
                .collect::<Result<Vec<_>, _>>()?;
            let list = ArticleList::new(records)
                .ok_or_else(|| FallbackError::EmptySet(category.label().to_string()))?;
            sets.insert(category, list);
        }

        let general = sets
            .remove(&Category::General)
            .ok_or(FallbackError::MissingGeneral)?;
        Ok(Self { sets, general })
    }

    /// The fallback list for `category`, or the `General` list if it has none.
    pub fn lookup(&self, category: Category) -> ArticleList {
        self.sets
            .get(&category)
            .unwrap_or(&self.general)
            .clone()
    }
}

impl Default for FallbackTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FallbackEntry {
    fn into_record(self, category: Category) -> Result<ArticleRecord, FallbackError> {
        let check = |value: String, field: &'static str| {
            let value = value.trim().to_string();
            if value.is_empty() {
                Err(FallbackError::BlankField {
                    category: category.label().to_string(),
                    field,
                })
            } else {
                Ok(value)
            }
        };
        Ok(ArticleRecord {
            title: check(self.title, "title")?,
            source: check(self.source, "source")?,
            description: check(self.description, "description")?,
            url: None,
            image_url: None,
        })
    }
}

/// A single placeholder record, used only if the built-in data were ever left
/// without a `General` set.
fn last_resort() -> ArticleList {
    ArticleList::single(ArticleRecord {
        title: "Headlines are temporarily unavailable".to_string(),
        source: "newsrelay".to_string(),
        description: FALLBACK_DESCRIPTION.to_string(),
        url: None,
        image_url: None,
    })
}
