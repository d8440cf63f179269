// SPDX-License-Identifier: GPL-3.0-only
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of store categories offered by the publish form.
///
/// Remote documents carry the category as a plain string and are not
/// validated against this set on read (`Listing::category` is pass-through);
/// the enum exists to enumerate filter options and to validate publish input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Games,
    Social,
    Tools,
    Entertainment,
    Education,
    Productivity,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Games,
        Category::Social,
        Category::Tools,
        Category::Entertainment,
        Category::Education,
        Category::Productivity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Games => "Games",
            Category::Social => "Social",
            Category::Tools => "Tools",
            Category::Entertainment => "Entertainment",
            Category::Education => "Education",
            Category::Productivity => "Productivity",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown category: {}", s))
    }
}

/// Category selection for the filtered view. "All" is the sentinel that
/// disables category matching entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Category(String),
}

impl CategoryFilter {
    /// Parse a raw filter value. An absent/empty value and the literal
    /// "All" both select the unfiltered view; anything else is matched
    /// verbatim against listing categories.
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() || raw == "All" {
            CategoryFilter::All
        } else {
            CategoryFilter::Category(raw.to_string())
        }
    }

    pub fn matches(&self, listing: &Listing) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Category(c) => listing.category == *c,
        }
    }
}

/// One published application, as stored in the remote listing collection.
///
/// Field names follow the remote document schema (camelCase). Every field
/// except `featured` is written by the publish workflow; `id` and
/// `created_at` are assigned by the remote store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// Remote-assigned identifier, unique within a snapshot
    pub id: String,

    /// Display name of the application
    pub name: String,

    /// Developer or studio name
    pub developer: String,

    /// Free-text store description
    pub description: String,

    /// Category string; usually one of `Category::ALL` but not validated
    pub category: String,

    /// Icon image URL
    pub icon_url: String,

    /// Binary download URL
    pub apk_url: String,

    /// Human-readable package size, e.g. "24.5 MB"
    pub size: String,

    /// Store rating, one decimal place
    pub rating: f64,

    /// Human-readable download count, e.g. "10k+"
    pub downloads: String,

    /// Server-assigned creation timestamp, the collection's sole sort key
    /// (descending)
    pub created_at: DateTime<Utc>,

    /// Present in the document schema but not consulted by the featured
    /// view, which slices the newest listings positionally instead
    #[serde(rename = "isFeatured", default)]
    pub featured: bool,
}
