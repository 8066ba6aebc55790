//! Data models for the dashboard client.
//!
//! This module contains the core data structures shared by the loader,
//! the renderers and the orchestrator: years, aspects, word entries,
//! statistics and the current selection.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Identifier of a reporting period, e.g. `"2023"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Year(String);

impl Year {
    /// Surrounding whitespace is dropped.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_string())
    }

    /// Build a year from a JSON list entry. Strings and non-negative
    /// integers are accepted; anything else yields `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.trim().is_empty() => Some(Self(s.trim().to_string())),
            Value::Number(n) => n.as_u64().map(|n| Self(n.to_string())),
            _ => None,
        }
    }

    /// Non-empty and made of ASCII digits only.
    pub fn is_numeric_like(&self) -> bool {
        !self.0.is_empty() && self.0.chars().all(|c| c.is_ascii_digit())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A topical subcategory of complaints, scoped to a year.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Aspect(String);

/// Sentinel aspect value meaning "no filtering".
pub const ALL_ASPECTS: &str = "all";

impl Aspect {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The "all aspects" sentinel.
    pub fn all() -> Self {
        Self(ALL_ASPECTS.to_string())
    }

    pub fn is_all(&self) -> bool {
        self.0 == ALL_ASPECTS
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-readable label for option lists.
    pub fn label(&self) -> &str {
        if self.is_all() {
            "All Aspects"
        } else {
            &self.0
        }
    }
}

impl Default for Aspect {
    fn default() -> Self {
        Self::all()
    }
}

impl fmt::Display for Aspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sentiment polarity of a word list or counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Positive,
    Negative,
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Polarity::Positive => write!(f, "Positive"),
            Polarity::Negative => write!(f, "Negative"),
        }
    }
}

impl Polarity {
    pub const BOTH: [Polarity; 2] = [Polarity::Positive, Polarity::Negative];

    /// Returns an emoji representation of the polarity.
    pub fn emoji(&self) -> &'static str {
        match self {
            Polarity::Positive => "🟢",
            Polarity::Negative => "🔴",
        }
    }
}

/// A term and its visual emphasis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordEntry {
    pub text: String,
    /// Always `>= 0` once validated.
    pub weight: f64,
}

impl WordEntry {
    pub fn new(text: impl Into<String>, weight: f64) -> Self {
        Self {
            text: text.into(),
            weight,
        }
    }
}

/// Complaint counts for the current selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub total: u64,
    pub positive: u64,
    pub negative: u64,
}

impl Statistics {
    /// Read counts from a raw payload.
    ///
    /// Returns `None` when the payload is not a JSON object. Individual
    /// fields that are absent or not non-negative integers default to 0.
    pub fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let count = |key: &str| obj.get(key).and_then(Value::as_u64).unwrap_or(0);
        Some(Self {
            total: count("total"),
            positive: count("positive"),
            negative: count("negative"),
        })
    }

    pub fn count(&self, polarity: Polarity) -> u64 {
        match polarity {
            Polarity::Positive => self.positive,
            Polarity::Negative => self.negative,
        }
    }

    /// Percentage of `polarity` against the total, 0 when there is no data.
    pub fn share(&self, polarity: Polarity) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(polarity) as f64 / self.total as f64 * 100.0
    }

    /// The larger polarity; ties go to positive.
    pub fn dominant(&self) -> Polarity {
        if self.negative > self.positive {
            Polarity::Negative
        } else {
            Polarity::Positive
        }
    }
}

/// Combined payload of `/get_wordcloud_data/{year}/{aspect}`.
///
/// Fields stay raw so that the renderers can apply their own leniency rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordCloudData {
    #[serde(default)]
    pub statistics: Value,
    #[serde(default)]
    pub positive_words: Value,
    #[serde(default)]
    pub negative_words: Value,
}

impl WordCloudData {
    pub fn words(&self, polarity: Polarity) -> &Value {
        match polarity {
            Polarity::Positive => &self.positive_words,
            Polarity::Negative => &self.negative_words,
        }
    }
}

/// The current `(year, aspect)` pair. Replaced wholesale on every change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub year: Option<Year>,
    pub aspect: Aspect,
}

impl Selection {
    /// Selection for a freshly chosen year, aspect reset to "all".
    pub fn for_year(year: Year) -> Self {
        Self {
            year: Some(year),
            aspect: Aspect::all(),
        }
    }

    pub fn with_aspect(&self, aspect: Aspect) -> Self {
        Self {
            year: self.year.clone(),
            aspect,
        }
    }
}

/// One entry of a selection list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl From<&Year> for SelectOption {
    fn from(year: &Year) -> Self {
        Self {
            value: year.to_string(),
            label: year.to_string(),
        }
    }
}

impl From<&Aspect> for SelectOption {
    fn from(aspect: &Aspect) -> Self {
        Self {
            value: aspect.to_string(),
            label: aspect.label().to_string(),
        }
    }
}
