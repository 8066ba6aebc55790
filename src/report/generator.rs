//! Markdown and JSON dashboard reports.
//!
//! A report captures what the dashboard currently shows: the selection,
//! the counters and the words behind both clouds.

use crate::dashboard::{AppliedView, Dashboard};
use crate::models::{Aspect, Polarity, Selection, Statistics, WordEntry, Year};
use crate::render::CloudOutcome;
use crate::surface::SurfaceSnapshot;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of words listed per polarity in Markdown reports.
const TOP_WORDS: usize = 15;

/// Metadata about the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Backend the data came from.
    pub backend_url: String,
    pub generated_at: DateTime<Utc>,
    /// When the shown dataset was applied, if any.
    pub data_loaded_at: Option<DateTime<Utc>>,
    pub available_years: Vec<Year>,
    pub available_aspects: Vec<Aspect>,
}

/// Words behind one cloud, or the placeholder shown instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloudSummary {
    pub words: Vec<WordEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl From<&CloudOutcome> for CloudSummary {
    fn from(outcome: &CloudOutcome) -> Self {
        match outcome {
            CloudOutcome::Rendered(words) => {
                let mut words = words.clone();
                words.sort_by(|a, b| b.weight.total_cmp(&a.weight));
                Self {
                    words,
                    placeholder: None,
                }
            }
            CloudOutcome::Placeholder(message) => Self {
                words: Vec::new(),
                placeholder: Some(message.to_string()),
            },
        }
    }
}

/// The complete dashboard report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub selection: Selection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<Statistics>,
    pub positive: CloudSummary,
    pub negative: CloudSummary,
    /// Error banners visible when the report was taken.
    pub notices: Vec<String>,
    pub surface: SurfaceSnapshot,
}

impl Report {
    /// Capture the dashboard and its surface.
    pub fn capture(dashboard: &Dashboard, snapshot: SurfaceSnapshot, backend_url: &str) -> Self {
        let applied = dashboard.applied();
        let metadata = ReportMetadata {
            backend_url: backend_url.to_string(),
            generated_at: Utc::now(),
            data_loaded_at: applied.as_ref().map(|a| a.applied_at),
            available_years: dashboard.years(),
            available_aspects: dashboard.aspects(),
        };

        Self::from_parts(metadata, dashboard.selection(), applied.as_ref(), snapshot)
    }

    pub fn from_parts(
        metadata: ReportMetadata,
        selection: Selection,
        applied: Option<&AppliedView>,
        surface: SurfaceSnapshot,
    ) -> Self {
        let cloud = |polarity| {
            applied
                .map(|a| CloudSummary::from(a.cloud(polarity)))
                .unwrap_or_default()
        };

        Self {
            metadata,
            selection,
            statistics: applied.and_then(|a| a.statistics),
            positive: cloud(Polarity::Positive),
            negative: cloud(Polarity::Negative),
            notices: surface.banners.iter().map(|b| b.message.clone()).collect(),
            surface,
        }
    }

    pub fn cloud(&self, polarity: Polarity) -> &CloudSummary {
        match polarity {
            Polarity::Positive => &self.positive,
            Polarity::Negative => &self.negative,
        }
    }
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let mut output = String::new();

    output.push_str("# Complaint Sentiment Report\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_selection_section(&report.selection));
    output.push_str(&generate_statistics_section(report.statistics.as_ref()));
    output.push_str(&generate_words_section(report));
    output.push_str(&generate_notices_section(&report.notices));
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Backend:** {}\n", metadata.backend_url));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if let Some(loaded) = metadata.data_loaded_at {
        section.push_str(&format!(
            "- **Data Loaded:** {}\n",
            loaded.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }
    section.push_str(&format!(
        "- **Available Years:** {}\n",
        join_or_none(metadata.available_years.iter().map(Year::as_str))
    ));
    section.push_str(&format!(
        "- **Aspects for Year:** {}\n",
        join_or_none(metadata.available_aspects.iter().map(Aspect::as_str))
    ));
    section.push('\n');

    section
}

fn generate_selection_section(selection: &Selection) -> String {
    let year = selection
        .year
        .as_ref()
        .map(Year::as_str)
        .unwrap_or("(none)");
    format!(
        "## Selection\n\n- **Year:** {}\n- **Aspect:** {}\n\n",
        year,
        selection.aspect.label()
    )
}

/// Generate the statistics section.
fn generate_statistics_section(statistics: Option<&Statistics>) -> String {
    let mut section = String::new();

    section.push_str("## Statistics\n\n");

    let Some(stats) = statistics else {
        section.push_str("No statistics available.\n\n");
        return section;
    };

    section.push_str(&format!(
        "| Total | {} Positive | {} Negative |\n",
        Polarity::Positive.emoji(),
        Polarity::Negative.emoji()
    ));
    section.push_str("|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| **{}** | {} ({:.2}%) | {} ({:.2}%) |\n\n",
        stats.total,
        stats.positive,
        stats.share(Polarity::Positive),
        stats.negative,
        stats.share(Polarity::Negative)
    ));

    if stats.total > 0 {
        let dominant = stats.dominant();
        section.push_str(&format!(
            "Sentiment is predominantly **{}** ({:.2}%).\n\n",
            dominant,
            stats.share(dominant)
        ));
    }

    section
}

/// Generate the top words section for both polarities.
fn generate_words_section(report: &Report) -> String {
    let mut section = String::new();

    section.push_str("## Top Words\n\n");

    for polarity in Polarity::BOTH {
        let cloud = report.cloud(polarity);
        section.push_str(&format!("### {} {}\n\n", polarity.emoji(), polarity));

        if let Some(ref placeholder) = cloud.placeholder {
            section.push_str(&format!("*{}*\n\n", placeholder));
            continue;
        }
        if cloud.words.is_empty() {
            section.push_str("*No data loaded*\n\n");
            continue;
        }

        section.push_str("| # | Word | Weight |\n");
        section.push_str("|:---:|:---|:---:|\n");
        for (i, word) in cloud.words.iter().take(TOP_WORDS).enumerate() {
            section.push_str(&format!("| {} | {} | {} |\n", i + 1, word.text, word.weight));
        }
        section.push('\n');
    }

    section
}

fn generate_notices_section(notices: &[String]) -> String {
    if notices.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    section.push_str("## Notices\n\n");
    for notice in notices {
        section.push_str(&format!("> ⚠️ {}\n", notice));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    "---\n\n*Report generated by complaint-cloud*\n".to_string()
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

fn join_or_none<'a>(items: impl Iterator<Item = &'a str>) -> String {
    let joined: Vec<&str> = items.collect();
    if joined.is_empty() {
        "(none)".to_string()
    } else {
        joined.join(", ")
    }
}
