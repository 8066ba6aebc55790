//! Data loading from the dashboard backend.
//!
//! The loader validates inputs before any request is sent, builds the
//! endpoint paths, and checks the shape of each response. It never
//! touches the surface; routing results is the orchestrator's job.

pub mod transport;

pub use transport::{HttpTransport, Transport, TransportConfig};

use crate::error::{DashboardError, Result};
use crate::models::{Aspect, WordCloudData, Year, ALL_ASPECTS};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

pub const YEARS_PATH: &str = "/get_available_years";

/// Client for the three dashboard endpoints.
#[derive(Clone)]
pub struct DataLoader {
    transport: Arc<dyn Transport>,
}

impl DataLoader {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Fetch the available reporting years.
    pub async fn fetch_years(&self) -> Result<Vec<Year>> {
        let body = self.transport.get_json(YEARS_PATH).await?;
        let entries = list_field(&body, "years")?;

        let years: Vec<Year> = entries
            .iter()
            .filter_map(|entry| {
                let year = Year::from_json(entry);
                if year.is_none() {
                    warn!("Skipping malformed year entry: {}", entry);
                }
                year
            })
            .collect();

        debug!("Fetched {} years", years.len());
        Ok(years)
    }

    /// Fetch the aspects available for `year`.
    ///
    /// A blank or non-numeric year is rejected without a request.
    pub async fn fetch_aspects(&self, year: &Year) -> Result<Vec<Aspect>> {
        if !year.is_numeric_like() {
            return Err(DashboardError::Validation(format!(
                "Invalid year identifier: {:?}",
                year.as_str()
            )));
        }

        let path = aspects_path(year);
        let body = self.transport.get_json(&path).await?;
        let entries = list_field(&body, "aspects")?;

        let aspects: Vec<Aspect> = entries
            .iter()
            .filter_map(|entry| match entry.as_str().map(str::trim) {
                Some(s) if !s.is_empty() && s != ALL_ASPECTS => Some(Aspect::new(s)),
                Some(_) => None,
                None => {
                    warn!("Skipping malformed aspect entry: {}", entry);
                    None
                }
            })
            .collect();

        debug!("Fetched {} aspects for {}", aspects.len(), year);
        Ok(aspects)
    }

    /// Fetch statistics and word lists for a year/aspect pair.
    ///
    /// A body that is not an object yields empty data, so both clouds fall
    /// back to their placeholders.
    pub async fn fetch_wordcloud_data(&self, year: &Year, aspect: &Aspect) -> Result<WordCloudData> {
        if year.as_str().trim().is_empty() {
            return Err(DashboardError::Validation("Year is required".to_string()));
        }
        if aspect.as_str().trim().is_empty() {
            return Err(DashboardError::Validation("Aspect is required".to_string()));
        }

        let path = wordcloud_path(year, aspect);
        let body = self.transport.get_json(&path).await?;

        if !body.is_object() {
            warn!(
                "Expected an object from {}, got {}; rendering empty data",
                path,
                json_kind(&body)
            );
            return Ok(WordCloudData::default());
        }

        serde_json::from_value(body)
            .map_err(|e| DashboardError::Validation(format!("Malformed word cloud payload: {}", e)))
    }
}

/// `/get_aspects/{year}` with the year percent-encoded.
pub fn aspects_path(year: &Year) -> String {
    format!("/get_aspects/{}", urlencoding::encode(year.as_str()))
}

/// `/get_wordcloud_data/{year}/{aspect}` with both segments percent-encoded.
pub fn wordcloud_path(year: &Year, aspect: &Aspect) -> String {
    format!(
        "/get_wordcloud_data/{}/{}",
        urlencoding::encode(year.as_str()),
        urlencoding::encode(aspect.as_str())
    )
}

fn list_field<'a>(body: &'a Value, field: &str) -> Result<&'a Vec<Value>> {
    body.get(field).and_then(Value::as_array).ok_or_else(|| {
        DashboardError::Parse(format!("Response is missing a `{}` array", field))
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeTransport;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    fn loader_with(transport: &Arc<FakeTransport>) -> DataLoader {
        DataLoader::new(transport.clone())
    }

    #[tokio::test]
    async fn test_fetch_years_accepts_numbers_and_strings() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond(YEARS_PATH, json!({"years": [2023, "2022", null, {"x": 1}]}));

        let years = loader_with(&transport).fetch_years().await.unwrap();
        assert_eq!(years, vec![Year::new("2023"), Year::new("2022")]);
    }

    #[tokio::test]
    async fn test_fetch_years_missing_field() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond(YEARS_PATH, json!({"data": []}));

        let err = loader_with(&transport).fetch_years().await.unwrap_err();
        assert!(matches!(err, DashboardError::Parse(_)));
        assert!(err.is_user_visible());
    }

    #[tokio::test]
    async fn test_fetch_years_propagates_transport_errors() {
        let transport = Arc::new(FakeTransport::new());
        transport.fail(YEARS_PATH, DashboardError::Parse("not json".into()));

        let err = loader_with(&transport).fetch_years().await.unwrap_err();
        assert_eq!(err, DashboardError::Parse("not json".into()));
    }

    #[tokio::test]
    async fn test_fetch_aspects_rejects_invalid_year_without_request() {
        let transport = Arc::new(FakeTransport::new());
        let loader = loader_with(&transport);

        for bad in ["", "   ", "20a3", "../admin"] {
            let err = loader.fetch_aspects(&Year::new(bad)).await.unwrap_err();
            assert!(matches!(err, DashboardError::Validation(_)));
        }
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_aspects_filters_entries() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond(
            "/get_aspects/2023",
            json!({"aspects": ["Parkir", 7, "all", "", "Pendidikan dan Sekolah"]}),
        );

        let aspects = assert_ok!(
            loader_with(&transport)
                .fetch_aspects(&Year::new("2023"))
                .await
        );
        assert_eq!(
            aspects,
            vec![Aspect::new("Parkir"), Aspect::new("Pendidikan dan Sekolah")]
        );
    }

    #[tokio::test]
    async fn test_fetch_wordcloud_data_rejects_blank_params() {
        let transport = Arc::new(FakeTransport::new());
        let loader = loader_with(&transport);

        assert_err!(
            loader
                .fetch_wordcloud_data(&Year::new(""), &Aspect::all())
                .await
        );
        assert_err!(
            loader
                .fetch_wordcloud_data(&Year::new("2023"), &Aspect::new(" "))
                .await
        );
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_wordcloud_data_encodes_path() {
        let transport = Arc::new(FakeTransport::new());
        let path = "/get_wordcloud_data/2023/Kondisi%20Fisik%2FLingkungan";
        transport.respond(
            path,
            json!({
                "statistics": {"total": 3, "positive": 1, "negative": 2},
                "positive_words": [{"text": "baik", "weight": 2}],
            }),
        );

        let data = loader_with(&transport)
            .fetch_wordcloud_data(&Year::new("2023"), &Aspect::new("Kondisi Fisik/Lingkungan"))
            .await
            .unwrap();

        assert_eq!(transport.requests(), vec![path.to_string()]);
        assert_eq!(data.statistics["total"], 3);
        assert!(data.negative_words.is_null());
    }

    #[tokio::test]
    async fn test_fetch_wordcloud_data_non_object_body() {
        let transport = Arc::new(FakeTransport::new());
        let loader = loader_with(&transport);

        for body in [json!([1, 2]), json!("oops"), json!(null)] {
            transport.respond("/get_wordcloud_data/2023/all", body);
            let data = assert_ok!(
                loader
                    .fetch_wordcloud_data(&Year::new("2023"), &Aspect::all())
                    .await
            );
            assert_eq!(data, WordCloudData::default());
        }
    }

    #[test]
    fn test_paths() {
        assert_eq!(aspects_path(&Year::new("2023")), "/get_aspects/2023");
        assert_eq!(aspects_path(&Year::new(" 2023")), "/get_aspects/2023");
        assert_eq!(
            wordcloud_path(&Year::new("2023"), &Aspect::all()),
            "/get_wordcloud_data/2023/all"
        );
    }
}
