//! Dashboard orchestration.
//!
//! `Dashboard` owns the current `(year, aspect)` selection and turns
//! selection changes into fetch-and-render cycles:
//!
//! - `initialize`: fetch years, select the first, then behave like `year_changed`
//! - `year_changed`: refresh the aspect list, then load the word clouds
//! - `aspect_changed`: load the word clouds for the current year
//!
//! Every transition takes a new request token. Results are applied to the
//! surface only while their token is still the latest one, and the check
//! and the writes happen under the same lock, so a slow response for an
//! old selection can never overwrite a newer one.

use crate::config::Config;
use crate::error::DashboardError;
use crate::loader::DataLoader;
use crate::models::{Aspect, Polarity, SelectOption, Selection, Statistics, WordCloudData, Year};
use crate::notifier::ErrorNotifier;
use crate::render::{CloudOutcome, StatisticsRenderer, WordCloudRenderer};
use crate::surface::{slots, Surface};
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

/// How a transition ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Results were written to the surface.
    Applied,
    /// A newer transition started first; results were discarded.
    Stale,
    /// A fetch failed; the failure has been reported.
    Failed,
    /// Nothing to do (no years, no selected year, ...).
    Ignored,
}

/// The last word-cloud dataset written to the surface.
#[derive(Debug, Clone)]
pub struct AppliedView {
    pub selection: Selection,
    pub statistics: Option<Statistics>,
    pub positive: CloudOutcome,
    pub negative: CloudOutcome,
    pub applied_at: DateTime<Utc>,
}

impl AppliedView {
    pub fn cloud(&self, polarity: Polarity) -> &CloudOutcome {
        match polarity {
            Polarity::Positive => &self.positive,
            Polarity::Negative => &self.negative,
        }
    }
}

#[derive(Debug, Default)]
struct DashboardState {
    selection: Selection,
    token: u64,
    years: Vec<Year>,
    aspects: Vec<Aspect>,
    applied: Option<AppliedView>,
}

/// Orchestrates loading and rendering for the dashboard.
pub struct Dashboard {
    loader: DataLoader,
    surface: Arc<dyn Surface>,
    statistics: StatisticsRenderer,
    clouds: WordCloudRenderer,
    notifier: ErrorNotifier,
    keep_aspect_on_year_change: bool,
    state: Mutex<DashboardState>,
}

impl Dashboard {
    pub fn new(loader: DataLoader, surface: Arc<dyn Surface>, config: &Config) -> Self {
        Self {
            loader,
            statistics: StatisticsRenderer::new(surface.clone()),
            clouds: WordCloudRenderer::new(surface.clone(), config.cloud.clone()),
            notifier: ErrorNotifier::new(surface.clone(), config.notifier.clone()),
            surface,
            keep_aspect_on_year_change: config.dashboard.keep_aspect_on_year_change,
            state: Mutex::new(DashboardState::default()),
        }
    }

    pub fn selection(&self) -> Selection {
        self.lock().selection.clone()
    }

    pub fn years(&self) -> Vec<Year> {
        self.lock().years.clone()
    }

    pub fn aspects(&self) -> Vec<Aspect> {
        self.lock().aspects.clone()
    }

    pub fn applied(&self) -> Option<AppliedView> {
        self.lock().applied.clone()
    }

    pub fn notifier(&self) -> &ErrorNotifier {
        &self.notifier
    }

    /// Load the year list and the data for the first year.
    pub async fn initialize(&self) -> Transition {
        let token = self.begin(|s| s.clone());
        info!("Loading available years");

        let years = match self.loader.fetch_years().await {
            Ok(years) => years,
            Err(e) => return self.fail(token, "years", &e),
        };

        let first = {
            let mut state = self.lock();
            if state.token != token {
                debug!("Discarding stale year list (token {})", token);
                return Transition::Stale;
            }
            state.years = years.clone();

            let options: Vec<SelectOption> = years.iter().map(SelectOption::from).collect();
            let first = years.first().cloned();
            self.surface.set_options(
                slots::YEAR_SELECT,
                &options,
                first.as_ref().map(Year::as_str),
            );
            first
        };

        match first {
            Some(year) => self.year_changed(year).await,
            None => {
                info!("Backend reported no years; nothing to load");
                Transition::Ignored
            }
        }
    }

    /// Switch to `year`: refresh its aspects, then load its word clouds.
    pub async fn year_changed(&self, year: Year) -> Transition {
        let mut previous_aspect = Aspect::all();
        let token = self.begin(|s| {
            previous_aspect = s.aspect.clone();
            Selection::for_year(year.clone())
        });
        info!("Year changed to {}", year);

        let aspects = match self.loader.fetch_aspects(&year).await {
            Ok(aspects) => aspects,
            Err(e) => {
                if self.fail(token, "aspects", &e) == Transition::Stale {
                    return Transition::Stale;
                }
                Vec::new()
            }
        };

        let aspect = {
            let mut state = self.lock();
            if state.token != token {
                debug!("Discarding stale aspect list for {} (token {})", year, token);
                return Transition::Stale;
            }

            let aspect = if self.keep_aspect_on_year_change && aspects.contains(&previous_aspect) {
                previous_aspect
            } else {
                Aspect::all()
            };
            state.selection = state.selection.with_aspect(aspect.clone());
            state.aspects = aspects.clone();

            let options: Vec<SelectOption> = std::iter::once(Aspect::all())
                .chain(aspects)
                .map(|a| SelectOption::from(&a))
                .collect();
            self.surface
                .set_options(slots::ASPECT_SELECT, &options, Some(aspect.as_str()));
            aspect
        };

        self.load_wordcloud(token, &year, &aspect).await
    }

    /// Switch to `aspect` within the current year.
    pub async fn aspect_changed(&self, aspect: Aspect) -> Transition {
        let Some(year) = self.selection().year else {
            warn!("Ignoring aspect change to {}: no year selected", aspect);
            return Transition::Ignored;
        };

        let token = self.begin(|s| s.with_aspect(aspect.clone()));
        info!("Aspect changed to {} ({})", aspect, year);

        self.load_wordcloud(token, &year, &aspect).await
    }

    async fn load_wordcloud(&self, token: u64, year: &Year, aspect: &Aspect) -> Transition {
        let data = match self.loader.fetch_wordcloud_data(year, aspect).await {
            Ok(data) => data,
            Err(e) => return self.fail(token, "word cloud data", &e),
        };

        let mut state = self.lock();
        if state.token != token {
            debug!(
                "Discarding stale word cloud data for {}/{} (token {})",
                year, aspect, token
            );
            return Transition::Stale;
        }

        state.applied = Some(self.apply(&state.selection, &data));
        Transition::Applied
    }

    fn apply(&self, selection: &Selection, data: &WordCloudData) -> AppliedView {
        let statistics = self.statistics.render(&data.statistics);
        let settings = self.clouds.settings();
        let positive = self.clouds.render(
            slots::POSITIVE_WORD_CLOUD,
            data.words(Polarity::Positive),
            &settings.positive_color,
        );
        let negative = self.clouds.render(
            slots::NEGATIVE_WORD_CLOUD,
            data.words(Polarity::Negative),
            &settings.negative_color,
        );

        AppliedView {
            selection: selection.clone(),
            statistics,
            positive,
            negative,
            applied_at: Utc::now(),
        }
    }

    /// Replace the selection and take a new request token.
    fn begin(&self, next: impl FnOnce(&Selection) -> Selection) -> u64 {
        let mut state = self.lock();
        state.selection = next(&state.selection);
        state.token += 1;
        state.token
    }

    /// Report a failed fetch unless the transition has been superseded.
    fn fail(&self, token: u64, what: &str, err: &DashboardError) -> Transition {
        if self.lock().token != token {
            debug!("Ignoring failure of stale {} request: {}", what, err);
            return Transition::Stale;
        }

        if err.is_user_visible() {
            error!("Failed to load {}: {}", what, err);
            self.notifier.notify(Some(&err.to_string()));
        } else {
            warn!("Skipped loading {}: {}", what, err);
        }
        Transition::Failed
    }

    fn lock(&self) -> MutexGuard<'_, DashboardState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::cloud::{NO_DATA, RENDER_FAILED};
    use crate::surface::{MemorySurface, SurfaceSnapshot};
    use crate::testing::FakeTransport;
    use serde_json::json;

    struct Harness {
        transport: Arc<FakeTransport>,
        surface: Arc<MemorySurface>,
        dashboard: Arc<Dashboard>,
    }

    fn harness_with(config: Config) -> Harness {
        let transport = Arc::new(FakeTransport::new());
        let surface = Arc::new(MemorySurface::dashboard(80));
        let dashboard = Arc::new(Dashboard::new(
            DataLoader::new(transport.clone()),
            surface.clone(),
            &config,
        ));
        Harness {
            transport,
            surface,
            dashboard,
        }
    }

    fn harness() -> Harness {
        let h = harness_with(Config::default());
        h.transport
            .respond("/get_available_years", json!({"years": [2023, 2022]}));
        h.transport
            .respond("/get_aspects/2023", json!({"aspects": ["Parkir", "Pohon"]}));
        h.transport
            .respond("/get_aspects/2022", json!({"aspects": ["Sekolah"]}));
        h.transport.respond(
            "/get_wordcloud_data/2023/all",
            wordcloud(10, 7, 3, "ramah", "macet"),
        );
        h.transport.respond(
            "/get_wordcloud_data/2022/all",
            wordcloud(20, 5, 15, "cepat", "banjir"),
        );
        h.transport.respond(
            "/get_wordcloud_data/2023/Parkir",
            wordcloud(4, 1, 3, "tertib", "liar"),
        );
        h
    }

    fn wordcloud(total: u64, positive: u64, negative: u64, good: &str, bad: &str) -> serde_json::Value {
        json!({
            "statistics": {"total": total, "positive": positive, "negative": negative},
            "positive_words": [{"text": good, "weight": 5}],
            "negative_words": [{"text": bad, "weight": 6}],
        })
    }

    fn counters(snapshot: &SurfaceSnapshot) -> (Option<&str>, Option<&str>, Option<&str>) {
        (
            snapshot.text(slots::TOTAL_COMPLAINTS),
            snapshot.text(slots::POSITIVE_COUNT),
            snapshot.text(slots::NEGATIVE_COUNT),
        )
    }

    #[tokio::test]
    async fn test_initialize_selects_first_year() {
        let h = harness();
        assert_eq!(h.dashboard.initialize().await, Transition::Applied);

        assert_eq!(
            h.transport.requests(),
            vec![
                "/get_available_years",
                "/get_aspects/2023",
                "/get_wordcloud_data/2023/all",
            ]
        );

        let selection = h.dashboard.selection();
        assert_eq!(selection.year, Some(Year::new("2023")));
        assert!(selection.aspect.is_all());

        let snapshot = h.surface.snapshot();
        let (years, selected) = snapshot.options(slots::YEAR_SELECT).unwrap();
        assert_eq!(years.len(), 2);
        assert_eq!(selected, Some("2023"));

        let (aspects, selected) = snapshot.options(slots::ASPECT_SELECT).unwrap();
        let labels: Vec<&str> = aspects.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["All Aspects", "Parkir", "Pohon"]);
        assert_eq!(selected, Some("all"));

        assert_eq!(counters(&snapshot), (Some("10"), Some("7"), Some("3")));
        assert_eq!(
            snapshot.cloud(slots::POSITIVE_WORD_CLOUD).unwrap().words[0].text,
            "ramah"
        );
        assert_eq!(
            snapshot.cloud(slots::NEGATIVE_WORD_CLOUD).unwrap().color,
            "#FF5252"
        );
    }

    #[tokio::test]
    async fn test_initialize_without_years_stops() {
        let h = harness_with(Config::default());
        h.transport
            .respond("/get_available_years", json!({"years": []}));

        assert_eq!(h.dashboard.initialize().await, Transition::Ignored);
        assert_eq!(h.transport.requests(), vec!["/get_available_years"]);
        assert_eq!(h.dashboard.selection().year, None);
    }

    #[tokio::test]
    async fn test_initialize_network_failure_shows_banner() {
        let h = harness_with(Config::default());
        h.transport.fail(
            "/get_available_years",
            DashboardError::Network("Backend returned 500".into()),
        );

        assert_eq!(h.dashboard.initialize().await, Transition::Failed);
        let snapshot = h.surface.snapshot();
        assert_eq!(snapshot.banners.len(), 1);
        assert_eq!(
            snapshot.banners[0].message,
            "Network error: Backend returned 500"
        );
    }

    #[tokio::test]
    async fn test_aspect_changed_loads_filtered_data() {
        let h = harness();
        h.dashboard.initialize().await;

        let outcome = h.dashboard.aspect_changed(Aspect::new("Parkir")).await;
        assert_eq!(outcome, Transition::Applied);
        assert_eq!(
            h.transport.requests().last().map(String::as_str),
            Some("/get_wordcloud_data/2023/Parkir")
        );
        assert_eq!(h.dashboard.selection().aspect, Aspect::new("Parkir"));
        assert_eq!(
            counters(&h.surface.snapshot()),
            (Some("4"), Some("1"), Some("3"))
        );
    }

    #[tokio::test]
    async fn test_aspect_changed_without_year_is_ignored() {
        let h = harness();
        let outcome = h.dashboard.aspect_changed(Aspect::new("Parkir")).await;
        assert_eq!(outcome, Transition::Ignored);
        assert!(h.transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_year_change_resets_aspect() {
        let h = harness();
        h.dashboard.initialize().await;
        h.dashboard.aspect_changed(Aspect::new("Parkir")).await;

        assert_eq!(
            h.dashboard.year_changed(Year::new("2022")).await,
            Transition::Applied
        );
        assert!(h.dashboard.selection().aspect.is_all());
        assert_eq!(
            h.transport.requests().last().map(String::as_str),
            Some("/get_wordcloud_data/2022/all")
        );
        assert_eq!(h.dashboard.aspects(), vec![Aspect::new("Sekolah")]);
    }

    #[tokio::test]
    async fn test_year_change_can_keep_matching_aspect() {
        let mut config = Config::default();
        config.dashboard.keep_aspect_on_year_change = true;
        let h = harness_with(config);
        h.transport
            .respond("/get_available_years", json!({"years": ["2023", "2024"]}));
        h.transport
            .respond("/get_aspects/2023", json!({"aspects": ["Parkir"]}));
        h.transport
            .respond("/get_aspects/2024", json!({"aspects": ["Parkir", "Sekolah"]}));
        h.transport
            .respond("/get_wordcloud_data/2023/all", wordcloud(1, 1, 0, "a", "b"));
        h.transport
            .respond("/get_wordcloud_data/2023/Parkir", wordcloud(1, 1, 0, "a", "b"));
        h.transport
            .respond("/get_wordcloud_data/2024/Parkir", wordcloud(2, 0, 2, "a", "b"));

        h.dashboard.initialize().await;
        h.dashboard.aspect_changed(Aspect::new("Parkir")).await;
        assert_eq!(
            h.dashboard.year_changed(Year::new("2024")).await,
            Transition::Applied
        );

        assert_eq!(h.dashboard.selection().aspect, Aspect::new("Parkir"));
        let snapshot = h.surface.snapshot();
        let (_, selected) = snapshot.options(slots::ASPECT_SELECT).unwrap();
        assert_eq!(selected, Some("Parkir"));
        assert_eq!(snapshot.text(slots::TOTAL_COMPLAINTS), Some("2"));
    }

    #[tokio::test]
    async fn test_aspect_failure_still_loads_all_aspects() {
        let h = harness();
        h.transport.fail(
            "/get_aspects/2022",
            DashboardError::Parse("expected value at line 1".into()),
        );
        h.dashboard.initialize().await;

        assert_eq!(
            h.dashboard.year_changed(Year::new("2022")).await,
            Transition::Applied
        );
        let snapshot = h.surface.snapshot();
        let (aspects, _) = snapshot.options(slots::ASPECT_SELECT).unwrap();
        assert_eq!(aspects.len(), 1);
        assert_eq!(snapshot.banners.len(), 1);
        assert_eq!(snapshot.text(slots::TOTAL_COMPLAINTS), Some("20"));
    }

    #[tokio::test]
    async fn test_invalid_year_issues_no_requests() {
        let h = harness();
        let outcome = h.dashboard.year_changed(Year::new("")).await;

        assert_eq!(outcome, Transition::Failed);
        assert!(h.transport.requests().is_empty());
        assert!(h.surface.snapshot().banners.is_empty());
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded() {
        let h = harness();
        h.dashboard.initialize().await;

        let slow_path = "/get_wordcloud_data/2022/all";
        let gate = h.transport.gate(slow_path);

        let dashboard = h.dashboard.clone();
        let slow = tokio::spawn(async move { dashboard.year_changed(Year::new("2022")).await });
        h.transport.wait_for_request(slow_path).await;

        assert_eq!(
            h.dashboard.year_changed(Year::new("2023")).await,
            Transition::Applied
        );

        gate.notify_one();
        assert_eq!(slow.await.unwrap(), Transition::Stale);

        assert_eq!(h.dashboard.selection().year, Some(Year::new("2023")));
        assert_eq!(
            counters(&h.surface.snapshot()),
            (Some("10"), Some("7"), Some("3"))
        );
        let applied = h.dashboard.applied().unwrap();
        assert_eq!(applied.selection.year, Some(Year::new("2023")));
    }

    #[tokio::test]
    async fn test_stale_failure_shows_no_banner() {
        let h = harness();
        h.dashboard.initialize().await;

        let slow_path = "/get_wordcloud_data/2023/Pohon";
        h.transport
            .fail(slow_path, DashboardError::Network("Backend returned 502".into()));
        let gate = h.transport.gate(slow_path);

        let dashboard = h.dashboard.clone();
        let slow = tokio::spawn(async move { dashboard.aspect_changed(Aspect::new("Pohon")).await });
        h.transport.wait_for_request(slow_path).await;

        h.dashboard.aspect_changed(Aspect::new("Parkir")).await;
        gate.notify_one();

        assert_eq!(slow.await.unwrap(), Transition::Stale);
        assert!(h.surface.snapshot().banners.is_empty());
    }

    #[tokio::test]
    async fn test_empty_and_broken_payloads() {
        let mut config = Config::default();
        config.cloud.rotation_steps = 0;
        let h = harness_with(config);
        h.transport
            .respond("/get_available_years", json!({"years": [2021]}));
        h.transport
            .respond("/get_aspects/2021", json!({"aspects": []}));
        h.transport.respond(
            "/get_wordcloud_data/2021/all",
            json!({
                "statistics": null,
                "positive_words": [],
                "negative_words": [{"text": "rusak", "weight": 9}],
            }),
        );

        assert_eq!(h.dashboard.initialize().await, Transition::Applied);
        let snapshot = h.surface.snapshot();
        assert_eq!(snapshot.text(slots::TOTAL_COMPLAINTS), None);
        assert_eq!(snapshot.text(slots::POSITIVE_WORD_CLOUD), Some(NO_DATA));
        assert_eq!(snapshot.text(slots::NEGATIVE_WORD_CLOUD), Some(RENDER_FAILED));

        let applied = h.dashboard.applied().unwrap();
        assert!(applied.statistics.is_none());
        assert_eq!(applied.cloud(Polarity::Positive), &CloudOutcome::Placeholder(NO_DATA));
    }

    #[tokio::test]
    async fn test_missing_year_list_shows_banner() {
        let h = harness_with(Config::default());
        h.transport
            .respond("/get_available_years", json!({"error": "db down"}));

        assert_eq!(h.dashboard.initialize().await, Transition::Failed);
        let snapshot = h.surface.snapshot();
        assert_eq!(snapshot.banners.len(), 1);
        assert!(snapshot.banners[0].message.contains("`years`"));
    }

    #[tokio::test]
    async fn test_missing_aspect_list_shows_banner_and_loads_clouds() {
        let h = harness();
        h.transport
            .respond("/get_aspects/2022", json!({"error": "db down"}));
        h.dashboard.initialize().await;

        assert_eq!(
            h.dashboard.year_changed(Year::new("2022")).await,
            Transition::Applied
        );
        let snapshot = h.surface.snapshot();
        assert_eq!(snapshot.banners.len(), 1);
        assert!(snapshot.banners[0].message.contains("`aspects`"));
        assert_eq!(snapshot.text(slots::TOTAL_COMPLAINTS), Some("20"));
    }

    #[tokio::test]
    async fn test_non_object_wordcloud_replaces_previous_clouds() {
        let h = harness();
        h.dashboard.initialize().await;
        assert!(h.surface.snapshot().cloud(slots::POSITIVE_WORD_CLOUD).is_some());

        h.transport
            .respond("/get_wordcloud_data/2023/Parkir", json!("oops"));
        assert_eq!(
            h.dashboard.aspect_changed(Aspect::new("Parkir")).await,
            Transition::Applied
        );

        let snapshot = h.surface.snapshot();
        assert_eq!(snapshot.text(slots::POSITIVE_WORD_CLOUD), Some(NO_DATA));
        assert_eq!(snapshot.text(slots::NEGATIVE_WORD_CLOUD), Some(NO_DATA));
        // Counters are left as they were when statistics are absent.
        assert_eq!(counters(&snapshot), (Some("10"), Some("7"), Some("3")));
        assert!(snapshot.banners.is_empty());
    }
}
