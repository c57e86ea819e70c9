//! Top-level state owner for a weather lookup session.
//!
//! The controller holds the only mutable state of the application: the
//! selected city, the current record, the loading flag and the error message.
//! Front ends read it through [`WeatherController::view`] or a
//! [`WeatherController::subscribe`] receiver, and drive it through
//! [`WeatherController::search`], [`WeatherController::random`] and
//! [`WeatherController::suggestions`].

use rand::Rng;
use tokio::sync::watch;
use tracing::{info, instrument, warn};

use crate::{
    Config,
    catalog::{CityDirectory, Location},
    error::LookupError,
    model::{Language, WeatherRecord},
    provider::{WeatherProvider, provider_from_config},
};

/// What the display layer renders.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub selected: Option<Location>,
    pub current: Option<WeatherRecord>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Holds `loading` raised while alive. Dropping it, including when the lookup
/// future is dropped mid-flight, lowers the flag.
struct LoadingGuard<'a> {
    view: &'a watch::Sender<ViewState>,
}

impl<'a> LoadingGuard<'a> {
    fn engage(view: &'a watch::Sender<ViewState>) -> Self {
        view.send_modify(|state| state.loading = true);
        Self { view }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.view.send_modify(|state| state.loading = false);
    }
}

#[derive(Debug)]
pub struct WeatherController {
    directory: CityDirectory,
    provider: Box<dyn WeatherProvider>,
    language: Language,
    suggestion_limit: usize,
    view: watch::Sender<ViewState>,
}

impl WeatherController {
    pub fn new(
        directory: CityDirectory,
        provider: Box<dyn WeatherProvider>,
        language: Language,
        suggestion_limit: usize,
    ) -> Self {
        let (view, _) = watch::channel(ViewState::default());
        Self {
            directory,
            provider,
            language,
            suggestion_limit,
            view,
        }
    }

    /// Builtin catalog plus the provider described by `config`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let provider = provider_from_config(config)?;
        Ok(Self::new(
            CityDirectory::builtin(),
            provider,
            config.language,
            config.suggestion_limit,
        ))
    }

    pub fn suggestions(&self, partial: &str) -> Vec<&str> {
        self.directory.suggest(partial, self.suggestion_limit)
    }

    /// Look up a city by exact name after trimming surrounding whitespace.
    ///
    /// An unknown name sets the error message and issues no request; the
    /// current record and selection stay as they were.
    pub async fn search(&mut self, city_name: &str) -> Result<WeatherRecord, LookupError> {
        let name = city_name.trim();
        let Some(location) = self.directory.find(name).cloned() else {
            warn!(city = name, "city not in directory");
            let city = name.to_string();
            return self.apply_outcome(Err(LookupError::NotFound { city }));
        };

        self.lookup(location).await
    }

    pub async fn random<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<WeatherRecord, LookupError> {
        let location = self.directory.random(rng).clone();
        self.lookup(location).await
    }

    /// Fetch `location`, with `loading` raised for as long as the request runs.
    ///
    /// Subscribers see the new selection and the raised flag before the
    /// provider is called.
    #[instrument(skip(self, location), fields(city = %location.name))]
    pub async fn lookup(&mut self, location: Location) -> Result<WeatherRecord, LookupError> {
        self.view.send_modify(|state| {
            state.error = None;
            state.selected = Some(location.clone());
        });

        let outcome = {
            let _loading = LoadingGuard::engage(&self.view);
            self.provider.current(&location).await
        };

        self.apply_outcome(outcome.map_err(|err| {
            warn!("weather lookup failed: {err:#}");
            LookupError::fetch(err)
        }))
    }

    /// Commit a resolved lookup to the view.
    ///
    /// Success replaces the current record. Failure records the message and
    /// keeps whatever record was shown before. Outcomes are not sequenced:
    /// whichever is applied last is what the view shows.
    pub fn apply_outcome(
        &mut self,
        outcome: Result<WeatherRecord, LookupError>,
    ) -> Result<WeatherRecord, LookupError> {
        match outcome {
            Ok(record) => {
                info!(city = %record.location_name, code = record.weather_code, "weather updated");
                self.view.send_modify(|state| {
                    state.error = None;
                    state.current = Some(record.clone());
                });
                Ok(record)
            }
            Err(err) => {
                let message = err.user_message(self.language);
                self.view.send_modify(|state| state.error = Some(message));
                Err(err)
            }
        }
    }

    /// Receiver that sees every view change, including `loading` going up
    /// and down around a request.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.view.subscribe()
    }

    pub fn view(&self) -> ViewState {
        self.view.borrow().clone()
    }

    pub fn current(&self) -> Option<WeatherRecord> {
        self.view.borrow().current.clone()
    }

    pub fn selected(&self) -> Option<Location> {
        self.view.borrow().selected.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.view.borrow().loading
    }

    pub fn error(&self) -> Option<String> {
        self.view.borrow().error.clone()
    }

    pub fn directory(&self) -> &CityDirectory {
        &self.directory
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn suggestion_limit(&self) -> usize {
        self.suggestion_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::DateTime;
    use rand::{SeedableRng, rngs::StdRng};
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };
    use tokio::sync::oneshot;

    use crate::matcher::DEFAULT_SUGGESTION_LIMIT;

    #[derive(Debug, Clone, Copy)]
    enum Behaviour {
        Succeed,
        Fail,
        Hang,
        Gated,
    }

    #[derive(Debug, Clone)]
    struct FakeProvider {
        behaviour: Arc<Mutex<Behaviour>>,
        calls: Arc<Mutex<Vec<Location>>>,
        gate: Arc<Mutex<Option<oneshot::Receiver<()>>>>,
    }

    impl FakeProvider {
        fn new(behaviour: Behaviour) -> Self {
            Self {
                behaviour: Arc::new(Mutex::new(behaviour)),
                calls: Arc::new(Mutex::new(Vec::new())),
                gate: Arc::new(Mutex::new(None)),
            }
        }

        /// Provider whose next call waits until the returned sender fires.
        fn gated() -> (Self, oneshot::Sender<()>) {
            let provider = Self::new(Behaviour::Gated);
            let (release, gate) = oneshot::channel();
            *provider.gate.lock().unwrap() = Some(gate);
            (provider, release)
        }

        fn set(&self, behaviour: Behaviour) {
            *self.behaviour.lock().unwrap() = behaviour;
        }

        fn calls(&self) -> Vec<Location> {
            self.calls.lock().unwrap().clone()
        }
    }

    fn record_for(name: &str, code: i32) -> WeatherRecord {
        WeatherRecord {
            location_name: name.to_string(),
            temperature_c: 18.0,
            description: crate::classify::describe(code).to_string(),
            humidity_pct: 55,
            wind_speed_kmh: 7.5,
            feels_like_c: 17.2,
            precipitation_mm: 0.0,
            weather_code: code,
            fetched_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        }
    }

    #[async_trait]
    impl WeatherProvider for FakeProvider {
        async fn current(&self, location: &Location) -> anyhow::Result<WeatherRecord> {
            self.calls.lock().unwrap().push(location.clone());
            let behaviour = *self.behaviour.lock().unwrap();
            match behaviour {
                Behaviour::Succeed => Ok(record_for(&location.name, 0)),
                Behaviour::Fail => Err(anyhow::anyhow!("status 500 Internal Server Error")),
                Behaviour::Hang => std::future::pending().await,
                Behaviour::Gated => {
                    let gate = self.gate.lock().unwrap().take();
                    if let Some(gate) = gate {
                        let _ = gate.await;
                    }
                    Ok(record_for(&location.name, 0))
                }
            }
        }
    }

    fn controller(provider: &FakeProvider) -> WeatherController {
        WeatherController::new(
            CityDirectory::builtin(),
            Box::new(provider.clone()),
            Language::Zh,
            DEFAULT_SUGGESTION_LIMIT,
        )
    }

    #[tokio::test]
    async fn search_fetches_exact_coordinates() {
        let provider = FakeProvider::new(Behaviour::Succeed);
        let mut ctl = controller(&provider);

        let record = ctl.search("北京").await.unwrap();
        assert_eq!(record.location_name, "北京");

        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].latitude, 39.9042);
        assert_eq!(calls[0].longitude, 116.4074);

        assert!(!ctl.is_loading());
        assert!(ctl.error().is_none());
        let selected = ctl.selected().map(|l| l.name);
        assert_eq!(selected.as_deref(), Some("北京"));
    }

    #[tokio::test]
    async fn loading_is_visible_while_request_is_pending() {
        let (provider, release) = FakeProvider::gated();
        let mut ctl = controller(&provider);
        let mut watcher = ctl.subscribe();
        assert!(!watcher.borrow().loading);

        let observe = async move {
            let ready = watcher.wait_for(|state| state.loading).await;
            let seen = ready.unwrap().clone();
            release.send(()).unwrap();
            seen
        };
        let (outcome, seen) = tokio::join!(ctl.search("北京"), observe);

        assert!(seen.loading);
        assert!(seen.error.is_none());
        assert_eq!(seen.selected.map(|l| l.name).as_deref(), Some("北京"));

        assert!(outcome.is_ok());
        assert!(!ctl.is_loading());
        assert_eq!(provider.calls().len(), 1);
    }

    #[tokio::test]
    async fn search_trims_submitted_name() {
        let provider = FakeProvider::new(Behaviour::Succeed);
        let mut ctl = controller(&provider);

        assert!(ctl.search("  上海 ").await.is_ok());
        assert_eq!(provider.calls()[0].name, "上海");
    }

    #[tokio::test]
    async fn unknown_city_is_not_found_and_keeps_previous_record() {
        let provider = FakeProvider::new(Behaviour::Succeed);
        let mut ctl = controller(&provider);
        ctl.search("伦敦").await.unwrap();

        let err = ctl.search("UnknownCityXYZ").await.unwrap_err();
        assert_eq!(err.reason(), "not_found");
        let error = ctl.error();
        assert_eq!(error.as_deref(), Some("未找到城市: UnknownCityXYZ"));

        let current = ctl.current().map(|r| r.location_name);
        assert_eq!(current.as_deref(), Some("伦敦"));
        let selected = ctl.selected().map(|l| l.name);
        assert_eq!(selected.as_deref(), Some("伦敦"));
        assert_eq!(provider.calls().len(), 1, "no request issued");
    }

    #[tokio::test]
    async fn fetch_failure_clears_loading_and_keeps_stale_record() {
        let provider = FakeProvider::new(Behaviour::Succeed);
        let mut ctl = controller(&provider);
        ctl.search("巴黎").await.unwrap();

        provider.set(Behaviour::Fail);
        let err = ctl.search("东京").await.unwrap_err();

        assert_eq!(err.reason(), "fetch_error");
        assert!(!ctl.is_loading());
        let error = ctl.error();
        assert_eq!(error.as_deref(), Some("获取天气数据失败，请稍后再试"));
        let current = ctl.current().map(|r| r.location_name);
        assert_eq!(current.as_deref(), Some("巴黎"));
        let selected = ctl.selected().map(|l| l.name);
        assert_eq!(selected.as_deref(), Some("东京"));
    }

    #[tokio::test]
    async fn failure_without_prior_record_leaves_view_empty() {
        let provider = FakeProvider::new(Behaviour::Fail);
        let mut ctl = controller(&provider);

        assert!(ctl.search("开罗").await.is_err());
        assert!(ctl.current().is_none());
        assert!(!ctl.is_loading());
    }

    #[tokio::test]
    async fn success_after_failure_clears_error() {
        let provider = FakeProvider::new(Behaviour::Fail);
        let mut ctl = controller(&provider);
        let _ = ctl.search("开罗").await;
        assert!(ctl.error().is_some());

        provider.set(Behaviour::Succeed);
        ctl.search("开罗").await.unwrap();
        assert!(ctl.error().is_none());
        assert!(ctl.current().is_some());
    }

    #[tokio::test]
    async fn dropped_lookup_releases_loading_flag() {
        let provider = FakeProvider::new(Behaviour::Hang);
        let mut ctl = controller(&provider);
        let watcher = ctl.subscribe();

        let limit = Duration::from_millis(20);
        let timed_out = tokio::time::timeout(limit, ctl.search("悉尼")).await;
        assert!(timed_out.is_err());

        assert!(!ctl.is_loading());
        assert!(!watcher.borrow().loading);
        assert!(ctl.current().is_none());
        assert_eq!(provider.calls().len(), 1);
    }

    #[tokio::test]
    async fn random_looks_up_a_catalog_city() {
        let provider = FakeProvider::new(Behaviour::Succeed);
        let mut ctl = controller(&provider);
        let mut rng = StdRng::seed_from_u64(42);

        let record = ctl.random(&mut rng).await.unwrap();
        assert!(ctl.directory().find(&record.location_name).is_some());
        assert_eq!(provider.calls()[0].name, record.location_name);
    }

    #[test]
    fn suggestions_use_configured_limit() {
        let provider = FakeProvider::new(Behaviour::Succeed);
        let directory = CityDirectory::builtin();
        let ctl = WeatherController::new(directory, Box::new(provider), Language::Zh, 1);

        assert_eq!(ctl.suggestions("京"), vec!["北京"]);
        assert!(ctl.suggestions(" ").is_empty());
    }

    // Known race: outcomes are applied in resolution order with no sequence
    // check, so a slow response for an older request overwrites a newer one.
    #[test]
    fn last_applied_outcome_wins() {
        let provider = FakeProvider::new(Behaviour::Succeed);
        let mut ctl = controller(&provider);

        ctl.apply_outcome(Ok(record_for("上海", 3))).unwrap();
        ctl.apply_outcome(Ok(record_for("北京", 61))).unwrap();

        let current = ctl.current().unwrap();
        assert_eq!(current.location_name, "北京");
        assert_eq!(current.weather_code, 61);
    }

    #[test]
    fn from_config_uses_language_for_messages() {
        let cfg = Config {
            language: Language::En,
            ..Config::default()
        };
        let mut ctl = WeatherController::from_config(&cfg).unwrap();

        let err = LookupError::NotFound {
            city: "Atlantis".into(),
        };
        assert!(ctl.apply_outcome(Err(err)).is_err());
        let error = ctl.error();
        assert_eq!(error.as_deref(), Some("City not found: Atlantis"));
        assert_eq!(ctl.language(), Language::En);
    }
}
