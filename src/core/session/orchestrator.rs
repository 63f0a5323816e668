//! Dashboard orchestrator.
//!
//! Explicit state machine over one discovery session:
//! Home → Analyzing → Dashboard | Error, with reset back to Home. On an
//! accepted identification five category fetches fan out as independently
//! spawned tasks, each owning exactly one slot and one loading flag; a
//! failure in one is logged and leaves its slot empty without touching the
//! session phase or the sibling fetches.
//!
//! Every fetch carries the session (or modal) generation it was launched
//! under; a completion whose generation no longer matches is discarded, so
//! a reset or modal close can safely abandon in-flight work.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, RwLock};

use crate::config::{AppConfig, SessionConfig};
use crate::core::content::ItineraryRequest;
use crate::core::fetch::{categories, identify, itinerary, Acceptance, ConfidenceGate};
use crate::core::gemini::{self, GeminiClient, GeminiError, GenerativeBackend, RetryPolicy};

use super::state::{ContentSlot, DashboardState, SessionError, SessionEvent, SessionPhase};
use super::suggest::EditDebouncer;

const LOW_CONFIDENCE_MESSAGE: &str =
    "We couldn't confidently identify this landmark. Please try a clearer photo or a more \
     specific search.";
const CAPACITY_MESSAGE: &str =
    "The service is at capacity right now. Please wait a moment and try again.";
const GENERIC_FAILURE_MESSAGE: &str =
    "Failed to analyze the landmark. Please check your connection and try again.";

const DASHBOARD_SLOTS: [ContentSlot; 5] = [
    ContentSlot::History,
    ContentSlot::Nearby,
    ContentSlot::Culture,
    ContentSlot::Events,
    ContentSlot::Logistics,
];

enum IdentifyInput {
    /// Data-URL-encoded photo.
    Image(String),
    /// Free-text query.
    Name(String),
}

struct SessionInner {
    backend: Arc<dyn GenerativeBackend>,
    retry: RetryPolicy,
    gate: ConfidenceGate,
    phase: RwLock<SessionPhase>,
    error: RwLock<Option<SessionError>>,
    dashboard: RwLock<DashboardState>,
    /// Bumped on every submit/reset; stale completions compare against it.
    session_gen: AtomicU64,
    /// Bumped on every deep-dive open/close.
    modal_gen: AtomicU64,
    debouncer: EditDebouncer,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
}

impl SessionInner {
    fn emit(&self, event: SessionEvent) {
        let _ = self.events_tx.send(event);
    }

    fn session_generation(&self) -> u64 {
        self.session_gen.load(Ordering::SeqCst)
    }

    async fn set_phase(&self, phase: SessionPhase) {
        *self.phase.write().await = phase;
        self.emit(SessionEvent::PhaseChanged(phase));
    }

    /// Commit a session-level failure, unless the session has moved on. The
    /// dashboard write lock doubles as the commit guard: `reset` cannot
    /// interleave between the generation check and the writes.
    async fn fail_session(&self, generation: u64, message: &str, capacity: bool) {
        let guard = self.dashboard.write().await;
        if self.session_generation() != generation {
            log::debug!("Discarding identification failure from an abandoned session");
            return;
        }
        *self.error.write().await = Some(SessionError {
            message: message.to_string(),
            capacity,
        });
        *self.phase.write().await = SessionPhase::Error;
        drop(guard);
        self.emit(SessionEvent::PhaseChanged(SessionPhase::Error));
    }
}

/// One travel-discovery session. Cheap to clone; all clones share state.
#[derive(Clone)]
pub struct TravelSession {
    inner: Arc<SessionInner>,
}

impl TravelSession {
    /// Build a session over any backend. Returns the session and the event
    /// channel the host UI drains.
    pub fn new(
        backend: Arc<dyn GenerativeBackend>,
        config: &SessionConfig,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let inner = Arc::new(SessionInner {
            backend,
            retry: RetryPolicy::new(
                config.max_retries,
                Duration::from_millis(config.initial_backoff_ms),
            ),
            gate: ConfidenceGate {
                reject_below: config.confidence_reject_below,
                warn_below: config.confidence_warn_below,
            },
            phase: RwLock::new(SessionPhase::Home),
            error: RwLock::new(None),
            dashboard: RwLock::new(DashboardState::default()),
            session_gen: AtomicU64::new(0),
            modal_gen: AtomicU64::new(0),
            debouncer: EditDebouncer::new(Duration::from_millis(config.suggest_debounce_ms)),
            events_tx,
        });

        (Self { inner }, events_rx)
    }

    /// Build a session backed by the process-wide Gemini client, installing
    /// one from `config` on first use. Later sessions reuse the installed
    /// client regardless of their config's endpoint settings.
    pub fn from_app_config(
        config: &AppConfig,
    ) -> gemini::Result<(Self, mpsc::UnboundedReceiver<SessionEvent>)> {
        let client = match gemini::global() {
            Some(client) => client,
            None => {
                let api_key = config
                    .gemini
                    .resolve_api_key()
                    .ok_or_else(|| GeminiError::NotConfigured("missing API key".to_string()))?;
                let built = GeminiClient::new(api_key, config.gemini.model.clone())?;
                // On a lost installation race the winner's client is used
                // and ours is dropped.
                let _ = gemini::init_global(built);
                gemini::global().ok_or_else(|| {
                    GeminiError::NotConfigured("global client unavailable".to_string())
                })?
            }
        };
        Ok(Self::new(client, &config.session))
    }

    // ── Snapshot accessors ──────────────────────────────────────────────

    pub async fn phase(&self) -> SessionPhase {
        *self.inner.phase.read().await
    }

    pub async fn last_error(&self) -> Option<SessionError> {
        self.inner.error.read().await.clone()
    }

    pub async fn dashboard(&self) -> DashboardState {
        self.inner.dashboard.read().await.clone()
    }

    // ── Entry points ────────────────────────────────────────────────────

    /// Identify from an uploaded photo and, on acceptance, fan out the
    /// dashboard fetches. Resolves when identification settles; category
    /// fetches continue in the background.
    pub async fn submit_image(&self, image_bytes: &[u8]) {
        use base64::Engine as _;
        let data_url = format!(
            "data:image/jpeg;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(image_bytes)
        );
        self.identify(IdentifyInput::Image(data_url)).await;
    }

    /// Identify from a free-text search query.
    pub async fn submit_search(&self, query: &str) {
        self.identify(IdentifyInput::Name(query.trim().to_string()))
            .await;
    }

    /// Accept a suggestion from the search box.
    pub async fn select_suggestion(&self, suggestion: &str) {
        self.submit_search(suggestion).await;
    }

    /// Record a search-box edit. After the debounce window passes with no
    /// further edits, a suggestion fetch fires for the final text (if it has
    /// at least 2 characters). Superseded edits never reach the network.
    pub fn note_query_edit(&self, query: &str) {
        let ticket = self.inner.debouncer.begin();
        let inner = self.inner.clone();
        let query = query.trim().to_string();

        tokio::spawn(async move {
            tokio::time::sleep(inner.debouncer.window()).await;
            if !inner.debouncer.is_current(ticket) {
                return;
            }
            if query.chars().count() < 2 {
                return;
            }

            match categories::search_suggestions(inner.backend.as_ref(), inner.retry, &query).await
            {
                Ok(suggestions) => {
                    if !inner.debouncer.is_current(ticket) {
                        log::debug!("Discarding late suggestions for {query:?}");
                        return;
                    }
                    inner.dashboard.write().await.suggestions = suggestions.clone();
                    inner.emit(SessionEvent::SuggestionsReady(suggestions));
                }
                Err(e) => log::debug!("Suggestion fetch failed for {query:?}: {e}"),
            }
        });
    }

    /// Open a deep dive on a topic. The modal slot shows loading
    /// immediately; a close before completion discards the late result.
    pub async fn request_deep_dive(&self, topic: &str, context: &str) {
        let ticket = self.inner.modal_gen.fetch_add(1, Ordering::SeqCst) + 1;
        let city = {
            let mut dashboard = self.inner.dashboard.write().await;
            dashboard.deep_dive.data = None;
            dashboard.deep_dive.loading = true;
            dashboard.deep_dive_topic = topic.to_string();
            dashboard
                .landmark
                .as_ref()
                .map(|l| l.city.clone())
                .unwrap_or_default()
        };
        self.inner.emit(SessionEvent::SlotUpdated(ContentSlot::DeepDive));

        let inner = self.inner.clone();
        let topic = topic.to_string();
        let context = context.to_string();

        tokio::spawn(async move {
            let result =
                categories::explore_topic(inner.backend.as_ref(), inner.retry, &topic, &context, &city)
                    .await;

            let mut dashboard = inner.dashboard.write().await;
            if inner.modal_gen.load(Ordering::SeqCst) != ticket {
                log::debug!("Discarding deep-dive result for closed modal: {topic:?}");
                return;
            }
            match result {
                Ok(deep_dive) => dashboard.deep_dive.data = Some(deep_dive),
                Err(e) => log::error!("Deep dive fetch failed for {topic:?}: {e}"),
            }
            dashboard.deep_dive.loading = false;
            drop(dashboard);
            inner.emit(SessionEvent::SlotUpdated(ContentSlot::DeepDive));
        });
    }

    /// Close the deep-dive modal, abandoning any in-flight fetch.
    pub async fn close_deep_dive(&self) {
        self.inner.modal_gen.fetch_add(1, Ordering::SeqCst);
        {
            let mut dashboard = self.inner.dashboard.write().await;
            dashboard.deep_dive.data = None;
            dashboard.deep_dive.loading = false;
            dashboard.deep_dive_topic.clear();
        }
        self.inner.emit(SessionEvent::SlotUpdated(ContentSlot::DeepDive));
    }

    /// Generate (or regenerate) the itinerary, replacing the slot wholesale.
    pub async fn generate_itinerary(&self, request: ItineraryRequest) {
        let generation = self.inner.session_generation();
        let (name, city) = {
            let mut dashboard = self.inner.dashboard.write().await;
            let Some(landmark) = dashboard.landmark.as_ref() else {
                log::warn!("Itinerary requested with no identified landmark");
                return;
            };
            let anchor = (landmark.landmark_name.clone(), landmark.city.clone());
            dashboard.itinerary.loading = true;
            anchor
        };
        self.inner.emit(SessionEvent::SlotUpdated(ContentSlot::Itinerary));

        let inner = self.inner.clone();
        Self::spawn_category(
            inner.clone(),
            generation,
            ContentSlot::Itinerary,
            async move {
                itinerary::generate_itinerary(
                    inner.backend.as_ref(),
                    inner.retry,
                    &name,
                    &city,
                    &request,
                )
                .await
            },
            |dashboard, value| dashboard.itinerary.data = Some(value),
        );
    }

    /// Delete one step from the current itinerary. Client-local: no new
    /// fetch, and neither days nor surviving steps are renumbered.
    pub async fn delete_itinerary_step(&self, day_number: u32, step_index: usize) -> bool {
        let removed = {
            let mut dashboard = self.inner.dashboard.write().await;
            dashboard
                .itinerary
                .data
                .as_mut()
                .and_then(|it| it.days.iter_mut().find(|d| d.day_number == day_number))
                .map(|day| {
                    if step_index < day.steps.len() {
                        day.steps.remove(step_index);
                        true
                    } else {
                        false
                    }
                })
                .unwrap_or(false)
        };
        if removed {
            self.inner.emit(SessionEvent::SlotUpdated(ContentSlot::Itinerary));
        }
        removed
    }

    /// Load the top-attractions catalog for the identified city, on demand.
    pub async fn load_top_attractions(&self) {
        let generation = self.inner.session_generation();
        let (city, country) = {
            let mut dashboard = self.inner.dashboard.write().await;
            let Some(landmark) = dashboard.landmark.as_ref() else {
                log::warn!("Attractions requested with no identified landmark");
                return;
            };
            let place = (landmark.city.clone(), landmark.country.clone());
            dashboard.attractions.loading = true;
            place
        };
        self.inner.emit(SessionEvent::SlotUpdated(ContentSlot::Attractions));

        let inner = self.inner.clone();
        Self::spawn_category(
            inner.clone(),
            generation,
            ContentSlot::Attractions,
            async move {
                categories::fetch_top_attractions(inner.backend.as_ref(), inner.retry, &city, &country)
                    .await
            },
            |dashboard, value| dashboard.attractions.data = Some(value),
        );
    }

    /// Reset to Home, clearing every slot and abandoning in-flight fetches.
    pub async fn reset(&self) {
        self.inner.session_gen.fetch_add(1, Ordering::SeqCst);
        self.inner.modal_gen.fetch_add(1, Ordering::SeqCst);
        self.inner.debouncer.invalidate();
        *self.inner.dashboard.write().await = DashboardState::default();
        *self.inner.error.write().await = None;
        self.inner.set_phase(SessionPhase::Home).await;
    }

    // ── Identification flow ─────────────────────────────────────────────

    async fn identify(&self, input: IdentifyInput) {
        let generation = self.begin_analysis().await;
        let inner = &self.inner;

        let result = match &input {
            IdentifyInput::Image(data_url) => {
                identify::analyze_landmark_image(inner.backend.as_ref(), inner.retry, data_url)
                    .await
            }
            IdentifyInput::Name(query) => {
                identify::search_landmark_by_name(inner.backend.as_ref(), inner.retry, query).await
            }
        };

        let landmark = match result {
            Ok(landmark) => landmark,
            Err(e) => {
                log::error!("Identification failed: {e}");
                if e.is_rate_limit() {
                    inner.fail_session(generation, CAPACITY_MESSAGE, true).await;
                } else {
                    inner
                        .fail_session(generation, GENERIC_FAILURE_MESSAGE, false)
                        .await;
                }
                return;
            }
        };

        let warning = match inner.gate.evaluate(landmark.confidence_score) {
            Acceptance::Rejected => {
                log::info!(
                    "Rejected identification of {:?} at confidence {}",
                    landmark.landmark_name,
                    landmark.confidence_score
                );
                inner
                    .fail_session(generation, LOW_CONFIDENCE_MESSAGE, false)
                    .await;
                return;
            }
            Acceptance::Accepted { warning } => warning,
        };

        let (name, city, country) = (
            landmark.landmark_name.clone(),
            landmark.city.clone(),
            landmark.country.clone(),
        );

        // Landmark, warning flag, loading flags, and phase commit under one
        // dashboard lock acquisition, re-checking the generation inside it.
        // A reset can then only run entirely before (stale, we bail) or
        // entirely after (it clears everything we wrote) this block.
        {
            let mut dashboard = inner.dashboard.write().await;
            if inner.session_generation() != generation {
                log::debug!("Discarding identification result from an abandoned session");
                return;
            }
            dashboard.landmark = Some(landmark);
            dashboard.low_confidence_warning = warning;
            for slot in DASHBOARD_SLOTS {
                dashboard.set_loading(slot, true);
            }
            *inner.phase.write().await = SessionPhase::Dashboard;
        }
        inner.emit(SessionEvent::PhaseChanged(SessionPhase::Dashboard));
        inner.emit(SessionEvent::LandmarkIdentified { warning });
        for slot in DASHBOARD_SLOTS {
            inner.emit(SessionEvent::SlotUpdated(slot));
        }

        self.fan_out(generation, name, city, country);
    }

    /// Start a new analysis generation: prior category state is cleared and
    /// any in-flight fetch from the previous generation becomes stale.
    async fn begin_analysis(&self) -> u64 {
        let generation = self.inner.session_gen.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.modal_gen.fetch_add(1, Ordering::SeqCst);
        *self.inner.dashboard.write().await = DashboardState::default();
        *self.inner.error.write().await = None;
        self.inner.set_phase(SessionPhase::Analyzing).await;
        generation
    }

    /// Fire the five dashboard fetches in a fixed order, none blocking the
    /// others and no completion-order guarantee. Loading flags were already
    /// set by the identification commit.
    fn fan_out(&self, generation: u64, name: String, city: String, country: String) {
        {
            let inner = self.inner.clone();
            let (name, city, country) = (name.clone(), city.clone(), country.clone());
            Self::spawn_category(
                inner.clone(),
                generation,
                ContentSlot::History,
                async move {
                    categories::fetch_history(inner.backend.as_ref(), inner.retry, &name, &city, &country)
                        .await
                },
                |dashboard, value| dashboard.history.data = Some(value),
            );
        }
        {
            let inner = self.inner.clone();
            let (name, city, country) = (name.clone(), city.clone(), country.clone());
            Self::spawn_category(
                inner.clone(),
                generation,
                ContentSlot::Nearby,
                async move {
                    categories::fetch_nearby_places(
                        inner.backend.as_ref(),
                        inner.retry,
                        &name,
                        &city,
                        &country,
                    )
                    .await
                },
                |dashboard, value| dashboard.nearby.data = Some(value),
            );
        }
        {
            let inner = self.inner.clone();
            let (city, country) = (city.clone(), country.clone());
            Self::spawn_category(
                inner.clone(),
                generation,
                ContentSlot::Culture,
                async move {
                    categories::fetch_culture(inner.backend.as_ref(), inner.retry, &city, &country)
                        .await
                },
                |dashboard, value| dashboard.culture.data = Some(value),
            );
        }
        {
            let inner = self.inner.clone();
            let (city, country) = (city.clone(), country.clone());
            Self::spawn_category(
                inner.clone(),
                generation,
                ContentSlot::Events,
                async move {
                    categories::fetch_events(inner.backend.as_ref(), inner.retry, &city, &country)
                        .await
                },
                |dashboard, value| dashboard.events.data = Some(value),
            );
        }
        {
            let inner = self.inner.clone();
            Self::spawn_category(
                inner.clone(),
                generation,
                ContentSlot::Logistics,
                async move {
                    categories::fetch_logistics(inner.backend.as_ref(), inner.retry, &city, &country)
                        .await
                },
                |dashboard, value| dashboard.logistics.data = Some(value),
            );
        }
    }

    /// One supervised slot fetch: awaits `fetch`, then writes its slot only
    /// if the session generation still matches. Errors are logged and leave
    /// the slot empty; the loading flag clears either way.
    fn spawn_category<T, Fut, Store>(
        inner: Arc<SessionInner>,
        generation: u64,
        slot: ContentSlot,
        fetch: Fut,
        store: Store,
    ) where
        T: Send + 'static,
        Fut: Future<Output = gemini::Result<T>> + Send + 'static,
        Store: FnOnce(&mut DashboardState, T) + Send + 'static,
    {
        tokio::spawn(async move {
            let result = fetch.await;

            let mut dashboard = inner.dashboard.write().await;
            if inner.session_generation() != generation {
                log::debug!("Discarding stale {slot:?} result from an abandoned session");
                return;
            }
            match result {
                Ok(value) => store(&mut dashboard, value),
                Err(e) => log::error!("{slot:?} fetch failed: {e}"),
            }
            dashboard.set_loading(slot, false);
            drop(dashboard);
            inner.emit(SessionEvent::SlotUpdated(slot));
        });
    }
}
