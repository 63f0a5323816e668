//! End-to-end session flows over a scripted backend: identification gating,
//! dashboard fan-out, failure isolation, itinerary editing, debounced
//! suggestions, and stale-result discard after reset.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::Semaphore;

use tripsight::config::SessionConfig;
use tripsight::core::content::ItineraryRequest;
use tripsight::core::gemini::{Citation, GeminiError, GenerateReply, GenerateRequest};
use tripsight::core::session::{ContentSlot, SessionEvent, SessionPhase};
use tripsight::{GenerativeBackend, TravelSession};

/// Routes each request by prompt keywords to a canned JSON reply, with
/// switches for the failure scenarios.
#[derive(Default)]
struct ScriptedBackend {
    confidence: f64,
    identify_rate_limited: bool,
    history_fails: bool,
    /// When set, category fetches block until the test adds permits.
    hold_categories: Option<Arc<Semaphore>>,
    /// When set, identification calls block until the test adds permits.
    hold_identify: Option<Arc<Semaphore>>,
    suggestion_calls: AtomicU32,
}

impl ScriptedBackend {
    fn with_confidence(confidence: f64) -> Self {
        Self {
            confidence,
            ..Self::default()
        }
    }

    fn identify_reply(&self) -> GenerateReply {
        reply(&format!(
            r#"{{"landmarkName": "Eiffel Tower", "alternativeNames": ["La Tour Eiffel"],
                "city": "Paris", "country": "France", "confidenceScore": {},
                "description": "Wrought-iron lattice tower on the Champ de Mars.",
                "descriptionPoints": ["Completed in 1889", "330 metres tall"]}}"#,
            self.confidence
        ))
    }
}

fn reply(text: &str) -> GenerateReply {
    GenerateReply {
        text: text.to_string(),
        citations: Vec::new(),
    }
}

#[async_trait]
impl GenerativeBackend for ScriptedBackend {
    async fn generate(&self, request: GenerateRequest) -> tripsight::core::gemini::Result<GenerateReply> {
        let prompt = request.prompt.as_str();

        if prompt.contains("Identify this landmark") || prompt.contains("Detail the landmark") {
            if let Some(gate) = &self.hold_identify {
                let _ = gate.acquire().await;
            }
            if self.identify_rate_limited {
                return Err(GeminiError::api(429, "Resource has been exhausted"));
            }
            return Ok(self.identify_reply());
        }

        if let Some(gate) = &self.hold_categories {
            let _ = gate.acquire().await;
        }

        if prompt.contains("history of") {
            if self.history_fails {
                return Err(GeminiError::api(500, "Internal error"));
            }
            return Ok(reply(
                r#"{"summary": "Built for the 1889 World's Fair.",
                    "historyPoints": [{"title": "Construction", "content": "1887 to 1889."}],
                    "funFacts": ["Painted every seven years"]}"#,
            ));
        }
        if prompt.contains("nearby attractions around") {
            return Ok(reply(
                r#"[{"placeName": "Musee d'Orsay", "category": "Museum", "distanceKm": 2.1,
                     "approxTimeMinutes": 25, "shortDescription": "Impressionist art.",
                     "openingHours": "09:30-18:00"}]"#,
            ));
        }
        if prompt.contains("cuisine and culture") {
            return Ok(reply(
                r#"{"culinaryHighlights": [{"name": "Croissant", "description": "Flaky pastry."}],
                    "culturalEtiquette": ["Greet shopkeepers"],
                    "localTraditions": ["Bastille Day"]}"#,
            ));
        }
        if prompt.contains("upcoming events") {
            return Ok(GenerateReply {
                text: r#"{"categories": [{"categoryName": "Music",
                          "events": [{"title": "Open-air concert", "date": "Saturday",
                                      "location": "Champ de Mars", "description": "Free entry.",
                                      "mapQuery": "Champ de Mars Paris"}]}]}"#
                    .to_string(),
                citations: vec![Citation {
                    title: "Paris events".to_string(),
                    url: "https://example.com/events".to_string(),
                }],
            });
        }
        if prompt.contains("transport and hotels") {
            return Ok(reply(
                r#"{"cabs": ["G7"], "rentals": ["Velib"],
                    "hotels": {"luxury": [{"name": "Le Meurice", "rating": "5-star",
                                           "description": "Palace hotel."}],
                               "midRange": [], "budget": []}}"#,
            ));
        }
        if prompt.contains("top rated tourist attractions") {
            return Ok(reply(
                r#"[{"name": "Louvre", "description": "World's largest art museum.",
                     "openingHours": "09:00-18:00", "suggestedDuration": "3 hours",
                     "rating": "4.7", "locationType": "Museum"}]"#,
            ));
        }
        if prompt.starts_with("Plan ") {
            return Ok(reply(
                r#"{"title": "Three Days in Paris", "totalDays": 3, "days": [
                    {"dayNumber": 1, "dayTitle": "Icons", "steps": [
                        {"stepTitle": "Eiffel Tower", "placeName": "Eiffel Tower",
                         "startTime": "09:00 AM", "endTime": "11:00 AM",
                         "durationMinutes": 120, "whyVisit": "The anchor.", "tip": "Book ahead.",
                         "isHiddenGem": false},
                        {"stepTitle": "Seine lunch", "placeName": "Les Ombres",
                         "startTime": "12:00 PM", "endTime": "01:30 PM",
                         "durationMinutes": 90, "whyVisit": "River views.", "tip": "",
                         "isHiddenGem": true}]},
                    {"dayNumber": 2, "dayTitle": "Art", "steps": [
                        {"stepTitle": "Louvre", "placeName": "Louvre",
                         "startTime": "09:00 AM", "endTime": "12:00 PM",
                         "durationMinutes": 180, "whyVisit": "The collection.", "tip": "",
                         "isHiddenGem": false}]},
                    {"dayNumber": 3, "dayTitle": "Montmartre", "steps": [
                        {"stepTitle": "Sacre-Coeur", "placeName": "Sacre-Coeur",
                         "startTime": "10:00 AM", "endTime": "11:30 AM",
                         "durationMinutes": 90, "whyVisit": "The view.", "tip": "",
                         "isHiddenGem": false}]}]}"#,
            ));
        }
        if prompt.starts_with("Deep dive on:") {
            return Ok(reply(
                r#"{"topic": "Croissant", "details": ["Laminated dough", "Best eaten fresh"],
                    "bestPlaces": ["Du Pain et des Idees"]}"#,
            ));
        }
        if prompt.starts_with("Suggest") {
            self.suggestion_calls.fetch_add(1, Ordering::SeqCst);
            return Ok(reply(r#"["Paris, France", "Parthenon, Athens"]"#));
        }

        Err(GeminiError::InvalidResponse(format!(
            "unscripted prompt: {prompt}"
        )))
    }
}

fn session_with(backend: ScriptedBackend) -> (TravelSession, UnboundedReceiver<SessionEvent>) {
    TravelSession::new(Arc::new(backend), &SessionConfig::default())
}

const DASHBOARD_SLOTS: [ContentSlot; 5] = [
    ContentSlot::History,
    ContentSlot::Nearby,
    ContentSlot::Culture,
    ContentSlot::Events,
    ContentSlot::Logistics,
];

/// Drain events until no watched slot is still loading.
async fn drain_until_idle(
    session: &TravelSession,
    rx: &mut UnboundedReceiver<SessionEvent>,
    slots: &[ContentSlot],
) {
    loop {
        let dashboard = session.dashboard().await;
        if !slots.iter().any(|s| dashboard.is_loading(*s)) {
            return;
        }
        let _ = rx.recv().await;
    }
}

#[tokio::test]
async fn low_confidence_identification_is_rejected() {
    let (session, _rx) = session_with(ScriptedBackend::with_confidence(35.0));

    session.submit_image(b"not-really-a-jpeg").await;

    assert_eq!(session.phase().await, SessionPhase::Error);
    let error = session.last_error().await.unwrap();
    assert!(error.message.contains("confidently identify"));
    assert!(!error.capacity);
    assert!(session.dashboard().await.landmark.is_none());
}

#[tokio::test]
async fn borderline_confidence_reaches_dashboard_with_warning() {
    let (session, mut rx) = session_with(ScriptedBackend::with_confidence(45.0));

    session.submit_image(b"not-really-a-jpeg").await;

    assert_eq!(session.phase().await, SessionPhase::Dashboard);
    drain_until_idle(&session, &mut rx, &DASHBOARD_SLOTS).await;

    let dashboard = session.dashboard().await;
    assert!(dashboard.low_confidence_warning);
    let landmark = dashboard.landmark.as_ref().unwrap();
    assert_eq!(landmark.landmark_name, "Eiffel Tower");
    assert_eq!(landmark.city, "Paris");
    // Uploaded photo round-trips as a data URL.
    assert!(landmark.image.starts_with("data:image/jpeg;base64,"));

    assert_eq!(dashboard.history.data.as_ref().unwrap().fun_facts.len(), 1);
    assert_eq!(dashboard.nearby.data.as_ref().unwrap()[0].place_name, "Musee d'Orsay");
    assert_eq!(
        dashboard.culture.data.as_ref().unwrap().culinary_highlights[0].name,
        "Croissant"
    );
    let events = dashboard.events.data.as_ref().unwrap();
    assert_eq!(events.categories[0].events[0].title, "Open-air concert");
    assert_eq!(events.sources[0].url, "https://example.com/events");
    assert_eq!(dashboard.logistics.data.as_ref().unwrap().hotels.luxury.len(), 1);
}

#[tokio::test]
async fn confident_search_does_not_warn() {
    let (session, mut rx) = session_with(ScriptedBackend::with_confidence(92.0));

    session.submit_search("eiffel tower").await;
    drain_until_idle(&session, &mut rx, &DASHBOARD_SLOTS).await;

    let dashboard = session.dashboard().await;
    assert!(!dashboard.low_confidence_warning);
    // Text search synthesizes a reference image instead of echoing a photo.
    assert!(dashboard
        .landmark
        .as_ref()
        .unwrap()
        .image
        .contains("pollinations.ai"));
}

#[tokio::test]
async fn one_failed_category_leaves_the_rest_standing() {
    let backend = ScriptedBackend {
        confidence: 88.0,
        history_fails: true,
        ..ScriptedBackend::default()
    };
    let (session, mut rx) = session_with(backend);

    session.submit_search("eiffel tower").await;
    drain_until_idle(&session, &mut rx, &DASHBOARD_SLOTS).await;

    assert_eq!(session.phase().await, SessionPhase::Dashboard);
    assert!(session.last_error().await.is_none());

    let dashboard = session.dashboard().await;
    assert!(dashboard.history.is_empty());
    assert!(!dashboard.history.loading);
    assert!(dashboard.nearby.data.is_some());
    assert!(dashboard.culture.data.is_some());
    assert!(dashboard.events.data.is_some());
    assert!(dashboard.logistics.data.is_some());
}

#[tokio::test(start_paused = true)]
async fn rate_limited_identification_reports_capacity() {
    let backend = ScriptedBackend {
        confidence: 90.0,
        identify_rate_limited: true,
        ..ScriptedBackend::default()
    };
    let (session, _rx) = session_with(backend);

    session.submit_search("eiffel tower").await;

    assert_eq!(session.phase().await, SessionPhase::Error);
    let error = session.last_error().await.unwrap();
    assert!(error.capacity);
    assert!(error.message.contains("capacity"));
}

#[tokio::test]
async fn itinerary_steps_delete_without_renumbering() {
    let (session, mut rx) = session_with(ScriptedBackend::with_confidence(95.0));

    session.submit_search("eiffel tower").await;
    drain_until_idle(&session, &mut rx, &DASHBOARD_SLOTS).await;

    let request = ItineraryRequest {
        num_days: 3,
        ..ItineraryRequest::default()
    };
    session.generate_itinerary(request).await;
    drain_until_idle(&session, &mut rx, &[ContentSlot::Itinerary]).await;

    let itinerary = session.dashboard().await.itinerary.data.unwrap();
    assert_eq!(itinerary.total_days, 3);
    assert_eq!(itinerary.days[0].steps.len(), 2);

    assert!(session.delete_itinerary_step(1, 0).await);
    let itinerary = session.dashboard().await.itinerary.data.unwrap();
    // Remaining steps and days keep their numbering and times.
    assert_eq!(itinerary.days[0].steps.len(), 1);
    assert_eq!(itinerary.days[0].steps[0].step_title, "Seine lunch");
    assert_eq!(itinerary.days[0].steps[0].start_time, "12:00 PM");
    let day_numbers: Vec<u32> = itinerary.days.iter().map(|d| d.day_number).collect();
    assert_eq!(day_numbers, vec![1, 2, 3]);

    // Out-of-range indexes and unknown days are rejected.
    assert!(!session.delete_itinerary_step(1, 5).await);
    assert!(!session.delete_itinerary_step(9, 0).await);
}

#[tokio::test]
async fn top_attractions_load_on_demand() {
    let (session, mut rx) = session_with(ScriptedBackend::with_confidence(95.0));

    session.submit_search("eiffel tower").await;
    drain_until_idle(&session, &mut rx, &DASHBOARD_SLOTS).await;

    session.load_top_attractions().await;
    drain_until_idle(&session, &mut rx, &[ContentSlot::Attractions]).await;

    let attractions = session.dashboard().await.attractions.data.unwrap();
    assert_eq!(attractions[0].name, "Louvre");
}

#[tokio::test]
async fn deep_dive_opens_and_closes() {
    let (session, mut rx) = session_with(ScriptedBackend::with_confidence(95.0));

    session.submit_search("eiffel tower").await;
    drain_until_idle(&session, &mut rx, &DASHBOARD_SLOTS).await;

    session.request_deep_dive("Croissant", "Flaky pastry.").await;
    drain_until_idle(&session, &mut rx, &[ContentSlot::DeepDive]).await;

    let dashboard = session.dashboard().await;
    assert_eq!(dashboard.deep_dive_topic, "Croissant");
    assert_eq!(dashboard.deep_dive.data.as_ref().unwrap().details.len(), 2);

    session.close_deep_dive().await;
    let dashboard = session.dashboard().await;
    assert!(dashboard.deep_dive.is_empty());
    assert!(dashboard.deep_dive_topic.is_empty());
}

#[tokio::test(start_paused = true)]
async fn suggestions_fire_once_after_the_typing_settles() {
    let backend = Arc::new(ScriptedBackend::with_confidence(95.0));
    let (session, mut rx) = TravelSession::new(backend.clone(), &SessionConfig::default());

    for query in ["P", "Pa", "Par", "Pari", "Paris"] {
        session.note_query_edit(query);
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
    tokio::time::sleep(Duration::from_millis(600)).await;

    // Only the final settled text reached the backend.
    assert_eq!(backend.suggestion_calls.load(Ordering::SeqCst), 1);

    let event = rx.recv().await.unwrap();
    assert_eq!(
        event,
        SessionEvent::SuggestionsReady(vec![
            "Paris, France".to_string(),
            "Parthenon, Athens".to_string(),
        ])
    );
    assert_eq!(
        session.dashboard().await.suggestions,
        vec!["Paris, France", "Parthenon, Athens"]
    );
}

#[tokio::test(start_paused = true)]
async fn sub_two_character_queries_never_fetch() {
    let backend = Arc::new(ScriptedBackend::with_confidence(95.0));
    let (session, _rx) = TravelSession::new(backend.clone(), &SessionConfig::default());

    session.note_query_edit("P");
    session.note_query_edit("  ");
    tokio::time::sleep(Duration::from_millis(1000)).await;

    assert_eq!(backend.suggestion_calls.load(Ordering::SeqCst), 0);
    assert!(session.dashboard().await.suggestions.is_empty());
}

#[tokio::test]
async fn reset_during_identification_never_revives_the_session() {
    let gate = Arc::new(Semaphore::new(0));
    let backend = ScriptedBackend {
        confidence: 95.0,
        hold_identify: Some(gate.clone()),
        ..ScriptedBackend::default()
    };
    let (session, _rx) = session_with(backend);

    let submit = tokio::spawn({
        let session = session.clone();
        async move { session.submit_search("eiffel tower").await }
    });
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
    assert_eq!(session.phase().await, SessionPhase::Analyzing);

    session.reset().await;
    assert_eq!(session.phase().await, SessionPhase::Home);

    // Release the identification; its accepted result must not commit.
    gate.add_permits(1);
    submit.await.unwrap();
    for _ in 0..32 {
        tokio::task::yield_now().await;
    }

    assert_eq!(session.phase().await, SessionPhase::Home);
    let dashboard = session.dashboard().await;
    assert!(dashboard.landmark.is_none());
    for slot in DASHBOARD_SLOTS {
        assert!(!dashboard.is_loading(slot));
    }
}

#[tokio::test(start_paused = true)]
async fn reset_during_failed_identification_stays_home() {
    let gate = Arc::new(Semaphore::new(0));
    let backend = ScriptedBackend {
        confidence: 95.0,
        identify_rate_limited: true,
        hold_identify: Some(gate.clone()),
        ..ScriptedBackend::default()
    };
    let (session, _rx) = session_with(backend);

    let submit = tokio::spawn({
        let session = session.clone();
        async move { session.submit_search("eiffel tower").await }
    });
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }

    session.reset().await;

    // The retried attempts drain their permits, then the final rate-limit
    // error must not flip the new session into Error.
    gate.add_permits(16);
    submit.await.unwrap();

    assert_eq!(session.phase().await, SessionPhase::Home);
    assert!(session.last_error().await.is_none());
}

#[tokio::test]
async fn reset_discards_in_flight_category_results() {
    let gate = Arc::new(Semaphore::new(0));
    let backend = ScriptedBackend {
        confidence: 95.0,
        hold_categories: Some(gate.clone()),
        ..ScriptedBackend::default()
    };
    let (session, _rx) = session_with(backend);

    session.submit_search("eiffel tower").await;
    assert_eq!(session.phase().await, SessionPhase::Dashboard);
    assert!(session.dashboard().await.is_loading(ContentSlot::History));

    session.reset().await;
    assert_eq!(session.phase().await, SessionPhase::Home);

    // Release the held fetches; their completions must be dropped.
    gate.add_permits(32);
    for _ in 0..32 {
        tokio::task::yield_now().await;
    }

    let dashboard = session.dashboard().await;
    assert!(dashboard.landmark.is_none());
    for slot in DASHBOARD_SLOTS {
        assert!(!dashboard.is_loading(slot));
    }
    assert!(dashboard.history.is_empty());
    assert!(dashboard.nearby.is_empty());
}
