//! Session state: phases, per-category slots, and the event type published
//! to the host UI.

use serde::{Deserialize, Serialize};

use crate::core::content::{
    Attraction, Culture, DeepDive, Events, History, Itinerary, Landmark, Logistics, NearbyPlace,
};

/// Top-level phase of a discovery session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Home,
    Analyzing,
    Dashboard,
    Error,
}

/// Session-level failure surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionError {
    pub message: String,
    /// Distinguishes capacity/rate-limit failures for different messaging.
    pub capacity: bool,
}

/// One dashboard slot: its record (if fetched) and a loading flag that is
/// true exactly while a fetch for it is in flight.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Slot<T> {
    pub data: Option<T>,
    pub loading: bool,
}

impl<T> Slot<T> {
    pub fn is_empty(&self) -> bool {
        self.data.is_none() && !self.loading
    }
}

/// Identifies a dashboard slot in events and loading-flag updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSlot {
    History,
    Nearby,
    Culture,
    Events,
    Logistics,
    Attractions,
    Itinerary,
    DeepDive,
}

/// Notification published on the session event channel. Consumers read the
/// current data through snapshot accessors; events only say what moved.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    PhaseChanged(SessionPhase),
    /// Identification accepted; `warning` marks the low-confidence tier.
    LandmarkIdentified { warning: bool },
    /// A slot's data or loading flag changed.
    SlotUpdated(ContentSlot),
    SuggestionsReady(Vec<String>),
}

/// All view state for one session. Written by exactly one fetcher per slot;
/// replaced wholesale on session reset.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub landmark: Option<Landmark>,
    /// Set when identification passed with 40 <= confidence < 50.
    pub low_confidence_warning: bool,
    pub history: Slot<History>,
    pub nearby: Slot<Vec<NearbyPlace>>,
    pub culture: Slot<Culture>,
    pub events: Slot<Events>,
    pub logistics: Slot<Logistics>,
    pub attractions: Slot<Vec<Attraction>>,
    pub itinerary: Slot<Itinerary>,
    pub deep_dive: Slot<DeepDive>,
    pub deep_dive_topic: String,
    pub suggestions: Vec<String>,
}

impl DashboardState {
    pub fn set_loading(&mut self, slot: ContentSlot, loading: bool) {
        match slot {
            ContentSlot::History => self.history.loading = loading,
            ContentSlot::Nearby => self.nearby.loading = loading,
            ContentSlot::Culture => self.culture.loading = loading,
            ContentSlot::Events => self.events.loading = loading,
            ContentSlot::Logistics => self.logistics.loading = loading,
            ContentSlot::Attractions => self.attractions.loading = loading,
            ContentSlot::Itinerary => self.itinerary.loading = loading,
            ContentSlot::DeepDive => self.deep_dive.loading = loading,
        }
    }

    pub fn is_loading(&self, slot: ContentSlot) -> bool {
        match slot {
            ContentSlot::History => self.history.loading,
            ContentSlot::Nearby => self.nearby.loading,
            ContentSlot::Culture => self.culture.loading,
            ContentSlot::Events => self.events.loading,
            ContentSlot::Logistics => self.logistics.loading,
            ContentSlot::Attractions => self.attractions.loading,
            ContentSlot::Itinerary => self.itinerary.loading,
            ContentSlot::DeepDive => self.deep_dive.loading,
        }
    }
}
