//! Content records produced by the category fetchers.
//!
//! All records are immutable value types: a fetch creates one wholesale and
//! the next fetch replaces it. Wire field names are camelCase to match the
//! response schemas sent to the model.

use serde::{Deserialize, Serialize};

/// Sentinel for absent location strings; never null on a returned record.
pub const UNKNOWN: &str = "Unknown";

/// Canonical interest tags offered when planning an itinerary.
pub const INTERESTS: &[&str] = &[
    "History",
    "Food",
    "Shopping",
    "Culture",
    "Nature",
    "Art",
    "Relaxation",
];

/// Google Maps search link for an arbitrary query string.
pub fn maps_search_url(query: &str) -> String {
    format!(
        "https://www.google.com/maps/search/?api=1&query={}",
        urlencoding::encode(query)
    )
}

// ── Identification ──────────────────────────────────────────────────────────

/// The identified landmark anchoring every other fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Landmark {
    pub landmark_name: String,
    pub alternative_names: Vec<String>,
    pub possible_locations: Vec<String>,
    pub city: String,
    pub country: String,
    /// Always within [0, 100].
    pub confidence_score: f64,
    pub description: String,
    pub description_points: Vec<String>,
    pub tags: Vec<String>,
    /// Uploaded image (data URL) or a synthesized reference-image URL.
    pub image: String,
}

// ── History ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct History {
    pub summary: String,
    pub history_points: Vec<HistoryPoint>,
    pub fun_facts: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryPoint {
    pub title: String,
    pub content: String,
}

// ── Nearby ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NearbyPlace {
    pub place_name: String,
    /// Open label ("museum", "street food", ...); see [`category_class`].
    ///
    /// [`category_class`]: NearbyPlace::category_class
    pub category: String,
    pub distance_km: f64,
    pub approx_time_minutes: u32,
    pub short_description: String,
    pub opening_hours: String,
}

/// Keyword-driven rendering class for an open category label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryClass {
    Food,
    Nature,
    Heritage,
    Shopping,
    General,
}

impl NearbyPlace {
    pub fn category_class(&self) -> CategoryClass {
        let c = self.category.to_lowercase();
        if c.contains("food") {
            CategoryClass::Food
        } else if c.contains("park") || c.contains("nature") {
            CategoryClass::Nature
        } else if c.contains("museum") || c.contains("history") {
            CategoryClass::Heritage
        } else if c.contains("shop") {
            CategoryClass::Shopping
        } else {
            CategoryClass::General
        }
    }

    /// Directions link: place name qualified by the session's city.
    pub fn maps_url(&self, city: &str) -> String {
        maps_search_url(&format!("{} {}", self.place_name, city))
    }
}

// ── Attractions ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Attraction {
    pub name: String,
    pub description: String,
    pub opening_hours: String,
    pub suggested_duration: String,
    pub rating: String,
    pub location_type: String,
}

// ── Itinerary ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Itinerary {
    pub title: String,
    pub total_days: u32,
    pub days: Vec<ItineraryDay>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItineraryDay {
    pub day_number: u32,
    pub day_title: String,
    pub steps: Vec<ItineraryStep>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItineraryStep {
    pub step_title: String,
    pub place_name: String,
    /// e.g. "09:00 AM"
    pub start_time: String,
    /// e.g. "10:30 AM"
    pub end_time: String,
    pub duration_minutes: u32,
    pub why_visit: String,
    pub tip: String,
    /// Less-touristed, locally authentic recommendation.
    pub is_hidden_gem: bool,
}

/// Caller-supplied parameters for itinerary generation.
#[derive(Debug, Clone, PartialEq)]
pub struct ItineraryRequest {
    pub start_time: String,
    pub end_time: String,
    pub num_days: u32,
    pub interests: Vec<String>,
    pub must_visit: String,
    pub hidden_gems: bool,
}

impl Default for ItineraryRequest {
    fn default() -> Self {
        Self {
            start_time: "09:00".to_string(),
            end_time: "18:00".to_string(),
            num_days: 1,
            interests: vec!["History".to_string(), "Culture".to_string()],
            must_visit: String::new(),
            hidden_gems: false,
        }
    }
}

// ── Culture ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Culture {
    pub culinary_highlights: Vec<CulinaryHighlight>,
    pub cultural_etiquette: Vec<String>,
    pub local_traditions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CulinaryHighlight {
    pub name: String,
    pub description: String,
}

// ── Events ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Events {
    pub categories: Vec<EventCategory>,
    /// Grounding citations; populated independently of the JSON body.
    pub sources: Vec<SourceLink>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventCategory {
    pub category_name: String,
    pub events: Vec<EventItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventItem {
    pub title: String,
    pub date: String,
    pub location: String,
    pub description: String,
    /// Query string for a directions link; see [`maps_url`].
    ///
    /// [`maps_url`]: EventItem::maps_url
    pub map_query: String,
}

impl EventItem {
    pub fn maps_url(&self) -> String {
        maps_search_url(&self.map_query)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SourceLink {
    pub title: String,
    pub url: String,
}

// ── Logistics ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Logistics {
    pub cabs: Vec<String>,
    pub rentals: Vec<String>,
    pub hotels: HotelTiers,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HotelTiers {
    pub luxury: Vec<Hotel>,
    pub mid_range: Vec<Hotel>,
    pub budget: Vec<Hotel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Hotel {
    pub name: String,
    /// e.g. "5-star"
    pub rating: String,
    pub description: String,
}

// ── Deep dive ───────────────────────────────────────────────────────────────

/// On-demand, topic-scoped supplementary content. Only `details` is
/// prompt-required; the optional lists depend on the topic kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeepDive {
    pub topic: String,
    pub details: Vec<String>,
    pub styling_tips: Vec<String>,
    pub best_places: Vec<String>,
    pub related_info: Vec<String>,
}
