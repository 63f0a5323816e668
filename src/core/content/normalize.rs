//! Normalization of parsed model payloads against documented defaults.
//!
//! Every expected field that is absent or of the wrong shape is replaced by
//! its default (empty list, [`UNKNOWN`], zero, empty nested object); a
//! normalized record never has a missing required field. Normalizing an
//! already well-formed payload is a no-op.

use serde_json::Value;

use super::types::*;

fn str_field(v: &Value, key: &str, default: &str) -> String {
    v[key].as_str().unwrap_or(default).to_string()
}

fn string_list(v: &Value, key: &str) -> Vec<String> {
    v[key]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|s| s.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

fn f64_field(v: &Value, key: &str, default: f64) -> f64 {
    v[key].as_f64().unwrap_or(default)
}

fn u32_field(v: &Value, key: &str, default: u32) -> u32 {
    v[key].as_u64().map(|n| n as u32).unwrap_or(default)
}

fn items<'a>(v: &'a Value, key: &str) -> Vec<&'a Value> {
    v[key]
        .as_array()
        .map(|a| a.iter().collect())
        .unwrap_or_default()
}

/// Normalize an identification payload. `fallback_name` fills in when the
/// model omits the landmark name (the original query, or [`UNKNOWN`] for the
/// image path); `image` is caller-supplied and never comes from the payload.
pub fn landmark(v: &Value, fallback_name: &str, image: String) -> Landmark {
    Landmark {
        landmark_name: str_field(v, "landmarkName", fallback_name),
        alternative_names: string_list(v, "alternativeNames"),
        possible_locations: string_list(v, "possibleLocations"),
        city: str_field(v, "city", UNKNOWN),
        country: str_field(v, "country", UNKNOWN),
        confidence_score: f64_field(v, "confidenceScore", 0.0).clamp(0.0, 100.0),
        description: str_field(v, "description", "No description available."),
        description_points: string_list(v, "descriptionPoints"),
        tags: string_list(v, "tags"),
        image,
    }
}

pub fn history(v: &Value) -> History {
    History {
        summary: str_field(v, "summary", ""),
        history_points: items(v, "historyPoints")
            .into_iter()
            .map(|p| HistoryPoint {
                title: str_field(p, "title", ""),
                content: str_field(p, "content", ""),
            })
            .collect(),
        fun_facts: string_list(v, "funFacts"),
    }
}

pub fn nearby(v: &Value) -> Vec<NearbyPlace> {
    let places = match v.as_array() {
        Some(places) => places,
        None => return Vec::new(),
    };
    places
        .iter()
        .map(|p| NearbyPlace {
            place_name: str_field(p, "placeName", UNKNOWN),
            category: str_field(p, "category", ""),
            distance_km: f64_field(p, "distanceKm", 0.0),
            approx_time_minutes: u32_field(p, "approxTimeMinutes", 0),
            short_description: str_field(p, "shortDescription", ""),
            opening_hours: str_field(p, "openingHours", ""),
        })
        .collect()
}

pub fn attractions(v: &Value) -> Vec<Attraction> {
    let attractions = match v.as_array() {
        Some(attractions) => attractions,
        None => return Vec::new(),
    };
    attractions
        .iter()
        .map(|a| Attraction {
            name: str_field(a, "name", UNKNOWN),
            description: str_field(a, "description", ""),
            opening_hours: str_field(a, "openingHours", ""),
            suggested_duration: str_field(a, "suggestedDuration", ""),
            rating: str_field(a, "rating", ""),
            location_type: str_field(a, "locationType", ""),
        })
        .collect()
}

pub fn culture(v: &Value) -> Culture {
    Culture {
        culinary_highlights: items(v, "culinaryHighlights")
            .into_iter()
            .map(|h| CulinaryHighlight {
                name: str_field(h, "name", ""),
                description: str_field(h, "description", ""),
            })
            .collect(),
        cultural_etiquette: string_list(v, "culturalEtiquette"),
        local_traditions: string_list(v, "localTraditions"),
    }
}

/// Day numbers default to their 1-based position so a freshly created
/// itinerary is contiguous even when the model omits them.
pub fn itinerary(v: &Value) -> Itinerary {
    let days: Vec<ItineraryDay> = items(v, "days")
        .into_iter()
        .enumerate()
        .map(|(i, d)| ItineraryDay {
            day_number: u32_field(d, "dayNumber", (i + 1) as u32),
            day_title: str_field(d, "dayTitle", ""),
            steps: items(d, "steps")
                .into_iter()
                .map(|s| ItineraryStep {
                    step_title: str_field(s, "stepTitle", ""),
                    place_name: str_field(s, "placeName", ""),
                    start_time: str_field(s, "startTime", ""),
                    end_time: str_field(s, "endTime", ""),
                    duration_minutes: u32_field(s, "durationMinutes", 0),
                    why_visit: str_field(s, "whyVisit", ""),
                    tip: str_field(s, "tip", ""),
                    is_hidden_gem: s["isHiddenGem"].as_bool().unwrap_or(false),
                })
                .collect(),
        })
        .collect();

    Itinerary {
        title: str_field(v, "title", ""),
        total_days: u32_field(v, "totalDays", days.len() as u32),
        days,
    }
}

/// Event categories from a grounded response body. Sources are attached by
/// the fetcher from grounding metadata, not from the body.
pub fn event_categories(v: &Value) -> Vec<EventCategory> {
    items(v, "categories")
        .into_iter()
        .map(|c| EventCategory {
            category_name: str_field(c, "categoryName", ""),
            events: items(c, "events")
                .into_iter()
                .map(|e| EventItem {
                    title: str_field(e, "title", ""),
                    date: str_field(e, "date", ""),
                    location: str_field(e, "location", ""),
                    description: str_field(e, "description", ""),
                    map_query: str_field(e, "mapQuery", ""),
                })
                .collect(),
        })
        .collect()
}

pub fn logistics(v: &Value) -> Logistics {
    let hotel = |h: &Value| Hotel {
        name: str_field(h, "name", ""),
        rating: str_field(h, "rating", ""),
        description: str_field(h, "description", ""),
    };
    let tier = |key: &str| -> Vec<Hotel> {
        items(&v["hotels"], key).into_iter().map(hotel).collect()
    };

    Logistics {
        cabs: string_list(v, "cabs"),
        rentals: string_list(v, "rentals"),
        hotels: HotelTiers {
            luxury: tier("luxury"),
            mid_range: tier("midRange"),
            budget: tier("budget"),
        },
    }
}

pub fn deep_dive(v: &Value, fallback_topic: &str) -> DeepDive {
    DeepDive {
        topic: str_field(v, "topic", fallback_topic),
        details: string_list(v, "details"),
        styling_tips: string_list(v, "stylingTips"),
        best_places: string_list(v, "bestPlaces"),
        related_info: string_list(v, "relatedInfo"),
    }
}

pub fn suggestions(v: &Value) -> Vec<String> {
    v.as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|s| s.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_landmark_fields_get_documented_defaults() {
        let record = landmark(&json!({}), UNKNOWN, "img".to_string());
        assert_eq!(record.landmark_name, UNKNOWN);
        assert_eq!(record.city, UNKNOWN);
        assert_eq!(record.country, UNKNOWN);
        assert_eq!(record.confidence_score, 0.0);
        assert_eq!(record.description, "No description available.");
        assert!(record.tags.is_empty());
        assert_eq!(record.image, "img");
    }

    #[test]
    fn confidence_is_clamped_to_0_100() {
        let low = landmark(&json!({"confidenceScore": -5}), "x", String::new());
        assert_eq!(low.confidence_score, 0.0);
        let high = landmark(&json!({"confidenceScore": 180}), "x", String::new());
        assert_eq!(high.confidence_score, 100.0);
    }

    #[test]
    fn wrong_shape_fields_fall_back() {
        let record = landmark(
            &json!({"city": 42, "tags": "not-a-list", "confidenceScore": "high"}),
            "x",
            String::new(),
        );
        assert_eq!(record.city, UNKNOWN);
        assert!(record.tags.is_empty());
        assert_eq!(record.confidence_score, 0.0);
    }

    #[test]
    fn normalizing_a_well_formed_payload_is_identity() {
        let original = Culture {
            culinary_highlights: vec![CulinaryHighlight {
                name: "Crêpe".to_string(),
                description: "Thin pancake".to_string(),
            }],
            cultural_etiquette: vec!["Greet with bonjour".to_string()],
            local_traditions: vec!["Bastille Day".to_string()],
        };
        let roundtripped = culture(&serde_json::to_value(&original).unwrap());
        assert_eq!(roundtripped, original);

        let original = Logistics {
            cabs: vec!["G7".to_string()],
            rentals: vec!["Hertz".to_string()],
            hotels: HotelTiers {
                luxury: vec![Hotel {
                    name: "Ritz".to_string(),
                    rating: "5-star".to_string(),
                    description: "Place Vendôme".to_string(),
                }],
                mid_range: vec![],
                budget: vec![],
            },
        };
        assert_eq!(logistics(&serde_json::to_value(&original).unwrap()), original);

        let original = Itinerary {
            title: "3 days in Paris".to_string(),
            total_days: 3,
            days: vec![ItineraryDay {
                day_number: 1,
                day_title: "Old Paris".to_string(),
                steps: vec![ItineraryStep {
                    step_title: "Morning at the Louvre".to_string(),
                    place_name: "Louvre".to_string(),
                    start_time: "09:00 AM".to_string(),
                    end_time: "11:30 AM".to_string(),
                    duration_minutes: 150,
                    why_visit: "World-class collection".to_string(),
                    tip: "Book ahead".to_string(),
                    is_hidden_gem: false,
                }],
            }],
        };
        assert_eq!(itinerary(&serde_json::to_value(&original).unwrap()), original);
    }

    #[test]
    fn missing_day_numbers_become_contiguous() {
        let record = itinerary(&json!({
            "days": [{"steps": []}, {"steps": []}, {"steps": []}]
        }));
        let numbers: Vec<u32> = record.days.iter().map(|d| d.day_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(record.total_days, 3);
    }

    #[test]
    fn non_array_nearby_payload_is_empty() {
        assert!(nearby(&json!({"oops": true})).is_empty());
        assert!(attractions(&json!("text")).is_empty());
        assert!(suggestions(&json!({})).is_empty());
    }

    #[test]
    fn logistics_without_hotels_gets_empty_tiers() {
        let record = logistics(&json!({"cabs": ["Uber"]}));
        assert_eq!(record.cabs, vec!["Uber".to_string()]);
        assert!(record.hotels.luxury.is_empty());
        assert!(record.hotels.mid_range.is_empty());
        assert!(record.hotels.budget.is_empty());
    }

    #[test]
    fn deep_dive_defaults_optional_lists() {
        let record = deep_dive(&json!({"details": ["a"]}), "Crêpes");
        assert_eq!(record.topic, "Crêpes");
        assert_eq!(record.details, vec!["a".to_string()]);
        assert!(record.styling_tips.is_empty());
        assert!(record.best_places.is_empty());
        assert!(record.related_info.is_empty());
    }
}
