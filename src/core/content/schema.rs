//! Response schema registry.
//!
//! Strict `responseSchema` constraints sent with each schema-shaped category
//! call. Grounded categories (events, logistics) cannot carry a strict schema
//! and describe their shape in the prompt instead; their defaults live in
//! `normalize`.

use serde_json::{json, Value};

pub fn landmark() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "landmarkName": { "type": "STRING" },
            "alternativeNames": { "type": "ARRAY", "items": { "type": "STRING" } },
            "possibleLocations": { "type": "ARRAY", "items": { "type": "STRING" } },
            "city": { "type": "STRING" },
            "country": { "type": "STRING" },
            "confidenceScore": { "type": "NUMBER" },
            "description": { "type": "STRING" },
            "descriptionPoints": { "type": "ARRAY", "items": { "type": "STRING" } },
            "tags": { "type": "ARRAY", "items": { "type": "STRING" } },
        },
    })
}

pub fn history() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": { "type": "STRING" },
            "historyPoints": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "content": { "type": "STRING" },
                    },
                },
            },
            "funFacts": { "type": "ARRAY", "items": { "type": "STRING" } },
        },
    })
}

pub fn nearby() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "placeName": { "type": "STRING" },
                "category": { "type": "STRING" },
                "distanceKm": { "type": "NUMBER" },
                "approxTimeMinutes": { "type": "NUMBER" },
                "shortDescription": { "type": "STRING" },
                "openingHours": { "type": "STRING" },
            },
        },
    })
}

pub fn attractions() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "name": { "type": "STRING" },
                "description": { "type": "STRING" },
                "openingHours": { "type": "STRING" },
                "suggestedDuration": { "type": "STRING" },
                "rating": { "type": "STRING" },
                "locationType": { "type": "STRING" },
            },
        },
    })
}

pub fn itinerary() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "totalDays": { "type": "NUMBER" },
            "days": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "dayNumber": { "type": "NUMBER" },
                        "dayTitle": { "type": "STRING" },
                        "steps": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "properties": {
                                    "stepTitle": { "type": "STRING" },
                                    "placeName": { "type": "STRING" },
                                    "startTime": { "type": "STRING" },
                                    "endTime": { "type": "STRING" },
                                    "durationMinutes": { "type": "NUMBER" },
                                    "whyVisit": { "type": "STRING" },
                                    "tip": { "type": "STRING" },
                                    "isHiddenGem": { "type": "BOOLEAN" },
                                },
                            },
                        },
                    },
                },
            },
        },
    })
}

pub fn culture() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "culinaryHighlights": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "description": { "type": "STRING" },
                    },
                },
            },
            "culturalEtiquette": { "type": "ARRAY", "items": { "type": "STRING" } },
            "localTraditions": { "type": "ARRAY", "items": { "type": "STRING" } },
        },
    })
}

pub fn deep_dive() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "topic": { "type": "STRING" },
            "details": { "type": "ARRAY", "items": { "type": "STRING" } },
            "stylingTips": { "type": "ARRAY", "items": { "type": "STRING" } },
            "bestPlaces": { "type": "ARRAY", "items": { "type": "STRING" } },
            "relatedInfo": { "type": "ARRAY", "items": { "type": "STRING" } },
        },
    })
}

pub fn suggestions() -> Value {
    json!({ "type": "ARRAY", "items": { "type": "STRING" } })
}
