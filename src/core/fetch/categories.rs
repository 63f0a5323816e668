//! Category fetchers: one function per dashboard content category.
//!
//! Each builds a natural-language prompt from its parameters, calls the
//! backend through the retry wrapper, extracts JSON from the reply, and
//! normalizes the result. No caching or deduplication: identical calls issue
//! independent requests.

use crate::core::content::{
    normalize, schema, Attraction, Culture, DeepDive, Events, History, Logistics, NearbyPlace,
    SourceLink,
};
use crate::core::gemini::{
    extract_json, with_retry, GenerateRequest, GenerativeBackend, Result, RetryPolicy,
};

pub async fn fetch_history(
    backend: &dyn GenerativeBackend,
    retry: RetryPolicy,
    landmark: &str,
    city: &str,
    country: &str,
) -> Result<History> {
    let request = GenerateRequest::text(format!(
        "Provide the history of: {landmark} in {city}, {country}. \
         Return JSON with a summary, titled historyPoints, and funFacts."
    ))
    .with_schema(schema::history());

    let reply = with_retry(|| backend.generate(request.clone()), retry).await?;
    Ok(normalize::history(&extract_json(&reply.text)?))
}

pub async fn fetch_nearby_places(
    backend: &dyn GenerativeBackend,
    retry: RetryPolicy,
    landmark: &str,
    city: &str,
    country: &str,
) -> Result<Vec<NearbyPlace>> {
    let request = GenerateRequest::text(format!(
        "List 5-8 real nearby attractions around: {landmark} in {city}, {country}. \
         Return a JSON array with place name, category, distance in km, approximate \
         transit minutes, short description, and opening hours."
    ))
    .with_schema(schema::nearby());

    let reply = with_retry(|| backend.generate(request.clone()), retry).await?;
    Ok(normalize::nearby(&extract_json(&reply.text)?))
}

pub async fn fetch_top_attractions(
    backend: &dyn GenerativeBackend,
    retry: RetryPolicy,
    city: &str,
    country: &str,
) -> Result<Vec<Attraction>> {
    let request = GenerateRequest::text(format!(
        "List 5-6 top rated tourist attractions in {city}, {country}. Return a JSON array."
    ))
    .with_schema(schema::attractions());

    let reply = with_retry(|| backend.generate(request.clone()), retry).await?;
    Ok(normalize::attractions(&extract_json(&reply.text)?))
}

pub async fn fetch_culture(
    backend: &dyn GenerativeBackend,
    retry: RetryPolicy,
    city: &str,
    country: &str,
) -> Result<Culture> {
    let request = GenerateRequest::text(format!(
        "Describe the cuisine and culture of {city}, {country}. Return JSON with \
         culinaryHighlights, culturalEtiquette, and localTraditions."
    ))
    .with_schema(schema::culture());

    let reply = with_retry(|| backend.generate(request.clone()), retry).await?;
    Ok(normalize::culture(&extract_json(&reply.text)?))
}

/// Live events need current information, so this call requests search
/// grounding instead of a strict schema. The citation list comes from
/// grounding metadata and survives even when the JSON body fails to parse.
pub async fn fetch_events(
    backend: &dyn GenerativeBackend,
    retry: RetryPolicy,
    city: &str,
    country: &str,
) -> Result<Events> {
    let request = GenerateRequest::text(format!(
        "Find current and upcoming events in {city}, {country}. Return JSON of the form \
         {{\"categories\": [{{\"categoryName\": string, \"events\": [{{\"title\", \"date\", \
         \"location\", \"description\", \"mapQuery\"}}]}}]}} where mapQuery is a map search \
         string for the venue."
    ))
    .with_search_grounding();

    let reply = with_retry(|| backend.generate(request.clone()), retry).await?;

    let sources: Vec<SourceLink> = reply
        .citations
        .iter()
        .map(|c| SourceLink {
            title: c.title.clone(),
            url: c.url.clone(),
        })
        .collect();

    let categories = match extract_json(&reply.text) {
        Ok(value) => normalize::event_categories(&value),
        Err(e) => {
            log::warn!("Events body was not parseable JSON, keeping sources only: {e}");
            Vec::new()
        }
    };

    Ok(Events {
        categories,
        sources,
    })
}

/// Grounded like events; an unparseable body degrades to all-default fields.
pub async fn fetch_logistics(
    backend: &dyn GenerativeBackend,
    retry: RetryPolicy,
    city: &str,
    country: &str,
) -> Result<Logistics> {
    let request = GenerateRequest::text(format!(
        "Describe transport and hotels in {city}, {country}. Return JSON of the form \
         {{\"cabs\": [string], \"rentals\": [string], \"hotels\": {{\"luxury\": [], \
         \"midRange\": [], \"budget\": []}}}} where each hotel has name, rating, and \
         description."
    ))
    .with_search_grounding();

    let reply = with_retry(|| backend.generate(request.clone()), retry).await?;

    let logistics = match extract_json(&reply.text) {
        Ok(value) => normalize::logistics(&value),
        Err(e) => {
            log::warn!("Logistics body was not parseable JSON, returning defaults: {e}");
            Logistics::default()
        }
    };

    Ok(logistics)
}

/// Topic-scoped supplementary content for the deep-dive modal.
pub async fn explore_topic(
    backend: &dyn GenerativeBackend,
    retry: RetryPolicy,
    topic: &str,
    context: &str,
    city: &str,
) -> Result<DeepDive> {
    let request = GenerateRequest::text(format!(
        "Deep dive on: \"{topic}\" in {city}. Context: {context}. Return JSON with the \
         topic, detailed bullet points, and where relevant: stylingTips (crafts and \
         fashion items), bestPlaces (food topics), relatedInfo."
    ))
    .with_schema(schema::deep_dive());

    let reply = with_retry(|| backend.generate(request.clone()), retry).await?;
    Ok(normalize::deep_dive(&extract_json(&reply.text)?, topic))
}

/// Short suggestion list for the search box. Queries under 2 characters
/// short-circuit to empty without a network call.
pub async fn search_suggestions(
    backend: &dyn GenerativeBackend,
    retry: RetryPolicy,
    query: &str,
) -> Result<Vec<String>> {
    let query = query.trim();
    if query.chars().count() < 2 {
        return Ok(Vec::new());
    }

    let request = GenerateRequest::text(format!(
        "Suggest 6-8 popular travel landmarks or cities that match: \"{query}\". \
         Return a raw JSON array of strings."
    ))
    .with_schema(schema::suggestions());

    let reply = with_retry(|| backend.generate(request.clone()), retry).await?;
    Ok(normalize::suggestions(&extract_json(&reply.text)?))
}
