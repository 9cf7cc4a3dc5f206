use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A verified point of interest. Identity is `name` (case-sensitive).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub address: String,
    /// `[longitude, latitude]`
    pub coordinates: [f64; 2],
}

/// The planning record threaded through the workflow and round-tripped by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripState {
    pub destination: String,
    pub duration_days: u32,
    pub vibe: String,
    #[serde(default)]
    pub places_to_avoid: Vec<String>,
    #[serde(default)]
    pub user_feedback: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub search_results: Vec<Place>,
    #[serde(default)]
    pub itinerary_draft: String,
}

impl TripState {
    pub fn new(destination: String, duration_days: u32, vibe: String, places_to_avoid: Vec<String>) -> Self {
        let mut state = Self {
            destination,
            duration_days,
            vibe,
            places_to_avoid: Vec::new(),
            user_feedback: None,
            keywords: Vec::new(),
            search_results: Vec::new(),
            itinerary_draft: String::new(),
        };
        for place in places_to_avoid {
            state.avoid(place);
        }
        state
    }

    /// Appends to the avoid-list. Blank names and exact duplicates are ignored.
    pub fn avoid(&mut self, place: String) {
        if place.trim().is_empty() || self.places_to_avoid.contains(&place) {
            return;
        }
        self.places_to_avoid.push(place);
    }

    /// Shallow field replacement: only the field a node declares is touched.
    pub fn apply(&mut self, output: NodeOutput) {
        match output {
            NodeOutput::Keywords(keywords) => self.keywords = keywords,
            NodeOutput::SearchResults(places) => self.search_results = places,
            NodeOutput::ItineraryDraft(draft) => self.itinerary_draft = draft,
            NodeOutput::FeedbackCleared => self.user_feedback = None,
        }
    }
}

/// Declared output of a single workflow node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeOutput {
    Keywords(Vec<String>),
    SearchResults(Vec<Place>),
    ItineraryDraft(String),
    FeedbackCleared,
}

/// Structured output requested from the keyword model.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct KeywordList {
    /// A list of specific, real place names or place categories.
    pub keywords: Vec<String>,
}

// API Request/Response models
#[derive(Debug, Deserialize)]
pub struct StartPlanRequest {
    pub destination: String,
    pub duration_days: u32,
    pub vibe: String,
    #[serde(default)]
    pub places_to_avoid: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResumePlanRequest {
    pub current_state: TripState,
    #[serde(default)]
    pub user_feedback: String,
    #[serde(default)]
    pub place_to_avoid: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub itinerary_draft: String,
    pub current_state: TripState,
}

impl From<TripState> for PlanResponse {
    fn from(state: TripState) -> Self {
        Self {
            itinerary_draft: state.itinerary_draft.clone(),
            current_state: state,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DirectionsRequest {
    pub start: [f64; 2],
    pub end: [f64; 2],
    #[serde(default)]
    pub profile: crate::geo::TravelProfile,
}
