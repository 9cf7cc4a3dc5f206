// Itinerary Agent: Writes the day-by-day Markdown narrative

use std::sync::Arc;
use tracing::info;

use crate::error::PlanError;
use crate::llm::LanguageModel;
use crate::models::TripState;

pub struct ItineraryAgent {
    model: Arc<dyn LanguageModel>,
}

impl ItineraryAgent {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Returns the model's Markdown untouched.
    pub async fn compose(&self, state: &TripState, feedback: Option<&str>) -> Result<String, PlanError> {
        info!(
            "Itinerary: Composing {} days in {} from {} verified places",
            state.duration_days,
            state.destination,
            state.search_results.len()
        );

        let prompt = build_prompt(state, feedback).map_err(|e| PlanError::Itinerary(e.into()))?;
        self.model.complete(&prompt).await.map_err(PlanError::Itinerary)
    }
}

fn build_prompt(state: &TripState, feedback: Option<&str>) -> Result<String, serde_json::Error> {
    let places = serde_json::to_string_pretty(&state.search_results)?;
    let feedback_line = feedback
        .map(|f| format!("- Traveller feedback on the previous draft: {f}\n"))
        .unwrap_or_default();

    Ok(format!(
        r#"You are a professional travel itinerary curator for {destination}.

Context:
- Trip Duration: {days} days.
- Desired Vibe: {vibe}.
{feedback_line}- Verified Locations Found: {places}

Your Task:
Construct a logical, narrative-driven itinerary using the verified locations provided above.

Guidelines:
1. **Clean Output:** Do NOT display coordinates (lat/long) or street addresses. Use the venue name only.
2. **Logical Flow:** Group activities by neighborhood to minimize travel time.
3. **Narrative:** In one or two sentences per stop, explain why it fits the '{vibe}' vibe.
4. **Gaps:** If there are too few verified locations, suggest general activities to fill the day, but give the verified spots priority.
5. **Format:** Use clean Markdown with one header per Day.
"#,
        destination = state.destination,
        days = state.duration_days,
        vibe = state.vibe,
    ))
}
