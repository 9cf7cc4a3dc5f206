// Keyword Agent: Turns trip parameters into a list of search terms

use std::sync::Arc;
use tracing::info;

use crate::error::PlanError;
use crate::llm::{generate_structured, LanguageModel};
use crate::models::{KeywordList, TripState};

/// Roughly four stops per day (morning, afternoon, evening, plus one spare).
pub fn target_count(duration_days: u32) -> usize {
    (duration_days as usize * 4).max(10)
}

pub struct KeywordAgent {
    model: Arc<dyn LanguageModel>,
}

impl KeywordAgent {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// The model's list is accepted as-is, even if its length differs from the requested count.
    pub async fn synthesize(&self, state: &TripState, feedback: Option<&str>) -> Result<Vec<String>, PlanError> {
        let target = target_count(state.duration_days);
        info!("Keywords: Analysing {} ({} terms)", state.destination, target);

        let prompt = build_prompt(state, target, feedback);
        let list: KeywordList = generate_structured(self.model.as_ref(), &prompt)
            .await
            .map_err(PlanError::Keywords)?;

        if list.keywords.is_empty() {
            return Err(PlanError::NoKeywords);
        }
        if list.keywords.len() != target {
            info!(requested = target, returned = list.keywords.len(), "Keywords: count differs from request");
        }
        Ok(list.keywords)
    }
}

fn build_prompt(state: &TripState, target: usize, feedback: Option<&str>) -> String {
    let feedback_line = feedback
        .map(|f| format!("Traveller feedback on the previous plan: {f}\n"))
        .unwrap_or_default();

    format!(
        r#"You are an expert travel consultant.
Destination: {destination}
Trip Duration: {days} days.
Vibe: {vibe}
Avoid: {avoid:?}
{feedback_line}
Task: Generate exactly {target} search terms.
(We need enough places to fill a {days}-day itinerary).

STRATEGY:
1. **Megacities:** Return SPECIFIC NAMES (e.g., "The Louvre").
2. **Smaller Regions/Cities:** Return GENERIC CATEGORIES (e.g., "Beach", "Seafood Restaurant").
   - Vary the categories! Don't repeat the same category several times.
   - Use: "Quiet Beach", "Sunset Viewpoint", "Local Market", "History Museum", "Old Church", "Spicy Restaurant".
"#,
        destination = state.destination,
        days = state.duration_days,
        vibe = state.vibe,
        avoid = state.places_to_avoid,
    )
}
