//! Plan workflow: keywords -> places -> itinerary -> feedback gate, with one loop-back edge.

use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::agents::{ItineraryAgent, KeywordAgent, SearchAgent};
use crate::error::PlanError;
use crate::models::{NodeOutput, TripState};

/// Whether a run builds a fresh plan or refines one the caller already holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Start,
    Resume,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Start => "start",
            RunMode::Resume => "resume",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    SynthesizeKeywords,
    SearchPlaces,
    ComposeItinerary,
    AwaitFeedback,
    Done,
}

impl Stage {
    /// Only the feedback gate branches.
    pub fn next(self, feedback_pending: bool) -> Stage {
        match self {
            Stage::SynthesizeKeywords => Stage::SearchPlaces,
            Stage::SearchPlaces => Stage::ComposeItinerary,
            Stage::ComposeItinerary => Stage::AwaitFeedback,
            Stage::AwaitFeedback if feedback_pending => Stage::SynthesizeKeywords,
            Stage::AwaitFeedback | Stage::Done => Stage::Done,
        }
    }
}

pub struct Workflow {
    keywords: KeywordAgent,
    search: SearchAgent,
    itinerary: ItineraryAgent,
}

impl Workflow {
    pub fn new(keywords: KeywordAgent, search: SearchAgent, itinerary: ItineraryAgent) -> Self {
        Self {
            keywords,
            search,
            itinerary,
        }
    }

    /// Drive `state` through the graph until the gate terminates.
    ///
    /// A pass takes the pending `user_feedback` when it starts, so the gate only
    /// loops back for feedback that arrived during the pass. Callers set feedback
    /// before calling, which makes every run exactly one pass. Node failures abort
    /// the run; nothing is retried.
    pub async fn run(&self, state: TripState, mode: RunMode) -> Result<TripState, PlanError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("plan_run", %run_id, mode = mode.as_str(), destination = %state.destination);
        self.drive(state).instrument(span).await
    }

    async fn drive(&self, mut state: TripState) -> Result<TripState, PlanError> {
        let mut stage = Stage::SynthesizeKeywords;
        let mut feedback: Option<String> = None;

        while stage != Stage::Done {
            let mut feedback_pending = false;

            let output = match stage {
                Stage::SynthesizeKeywords => {
                    feedback = state.user_feedback.take().filter(|f| !f.trim().is_empty());
                    Some(NodeOutput::Keywords(
                        self.keywords.synthesize(&state, feedback.as_deref()).await?,
                    ))
                }
                Stage::SearchPlaces => Some(NodeOutput::SearchResults(self.search.search(&state).await)),
                Stage::ComposeItinerary => Some(NodeOutput::ItineraryDraft(
                    self.itinerary.compose(&state, feedback.as_deref()).await?,
                )),
                Stage::AwaitFeedback => {
                    feedback_pending = state
                        .user_feedback
                        .as_deref()
                        .is_some_and(|f| !f.trim().is_empty());
                    info!(feedback_pending, "Feedback gate");
                    (!feedback_pending).then_some(NodeOutput::FeedbackCleared)
                }
                Stage::Done => None,
            };

            if let Some(output) = output {
                state.apply(output);
            }
            stage = stage.next(feedback_pending);
        }

        info!(
            keywords = state.keywords.len(),
            places = state.search_results.len(),
            "Plan run complete"
        );
        Ok(state)
    }
}
