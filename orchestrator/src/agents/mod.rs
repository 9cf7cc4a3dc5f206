pub mod itinerary;
pub mod keywords;
pub mod search;

pub use itinerary::ItineraryAgent;
pub use keywords::KeywordAgent;
pub use search::SearchAgent;
