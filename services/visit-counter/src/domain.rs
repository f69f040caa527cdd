// Domain layer modules
pub mod counter;
pub mod counter_action;
pub mod counter_response;

// Re-exports
pub use counter::{COUNT_ATTRIBUTE, CounterRecord, ID_ATTRIBUTE, VISITS_COUNTER_ID};
pub use counter_action::CounterAction;
pub use counter_response::CounterResponse;
