//! Session layer: phases, dashboard state, debounced suggestions, and the
//! orchestrator that drives them over an event channel.

pub mod orchestrator;
pub mod state;
pub mod suggest;

pub use orchestrator::TravelSession;
pub use state::{ContentSlot, DashboardState, SessionError, SessionEvent, SessionPhase, Slot};
pub use suggest::EditDebouncer;
