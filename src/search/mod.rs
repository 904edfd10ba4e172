pub mod debounce;
pub mod orchestrator;
pub mod state;
pub mod trending;

pub use debounce::Debouncer;
pub use orchestrator::{SearchOrchestrator, FETCH_ERROR, FETCH_FAILED};
pub use state::{RequestState, StateHandle, ViewState};
pub use trending::TrendingLoader;
