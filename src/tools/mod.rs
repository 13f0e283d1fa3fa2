pub mod executor;
pub mod registry;
pub mod wikipedia;

pub use executor::ActionExecutor;
pub use registry::{Action, ActionRegistry};
pub use wikipedia::{WikipediaSearch, DEFAULT_WIKIPEDIA_ENDPOINT};
