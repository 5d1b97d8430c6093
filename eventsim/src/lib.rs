pub mod config;
pub mod drain;
pub mod errors;
pub mod event;
pub mod observability;
pub mod processor;
pub mod registry;

// Re-export key types for easier access
pub use config::Settings;
pub use drain::{DrainController, DrainState};
pub use errors::{EventError, EventResult};
pub use event::{Event, EventRequest, EventType, SharedEvent};
pub use processor::EventProcessor;
pub use registry::EventRegistry;
