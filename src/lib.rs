pub mod adaptive;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod outcome;
pub mod recorder;
pub mod resolver;
pub mod selection;
pub mod targets;
// cmd and reports belong to the binary crate (main.rs).

pub use engine::{AcquisitionEngine, EngineBuilder};
pub use error::{TapZoneError, TzResult};
pub use outcome::{AttemptOutcome, EngineEvent};
pub use selection::Protocol;
