pub mod config;
pub mod error;
pub mod loader;
pub mod record;
pub mod render;
pub mod selection;
pub mod session;
pub mod transform;

pub use error::{KanaVizError, KvResult, LoadFailure};
pub use record::{AccuracyUnit, Record, RecordSet};
