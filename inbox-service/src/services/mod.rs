pub mod inbox;
pub mod metrics;
pub mod providers;

pub use inbox::{InboxAgent, PipelineError};
