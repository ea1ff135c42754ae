pub mod metrics;
pub mod prompt;
pub mod providers;

pub use metrics::{get_metrics, init_metrics, record_upstream};
pub use prompt::{reactions_prompt, REACTION_PARAMS};
