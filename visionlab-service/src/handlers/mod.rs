//! HTTP handlers for the visionlab service.

pub mod analyze;
pub mod generate;
pub mod health;
pub mod upload;

pub use analyze::analyze_image;
pub use generate::generate_reactions;
pub use health::{health_check, metrics_endpoint};
pub use upload::upload_image;
