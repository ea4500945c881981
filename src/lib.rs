//! Postprocessing for the room occupancy model.
//!
//! Rounds the raw regression output found in an inference payload to integer
//! class labels and returns it alongside the original payload.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postprocess;

pub use config::AppConfig;
pub use error::PostprocessError;
pub use models::{ResultEnvelope, RoundingMode};
pub use postprocess::{assemble_response, extract_prediction_vector, postprocess, round_predictions};
