mod client;
mod openai;
pub mod prediction;
mod replicate;

pub use client::{ImageProvider, create_provider};
pub use openai::OpenAiProvider;
pub use prediction::{PredictionStatus, PredictionTracker};
pub use replicate::{Prediction, ReplicateProvider};

#[cfg(test)]
pub use client::MockImageProvider;
