mod dispatcher;
mod types;

pub use dispatcher::Dispatcher;
pub use types::{GenerationRequest, GenerationResult};
