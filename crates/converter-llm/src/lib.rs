pub mod openai;
pub mod service;

pub use openai::OpenAIService;
pub use service::{Result, ServiceError, TransformationService};
