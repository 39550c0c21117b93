pub mod analyzer;
pub mod config;
pub mod errors;
pub mod export;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod sequence;
pub mod storage;

pub use errors::{PipelineError, Result};
