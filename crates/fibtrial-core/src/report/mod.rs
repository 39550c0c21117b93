pub mod chart;
pub mod console;
pub mod markdown;

pub use markdown::{render, write_report};
