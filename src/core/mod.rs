pub mod classifier;
pub mod engine;
pub mod pipeline;
pub mod pricing;
pub mod render;
pub mod view;

pub use crate::domain::ports::{MenuSource, Pipeline, Storage};
pub use crate::utils::error::Result;
