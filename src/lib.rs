pub mod adapters;
#[cfg(feature = "cli")]
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{rest::RestClient, snapshot::SnapshotSource, storage::LocalStorage};
pub use config::MenuConfig;
pub use core::{
    classifier::{classify_section, is_measured_pour, CategoryRules},
    engine::MenuEngine,
    pipeline::MenuPipeline,
    view::build_view,
};
pub use domain::model::{CategoryFilter, MenuItem, MenuView, Section, SectionFilter};
pub use utils::error::{MenuError, Result};
