pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{Cli, Command, DetailConfig, SearchConfig};
pub use core::{detail::DetailPipeline, engine::Engine, search::SearchPipeline};
pub use domain::model::{ProductRow, RunSummary, SearchRow};
pub use utils::error::{EtlError, Result};
