pub mod config;
pub mod core;
pub mod domain;
pub mod io;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::cli::LocalStorage;
pub use config::toml_config::TomlConfig;

pub use crate::core::{
    analysis::analyze, analysis::AnalysisParams, etl::EtlEngine, pipeline::HhiPipeline,
};
pub use domain::model::{
    AnalysisReport, ComparisonRow, CompetitivenessSummary, DomainHhi, ParticipationRow, Record,
    RecordSet, Trend,
};
pub use utils::error::{EtlError, Result};
