pub mod analysis;
pub mod comparison;
pub mod concentration;
pub mod domain_key;
pub mod etl;
pub mod participation;
pub mod period;
pub mod pipeline;

pub use crate::domain::model::{AnalysisReport, Record, RecordSet};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
