pub mod etl;
pub mod filter_pipeline;
pub mod names;
pub mod pipeline;
pub mod report;
pub mod survey;

pub use crate::domain::model::{LegRecord, Tally};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
