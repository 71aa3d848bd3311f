pub mod analysis;
pub mod cache;
pub mod quiz;
pub mod risk;

pub use analysis::{AnalysisError, AnalysisRequest, AnalysisService};
pub use cache::{AnalysisCache, Clock, SystemClock};
