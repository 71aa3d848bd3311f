pub mod analysis;
pub mod config;
pub mod extraction;
pub mod listing;

pub use analysis::*;
pub use config::{Config, SourceConfig};
pub use listing::*;
