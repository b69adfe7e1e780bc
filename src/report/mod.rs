//! Report module - writing and summarizing analysis results

pub mod dashboard;
pub mod significance_export;
pub mod summary;

pub use dashboard::*;
pub use significance_export::*;
pub use summary::*;
