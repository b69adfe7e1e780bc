//! Pipeline module - cleaning and significance ranking steps

pub mod clean;
pub mod error;
pub mod label;
pub mod loader;
pub mod missing;
pub mod overview;
pub mod significance;
pub mod stats;
pub mod variance;

pub use clean::*;
pub use error::*;
pub use label::*;
pub use loader::*;
pub use missing::*;
pub use overview::*;
pub use significance::*;
pub use variance::*;
