//! yieldscope: Yield Significance Library
//!
//! A library for cleaning unit-level measurement tables and ranking process
//! parameters by how strongly they separate failing units from passing ones.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
