// src/lib.rs
pub mod config;
pub mod metrics;
pub mod process;
pub mod report;
pub mod schema;
pub mod sheet;

pub use config::ReduceConfig;
pub use process::{reduce, ReduceOutput, SummaryRow};
