// src/report/mod.rs
pub mod dashboard;
pub mod workbook;
