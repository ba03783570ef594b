// src/lib.rs

#[macro_use]
pub mod macros;

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod specs;

pub mod categories;
pub mod csv;
pub mod dataset;
pub mod errors;
pub mod file;
pub mod log;
pub mod progress;
pub mod runner;
pub mod scrape;
pub mod sequence;
pub mod split;
pub mod store;
