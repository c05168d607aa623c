//! Terminal front end for the bandarmology analysis service.
//!
//! Reads `bandar.toml`, talks to the service through
//! [`bandarscope_client::AnalysisApi`], and prints tables and panels built
//! from the core pipeline.

pub mod commands;
pub mod config;
pub mod error;
pub mod render;
