//! Hearth Library
//!
//! Household recipes with serving scaling and metric/imperial unit conversion.

pub mod build_info;
pub mod config;
pub mod db;
pub mod mcp;
pub mod measure;
pub mod models;
pub mod tools;
