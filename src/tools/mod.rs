//! Hearth Tools module
//!
//! MCP tool implementations for Hearth.

pub mod measure;
pub mod recipes;
pub mod status;
