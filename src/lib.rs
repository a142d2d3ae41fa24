//! Kcal Tracker Library
//!
//! Daily energy balance, activity and water tracking: calculation cores,
//! the local record store and the MCP tool layer.

pub mod balance;
pub mod build_info;
pub mod calendar;
pub mod config;
pub mod db;
pub mod energy;
pub mod lookup;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod scan;
pub mod tools;
