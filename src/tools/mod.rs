//! Kcal Tools module
//!
//! Tool implementations behind the MCP server. Each returns a serializable
//! response or an error message for the caller.

pub mod activities;
pub mod days;
pub mod meals;
pub mod products;
pub mod profile;
pub mod status;
pub mod water;
