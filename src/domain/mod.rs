//! Tool integrations
//!
//! Provides the CPU monitoring tool exposed over the MCP protocol

pub mod tools;
