//! Model Context Protocol (MCP) server handling and JSON-RPC implementations
//!
//! Provides protocol-level specifics surrounding envelope validation, JSON-RPC formatting, and routing.

pub mod envelope;
pub mod rpc;
pub mod server;
