//! Model Context Protocol (MCP) server implementation.
//!
//! Exposes the wrapper and the key extractor to AI assistants as tools over stdio.
//!
//! ## Module Structure
//!
//! - `server`: Tool definitions and the stdio entry point
//! - `types`: Tool parameters and JSON result shapes

mod server;
pub mod types;

pub use server::{TwrapMcpServer, run_server};
