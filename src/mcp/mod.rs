//! MCP (Model Context Protocol) server exposing the git tools over stdio.

pub mod handlers;
pub mod protocol;
pub mod server;
