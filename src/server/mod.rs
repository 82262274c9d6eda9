//! MCP server implementation for the notification dispatcher.
//!
//! This module provides the MCP protocol server that exposes the dispatcher
//! to AI assistants through the Model Context Protocol.

pub mod handlers;

pub use handlers::HashNotifyServer;

use anyhow::Result;
use rmcp::transport::io::stdio;
use rmcp::ServiceExt;

/// Run the notification MCP server with stdio transport.
///
/// Communicates via stdin/stdout and returns once the client disconnects.
pub async fn run_server(server: HashNotifyServer) -> Result<()> {
    let service = server.serve(stdio()).await?;

    service.waiting().await?;

    Ok(())
}
