// SPDX-FileCopyrightText: 2026 LaViC Toolkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! MCP server exposing the simulation facade as tools.
//!
//! The server speaks JSON-RPC over stdio, so nothing but protocol frames
//! may be written to stdout; logging goes to stderr.

pub mod server;
pub mod tools;

use std::sync::Arc;

use lavic_sim::SimFacade;
use rmcp::ServiceExt;
use thiserror::Error;
use tracing::info;

pub use server::LavicMcpServer;

/// Failures while running the stdio server.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("MCP initialization failed: {0}")]
    Init(String),

    #[error("MCP service task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Serves the tools on stdin/stdout until the client disconnects.
pub async fn serve_stdio(facade: Arc<SimFacade>) -> Result<(), ServeError> {
    info!("starting lavic-mcp on stdio");
    let service = LavicMcpServer::new(facade)
        .serve(rmcp::transport::io::stdio())
        .await
        .map_err(|e| ServeError::Init(e.to_string()))?;
    let reason = service.waiting().await?;
    info!(reason = ?reason, "lavic-mcp stopped");
    Ok(())
}
