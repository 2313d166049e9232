// SPDX-FileCopyrightText: 2026 LaViC Toolkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `lavic mcp` command implementation.

use std::sync::Arc;

use lavic_config::LavicConfig;
use lavic_sim::SimFacade;

use crate::error::CliError;

/// Serves the simulation tools on stdio until the client hangs up.
pub async fn run_mcp(config: &LavicConfig) -> Result<(), CliError> {
    let facade = SimFacade::from_config(&config.simulation)?;
    lavic_mcp_server::serve_stdio(Arc::new(facade)).await?;
    Ok(())
}
