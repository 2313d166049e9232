// SPDX-FileCopyrightText: 2026 LaViC Toolkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use lavic_core::LavicError;
use lavic_mcp_server::ServeError;
use lavic_sim::SimError;
use thiserror::Error;

/// Top-level failure of a subcommand.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Packager(#[from] LavicError),

    #[error(transparent)]
    Sim(#[from] SimError),

    #[error(transparent)]
    Mcp(#[from] ServeError),

    #[error("{failed} of {attempted} packages failed")]
    BatchFailures { failed: usize, attempted: usize },
}
