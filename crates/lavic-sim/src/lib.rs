// SPDX-FileCopyrightText: 2026 LaViC Toolkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client and control facade for the LaViC simulation platform.
//!
//! [`SimClient`] handles authentication headers and body decoding;
//! [`SimFacade`] implements listing with pagination, scenario lifecycle
//! control with running-record resolution, and record data download.

pub mod client;
pub mod error;
pub mod facade;

pub use client::SimClient;
pub use error::{ApiError, SimError};
pub use facade::{ControlAction, ListModels, ListScenarios, SimFacade};
