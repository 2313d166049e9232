// SPDX-FileCopyrightText: 2026 LaViC Toolkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for LaViC integration tests.
//!
//! Deterministic stand-ins for the capability traits in `lavic-core`, so
//! the packaging pipeline can be exercised without network access.
//!
//! # Components
//!
//! - [`ScriptedJobProvider`] - generation provider replaying a status script
//! - [`CountingImageSource`] / [`CountingSymbolRenderer`] - call-counting sources
//! - [`MemoryStore`] - in-memory keyed store

pub mod fakes;
pub mod mock_provider;

pub use fakes::{CountingImageSource, CountingSymbolRenderer, MemoryStore};
pub use mock_provider::{ScriptedJobProvider, minimal_glb};
