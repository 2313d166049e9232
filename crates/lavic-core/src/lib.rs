// SPDX-FileCopyrightText: 2026 LaViC Toolkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the LaViC toolkit.
//!
//! This crate provides the capability traits, error type, and domain types
//! shared by the packaging pipeline and its test fakes.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::LavicError;
pub use types::{
    AssetBundle, DynamicsParameters, JobFile, JobHandle, JobOutcome, SubJobStatus, SubmitRequest,
};

pub use traits::{ImageSource, JobProvider, KeyedStore, SymbolRenderer, get_or_compute};
