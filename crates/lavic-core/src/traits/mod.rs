// SPDX-FileCopyrightText: 2026 LaViC Toolkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability traits for the external collaborators of the packaging pipeline.
//!
//! Network-backed services and the on-disk cache sit behind these traits so
//! tests can substitute deterministic fakes. Async traits use `#[async_trait]`
//! for dynamic dispatch compatibility.

pub mod provider;
pub mod source;
pub mod store;

pub use provider::JobProvider;
pub use source::{ImageSource, SymbolRenderer};
pub use store::{KeyedStore, get_or_compute};
