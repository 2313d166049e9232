// SPDX-FileCopyrightText: 2026 LaViC Toolkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generation provider trait for text/image-to-3D services.

use std::path::Path;

use async_trait::async_trait;

use crate::error::LavicError;
use crate::types::{JobFile, JobHandle, SubJobStatus, SubmitRequest};

/// A remote service that turns a prompt (and optional image) into a mesh.
///
/// The lifecycle is submit, then poll until every sub-job settles, then list
/// and download the produced files.
#[async_trait]
pub trait JobProvider: Send + Sync {
    /// Submits a generation request and returns its handle.
    async fn submit(&self, request: &SubmitRequest) -> Result<JobHandle, LavicError>;

    /// Fetches the current status of every sub-job.
    async fn poll(&self, handle: &JobHandle) -> Result<Vec<SubJobStatus>, LavicError>;

    /// Lists the files produced by a finished job.
    async fn files(&self, handle: &JobHandle) -> Result<Vec<JobFile>, LavicError>;

    /// Streams one produced file to `dest`.
    async fn download(&self, file: &JobFile, dest: &Path) -> Result<(), LavicError>;
}
