// SPDX-FileCopyrightText: 2026 LaViC Toolkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the LaViC toolkit.

use std::path::PathBuf;

use thiserror::Error;

/// The primary error type used across the packaging pipeline and its capabilities.
#[derive(Debug, Error)]
pub enum LavicError {
    /// Configuration errors (invalid values, unbuildable clients).
    #[error("configuration error: {0}")]
    Config(String),

    /// Local filesystem errors.
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A remote service answered with a non-success status.
    #[error("remote rejected request ({status}): {message}")]
    Remote { message: String, status: u16 },

    /// The request never produced a response (connect, timeout, body read).
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A response body did not have the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The manifest template is missing a nested key the assembler relies on.
    #[error("template shape mismatch at `{path}`: {detail}")]
    TemplateShape { path: String, detail: String },

    /// A mesh container could not be parsed or re-encoded.
    #[error("mesh error: {0}")]
    Mesh(String),

    /// Writing or reading a zip archive failed.
    #[error("archive error: {0}")]
    Archive(String),

    /// The input spreadsheet could not be read.
    #[error("spreadsheet error: {0}")]
    Sheet(String),

    /// Symbol rendering failed.
    #[error("render error: {0}")]
    Render(String),
}

impl LavicError {
    /// Wraps an `std::io::Error` with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Wraps a transport-level failure.
    pub fn transport(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
