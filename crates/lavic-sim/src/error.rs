// SPDX-FileCopyrightText: 2026 LaViC Toolkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Failure values returned by the simulation facade.

use std::path::PathBuf;

use serde_json::{Value, json};
use thiserror::Error;

/// A failed platform call, normalized from transport errors and non-2xx responses.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    /// HTTP status, absent when no response arrived.
    pub status_code: Option<u16>,
    /// Response body: parsed JSON when it parses, else the raw text.
    pub details: Option<Value>,
}

impl ApiError {
    pub fn transport(err: &reqwest::Error) -> Self {
        Self {
            message: err.to_string(),
            status_code: err.status().map(|s| s.as_u16()),
            details: None,
        }
    }

    /// Builds the error for a non-success response body.
    pub fn from_response(status: reqwest::StatusCode, url: &str, body: &str) -> Self {
        let details = if body.trim().is_empty() {
            None
        } else {
            Some(serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string())))
        };
        Self {
            message: format!("{status} for url: {url}"),
            status_code: Some(status.as_u16()),
            details,
        }
    }
}

/// Every way a facade operation can fail.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("api error: {0}")]
    Api(#[from] ApiError),

    /// Pause/resume/stop could not resolve a running record.
    #[error(
        "No running record found for simulation {simulation_id}. Please provide record_id explicitly if needed."
    )]
    NoRunningRecord { simulation_id: String },

    /// Record data was not a zip archive.
    #[error("Response was not a valid ZIP file.")]
    InvalidArchive,

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl SimError {
    /// JSON rendering handed back to tool callers.
    pub fn to_payload(&self) -> Value {
        match self {
            Self::Api(e) => json!({
                "error": e.message,
                "status_code": e.status_code,
                "details": e.details,
            }),
            Self::NoRunningRecord { .. } | Self::InvalidArchive => json!({
                "success": false,
                "message": self.to_string(),
            }),
            Self::Io { .. } => json!({
                "success": false,
                "error": self.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_details_prefer_json() {
        let e = ApiError::from_response(
            reqwest::StatusCode::FORBIDDEN,
            "http://h/x",
            r#"{"code":403,"msg":"denied"}"#,
        );
        assert_eq!(e.status_code, Some(403));
        assert_eq!(e.details, Some(json!({"code": 403, "msg": "denied"})));

        let e = ApiError::from_response(reqwest::StatusCode::BAD_GATEWAY, "http://h/x", "oops");
        assert_eq!(e.details, Some(json!("oops")));
    }

    #[test]
    fn payload_shapes() {
        let api = SimError::Api(ApiError {
            message: "boom".into(),
            status_code: None,
            details: None,
        });
        assert_eq!(
            api.to_payload(),
            json!({"error": "boom", "status_code": null, "details": null})
        );

        let missing = SimError::NoRunningRecord {
            simulation_id: "sim-7".into(),
        };
        assert_eq!(missing.to_payload()["success"], false);
        assert_eq!(
            missing.to_payload()["message"],
            "No running record found for simulation sim-7. Please provide record_id explicitly if needed."
        );
        assert_eq!(
            SimError::InvalidArchive.to_payload()["message"],
            "Response was not a valid ZIP file."
        );
    }
}
