// SPDX-FileCopyrightText: 2026 LaViC Toolkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared domain types for the packaging pipeline.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Flight dynamics parsed from a free-text description.
///
/// Every field is optional: a value is present only when the source text
/// contained it. `omega_max` is always in rad/s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DynamicsParameters {
    #[serde(rename = "V_max", skip_serializing_if = "Option::is_none")]
    pub v_max: Option<f64>,
    #[serde(rename = "V_min", skip_serializing_if = "Option::is_none")]
    pub v_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub a_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landing_distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub omega_max: Option<f64>,
}

impl DynamicsParameters {
    /// The five field names recognized in a dynamics settings document.
    pub const FIELD_NAMES: [&'static str; 5] =
        ["V_max", "V_min", "a_max", "landing_distance", "omega_max"];

    /// Returns the present fields as `(name, value)` pairs in a fixed order.
    pub fn entries(&self) -> Vec<(&'static str, f64)> {
        [
            self.v_max,
            self.v_min,
            self.a_max,
            self.landing_distance,
            self.omega_max,
        ]
        .into_iter()
        .zip(Self::FIELD_NAMES)
        .filter_map(|(value, name)| value.map(|v| (name, v)))
        .collect()
    }

    /// True when no field was parsed.
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

/// Local files gathered for one package. Each slot is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetBundle {
    pub thumbnail: Option<PathBuf>,
    pub symbol: Option<PathBuf>,
    pub mesh: Option<PathBuf>,
}

/// Identity of a submitted generation job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobHandle {
    /// Task identifier, used to resolve downloadable files.
    pub uuid: String,
    /// Token used to poll sub-job statuses.
    pub subscription_key: String,
}

/// Status reported by one sub-job of a generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubJobStatus {
    Done,
    Failed,
    /// Any non-terminal state (`Waiting`, `Generating`, ...).
    Other(String),
}

impl From<&str> for SubJobStatus {
    fn from(value: &str) -> Self {
        match value {
            "Done" => Self::Done,
            "Failed" => Self::Failed,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for SubJobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Done => f.write_str("Done"),
            Self::Failed => f.write_str("Failed"),
            Self::Other(s) => f.write_str(s),
        }
    }
}

/// Terminal state of a polled generation job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// Every sub-job reported Done.
    Done,
    /// At least one sub-job reported Failed; carries the last observed statuses.
    Failed(Vec<SubJobStatus>),
    /// The attempt budget ran out first.
    TimedOut { attempts: u32 },
}

/// One downloadable file produced by a finished job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobFile {
    pub name: String,
    pub url: String,
}

/// A generation request, seeded by an image or by text alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitRequest {
    pub prompt: String,
    /// PNG bytes. `None` selects text-to-3D mode.
    pub image: Option<Vec<u8>>,
    pub tier: String,
    pub mesh_mode: String,
}

impl SubmitRequest {
    /// True when the request carries a seed image.
    pub fn is_image_seeded(&self) -> bool {
        self.image.is_some()
    }
}
