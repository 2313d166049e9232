// SPDX-FileCopyrightText: 2026 LaViC Toolkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Codec for the dynamics settings document embedded as a JSON string.

use lavic_core::{DynamicsParameters, LavicError};
use serde_json::{Map, Value};

/// Manifest path of the embedded settings string.
pub const SETTINGS_PATH: &str = "missionableDynamics[0].dynSettings.pluginDefaultSettings";

/// The decoded contents of `pluginDefaultSettings`.
///
/// Only the five recognized parameter names under `dynSettings` are ever
/// written; every other key round-trips unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicsDocument {
    root: Map<String, Value>,
}

impl DynamicsDocument {
    /// Parses the settings string. It must be an object holding a `dynSettings` object.
    pub fn decode(text: &str) -> Result<Self, LavicError> {
        let value: Value = serde_json::from_str(text).map_err(|e| LavicError::TemplateShape {
            path: SETTINGS_PATH.into(),
            detail: format!("not valid JSON: {e}"),
        })?;
        let Value::Object(root) = value else {
            return Err(LavicError::TemplateShape {
                path: SETTINGS_PATH.into(),
                detail: "expected a JSON object".into(),
            });
        };
        if !root.get("dynSettings").is_some_and(Value::is_object) {
            return Err(LavicError::TemplateShape {
                path: format!("{SETTINGS_PATH} -> dynSettings"),
                detail: "expected an object".into(),
            });
        }
        Ok(Self { root })
    }

    /// Overwrites the parameters present in `params`.
    pub fn apply(&mut self, params: &DynamicsParameters) {
        if let Some(Value::Object(settings)) = self.root.get_mut("dynSettings") {
            for (name, value) in params.entries() {
                settings.insert(name.to_string(), Value::from(value));
            }
        }
    }

    /// Serializes back to a compact string; non-ASCII text is kept as-is.
    pub fn encode(&self) -> String {
        Value::Object(self.root.clone()).to_string()
    }
}
