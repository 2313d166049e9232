// SPDX-FileCopyrightText: 2026 LaViC Toolkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Agent manifest rendering from a template document.
//!
//! The template is the exported `agent.json` of an existing aircraft agent.
//! Rendering rewrites the identity fields, the asset references, and the
//! embedded dynamics settings, leaving everything else as exported.

mod dynamics_doc;

use std::path::Path;

use lavic_core::{DynamicsParameters, LavicError};
use serde_json::{Value, json};

pub use dynamics_doc::{DynamicsDocument, SETTINGS_PATH};

/// Identity and dynamics of one package.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageInfo {
    /// Canonical key; names the package directory and every asset file.
    pub key: String,
    pub display_name: String,
    pub description: String,
    pub dynamics: DynamicsParameters,
}

impl PackageInfo {
    /// Builds the info for a catalog row. The description is `"<name> (<category>)"`.
    pub fn new(
        key: impl Into<String>,
        display_name: impl Into<String>,
        category: &str,
        dynamics: DynamicsParameters,
    ) -> Self {
        let display_name = display_name.into();
        Self {
            key: key.into(),
            description: format!("{display_name} ({category})"),
            display_name,
            dynamics,
        }
    }

    /// `<key>/<key>.png`
    pub fn thumbnail_ref(&self) -> String {
        format!("{0}/{0}.png", self.key)
    }

    /// `<key>/<key>_mil.png`
    pub fn symbol_ref(&self) -> String {
        format!("{0}/{0}_mil.png", self.key)
    }

    /// `<key>/<key>_AI_Rodin.glb`
    pub fn mesh_ref(&self) -> String {
        format!("{0}/{0}_AI_Rodin.glb", self.key)
    }
}

/// A validated agent template.
#[derive(Debug, Clone)]
pub struct ManifestTemplate {
    agent: Value,
}

impl ManifestTemplate {
    /// Reads and validates the template file.
    pub fn load(path: &Path) -> Result<Self, LavicError> {
        let text = std::fs::read_to_string(path).map_err(|e| LavicError::io(path, e))?;
        let value: Value = serde_json::from_str(&text).map_err(|e| LavicError::TemplateShape {
            path: path.display().to_string(),
            detail: format!("not valid JSON: {e}"),
        })?;
        Self::from_value(value)
    }

    /// Accepts the agent object itself or a list whose first element is it.
    pub fn from_value(value: Value) -> Result<Self, LavicError> {
        let agent = match value {
            Value::Array(items) => items.into_iter().next().ok_or_else(|| {
                LavicError::TemplateShape {
                    path: "[0]".into(),
                    detail: "template list is empty".into(),
                }
            })?,
            other => other,
        };
        if !agent.is_object() {
            return Err(LavicError::TemplateShape {
                path: "$".into(),
                detail: "agent template must be a JSON object".into(),
            });
        }

        let settings = agent
            .pointer("/missionableDynamics/0/dynSettings/pluginDefaultSettings")
            .ok_or_else(|| LavicError::TemplateShape {
                path: SETTINGS_PATH.into(),
                detail: "missing".into(),
            })?
            .as_str()
            .ok_or_else(|| LavicError::TemplateShape {
                path: SETTINGS_PATH.into(),
                detail: "expected a JSON-encoded string".into(),
            })?;
        DynamicsDocument::decode(settings)?;

        Ok(Self { agent })
    }

    /// Produces the agent object for `info`.
    pub fn render(&self, info: &PackageInfo) -> Result<Value, LavicError> {
        let mut agent = self.agent.clone();
        let thumbnail = info.thumbnail_ref();
        let symbol = info.symbol_ref();
        let mesh = info.mesh_ref();

        agent["agentName"] = json!(info.display_name);
        agent["agentNameI18n"] = json!(info.display_name);
        agent["agentDesc"] = json!(info.description);
        agent["modelUrlSlim"] = json!(mesh);
        agent["modelUrlFat"] = json!(mesh);
        agent["thumbnail"] = json!(thumbnail);
        agent["modelUrlSymbols"] = json!([{
            "symbolSeries": 1,
            "symbolName": symbol,
            "thumbnail": thumbnail,
        }]);

        if let Some(model) = agent.get_mut("model").and_then(Value::as_object_mut) {
            model.insert("modelName".into(), json!(info.display_name));
            model.insert("introduction".into(), json!(info.description));
            if let Some(thumb) = model.get_mut("thumbnail").and_then(Value::as_object_mut) {
                thumb.insert("url".into(), json!(thumbnail));
                thumb.insert("ossSig".into(), json!(format!("{}.png", info.key)));
            }
            if let Some(icon) = model.get_mut("mapIconUrl").and_then(Value::as_object_mut) {
                icon.insert("url".into(), json!(symbol));
                icon.insert("ossSig".into(), json!(format!("{}_mil.png", info.key)));
            }
            if let Some(first) = model
                .get_mut("dimModelUrls")
                .and_then(Value::as_array_mut)
                .and_then(|urls| urls.first_mut())
                .and_then(Value::as_object_mut)
            {
                first.insert("url".into(), json!(mesh));
                first.insert("ossSig".into(), json!(format!("{}_AI_Rodin.glb", info.key)));
            }
        }

        let slot = agent
            .pointer_mut("/missionableDynamics/0/dynSettings/pluginDefaultSettings")
            .ok_or_else(|| LavicError::TemplateShape {
                path: SETTINGS_PATH.into(),
                detail: "missing".into(),
            })?;
        let mut doc = DynamicsDocument::decode(slot.as_str().unwrap_or_default())?;
        doc.apply(&info.dynamics);
        *slot = Value::String(doc.encode());

        Ok(agent)
    }
}
