// SPDX-FileCopyrightText: 2026 LaViC Toolkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cached 3D mesh generation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use lavic_config::model::RodinConfig;
use lavic_core::{JobOutcome, JobProvider, KeyedStore, LavicError, SubmitRequest, get_or_compute};
use tracing::{info, warn};

use crate::mesh::normalize_file;
use crate::poll::{PollPolicy, poll_until_terminal};

/// Suffix appended to the search term to form the generation prompt.
const PROMPT_SUFFIX: &str = ", high quality, realistic 3d asset";

/// Submits, polls, downloads, and normalizes one mesh per key.
pub struct MeshGenerator {
    provider: Arc<dyn JobProvider>,
    store: Arc<dyn KeyedStore>,
    policy: PollPolicy,
    tier: String,
    mesh_mode: String,
}

impl MeshGenerator {
    pub fn new(provider: Arc<dyn JobProvider>, store: Arc<dyn KeyedStore>) -> Self {
        let defaults = RodinConfig::default();
        Self {
            provider,
            store,
            policy: PollPolicy::default(),
            tier: defaults.tier,
            mesh_mode: defaults.mesh_mode,
        }
    }

    /// Takes tier, mesh mode, and poll policy from config.
    pub fn with_config(mut self, config: &RodinConfig) -> Self {
        self.policy = PollPolicy::from(config);
        self.tier = config.tier.clone();
        self.mesh_mode = config.mesh_mode.clone();
        self
    }

    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the cached or freshly generated mesh for `key`.
    ///
    /// `image` seeds the generation when given and readable; otherwise the
    /// job runs in text mode. Every failure is logged and yields `None`.
    pub async fn generate(&self, key: &str, search_term: &str, image: Option<&Path>) -> Option<PathBuf> {
        let result = get_or_compute(self.store.as_ref(), key, |target| async move {
            let request = self.request(key, search_term, image).await;
            self.run_job(key, &request, &target).await
        })
        .await;

        result.unwrap_or_else(|e| {
            warn!(key, error = %e, "mesh generation failed");
            None
        })
    }

    async fn request(&self, key: &str, search_term: &str, image: Option<&Path>) -> SubmitRequest {
        let image = match image {
            Some(path) => match tokio::fs::read(path).await {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    warn!(key, path = %path.display(), error = %e, "seed image unreadable, using text mode");
                    None
                }
            },
            None => None,
        };
        SubmitRequest {
            prompt: format!("{search_term}{PROMPT_SUFFIX}"),
            image,
            tier: self.tier.clone(),
            mesh_mode: self.mesh_mode.clone(),
        }
    }

    async fn run_job(
        &self,
        key: &str,
        request: &SubmitRequest,
        target: &Path,
    ) -> Result<Option<PathBuf>, LavicError> {
        let mode = if request.is_image_seeded() { "image" } else { "text" };
        info!(key, mode, "submitting mesh generation job");
        let handle = self.provider.submit(request).await?;
        info!(key, uuid = %handle.uuid, "job submitted, polling");

        match poll_until_terminal(self.provider.as_ref(), &handle, self.policy).await {
            JobOutcome::Done => {}
            JobOutcome::Failed(statuses) => {
                warn!(key, statuses = ?statuses, "mesh generation job failed");
                return Ok(None);
            }
            JobOutcome::TimedOut { attempts } => {
                warn!(key, attempts, "mesh generation job timed out");
                return Ok(None);
            }
        }

        let files = self.provider.files(&handle).await?;
        let Some(glb) = files.iter().find(|f| f.name.ends_with(".glb")) else {
            warn!(key, files = files.len(), "job produced no .glb file");
            return Ok(None);
        };

        self.provider.download(glb, target).await?;
        info!(key, path = %target.display(), "mesh downloaded");

        if let Err(e) = normalize_file(target).await {
            warn!(key, error = %e, "orientation fix failed, keeping mesh as downloaded");
        }
        Ok(Some(target.to_path_buf()))
    }
}
