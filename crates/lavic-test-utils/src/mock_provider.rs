// SPDX-FileCopyrightText: 2026 LaViC Toolkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted generation provider for deterministic poller and pipeline tests.
//!
//! `ScriptedJobProvider` implements `JobProvider`: each poll pops the next
//! status snapshot from a queue, and once the queue is down to its last
//! entry that snapshot repeats forever.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use lavic_core::{JobFile, JobHandle, JobProvider, LavicError, SubJobStatus, SubmitRequest};

/// A mock provider replaying pre-configured status snapshots.
pub struct ScriptedJobProvider {
    script: Mutex<VecDeque<Result<Vec<SubJobStatus>, u16>>>,
    files: Vec<JobFile>,
    mesh: Vec<u8>,
    reject_submit: bool,
    submitted: Mutex<Vec<SubmitRequest>>,
    polls: AtomicUsize,
    downloads: AtomicUsize,
}

impl ScriptedJobProvider {
    /// Replays `snapshots` in order, repeating the last one.
    pub fn new(snapshots: Vec<Vec<SubJobStatus>>) -> Self {
        Self::from_results(snapshots.into_iter().map(Ok).collect())
    }

    /// Like [`new`](Self::new) but entries may be HTTP error statuses.
    pub fn from_results(script: Vec<Result<Vec<SubJobStatus>, u16>>) -> Self {
        Self {
            script: Mutex::new(VecDeque::from(script)),
            files: vec![JobFile {
                name: "model.glb".into(),
                url: "mock://files/model.glb".into(),
            }],
            mesh: minimal_glb(),
            reject_submit: false,
            submitted: Mutex::new(Vec::new()),
            polls: AtomicUsize::new(0),
            downloads: AtomicUsize::new(0),
        }
    }

    /// A single sub-job that completes on the first poll.
    pub fn done() -> Self {
        Self::new(vec![vec![SubJobStatus::Done]])
    }

    /// A single sub-job stuck in `status` forever.
    pub fn stuck(status: &str) -> Self {
        Self::new(vec![vec![SubJobStatus::from(status)]])
    }

    /// Rejects every submission with HTTP 402.
    pub fn rejecting() -> Self {
        Self {
            reject_submit: true,
            ..Self::done()
        }
    }

    /// Replaces the file listing returned once the job is done.
    pub fn with_files(mut self, files: Vec<JobFile>) -> Self {
        self.files = files;
        self
    }

    /// Replaces the bytes written by `download`.
    pub fn with_mesh(mut self, mesh: Vec<u8>) -> Self {
        self.mesh = mesh;
        self
    }

    pub fn polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }

    pub fn downloads(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }

    /// Every request submitted so far.
    pub async fn submitted(&self) -> Vec<SubmitRequest> {
        self.submitted.lock().await.clone()
    }
}

#[async_trait]
impl JobProvider for ScriptedJobProvider {
    async fn submit(&self, request: &SubmitRequest) -> Result<JobHandle, LavicError> {
        let mut submitted = self.submitted.lock().await;
        submitted.push(request.clone());
        if self.reject_submit {
            return Err(LavicError::Remote {
                message: "insufficient credits".into(),
                status: 402,
            });
        }
        Ok(JobHandle {
            uuid: format!("mock-task-{}", submitted.len()),
            subscription_key: format!("mock-sub-{}", submitted.len()),
        })
    }

    async fn poll(&self, _handle: &JobHandle) -> Result<Vec<SubJobStatus>, LavicError> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        let mut script = self.script.lock().await;
        let next = if script.len() > 1 {
            script.pop_front()
        } else {
            script.front().cloned()
        };
        match next {
            Some(Ok(statuses)) => Ok(statuses),
            Some(Err(status)) => Err(LavicError::Remote {
                message: "status endpoint error".into(),
                status,
            }),
            None => Ok(Vec::new()),
        }
    }

    async fn files(&self, _handle: &JobHandle) -> Result<Vec<JobFile>, LavicError> {
        Ok(self.files.clone())
    }

    async fn download(&self, _file: &JobFile, dest: &Path) -> Result<(), LavicError> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LavicError::io(parent, e))?;
        }
        tokio::fs::write(dest, &self.mesh)
            .await
            .map_err(|e| LavicError::io(dest, e))
    }
}

/// A valid single-node GLB with no BIN chunk.
pub fn minimal_glb() -> Vec<u8> {
    let mut json = serde_json::json!({
        "asset": {"version": "2.0"},
        "scene": 0,
        "scenes": [{"nodes": [0]}],
        "nodes": [{"name": "fuselage"}]
    })
    .to_string()
    .into_bytes();
    while json.len() % 4 != 0 {
        json.push(b' ');
    }

    let total = (12 + 8 + json.len()) as u32;
    let mut glb = Vec::with_capacity(total as usize);
    glb.extend_from_slice(&0x46546C67u32.to_le_bytes());
    glb.extend_from_slice(&2u32.to_le_bytes());
    glb.extend_from_slice(&total.to_le_bytes());
    glb.extend_from_slice(&(json.len() as u32).to_le_bytes());
    glb.extend_from_slice(&0x4E4F534Au32.to_le_bytes());
    glb.extend_from_slice(&json);
    glb
}
