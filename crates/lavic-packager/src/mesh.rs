// SPDX-FileCopyrightText: 2026 LaViC Toolkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! GLB orientation normalization.
//!
//! Generated meshes come out Z-up and facing backwards. Normalization
//! rotates -90° about X (Z-up to Y-up) and then 180° about Y by inserting a
//! single transform node above every scene's roots, so the vertex data in
//! the BIN chunk is never touched.

use std::f32::consts::{FRAC_PI_2, PI};
use std::path::Path;

use glam::Mat4;
use lavic_core::LavicError;
use serde_json::{Value, json};
use tracing::info;

/// GLB magic number: "glTF"
const GLB_MAGIC: u32 = 0x46546C67;
/// GLB version 2
const GLB_VERSION: u32 = 2;
/// JSON chunk type
const CHUNK_TYPE_JSON: u32 = 0x4E4F534A;

const HEADER_LEN: usize = 12;
const CHUNK_HEADER_LEN: usize = 8;

/// Name given to the inserted transform node.
const ROOT_NODE_NAME: &str = "LavicOrientation";

/// The fixed orientation fix: first `R_x(-90°)`, then `R_y(180°)`.
pub fn orientation_matrix() -> Mat4 {
    Mat4::from_rotation_y(PI) * Mat4::from_rotation_x(-FRAC_PI_2)
}

/// Column-major matrix entries with float noise snapped away.
fn matrix_entries(m: Mat4) -> Vec<f64> {
    m.to_cols_array()
        .iter()
        .map(|&v| {
            let rounded = v.round();
            if (v - rounded).abs() < 1e-6 { rounded } else { v }
        })
        .map(f64::from)
        .collect()
}

struct Chunk {
    kind: u32,
    data: Vec<u8>,
}

fn read_u32(bytes: &[u8], offset: usize) -> Result<u32, LavicError> {
    bytes
        .get(offset..offset + 4)
        .and_then(|b| b.try_into().ok())
        .map(u32::from_le_bytes)
        .ok_or_else(|| LavicError::Mesh(format!("truncated GLB at byte {offset}")))
}

fn parse_chunks(bytes: &[u8]) -> Result<Vec<Chunk>, LavicError> {
    if read_u32(bytes, 0)? != GLB_MAGIC {
        return Err(LavicError::Mesh("not a GLB file (bad magic)".into()));
    }
    let version = read_u32(bytes, 4)?;
    if version != GLB_VERSION {
        return Err(LavicError::Mesh(format!("unsupported GLB version {version}")));
    }
    let total = (read_u32(bytes, 8)? as usize).min(bytes.len());

    let mut chunks = Vec::new();
    let mut offset = HEADER_LEN;
    while offset + CHUNK_HEADER_LEN <= total {
        let len = read_u32(bytes, offset)? as usize;
        let kind = read_u32(bytes, offset + 4)?;
        let start = offset + CHUNK_HEADER_LEN;
        let data = bytes
            .get(start..start + len)
            .ok_or_else(|| LavicError::Mesh(format!("chunk at byte {offset} overruns file")))?;
        chunks.push(Chunk {
            kind,
            data: data.to_vec(),
        });
        offset = start + len;
    }

    match chunks.first() {
        Some(c) if c.kind == CHUNK_TYPE_JSON => Ok(chunks),
        _ => Err(LavicError::Mesh("GLB does not start with a JSON chunk".into())),
    }
}

fn pad_to_4(buf: &mut Vec<u8>, fill: u8) {
    while buf.len() % 4 != 0 {
        buf.push(fill);
    }
}

fn emit(chunks: Vec<Chunk>) -> Vec<u8> {
    let body_len: usize = chunks
        .iter()
        .map(|c| CHUNK_HEADER_LEN + c.data.len())
        .sum();
    let total_length = (HEADER_LEN + body_len) as u32;

    let mut glb = Vec::with_capacity(total_length as usize);
    glb.extend_from_slice(&GLB_MAGIC.to_le_bytes());
    glb.extend_from_slice(&GLB_VERSION.to_le_bytes());
    glb.extend_from_slice(&total_length.to_le_bytes());
    for chunk in chunks {
        glb.extend_from_slice(&(chunk.data.len() as u32).to_le_bytes());
        glb.extend_from_slice(&chunk.kind.to_le_bytes());
        glb.extend_from_slice(&chunk.data);
    }
    glb
}

/// Indices of nodes that are nobody's child.
fn parentless_nodes(doc: &Value) -> Vec<Value> {
    let nodes = doc["nodes"].as_array().map(Vec::as_slice).unwrap_or(&[]);
    let children: Vec<u64> = nodes
        .iter()
        .filter_map(|n| n["children"].as_array())
        .flatten()
        .filter_map(Value::as_u64)
        .collect();
    (0..nodes.len() as u64)
        .filter(|i| !children.contains(i))
        .map(Value::from)
        .collect()
}

/// Inserts the orientation node above every scene's roots.
fn reorient(doc: &mut Value) -> Result<(), LavicError> {
    let root = doc
        .as_object_mut()
        .ok_or_else(|| LavicError::Mesh("glTF JSON is not an object".into()))?;

    if !root.get("scenes").is_some_and(Value::is_array) {
        let roots = parentless_nodes(&Value::Object(root.clone()));
        root.insert("scenes".into(), json!([{ "nodes": roots }]));
        root.insert("scene".into(), json!(0));
    }
    if !root.get("nodes").is_some_and(Value::is_array) {
        root.insert("nodes".into(), json!([]));
    }

    let matrix = matrix_entries(orientation_matrix());
    let scene_count = root["scenes"].as_array().map_or(0, Vec::len);
    for scene in 0..scene_count {
        if !root["scenes"][scene].is_object() {
            return Err(LavicError::Mesh(format!("glTF scene {scene} is not an object")));
        }
        let roots = root["scenes"][scene]["nodes"].take();
        let roots = if roots.is_array() { roots } else { json!([]) };

        let nodes = root["nodes"]
            .as_array_mut()
            .ok_or_else(|| LavicError::Mesh("glTF `nodes` is not an array".into()))?;
        let index = nodes.len();
        nodes.push(json!({
            "name": ROOT_NODE_NAME,
            "matrix": matrix,
            "children": roots,
        }));
        root["scenes"][scene]["nodes"] = json!([index]);
    }
    Ok(())
}

/// Rewrites a GLB so every scene sits under the orientation transform.
pub fn normalize_glb(bytes: &[u8]) -> Result<Vec<u8>, LavicError> {
    let mut chunks = parse_chunks(bytes)?;

    let mut doc: Value = serde_json::from_slice(&chunks[0].data)
        .map_err(|e| LavicError::Mesh(format!("invalid glTF JSON: {e}")))?;
    reorient(&mut doc)?;

    let mut json_bytes = serde_json::to_vec(&doc)
        .map_err(|e| LavicError::Mesh(format!("failed to encode glTF JSON: {e}")))?;
    pad_to_4(&mut json_bytes, b' ');
    chunks[0].data = json_bytes;
    for chunk in chunks.iter_mut().skip(1) {
        pad_to_4(&mut chunk.data, 0);
    }
    Ok(emit(chunks))
}

/// Normalizes the GLB at `path` in place. On error the file is left untouched.
pub async fn normalize_file(path: &Path) -> Result<(), LavicError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| LavicError::io(path, e))?;
    let normalized = normalize_glb(&bytes)?;
    crate::store::write_artifact(path, &normalized).await?;
    info!(path = %path.display(), "mesh orientation normalized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    /// Chunk type used for the binary buffer.
    const CHUNK_TYPE_BIN: u32 = 0x004E4942;

    fn glb(doc: &Value, bin: &[u8]) -> Vec<u8> {
        let mut json_bytes = serde_json::to_vec(doc).unwrap();
        pad_to_4(&mut json_bytes, b' ');
        let mut chunks = vec![Chunk {
            kind: CHUNK_TYPE_JSON,
            data: json_bytes,
        }];
        if !bin.is_empty() {
            chunks.push(Chunk {
                kind: CHUNK_TYPE_BIN,
                data: bin.to_vec(),
            });
        }
        emit(chunks)
    }

    fn json_of(bytes: &[u8]) -> Value {
        let chunks = parse_chunks(bytes).unwrap();
        serde_json::from_slice(&chunks[0].data).unwrap()
    }

    #[test]
    fn matrix_maps_z_up_forward() {
        let m = orientation_matrix();
        // Up (+Z) becomes +Y.
        assert!(m.transform_vector3(Vec3::Z).abs_diff_eq(Vec3::Y, 1e-6));
        // +X is mirrored by the 180° turn.
        assert!(m.transform_vector3(Vec3::X).abs_diff_eq(-Vec3::X, 1e-6));
        assert_eq!(
            matrix_entries(m),
            vec![-1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]
        );
    }

    #[test]
    fn wraps_scene_roots() {
        let doc = json!({
            "asset": {"version": "2.0"},
            "scene": 0,
            "scenes": [{"nodes": [0, 1]}],
            "nodes": [{"mesh": 0}, {"mesh": 1, "children": [2]}, {"mesh": 2}]
        });
        let out = normalize_glb(&glb(&doc, &[1, 2, 3])).unwrap();
        assert_eq!(out.len() % 4, 0);

        let doc = json_of(&out);
        assert_eq!(doc["scenes"][0]["nodes"], json!([3]));
        assert_eq!(doc["nodes"][3]["name"], ROOT_NODE_NAME);
        assert_eq!(doc["nodes"][3]["children"], json!([0, 1]));
        assert_eq!(doc["nodes"][1]["children"], json!([2]));

        let chunks = parse_chunks(&out).unwrap();
        assert_eq!(chunks[1].kind, CHUNK_TYPE_BIN);
        assert_eq!(chunks[1].data, vec![1, 2, 3, 0]);
    }

    #[test]
    fn sceneless_document_gets_a_scene() {
        let doc = json!({
            "asset": {"version": "2.0"},
            "nodes": [{"children": [1]}, {"mesh": 0}, {"mesh": 1}]
        });
        let doc = json_of(&normalize_glb(&glb(&doc, &[])).unwrap());
        assert_eq!(doc["scenes"][0]["nodes"], json!([3]));
        assert_eq!(doc["nodes"][3]["children"], json!([0, 2]));
    }

    #[test]
    fn rejects_non_glb() {
        assert!(matches!(normalize_glb(b"PK\x03\x04junkjunk"), Err(LavicError::Mesh(_))));
        assert!(matches!(normalize_glb(b"glT"), Err(LavicError::Mesh(_))));
    }

    #[tokio::test]
    async fn normalize_file_leaves_bad_file_untouched() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("broken.glb");
        std::fs::write(&path, b"not a mesh").unwrap();
        assert!(normalize_file(&path).await.is_err());
        assert_eq!(std::fs::read(&path).unwrap(), b"not a mesh");
    }
}
