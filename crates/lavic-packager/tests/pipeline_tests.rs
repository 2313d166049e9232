// SPDX-FileCopyrightText: 2026 LaViC Toolkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end batch packaging with fake collaborators.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use lavic_config::CatalogEntry;
use lavic_packager::{
    AssetFetcher, Catalog, DiskStore, ManifestTemplate, MeshGenerator, PackageAssembler, Pipeline,
    PollPolicy, SheetRow, SymbolGenerator,
};
use lavic_test_utils::{CountingImageSource, CountingSymbolRenderer, ScriptedJobProvider};
use serde_json::{Value, json};

fn template() -> ManifestTemplate {
    ManifestTemplate::from_value(json!([{
        "agentName": "template",
        "model": {
            "modelName": "template",
            "thumbnail": {"url": "", "ossSig": ""},
            "mapIconUrl": {"url": "", "ossSig": ""},
            "dimModelUrls": [{"url": "", "ossSig": ""}]
        },
        "missionableDynamics": [{
            "dynSettings": {
                "pluginDefaultSettings": "{\"freqdistPlugin\":null,\"dynSettings\":{\"V_max\":100,\"V_min\":10,\"a_max\":5}}"
            }
        }]
    }]))
    .unwrap()
}

fn catalog() -> Catalog {
    Catalog::new([
        CatalogEntry {
            display_name: "F-22猛禽战斗机".into(),
            key: "F-22_Raptor".into(),
            search_term: "F-22 Raptor".into(),
        },
        CatalogEntry {
            display_name: "损坏的条目".into(),
            key: "Broken".into(),
            search_term: "broken".into(),
        },
    ])
}

fn pipeline(root: &Path, images: CountingImageSource) -> (Pipeline, Arc<ScriptedJobProvider>) {
    let downloads = root.join("downloads");
    let provider = Arc::new(ScriptedJobProvider::done());
    let pipeline = Pipeline::new(
        catalog(),
        AssetFetcher::new(Arc::new(images), Arc::new(DiskStore::images(&downloads))),
        SymbolGenerator::new(
            Arc::new(CountingSymbolRenderer::new()),
            Arc::new(DiskStore::symbols(&downloads)),
        ),
        MeshGenerator::new(provider.clone(), Arc::new(DiskStore::meshes(&downloads))).with_policy(
            PollPolicy {
                interval: Duration::from_millis(5),
                max_attempts: 3,
            },
        ),
        PackageAssembler::new(root.join("models"), template()),
    );
    (pipeline, provider)
}

fn row(name: &str, dynamics: &str) -> SheetRow {
    SheetRow {
        display_name: name.into(),
        dynamics_text: dynamics.into(),
        category: "战斗机".into(),
    }
}

fn zip_names(path: &Path) -> Vec<String> {
    let archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names.sort();
    names
}

#[tokio::test]
async fn builds_package_directory_and_archive() {
    let tmp = tempfile::tempdir().unwrap();
    let (pipeline, _) = pipeline(tmp.path(), CountingImageSource::found());

    let report = pipeline
        .run(&[row("F-22猛禽战斗机", "最大速度：670，最小速度：60，最大角速度：35")])
        .await;

    assert!(report.is_success());
    let archive = tmp.path().join("models/F-22_Raptor.zip");
    assert_eq!(report.packaged, vec![("F-22_Raptor".to_string(), archive.clone())]);
    assert_eq!(
        zip_names(&archive),
        vec![
            "F-22_Raptor/F-22_Raptor.png",
            "F-22_Raptor/F-22_Raptor_AI_Rodin.glb",
            "F-22_Raptor/F-22_Raptor_mil.png",
            "agent.json",
        ]
    );

    let manifest_text = std::fs::read_to_string(tmp.path().join("models/F-22_Raptor/agent.json")).unwrap();
    assert!(manifest_text.contains("F-22猛禽战斗机 (战斗机)"));
    let manifest: Value = serde_json::from_str(&manifest_text).unwrap();
    let agent = &manifest[0];
    assert_eq!(agent["modelUrlSlim"], "F-22_Raptor/F-22_Raptor_AI_Rodin.glb");

    let settings: Value = serde_json::from_str(
        agent["missionableDynamics"][0]["dynSettings"]["pluginDefaultSettings"]
            .as_str()
            .unwrap(),
    )
    .unwrap();
    assert_eq!(settings["dynSettings"]["V_max"], json!(670.0));
    assert_eq!(settings["dynSettings"]["V_min"], json!(60.0));
    assert_eq!(settings["dynSettings"]["omega_max"], json!(0.61));
    assert_eq!(settings["dynSettings"]["a_max"], json!(5));
}

#[tokio::test]
async fn symbol_substitutes_missing_thumbnail_and_mesh_uses_text_mode() {
    let tmp = tempfile::tempdir().unwrap();
    let (pipeline, provider) = pipeline(tmp.path(), CountingImageSource::empty());

    let report = pipeline.run(&[row("F-22猛禽战斗机", "")]).await;
    assert!(report.is_success());

    let assets = tmp.path().join("models/F-22_Raptor/F-22_Raptor");
    assert_eq!(
        std::fs::read(assets.join("F-22_Raptor.png")).unwrap(),
        std::fs::read(assets.join("F-22_Raptor_mil.png")).unwrap()
    );
    let submitted = provider.submitted().await;
    assert_eq!(submitted.len(), 1);
    assert!(!submitted[0].is_image_seeded());
}

#[tokio::test]
async fn failing_row_does_not_stop_the_batch() {
    let tmp = tempfile::tempdir().unwrap();
    let (pipeline, _) = pipeline(tmp.path(), CountingImageSource::found());
    // A plain file where the package directory should go.
    std::fs::create_dir_all(tmp.path().join("models")).unwrap();
    std::fs::write(tmp.path().join("models/Broken"), b"in the way").unwrap();

    let report = pipeline
        .run(&[
            row("损坏的条目", ""),
            row("未知机型", ""),
            row("F-22猛禽战斗机", "最大速度：670"),
        ])
        .await;

    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, "Broken");
    assert_eq!(report.skipped, vec!["未知机型".to_string()]);
    assert_eq!(report.packaged.len(), 1);
    assert!(tmp.path().join("models/F-22_Raptor.zip").is_file());
}

#[tokio::test]
async fn only_filter_restricts_batch() {
    let tmp = tempfile::tempdir().unwrap();
    let (pipeline, provider) = pipeline(tmp.path(), CountingImageSource::found());
    let pipeline = pipeline.only("Broken");

    let report = pipeline.run(&[row("F-22猛禽战斗机", "")]).await;

    assert!(report.packaged.is_empty());
    assert_eq!(report.skipped, vec!["F-22猛禽战斗机".to_string()]);
    assert!(provider.submitted().await.is_empty());
}
