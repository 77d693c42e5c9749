//! Thumbnail derivation under concurrency
//!
//! Several generations race on the same destination while a reader polls
//! it. The reader must only ever see a complete, decodable JPEG.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use image::{Rgb, RgbImage};
use tempfile::TempDir;
use tokio_test::{assert_err, assert_ok};

use heritage_artifacts::{
    derive_thumbnail_path, CapabilitySnapshot, NarrativeProducer, Orchestrator, ThumbnailOptions,
};
use heritage_llm::mock::MockLlmService;
use heritage_projects::{InMemoryProjectStore, PrimaryAsset, Project};

fn orchestrator(projects: InMemoryProjectStore) -> Orchestrator {
    Orchestrator::new(
        Arc::new(projects),
        NarrativeProducer::new(Arc::new(MockLlmService::new()), Duration::from_secs(5)),
    )
}

fn write_source(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    RgbImage::from_fn(1600, 1200, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    })
    .save(&path)
    .unwrap();
    path
}

#[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 4))]
async fn test_concurrent_generation_is_never_observed_partially() {
    let dir = TempDir::new().unwrap();
    let source = write_source(dir.path(), "facade.png");
    let asset = PrimaryAsset::new(&source, "image/png");
    let dest = derive_thumbnail_path(&source);
    let orchestrator = orchestrator(InMemoryProjectStore::new());
    let snapshot = CapabilitySnapshot::new(false);
    let options = ThumbnailOptions::new(320, 240, 90);

    assert_ok!(
        orchestrator
            .thumbnail_for_asset(&snapshot, &asset, options)
            .await
    );

    let stop = Arc::new(AtomicBool::new(false));
    let reads = Arc::new(AtomicUsize::new(0));
    let reader = {
        let dest = dest.clone();
        let stop = stop.clone();
        let reads = reads.clone();
        std::thread::spawn(move || {
            while !stop.load(Ordering::SeqCst) {
                let bytes = std::fs::read(&dest).expect("thumbnail disappeared");
                assert!(!bytes.is_empty(), "observed a zero-byte thumbnail");
                let decoded = image::load_from_memory(&bytes).expect("observed a truncated thumbnail");
                assert_eq!((decoded.width(), decoded.height()), (320, 240));
                reads.fetch_add(1, Ordering::SeqCst);
            }
        })
    };

    let writers: Vec<_> = (0..8)
        .map(|_| {
            let orchestrator = orchestrator.clone();
            let snapshot = snapshot.clone();
            let asset = asset.clone();
            tokio::spawn(async move {
                orchestrator
                    .thumbnail_for_asset(&snapshot, &asset, options)
                    .await
            })
        })
        .collect();

    for writer in writers {
        assert_ok!(writer.await.unwrap());
    }

    stop.store(true, Ordering::SeqCst);
    reader.join().unwrap();

    assert!(reads.load(Ordering::SeqCst) > 0);
    assert_eq!(image::image_dimensions(&dest).unwrap(), (320, 240));

    // Only the final thumbnail remains; no staged temporaries
    let entries = std::fs::read_dir(dest.parent().unwrap()).unwrap().count();
    assert_eq!(entries, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_sibling_assets_share_thumbnail_directory() {
    let dir = TempDir::new().unwrap();
    let orchestrator = orchestrator(InMemoryProjectStore::new());
    let snapshot = CapabilitySnapshot::new(false);

    let tasks: Vec<_> = (0..6)
        .map(|i| {
            let source = write_source(dir.path(), &format!("plate_{i}.png"));
            let orchestrator = orchestrator.clone();
            let snapshot = snapshot.clone();
            tokio::spawn(async move {
                let asset = PrimaryAsset::new(&source, "image/png");
                orchestrator
                    .thumbnail_for_asset(&snapshot, &asset, ThumbnailOptions::default())
                    .await
            })
        })
        .collect();

    for task in tasks {
        let artifact = assert_ok!(task.await.unwrap());
        assert_eq!(image::image_dimensions(&artifact.locator).unwrap(), (400, 300));
    }

    let thumbnails = std::fs::read_dir(dir.path().join("thumbnails"))
        .unwrap()
        .count();
    assert_eq!(thumbnails, 6);
}

#[tokio::test]
async fn test_project_asset_requires_existing_project() {
    let dir = TempDir::new().unwrap();
    let source = write_source(dir.path(), "chapel.png");
    let projects = InMemoryProjectStore::new();
    let project_id = projects
        .insert(Project::new("Chapel".to_string(), None).unwrap())
        .unwrap();
    let orchestrator = orchestrator(projects.clone());
    let snapshot = CapabilitySnapshot::new(false);

    let asset = PrimaryAsset::new(&source, "image/png").for_project(project_id);
    assert_ok!(
        orchestrator
            .thumbnail_for_asset(&snapshot, &asset, ThumbnailOptions::default())
            .await
    );

    assert_ok!(projects.remove(project_id));
    let err = assert_err!(
        orchestrator
            .thumbnail_for_asset(&snapshot, &asset, ThumbnailOptions::default())
            .await
    );
    assert_eq!(err.error_code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_unsupported_type_is_rejected_before_derivation() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("report.pdf");
    std::fs::write(&source, b"%PDF-1.7").unwrap();
    let orchestrator = orchestrator(InMemoryProjectStore::new());

    let err = assert_err!(
        orchestrator
            .thumbnail_for_asset(
                &CapabilitySnapshot::new(true),
                &PrimaryAsset::new(&source, "application/pdf"),
                ThumbnailOptions::default(),
            )
            .await
    );

    assert_eq!(err.error_code(), "SERVICE_UNAVAILABLE");
    assert!(!dir.path().join("thumbnails").exists());
}
