//! Download lifecycle integration tests.
//!
//! These tests drive complete runs through the downloader:
//! checking -> resolving -> dispatching -> awaiting -> completed/failed

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use buildfetch_core::{
    build_api::Artifact,
    testing::{fixtures, MockBuildApi, MockTransferEngine},
    transfer::{DestinationProvider, SourceProvider},
    ArtifactDownloader, ArtifactWarning, BuildType, Credential, DownloadRequest,
    ItemTransferEngine, OrchestratorError, TransferConfig,
};

const COLLECTION_URL: &str = "https://dev.example.com/org";

/// Test helper holding the mocks behind a downloader.
struct TestHarness {
    build_api: MockBuildApi,
    engine: MockTransferEngine,
}

impl TestHarness {
    fn new() -> Self {
        Self {
            build_api: MockBuildApi::new(),
            engine: MockTransferEngine::new(),
        }
    }

    fn downloader(&self) -> ArtifactDownloader {
        ArtifactDownloader::new(
            COLLECTION_URL,
            Credential::from_token(Some("pat")),
            Arc::new(self.build_api.clone()),
            Arc::new(self.engine.clone()),
        )
    }

    async fn add_artifacts(&self, build_id: u32, artifacts: Vec<Artifact>) {
        for artifact in artifacts {
            self.build_api.add_artifact(build_id, artifact).await;
        }
    }

    async fn dispatch_count(&self) -> usize {
        self.engine.submitted_jobs().await.len()
    }
}

#[tokio::test]
async fn test_all_supported_artifacts_succeed() {
    let harness = TestHarness::new();
    harness
        .add_artifacts(
            42,
            vec![
                fixtures::container_artifact("drop", 7),
                fixtures::container_artifact("logs", 8),
                fixtures::file_path_artifact("symbols", "file:///share/symbols"),
            ],
        )
        .await;

    let outcome = harness
        .downloader()
        .run(DownloadRequest::all("proj", 42, "/out"))
        .await
        .expect("run should succeed");

    assert_eq!(outcome.jobs_dispatched, 3);
    assert_eq!(outcome.reports.len(), 3);
    assert!(outcome.warnings.is_empty());
    assert_eq!(harness.dispatch_count().await, 3);
}

#[tokio::test]
async fn test_definition_mismatch_dispatches_nothing() {
    let harness = TestHarness::new();
    harness.build_api.set_definition_builds(7, vec![40, 41]).await;
    harness
        .add_artifacts(42, vec![fixtures::container_artifact("drop", 7)])
        .await;

    let mut request = DownloadRequest::all("proj", 42, "/out");
    request.definition_id = Some(7);

    let err = harness.downloader().run(request).await.unwrap_err();
    assert!(matches!(
        err,
        OrchestratorError::BuildDefinitionMismatch {
            build_id: 42,
            definition_id: 7
        }
    ));
    assert_eq!(harness.dispatch_count().await, 0);
}

#[tokio::test]
async fn test_mismatch_reported_even_when_artifact_missing() {
    let harness = TestHarness::new();
    harness.build_api.set_definition_builds(7, vec![40]).await;

    let mut request = DownloadRequest::single("proj", 42, "drop", "/out");
    request.definition_id = Some(7);

    let err = harness.downloader().run(request).await.unwrap_err();
    assert!(matches!(err, OrchestratorError::BuildDefinitionMismatch { .. }));
    assert!(harness
        .build_api
        .recorded_artifact_queries()
        .await
        .is_empty());
}

#[tokio::test]
async fn test_empty_definition_dispatches_nothing() {
    let harness = TestHarness::new();
    harness
        .add_artifacts(42, vec![fixtures::container_artifact("drop", 7)])
        .await;

    let mut request = DownloadRequest::all("proj", 42, "/out");
    request.definition_id = Some(7);

    let err = harness.downloader().run(request).await.unwrap_err();
    assert!(matches!(
        err,
        OrchestratorError::DefinitionHasNoBuilds { definition_id: 7 }
    ));
    assert_eq!(harness.dispatch_count().await, 0);
}

#[tokio::test]
async fn test_current_build_skips_definition_check() {
    let harness = TestHarness::new();
    harness
        .add_artifacts(42, vec![fixtures::container_artifact("drop", 7)])
        .await;

    let mut request = DownloadRequest::all("proj", 42, "/out");
    request.build_type = BuildType::Current;
    request.definition_id = Some(7);

    harness.downloader().run(request).await.unwrap();
    assert!(harness.build_api.recorded_build_queries().await.is_empty());
    assert_eq!(harness.dispatch_count().await, 1);
}

#[tokio::test]
async fn test_invalid_container_locator_dispatches_nothing() {
    let harness = TestHarness::new();
    harness
        .add_artifacts(
            42,
            vec![
                fixtures::container_artifact("good", 7),
                Artifact::new("bad", "Container", "#/not-a-number/bad"),
            ],
        )
        .await;

    let err = harness
        .downloader()
        .run(DownloadRequest::all("proj", 42, "/out"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        OrchestratorError::InvalidArtifactData { ref artifact, .. } if artifact == "bad"
    ));
    assert!(err.is_pre_dispatch());
    assert_eq!(harness.dispatch_count().await, 0);
}

#[tokio::test]
async fn test_nested_container_locator_dispatches_nothing() {
    let harness = TestHarness::new();
    harness
        .add_artifacts(
            42,
            vec![
                fixtures::container_artifact("drop", 7),
                Artifact::new("nested", "Container", "#/8/nested/extra"),
            ],
        )
        .await;

    let err = harness
        .downloader()
        .run(DownloadRequest::all("proj", 42, "/out"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        OrchestratorError::InvalidArtifactData { ref locator, .. } if locator == "#/8/nested/extra"
    ));
    assert_eq!(harness.dispatch_count().await, 0);
}

#[tokio::test]
async fn test_container_outside_artifact_folder_is_flagged() {
    let harness = TestHarness::new();
    harness
        .add_artifacts(
            42,
            vec![
                fixtures::container_artifact("drop", 7),
                Artifact::new("logs", "Container", "#/8/drop"),
            ],
        )
        .await;

    let outcome = harness
        .downloader()
        .run(DownloadRequest::all("proj", 42, "/out"))
        .await
        .unwrap();

    assert_eq!(outcome.jobs_dispatched, 2);
    assert_eq!(
        outcome.warnings,
        vec![ArtifactWarning::NamespaceMismatch {
            artifact: "logs".to_string(),
            item_path: "drop".to_string(),
        }]
    );
}

#[tokio::test]
async fn test_single_download_pattern() {
    let harness = TestHarness::new();
    harness
        .add_artifacts(
            42,
            vec![
                fixtures::container_artifact("drop", 7),
                fixtures::container_artifact("logs", 8),
            ],
        )
        .await;

    let mut request = DownloadRequest::single("proj", 42, "drop", "/out");
    request.item_pattern = Some("**/*.pdb".to_string());
    let outcome = harness.downloader().run(request).await.unwrap();

    assert_eq!(outcome.jobs_dispatched, 1);
    let jobs = harness.engine.submitted_jobs().await;
    assert_eq!(jobs[0].artifact, "drop");
    assert_eq!(jobs[0].options.item_pattern, "drop/**");
}

#[tokio::test]
async fn test_default_and_explicit_patterns() {
    let harness = TestHarness::new();
    harness
        .add_artifacts(42, vec![fixtures::container_artifact("drop", 7)])
        .await;

    harness
        .downloader()
        .run(DownloadRequest::all("proj", 42, "/out"))
        .await
        .unwrap();

    let mut request = DownloadRequest::all("proj", 42, "/out");
    request.item_pattern = Some("drop/bin/**".to_string());
    request.parallel_limit = std::num::NonZeroUsize::new(2);
    harness.downloader().run(request).await.unwrap();

    let jobs = harness.engine.submitted_jobs().await;
    assert_eq!(jobs[0].options.item_pattern, "**");
    assert_eq!(jobs[1].options.item_pattern, "drop/bin/**");
    assert_eq!(jobs[1].options.max_parallel_transfers.map(|n| n.get()), Some(2));
}

#[tokio::test]
async fn test_single_missing_artifact() {
    let harness = TestHarness::new();

    let err = harness
        .downloader()
        .run(DownloadRequest::single("proj", 42, "drop", "/out"))
        .await
        .unwrap_err();

    assert!(matches!(err, OrchestratorError::ArtifactNotFound { build_id: 42, .. }));
    assert_eq!(harness.dispatch_count().await, 0);
}

#[tokio::test]
async fn test_one_failure_lets_siblings_finish() {
    let harness = TestHarness::new();
    harness
        .add_artifacts(
            42,
            vec![
                fixtures::container_artifact("a", 1),
                fixtures::container_artifact("b", 2),
                fixtures::container_artifact("c", 3),
            ],
        )
        .await;
    harness.engine.fail_artifact("a", "connection reset").await;
    harness
        .engine
        .set_delay("b", Duration::from_millis(50))
        .await;
    harness
        .engine
        .set_delay("c", Duration::from_millis(100))
        .await;

    let err = harness
        .downloader()
        .run(DownloadRequest::all("proj", 42, "/out"))
        .await
        .unwrap_err();

    match &err {
        OrchestratorError::TransferFailed {
            artifact,
            failed_jobs,
            total_jobs,
            ..
        } => {
            assert_eq!(artifact, "a");
            assert_eq!(*failed_jobs, 1);
            assert_eq!(*total_jobs, 3);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(err.to_string().contains("connection reset"));

    let completed = harness.engine.completed_jobs().await;
    assert_eq!(completed.len(), 3);
    assert_eq!(completed.iter().filter(|r| r.success).count(), 2);
}

#[tokio::test]
async fn test_jobs_run_concurrently() {
    let harness = TestHarness::new();
    harness
        .add_artifacts(
            42,
            vec![
                fixtures::container_artifact("a", 1),
                fixtures::container_artifact("b", 2),
                fixtures::container_artifact("c", 3),
            ],
        )
        .await;
    for name in ["a", "b", "c"] {
        harness
            .engine
            .set_delay(name, Duration::from_millis(50))
            .await;
    }

    harness
        .downloader()
        .run(DownloadRequest::all("proj", 42, "/out"))
        .await
        .unwrap();

    assert_eq!(harness.engine.max_in_flight(), 3);
}

#[tokio::test]
async fn test_unsupported_artifact_is_skipped() {
    let harness = TestHarness::new();
    harness
        .add_artifacts(
            42,
            vec![
                fixtures::unsupported_artifact("src", "other"),
                fixtures::container_artifact("drop", 7),
            ],
        )
        .await;

    let outcome = harness
        .downloader()
        .run(DownloadRequest::all("proj", 42, "/out"))
        .await
        .unwrap();

    assert_eq!(outcome.jobs_dispatched, 1);
    assert_eq!(
        outcome.warnings,
        vec![ArtifactWarning::UnsupportedResource {
            artifact: "src".to_string(),
            resource_type: "other".to_string(),
        }]
    );
    let jobs = harness.engine.submitted_jobs().await;
    assert!(jobs.iter().all(|j| j.artifact != "src"));
}

#[tokio::test]
async fn test_only_unsupported_artifacts_succeeds_empty() {
    let harness = TestHarness::new();
    harness
        .add_artifacts(42, vec![fixtures::unsupported_artifact("src", "other")])
        .await;

    let outcome = harness
        .downloader()
        .run(DownloadRequest::all("proj", 42, "/out"))
        .await
        .unwrap();

    assert_eq!(outcome.jobs_dispatched, 0);
    assert_eq!(outcome.warnings.len(), 1);
}

#[tokio::test]
async fn test_build_42_scenario() {
    let harness = TestHarness::new();
    harness
        .add_artifacts(
            42,
            vec![
                fixtures::container_artifact("drop", 7),
                fixtures::file_path_artifact("drop2", "file:///share/drop2"),
            ],
        )
        .await;

    let outcome = harness
        .downloader()
        .run(DownloadRequest::all("proj", 42, "/out"))
        .await
        .unwrap();

    assert_eq!(outcome.jobs_dispatched, 2);
    assert_eq!(outcome.destination, PathBuf::from("/out"));

    let mut jobs = harness.engine.submitted_jobs().await;
    jobs.sort_by(|a, b| a.artifact.cmp(&b.artifact));
    for job in &jobs {
        assert_eq!(
            job.destination,
            DestinationProvider::Filesystem {
                root: PathBuf::from("/out")
            }
        );
    }

    match &jobs[0].source {
        SourceProvider::Container(c) => {
            assert_eq!(
                c.items_url(),
                format!(
                    "{}/_apis/resources/Containers/7?itemPath=drop&isShallow=true",
                    COLLECTION_URL
                )
            );
            assert!(c.credential.is_authenticated());
        }
        other => panic!("unexpected source: {:?}", other),
    }
    match &jobs[1].source {
        SourceProvider::FileShare(f) => {
            assert_eq!(f.root, PathBuf::from("/share/drop2"));
            assert_eq!(f.namespace, "drop2");
        }
        other => panic!("unexpected source: {:?}", other),
    }
}

#[tokio::test]
async fn test_file_share_download_end_to_end() {
    let share = TempDir::new().expect("Failed to create share dir");
    let out = TempDir::new().expect("Failed to create output dir");
    tokio::fs::create_dir_all(share.path().join("bin")).await.unwrap();
    tokio::fs::write(share.path().join("bin/app.dll"), b"binary")
        .await
        .unwrap();
    tokio::fs::write(share.path().join("notes.txt"), b"notes")
        .await
        .unwrap();

    let build_api = MockBuildApi::new();
    let locator = format!("file:{}", share.path().display());
    build_api
        .add_artifact(42, fixtures::file_path_artifact("drop", &locator))
        .await;

    let engine = ItemTransferEngine::new(TransferConfig::default()).unwrap();
    let downloader = ArtifactDownloader::new(
        COLLECTION_URL,
        Credential::Anonymous,
        Arc::new(build_api),
        Arc::new(engine),
    );

    let mut request = DownloadRequest::all("proj", 42, out.path());
    request.item_pattern = Some("**/*.dll".to_string());
    let outcome = downloader.run(request).await.unwrap();

    assert_eq!(outcome.reports.len(), 1);
    assert_eq!(outcome.reports[0].files_transferred, 1);
    assert_eq!(
        tokio::fs::read(out.path().join("drop/bin/app.dll"))
            .await
            .unwrap(),
        b"binary"
    );
    assert!(!out.path().join("drop/notes.txt").exists());
}
