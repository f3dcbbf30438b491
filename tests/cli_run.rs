// tests/cli_run.rs

mod common;
use crate::common::builders::hw_header;
use crate::common::init_tracing;

use buildmatrix::cli::CliArgs;
use buildmatrix::engine::RunStatus;
use buildmatrix::errors::BuildMatrixError;
use buildmatrix::run;

#[tokio::test]
async fn dry_run_discovers_without_touching_output() {
    init_tracing();
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("hwconf");
    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(root.join("hw_a.h"), hw_header("A", "esp32c3")).unwrap();

    let output = tmp.path().join("out");
    let args = CliArgs {
        root: Some(root),
        output: Some(output.clone()),
        build_dir: Some(tmp.path().join("build")),
        dry_run: true,
        ..Default::default()
    };

    let status = run(args).await.unwrap();
    assert_eq!(status, RunStatus::Succeeded);
    assert!(!output.exists());
}

#[tokio::test]
async fn missing_root_fails_before_any_build() {
    let tmp = tempfile::tempdir().unwrap();
    let args = CliArgs {
        root: Some(tmp.path().join("missing")),
        output: Some(tmp.path().join("out")),
        dry_run: true,
        ..Default::default()
    };

    let err = run(args).await.unwrap_err();
    assert!(matches!(err, BuildMatrixError::MissingRoot(_)));
    assert!(!tmp.path().join("out").exists());
}
