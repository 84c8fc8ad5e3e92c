#![cfg(unix)]

use std::collections::HashMap;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use genomedag::exec::{DispatchEngine, LocalEngine, LocalEngineOptions, TaskReport, TaskSubmission};
use genomedag::types::CachingPolicy;
use genomedag_test_utils::{init_tracing, with_timeout};

fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

fn task(name: &str, command: &Path, args: &[&str], inputs: &[&str], outputs: &[&str]) -> TaskSubmission {
    TaskSubmission {
        job_name: name.to_string(),
        command: command.to_path_buf(),
        args: args.iter().map(|s| s.to_string()).collect(),
        inputs: inputs.iter().map(|s| s.to_string()).collect(),
        outputs: outputs.iter().map(|s| s.to_string()).collect(),
        stage_out: false,
        cluster_label: None,
    }
}

fn engine(root: &Path) -> LocalEngine {
    LocalEngine::new(LocalEngineOptions {
        scratch_dir: root.join("scratch"),
        output_dir: root.join("output"),
        max_parallel: 2,
    })
}

#[test]
fn test_conflicting_declarations_and_outputs_are_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let mut engine = engine(tmp.path());
    let a = tmp.path().join("a");
    let b = tmp.path().join("b");

    engine.declare_file("seed", &a, CachingPolicy::Always).unwrap();
    engine.declare_file("seed", &a, CachingPolicy::Always).unwrap();
    assert!(engine.declare_file("seed", &b, CachingPolicy::Always).is_err());

    let cmd = tmp.path().join("noop");
    assert!(engine.submit(task("writes-seed", &cmd, &[], &[], &["seed"])).is_err());

    engine.submit(task("first", &cmd, &[], &[], &["x"])).unwrap();
    assert!(engine.submit(task("second", &cmd, &[], &[], &["x"])).is_err());
    assert_eq!(engine.outstanding(), 1);
}

#[tokio::test]
async fn test_local_engine_runs_dependent_processes() {
    init_tracing();
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    let bin = root.join("bin");
    std::fs::create_dir(&bin).unwrap();
    std::fs::write(root.join("seed.txt"), "seed\n").unwrap();

    // Writes its arguments to the file named by the first one.
    let produce = script(&bin, "produce", r#"test -f seed.txt || exit 9
printf '%s\n' "$@" > "$1""#);
    let fail = script(&bin, "fail", "echo failing\nexit 3");
    let lazy = script(&bin, "lazy", "exit 0");

    let mut engine = engine(root);
    engine
        .declare_file("seed.txt", &root.join("seed.txt"), CachingPolicy::Always)
        .unwrap();

    let a = engine
        .submit(task("a", &produce, &["a.txt"], &["seed.txt"], &["a.txt"]))
        .unwrap();
    let mut staged = task("b", &produce, &["b.txt", "x"], &["a.txt", "seed.txt"], &["b.txt"]);
    staged.stage_out = true;
    let b = engine.submit(staged).unwrap();
    let c = engine.submit(task("c", &fail, &[], &[], &["c.txt"])).unwrap();
    let d = engine
        .submit(task("d", &produce, &["d.txt"], &["c.txt"], &["d.txt"]))
        .unwrap();
    let e = engine
        .submit(task("e", &produce, &["e.txt"], &["nowhere.txt"], &["e.txt"]))
        .unwrap();
    let f = engine.submit(task("f", &lazy, &[], &[], &["f.txt"])).unwrap();
    assert_eq!(engine.outstanding(), 6);

    let mut reports: HashMap<u64, TaskReport> = HashMap::new();
    with_timeout(async {
        while !engine.is_empty() {
            if let Some(report) = engine.wait(Duration::from_secs(1)).await.unwrap() {
                assert!(reports.insert(report.id, report).is_none());
            }
        }
    })
    .await;
    assert_eq!(reports.len(), 6);

    assert!(reports[&a].successful && reports[&a].completed);
    assert!(reports[&b].successful, "{:?}", reports[&b]);
    assert_eq!(
        std::fs::read_to_string(root.join("output").join("b.txt")).unwrap(),
        "b.txt\nx\n"
    );
    assert!(!root.join("output").join("a.txt").exists());

    assert!(reports[&c].completed && !reports[&c].successful);
    assert_eq!(reports[&c].result_code, 3);
    assert!(reports[&c].std_output.contains("failing"));

    // Producer ran but failed: dependent is attempted and cannot run.
    assert!(!reports[&d].completed);
    // Input nobody produces.
    assert!(!reports[&e].completed);
    assert!(reports[&e].std_output.contains("nowhere.txt"));

    // Clean exit without the declared output.
    assert!(reports[&f].completed && !reports[&f].successful);
    assert!(reports[&f].std_output.contains("f.txt"));
}
