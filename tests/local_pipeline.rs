#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::time::Duration;

use genomedag::dag::JobGraphBuilder;
use genomedag::driver::{DriverOptions, ExecutionDriver, ReplicaLayout, TaskOutcome};
use genomedag::exec::{LocalEngine, LocalEngineOptions};
use genomedag::types::CachingPolicy;
use genomedag_test_utils::builders::{populations, DatasetBuilder};
use genomedag_test_utils::{init_tracing, with_timeout};

const INDIVIDUALS: &str = r#"test -f "$1" || exit 2
test -f columns.txt || exit 2
echo "rows $3-$4 of $5" > "chr$2n-$3-$4.tar.gz""#;

const MERGE: &str = r#"c=$1
shift
cat "$@" > "chr${c}n.tar.gz""#;

const SIFTING_OK: &str = r#"test -f "$1" || exit 2
echo sifted > "sifted.SIFT.chr$2.txt""#;

const SIFTING_BROKEN: &str = "echo 'sifting crashed'\nexit 1";

const OVERLAP: &str = r#"test -f "chr$2n.tar.gz" || exit 2
test -f "sifted.SIFT.chr$2.txt" || exit 2
test -f "$4" || exit 2
echo overlap > "chr$2-$4.tar.gz""#;

const FREQUENCY: &str = r#"echo freq > "chr$2-$4-freq.tar.gz""#;

fn write_exec(path: &Path, body: &str) {
    std::fs::write(path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut perms = std::fs::metadata(path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(path, perms).unwrap();
}

/// Lay out `<src>/bin` and `<src>/data` like a real checkout.
fn source_tree(src: &Path, sifting: &str) {
    let bin = src.join("bin");
    let data = src.join("data").join("20130502");
    std::fs::create_dir_all(&bin).unwrap();
    std::fs::create_dir_all(data.join("sifting")).unwrap();
    std::fs::create_dir_all(src.join("data").join("populations")).unwrap();

    write_exec(&bin.join("individuals.py"), INDIVIDUALS);
    write_exec(&bin.join("individuals_merge.py"), MERGE);
    write_exec(&bin.join("sifting.py"), sifting);
    write_exec(&bin.join("mutation_overlap.py"), OVERLAP);
    write_exec(&bin.join("frequency.py"), FREQUENCY);

    std::fs::write(data.join("ALL.chr1.4.vcf"), "r1\nr2\nr3\nr4\n").unwrap();
    std::fs::write(data.join("columns.txt"), "c1\n").unwrap();
    std::fs::write(data.join("sifting").join("SIFT.chr1.txt"), "s\n").unwrap();
    std::fs::write(src.join("data").join("populations").join("AFR"), "HG01879\n").unwrap();
}

async fn run_pipeline(src: &Path) -> genomedag::driver::OutcomeReport {
    let datasets = DatasetBuilder::new()
        .row("ALL.chr1.4.vcf", 4, "SIFT.chr1.txt")
        .build();
    let graph = JobGraphBuilder::new(2)
        .build(&datasets, &populations(&["AFR"]))
        .unwrap();

    let engine = LocalEngine::new(LocalEngineOptions {
        scratch_dir: src.join("run").join("scratch"),
        output_dir: src.join("run").join("output"),
        max_parallel: 3,
    });
    let layout = ReplicaLayout {
        src_path: src.to_path_buf(),
        dataset: "20130502".to_string(),
        populations_dir: src.join("data").join("populations"),
        use_bash: false,
    };
    let options = DriverOptions {
        wait_timeout: Duration::from_millis(200),
        caching: CachingPolicy::Always,
    };

    with_timeout(ExecutionDriver::new(engine, layout, options).run(&graph))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_pipeline_runs_locally_and_reports_failures() {
    init_tracing();
    let tmp = tempfile::tempdir().unwrap();
    let good = tmp.path().join("good");
    let broken = tmp.path().join("broken");
    // All scripts are written before any process is spawned.
    source_tree(&good, SIFTING_OK);
    source_tree(&broken, SIFTING_BROKEN);

    let report = run_pipeline(&good).await;
    assert_eq!(report.outcomes.len(), 6);
    assert!(report.all_succeeded(), "{report}");

    let output = good.join("run").join("output");
    assert!(output.join("chr1-AFR.tar.gz").exists());
    assert!(output.join("chr1-AFR-freq.tar.gz").exists());
    // Intermediates stay in scratch.
    assert!(!output.join("chr1n.tar.gz").exists());
    let merged = std::fs::read_to_string(good.join("run").join("scratch").join("chr1n.tar.gz"))
        .unwrap();
    assert_eq!(merged, "rows 1-3 of 4\nrows 3-5 of 4\n");

    let report = run_pipeline(&broken).await;
    assert_eq!(report.outcomes.len(), 6);
    assert!(matches!(
        report.outcome_of("sifting:sifted.SIFT.chr1.txt"),
        Some(TaskOutcome::ApplicationError { result_code: 1, .. })
    ));
    // Both analyses need the sifted file, which was never written.
    assert!(matches!(
        report.outcome_of("mutation_overlap:chr1-AFR.tar.gz"),
        Some(TaskOutcome::DispatchFailure { .. })
    ));
    assert!(matches!(
        report.outcome_of("frequency:chr1-AFR-freq.tar.gz"),
        Some(TaskOutcome::DispatchFailure { .. })
    ));
    assert_eq!(report.succeeded(), 3);
}
