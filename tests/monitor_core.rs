use genomedag::dag::{JobGraph, JobKind, JobSpec};
use genomedag::driver::{MonitorCore, MonitorEvent, TaskOutcome};
use genomedag::exec::TaskReport;

fn report(id: u64, successful: bool, completed: bool, code: i32, out: &str) -> TaskReport {
    TaskReport {
        id,
        successful,
        completed,
        result_code: code,
        std_output: out.to_string(),
    }
}

fn two_job_graph() -> JobGraph {
    let mut graph = JobGraph::new();
    let a = graph.intern("chr1n.tar.gz");
    let b = graph.intern("sifted.SIFT.chr1.txt");
    graph
        .add_job(JobSpec::new(JobKind::Merge, "1").output(a))
        .unwrap();
    graph
        .add_job(JobSpec::new(JobKind::Sift, "1").output(b))
        .unwrap();
    graph
}

#[test]
fn test_classifies_three_kinds_of_completion() {
    assert_eq!(
        TaskOutcome::classify(&report(1, true, true, 0, "")),
        TaskOutcome::Succeeded
    );
    assert_eq!(
        TaskOutcome::classify(&report(2, false, true, 2, "boom")),
        TaskOutcome::ApplicationError {
            result_code: 2,
            std_output: "boom".into()
        }
    );
    assert_eq!(
        TaskOutcome::classify(&report(3, false, false, -1, "no host")),
        TaskOutcome::DispatchFailure {
            result_code: -1,
            reason: "no host".into()
        }
    );
}

#[test]
fn test_step_maps_task_ids_back_to_jobs() {
    let graph = two_job_graph();
    let mut core = MonitorCore::new();
    core.record_submission(10, &graph.jobs()[0]);
    core.record_submission(11, &graph.jobs()[1]);
    assert_eq!(core.outstanding(), 2);

    let out = core
        .step(MonitorEvent::Completed(report(11, false, true, 1, "bad")))
        .unwrap();
    assert_eq!(out.job_name, "sifting:sifted.SIFT.chr1.txt");
    assert_eq!(out.kind, JobKind::Sift);
    assert_eq!(out.task_id, 11);
    assert!(!out.outcome.is_success());

    let out = core
        .step(MonitorEvent::Completed(report(10, true, true, 0, "")))
        .unwrap();
    assert_eq!(out.job_name, "individuals_merge:chr1n.tar.gz");
    assert_eq!(core.outstanding(), 0);

    let report = core.into_report();
    assert_eq!(report.outcomes.len(), 2);
    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.application_errors(), 1);
    assert!(!report.all_succeeded());
    assert_eq!(
        report.outcome_of("individuals_merge:chr1n.tar.gz"),
        Some(&TaskOutcome::Succeeded)
    );
}

#[test]
fn test_unknown_and_repeated_reports_are_ignored() {
    let graph = two_job_graph();
    let mut core = MonitorCore::new();
    core.record_submission(1, &graph.jobs()[0]);

    assert!(core
        .step(MonitorEvent::Completed(report(99, true, true, 0, "")))
        .is_none());
    assert!(core
        .step(MonitorEvent::Completed(report(1, true, true, 0, "")))
        .is_some());
    assert!(core
        .step(MonitorEvent::Completed(report(1, true, true, 0, "")))
        .is_none());

    assert_eq!(core.report().outcomes.len(), 1);
}

#[test]
fn test_timeouts_are_counted_not_classified() {
    let mut core = MonitorCore::new();
    assert!(core.step(MonitorEvent::WaitTimedOut).is_none());
    assert!(core.step(MonitorEvent::WaitTimedOut).is_none());

    let report = core.into_report();
    assert_eq!(report.idle_waits, 2);
    assert!(report.outcomes.is_empty());
    assert!(report.all_succeeded());
}

#[test]
fn test_report_display_lists_failures() {
    let graph = two_job_graph();
    let mut core = MonitorCore::new();
    core.record_submission(1, &graph.jobs()[0]);
    core.record_submission(2, &graph.jobs()[1]);
    core.step(MonitorEvent::Completed(report(1, false, true, 3, "")));
    core.step(MonitorEvent::Completed(report(2, false, false, -1, "lost worker")));

    let text = core.report().to_string();
    assert!(text.starts_with("2 tasks: 0 succeeded, 1 application errors, 1 dispatch failures"));
    assert!(text.contains("individuals_merge:chr1n.tar.gz"));
    assert!(text.contains("result 3"));
    assert!(text.contains("lost worker"));
}
