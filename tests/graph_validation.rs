use genomedag::dag::{ExternalKind, JobGraph, JobKind, JobSpec, Producer};
use genomedag::errors::GenomeDagError;

#[test]
fn test_hand_built_cycle_is_detected() {
    let mut graph = JobGraph::new();
    let a = graph.intern("a.tar.gz");
    let b = graph.intern("b.tar.gz");

    graph
        .add_job(JobSpec::new(JobKind::Shard, "1").input(a).output(b))
        .unwrap();
    graph
        .add_job(JobSpec::new(JobKind::Merge, "1").input(b).output(a))
        .unwrap();

    let err = graph.validate().unwrap_err();
    assert!(matches!(err, GenomeDagError::DagCycle(_)), "got {err:?}");
    assert!(matches!(
        graph.topological_order(),
        Err(GenomeDagError::DagCycle(_))
    ));
}

#[test]
fn test_unproduced_input_is_missing_producer() {
    let mut graph = JobGraph::new();
    let ghost = graph.intern("ghost.txt");
    let out = graph.intern("out.tar.gz");

    graph
        .add_job(JobSpec::new(JobKind::Sift, "1").input(ghost).output(out))
        .unwrap();

    match graph.validate().unwrap_err() {
        GenomeDagError::MissingProducer { artifact, job } => {
            assert_eq!(artifact, "ghost.txt");
            assert_eq!(job, "sifting:out.tar.gz");
        }
        other => panic!("expected missing producer, got {other:?}"),
    }
}

#[test]
fn test_declared_external_input_validates() {
    let mut graph = JobGraph::new();
    let base = graph
        .declare_external("ALL.chr1.vcf", ExternalKind::BaseFile)
        .unwrap();
    let out = graph.intern("chr1n-1-2.tar.gz");

    let id = graph
        .add_job(JobSpec::new(JobKind::Shard, "1").input(base).output(out))
        .unwrap();

    graph.validate().unwrap();
    assert_eq!(graph.artifacts().producer(out), Producer::Job(id));
    assert_eq!(
        graph.artifacts().producer(base),
        Producer::External(ExternalKind::BaseFile)
    );
}

#[test]
fn test_job_without_outputs_is_invalid() {
    let mut graph = JobGraph::new();
    let err = graph
        .add_job(JobSpec::new(JobKind::Merge, "1"))
        .unwrap_err();
    assert!(matches!(err, GenomeDagError::InvalidJob(_)), "got {err:?}");
    assert!(graph.is_empty());
}

#[test]
fn test_repeated_output_is_invalid() {
    let mut graph = JobGraph::new();
    let out = graph.intern("x.tar.gz");
    let err = graph
        .add_job(JobSpec::new(JobKind::Merge, "1").output(out).output(out))
        .unwrap_err();
    assert!(matches!(err, GenomeDagError::InvalidJob(_)), "got {err:?}");
}

#[test]
fn test_second_producer_is_rejected_and_graph_unchanged() {
    let mut graph = JobGraph::new();
    let x = graph.intern("x.tar.gz");
    let y = graph.intern("y.tar.gz");

    graph
        .add_job(JobSpec::new(JobKind::Merge, "1").output(x))
        .unwrap();
    let err = graph
        .add_job(JobSpec::new(JobKind::Sift, "1").output(y).output(x))
        .unwrap_err();

    assert!(
        matches!(err, GenomeDagError::DuplicateProducer { ref artifact, .. } if artifact == "x.tar.gz"),
        "got {err:?}"
    );
    assert_eq!(graph.len(), 1);
    assert_eq!(graph.artifacts().producer(y), Producer::Unbound);
}

#[test]
fn test_job_cannot_produce_external_file() {
    let mut graph = JobGraph::new();
    let cols = graph
        .declare_external("columns.txt", ExternalKind::Columns)
        .unwrap();

    let err = graph
        .add_job(JobSpec::new(JobKind::Sift, "1").output(cols))
        .unwrap_err();
    assert!(matches!(err, GenomeDagError::DuplicateProducer { .. }));

    // Re-declaring with the same kind is fine, with another kind it is not.
    graph
        .declare_external("columns.txt", ExternalKind::Columns)
        .unwrap();
    assert!(graph
        .declare_external("columns.txt", ExternalKind::Population)
        .is_err());
}

#[test]
fn test_edges_are_inferred_from_shared_artifacts() {
    let mut graph = JobGraph::new();
    let a = graph.intern("a");
    let b = graph.intern("b");
    let c = graph.intern("c");

    let first = graph
        .add_job(JobSpec::new(JobKind::Shard, "1").output(a))
        .unwrap();
    let second = graph
        .add_job(JobSpec::new(JobKind::Sift, "1").output(b))
        .unwrap();
    let third = graph
        .add_job(JobSpec::new(JobKind::Merge, "1").inputs([a, b]).output(c))
        .unwrap();

    assert_eq!(graph.dependencies_of(third), vec![first, second]);
    assert_eq!(graph.dependents_of(first), vec![third]);

    let dag = graph.dependency_graph();
    assert_eq!(dag.edge_count(), 2);
    assert_eq!(dag.edge_weight(first, third), Some(&a));
    assert_eq!(graph.topological_order().unwrap().last(), Some(&third));
}
