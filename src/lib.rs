// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod dataset;
pub mod driver;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod naming;
pub mod plan;
pub mod types;

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::{default_config_path, load_or_default, ConfigFile};
use crate::dag::{JobGraph, JobGraphBuilder, JobKind};
use crate::dataset::{discover_populations, load_datasets};
use crate::driver::{DriverOptions, ExecutionDriver, ReplicaLayout};
use crate::exec::{LocalEngine, LocalEngineOptions};
use crate::fs::RealFileSystem;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (+ CLI overrides)
/// - dataset and population discovery
/// - graph construction and validation
/// - dry-run / DOT output
/// - submission to the local dispatch engine and monitoring
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_config(&args)?;
    let fs = RealFileSystem;

    let datasets = load_datasets(&fs, &cfg.workflow.datafile)?;
    let populations = discover_populations(&fs, &cfg.populations_dir())?;

    let graph = JobGraphBuilder::new(cfg.workflow.shards_per_chromosome)
        .with_columns(cfg.workflow.columns.clone())
        .with_clustering(cfg.workflow.clustering)
        .build(&datasets, &populations)?;

    if let Some(dot_path) = &args.dot {
        std::fs::write(dot_path, graph.to_dot())
            .with_context(|| format!("writing DOT graph to {:?}", dot_path))?;
        info!(path = ?dot_path, "wrote job graph in DOT format");
    }

    if args.dry_run {
        print_dry_run(&cfg, &graph);
        return Ok(());
    }

    let run_name = args.dir_name.clone().unwrap_or_else(|| run_id(&cfg));
    let run_dir = cfg.workflow.src_path.join(&run_name);

    if !args.submit {
        info!(
            run_dir = ?run_dir,
            jobs = graph.len(),
            "workflow planned; pass --submit to execute it"
        );
        println!("Workflow planned: {}", graph.summary());
        println!("  fingerprint = {}", graph.fingerprint());
        println!(
            "  pass --submit to run it in {}",
            run_dir.display()
        );
        return Ok(());
    }

    if cfg.workflow.exec_site != "local" {
        warn!(
            site = %cfg.workflow.exec_site,
            "only local execution is available; running on this machine"
        );
    }

    let engine = LocalEngine::new(LocalEngineOptions {
        scratch_dir: run_dir.join("scratch"),
        output_dir: run_dir.join("output"),
        max_parallel: cfg.driver.max_parallel,
    });
    let driver = ExecutionDriver::new(
        engine,
        ReplicaLayout::from_config(&cfg),
        DriverOptions::from(&cfg.driver),
    );

    let report = driver.run(&graph).await?;
    print!("{report}");
    Ok(())
}

/// Load the config file (if any) and layer CLI flags on top.
pub fn load_config(args: &CliArgs) -> crate::errors::Result<ConfigFile> {
    let (path, explicit): (PathBuf, bool) = match &args.config {
        Some(p) => (p.clone(), true),
        None => (default_config_path(), false),
    };
    let mut raw = load_or_default(&path, explicit)?;
    raw.apply_cli(args);
    ConfigFile::try_from(raw)
}

/// `<name>-<unix seconds>`, unique per invocation.
fn run_id(cfg: &ConfigFile) -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("{}-{}", cfg.workflow.name, secs)
}

/// Dry-run output: configuration, job counts, external files and jobs.
fn print_dry_run(cfg: &ConfigFile, graph: &JobGraph) {
    println!("genomedag dry-run");
    println!("  workflow.dataset = {}", cfg.workflow.dataset);
    println!(
        "  workflow.shards_per_chromosome = {}",
        cfg.workflow.shards_per_chromosome
    );
    println!("  workflow.clustering = {}", cfg.workflow.clustering);
    println!("  fingerprint = {}", graph.fingerprint());
    println!();

    println!("jobs ({}):", graph.len());
    for kind in JobKind::ALL {
        println!("  {kind}: {}", graph.count_of(kind));
    }
    println!();

    let externals: Vec<_> = graph.artifacts().externals().collect();
    println!("external files ({}):", externals.len());
    for (_, artifact, kind) in externals {
        println!("  - {} ({kind})", artifact.name);
    }
    println!();

    for job in graph.jobs() {
        println!("  - {}", job.name);
        println!("      args: {}", job.args.join(" "));
        let inputs: Vec<&str> = job.inputs.iter().map(|a| graph.artifacts().name(*a)).collect();
        println!("      inputs: {:?}", inputs);
        if job.stage_out {
            println!("      stage_out: true");
        }
        if let Some(label) = &job.cluster_label {
            println!("      label: {label}");
        }
    }

    debug!("dry-run complete (no execution)");
}
