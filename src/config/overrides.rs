// src/config/overrides.rs

use crate::cli::CliArgs;
use crate::config::model::RawConfigFile;
use crate::types::ClusteringMode;

impl RawConfigFile {
    /// Apply command-line flags on top of file values.
    ///
    /// Boolean toggles only ever switch a feature on.
    pub fn apply_cli(&mut self, args: &CliArgs) {
        let wf = &mut self.workflow;

        if let Some(dataset) = &args.dataset {
            wf.dataset = dataset.clone();
        }
        if let Some(datafile) = &args.datafile {
            wf.datafile = datafile.clone();
        }
        if let Some(shards) = args.shards {
            wf.shards_per_chromosome = shards;
        }
        if let Some(site) = &args.exec_site {
            wf.exec_site = site.clone();
        }
        if let Some(src) = &args.src_path {
            wf.src_path = src.clone();
        }
        if let Some(dir) = &args.populations_dir {
            wf.populations_dir = Some(dir.clone());
        }
        if args.use_bash {
            wf.use_bash = true;
        }
        if args.decaf {
            wf.clustering = ClusteringMode::Decaf;
        } else if args.pmc {
            wf.clustering = ClusteringMode::Pmc;
        }

        if let Some(secs) = args.wait_timeout {
            self.driver.wait_timeout_secs = secs;
        }
        if let Some(n) = args.max_parallel {
            self.driver.max_parallel = n;
        }
    }
}
