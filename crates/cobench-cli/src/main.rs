use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use cobench_runner::{
    acquire_datasets, FetchConfig, Harness, HarnessConfig, Registry, DEFAULT_SOLVER_DIR,
};

#[derive(Parser)]
#[command(
    name = "cobench",
    version,
    about = "Benchmark gate for the combinatorial-optimization solver examples"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run benchmark instances and gate on the solver exit codes
    Run {
        /// Directory receiving the per-instance JSON artifacts
        output_root: PathBuf,
        /// Problem families to run (default: all registered families)
        #[arg(short = 't', long = "family")]
        families: Vec<String>,
        /// Directory holding the solver executables
        #[arg(long, default_value = DEFAULT_SOLVER_DIR)]
        solver_dir: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Download and expand the reference dataset archives
    Fetch {
        /// Directory receiving the transient archive and the data tree
        #[arg(long, default_value = ".")]
        dir: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// List the registered problem families
    Families {
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    match Cli::parse().command {
        Commands::Run {
            output_root,
            families,
            solver_dir,
            json,
        } => {
            let config = HarnessConfig::new(output_root, solver_dir);
            let report = Harness::new(config).run(&families)?;
            if json {
                emit_json(&json!({
                    "ok": true,
                    "command": "run",
                    "run": serde_json::to_value(&report)?,
                }));
            }
        }
        Commands::Fetch { dir, json } => {
            let report = acquire_datasets(&FetchConfig { work_dir: dir })?;
            if json {
                emit_json(&json!({
                    "ok": true,
                    "command": "fetch",
                    "fetch": serde_json::to_value(&report)?,
                }));
            }
        }
        Commands::Families { json } => {
            let registry = Registry::builtin();
            if json {
                let families: Vec<_> = registry
                    .families()
                    .iter()
                    .map(|family| {
                        json!({
                            "name": family.name,
                            "solver": family.solver_binary,
                            "data_root_var": family.data_root_var,
                            "instances": family.instances.len(),
                        })
                    })
                    .collect();
                emit_json(&json!({
                    "ok": true,
                    "command": "families",
                    "families": families,
                }));
            } else {
                for family in registry.families() {
                    println!("{}  ({} instances)", family.name, family.instances.len());
                }
            }
        }
    }
    Ok(())
}

fn emit_json(value: &serde_json::Value) {
    match serde_json::to_string(value) {
        Ok(s) => println!("{}", s),
        Err(_) => println!(
            "{{\"ok\":false,\"error\":{{\"code\":\"serialization_error\",\"message\":\"failed to serialize JSON payload\"}}}}"
        ),
    }
}
