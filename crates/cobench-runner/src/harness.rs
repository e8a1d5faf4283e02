//! Benchmark orchestration: family selection, invocation, fail-fast gating.

use serde::Serialize;
use tracing::debug;

use crate::config::HarnessConfig;
use crate::error::HarnessError;
use crate::invocation::Invocation;
use crate::process::{ProcessRunner, RunOutcome, SystemRunner};
use crate::registry::{ProblemFamily, Registry};

/// Tally of a fully successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub families: usize,
    pub instances: usize,
}

/// Folds run outcomes in arrival order. The first non-passing outcome fails
/// the whole run; remaining instances and families are never attempted.
#[derive(Debug, Default)]
struct Aggregator {
    families: usize,
    instances: usize,
}

impl Aggregator {
    fn record(&mut self, outcome: RunOutcome) -> Result<(), HarnessError> {
        if !outcome.passed() {
            return Err(HarnessError::SolverFailure {
                family: outcome.family.to_string(),
                status: outcome.status_label(),
                instance: outcome.instance,
            });
        }
        self.instances += 1;
        Ok(())
    }

    fn family_done(&mut self) {
        self.families += 1;
    }

    fn into_report(self) -> RunReport {
        RunReport {
            families: self.families,
            instances: self.instances,
        }
    }
}

/// Drives the benchmark flow over a registry and a process runner.
pub struct Harness<R = SystemRunner> {
    config: HarnessConfig,
    registry: Registry,
    runner: R,
}

impl Harness<SystemRunner> {
    pub fn new(config: HarnessConfig) -> Self {
        Self::with_runner(config, Registry::builtin(), SystemRunner)
    }
}

impl<R: ProcessRunner> Harness<R> {
    pub fn with_runner(config: HarnessConfig, registry: Registry, runner: R) -> Self {
        Self {
            config,
            registry,
            runner,
        }
    }

    /// Runs the selected families, or every registered family when the
    /// selection is empty. Families and instances execute in declaration
    /// order; the first failure aborts the whole run.
    pub fn run(&self, selection: &[String]) -> Result<RunReport, HarnessError> {
        let families = self.select(selection)?;
        let mut aggregator = Aggregator::default();
        for family in families {
            self.run_family(family, &mut aggregator)?;
        }
        Ok(aggregator.into_report())
    }

    /// Resolves every requested name up front, so an unknown family is
    /// reported before anything is spawned. Execution keeps declaration
    /// order regardless of the order the names were given in.
    fn select(&self, selection: &[String]) -> Result<Vec<&'static ProblemFamily>, HarnessError> {
        if selection.is_empty() {
            return Ok(self.registry.families().iter().collect());
        }
        for name in selection {
            self.registry.get(name)?;
        }
        Ok(self
            .registry
            .families()
            .iter()
            .filter(|family| selection.iter().any(|name| name == family.name))
            .collect())
    }

    fn run_family(
        &self,
        family: &'static ProblemFamily,
        aggregator: &mut Aggregator,
    ) -> Result<(), HarnessError> {
        println!("{}", family.title);
        println!("{}", "-".repeat(family.title.len()));
        println!();
        for instance in family.instances {
            let invocation = Invocation::build(family, instance, &self.config)?;
            println!("{}", invocation.command_line());
            let exit_code = self
                .runner
                .run(&invocation)
                .map_err(|source| HarnessError::Spawn {
                    binary: invocation.binary_path.to_string_lossy().into_owned(),
                    source,
                })?;
            debug!(
                family = family.name,
                instance = instance.relative_path,
                ?exit_code,
                "solver finished"
            );
            aggregator.record(RunOutcome {
                family: family.name,
                instance: instance.relative_path.to_string(),
                exit_code,
            })?;
            println!();
        }
        println!();
        println!();
        aggregator.family_done();
        Ok(())
    }
}
