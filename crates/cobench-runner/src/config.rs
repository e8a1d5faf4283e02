use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;

/// Solver executables live here unless the caller says otherwise, matching
/// the build layout of the solver repository this harness gates.
pub const DEFAULT_SOLVER_DIR: &str = "bazel-bin/examples";

/// Everything the benchmark flow needs from its surroundings. Data roots can
/// be supplied directly or resolved from the process environment.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Root directory for per-instance JSON artifacts.
    pub output_root: PathBuf,
    /// Directory holding the solver executables.
    pub solver_dir: PathBuf,
    /// Data-root overrides keyed by environment-variable name. Names absent
    /// here fall back to the process environment.
    pub data_roots: BTreeMap<String, PathBuf>,
}

impl HarnessConfig {
    pub fn new(output_root: impl Into<PathBuf>, solver_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
            solver_dir: solver_dir.into(),
            data_roots: BTreeMap::new(),
        }
    }

    pub fn with_data_root(mut self, var: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        self.data_roots.insert(var.into(), root.into());
        self
    }

    /// Resolves the dataset root named by `var`. An empty value counts as
    /// unset.
    pub fn data_root(&self, var: &str) -> Option<PathBuf> {
        if let Some(root) = self.data_roots.get(var) {
            return Some(root.clone());
        }
        match env::var(var) {
            Ok(value) if !value.is_empty() => Some(PathBuf::from(value)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_wins_over_environment() {
        let config = HarnessConfig::new("out", "bin").with_data_root("PATH", "/synthetic/root");
        assert_eq!(config.data_root("PATH"), Some(PathBuf::from("/synthetic/root")));
    }

    #[test]
    fn unset_variable_resolves_to_none() {
        let config = HarnessConfig::new("out", "bin");
        assert_eq!(config.data_root("COBENCH_SURELY_UNSET_DATA"), None);
    }
}
