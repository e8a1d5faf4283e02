//! Static registry of benchmark problem families.
//!
//! One declarative table drives the whole benchmark flow: each family pins a
//! solver binary, a dataset root variable, a fixed algorithm configuration
//! and an ordered instance list. The table is read-only for the process
//! lifetime.

use crate::error::HarnessError;

/// A single benchmark case: an input file under the family's dataset root
/// plus the solver input-format selector (empty means the solver default).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstanceRef {
    /// Path below the dataset root. Relative, `/`-separated, no traversal.
    pub relative_path: &'static str,
    pub format: &'static str,
}

/// A named group of benchmark instances sharing one solver binary and one
/// fixed algorithm configuration.
#[derive(Debug, Clone, Copy)]
pub struct ProblemFamily {
    /// Stable slug, unique across the registry.
    pub name: &'static str,
    /// Section header printed before the family's instances.
    pub title: &'static str,
    /// Executable file name below the solver directory.
    pub solver_binary: &'static str,
    /// Environment variable holding the dataset root path.
    pub data_root_var: &'static str,
    /// Fixed options appended to every invocation of this family, in order.
    pub algorithm_flags: &'static [&'static str],
    pub instances: &'static [InstanceRef],
}

const fn inst(relative_path: &'static str, format: &'static str) -> InstanceRef {
    InstanceRef {
        relative_path,
        format,
    }
}

/// Every registered problem family, in execution order.
pub const FAMILIES: &[ProblemFamily] = &[
    ProblemFamily {
        name: "bin-packing-with-conflicts",
        title: "Bin packing problem with conflicts",
        solver_binary: "bin_packing_with_conflicts_main",
        data_root_var: "BIN_PACKING_WITH_CONFLICTS_DATA",
        algorithm_flags: &["--algorithm", "greedy", "--internal-diving", "1"],
        instances: &[
            inst("muritiba2010/BPPC_1_0_1.txt", "default"),
            inst("muritiba2010/BPPC_1_1_2.txt", "default"),
            inst("muritiba2010/BPPC_1_2_3.txt", "default"),
            inst("muritiba2010/BPPC_1_3_4.txt", "default"),
            inst("muritiba2010/BPPC_1_4_5.txt", "default"),
            inst("muritiba2010/BPPC_1_5_6.txt", "default"),
            inst("muritiba2010/BPPC_1_6_7.txt", "default"),
            inst("muritiba2010/BPPC_1_7_8.txt", "default"),
            inst("muritiba2010/BPPC_1_8_9.txt", "default"),
            inst("muritiba2010/BPPC_1_9_10.txt", "default"),
        ],
    },
    ProblemFamily {
        name: "capacitated-vehicle-routing",
        title: "Capacitated vehicle routing problem",
        solver_binary: "capacitated_vehicle_routing_main",
        data_root_var: "CAPACITATED_VEHICLE_ROUTING_DATA",
        algorithm_flags: &[
            "--algorithm",
            "limited-discrepancy-search",
            "--automatic-stop",
            "1",
        ],
        instances: &[
            inst("uchoa2014/X/X-n101-k25.vrp", "cvrplib"),
            inst("uchoa2014/X/X-n106-k14.vrp", "cvrplib"),
            inst("uchoa2014/X/X-n110-k13.vrp", "cvrplib"),
            inst("uchoa2014/X/X-n115-k10.vrp", "cvrplib"),
            inst("uchoa2014/X/X-n120-k6.vrp", "cvrplib"),
            inst("uchoa2014/X/X-n125-k30.vrp", "cvrplib"),
            inst("uchoa2014/X/X-n129-k18.vrp", "cvrplib"),
            inst("uchoa2014/X/X-n134-k13.vrp", "cvrplib"),
            inst("uchoa2014/X/X-n139-k10.vrp", "cvrplib"),
            inst("uchoa2014/X/X-n143-k7.vrp", "cvrplib"),
        ],
    },
    ProblemFamily {
        name: "cutting-stock",
        title: "Cutting stock problem",
        solver_binary: "cutting_stock_main",
        data_root_var: "CUTTING_STOCK_DATA",
        algorithm_flags: &["--algorithm", "greedy", "--internal-diving", "1"],
        instances: &[
            inst("delorme2016/RG_CSP/BPP_50_50_0.1_0.7_0.txt", "bpplib_csp"),
            inst("delorme2016/RG_CSP/BPP_50_50_0.1_0.8_1.txt", "bpplib_csp"),
            inst("delorme2016/RG_CSP/BPP_50_50_0.2_0.7_2.txt", "bpplib_csp"),
            inst("delorme2016/RG_CSP/BPP_50_50_0.2_0.8_3.txt", "bpplib_csp"),
            inst("delorme2016/RG_CSP/BPP_50_75_0.1_0.7_4.txt", "bpplib_csp"),
            inst("delorme2016/RG_CSP/BPP_50_75_0.1_0.8_5.txt", "bpplib_csp"),
            inst("delorme2016/RG_CSP/BPP_50_75_0.2_0.7_6.txt", "bpplib_csp"),
            inst("delorme2016/RG_CSP/BPP_50_75_0.2_0.8_7.txt", "bpplib_csp"),
            inst("delorme2016/RG_CSP/BPP_50_100_0.1_0.7_8.txt", "bpplib_csp"),
            inst("delorme2016/RG_CSP/BPP_50_100_0.1_0.8_9.txt", "bpplib_csp"),
            inst("delorme2016/RG_CSP/BPP_50_100_0.2_0.7_0.txt", "bpplib_csp"),
            inst("delorme2016/RG_CSP/BPP_50_100_0.2_0.8_1.txt", "bpplib_csp"),
        ],
    },
    ProblemFamily {
        name: "multiple-knapsack",
        title: "Multiple knapsack problem",
        solver_binary: "multiple_knapsack_main",
        data_root_var: "MULTIPLE_KNAPSACK_DATA",
        algorithm_flags: &["--algorithm", "greedy", "--internal-diving", "1"],
        instances: &[
            inst("fukunaga2011/FK_1/random10_60_1_1000_1_1.txt", ""),
            inst("fukunaga2011/FK_1/random10_60_2_1000_1_2.txt", ""),
            inst("fukunaga2011/FK_1/random10_100_3_1000_1_3.txt", ""),
            inst("fukunaga2011/FK_1/random10_100_4_1000_1_4.txt", ""),
            inst("fukunaga2011/FK_1/random12_48_1_1000_1_5.txt", ""),
            inst("fukunaga2011/FK_1/random12_48_2_1000_1_6.txt", ""),
            inst("fukunaga2011/FK_1/random15_45_3_1000_1_7.txt", ""),
            inst("fukunaga2011/FK_1/random15_45_4_1000_1_8.txt", ""),
            inst("fukunaga2011/FK_1/random15_75_1_1000_1_9.txt", ""),
            inst("fukunaga2011/FK_1/random15_75_2_1000_1_10.txt", ""),
            inst("fukunaga2011/FK_1/random30_60_3_1000_1_11.txt", ""),
            inst("fukunaga2011/FK_1/random30_60_4_1000_1_12.txt", ""),
        ],
    },
    ProblemFamily {
        name: "vehicle-routing-with-time-windows",
        title: "Vehicle routing problem with time-windows",
        solver_binary: "vehicle_routing_with_time_windows_main",
        data_root_var: "VEHICLE_ROUTING_WITH_TIME_WINDOWS_DATA",
        algorithm_flags: &[
            "--algorithm",
            "limited-discrepancy-search",
            "--automatic-stop",
            "1",
            "--internal-diving",
            "1",
        ],
        instances: &[
            inst("solomon1987/C101.txt", ""),
            inst("solomon1987/C102.txt", ""),
            inst("solomon1987/C103.txt", ""),
            inst("solomon1987/R101.txt", ""),
            inst("solomon1987/R102.txt", ""),
            inst("solomon1987/R103.txt", ""),
            inst("solomon1987/RC101.txt", ""),
            inst("solomon1987/RC102.txt", ""),
            inst("solomon1987/RC103.txt", ""),
        ],
    },
];

/// Lookup over a fixed family table. Pure, no I/O, read-only after
/// construction.
#[derive(Debug, Clone, Copy)]
pub struct Registry {
    families: &'static [ProblemFamily],
}

impl Registry {
    /// The built-in table above.
    pub fn builtin() -> Self {
        Self { families: FAMILIES }
    }

    /// A registry over a caller-supplied table, for tests.
    pub fn with_families(families: &'static [ProblemFamily]) -> Self {
        Self { families }
    }

    /// All families in declaration order.
    pub fn families(&self) -> &'static [ProblemFamily] {
        self.families
    }

    /// Looks up one family by slug. An unknown name is a configuration
    /// error, reported before any process is spawned.
    pub fn get(&self, name: &str) -> Result<&'static ProblemFamily, HarnessError> {
        self.families
            .iter()
            .find(|family| family.name == name)
            .ok_or_else(|| HarnessError::UnknownFamily(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::path::{Component, Path};

    #[test]
    fn family_names_are_unique() {
        let names: BTreeSet<_> = FAMILIES.iter().map(|f| f.name).collect();
        assert_eq!(names.len(), FAMILIES.len());
    }

    #[test]
    fn every_family_has_instances() {
        for family in FAMILIES {
            assert!(!family.instances.is_empty(), "{} is empty", family.name);
        }
    }

    #[test]
    fn data_root_vars_follow_naming_convention() {
        for family in FAMILIES {
            let expected = format!("{}_DATA", family.name.to_uppercase().replace('-', "_"));
            assert_eq!(family.data_root_var, expected);
        }
    }

    #[test]
    fn instance_paths_are_relative_and_traversal_free() {
        for family in FAMILIES {
            for instance in family.instances {
                let path = Path::new(instance.relative_path);
                assert!(!path.is_absolute(), "{}", instance.relative_path);
                assert!(
                    path.components().all(|c| matches!(c, Component::Normal(_))),
                    "{}",
                    instance.relative_path
                );
            }
        }
    }

    #[test]
    fn lookup_finds_registered_families_in_order() {
        let registry = Registry::builtin();
        let names: Vec<_> = registry.families().iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            [
                "bin-packing-with-conflicts",
                "capacitated-vehicle-routing",
                "cutting-stock",
                "multiple-knapsack",
                "vehicle-routing-with-time-windows",
            ]
        );
        assert_eq!(registry.get("cutting-stock").unwrap().solver_binary, "cutting_stock_main");
    }

    #[test]
    fn unknown_family_is_a_configuration_error() {
        let err = Registry::builtin().get("graph-coloring").unwrap_err();
        assert!(matches!(err, HarnessError::UnknownFamily(name) if name == "graph-coloring"));
    }
}
