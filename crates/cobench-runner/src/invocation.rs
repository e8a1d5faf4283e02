//! Resolving (family, instance) pairs into executable solver commands.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::config::HarnessConfig;
use crate::error::HarnessError;
use crate::registry::{InstanceRef, ProblemFamily};

/// A fully resolved solver command. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub binary_path: PathBuf,
    pub arguments: Vec<String>,
    /// Where the solver must write its JSON result. The harness never reads
    /// it back.
    pub output_path: PathBuf,
}

impl Invocation {
    /// Resolves `instance` of `family` against `config`.
    ///
    /// Creates the missing output directories as a side effect (idempotent).
    /// The input file itself is not checked; a missing input surfaces
    /// through the solver's exit code.
    pub fn build(
        family: &ProblemFamily,
        instance: &InstanceRef,
        config: &HarnessConfig,
    ) -> Result<Self, HarnessError> {
        ensure_relative(instance.relative_path)?;

        let data_root = config.data_root(family.data_root_var).ok_or_else(|| {
            HarnessError::MissingDataRoot {
                family: family.name.to_string(),
                var: family.data_root_var.to_string(),
            }
        })?;
        let input_path = data_root.join(instance.relative_path);
        let output_path = config
            .output_root
            .join(family.name)
            .join(format!("{}.json", instance.relative_path));
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut arguments = vec!["--verbosity-level".to_string(), "1".to_string()];
        arguments.push("--input".to_string());
        arguments.push(input_path.to_string_lossy().into_owned());
        if !instance.format.is_empty() {
            arguments.push("--format".to_string());
            arguments.push(instance.format.to_string());
        }
        arguments.extend(family.algorithm_flags.iter().map(|flag| flag.to_string()));
        arguments.push("--output".to_string());
        arguments.push(output_path.to_string_lossy().into_owned());

        Ok(Self {
            binary_path: config.solver_dir.join(family.solver_binary),
            arguments,
            output_path,
        })
    }

    /// The command as echoed before execution, shell-quoted.
    pub fn command_line(&self) -> String {
        let mut parts = vec![self.binary_path.to_string_lossy().into_owned()];
        parts.extend(self.arguments.iter().cloned());
        shell_join(&parts)
    }
}

fn ensure_relative(relative_path: &str) -> Result<(), HarnessError> {
    let path = Path::new(relative_path);
    let traversal_free = path.components().all(|c| matches!(c, Component::Normal(_)));
    if relative_path.is_empty() || path.is_absolute() || !traversal_free {
        return Err(HarnessError::InvalidInstancePath(relative_path.to_string()));
    }
    Ok(())
}

fn shell_join(parts: &[String]) -> String {
    parts
        .iter()
        .map(|p| shell_quote(p))
        .collect::<Vec<_>>()
        .join(" ")
}

fn shell_quote(s: &str) -> String {
    if s.is_empty() {
        "''".to_string()
    } else if s
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "-_./:".contains(c))
    {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', "'\"'\"'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::InstanceRef;
    use std::process;

    const SYNTHETIC: ProblemFamily = ProblemFamily {
        name: "synthetic",
        title: "Synthetic family",
        solver_binary: "synthetic_main",
        data_root_var: "SYNTHETIC_DATA",
        algorithm_flags: &["--algorithm", "greedy", "--internal-diving", "1"],
        instances: &[],
    };

    fn temp_root(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "cobench_{}_{}_{}",
            tag,
            process::id(),
            chrono::Utc::now().timestamp_micros()
        ));
        fs::create_dir_all(&dir).expect("temp dir");
        dir
    }

    fn config(output_root: &Path) -> HarnessConfig {
        HarnessConfig::new(output_root, "/opt/solvers").with_data_root("SYNTHETIC_DATA", "/data/synthetic")
    }

    #[test]
    fn arguments_follow_the_fixed_layout() {
        let root = temp_root("layout");
        let instance = InstanceRef {
            relative_path: "set/i1.txt",
            format: "default",
        };
        let invocation = Invocation::build(&SYNTHETIC, &instance, &config(&root)).unwrap();
        assert_eq!(invocation.binary_path, PathBuf::from("/opt/solvers/synthetic_main"));
        let expected_output = root
            .join("synthetic/set/i1.txt.json")
            .to_string_lossy()
            .into_owned();
        assert_eq!(
            invocation.arguments,
            [
                "--verbosity-level",
                "1",
                "--input",
                "/data/synthetic/set/i1.txt",
                "--format",
                "default",
                "--algorithm",
                "greedy",
                "--internal-diving",
                "1",
                "--output",
                expected_output.as_str(),
            ]
        );
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn build_is_deterministic_for_every_registered_family() {
        use crate::registry::FAMILIES;

        let root = temp_root("registered");
        let mut config = HarnessConfig::new(&root, "/opt/solvers");
        for family in FAMILIES {
            config = config.with_data_root(family.data_root_var, format!("/data/{}", family.name));
        }
        for family in FAMILIES {
            for instance in family.instances {
                let first = Invocation::build(family, instance, &config).unwrap();
                let second = Invocation::build(family, instance, &config).unwrap();
                assert_eq!(first, second, "{}/{}", family.name, instance.relative_path);
                assert!(first.output_path.starts_with(root.join(family.name)));
            }
        }
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn build_is_deterministic() {
        let root = temp_root("determinism");
        let instance = InstanceRef {
            relative_path: "set/i1.txt",
            format: "default",
        };
        let first = Invocation::build(&SYNTHETIC, &instance, &config(&root)).unwrap();
        let second = Invocation::build(&SYNTHETIC, &instance, &config(&root)).unwrap();
        assert_eq!(first, second);
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn empty_format_tag_omits_the_flag_entirely() {
        let root = temp_root("format");
        let instance = InstanceRef {
            relative_path: "set/i2.txt",
            format: "",
        };
        let invocation = Invocation::build(&SYNTHETIC, &instance, &config(&root)).unwrap();
        assert!(!invocation.arguments.iter().any(|a| a == "--format"));
        assert!(!invocation.arguments.iter().any(String::is_empty));
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn output_path_stays_under_the_family_directory() {
        let root = temp_root("containment");
        let instance = InstanceRef {
            relative_path: "deep/nested/case.txt",
            format: "",
        };
        let invocation = Invocation::build(&SYNTHETIC, &instance, &config(&root)).unwrap();
        assert!(invocation.output_path.starts_with(root.join("synthetic")));
        assert!(invocation.output_path.parent().unwrap().is_dir());
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn traversal_segments_are_rejected() {
        let root = temp_root("traversal");
        for bad in ["../../etc/passwd", "/etc/passwd", ""] {
            let instance = InstanceRef {
                relative_path: bad,
                format: "",
            };
            let err = Invocation::build(&SYNTHETIC, &instance, &config(&root)).unwrap_err();
            assert!(matches!(err, HarnessError::InvalidInstancePath(_)), "{bad}");
        }
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn missing_data_root_aborts_the_build() {
        let root = temp_root("missing_root");
        let bare = HarnessConfig::new(&root, "/opt/solvers");
        let instance = InstanceRef {
            relative_path: "set/i1.txt",
            format: "",
        };
        let err = Invocation::build(&SYNTHETIC, &instance, &bare).unwrap_err();
        match err {
            HarnessError::MissingDataRoot { family, var } => {
                assert_eq!(family, "synthetic");
                assert_eq!(var, "SYNTHETIC_DATA");
            }
            other => panic!("unexpected error: {other}"),
        }
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn output_directory_creation_is_idempotent() {
        let root = temp_root("idempotent");
        let instance = InstanceRef {
            relative_path: "set/i1.txt",
            format: "",
        };
        Invocation::build(&SYNTHETIC, &instance, &config(&root)).unwrap();
        Invocation::build(&SYNTHETIC, &instance, &config(&root)).unwrap();
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn command_line_quotes_arguments_with_spaces() {
        assert_eq!(shell_quote("plain-arg_1.txt"), "plain-arg_1.txt");
        assert_eq!(shell_quote("with space"), "'with space'");
        assert_eq!(shell_quote(""), "''");
        let invocation = Invocation {
            binary_path: PathBuf::from("/opt/solvers/synthetic_main"),
            arguments: vec!["--input".to_string(), "/da ta/i1.txt".to_string()],
            output_path: PathBuf::new(),
        };
        assert_eq!(
            invocation.command_line(),
            "/opt/solvers/synthetic_main --input '/da ta/i1.txt'"
        );
    }
}
