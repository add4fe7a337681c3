//! Run configuration, resolved once at the entry point and threaded by
//! parameter into every stage. No other module reads the environment.

use std::env;
use std::path::{Path, PathBuf};

/// Everything a run needs.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Spec defining the legacy operation surface.
    pub baseline_path: PathBuf,
    /// "Before" spec (main).
    pub source_path: PathBuf,
    /// "After" spec (head). The one input whose absence is fatal.
    pub dest_path: PathBuf,
    /// Structural diff report from the external diff tool.
    pub diff_path: PathBuf,
    pub out_json: PathBuf,
    pub out_yaml: PathBuf,
    /// Write `x-removed` tombstones instead of silently skipping removed
    /// operations.
    pub mark_removed: bool,
}

/// CLI-provided overrides; `None` falls back to the pipeline layout.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub baseline: Option<PathBuf>,
    pub source: Option<PathBuf>,
    pub dest: Option<PathBuf>,
    pub diff: Option<PathBuf>,
    pub out_json: Option<PathBuf>,
    pub out_yaml: Option<PathBuf>,
    pub mark_removed: bool,
}

impl RunConfig {
    /// Resolution order: explicit override, else the pipeline directories
    /// (`PIPELINE_WORKSPACE` for the baseline, `ARTIFACT_DIR` for the diff,
    /// the specs, and the outputs), else the current directory. Source and
    /// destination specs are probed as `.yaml` first, `.json` second.
    pub fn resolve(overrides: Overrides) -> RunConfig {
        let workspace = env_dir("PIPELINE_WORKSPACE");
        let artifacts = env_dir("ARTIFACT_DIR");

        RunConfig {
            baseline_path: overrides
                .baseline
                .unwrap_or_else(|| workspace.join("swagger_baseline.json")),
            source_path: overrides
                .source
                .unwrap_or_else(|| existing_spec_path(&artifacts, "swagger_main")),
            dest_path: overrides
                .dest
                .unwrap_or_else(|| existing_spec_path(&artifacts, "swagger_head")),
            diff_path: overrides
                .diff
                .unwrap_or_else(|| artifacts.join("diff.json")),
            out_json: overrides
                .out_json
                .unwrap_or_else(|| artifacts.join("partial_spec.json")),
            out_yaml: overrides
                .out_yaml
                .unwrap_or_else(|| artifacts.join("partial_spec.yaml")),
            mark_removed: overrides.mark_removed,
        }
    }
}

fn env_dir(var: &str) -> PathBuf {
    env::var_os(var)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Probe `<stem>.yaml` then `<stem>.json`; default to the JSON name when
/// neither exists so the loader can report the miss.
fn existing_spec_path(dir: &Path, stem: &str) -> PathBuf {
    let yaml = dir.join(format!("{stem}.yaml"));
    if yaml.exists() {
        return yaml;
    }
    let json = dir.join(format!("{stem}.json"));
    if json.exists() {
        return json;
    }
    json
}
