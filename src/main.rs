use anyhow::bail;
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;

mod addr;
mod baseline;
mod config;
mod diagnostics;
mod diff;
mod extract;
mod govern;
mod key;
mod load;
mod pipeline;
mod repair;
mod resolve;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "partial-spec-gen")]
#[command(about = "Changed-only API spec generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the changed-only spec from a diff report and the
    /// before/after specs (paths default to the pipeline layout).
    Generate {
        /// Baseline spec defining the legacy operation surface.
        #[arg(long)]
        baseline: Option<PathBuf>,

        /// "Before" spec (main).
        #[arg(long)]
        source: Option<PathBuf>,

        /// "After" spec (head); required input.
        #[arg(long)]
        dest: Option<PathBuf>,

        /// Diff report produced by the external diff tool.
        #[arg(long)]
        diff: Option<PathBuf>,

        #[arg(long)]
        out_json: Option<PathBuf>,

        #[arg(long)]
        out_yaml: Option<PathBuf>,

        /// Write x-removed tombstones instead of skipping removed operations.
        #[arg(long)]
        mark_removed: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Generate {
            baseline,
            source,
            dest,
            diff,
            out_json,
            out_yaml,
            mark_removed,
        } => {
            let cfg = config::RunConfig::resolve(config::Overrides {
                baseline,
                source,
                dest,
                diff,
                out_json,
                out_yaml,
                mark_removed,
            });
            run(&cfg)
        }
    }
}

fn run(cfg: &config::RunConfig) -> Result<()> {
    diagnostics::info(format!("Baseline: {}", cfg.baseline_path.display()));
    diagnostics::info(format!("Head spec: {}", cfg.dest_path.display()));

    // 1) Read the diff artifact (optimistic: absence and noise are
    //    recoverable; deep-compare still runs without it).
    let diff_input = diff::load_diff_file(&cfg.diff_path);

    // 2) Load documents. Only the destination spec is load-bearing.
    let legacy =
        baseline::LegacySet::from_baseline(load::load_spec_file(&cfg.baseline_path).as_ref());
    diagnostics::info(format!(
        "Loaded {} legacy operations from baseline.",
        legacy.len()
    ));

    let Some(dest) = load::load_spec_file(&cfg.dest_path) else {
        bail!(
            "{}",
            diagnostics::error_message(format!(
                "could not load head spec {}",
                cfg.dest_path.display()
            ))
        );
    };
    let source = load::load_spec_file(&cfg.source_path).unwrap_or_else(|| json!({}));

    // 3) Detect changes and build the output document. The diff tool's
    //    plain-text "no changes" sentinel short-circuits to the empty
    //    skeleton.
    let out = match diff_input {
        diff::DiffInput::NoChanges => {
            diagnostics::info("Diff report says no changes; writing an empty spec.");
            govern::new_output_doc()
        }
        diff::DiffInput::Absent => {
            pipeline::generate(&[], &legacy, &source, &dest, cfg.mark_removed)?
        }
        diff::DiffInput::Items(items) => {
            pipeline::generate(&items, &legacy, &source, &dest, cfg.mark_removed)?
        }
    };

    // 4) Write both renditions.
    load::write_outputs(&out, &cfg.out_json, &cfg.out_yaml)?;
    diagnostics::info(format!(
        "Wrote {} and {}",
        cfg.out_json.display(),
        cfg.out_yaml.display()
    ));

    Ok(())
}
