//! End-to-end run: generate, register and persist in one transaction, analyze,
//! then export and report.

use crate::analyzer::{analyze, Analysis};
use crate::config::PipelineConfig;
use crate::errors::Result;
use crate::model::ResultFilter;
use crate::storage::Store;
use crate::{export, report, sequence};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub candidate_name: String,
    pub count: i64,
    pub prune_threshold: Option<u64>,
    pub top_n: u32,
    pub export_path: Option<PathBuf>,
    pub report_path: Option<PathBuf>,
}

impl RunOptions {
    pub fn from_config(candidate_name: impl Into<String>, cfg: &PipelineConfig) -> Self {
        Self {
            candidate_name: candidate_name.into(),
            count: cfg.count,
            prune_threshold: cfg.prune_threshold,
            top_n: cfg.top_n,
            export_path: cfg.export_path.clone(),
            report_path: cfg.report_path.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub analysis: Analysis,
    pub saved: usize,
    pub pruned: usize,
    pub export_path: Option<PathBuf>,
    pub report_path: Option<PathBuf>,
}

pub fn run(store: &mut Store, opts: &RunOptions) -> Result<RunOutcome> {
    // Generate first so a bad count fails before anything is written.
    let seq = sequence::generate(opts.count)?;
    tracing::info!(count = seq.len(), "sequence generated");

    let (candidate, saved) = store.register_with_results(&opts.candidate_name, &seq)?;

    let pruned = match opts.prune_threshold {
        Some(threshold) => store.prune_above(threshold)?,
        None => 0,
    };

    let analysis = analyze(store, candidate.id, opts.top_n)?;

    if let Some(path) = &opts.export_path {
        let rows = store.list(&ResultFilter::all().candidate(candidate.id))?;
        export::write_json(path, &rows)?;
    }

    if let Some(path) = &opts.report_path {
        let generated_at = chrono::Utc::now().to_rfc3339();
        report::write_report(path, &analysis, &generated_at)?;
    }

    tracing::info!(
        candidate_id = candidate.id,
        saved,
        pruned,
        total = analysis.summary.total_count,
        "run complete"
    );

    Ok(RunOutcome {
        analysis,
        saved,
        pruned,
        export_path: opts.export_path.clone(),
        report_path: opts.report_path.clone(),
    })
}
