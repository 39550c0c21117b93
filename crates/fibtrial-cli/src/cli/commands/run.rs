use super::exit_codes;
use super::open_store;
use crate::cli::args::{OutputFormat, RunArgs};
use fibtrial_core::config::{PipelineConfig, DEFAULT_PRUNE_THRESHOLD};
use fibtrial_core::pipeline::{self, RunOptions};
use fibtrial_core::report::console;

pub fn cmd_run(args: RunArgs, mut cfg: PipelineConfig) -> anyhow::Result<i32> {
    if let Some(n) = args.count {
        cfg.count = n;
    }
    if let Some(t) = args.prune_above {
        cfg.prune_threshold = Some(t.unwrap_or(DEFAULT_PRUNE_THRESHOLD));
    }
    if let Some(top) = args.top {
        cfg.top_n = top;
    }
    if args.export.is_some() {
        cfg.export_path = args.export;
    }
    if args.no_report {
        cfg.report_path = None;
    } else if args.report.is_some() {
        cfg.report_path = args.report;
    }
    cfg.validate()?;

    let mut store = open_store(&cfg)?;
    tracing::info!(
        db = %cfg.db_path.display(),
        count = cfg.count,
        candidate = %args.name,
        "starting run"
    );

    let outcome = pipeline::run(&mut store, &RunOptions::from_config(args.name, &cfg))?;

    match args.format {
        OutputFormat::Json => {
            let out = serde_json::json!({
                "candidate": outcome.analysis.candidate,
                "summary": outcome.analysis.summary,
                "top": outcome.analysis.top,
                "saved": outcome.saved,
                "pruned": outcome.pruned,
                "export": outcome.export_path,
                "report": outcome.report_path,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            console::print_summary(&outcome.analysis);
            println!("candidate_id={}", outcome.analysis.candidate.id);
        }
    }

    if let Some(p) = &outcome.export_path {
        eprintln!("wrote {}", p.display());
    }
    if let Some(p) = &outcome.report_path {
        eprintln!("wrote {}", p.display());
    }

    Ok(exit_codes::OK)
}
