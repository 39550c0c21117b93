use super::exit_codes;
use super::open_store;
use crate::cli::args::{DeleteArgs, ExportArgs, FormatArgs, ListArgs, OutputFormat, PruneArgs, SummaryArgs};
use fibtrial_core::analyzer::analyze;
use fibtrial_core::config::PipelineConfig;
use fibtrial_core::export;
use fibtrial_core::model::ResultFilter;
use fibtrial_core::report::console;

pub fn cmd_summary(args: SummaryArgs, cfg: &PipelineConfig) -> anyhow::Result<i32> {
    let store = open_store(cfg)?;
    let analysis = analyze(&store, args.candidate, cfg.top_n)?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&analysis.summary)?),
        OutputFormat::Text => console::print_summary(&analysis),
    }
    Ok(exit_codes::OK)
}

pub fn cmd_list(args: ListArgs, cfg: &PipelineConfig) -> anyhow::Result<i32> {
    let store = open_store(cfg)?;
    let filter = ResultFilter {
        candidate_id: args.candidate,
        parity: args.parity.map(Into::into),
    };
    let rows = store.list(&filter)?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Text => {
            println!("{:<10} {:>5} {:>20} {:<4}", "candidate", "index", "value", "parity");
            for r in &rows {
                println!(
                    "{:<10} {:>5} {:>20} {:<4}",
                    r.candidate_id, r.sequence_index, r.value, r.parity
                );
            }
            eprintln!("{} rows", rows.len());
        }
    }
    Ok(exit_codes::OK)
}

pub fn cmd_candidates(args: FormatArgs, cfg: &PipelineConfig) -> anyhow::Result<i32> {
    let store = open_store(cfg)?;
    let candidates = store.list_candidates()?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&candidates)?),
        OutputFormat::Text => {
            for c in &candidates {
                println!("{:<6} {:<30} {}", c.id, c.name, c.registered_at);
            }
        }
    }
    Ok(exit_codes::OK)
}

pub fn cmd_delete(args: DeleteArgs, cfg: &PipelineConfig) -> anyhow::Result<i32> {
    let mut store = open_store(cfg)?;
    let removed = store.delete_candidate(args.candidate)?;
    eprintln!(
        "deleted candidate {} ({} results)",
        args.candidate, removed
    );
    Ok(exit_codes::OK)
}

pub fn cmd_prune(args: PruneArgs, cfg: &PipelineConfig) -> anyhow::Result<i32> {
    let mut store = open_store(cfg)?;
    let removed = store.prune_above(args.above)?;
    eprintln!("removed {} results above {}", removed, args.above);
    Ok(exit_codes::OK)
}

pub fn cmd_export(args: ExportArgs, cfg: &PipelineConfig) -> anyhow::Result<i32> {
    let store = open_store(cfg)?;
    if let Some(id) = args.candidate {
        // surfaces NotFound instead of silently exporting nothing
        store.get_candidate(id)?;
    }
    let filter = ResultFilter {
        candidate_id: args.candidate,
        parity: None,
    };
    let rows = store.list(&filter)?;
    export::write_json(&args.out, &rows)?;
    eprintln!("wrote {} ({} rows)", args.out.display(), rows.len());
    Ok(exit_codes::OK)
}

pub fn cmd_stats(args: FormatArgs, cfg: &PipelineConfig) -> anyhow::Result<i32> {
    let store = open_store(cfg)?;
    let stats = store.stats_best_effort()?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Text => {
            let show = |v: Option<String>| v.unwrap_or_else(|| "?".to_string());
            println!("db:             {}", cfg.db_path.display());
            println!("schema version: {}", show(stats.version.clone()));
            println!("candidates:     {}", show(stats.candidates.map(|n| n.to_string())));
            println!("results:        {}", show(stats.results.map(|n| n.to_string())));
            println!(
                "last candidate: {}",
                show(stats.last_candidate_id.map(|id| match &stats.last_registered_at {
                    Some(at) => format!("{id} ({at})"),
                    None => id.to_string(),
                }))
            );
        }
    }
    Ok(exit_codes::OK)
}
