use super::args::*;
use anyhow::Context;
use fibtrial_core::config::{load_config, PipelineConfig};
use fibtrial_core::storage::Store;

pub mod results;
pub mod run;

pub mod exit_codes {
    use fibtrial_core::PipelineError;

    pub const OK: i32 = 0;
    pub const PIPELINE_ERROR: i32 = 1;
    pub const CONFIG_ERROR: i32 = 2;

    /// Validation, integrity and not-found failures exit 1; everything else 2.
    pub fn for_error(err: &anyhow::Error) -> i32 {
        match err.downcast_ref::<PipelineError>() {
            Some(e) if e.is_contract_violation() => PIPELINE_ERROR,
            _ => CONFIG_ERROR,
        }
    }

    /// Short code for log fields; errors raised outside the core report `E_INTERNAL`.
    pub fn error_code(err: &anyhow::Error) -> &'static str {
        err.downcast_ref::<PipelineError>()
            .map(PipelineError::code)
            .unwrap_or("E_INTERNAL")
    }
}

pub fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    let cfg = resolve_config(&cli)?;
    crate::logging::init_logging(&cfg.log_level);
    for key in &cfg.ignored_keys {
        tracing::warn!(key = %key, "ignored unknown config field");
    }

    match cli.cmd {
        Command::Run(args) => run::cmd_run(args, cfg),
        Command::Summary(args) => results::cmd_summary(args, &cfg),
        Command::List(args) => results::cmd_list(args, &cfg),
        Command::Candidates(args) => results::cmd_candidates(args, &cfg),
        Command::Delete(args) => results::cmd_delete(args, &cfg),
        Command::Prune(args) => results::cmd_prune(args, &cfg),
        Command::Export(args) => results::cmd_export(args, &cfg),
        Command::Stats(args) => results::cmd_stats(args, &cfg),
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(exit_codes::OK)
        }
    }
}

/// Defaults, then the config file, then environment, then global flags.
fn resolve_config(cli: &Cli) -> anyhow::Result<PipelineConfig> {
    let mut cfg = match &cli.config {
        Some(path) => load_config(path)?,
        None => PipelineConfig::default(),
    };
    cfg.apply_env(|key| std::env::var(key).ok())?;

    if let Some(db) = &cli.db {
        cfg.db_path = db.clone();
    }
    if let Some(level) = &cli.log_level {
        cfg.log_level = level.clone();
    }
    Ok(cfg)
}

pub(crate) fn open_store(cfg: &PipelineConfig) -> anyhow::Result<Store> {
    let store = Store::open(&cfg.db_path)
        .with_context(|| format!("failed to open database {}", cfg.db_path.display()))?;
    store.init_schema()?;
    Ok(store)
}
