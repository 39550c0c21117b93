//! Read-only aggregates over stored results.

use crate::errors::{PipelineError, Result};
use crate::model::{Candidate, ResultFilter, TestResultRow};
use crate::storage::Store;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub candidate_id: i64,
    pub total_count: u64,
    pub even_count: u64,
    pub odd_count: u64,
    pub min_value: u64,
    pub max_value: u64,
}

impl Summary {
    pub fn even_ratio(&self) -> f64 {
        ratio(self.even_count, self.total_count)
    }

    pub fn odd_ratio(&self) -> f64 {
        ratio(self.odd_count, self.total_count)
    }
}

fn ratio(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

/// Everything the reporters need for one candidate.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub candidate: Candidate,
    pub summary: Summary,
    pub values: Vec<TestResultRow>,
    pub top: Vec<u64>,
}

pub fn summarize(store: &Store, candidate_id: i64) -> Result<Summary> {
    let agg = store.aggregate_for(candidate_id)?.ok_or_else(|| {
        PipelineError::NotFound(format!("no results for candidate {candidate_id}"))
    })?;

    Ok(Summary {
        candidate_id,
        total_count: agg.total,
        even_count: agg.even,
        odd_count: agg.odd,
        min_value: agg.min_value,
        max_value: agg.max_value,
    })
}

pub fn analyze(store: &Store, candidate_id: i64, top_n: u32) -> Result<Analysis> {
    let candidate = store.get_candidate(candidate_id)?;
    let summary = summarize(store, candidate_id)?;
    let values = store.list(&ResultFilter::all().candidate(candidate_id))?;
    let top = store.top_values(candidate_id, top_n)?;

    tracing::debug!(
        candidate_id,
        total = summary.total_count,
        even = summary.even_count,
        odd = summary.odd_count,
        "analysis complete"
    );

    Ok(Analysis {
        candidate,
        summary,
        values,
        top,
    })
}
