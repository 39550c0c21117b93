use crate::analyzer::Analysis;
use crate::errors::Result;
use crate::report::chart::{share_bar, value_bar, DISTRIBUTION_WIDTH, VALUE_BAR_WIDTH};
use std::path::Path;

pub fn render(analysis: &Analysis, generated_at: &str) -> String {
    let s = &analysis.summary;
    let mut md = String::new();

    md.push_str("# Candidate Evaluation Report\n\n");

    md.push_str("## Candidate\n\n");
    md.push_str(&format!("- **Name**: {}\n", analysis.candidate.name));
    md.push_str(&format!("- **ID**: {}\n", analysis.candidate.id));
    md.push_str(&format!(
        "- **Registered**: {}\n\n",
        analysis.candidate.registered_at
    ));

    md.push_str("## Generated Sequence\n\n");
    let seq: Vec<String> = analysis.values.iter().map(|r| r.value.to_string()).collect();
    md.push_str(&format!("```\n{}\n```\n\n", seq.join(", ")));

    md.push_str(&format!("## Top {} Values\n\n", analysis.top.len()));
    md.push_str("| Rank | Value |\n");
    md.push_str("|---|---|\n");
    for (i, v) in analysis.top.iter().enumerate() {
        md.push_str(&format!("| {} | {} |\n", i + 1, v));
    }
    md.push('\n');

    md.push_str("## Statistics\n\n");
    md.push_str(&format!("- **Total**: {}\n", s.total_count));
    md.push_str(&format!(
        "- **Even**: {} ({:.1}%)\n",
        s.even_count,
        s.even_ratio() * 100.0
    ));
    md.push_str(&format!(
        "- **Odd**: {} ({:.1}%)\n",
        s.odd_count,
        s.odd_ratio() * 100.0
    ));
    md.push_str(&format!("- **Min**: {}\n", s.min_value));
    md.push_str(&format!("- **Max**: {}\n\n", s.max_value));

    md.push_str("## Parity Distribution\n\n");
    md.push_str("```\n");
    md.push_str(&format!(
        "even {:<width$} {:.1}%\n",
        share_bar(s.even_ratio(), DISTRIBUTION_WIDTH),
        s.even_ratio() * 100.0,
        width = DISTRIBUTION_WIDTH
    ));
    md.push_str(&format!(
        "odd  {:<width$} {:.1}%\n",
        share_bar(s.odd_ratio(), DISTRIBUTION_WIDTH),
        s.odd_ratio() * 100.0,
        width = DISTRIBUTION_WIDTH
    ));
    md.push_str("```\n\n");

    md.push_str("## Values by Index\n\n");
    md.push_str("```\n");
    let label_width = s.max_value.to_string().len();
    for r in &analysis.values {
        md.push_str(&format!(
            "{:>3} {:>lw$} {}\n",
            r.sequence_index,
            r.value,
            value_bar(r.value, s.max_value, VALUE_BAR_WIDTH),
            lw = label_width
        ));
    }
    md.push_str("```\n\n");

    md.push_str("---\n\n");
    md.push_str(&format!("_Report generated at {}_\n", generated_at));

    md
}

pub fn write_report(path: &Path, analysis: &Analysis, generated_at: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, render(analysis, generated_at))?;
    tracing::info!(path = %path.display(), "report written");
    Ok(())
}
