use crate::analyzer::Analysis;
use crate::report::chart::{share_bar, DISTRIBUTION_WIDTH};

pub fn print_summary(analysis: &Analysis) {
    let s = &analysis.summary;

    eprintln!(
        "\nCandidate #{} {} ({} values)",
        analysis.candidate.id, analysis.candidate.name, s.total_count
    );
    eprintln!(
        "  even  {:>3}  {:>5.1}%  {}",
        s.even_count,
        s.even_ratio() * 100.0,
        share_bar(s.even_ratio(), DISTRIBUTION_WIDTH)
    );
    eprintln!(
        "  odd   {:>3}  {:>5.1}%  {}",
        s.odd_count,
        s.odd_ratio() * 100.0,
        share_bar(s.odd_ratio(), DISTRIBUTION_WIDTH)
    );
    eprintln!("  range {} ..= {}", s.min_value, s.max_value);

    if !analysis.top.is_empty() {
        let top: Vec<String> = analysis.top.iter().map(|v| v.to_string()).collect();
        eprintln!("  top {}: {}", top.len(), top.join(", "));
    }

    eprintln!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    eprintln!(
        "Summary: {} total, {} even, {} odd",
        s.total_count, s.even_count, s.odd_count
    );
}
