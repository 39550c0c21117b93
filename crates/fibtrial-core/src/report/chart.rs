//! Text charts used by the reporters.

pub const DISTRIBUTION_WIDTH: usize = 20;
pub const VALUE_BAR_WIDTH: usize = 40;

/// Bar of `width * share` cells, truncated like the percentages it sits next to.
pub fn share_bar(share: f64, width: usize) -> String {
    let share = if share.is_finite() {
        share.clamp(0.0, 1.0)
    } else {
        0.0
    };
    "|".repeat((share * width as f64) as usize)
}

/// Bar for `value` scaled so that `max` fills `width` cells. Non-zero values get at least one cell.
pub fn value_bar(value: u64, max: u64, width: usize) -> String {
    if max == 0 || value == 0 {
        return String::new();
    }
    let cells = ((value as f64 / max as f64) * width as f64).round() as usize;
    "#".repeat(cells.clamp(1, width))
}
