//! LaTeX cell formatting. Each function compares a value with the values of the
//! same metric of competing methods in the same row and bolds the best ones.
//! Ties are bold on every side.

use crate::datastructures::Cell;

/// Rendered in place of missing values.
pub const PLACEHOLDER: &str = "-";

/// Minimize-family alternatives below the threshold compare as this value.
const CLAMP_EPSILON: f64 = 0.0099;
const THRESHOLD: f64 = 0.01;

/// Rounds exactly like the two-decimal rendering, so highlighting agrees
/// with the printed digits.
fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

fn bold_math(text: &str) -> String {
    format!("$\\mathbf{{{text}}}$")
}

fn bold_text(text: &str) -> String {
    format!("\\textbf{{{text}}}")
}

fn min_alternative(alternatives: &[Cell], clamp: bool) -> f64 {
    alternatives
        .iter()
        .filter_map(Cell::value)
        .map(|v| if clamp && v < THRESHOLD { CLAMP_EPSILON } else { v })
        .fold(f64::INFINITY, f64::min)
}

fn max_alternative(alternatives: &[Cell]) -> f64 {
    alternatives
        .iter()
        .filter_map(Cell::value)
        .fold(f64::NEG_INFINITY, f64::max)
}

/// Smaller is better, values below 0.01 render as a bold `<0.01`.
/// Used for runtimes.
pub fn format_min(value: Cell, alternatives: &[Cell]) -> String {
    let Some(v) = value.value() else { return PLACEHOLDER.to_string(); };
    if v < THRESHOLD {
        return bold_math("<0.01");
    }
    let formatted = format!("{v:.2}");
    if round2(v) <= round2(min_alternative(alternatives, true)) {
        bold_math(&formatted)
    } else {
        formatted
    }
}

/// Smaller is better without the `<0.01` rule, zero gaps print as `0.00`.
pub fn format_min_exact(value: Cell, alternatives: &[Cell]) -> String {
    let Some(v) = value.value() else { return PLACEHOLDER.to_string(); };
    let formatted = format!("{v:.2}");
    if round2(v) <= round2(min_alternative(alternatives, false)) {
        bold_math(&formatted)
    } else {
        formatted
    }
}

/// Larger is better. Used for solution lengths and reduction quality.
pub fn format_max(value: Cell, alternatives: &[Cell]) -> String {
    let Some(v) = value.value() else { return PLACEHOLDER.to_string(); };
    let formatted = format!("{v:.2}");
    if round2(v) >= round2(max_alternative(alternatives)) {
        bold_math(&formatted)
    } else {
        formatted
    }
}

/// Renders `solved/complete` counts against the counts of a competitor.
///
/// Both parts dominating bolds the pair as a whole, otherwise each part is
/// bold on its own. A missing competitor counts as `(-1, -1)`.
pub fn format_opt(
    solved: Cell,
    complete: Cell,
    alt_solved: Cell,
    alt_complete: Cell,
) -> String {
    let (Some(solved), Some(complete)) = (solved.value(), complete.value()) else {
        return PLACEHOLDER.to_string();
    };
    let (alt_solved, alt_complete) = match alt_solved.value() {
        Some(alt_solved) => (alt_solved, alt_complete.value().unwrap_or(-1.0)),
        None => (-1.0, -1.0),
    };
    let solved_wins = round2(solved) >= round2(alt_solved);
    let complete_wins = round2(complete) >= round2(alt_complete);
    let (solved, complete) = (
        (solved as i64).to_string(),
        (complete as i64).to_string(),
    );
    if solved_wins && complete_wins {
        return bold_text(&format!("{solved}/{complete}"));
    }
    let solved = if solved_wins { bold_text(&solved) } else { solved };
    let complete = if complete_wins { bold_text(&complete) } else { complete };
    format!("{solved}/{complete}")
}

/// Two decimals without highlighting.
pub fn format_plain(value: Cell) -> String {
    match value.value() {
        None => PLACEHOLDER.to_string(),
        Some(v) if v < THRESHOLD => "$<0.01$".to_string(),
        Some(v) => format!("{v:.2}"),
    }
}

/// Integer count, bold when it reaches `target` (e.g. best in every run).
pub fn format_count_highlight(value: Cell, target: Cell) -> String {
    let Some(v) = value.value() else { return PLACEHOLDER.to_string(); };
    let count = (v.round() as i64).to_string();
    match target.value() {
        Some(t) if v == t => bold_text(&count),
        _ => count,
    }
}
