use std::cmp::Ordering;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::datastructures::{ConfigurationKey, KeyScheme, LabeledRow, SummaryRow};

static FRACTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d*)n-div-(\d+)").expect("valid fraction pattern"));

static REPETITIONS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)(?:reps)?$").expect("valid repetitions pattern"));

/// Numeric value of a fraction key `<k>n-div-<d>`, an omitted `k` means 1.
pub fn fraction_value(property_2: &str) -> Option<f64> {
    let captures = FRACTION.captures(property_2)?;
    let numerator = match captures.get(1)?.as_str() {
        "" => 1.0,
        k => k.parse::<f64>().ok()?,
    };
    let denominator = captures.get(2)?.as_str().parse::<f64>().ok()?;
    Some(numerator / denominator).filter(|value| value.is_finite())
}

/// LaTeX label of a fraction key, e.g. `$\frac{3\cdot n}{8}$`.
pub fn fraction_label(property_2: &str) -> Option<String> {
    let captures = FRACTION.captures(property_2)?;
    let top = match captures.get(1)?.as_str() {
        "" => "n".to_string(),
        k => format!("{k}\\cdot n"),
    };
    Some(format!("$\\frac{{{}}}{{{}}}$", top, &captures[2]))
}

pub fn repetitions_value(property_2: &str) -> Option<f64> {
    let captures = REPETITIONS.captures(property_2)?;
    captures[1].parse::<f64>().ok()
}

/// Position of a key in the final table. Keys whose encoded part cannot be
/// read sort after all others.
#[derive(Debug, Clone, Copy)]
pub struct SortKey {
    pub primary: f64,
    pub secondary: f64,
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.primary
            .total_cmp(&other.primary)
            .then_with(|| self.secondary.total_cmp(&other.secondary))
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SortKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortKey {}

impl KeyScheme {
    pub fn sort_key(&self, key: &ConfigurationKey) -> SortKey {
        let property_1 = key.property_1 as f64;
        match self {
            KeyScheme::Fraction => SortKey {
                primary: fraction_value(&key.property_2).unwrap_or(f64::INFINITY),
                secondary: property_1,
            },
            KeyScheme::Repetitions => SortKey {
                primary: property_1,
                secondary: repetitions_value(&key.property_2)
                    .unwrap_or(f64::INFINITY),
            },
        }
    }

    pub fn primary_label(&self, key: &ConfigurationKey) -> String {
        match self {
            KeyScheme::Fraction => fraction_label(&key.property_2)
                .unwrap_or_else(|| key.property_2.clone()),
            KeyScheme::Repetitions => key.property_1.to_string(),
        }
    }

    pub fn secondary_label(&self, key: &ConfigurationKey) -> String {
        match self {
            KeyScheme::Fraction => key.property_1.to_string(),
            KeyScheme::Repetitions => key.property_2.clone(),
        }
    }

    pub fn compare(&self, a: &ConfigurationKey, b: &ConfigurationKey) -> Ordering {
        self.sort_key(a).cmp(&self.sort_key(b))
    }

    /// Stable ascending sort followed by labeling.
    pub fn arrange(&self, mut rows: Vec<SummaryRow>) -> Vec<LabeledRow> {
        rows.sort_by(|a, b| self.compare(&a.key, &b.key));
        rows.into_iter()
            .map(|row| LabeledRow {
                primary_label: self.primary_label(&row.key),
                secondary_label: self.secondary_label(&row.key),
                row,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn row(property_1: i64, property_2: &str) -> SummaryRow {
        SummaryRow {
            key: ConfigurationKey::new(property_1, property_2),
            cells: HashMap::new(),
        }
    }

    #[test]
    fn test_fraction_value() {
        assert_eq!(fraction_value("n-div-8"), Some(0.125));
        assert_eq!(fraction_value("3n-div-4"), Some(0.75));
        assert_eq!(fraction_value("7n-div-8"), Some(0.875));
        assert_eq!(fraction_value("256"), None);
        assert_eq!(fraction_value("0n-div-0"), None);
        assert_eq!(fraction_value("3n-div-0"), None);
    }

    #[test]
    fn test_fraction_label() {
        assert_eq!(fraction_label("n-div-8").unwrap(), r"$\frac{n}{8}$");
        assert_eq!(
            fraction_label("5n-div-8").unwrap(),
            r"$\frac{5\cdot n}{8}$"
        );
    }

    #[test]
    fn test_fraction_scheme_order() {
        let rows = vec![
            row(16, "n-div-2"),
            row(4, "3n-div-8"),
            row(8, "n-div-8"),
            row(4, "n-div-8"),
            row(4, "n-div-2"),
        ];
        let arranged = KeyScheme::Fraction.arrange(rows);
        let keys = arranged
            .iter()
            .map(|r| (r.row.key.property_1, r.row.key.property_2.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(
            keys,
            [
                (4, "n-div-8"),
                (8, "n-div-8"),
                (4, "3n-div-8"),
                (4, "n-div-2"),
                (16, "n-div-2")
            ]
        );
        assert_eq!(arranged[0].primary_label, r"$\frac{n}{8}$");
        assert_eq!(arranged[0].secondary_label, "4");
    }

    #[test]
    fn test_repetitions_compare_numerically() {
        let rows = vec![row(4, "10"), row(2, "3"), row(4, "2"), row(2, "12reps")];
        let arranged = KeyScheme::Repetitions.arrange(rows);
        let labels = arranged
            .iter()
            .map(|r| (r.primary_label.as_str(), r.secondary_label.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(labels, [("2", "3"), ("2", "12reps"), ("4", "2"), ("4", "10")]);
    }

    #[test]
    fn test_degenerate_fraction_sorts_last() {
        let rows = vec![
            row(4, "0n-div-0"),
            row(8, "n-div-2"),
            row(2, "3n-div-0"),
            row(4, "n-div-8"),
        ];
        let arranged = KeyScheme::Fraction.arrange(rows);
        let keys = arranged
            .iter()
            .map(|r| (r.row.key.property_1, r.row.key.property_2.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(
            keys,
            [(4, "n-div-8"), (8, "n-div-2"), (2, "3n-div-0"), (4, "0n-div-0")]
        );
    }

    #[test]
    fn test_unparseable_keys_sort_last() {
        let rows = vec![row(1, "odd"), row(99, "n-div-2")];
        let arranged = KeyScheme::Fraction.arrange(rows);
        assert_eq!(arranged[1].row.key.property_2, "odd");
        assert_eq!(arranged[1].primary_label, "odd");
    }
}
