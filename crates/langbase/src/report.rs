//! Endangerment-rate summary per genus.
//!
//! Aggregates final language rows by `(Family_Name, Genus_Name)` and counts
//! how many carry an endangered status. This is the summary the charting
//! side consumes.

use std::cmp::Ordering;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::Result;
use crate::schema::output::{
    ENDANGERED_LANGUAGES, ENDANGERMENT_RATE, FAMILY_NAME, GENUS_NAME, STATUS, TOTAL_LANGUAGES,
};
use crate::table::Table;

/// Cleaned statuses counted as endangered unless configured otherwise.
pub const DEFAULT_ENDANGERED_STATUSES: &[&str] = &[
    "threatened",
    "shifting",
    "moribund",
    "nearly extinct",
    "vulnerable",
    "definitely endangered",
    "severely endangered",
    "critically endangered",
];

/// Counts for one `(family, genus)` group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndangermentRate {
    pub family_name: Option<String>,
    pub genus_name: Option<String>,
    pub total: usize,
    pub endangered: usize,
}

impl EndangermentRate {
    /// Share of endangered languages, in percent.
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            100.0 * self.endangered as f64 / self.total as f64
        }
    }

    /// Highest rate first, then larger groups, then by name.
    fn rank(&self, other: &Self) -> Ordering {
        // a/b > c/d  <=>  a*d > c*b, exact for integer counts
        let lhs = self.endangered * other.total;
        let rhs = other.endangered * self.total;
        rhs.cmp(&lhs)
            .then_with(|| other.total.cmp(&self.total))
            .then_with(|| self.family_name.cmp(&other.family_name))
            .then_with(|| self.genus_name.cmp(&other.genus_name))
    }
}

/// Compute rates from a table with `Family_Name`, `Genus_Name` and `Status`.
pub fn endangerment_rates(languages: &Table, endangered_statuses: &[String]) -> Result<Vec<EndangermentRate>> {
    languages.require_columns(&[FAMILY_NAME, GENUS_NAME, STATUS])?;

    let mut groups: IndexMap<(Option<String>, Option<String>), (usize, usize)> = IndexMap::new();
    for row in &languages.rows {
        let family = row.get(FAMILY_NAME).cloned().flatten();
        let genus = row.get(GENUS_NAME).cloned().flatten();
        let is_endangered = row
            .get(STATUS)
            .and_then(|v| v.as_deref())
            .is_some_and(|status| endangered_statuses.iter().any(|e| e == status));

        let counts = groups.entry((family, genus)).or_insert((0, 0));
        counts.0 += 1;
        if is_endangered {
            counts.1 += 1;
        }
    }

    let mut rates: Vec<EndangermentRate> = groups
        .into_iter()
        .map(|((family_name, genus_name), (total, endangered))| EndangermentRate {
            family_name,
            genus_name,
            total,
            endangered,
        })
        .collect();
    rates.sort_by(|a, b| a.rank(b));
    Ok(rates)
}

/// Render rates as a table in export column order.
pub fn rates_table(rates: &[EndangermentRate]) -> Table {
    let values = rates
        .iter()
        .map(|r| {
            vec![
                r.family_name.clone(),
                r.genus_name.clone(),
                Some(r.total.to_string()),
                Some(r.endangered.to_string()),
                Some(format!("{:.2}", r.percentage())),
            ]
        })
        .collect();
    Table::from_values(
        "endangerment_rates",
        [FAMILY_NAME, GENUS_NAME, TOTAL_LANGUAGES, ENDANGERED_LANGUAGES, ENDANGERMENT_RATE],
        values,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    fn statuses() -> Vec<String> {
        DEFAULT_ENDANGERED_STATUSES.iter().map(|s| s.to_string()).collect()
    }

    fn languages(rows: &[(&str, &str, &str)]) -> Table {
        Table::from_values(
            "languages",
            [FAMILY_NAME, GENUS_NAME, STATUS],
            rows.iter().map(|(f, g, st)| vec![s(f), s(g), s(st)]).collect(),
        )
    }

    #[test]
    fn test_counts_per_group() {
        let table = languages(&[
            ("f1", "g1", "safe"),
            ("f1", "g1", "moribund"),
            ("f1", "g2", "critically endangered"),
            ("f2", "g3", "unknown"),
        ]);
        let rates = endangerment_rates(&table, &statuses()).unwrap();

        assert_eq!(rates.len(), 3);
        assert_eq!(rates[0].genus_name, s("g2"));
        assert_eq!(rates[0].percentage(), 100.0);
        assert_eq!(rates[1].genus_name, s("g1"));
        assert_eq!((rates[1].total, rates[1].endangered), (2, 1));
        assert_eq!(rates[2].endangered, 0);
    }

    #[test]
    fn test_ties_broken_by_size_then_name() {
        let table = languages(&[
            ("b", "x", "moribund"),
            ("a", "y", "moribund"),
            ("c", "z", "moribund"),
            ("c", "z", "moribund"),
        ]);
        let rates = endangerment_rates(&table, &statuses()).unwrap();
        let order: Vec<_> = rates.iter().map(|r| r.family_name.clone()).collect();
        assert_eq!(order, vec![s("c"), s("a"), s("b")]);
    }

    #[test]
    fn test_rates_table_format() {
        let table = languages(&[("f", "g", "moribund"), ("f", "g", "safe"), ("f", "g", "safe")]);
        let rates = endangerment_rates(&table, &statuses()).unwrap();
        let out = rates_table(&rates);
        assert_eq!(out.value(0, ENDANGERMENT_RATE), Some("33.33"));
        assert_eq!(out.value(0, TOTAL_LANGUAGES), Some("3"));
    }
}
