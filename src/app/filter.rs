//! Cascading manifest filters
//!
//! The date filter runs first and everything downstream is computed from the
//! date-filtered rows: the status1, status2 and shuttle option lists offered
//! to the user only ever contain values present on the selected date. The
//! categorical filters then narrow the rows in that fixed order. Every stage
//! is a pure membership test and an empty selection set means "no
//! restriction", so the stages are conjunctive and never fail.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, warn};

use crate::app::models::{
    compare_options, FilterSelection, ManifestField, ManifestRecord, ManifestTable,
    SelectionRequest,
};

/// Option lists offered to the filter controls
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    /// Every date in the table, most recent first
    pub dates: Vec<String>,
    /// status1 values present on the selected date
    pub status1: Vec<String>,
    /// status2 values present on the selected date
    pub status2: Vec<String>,
    /// shuttle values present on the selected date
    pub shuttle: Vec<String>,
}

impl FilterOptions {
    /// Offered values for a categorical field (`None` for date and filename)
    pub fn values(&self, field: ManifestField) -> Option<&[String]> {
        match field {
            ManifestField::Status1 => Some(&self.status1),
            ManifestField::Status2 => Some(&self.status2),
            ManifestField::Shuttle => Some(&self.shuttle),
            ManifestField::Date | ManifestField::Filename => None,
        }
    }

    /// Requested values of `field` that these options do not offer
    pub fn unoffered<'a>(&self, field: ManifestField, values: &'a [String]) -> Vec<&'a str> {
        let offered = self.values(field).unwrap_or(&[]);
        values
            .iter()
            .filter(|value| !offered.contains(value))
            .map(String::as_str)
            .collect()
    }

    /// Drop every requested categorical value these options do not offer
    ///
    /// Returns the number of values removed.
    pub fn prune(&self, request: &mut SelectionRequest) -> usize {
        let mut removed = 0;
        for field in ManifestField::CATEGORICAL {
            let offered = self.values(field).unwrap_or(&[]);
            if let Some(selected) = request.values_mut(field) {
                let before = selected.len();
                selected.retain(|value| offered.contains(value));
                removed += before - selected.len();
            }
        }
        if removed > 0 {
            debug!("Dropped {} selected values not offered for the date", removed);
        }
        removed
    }
}

/// Result of one filter pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOutcome {
    /// Options offered for the selected date
    pub options: FilterOptions,
    /// Rows surviving every stage, in table order
    pub rows: ManifestTable,
}

/// The filter cascade
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterPipeline;

impl FilterPipeline {
    /// Distinct dates, most recent (lexicographically greatest) first
    pub fn available_dates(table: &ManifestTable) -> Vec<String> {
        table
            .distinct(ManifestField::Date)
            .into_iter()
            .rev()
            .map(str::to_string)
            .collect()
    }

    /// Rows recorded on `date`
    pub fn filter_date(table: &ManifestTable, date: &str) -> ManifestTable {
        table.select(|record| record.date == date)
    }

    /// Option lists for `date`, computed after the date filter
    pub fn options(table: &ManifestTable, date: &str) -> FilterOptions {
        let date_filtered = Self::filter_date(table, date);
        FilterOptions {
            dates: Self::available_dates(table),
            status1: sorted_options(&date_filtered, ManifestField::Status1),
            status2: sorted_options(&date_filtered, ManifestField::Status2),
            shuttle: sorted_options(&date_filtered, ManifestField::Shuttle),
        }
    }

    /// Apply the selection to the table
    pub fn apply(table: &ManifestTable, selection: &FilterSelection) -> ManifestTable {
        let date_filtered = Self::filter_date(table, &selection.date);
        Self::apply_categorical(&date_filtered, selection)
    }

    /// Compute the cascaded options and apply the selection in one pass
    pub fn run(table: &ManifestTable, selection: &FilterSelection) -> FilterOutcome {
        let options = Self::options(table, &selection.date);

        if !options.dates.iter().any(|date| date == &selection.date) {
            warn!(
                "Date '{}' is not present in the manifest; nothing will match",
                selection.date
            );
        }
        for field in ManifestField::CATEGORICAL {
            report_unoffered(field, selection, &options);
        }

        let rows = Self::apply(table, selection);
        debug!(
            "Filter pass for {} kept {} of {} rows",
            selection.date,
            rows.len(),
            table.len()
        );

        FilterOutcome { options, rows }
    }

    /// status1, status2 and shuttle stages, in that order
    fn apply_categorical(table: &ManifestTable, selection: &FilterSelection) -> ManifestTable {
        ManifestField::CATEGORICAL
            .into_iter()
            .fold(table.clone(), |current, field| {
                match selection.values(field) {
                    Some(allowed) if !allowed.is_empty() => {
                        current.select(|record| stage_accepts(record, field, allowed))
                    }
                    _ => current,
                }
            })
    }
}

fn stage_accepts(record: &ManifestRecord, field: ManifestField, allowed: &BTreeSet<String>) -> bool {
    allowed.contains(record.field(field))
}

fn sorted_options(table: &ManifestTable, field: ManifestField) -> Vec<String> {
    let mut values: Vec<String> = table
        .distinct(field)
        .into_iter()
        .map(str::to_string)
        .collect();
    values.sort_by(|a, b| compare_options(a, b));
    values
}

fn report_unoffered(field: ManifestField, selection: &FilterSelection, options: &FilterOptions) {
    let (Some(selected), Some(offered)) = (selection.values(field), options.values(field)) else {
        return;
    };

    for value in selected {
        if !offered.contains(value) {
            warn!(
                "{} value '{}' is not offered for date {}",
                field, value, selection.date
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> ManifestTable {
        ManifestTable::from_records(vec![
            ManifestRecord::new(0, "250925", "A", "X", "1", "p1.html"),
            ManifestRecord::new(0, "250925", "B", "Y", "2", "p2.html"),
            ManifestRecord::new(0, "250924", "A", "X", "1", "p3.html"),
            ManifestRecord::new(0, "250924", "C", "Z", "10", "p4.html"),
            ManifestRecord::new(0, "250924", "C", "Z", "9", "p5.html"),
        ])
    }

    #[test]
    fn test_date_filter_selects_rows_for_date() {
        let rows = FilterPipeline::apply(&sample_table(), &FilterSelection::new("250925"));
        assert_eq!(rows.row_ids(), vec![0, 1]);
    }

    #[test]
    fn test_status1_narrows_date_filtered_rows() {
        let selection = FilterSelection::new("250925").with(ManifestField::Status1, ["A"]);
        let rows = FilterPipeline::apply(&sample_table(), &selection);
        assert_eq!(rows.row_ids(), vec![0]);
        assert_eq!(rows.rows()[0].filename, "p1.html");
    }

    #[test]
    fn test_stages_are_conjunctive() {
        let selection = FilterSelection::new("250925")
            .with(ManifestField::Status1, ["A", "B"])
            .with(ManifestField::Status2, ["Y"]);
        let rows = FilterPipeline::apply(&sample_table(), &selection);
        assert_eq!(rows.row_ids(), vec![1]);

        let contradictory = FilterSelection::new("250925")
            .with(ManifestField::Status1, ["A"])
            .with(ManifestField::Shuttle, ["2"]);
        assert!(FilterPipeline::apply(&sample_table(), &contradictory).is_empty());
    }

    #[test]
    fn test_options_cascade_from_selected_date() {
        let table = sample_table();

        let latest = FilterPipeline::options(&table, "250925");
        assert_eq!(latest.dates, vec!["250925", "250924"]);
        assert_eq!(latest.status1, vec!["A", "B"]);
        assert_eq!(latest.status2, vec!["X", "Y"]);
        assert_eq!(latest.shuttle, vec!["1", "2"]);

        let earlier = FilterPipeline::options(&table, "250924");
        assert_eq!(earlier.dates, latest.dates);
        assert_eq!(earlier.status1, vec!["A", "C"]);
        assert!(!earlier.status1.contains(&"B".to_string()));
        assert_eq!(earlier.shuttle, vec!["1", "9", "10"]);
    }

    #[test]
    fn test_unknown_date_yields_empty_result() {
        let outcome = FilterPipeline::run(&sample_table(), &FilterSelection::new("990101"));
        assert!(outcome.rows.is_empty());
        assert!(outcome.options.status1.is_empty());
        assert_eq!(outcome.options.dates.len(), 2);
    }

    #[test]
    fn test_empty_table_yields_empty_everything() {
        let outcome = FilterPipeline::run(&ManifestTable::empty(), &FilterSelection::new("250925"));
        assert!(outcome.rows.is_empty());
        assert_eq!(outcome.options, FilterOptions::default());
    }

    #[test]
    fn test_duplicate_tuples_survive_independently() {
        let table = ManifestTable::from_records(vec![
            ManifestRecord::new(0, "250925", "A", "X", "1", "p1.html"),
            ManifestRecord::new(0, "250925", "A", "X", "1", "p1b.html"),
        ]);
        let selection = FilterSelection::new("250925").with(ManifestField::Shuttle, ["1"]);
        assert_eq!(FilterPipeline::apply(&table, &selection).len(), 2);
    }

    #[test]
    fn test_prune_keeps_only_offered_values() {
        let options = FilterPipeline::options(&sample_table(), "250924");
        let mut request = SelectionRequest {
            date: Some("250924".to_string()),
            ..Default::default()
        };
        request.status1.extend(["A".to_string(), "B".to_string()]);
        request.shuttle.insert("2".to_string());

        assert_eq!(options.prune(&mut request), 2);
        assert_eq!(request.status1.iter().collect::<Vec<_>>(), vec!["A"]);
        assert!(request.shuttle.is_empty());
        assert_eq!(options.prune(&mut request), 0);
    }

    #[test]
    fn test_unoffered_values() {
        let options = FilterPipeline::options(&sample_table(), "250925");
        let values = vec!["A".to_string(), "C".to_string()];
        assert_eq!(options.unoffered(ManifestField::Status1, &values), vec!["C"]);
        assert!(options.unoffered(ManifestField::Status2, &["Y".to_string()]).is_empty());
    }

    #[test]
    fn test_run_matches_apply() {
        let table = sample_table();
        let selection = FilterSelection::new("250924").with(ManifestField::Status1, ["C"]);
        let outcome = FilterPipeline::run(&table, &selection);
        assert_eq!(outcome.rows, FilterPipeline::apply(&table, &selection));
        assert_eq!(outcome.rows.row_ids(), vec![3, 4]);
    }
}
